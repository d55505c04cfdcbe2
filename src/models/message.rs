use serde::{Deserialize, Serialize};
use validator::Validate;

/// A row of the `messages` table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: i32,
    pub uid: i32,
    pub prompt: String,
}

#[derive(Deserialize, Validate, Debug)]
pub struct GetMessageRequest {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateMessageResponse {
    pub id: i32,
}

/// Read response; `id` carries the owning user's id
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub id: i32,
    pub prompt: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.uid,
            prompt: m.prompt,
        }
    }
}
