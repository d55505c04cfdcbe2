use log::info;

use crate::{context::Context, database::pool::PgConn, errors::StoreError};

const CREATE_MESSAGES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        id SERIAL PRIMARY KEY,
        uid INTEGER NOT NULL DEFAULT 0,
        prompt TEXT NOT NULL DEFAULT ''
    )
";

// Applies schema migrations inside a single transaction on a dedicated connection.
pub async fn apply_migrations(conn: &mut PgConn, ctx: &Context) -> Result<(), StoreError> {
    let transaction = conn.begin(ctx).await?;

    // `uid` and `prompt` get non-null defaults so a freshly created message reads back cleanly
    ctx.run(transaction.batch_execute(CREATE_MESSAGES_TABLE)).await??;

    ctx.run(transaction.commit()).await??;
    info!("Migrations applied: messages table ready");
    Ok(())
}
