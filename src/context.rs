// context.rs

use std::future::{pending, Future};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context stopped an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded,
}

/// Caller-supplied deadline and cancellation signal for a unit of work.
///
/// Cloning is cheap; clones observe the same deadline and cancel signal.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires the cancel signal of every context created from it
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

impl Context {
    /// A context that never expires and is never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    /// Adds a cancel signal, keeping any existing deadline
    pub fn with_cancel(self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                deadline: self.deadline,
                cancel: Some(rx),
            },
            CancelHandle(tx),
        )
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn done(&self) -> Interrupt {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => pending::<()>().await,
            }
        };

        let cancelled = async {
            match self.cancel.clone() {
                Some(mut rx) => loop {
                    if *rx.borrow_and_update() {
                        break;
                    }
                    // Sender dropped without cancelling: never fires.
                    if rx.changed().await.is_err() {
                        pending::<()>().await;
                    }
                },
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            _ = cancelled => Interrupt::Cancelled,
            _ = deadline => Interrupt::DeadlineExceeded,
        }
    }

    /// Drives `fut` to completion unless the context fires first
    pub async fn run<F, T>(&self, fut: F) -> Result<T, Interrupt>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            interrupt = self.done() => Err(interrupt),
            out = fut => Ok(out),
        }
    }
}
