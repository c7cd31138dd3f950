//! CLI utility functions

use miette::{IntoDiagnostic, Result};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Exit code after the user stops the export.
pub const INTERRUPTED_EXIT_CODE: i32 = 1;

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Ctrl-C state shared with the export loop and the API client.
#[derive(Debug, Clone)]
pub struct Interrupt {
    receiver: watch::Receiver<bool>,
}

impl Interrupt {
    /// Whether Ctrl-C has been received.
    pub fn is_set(&self) -> bool {
        *self.receiver.borrow()
    }

    /// A receiver that turns true on Ctrl-C, for cancelling requests.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.receiver.clone()
    }
}

/// Installs the Ctrl-C handler on `runtime`.
///
/// The first Ctrl-C sets the [`Interrupt`] so the export stops at the next
/// record and any request in flight is abandoned. A second one exits
/// immediately.
pub fn watch_interrupt(runtime: &Runtime) -> Interrupt {
    let (sender, receiver) = watch::channel(false);

    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        debug!("Received Ctrl-C");
        sender.send_replace(true);

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("process terminated by user");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    Interrupt { receiver }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_starts_clear() {
        let runtime = create_tokio_runtime().unwrap();
        let interrupt = watch_interrupt(&runtime);

        assert!(!interrupt.is_set());
        assert!(!*interrupt.subscribe().borrow());
    }
}
