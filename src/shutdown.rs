use std::future::Future;
use tokio::{signal, sync::watch};

/// Process-wide shutdown signal, fanned out to the server and the model task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

impl Shutdown {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        let handle = register_handlers();

        let signal_sender = sender.clone();
        tokio::spawn(async move {
            handle.await;
            signal_sender.send_replace(true);
        });

        Self { sender }
    }

    /// Resolves once shutdown has been requested.
    pub fn handle(&self) -> impl Future<Output = ()> {
        let mut receiver = self.sender.subscribe();

        async move {
            while !*receiver.borrow_and_update() {
                if receiver.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    pub fn start(&self) {
        self.sender.send_replace(true);
    }
}

fn register_handlers() -> impl Future<Output = ()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    async {
        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        tracing::info!("Received shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_resolves_after_start() {
        let shutdown = Shutdown::new();
        let handle = shutdown.handle();

        shutdown.start();
        handle.await;
    }
}
