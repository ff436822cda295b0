//! Graceful shutdown trigger shared by the server and whoever owns it.

use std::future::Future;

use tokio::sync::broadcast;

/// Cloneable stop switch.
///
/// Futures from [`Shutdown::signalled`] resolve once any handle calls
/// [`Shutdown::trigger`], or once every handle has been dropped.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A future the server can hand to `with_graceful_shutdown`.
    ///
    /// Registration happens here, not on first poll, so a trigger fired in
    /// between is not missed.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with nothing waiting");
        }
    }

    /// Futures from `signalled` that have not resolved yet.
    pub fn pending(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
