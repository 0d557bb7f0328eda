//! Signal sender handle for external code

use eyre::Result;
use tokio::sync::mpsc;
use tracing::debug;

use super::messages::Signal;
use crate::domain::ViewId;

/// Default signal inbox capacity
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Create a signal inbox for [`super::Coordinator::run`]
pub fn signal_channel(capacity: usize) -> (SignalSender, mpsc::Receiver<Signal>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (SignalSender { tx }, rx)
}

/// Handle used by UI code, widgets and timers to deliver signals
///
/// Cheap to clone. The inbox closes once every sender is dropped.
#[derive(Clone, Debug)]
pub struct SignalSender {
    tx: mpsc::Sender<Signal>,
}

impl SignalSender {
    /// Deliver a signal, waiting for inbox space
    pub async fn send(&self, signal: Signal) -> Result<()> {
        debug!(signal = signal.kind(), "SignalSender::send");
        self.tx
            .send(signal)
            .await
            .map_err(|_| eyre::eyre!("Coordinator channel closed"))
    }

    /// Deliver a signal without waiting; fails if the inbox is full or closed
    pub fn try_send(&self, signal: Signal) -> Result<()> {
        debug!(signal = signal.kind(), "SignalSender::try_send");
        self.tx.try_send(signal).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => eyre::eyre!("Coordinator inbox full"),
            mpsc::error::TrySendError::Closed(_) => eyre::eyre!("Coordinator channel closed"),
        })
    }

    /// Request a refresh of one view
    pub async fn refresh_requested(&self, view_id: &ViewId) -> Result<()> {
        self.send(Signal::RefreshRequested {
            view_id: view_id.clone(),
        })
        .await
    }

    /// Whether the coordinator's inbox has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
