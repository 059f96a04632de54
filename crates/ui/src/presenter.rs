use services::{EventSink, PresenterEvent};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

/// Presenter that forwards every call to the UI event loop.
#[derive(Clone)]
pub struct ChannelPresenter {
    tx: UnboundedSender<PresenterEvent>,
}

impl EventSink for ChannelPresenter {
    fn emit(&self, event: PresenterEvent) {
        if self.tx.send(event).is_err() {
            debug!("ui event loop is gone; presenter event dropped");
        }
    }
}

/// A presenter and the receiving end the UI drains.
#[must_use]
pub fn channel() -> (ChannelPresenter, UnboundedReceiver<PresenterEvent>) {
    let (tx, rx) = unbounded_channel();
    (ChannelPresenter { tx }, rx)
}
