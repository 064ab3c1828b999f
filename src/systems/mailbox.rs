//! Callback-to-system bridge
//!
//! Engine components report through plain callbacks. A [`Mailbox`] owns
//! the receiving half of an unbounded channel; callbacks hold a clone of
//! the sender and the draining system empties the receiver later in the
//! frame.

use tokio::sync::mpsc;

#[derive(Debug)]
pub struct Mailbox<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl<T> Mailbox<T> {
    /// A sender for a callback to move into its closure
    pub fn sender(&self) -> mpsc::UnboundedSender<T> {
        self.tx.clone()
    }

    pub fn post(&self, value: T) {
        // The receiver lives as long as the mailbox, so this cannot fail
        let _ = self.tx.send(value);
    }

    /// Everything posted since the last drain, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::new();
        while let Ok(value) = self.rx.try_recv() {
            values.push(value);
        }
        values
    }

    /// Only the most recent value, discarding the rest
    pub fn latest(&mut self) -> Option<T> {
        let mut latest = None;
        while let Ok(value) = self.rx.try_recv() {
            latest = Some(value);
        }
        latest
    }
}
