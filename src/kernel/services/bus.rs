//! Result channel from effect tasks back to the store owner.
//!
//! Effects never touch the store; they finish by sending an [`Action`] here
//! and the owner feeds it to `Store::dispatch`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::kernel::Action;

#[derive(Debug)]
pub enum KernelMessage {
    Action(Action),
}

#[derive(Clone)]
pub struct KernelBusSender {
    tx: Sender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: Receiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    pub fn send(&self, msg: KernelMessage) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.tx.send(msg)
    }

    /// `false` once the receiving side is gone (shell shut down mid-request).
    pub fn send_action(&self, action: Action) -> bool {
        match self.send(KernelMessage::Action(action)) {
            Ok(()) => true,
            Err(mpsc::SendError(msg)) => {
                tracing::debug!(?msg, "kernel bus closed, dropping result");
                false
            }
        }
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    /// Blocks up to `timeout` for the next result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
