// SPDX-License-Identifier: GPL-3.0-only

//! Task queue drained by the control thread
//!
//! Background threads never run caller-supplied callbacks themselves. They
//! post them here through a [`ControlHandle`], and the thread that owns the
//! [`ControlQueue`] runs them in posting order.

use std::marker::PhantomData;
use std::thread::{self, ThreadId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

/// A unit of work to run on the control thread
pub type ControlTask = Box<dyn FnOnce() + Send + 'static>;

/// Receiving end, owned by the control thread
///
/// Not `Send`: the thread that creates the queue is the control thread for
/// its whole lifetime.
pub struct ControlQueue {
    sender: UnboundedSender<ControlTask>,
    receiver: UnboundedReceiver<ControlTask>,
    thread: ThreadId,
    _not_send: PhantomData<*const ()>,
}

/// Cloneable posting end
#[derive(Clone)]
pub struct ControlHandle {
    sender: UnboundedSender<ControlTask>,
    thread: ThreadId,
}

impl ControlQueue {
    /// Create a queue whose control thread is the calling thread
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let thread = thread::current().id();
        debug!(thread = ?thread, "Control queue created");
        Self {
            sender,
            receiver,
            thread,
            _not_send: PhantomData,
        }
    }

    pub fn handle(&self) -> ControlHandle {
        ControlHandle {
            sender: self.sender.clone(),
            thread: self.thread,
        }
    }

    /// Run every task already queued, without waiting
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(tasks = ran, "Ran pending control tasks");
        }
        ran
    }

    /// Wait for the next task and run it
    ///
    /// Never returns `false` while the queue itself holds a sender; the
    /// result exists for symmetry with channel semantics.
    pub async fn run_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Blocking form of [`run_next`](Self::run_next) for threads outside a runtime
    pub fn blocking_run_next(&mut self) -> bool {
        match self.receiver.blocking_recv() {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlHandle {
    /// Queue `task` to run on the control thread
    ///
    /// Returns `false` if the queue has been dropped; the task is discarded.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender.send(Box::new(task)).is_ok()
    }

    /// Whether the caller is running on the control thread
    pub fn is_control_thread(&self) -> bool {
        thread::current().id() == self.thread
    }
}
