//! Runtime state shared by the frame clock, the frame driver and gesture tasks.
//!
//! Everything here lives on one thread. Only the waker crosses threads, and it
//! merely asks the host scheduler for another frame.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

type FrameCallback = Box<dyn FnOnce(u64) + 'static>;
type LocalFuture = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// One-shot callbacks waiting for the next frame timestamp, in registration order.
#[derive(Default)]
struct FrameCallbacks {
    last_id: Cell<FrameCallbackId>,
    entries: RefCell<Vec<(FrameCallbackId, FrameCallback)>>,
}

impl FrameCallbacks {
    fn push(&self, callback: FrameCallback) -> FrameCallbackId {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    fn remove(&self, id: FrameCallbackId) -> Option<FrameCallback> {
        let mut entries = self.entries.borrow_mut();
        let index = entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        Some(entries.remove(index).1)
    }

    fn take_all(&self) -> Vec<FrameCallback> {
        std::mem::take(&mut *self.entries.borrow_mut())
            .into_iter()
            .map(|(_, callback)| callback)
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

struct Task {
    id: u64,
    future: LocalFuture,
}

/// Local futures polled cooperatively by [`RuntimeHandle::drain_ui`].
///
/// A poll pass moves the queued tasks out so that a running task can spawn or
/// cancel others. Cancels aimed at a task the pass currently holds are
/// remembered in `cancelled` and applied before that task is polled again or
/// put back.
#[derive(Default)]
struct TaskQueue {
    last_id: Cell<u64>,
    queued: RefCell<Vec<Task>>,
    cancelled: RefCell<Vec<u64>>,
    polling: Cell<bool>,
}

impl TaskQueue {
    fn push(&self, future: LocalFuture) -> u64 {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        self.queued.borrow_mut().push(Task { id, future });
        id
    }

    fn cancel(&self, id: u64) {
        let removed = {
            let mut queued = self.queued.borrow_mut();
            queued
                .iter()
                .position(|task| task.id == id)
                .map(|index| queued.remove(index))
        };
        if removed.is_none() && self.polling.get() {
            self.cancelled.borrow_mut().push(id);
        }
        // The future may own frame registrations whose drop reaches back into the runtime.
        drop(removed);
    }

    fn is_cancelled(&self, id: u64) -> bool {
        self.cancelled.borrow().contains(&id)
    }

    /// Polls every queued task once. Returns whether any task finished or was added.
    fn poll_pass(&self, waker: &Waker) -> bool {
        if self.polling.replace(true) {
            return false;
        }
        let mut cx = Context::from_waker(waker);
        let batch = std::mem::take(&mut *self.queued.borrow_mut());
        let mut still_pending = Vec::with_capacity(batch.len());
        let mut progressed = false;

        for mut task in batch {
            if self.is_cancelled(task.id) {
                continue;
            }
            match task.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => progressed = true,
                Poll::Pending => still_pending.push(task),
            }
        }

        self.polling.set(false);
        let cancelled = std::mem::take(&mut *self.cancelled.borrow_mut());
        let mut discarded = Vec::new();
        let spawned = std::mem::take(&mut *self.queued.borrow_mut());
        progressed |= !spawned.is_empty();
        let mut survivors = Vec::with_capacity(still_pending.len() + spawned.len());
        for task in still_pending.into_iter().chain(spawned) {
            if cancelled.contains(&task.id) {
                discarded.push(task);
            } else {
                survivors.push(task);
            }
        }
        self.queued.borrow_mut().extend(survivors);
        drop(discarded);
        progressed
    }

    fn has_pending(&self) -> bool {
        self.polling.get()
            || self
                .queued
                .try_borrow()
                .map(|queued| !queued.is_empty())
                .unwrap_or(true)
    }
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    waker: Waker,
    needs_frame: Cell<bool>,
    frame_callbacks: FrameCallbacks,
    tasks: TaskQueue,
}

impl RuntimeInner {
    fn request_frame(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn settle_frame_request(&self) {
        if self.frame_callbacks.is_empty() && !self.tasks.has_pending() {
            self.needs_frame.set(false);
        }
    }

    fn drain_ui(&self) {
        while self.tasks.poll_pass(&self.waker) {}
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        for callback in self.frame_callbacks.take_all() {
            callback(frame_time_nanos);
        }
        self.settle_frame_request();
    }
}

/// Owner of the runtime state. Dropping it turns every handle into a no-op.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let waker = futures_task::waker(Arc::new(SchedulerWaker {
            scheduler: Arc::clone(&scheduler),
        }));
        Self {
            inner: Rc::new(RuntimeInner {
                scheduler,
                waker,
                needs_frame: Cell::new(false),
                frame_callbacks: FrameCallbacks::default(),
                tasks: TaskQueue::default(),
            }),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether callbacks or tasks are waiting for the host to produce a frame.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

/// Weak reference to a [`Runtime`] handed to clocks, animations and gesture logic.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Queues `fut` on the runtime. Returns `None` once the runtime is gone.
    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        let inner = self.inner.upgrade()?;
        let id = inner.tasks.push(Box::pin(fut));
        inner.request_frame();
        Some(TaskHandle {
            id,
            runtime: self.clone(),
        })
    }

    fn cancel_task(&self, id: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.tasks.cancel(id);
            inner.settle_frame_request();
        }
    }

    /// Polls spawned tasks until none of them makes further progress.
    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.tasks.has_pending())
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        let inner = self.inner.upgrade()?;
        let id = inner.frame_callbacks.push(Box::new(callback));
        inner.request_frame();
        Some(id)
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.frame_callbacks.remove(id);
            drop(removed);
            inner.settle_frame_request();
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| !inner.frame_callbacks.is_empty())
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

/// Cancels a spawned task. Dropping the handle leaves the task running.
pub struct TaskHandle {
    id: u64,
    runtime: RuntimeHandle,
}

impl TaskHandle {
    /// Drops the task's future. Takes effect even while the task queue is mid-pass.
    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

// Holds the Send + Sync scheduler rather than the Rc'd runtime.
struct SchedulerWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl futures_task::ArcWake for SchedulerWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
