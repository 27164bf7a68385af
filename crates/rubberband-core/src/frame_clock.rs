use crate::runtime::RuntimeHandle;
use crate::FrameCallbackId;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Frame source for animations. Every awaiting task resumes once per frame.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    /// Runs `callback` with the next frame timestamp unless the registration is dropped first.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        FrameCallbackRegistration {
            id: self.runtime.register_frame_callback(callback),
            runtime: self.runtime.clone(),
        }
    }

    /// Resolves with the timestamp of the next frame.
    ///
    /// If the runtime has been dropped the future never resolves; callers
    /// owning long loops should treat a dead runtime as cancellation.
    pub fn next_frame(&self) -> NextFrame {
        NextFrame {
            clock: self.clone(),
            slot: Rc::new(FrameSlot::default()),
            registration: None,
        }
    }
}

/// Keeps a frame callback alive. Dropping or cancelling it unregisters the callback.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    /// False when the runtime was already gone at registration time.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        self.unregister();
    }

    // Called once the callback has fired and there is nothing left to remove.
    fn disarm(mut self) {
        self.id = None;
    }

    fn unregister(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.unregister();
    }
}

#[derive(Default)]
struct FrameSlot {
    time: Cell<Option<u64>>,
    waker: RefCell<Option<Waker>>,
}

/// Future returned by [`FrameClock::next_frame`].
pub struct NextFrame {
    clock: FrameClock,
    slot: Rc<FrameSlot>,
    registration: Option<FrameCallbackRegistration>,
}

impl Future for NextFrame {
    type Output = u64;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(time) = self.slot.time.get() {
            if let Some(registration) = self.registration.take() {
                registration.disarm();
            }
            return Poll::Ready(time);
        }

        *self.slot.waker.borrow_mut() = Some(cx.waker().clone());
        if self.registration.is_none() {
            let slot = Rc::downgrade(&self.slot);
            let registration = self.clock.with_frame_nanos(move |time| {
                let Some(slot) = slot.upgrade() else {
                    return;
                };
                slot.time.set(Some(time));
                let waker = slot.waker.borrow_mut().take();
                if let Some(waker) = waker {
                    waker.wake();
                }
            });
            self.registration = Some(registration);
        }
        Poll::Pending
    }
}
