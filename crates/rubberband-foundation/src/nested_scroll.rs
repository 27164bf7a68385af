//! Nested scroll chain.
//!
//! Every participant owns a [`NestedScrollNode`]. A node is attached to the
//! node of its nearest scrolling ancestor and forwards to it through a
//! [`NestedScrollDispatcher`]. Nodes never propagate on their own: each
//! connection decides whether to offer an amount to its parent and how to
//! combine the parent's answer with its own, so a connection can opt out of
//! propagation entirely.
//!
//! All amounts are in pointer direction: dragging a finger down produces a
//! positive `y`.

use std::cell::RefCell;
use std::fmt;
use std::future::{ready, Future};
use std::pin::Pin;
use std::rc::{Rc, Weak};

use rubberband_ui_graphics::{Offset, Velocity};

/// Future returned by the fling hooks. Resolves to the consumed velocity.
pub type FlingFuture<'a> = Pin<Box<dyn Future<Output = Velocity> + 'a>>;

/// Where a scroll delta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NestedScrollSource {
    /// A finger or pointer dragging the content.
    Drag,
    /// Frames of a running fling, dispatched by the scrollable itself.
    Fling,
}

/// Participant in the nested scroll chain.
///
/// Every hook returns the part of the offered amount the participant consumed.
/// Defaults consume nothing.
pub trait NestedScrollConnection {
    /// Offered before the child scrolls.
    fn on_pre_scroll(&self, _available: Offset, _source: NestedScrollSource) -> Offset {
        Offset::ZERO
    }

    /// Offered after the child scrolled, with whatever it left over.
    fn on_post_scroll(
        &self,
        _consumed: Offset,
        _available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        Offset::ZERO
    }

    /// Offered before the child flings.
    fn on_pre_fling(&self, _available: Velocity) -> FlingFuture<'_> {
        Box::pin(ready(Velocity::ZERO))
    }

    /// Offered after the child's fling ended, with its leftover velocity.
    fn on_post_fling(&self, _consumed: Velocity, _available: Velocity) -> FlingFuture<'_> {
        Box::pin(ready(Velocity::ZERO))
    }
}

/// A connection that consumes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpConnection;

impl NestedScrollConnection for NoOpConnection {}

type ParentSlot = Rc<RefCell<Option<Weak<NestedScrollNode>>>>;

/// Sends amounts to the parent of the node it was taken from.
///
/// Cloned dispatchers share the parent slot, so re-attaching the node
/// redirects every clone. Without a live parent every dispatch consumes zero.
#[derive(Clone, Default)]
pub struct NestedScrollDispatcher {
    parent: ParentSlot,
}

impl NestedScrollDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(&self) -> Option<Rc<NestedScrollNode>> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    pub fn dispatch_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        match self.parent() {
            Some(parent) => parent.on_pre_scroll(available, source),
            None => Offset::ZERO,
        }
    }

    pub fn dispatch_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        match self.parent() {
            Some(parent) => parent.on_post_scroll(consumed, available, source),
            None => Offset::ZERO,
        }
    }

    pub async fn dispatch_pre_fling(&self, available: Velocity) -> Velocity {
        let Some(parent) = self.parent() else {
            return Velocity::ZERO;
        };
        parent.on_pre_fling(available).await
    }

    pub async fn dispatch_post_fling(&self, consumed: Velocity, available: Velocity) -> Velocity {
        let Some(parent) = self.parent() else {
            return Velocity::ZERO;
        };
        parent.on_post_fling(consumed, available).await
    }
}

impl fmt::Debug for NestedScrollDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedScrollDispatcher")
            .field("has_parent", &self.has_parent())
            .finish()
    }
}

/// One link of the chain: a swappable connection plus the dispatcher to its parent.
///
/// The node holds only a weak reference upward; the tree owning the nodes
/// decides their lifetime. Dropping a parent detaches its children implicitly.
pub struct NestedScrollNode {
    connection: RefCell<Rc<dyn NestedScrollConnection>>,
    dispatcher: NestedScrollDispatcher,
}

impl NestedScrollNode {
    pub fn new(connection: Rc<dyn NestedScrollConnection>) -> Rc<Self> {
        Rc::new(Self {
            connection: RefCell::new(connection),
            dispatcher: NestedScrollDispatcher::new(),
        })
    }

    /// A node with the given dispatcher, for connections that need their
    /// dispatcher before the node exists.
    pub fn with_dispatcher(
        connection: Rc<dyn NestedScrollConnection>,
        dispatcher: NestedScrollDispatcher,
    ) -> Rc<Self> {
        Rc::new(Self {
            connection: RefCell::new(connection),
            dispatcher,
        })
    }

    pub fn attach(&self, parent: &Rc<NestedScrollNode>) {
        *self.dispatcher.parent.borrow_mut() = Some(Rc::downgrade(parent));
    }

    pub fn detach(&self) {
        self.dispatcher.parent.borrow_mut().take();
    }

    pub fn is_attached(&self) -> bool {
        self.dispatcher.has_parent()
    }

    pub fn dispatcher(&self) -> NestedScrollDispatcher {
        self.dispatcher.clone()
    }

    pub fn connection(&self) -> Rc<dyn NestedScrollConnection> {
        Rc::clone(&*self.connection.borrow())
    }

    /// Replaces the connection while keeping the node's place in the chain.
    pub fn set_connection(&self, connection: Rc<dyn NestedScrollConnection>) {
        *self.connection.borrow_mut() = connection;
    }
}

impl NestedScrollConnection for NestedScrollNode {
    fn on_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        self.connection().on_pre_scroll(available, source)
    }

    fn on_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        self.connection().on_post_scroll(consumed, available, source)
    }

    fn on_pre_fling(&self, available: Velocity) -> FlingFuture<'_> {
        let connection = self.connection();
        Box::pin(async move { connection.on_pre_fling(available).await })
    }

    fn on_post_fling(&self, consumed: Velocity, available: Velocity) -> FlingFuture<'_> {
        let connection = self.connection();
        Box::pin(async move { connection.on_post_fling(consumed, available).await })
    }
}

impl fmt::Debug for NestedScrollNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedScrollNode")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/nested_scroll_tests.rs"]
mod tests;
