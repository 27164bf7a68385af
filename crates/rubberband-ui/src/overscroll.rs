//! Overscroll decorator.
//!
//! Owns one [`OverscrollCoordinator`] per configuration and the
//! [`NestedScrollNode`] that places it in the chain. The node outlives
//! coordinator swaps, so children attached to it never notice a config change.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rubberband_core::RuntimeHandle;
use rubberband_foundation::{NestedScrollDispatcher, NestedScrollNode, Orientation};
use rubberband_ui_graphics::{IntOffset, Rect};

use crate::config::{ConfigError, OverscrollConfig};
use crate::coordinator::{OverscrollCoordinator, OverscrollPhase};

pub struct Overscroll {
    orientation: Orientation,
    runtime: RuntimeHandle,
    /// Config as passed in, before sanitizing. Key for recreation.
    requested: RefCell<OverscrollConfig>,
    coordinator: RefCell<Rc<OverscrollCoordinator>>,
    dispatcher: NestedScrollDispatcher,
    node: Rc<NestedScrollNode>,
}

impl Overscroll {
    /// Builds the decorator. Degenerate parameters are clamped with a warning.
    pub fn new(orientation: Orientation, runtime: RuntimeHandle, config: OverscrollConfig) -> Self {
        let requested = config.clone();
        let dispatcher = NestedScrollDispatcher::new();
        let coordinator = Rc::new(OverscrollCoordinator::new(
            orientation,
            config.sanitized(),
            dispatcher.clone(),
            runtime.clone(),
            0.0,
        ));
        let node = NestedScrollNode::with_dispatcher(coordinator.clone(), dispatcher.clone());
        Self {
            orientation,
            runtime,
            requested: RefCell::new(requested),
            coordinator: RefCell::new(coordinator),
            dispatcher,
            node,
        }
    }

    /// Like [`new`](Self::new) but rejects degenerate parameters.
    pub fn try_new(
        orientation: Orientation,
        runtime: RuntimeHandle,
        config: OverscrollConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(orientation, runtime, config))
    }

    pub fn vertical(runtime: RuntimeHandle, config: OverscrollConfig) -> Self {
        Self::new(Orientation::Vertical, runtime, config)
    }

    pub fn horizontal(runtime: RuntimeHandle, config: OverscrollConfig) -> Self {
        Self::new(Orientation::Horizontal, runtime, config)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> OverscrollConfig {
        self.requested.borrow().clone()
    }

    /// Rebuilds the coordinator when `config` differs by identity from the
    /// current one. The offset carries over; a running return spring stops
    /// where it is. Returns whether a rebuild happened.
    pub fn update_config(&self, config: OverscrollConfig) -> bool {
        if *self.requested.borrow() == config {
            return false;
        }

        let previous = self.coordinator();
        previous.stop_animation();
        let replacement = Rc::new(OverscrollCoordinator::new(
            self.orientation,
            config.clone().sanitized(),
            self.dispatcher.clone(),
            self.runtime.clone(),
            previous.offset(),
        ));
        self.node.set_connection(replacement.clone());
        *self.coordinator.borrow_mut() = replacement;
        *self.requested.borrow_mut() = config;
        log::debug!(
            "overscroll coordinator recreated at offset {:.2}",
            previous.offset()
        );
        true
    }

    /// Joins the chain below `parent`, usually an outer overscroll or scrollable.
    pub fn attach(&self, parent: &Rc<NestedScrollNode>) {
        self.node.attach(parent);
    }

    pub fn detach(&self) {
        self.coordinator().stop_animation();
        self.node.detach();
    }

    /// The node the decorated scrollable attaches to.
    pub fn nested_scroll_node(&self) -> Rc<NestedScrollNode> {
        Rc::clone(&self.node)
    }

    pub fn coordinator(&self) -> Rc<OverscrollCoordinator> {
        Rc::clone(&*self.coordinator.borrow())
    }

    pub fn offset(&self) -> f32 {
        self.coordinator().offset()
    }

    pub fn phase(&self) -> OverscrollPhase {
        self.coordinator().phase()
    }

    /// Layout-independent translation of the decorated content.
    pub fn translation(&self) -> IntOffset {
        self.orientation.offset_of(self.offset()).round()
    }

    /// Where the translated content shows, clipped so the stretch never
    /// reveals anything outside `viewport`.
    pub fn content_bounds(&self, viewport: Rect) -> Rect {
        let translation = self.translation();
        viewport
            .translate(translation.x as f32, translation.y as f32)
            .intersect(&viewport)
    }
}

impl fmt::Debug for Overscroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overscroll")
            .field("orientation", &self.orientation)
            .field("coordinator", &*self.coordinator.borrow())
            .field("node", &self.node)
            .finish()
    }
}

impl Drop for Overscroll {
    fn drop(&mut self) {
        self.coordinator.borrow().stop_animation();
    }
}

#[cfg(test)]
#[path = "tests/overscroll_tests.rs"]
mod tests;
