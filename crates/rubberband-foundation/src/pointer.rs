//! Pointer input records as delivered by the host's gesture system.

use rubberband_ui_graphics::Offset;

pub type PointerId = u64;

/// A sub-frame sample reported between the previous and current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoricalChange {
    pub uptime_ms: i64,
    pub position: Offset,
}

/// One pointer's state change between two input frames.
///
/// `historical` samples are ordered oldest first and lie strictly between
/// `previous_position` and `position`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInputChange {
    pub id: PointerId,
    pub uptime_ms: i64,
    pub position: Offset,
    pub pressed: bool,
    pub previous_uptime_ms: i64,
    pub previous_position: Offset,
    pub previous_pressed: bool,
    pub historical: Vec<HistoricalChange>,
}

impl PointerInputChange {
    /// The first change of a gesture: the pointer just went down at `position`.
    pub fn down(id: PointerId, uptime_ms: i64, position: Offset) -> Self {
        Self {
            id,
            uptime_ms,
            position,
            pressed: true,
            previous_uptime_ms: uptime_ms,
            previous_position: position,
            previous_pressed: false,
            historical: Vec::new(),
        }
    }

    /// The change that follows `self` with the pointer still pressed.
    pub fn move_to(&self, uptime_ms: i64, position: Offset) -> Self {
        Self {
            id: self.id,
            uptime_ms,
            position,
            pressed: true,
            previous_uptime_ms: self.uptime_ms,
            previous_position: self.position,
            previous_pressed: self.pressed,
            historical: Vec::new(),
        }
    }

    /// The change that lifts the pointer at `position`.
    pub fn up(&self, uptime_ms: i64, position: Offset) -> Self {
        Self {
            pressed: false,
            ..self.move_to(uptime_ms, position)
        }
    }

    pub fn with_historical(mut self, historical: Vec<HistoricalChange>) -> Self {
        self.historical = historical;
        self
    }

    pub fn changed_to_down(&self) -> bool {
        self.pressed && !self.previous_pressed
    }

    pub fn position_change(&self) -> Offset {
        self.position - self.previous_position
    }
}
