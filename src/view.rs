//! Per-tile zoom and pan state.
//!
//! A tile is in one of three modes:
//! - `Idle`: scale 1, offset (0, 0)
//! - `Zoomed`: scale in (1, 3], resting offset
//! - `Dragging`: zoomed with a live [`DragSession`]
//!
//! Zoom is anchored at the image centre, not at the pointer.

use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 3.0;

/// Scale change per unit of wheel `deltaY` (browser convention, positive = down).
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.0015;

/// Exponential approach rate of the displayed transform, per second.
pub const TRANSITION_SPEED: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    Idle,
    Zoomed,
    Dragging,
}

/// An in-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer_start: Pos2,
    pub base_offset: Vec2,
}

impl DragSession {
    /// Offset for the current pointer position: `base + (current - start)`.
    #[must_use]
    pub fn offset_at(&self, current: Pos2) -> Vec2 {
        self.base_offset + (current - self.pointer_start)
    }
}

/// Scale and pan offset (offset in screen pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        scale: MIN_SCALE,
        offset: Vec2::ZERO,
    };

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Translation in pre-scale units, as applied after `scale(s)`.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.offset / self.scale
    }

    /// Places `display` (the untransformed image rect) on screen.
    ///
    /// Scaling happens about the rect centre, then the pre-scale translation
    /// is scaled back up, so the offset lands 1:1 in screen pixels.
    #[must_use]
    pub fn place(&self, display: Rect) -> Rect {
        let center = display.center() + self.translation() * self.scale;
        Rect::from_center_size(center, display.size() * self.scale)
    }

    /// Moves `self` towards `target` by one frame of ease-out.
    pub fn approach(&mut self, target: ViewTransform, dt: f32) -> bool {
        let t = (TRANSITION_SPEED * dt).min(1.0);
        let ds = target.scale - self.scale;
        let doff = target.offset - self.offset;
        if ds.abs() < 0.001 && doff.length() < 0.1 {
            *self = target;
            return false;
        }
        self.scale += ds * t;
        self.offset += doff * t;
        true
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Zoom, pan and drag state owned by one tile.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    transform: ViewTransform,
    drag: Option<DragSession>,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.transform.offset
    }

    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    #[must_use]
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> TileMode {
        if self.drag.is_some() {
            TileMode::Dragging
        } else if self.transform.scale > MIN_SCALE {
            TileMode::Zoomed
        } else {
            TileMode::Idle
        }
    }

    /// Applies one wheel event. Returning to scale 1 recentres the image and
    /// ends any drag in progress.
    pub fn wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        let next = (self.transform.scale - delta_y * WHEEL_ZOOM_SENSITIVITY)
            .clamp(MIN_SCALE, MAX_SCALE);
        self.transform.scale = next;
        if next == MIN_SCALE {
            self.transform.offset = Vec2::ZERO;
            self.drag = None;
        }
    }

    /// Starts a drag. Only allowed while zoomed in.
    pub fn pointer_down(&mut self, pos: Pos2) -> bool {
        if self.transform.scale <= MIN_SCALE {
            return false;
        }
        self.drag = Some(DragSession {
            pointer_start: pos,
            base_offset: self.transform.offset,
        });
        true
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        if let Some(session) = &self.drag {
            self.transform.offset = session.offset_at(pos);
        }
    }

    /// Ends the drag; the last offset becomes the resting offset.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}
