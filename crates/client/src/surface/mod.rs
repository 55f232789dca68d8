// Rendering-surface seam: the primitives the worm core drives
//
// The browser implements this with a canvas (`render::CanvasSurface`); tests
// and the native binary use the retained in-memory `Scene`.
mod scene;

pub use scene::{Node, NodeId, Scene};

use crate::geometry::{Rect, SegmentKind, SpriteFrame};
use std::fmt;

/// RGB color of a worm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// A retained-mode 2D surface that owns drawables on behalf of worms.
///
/// Calls with a handle that was already destroyed are ignored.
pub trait Surface {
    type Handle: Copy + Eq + fmt::Debug;

    /// Create a drawable. New drawables start hidden.
    fn create_segment(&mut self, kind: SegmentKind, color: Color) -> Self::Handle;

    fn set_kind(&mut self, handle: Self::Handle, kind: SegmentKind);

    fn set_rect(&mut self, handle: Self::Handle, rect: Rect);

    fn set_orientation(&mut self, handle: Self::Handle, frame: SpriteFrame);

    fn set_visible(&mut self, handle: Self::Handle, visible: bool);

    /// Move a drawable to the top of the z-order.
    fn raise(&mut self, handle: Self::Handle);

    fn destroy(&mut self, handle: Self::Handle);

    /// Resize the stage in pixels. Does not redraw.
    fn set_stage_size(&mut self, width: f32, height: f32);

    /// Show or hide the board grid overlay.
    fn set_grid(&mut self, visible: bool, cell_size: f32, cols: u32, rows: u32);

    /// Ask for the surface to be repainted. Calls are coalesced.
    fn request_redraw(&mut self);
}
