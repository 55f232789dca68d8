// Segment geometry: pixel rects and sprite frames from a 3-coordinate window
//
// Segment `i` of a worm occupies the cell of `positions[i]`. Its window is
// (positions[i-1], positions[i], positions[i+1]); the previous coordinate is
// absent for the head.
use glam::{I64Vec2, Vec2};
use protocol::Position;

/// Which part of the worm a segment renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Head,
    Body,
    Tail,
}

/// Base sprites in the animation sheet, one column each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Head = 0,
    Straight = 1,
    Corner = 2,
    Tail = 3,
}

/// Discrete sprite/rotation selector for a segment.
///
/// Directions follow the head-to-tail traversal: `HeadDown` means the body
/// lies below the head, `TailLeft` means the tail trails off to the left.
/// Corners are named after the two sides their neighbours sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteFrame {
    HeadUp,
    HeadRight,
    HeadDown,
    HeadLeft,
    Horizontal,
    Vertical,
    CornerUpLeft,
    CornerUpRight,
    CornerDownLeft,
    CornerDownRight,
    TailUp,
    TailRight,
    TailDown,
    TailLeft,
}

impl SpriteFrame {
    pub const ALL: [SpriteFrame; 14] = [
        SpriteFrame::HeadUp,
        SpriteFrame::HeadRight,
        SpriteFrame::HeadDown,
        SpriteFrame::HeadLeft,
        SpriteFrame::Horizontal,
        SpriteFrame::Vertical,
        SpriteFrame::CornerUpLeft,
        SpriteFrame::CornerUpRight,
        SpriteFrame::CornerDownLeft,
        SpriteFrame::CornerDownRight,
        SpriteFrame::TailUp,
        SpriteFrame::TailRight,
        SpriteFrame::TailDown,
        SpriteFrame::TailLeft,
    ];

    /// Stable index into the animation table.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Base sprite drawn for this frame.
    pub fn sprite(self) -> Sprite {
        use SpriteFrame::*;
        match self {
            HeadUp | HeadRight | HeadDown | HeadLeft => Sprite::Head,
            Horizontal | Vertical => Sprite::Straight,
            CornerUpLeft | CornerUpRight | CornerDownLeft | CornerDownRight => Sprite::Corner,
            TailUp | TailRight | TailDown | TailLeft => Sprite::Tail,
        }
    }

    /// Clockwise rotation applied to the base sprite.
    ///
    /// Base sprites are drawn as `HeadDown`, `Vertical`, `CornerDownRight`
    /// and `TailDown`.
    pub fn rotation_deg(self) -> f32 {
        use SpriteFrame::*;
        match self {
            HeadDown | Vertical | CornerDownRight | TailDown => 0.0,
            HeadLeft | Horizontal | CornerDownLeft | TailLeft => 90.0,
            HeadUp | CornerUpLeft | TailUp => 180.0,
            HeadRight | CornerUpRight | TailRight => 270.0,
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Visual outcome of the orientation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Visible(SpriteFrame),
    /// Two consecutive identical coordinates: the worm has not grown into
    /// this segment yet.
    Hidden,
    /// Offsets the table does not cover. The caller keeps its last frame.
    Unrecognized,
}

/// Window of three consecutive coordinates around one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub prev: Option<Position>,
    pub curr: Position,
    pub next: Option<Position>,
}

impl Window {
    /// Window for segment `index` of `positions`. `None` past the end.
    pub fn around(positions: &[Position], index: usize) -> Option<Self> {
        let curr = *positions.get(index)?;
        Some(Self {
            prev: index.checked_sub(1).and_then(|i| positions.get(i)).copied(),
            curr,
            next: positions.get(index + 1).copied(),
        })
    }

    /// `curr - prev`, when there is a previous coordinate.
    fn from_prev(&self) -> Option<I64Vec2> {
        self.prev.map(|p| wide(self.curr) - wide(p))
    }

    /// `curr - next`, when there is a next coordinate.
    fn from_next(&self) -> Option<I64Vec2> {
        self.next.map(|n| wide(self.curr) - wide(n))
    }
}

/// Widen a coordinate so differences of any two `i32` values fit.
fn wide(p: Position) -> I64Vec2 {
    I64Vec2::new(p.x as i64, p.y as i64)
}

/// Everything a segment drawable needs for one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub orientation: Orientation,
}

/// Offsets `(curr.X-prev.X, curr.Y-prev.Y, curr.X-next.X, curr.Y-next.Y)`.
type Offsets = (i64, i64, i64, i64);

/// Body lookup: both neighbours present.
const BODY_FRAMES: [(Offsets, SpriteFrame); 12] = [
    ((1, 0, -1, 0), SpriteFrame::Horizontal),
    ((-1, 0, 1, 0), SpriteFrame::Horizontal),
    ((0, 1, 0, -1), SpriteFrame::Vertical),
    ((0, -1, 0, 1), SpriteFrame::Vertical),
    // prev above / left
    ((0, 1, 1, 0), SpriteFrame::CornerUpLeft),
    ((1, 0, 0, 1), SpriteFrame::CornerUpLeft),
    // prev above / right
    ((0, 1, -1, 0), SpriteFrame::CornerUpRight),
    ((-1, 0, 0, 1), SpriteFrame::CornerUpRight),
    // prev below / left
    ((0, -1, 1, 0), SpriteFrame::CornerDownLeft),
    ((1, 0, 0, -1), SpriteFrame::CornerDownLeft),
    // prev below / right
    ((0, -1, -1, 0), SpriteFrame::CornerDownRight),
    ((-1, 0, 0, -1), SpriteFrame::CornerDownRight),
];

/// Head lookup on `curr - next` only.
const HEAD_FRAMES: [((i64, i64), SpriteFrame); 4] = [
    ((0, 1), SpriteFrame::HeadUp),
    ((-1, 0), SpriteFrame::HeadRight),
    ((0, -1), SpriteFrame::HeadDown),
    ((1, 0), SpriteFrame::HeadLeft),
];

/// Tail lookup on `curr - next` only: the tail points at the final coordinate.
const TAIL_FRAMES: [((i64, i64), SpriteFrame); 4] = [
    ((0, 1), SpriteFrame::TailUp),
    ((-1, 0), SpriteFrame::TailRight),
    ((0, -1), SpriteFrame::TailDown),
    ((1, 0), SpriteFrame::TailLeft),
];

/// Look up the orientation for a window rendered as `kind`.
pub fn orientation(kind: SegmentKind, window: &Window) -> Orientation {
    let from_prev = window.from_prev();
    let from_next = window.from_next();

    if from_prev == Some(I64Vec2::ZERO) || from_next == Some(I64Vec2::ZERO) {
        return Orientation::Hidden;
    }

    let frame = match (kind, from_prev, from_next) {
        (SegmentKind::Head, _, Some(n)) => lookup_end(&HEAD_FRAMES, n),
        (SegmentKind::Tail, _, Some(n)) => lookup_end(&TAIL_FRAMES, n),
        (SegmentKind::Body, Some(p), Some(n)) => BODY_FRAMES
            .iter()
            .find(|(key, _)| *key == (p.x, p.y, n.x, n.y))
            .map(|(_, frame)| *frame),
        _ => None,
    };

    frame.map_or(Orientation::Unrecognized, Orientation::Visible)
}

fn lookup_end(table: &[((i64, i64), SpriteFrame); 4], offset: I64Vec2) -> Option<SpriteFrame> {
    table
        .iter()
        .find(|(key, _)| *key == (offset.x, offset.y))
        .map(|(_, frame)| *frame)
}

/// Pixel rectangle for a window rendered as `kind`.
///
/// The origin is `min(curr, next)` per axis, plus one when `curr` is the
/// larger coordinate, scaled by the cell size. For adjacent cells this is
/// always the cell of `curr`. Head and tail caps add half a cell toward the
/// body along the travel axis: the head toward `next`, the tail toward
/// `prev`. Steps that are not one cell long get no cap.
pub fn rect(cell_size: f32, kind: SegmentKind, window: &Window) -> Rect {
    let curr = window.curr;
    let next = window.next.unwrap_or(curr);

    let axis_origin = |c: i32, n: i32| -> f32 {
        // `c > n` rules out `n == i32::MAX`.
        let cell = if c > n { n + 1 } else { c.min(n) };
        cell as f32 * cell_size
    };

    let mut origin = Vec2::new(axis_origin(curr.x, next.x), axis_origin(curr.y, next.y));
    let mut size = Vec2::splat(cell_size);

    let body_side = match kind {
        SegmentKind::Head => window.next,
        SegmentKind::Tail => window.prev,
        SegmentKind::Body => None,
    };
    let toward = body_side.map(|b| wide(b) - wide(curr));
    let half = cell_size * 0.5;

    match toward.map(|t| (t.x, t.y)) {
        Some((1, 0)) => size.x += half,
        Some((-1, 0)) => {
            size.x += half;
            origin.x -= half;
        }
        Some((0, 1)) => size.y += half,
        Some((0, -1)) => {
            size.y += half;
            origin.y -= half;
        }
        _ => {}
    }

    Rect { origin, size }
}

/// Resolve rect and orientation for one segment.
pub fn resolve(cell_size: f32, kind: SegmentKind, window: &Window) -> Placement {
    Placement {
        rect: rect(cell_size, kind, window),
        orientation: orientation(kind, window),
    }
}
