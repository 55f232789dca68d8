// Worm entity: one worm's segment pool, re-derived from its positions on every update
use protocol::{Position, WormId};
use tracing::{debug, warn};

use crate::error::FlowError;
use crate::geometry::{self, Orientation, Rect, SegmentKind, SpriteFrame, Window};
use crate::surface::{Color, Surface};

/// One renderable unit of a worm's body.
#[derive(Debug, Clone)]
pub struct Segment<H> {
    pub drawable: H,
    pub kind: SegmentKind,
    /// Last frame the lookup table produced. Kept across unrecognized windows.
    pub frame: Option<SpriteFrame>,
    pub rect: Option<Rect>,
    pub visible: bool,
}

/// A worm and the drawables it owns.
///
/// The segment pool only grows: segments are reusable capacity, and
/// `len(segments) >= len(positions) - 1` holds after every update.
#[derive(Debug)]
pub struct Worm<H> {
    id: WormId,
    serial: u64,
    color: Color,
    segments: Vec<Segment<H>>,
    positions: Vec<Position>,
    released: bool,
}

impl<H: Copy + Eq + std::fmt::Debug> Worm<H> {
    pub fn new(id: WormId, serial: u64, color: Color) -> Self {
        Self {
            id,
            serial,
            color,
            segments: Vec::new(),
            positions: Vec::new(),
            released: false,
        }
    }

    pub fn id(&self) -> &WormId {
        &self.id
    }

    /// Creation order within the registry. A worm recreated after a kill
    /// gets a new serial.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn segments(&self) -> &[Segment<H>] {
        &self.segments
    }

    /// Size of the segment pool (visible or not).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Last positions received, head first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Grow the pool to at least `n` drawables. Never shrinks.
    pub fn ensure_segment_count<S>(&mut self, surface: &mut S, n: usize)
    where
        S: Surface<Handle = H>,
    {
        if self.segments.len() >= n {
            return;
        }

        for i in self.segments.len()..n {
            let kind = if i == 0 { SegmentKind::Head } else { SegmentKind::Body };
            let drawable = surface.create_segment(kind, self.color);
            surface.set_visible(drawable, false);
            self.segments.push(Segment {
                drawable,
                kind,
                frame: None,
                rect: None,
                visible: false,
            });
        }

        // Head stays above the rest of the body.
        surface.raise(self.segments[0].drawable);
        debug!("worm {} grew to {} segments", self.id, self.segments.len());
    }

    /// Re-derive every segment from a full coordinate list and request one redraw.
    pub fn apply_positions<S>(
        &mut self,
        surface: &mut S,
        cell_size: f32,
        positions: &[Position],
    ) -> Result<(), FlowError>
    where
        S: Surface<Handle = H>,
    {
        if self.released {
            return Err(FlowError::Released { id: self.id.clone() });
        }
        if positions.is_empty() {
            return Err(FlowError::EmptyPositions { id: self.id.clone() });
        }

        let count = positions.len() - 1;
        self.ensure_segment_count(surface, count);

        for i in 0..count {
            let kind = if i == 0 {
                SegmentKind::Head
            } else if i == count - 1 {
                SegmentKind::Tail
            } else {
                SegmentKind::Body
            };
            // `i + 1 < positions.len()`, so the window always exists.
            let Some(window) = Window::around(positions, i) else {
                break;
            };
            let placement = geometry::resolve(cell_size, kind, &window);
            self.update_segment(surface, i, kind, placement);
        }

        // Leftovers from a longer earlier update.
        for segment in self.segments.iter_mut().skip(count) {
            if segment.visible {
                surface.set_visible(segment.drawable, false);
                segment.visible = false;
            }
        }

        self.positions.clear();
        self.positions.extend_from_slice(positions);
        surface.request_redraw();
        Ok(())
    }

    fn update_segment<S>(
        &mut self,
        surface: &mut S,
        index: usize,
        kind: SegmentKind,
        placement: geometry::Placement,
    ) where
        S: Surface<Handle = H>,
    {
        let id = &self.id;
        let segment = &mut self.segments[index];

        if segment.kind != kind {
            surface.set_kind(segment.drawable, kind);
            segment.kind = kind;
        }
        surface.set_rect(segment.drawable, placement.rect);
        segment.rect = Some(placement.rect);

        match placement.orientation {
            Orientation::Visible(frame) => {
                if segment.frame != Some(frame) {
                    surface.set_orientation(segment.drawable, frame);
                    segment.frame = Some(frame);
                }
                if !segment.visible {
                    surface.set_visible(segment.drawable, true);
                    segment.visible = true;
                }
            }
            Orientation::Hidden => {
                if segment.visible {
                    surface.set_visible(segment.drawable, false);
                    segment.visible = false;
                }
            }
            Orientation::Unrecognized => {
                warn!(
                    "worm {} segment {}: unexpected step {:?}, keeping frame {:?}",
                    id, index, placement.rect, segment.frame
                );
            }
        }
    }

    /// Destroy every owned drawable. Idempotent.
    pub fn release<S>(&mut self, surface: &mut S)
    where
        S: Surface<Handle = H>,
    {
        if self.released {
            return;
        }
        for segment in self.segments.drain(..) {
            surface.destroy(segment.drawable);
        }
        self.positions.clear();
        self.released = true;
        surface.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{NodeId, Scene};

    fn cells(points: &[(i32, i32)]) -> Vec<Position> {
        points.iter().map(|&p| Position::from(p)).collect()
    }

    fn worm() -> Worm<NodeId> {
        Worm::new(WormId::from("w1"), 1, Color::new(10, 20, 30))
    }

    #[test]
    fn test_ensure_segment_count_only_grows() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.ensure_segment_count(&mut scene, 3);
        assert_eq!(w.segment_count(), 3);
        w.ensure_segment_count(&mut scene, 1);
        assert_eq!(w.segment_count(), 3);
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.visible_count(), 0);
        // Head raised above the body.
        assert_eq!(scene.top(), Some(w.segments()[0].drawable));
    }

    #[test]
    fn test_straight_worm_geometry() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(0, 0), (0, 1), (0, 2)]))
            .unwrap();

        let segments = w.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, SegmentKind::Head);
        assert_eq!(segments[0].frame, Some(SpriteFrame::HeadDown));
        assert_eq!(segments[1].kind, SegmentKind::Tail);
        assert_eq!(segments[1].frame, Some(SpriteFrame::TailDown));

        // Cells start on multiples of 10; caps add half a cell toward the body.
        assert_eq!(segments[0].rect, Some(Rect::new(0.0, 0.0, 10.0, 15.0)));
        assert_eq!(segments[1].rect, Some(Rect::new(0.0, 5.0, 10.0, 15.0)));

        for segment in segments {
            let rect = segment.rect.unwrap();
            assert_eq!(rect.origin.x % 10.0, 0.0);
            let node = scene.node(segment.drawable).unwrap();
            assert!(node.visible);
            assert_eq!(node.rect, Some(rect));
            assert_eq!(node.frame, segment.frame);
        }
        assert_eq!(scene.redraw_requests(), 1);
    }

    #[test]
    fn test_corner_body_segment() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(2, 0), (1, 0), (1, 1), (1, 2)]))
            .unwrap();
        let frames: Vec<_> = w.segments().iter().map(|s| s.frame).collect();
        assert_eq!(
            frames,
            vec![
                Some(SpriteFrame::HeadLeft),
                Some(SpriteFrame::CornerDownRight),
                Some(SpriteFrame::TailDown),
            ]
        );
        assert_eq!(w.segments()[1].kind, SegmentKind::Body);
    }

    #[test]
    fn test_single_position_has_no_segments() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(4, 4)])).unwrap();
        assert_eq!(w.segment_count(), 0);
        assert_eq!(w.positions(), cells(&[(4, 4)]).as_slice());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_empty_positions_rejected() {
        let mut scene = Scene::new();
        let mut w = worm();
        let err = w.apply_positions(&mut scene, 10.0, &[]).unwrap_err();
        assert!(matches!(err, FlowError::EmptyPositions { .. }));
        assert_eq!(scene.redraw_requests(), 0);
    }

    #[test]
    fn test_spawned_worm_is_hidden() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(5, 5), (5, 5)])).unwrap();
        assert_eq!(w.segment_count(), 1);
        assert!(!w.segments()[0].visible);
        assert_eq!(scene.visible_count(), 0);
    }

    #[test]
    fn test_shorter_update_hides_surplus_segments() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(0, 0), (1, 0), (2, 0), (3, 0)]))
            .unwrap();
        assert_eq!(scene.visible_count(), 3);

        w.apply_positions(&mut scene, 10.0, &cells(&[(0, 1), (0, 0)])).unwrap();
        assert_eq!(w.segment_count(), 3);
        assert_eq!(scene.visible_count(), 1);
        assert_eq!(w.segments()[0].frame, Some(SpriteFrame::HeadUp));
    }

    #[test]
    fn test_pool_never_shrinks_across_updates() {
        let mut scene = Scene::new();
        let mut w = worm();
        let mut previous = 0;
        for len in [2usize, 5, 3, 1, 6, 4] {
            let positions: Vec<Position> = (0..len as i32).map(|x| Position::new(x, 0)).collect();
            w.apply_positions(&mut scene, 10.0, &positions).unwrap();
            assert!(w.segment_count() >= previous);
            assert!(w.segment_count() >= len - 1);
            previous = w.segment_count();
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn test_unrecognized_step_keeps_previous_frame() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(1, 0), (1, 1), (1, 2)]))
            .unwrap();
        assert_eq!(w.segments()[0].frame, Some(SpriteFrame::HeadDown));

        // Head jumps across the board.
        w.apply_positions(&mut scene, 10.0, &cells(&[(9, 0), (1, 1), (1, 2)]))
            .unwrap();
        let head = &w.segments()[0];
        assert_eq!(head.frame, Some(SpriteFrame::HeadDown));
        assert!(head.visible);
        assert_eq!(head.rect.unwrap().origin.x, 20.0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut scene = Scene::new();
        let mut w = worm();
        w.apply_positions(&mut scene, 10.0, &cells(&[(0, 0), (0, 1), (0, 2)]))
            .unwrap();
        w.release(&mut scene);
        assert!(w.is_released());
        assert!(scene.is_empty());
        assert_eq!(scene.destroyed(), 2);

        w.release(&mut scene);
        assert_eq!(scene.destroyed(), 2);

        let err = w
            .apply_positions(&mut scene, 10.0, &cells(&[(0, 0), (0, 1)]))
            .unwrap_err();
        assert!(matches!(err, FlowError::Released { .. }));
    }
}
