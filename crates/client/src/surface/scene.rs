//! Retained in-memory scene.
//!
//! Records every primitive the core issues, so it serves both as the native
//! binary's surface and as the test double for the core.

use super::{Color, Surface};
use crate::geometry::{Rect, SegmentKind, SpriteFrame};
use std::collections::HashMap;
use tracing::trace;

/// Handle of a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// One drawable in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: SegmentKind,
    pub color: Color,
    pub rect: Option<Rect>,
    pub frame: Option<SpriteFrame>,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    /// Bottom to top.
    z_order: Vec<NodeId>,
    next_id: u32,
    stage_size: (f32, f32),
    grid_visible: bool,
    redraw_requests: u64,
    destroyed: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of live drawables.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Live drawables that are currently shown.
    pub fn visible_count(&self) -> usize {
        self.nodes.values().filter(|n| n.visible).count()
    }

    /// Node ids from bottom to top.
    pub fn z_order(&self) -> &[NodeId] {
        &self.z_order
    }

    pub fn top(&self) -> Option<NodeId> {
        self.z_order.last().copied()
    }

    pub fn stage_size(&self) -> (f32, f32) {
        self.stage_size
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    /// How many times a redraw was requested since creation.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// How many drawables were destroyed since creation.
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    fn with_node(&mut self, id: NodeId, f: impl FnOnce(&mut Node)) {
        match self.nodes.get_mut(&id) {
            Some(node) => f(node),
            None => trace!("ignoring update for destroyed node {:?}", id),
        }
    }
}

impl Surface for Scene {
    type Handle = NodeId;

    fn create_segment(&mut self, kind: SegmentKind, color: Color) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                kind,
                color,
                rect: None,
                frame: None,
                visible: false,
            },
        );
        self.z_order.push(id);
        id
    }

    fn set_kind(&mut self, handle: NodeId, kind: SegmentKind) {
        self.with_node(handle, |n| n.kind = kind);
    }

    fn set_rect(&mut self, handle: NodeId, rect: Rect) {
        self.with_node(handle, |n| n.rect = Some(rect));
    }

    fn set_orientation(&mut self, handle: NodeId, frame: SpriteFrame) {
        self.with_node(handle, |n| n.frame = Some(frame));
    }

    fn set_visible(&mut self, handle: NodeId, visible: bool) {
        self.with_node(handle, |n| n.visible = visible);
    }

    fn raise(&mut self, handle: NodeId) {
        if let Some(pos) = self.z_order.iter().position(|id| *id == handle) {
            let id = self.z_order.remove(pos);
            self.z_order.push(id);
        }
    }

    fn destroy(&mut self, handle: NodeId) {
        if self.nodes.remove(&handle).is_some() {
            self.z_order.retain(|id| *id != handle);
            self.destroyed += 1;
        }
    }

    fn set_stage_size(&mut self, width: f32, height: f32) {
        self.stage_size = (width, height);
    }

    fn set_grid(&mut self, visible: bool, _cell_size: f32, _cols: u32, _rows: u32) {
        self.grid_visible = visible;
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_nodes_start_hidden_on_top() {
        let mut scene = Scene::new();
        let a = scene.create_segment(SegmentKind::Head, Color::new(1, 2, 3));
        let b = scene.create_segment(SegmentKind::Body, Color::new(1, 2, 3));
        assert!(!scene.node(a).unwrap().visible);
        assert_eq!(scene.top(), Some(b));

        scene.raise(a);
        assert_eq!(scene.z_order(), &[b, a]);
    }

    #[test]
    fn test_destroyed_handles_are_ignored() {
        let mut scene = Scene::new();
        let a = scene.create_segment(SegmentKind::Body, Color::default());
        scene.destroy(a);
        scene.destroy(a);
        scene.set_visible(a, true);
        assert!(scene.is_empty());
        assert_eq!(scene.destroyed(), 1);
    }
}
