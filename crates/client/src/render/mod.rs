// Canvas rendering: the browser implementation of `Surface`
use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::geometry::{Rect, SegmentKind, SpriteFrame};
use crate::surface::{Color, Surface};

/// Side of one square sprite in the sheet. The sheet holds one column per
/// base sprite (head, straight, corner, tail).
const SPRITE_PX: f64 = 64.0;
const BACKGROUND: &str = "#ffffff";
const GRID_COLOR: &str = "#e2e2e2";
const HEAD_OUTLINE: &str = "#000000";

/// Handle of a segment drawable on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(u32);

struct SpriteNode {
    kind: SegmentKind,
    color: String,
    rect: Option<Rect>,
    frame: Option<SpriteFrame>,
    visible: bool,
}

struct Grid {
    cell_size: f32,
    cols: u32,
    rows: u32,
}

/// Retained drawables painted onto a 2d canvas.
///
/// Primitive calls only mutate the retained state; pixels change in
/// [`CanvasSurface::flush`], and only after a redraw was requested.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sheet: Option<HtmlImageElement>,
    nodes: HashMap<SpriteId, SpriteNode>,
    z_order: Vec<SpriteId>,
    next_id: u32,
    grid: Option<Grid>,
    /// Stage size waiting for the next repaint.
    pending_size: Option<(u32, u32)>,
    dirty: bool,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, sheet_url: Option<&str>) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or("Failed to get 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let sheet = match sheet_url {
            Some(url) => {
                let image = HtmlImageElement::new()?;
                image.set_src(url);
                Some(image)
            }
            None => None,
        };

        Ok(Self {
            canvas,
            ctx,
            sheet,
            nodes: HashMap::new(),
            z_order: Vec::new(),
            next_id: 0,
            grid: None,
            pending_size: None,
            dirty: true,
        })
    }

    /// Paint everything if a redraw is pending.
    pub fn flush(&mut self) -> Result<(), JsValue> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        if let Some((width, height)) = self.pending_size.take() {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }

        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, width, height);

        if let Some(grid) = &self.grid {
            self.draw_grid(grid);
        }

        for id in &self.z_order {
            if let Some(node) = self.nodes.get(id) {
                self.draw_node(node)?;
            }
        }
        Ok(())
    }

    fn draw_grid(&self, grid: &Grid) {
        let cell = grid.cell_size as f64;
        let width = grid.cols as f64 * cell;
        let height = grid.rows as f64 * cell;

        self.ctx.begin_path();
        for col in 0..=grid.cols {
            let x = col as f64 * cell;
            self.ctx.move_to(x, 0.0);
            self.ctx.line_to(x, height);
        }
        for row in 0..=grid.rows {
            let y = row as f64 * cell;
            self.ctx.move_to(0.0, y);
            self.ctx.line_to(width, y);
        }
        self.ctx.set_stroke_style_str(GRID_COLOR);
        self.ctx.set_line_width(1.0);
        self.ctx.stroke();
    }

    fn draw_node(&self, node: &SpriteNode) -> Result<(), JsValue> {
        let (Some(rect), Some(frame)) = (node.rect, node.frame) else {
            return Ok(());
        };
        if !node.visible {
            return Ok(());
        }

        let center = rect.center();
        let rotation = frame.rotation_deg();
        // Sprites are authored upright; quarter turns swap the extents.
        let (w, h) = if rotation == 90.0 || rotation == 270.0 {
            (rect.size.y as f64, rect.size.x as f64)
        } else {
            (rect.size.x as f64, rect.size.y as f64)
        };

        self.ctx.save();
        self.ctx.translate(center.x as f64, center.y as f64)?;
        self.ctx.rotate((rotation as f64).to_radians())?;

        self.ctx.set_fill_style_str(&node.color);
        self.ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);

        let sheet = self
            .sheet
            .as_ref()
            .filter(|s| s.complete() && s.natural_width() > 0);
        if let Some(sheet) = sheet {
            let column = frame.sprite() as u32 as f64;
            self.ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    sheet,
                    column * SPRITE_PX,
                    0.0,
                    SPRITE_PX,
                    SPRITE_PX,
                    -w / 2.0,
                    -h / 2.0,
                    w,
                    h,
                )?;
        } else if node.kind == SegmentKind::Head {
            self.ctx.set_stroke_style_str(HEAD_OUTLINE);
            self.ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
        }

        self.ctx.restore();
        Ok(())
    }

    fn node_mut(&mut self, id: SpriteId) -> Option<&mut SpriteNode> {
        self.nodes.get_mut(&id)
    }
}

impl Surface for CanvasSurface {
    type Handle = SpriteId;

    fn create_segment(&mut self, kind: SegmentKind, color: Color) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SpriteNode {
                kind,
                color: color.to_string(),
                rect: None,
                frame: None,
                visible: false,
            },
        );
        self.z_order.push(id);
        id
    }

    fn set_kind(&mut self, handle: SpriteId, kind: SegmentKind) {
        if let Some(node) = self.node_mut(handle) {
            node.kind = kind;
        }
    }

    fn set_rect(&mut self, handle: SpriteId, rect: Rect) {
        if let Some(node) = self.node_mut(handle) {
            node.rect = Some(rect);
        }
    }

    fn set_orientation(&mut self, handle: SpriteId, frame: SpriteFrame) {
        if let Some(node) = self.node_mut(handle) {
            node.frame = Some(frame);
        }
    }

    fn set_visible(&mut self, handle: SpriteId, visible: bool) {
        if let Some(node) = self.node_mut(handle) {
            node.visible = visible;
        }
    }

    fn raise(&mut self, handle: SpriteId) {
        if let Some(pos) = self.z_order.iter().position(|id| *id == handle) {
            let id = self.z_order.remove(pos);
            self.z_order.push(id);
        }
    }

    fn destroy(&mut self, handle: SpriteId) {
        if self.nodes.remove(&handle).is_some() {
            self.z_order.retain(|id| *id != handle);
        }
    }

    fn set_stage_size(&mut self, width: f32, height: f32) {
        self.pending_size = Some((width.max(0.0) as u32, height.max(0.0) as u32));
    }

    fn set_grid(&mut self, visible: bool, cell_size: f32, cols: u32, rows: u32) {
        self.grid = visible.then_some(Grid {
            cell_size,
            cols,
            rows,
        });
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
    }
}
