// Browser game state: the worm field plus its socket and DOM glue
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Math;
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, window};

use crate::config::ViewportConfig;
use crate::field::Field;
use crate::input::Input;
use crate::network::Connection;
use crate::render::CanvasSurface;
use crate::router;
use crate::ui::UI;

pub struct GameClient {
    connection: Connection,
    field: Field<CanvasSurface>,
    ui: UI,

    input_state: Rc<RefCell<Input>>, // Shared with event handlers

    // Frame queue - WebSocket handler pushes here, game loop processes
    frame_queue: Rc<RefCell<Vec<String>>>,

    // WebSocket event flags (to avoid borrow conflicts in event handlers)
    ws_open_flag: Rc<Cell<bool>>,
    ws_close_flag: Rc<Cell<bool>>,

    connected: bool,
    last_worm_count: Option<usize>,
}

impl GameClient {
    pub fn new(
        canvas_id: &str,
        server_url: &str,
        sheet_url: Option<&str>,
    ) -> Result<GameClient, JsValue> {
        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let (width, height) = window_size()?;
        let config = ViewportConfig::default().for_window(width, height);
        let surface = CanvasSurface::new(canvas, sheet_url)?;
        let seed = (Math::random() * 2f64.powi(53)) as u64;
        let field = Field::new(surface, config, seed);

        let connection = Connection::new(server_url)?;

        Ok(Self {
            connection,
            field,
            ui: UI::new(document),
            input_state: Rc::new(RefCell::new(Input::new())),
            frame_queue: Rc::new(RefCell::new(Vec::new())),
            ws_open_flag: Rc::new(Cell::new(false)),
            ws_close_flag: Rc::new(Cell::new(false)),
            connected: false,
            last_worm_count: None,
        })
    }

    pub fn websocket(&self) -> web_sys::WebSocket {
        self.connection.websocket().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn worm_count(&self) -> usize {
        self.field.len()
    }

    /// Drop every worm and close the socket.
    pub fn shutdown(&mut self) {
        self.field.shutdown();
        self.connection.close();
        self.connected = false;
    }

    pub(crate) fn frame_queue(&self) -> Rc<RefCell<Vec<String>>> {
        self.frame_queue.clone()
    }

    pub(crate) fn input_state(&self) -> Rc<RefCell<Input>> {
        self.input_state.clone()
    }

    pub(crate) fn ws_open_flag(&self) -> Rc<Cell<bool>> {
        self.ws_open_flag.clone()
    }

    pub(crate) fn ws_close_flag(&self) -> Rc<Cell<bool>> {
        self.ws_close_flag.clone()
    }

    fn handle_ws_open(&mut self) {
        self.connected = true;
        self.ui.hide_error();
        info!("Connected to {}", self.connection.url());
        if let Err(e) = self.connection.send(router::build_hello()) {
            error!("Failed to send hello: {:?}", e);
        }
    }

    fn handle_disconnect(&mut self) {
        self.connected = false;
        error!("Connection to {} lost", self.connection.url());
        self.ui
            .show_error("Connection lost. Reload the page to reconnect.");
    }

    /// One animation frame: socket events, inbound frames, local input, paint.
    pub fn update(&mut self) -> Result<(), JsValue> {
        // Process WebSocket event flags
        if self.ws_open_flag.get() {
            self.ws_open_flag.set(false);
            self.handle_ws_open();
        }

        let frames = std::mem::take(&mut *self.frame_queue.borrow_mut());
        for frame in &frames {
            router::process_frame(&mut self.field, frame);
        }

        if self.ws_close_flag.get() {
            self.ws_close_flag.set(false);
            self.handle_disconnect();
        }

        let (width, height) = window_size()?;
        let events: Vec<_> = {
            let mut input = self.input_state.borrow_mut();
            input.observe_size(width, height);
            input.drain().collect()
        };

        for event in events {
            let Some(packet) = router::handle_input(&mut self.field, event) else {
                continue;
            };
            if !self.connection.is_open() {
                continue;
            }
            if let Err(e) = self.connection.send(packet) {
                warn!("Failed to send {:?}: {:?}", packet, e);
            }
        }

        self.field.surface_mut().flush()?;

        let count = self.field.len();
        if self.last_worm_count != Some(count) {
            self.last_worm_count = Some(count);
            self.ui.update_worm_count(count);
        }
        Ok(())
    }
}

fn window_size() -> Result<(f64, f64), JsValue> {
    let window = window().ok_or("No window")?;
    let width = window.inner_width()?.as_f64().unwrap_or(800.0);
    let height = window.inner_height()?.as_f64().unwrap_or(600.0);
    Ok((width, height))
}
