// WASM client entry point for wormflow
// The worm core (geometry, worm, field, router) is platform-free; the
// browser shell around it lives in game/network/render/ui/utils.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, KeyboardEvent, MessageEvent, window};

// Worm core
pub mod config; // Viewport: cell size and board dimensions
pub mod error; // FlowError
pub mod field; // Worm registry
pub mod geometry; // Segment rects and sprite frames
pub mod input; // Local input events
pub mod router; // Inbound dispatch, outbound packets
pub mod surface; // Rendering seam plus the in-memory scene
pub mod worm; // Worm entity and its segment pool

// Browser shell
mod game; // Frame loop state
mod network; // WebSocket connection
mod render; // Canvas surface
mod ui; // DOM overlays
mod utils; // Console logging

pub use config::ViewportConfig;
pub use error::FlowError;
pub use field::Field;
pub use game::GameClient;
pub use input::{Input, InputEvent};
pub use router::Inbound;
pub use surface::{Color, Scene, Surface};
pub use worm::Worm;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    utils::init_logging(tracing::Level::INFO);
}

/// Handle JS holds on to; owns the client and its event wiring.
#[wasm_bindgen]
pub struct WormClientWrapper {
    client: Rc<RefCell<GameClient>>,
}

#[wasm_bindgen]
impl WormClientWrapper {
    /// Connect to `server_url` and start drawing into the canvas `canvas_id`.
    ///
    /// `sheet_url` points at the segment sprite sheet; without it segments are
    /// drawn as plain colored cells.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        server_url: &str,
        sheet_url: Option<String>,
    ) -> Result<WormClientWrapper, JsValue> {
        init();

        let client = GameClient::new(canvas_id, server_url, sheet_url.as_deref())?;
        let client_rc = Rc::new(RefCell::new(client));

        // Setup WebSocket message handler
        setup_websocket_handler(client_rc.clone())?;

        // Setup animation loop
        setup_animation_loop(client_rc.clone())?;

        // Setup input handlers
        setup_input_handlers(client_rc.clone())?;

        info!("wormflow client started");
        Ok(WormClientWrapper { client: client_rc })
    }

    /// Number of worms currently on the board
    pub fn worm_count(&self) -> usize {
        self.client.borrow().worm_count()
    }

    pub fn is_connected(&self) -> bool {
        self.client.borrow().is_connected()
    }

    /// Show or hide the board grid, same as pressing `G`.
    pub fn toggle_grid(&self) {
        self.client
            .borrow()
            .input_state()
            .borrow_mut()
            .push(InputEvent::ToggleGrid);
    }

    /// Release every worm and close the connection.
    pub fn shutdown(&self) {
        self.client.borrow_mut().shutdown();
    }

    /// Get the underlying WebSocket for connection status checks
    pub fn websocket(&self) -> web_sys::WebSocket {
        self.client.borrow().websocket()
    }
}

fn setup_websocket_handler(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let ws = client.borrow().websocket();
    let frame_queue = client.borrow().frame_queue();
    let ws_open_flag = client.borrow().ws_open_flag();
    let ws_close_flag = client.borrow().ws_close_flag();

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        match event.data().as_string() {
            // Push frame to queue - game loop will process it
            Some(text) => frame_queue.borrow_mut().push(text),
            None => tracing::error!("Ignoring non-text frame"),
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onopen = Closure::wrap(Box::new(move |_event: JsValue| {
        ws_open_flag.set(true);
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onerror = Closure::wrap(Box::new(move |e: JsValue| {
        tracing::error!("WebSocket error: {:?}", e);
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // No reconnect: the close is surfaced to the user on the next frame.
    let onclose = Closure::wrap(Box::new(move |event: CloseEvent| {
        info!("WebSocket closed: {}", event.code());
        ws_close_flag.set(true);
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    Ok(())
}

fn setup_animation_loop(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;

    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(e) = client.borrow_mut().update() {
            tracing::error!("Update error: {:?}", e);
        }

        // Request next frame
        if let (Some(win), Some(callback)) = (web_sys::window(), f.borrow().as_ref()) {
            win.request_animation_frame(callback.as_ref().unchecked_ref())
                .ok();
        }
    }) as Box<dyn FnMut()>));

    // Start the loop
    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }

    Ok(())
}

fn setup_input_handlers(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let input_state = client.borrow().input_state();

    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.repeat() {
            return;
        }
        if input_state.borrow_mut().key_down(&event.key()) {
            // Keep arrows from scrolling the page
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);

    document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}
