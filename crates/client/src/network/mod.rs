// WebSocket connection: JSON text frames to and from the worm server
use protocol::ClientPacket;
use tracing::info;
use wasm_bindgen::prelude::*;
use web_sys::WebSocket;

/// Path the server serves the worm socket on.
const SOCKET_PATH: &str = "/worms";

pub struct Connection {
    ws: WebSocket,
    url: String,
}

impl Connection {
    pub fn new(url: &str) -> Result<Self, JsValue> {
        // Pages served over https can only open wss sockets.
        let secure = web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .map(|p| p == "https:")
            .unwrap_or(false);
        let ws_url = socket_url(url, secure);

        info!("Connecting to: {}", ws_url);
        let ws = WebSocket::new(&ws_url)?;

        Ok(Self { ws, url: ws_url })
    }

    pub fn websocket(&self) -> &WebSocket {
        &self.ws
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.ws.ready_state() == WebSocket::OPEN
    }

    pub fn send(&self, packet: ClientPacket) -> Result<(), JsValue> {
        if !self.is_open() {
            return Err(JsValue::from_str("WebSocket not ready"));
        }
        self.ws.send_with_str(&packet.encode())
    }

    pub fn close(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

/// Full socket URL for a user-supplied address.
///
/// A bare `host[:port]` gets a scheme and the default socket path; an
/// address that already names a scheme is used as is.
pub fn socket_url(address: &str, secure: bool) -> String {
    let address = address.trim();
    if address.starts_with("ws://") || address.starts_with("wss://") {
        return address.to_string();
    }

    let scheme = if secure { "wss" } else { "ws" };
    if address.contains('/') {
        format!("{}://{}", scheme, address)
    } else {
        format!("{}://{}{}", scheme, address, SOCKET_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_default_path() {
        assert_eq!(socket_url("localhost:8080", false), "ws://localhost:8080/worms");
        assert_eq!(socket_url("example.com", true), "wss://example.com/worms");
    }

    #[test]
    fn test_explicit_urls_are_kept() {
        assert_eq!(socket_url("ws://10.0.0.2:9000/ws", true), "ws://10.0.0.2:9000/ws");
        assert_eq!(socket_url("game.local/custom", false), "ws://game.local/custom");
    }
}
