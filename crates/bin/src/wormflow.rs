//! Wormflow - headless worm client.
//!
//! Connects to a worm server, feeds every frame through the same registry the
//! browser client uses (rendered into an in-memory scene) and forwards
//! directions typed on stdin.

mod config;
mod console;

use anyhow::{Context, bail};
use client::{Field, Scene, router};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use console::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = std::env::args().nth(1) {
        config.server.url = url;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    info!("Wormflow v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: Config) -> anyhow::Result<()> {
    let url = config.server.url.as_str();
    let (ws, _) = connect_async(url)
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;
    info!("Connected to {}", url);

    let (mut sink, mut stream) = ws.split();
    sink.send(Message::text(router::build_hello().encode()))
        .await?;

    let mut field = Field::new(Scene::new(), config.viewport, rand::random());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    router::process_frame(&mut field, text.as_str());
                }
                Some(Ok(Message::Close(reason))) => {
                    bail!("Server closed the connection: {:?}", reason);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Connection lost"),
                None => bail!("Connection lost"),
            },

            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                match console::parse(&line) {
                    Ok(Some(Command::Input(event))) => {
                        if let Some(packet) = router::handle_input(&mut field, event) {
                            sink.send(Message::text(packet.encode())).await?;
                        }
                    }
                    Ok(Some(Command::Status)) => report(&field),
                    Ok(Some(Command::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => warn!("{}", e),
                }
            },

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    field.shutdown();
    let _ = sink.send(Message::Close(None)).await;
    info!("Session ended");
    Ok(())
}

fn report(field: &Field<Scene>) {
    let scene = field.surface();
    info!(
        "worms: {}, drawables: {} ({} visible), cell size: {}, grid: {}, redraws: {}",
        field.len(),
        scene.len(),
        scene.visible_count(),
        field.config().cell_size,
        field.grid_visible(),
        scene.redraw_requests()
    );
    for worm in field.worms() {
        debug!(
            "worm {} #{} {}: {} positions, {} segments",
            worm.id(),
            worm.serial(),
            worm.color(),
            worm.positions().len(),
            worm.segment_count()
        );
    }
}
