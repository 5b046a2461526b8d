use std::sync::Arc;

use anyhow::Result;
use medchat_core::{ChannelView, ChatSession, Config, HttpBackend};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Could not read config ({}), using defaults", e);
        Config::new()
    });

    match logging::init(&config) {
        Ok(path) => log::info!(
            "medchat v{} logging to {}",
            env!("CARGO_PKG_VERSION"),
            path.display()
        ),
        Err(e) => eprintln!("Logging disabled: {}", e),
    }
    log::info!("Using chat server at {}", config.server_url);

    let (view, view_rx) = ChannelView::new();
    let session = Arc::new(ChatSession::new(HttpBackend::new(&config.server_url), view));
    let mut app = App::new(session.clone(), &config);
    let mut events = EventHandler::new(view_rx);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    // History and status load in the background; the UI is usable meanwhile.
    tokio::spawn(async move { session.initialize().await });

    let result = run(&mut terminal, &mut app, &mut events).await;
    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}
