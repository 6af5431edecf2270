//! companion-tui — terminal shell around the companion footer.
//! Uses Ratatui + Crossterm for rendering.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::broadcast;
use tracing::{error, info};

use companion_core::channel::{write_outbox, ChannelSlot, OutboxChannel};
use companion_core::config::Config;
use companion_core::dispatch::Dispatcher;
use companion_core::events::{EventNotifier, FooterEvent};
use companion_core::history::ChatHistory;
use companion_core::i18n::Labels;
use companion_core::pipeline::AttachmentPipeline;

use app::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a file, not stdout, since we own the terminal
    let _guard = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(|| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open("companion-tui.log")
                .map(|f| Box::new(f) as Box<dyn io::Write>)
                .unwrap_or_else(|_| Box::new(io::sink()))
        })
        .try_init();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_or_default(&project_root);

    let labels = Labels::new(config.locale);
    let history = Arc::new(match config.history_path() {
        Some(path) => ChatHistory::open(&path),
        None => ChatHistory::in_memory(),
    });

    // The outbox stands in for the live connection; without one there is no channel.
    let channel = Arc::new(ChannelSlot::new());
    if let Some(path) = config.outbox_path() {
        let (outbox, rx) = OutboxChannel::new();
        channel.attach(Arc::new(outbox));
        tokio::spawn(async move {
            if let Err(e) = write_outbox(rx, path).await {
                error!("Outbox writer stopped: {:#}", e);
            }
        });
    }

    let (event_tx, mut event_rx) = broadcast::channel::<FooterEvent>(64);
    let dispatcher = Arc::new(Dispatcher::new(
        channel.clone(),
        history.clone(),
        Arc::new(EventNotifier::new(event_tx.clone())),
        Arc::new(labels),
    ));
    let pipeline = Arc::new(AttachmentPipeline::new(
        &config,
        dispatcher.clone(),
        event_tx,
    ));

    let mut app = App::new(labels, history, dispatcher, pipeline);
    info!(
        "Starting TUI (locale {:?}, channel {})",
        config.locale,
        if channel.is_attached() { "attached" } else { "absent" }
    );

    // Files named on the command line are attached right away.
    let initial: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    app.attach_paths(initial);

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Footer events (non-blocking)
        loop {
            match event_rx.try_recv() {
                Ok(event) => app.handle_event(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    info!("Footer events lagged by {}", n);
                }
                Err(_) => break,
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
                    app.should_quit = true;
                } else if app.notice.is_some() {
                    app.dismiss_notice();
                } else {
                    match (key.code, key.modifiers) {
                        (KeyCode::Char('o'), KeyModifiers::CONTROL) => app.start_attach(),
                        (KeyCode::Esc, _) => app.cancel_attach(),
                        (KeyCode::Enter, KeyModifiers::ALT) => app.input.push('\n'),
                        (KeyCode::Enter, _) => app.submit(),
                        (KeyCode::F(2), _) => app.toggle_mic(),
                        (KeyCode::F(3), _) => app.interrupt(),
                        (KeyCode::F(4), _) => app.toggle_collapsed(),
                        (KeyCode::Char(c), _) => app.input.push(c),
                        (KeyCode::Backspace, _) => {
                            app.input.pop();
                        }
                        (KeyCode::PageUp, _) => app.scroll_up(),
                        (KeyCode::PageDown, _) => app.scroll_down(),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Cleanup
    app.cancel_attach();
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    info!("TUI stopped.");

    Ok(())
}
