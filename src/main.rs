mod app_state;
mod config;
mod controller;
mod error;
mod insight;
mod journal_entry;
mod mood;
mod photo;
mod stats;
mod store;
mod text_input;
mod ui;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use app_state::{Action, Effect};
use config::Config;
use controller::Journal;
use insight::InsightClient;
use store::{FileStore, JournalStore};
use ui::{Intent, UI};

const TICK_RATE: Duration = Duration::from_millis(250);
const LOG_FILE: &str = "zen-journal.log";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load().wrap_err("failed to load configuration")?;
    let data_dir = config.resolved_data_dir()?;
    let store = FileStore::open(&data_dir)
        .wrap_err_with(|| format!("failed to open journal at {}", data_dir.display()))?;
    init_logging(store.dir(), config.log_filter())?;

    let client = InsightClient::new(&config.insight)?;
    if !client.is_configured() {
        warn!("no API key configured; insights are disabled");
    }

    let journal = Journal::open(JournalStore::new(store));
    run(journal, client).await
}

/// The terminal belongs to the UI, so logs go to a file in the data directory.
fn init_logging(dir: &Path, default_filter: &str) -> Result<()> {
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(mut journal: Journal<FileStore>, client: InsightClient) -> Result<()> {
    let mut ui = UI::new()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        ui.display(journal.state())?;

        let action = tokio::select! {
            _ = ticker.tick() => Action::Tick(Instant::now()),
            Some(action) = rx.recv() => action,
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match ui.handle_key(key, journal.state()) {
                        Some(Intent::Dispatch(action)) => action,
                        Some(Intent::Quit) => break,
                        None => continue,
                    }
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e).wrap_err("failed to read terminal input"),
                None => break,
            },
        };

        if let Some(effect) = journal.dispatch(action) {
            spawn_effect(effect, &client, &tx);
        }
    }

    info!("journal closed");
    Ok(())
}

/// Runs slow work off the event loop and reports back as an action.
fn spawn_effect(effect: Effect, client: &InsightClient, tx: &UnboundedSender<Action>) {
    match effect {
        Effect::Analyze { ticket, entries } => {
            debug!(ticket, entries = entries.len(), "starting analysis");
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let insight = client.analyze(&entries).await;
                let _ = tx.send(Action::InsightReady { ticket, insight });
            });
        }
        Effect::LoadPhoto { ticket, path } => {
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = photo::load_data_uri(&path).await.map_err(|e| {
                    warn!(error = %e, "photo not attached");
                    e.to_string()
                });
                let _ = tx.send(Action::PhotoLoaded { ticket, result });
            });
        }
        Effect::PersistEntries | Effect::PersistPassword(_) => {
            debug!("storage effect reached the event loop");
        }
    }
}
