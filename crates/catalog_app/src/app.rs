use std::sync::Arc;
use std::time::Duration;

use catalog_engine::{CatalogStore, HttpCardSource, SearchController};
use catalog_logging::catalog_info;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::render;

/// Interval used to coalesce re-renders.
const RENDER_TICK: Duration = Duration::from_millis(75);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Any plain line replaces the input box content.
    Input(String),
    Submit,
    More,
    Quit,
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        ":search" => Command::Submit,
        ":more" => Command::More,
        ":quit" | ":q" => Command::Quit,
        _ => Command::Input(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

pub async fn run(config: AppConfig, runtime: Handle) -> anyhow::Result<()> {
    let source = HttpCardSource::new(config.source_settings())?;
    let store = Arc::new(CatalogStore::new(Arc::new(source), config.store_settings()));
    let (controller, mut events) =
        SearchController::new(store.clone(), config.controller_settings(), runtime);

    println!("Type to search, :search to submit, :more for the next page, :quit to exit.");
    // The catalog opens on the unfiltered first page.
    controller.button_clicked();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(RENDER_TICK);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Command::Input(text) => controller.input_changed(text),
                    Command::Submit => controller.button_clicked(),
                    Command::More => {
                        if !controller.request_next_page() {
                            println!("(busy, try again when loading finishes)");
                        }
                    }
                    Command::Quit => break,
                }
            }
            Some(event) = events.recv() => {
                if let Some(line) = render::render_event(&event) {
                    println!("{line}");
                }
            }
            _ = ticker.tick() => {
                if store.consume_dirty() {
                    for line in render::render(&store.view()) {
                        println!("{line}");
                    }
                }
            }
        }
    }

    controller.cancel_pending();
    catalog_info!("catalog_app exiting");
    Ok(())
}
