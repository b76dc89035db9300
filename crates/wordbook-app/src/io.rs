use std::io::BufRead;
use std::thread;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use wordbook_types::AppEvent;

/// Feed stdin lines to the app. Each line is the new content of the word input.
///
/// The blocking read lives on its own thread so shutdown never waits on it.
pub async fn input_loop(
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let lines_rx = spawn_stdin_reader()?;
    forward_lines(lines_rx, event_tx, cancel).await
}

/// Reader thread; the channel closes on EOF or a read error
fn spawn_stdin_reader() -> anyhow::Result<AsyncReceiver<String>> {
    let (lines_tx, lines_rx) = kanal::bounded(64);

    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if lines_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(lines_rx.to_async())
}

pub async fn forward_lines(
    lines_rx: AsyncReceiver<String>,
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let line = tokio::select! {
            line = lines_rx.recv() => line.ok(),
            _ = cancel.cancelled() => {
                tracing::info!("Input watcher stopping");
                return Ok(());
            }
        };

        let Some(line) = line else {
            tracing::info!("End of input");
            event_tx.send(AppEvent::Shutdown).await?;
            return Ok(());
        };

        match parse_input(&line) {
            Some(event) => event_tx.send(event).await?,
            None => tracing::warn!("Unknown command: {}", line.trim()),
        }
    }
}

/// `:`-prefixed lines are commands, anything else replaces the word
pub fn parse_input(line: &str) -> Option<AppEvent> {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Some(AppEvent::WordInput(line.to_string()));
    };

    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    match name {
        "clear" => Some(AppEvent::ClearWord),
        "save" => Some(AppEvent::SaveEntry),
        "q" | "quit" => Some(AppEvent::Shutdown),
        "add" if !rest.is_empty() => Some(AppEvent::AddDefinition(rest.to_string())),
        "pick" => {
            let (kind, number) = rest.split_once(' ')?;
            // Shown 1-based
            let index = number.trim().parse::<usize>().ok()?.checked_sub(1)?;
            match kind {
                "d" => Some(AppEvent::PickDefinition(index)),
                "t" => Some(AppEvent::PickTranslation(index)),
                _ => None,
            }
        }
        _ => None,
    }
}
