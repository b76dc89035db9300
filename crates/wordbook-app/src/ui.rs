use std::io::Write;

use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;
use wordbook_types::{AppEvent, LookupResult, LookupState, PartOfSpeech};

/// Terminal stand-in for the lookup panel
pub async fn render_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            event = app_to_ui_rx.recv() => event?,
            _ = cancel.cancelled() => break,
        };

        let output = match event {
            AppEvent::StateChanged(state) => render_state(&state),
            AppEvent::Notify(message) => Some(format!("* {message}")),
            AppEvent::Shutdown => break,
            _ => None,
        };

        if let Some(output) = output {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{output}")?;
            stdout.flush()?;
        }
    }

    tracing::info!("Render loop stopping");
    Ok(())
}

pub fn render_state(state: &LookupState) -> Option<String> {
    match state {
        LookupState::Idle => None,
        LookupState::Loading { partial_text } if partial_text.is_empty() => {
            Some("... looking up".to_string())
        }
        LookupState::Loading { partial_text } => Some(format!("> {partial_text}")),
        LookupState::Success { result } => Some(render_result(result)),
        LookupState::Empty => {
            Some("No results. Use `:add <definition>` to create the entry by hand.".to_string())
        }
        LookupState::Error { message } => Some(format!(
            "No results ({message}). Use `:add <definition>` to create the entry by hand."
        )),
    }
}

fn render_result(result: &LookupResult) -> String {
    if result.is_empty() {
        return "The dictionary returned an empty entry.".to_string();
    }

    let mut lines = Vec::new();
    for (i, definition) in result.definitions.iter().enumerate() {
        lines.push(format!(
            "d{}. {}{}",
            i + 1,
            pos_label(definition.part_of_speech),
            definition.text
        ));
        lines.extend(definition.examples.iter().map(|ex| format!("     - {ex}")));
    }
    for (i, translation) in result.translations.iter().enumerate() {
        lines.push(format!(
            "t{}. {}{}",
            i + 1,
            pos_label(translation.part_of_speech),
            translation.text
        ));
        lines.extend(
            translation
                .examples
                .iter()
                .map(|ex| format!("     - {} / {}", ex.source, ex.target)),
        );
    }
    lines.push("Toggle with `:pick d <n>` / `:pick t <n>`, then `:save`.".to_string());

    lines.join("\n")
}

fn pos_label(pos: Option<PartOfSpeech>) -> String {
    pos.map(|pos| format!("({pos}) ")).unwrap_or_default()
}
