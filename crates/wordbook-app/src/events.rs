use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use wordbook_lookup::{EntryDraft, HttpTransport, LookupController, LookupOptions};
use wordbook_types::{AppEvent, LookupState};

use crate::state::AppState;

const LOOKUP_RUNNING: &str = "Lookup still running, try again once it finishes";

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (transport, options) = {
        let config = state.config.read().await;
        (
            HttpTransport::from_config(&config.api),
            LookupOptions::from(&config.lookup),
        )
    };

    let notify_tx = app_to_ui_tx.clone().to_sync();
    let (lookup, state_rx) = LookupController::new(Arc::new(transport), options);
    let lookup = lookup.with_error_callback(move |message| {
        match notify_tx.try_send(AppEvent::Notify(message.to_string())) {
            Ok(true) => {}
            Ok(false) => tracing::warn!("UI queue full, dropped notification: {}", message),
            Err(e) => tracing::error!("Failed to deliver notification: {}", e),
        }
    });

    let forward = tokio::spawn(forward_states(state_rx, app_to_ui_tx.clone()));
    let mut draft: Option<EntryDraft> = None;

    tracing::info!("[EVENT_LOOP] Waiting for input");
    loop {
        let event = tokio::select! {
            event = input_rx.recv() => event?,
            _ = cancel.cancelled() => break,
        };

        if matches!(event, AppEvent::Shutdown) {
            tracing::info!("[EVENT_LOOP] Shutdown requested by input");
            cancel.cancel();
            break;
        }

        handle_event(&lookup, &mut draft, &app_to_ui_tx, event).await?;
    }

    // Cancels the pending timer and closes any open stream
    drop(lookup);
    forward.abort();
    app_to_ui_tx.send(AppEvent::Shutdown).await.ok();

    Ok(())
}

async fn forward_states(
    state_rx: AsyncReceiver<LookupState>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) {
    while let Ok(state) = state_rx.recv().await {
        if app_to_ui_tx.send(AppEvent::StateChanged(state)).await.is_err() {
            break;
        }
    }
}

pub async fn handle_event(
    lookup: &LookupController,
    draft: &mut Option<EntryDraft>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::WordInput(text) => {
            tracing::debug!("Word input: '{}'", text);
            *draft = None;
            lookup.set_word(text);
        }
        AppEvent::ClearWord => {
            *draft = None;
            lookup.clear();
        }
        AppEvent::PickDefinition(_)
        | AppEvent::PickTranslation(_)
        | AppEvent::AddDefinition(_)
        | AppEvent::SaveEntry
            if lookup.is_busy() =>
        {
            // The draft is built from the settled lookup, never from a half-finished one
            notify(app_to_ui_tx, LOOKUP_RUNNING.to_string()).await?;
        }
        AppEvent::PickDefinition(index) => {
            let toggled = current_draft(lookup, draft).toggle_definition(index);
            notify_pick(app_to_ui_tx, "definition", index, toggled).await?;
        }
        AppEvent::PickTranslation(index) => {
            let toggled = current_draft(lookup, draft).toggle_translation(index);
            notify_pick(app_to_ui_tx, "translation", index, toggled).await?;
        }
        AppEvent::AddDefinition(text) => {
            current_draft(lookup, draft).add_definition(text);
            notify(app_to_ui_tx, "Definition added".to_string()).await?;
        }
        AppEvent::SaveEntry => {
            let entry = draft
                .take()
                .unwrap_or_else(|| draft_for(lookup))
                .into_entry();
            match entry {
                Some(entry) => {
                    tracing::info!("Entry ready for '{}'", entry.text);
                    notify(app_to_ui_tx, serde_json::to_string_pretty(&entry)?).await?;
                }
                None => notify(app_to_ui_tx, "Nothing to save".to_string()).await?,
            }
        }
        AppEvent::StateChanged(_) | AppEvent::Notify(_) | AppEvent::Shutdown => {
            // UI-only events
        }
    }

    Ok(())
}

/// Draft for the current word, started from the lookup result when there is one
fn current_draft<'a>(
    lookup: &LookupController,
    draft: &'a mut Option<EntryDraft>,
) -> &'a mut EntryDraft {
    draft.get_or_insert_with(|| draft_for(lookup))
}

fn draft_for(lookup: &LookupController) -> EntryDraft {
    let word = lookup.word().trim().to_string();
    match lookup.state().result() {
        Some(result) => EntryDraft::from_result(word, result),
        None => EntryDraft::manual(word),
    }
}

async fn notify_pick(
    app_to_ui_tx: &AsyncSender<AppEvent>,
    kind: &str,
    index: usize,
    toggled: bool,
) -> anyhow::Result<()> {
    let message = if toggled {
        format!("Toggled {} {}", kind, index + 1)
    } else {
        format!("No {} {}", kind, index + 1)
    };
    notify(app_to_ui_tx, message).await
}

async fn notify(app_to_ui_tx: &AsyncSender<AppEvent>, message: String) -> anyhow::Result<()> {
    app_to_ui_tx.send(AppEvent::Notify(message)).await?;
    Ok(())
}
