use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use kanal::{AsyncReceiver, Sender};
use tokio_util::sync::CancellationToken;
use wordbook_config::lookup::LookupConfig;
use wordbook_types::{LanguagePair, LookupState};

use crate::debounce::Debouncer;
use crate::error::{LOOKUP_FAILED, LookupError};
use crate::result::parse_result;
use crate::sse::{EventReader, LookupEvent};
use crate::transport::LookupTransport;

/// Called with a short human readable message on non-cancellation failures
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct LookupOptions {
    pub debounce: Duration,
    /// Minimum trimmed length, in chars, of a word worth looking up
    pub min_word_len: usize,
    pub languages: LanguagePair,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_word_len: 2,
            languages: LanguagePair::default(),
        }
    }
}

impl From<&LookupConfig> for LookupOptions {
    fn from(config: &LookupConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_word_len: config.min_word_len,
            languages: config.languages(),
        }
    }
}

/// Identity of one lookup request, captured by every continuation it spawns
#[derive(Clone)]
struct Lineage {
    generation: u64,
    token: CancellationToken,
}

struct Inner {
    word: String,
    state: LookupState,
    generation: u64,
    current: Option<CancellationToken>,
    debouncer: Debouncer,
    on_error: Option<ErrorCallback>,
    disposed: bool,
}

impl Inner {
    fn owns(&self, lineage: &Lineage) -> bool {
        !self.disposed && self.generation == lineage.generation && !lineage.token.is_cancelled()
    }

    /// Cancel the in-flight request, if any, and invalidate its lineage
    fn cancel_lineage(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

struct Shared {
    inner: Mutex<Inner>,
    transport: Arc<dyn LookupTransport>,
    options: LookupOptions,
    state_tx: Sender<LookupState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, inner: &mut Inner, state: LookupState) {
        tracing::debug!("Lookup state: {:?}", state);
        inner.state = state.clone();
        // Nobody listening is fine, the snapshot is still readable via state()
        let _ = self.state_tx.send(state);
    }

    fn reset_to_idle(&self, inner: &mut Inner) {
        if inner.state != LookupState::Idle {
            self.set_state(inner, LookupState::Idle);
        }
    }

    fn begin_lineage(&self, inner: &mut Inner) -> Lineage {
        inner.cancel_lineage();

        let token = CancellationToken::new();
        inner.current = Some(token.clone());
        self.set_state(inner, LookupState::loading());

        Lineage {
            generation: inner.generation,
            token,
        }
    }

    /// Apply a transition on behalf of `lineage`.
    ///
    /// Returns false without touching the state when the lineage was superseded,
    /// cancelled or already reached a terminal state.
    fn transition<F>(&self, lineage: &Lineage, next: F) -> bool
    where
        F: FnOnce(&LookupState) -> Option<LookupState>,
    {
        let mut inner = self.lock();
        if !inner.owns(lineage) || inner.state.is_terminal() {
            return false;
        }

        match next(&inner.state) {
            Some(state) => {
                self.set_state(&mut inner, state);
                true
            }
            None => false,
        }
    }

    fn fail(&self, lineage: &Lineage, word: &str, err: LookupError) {
        let message = err.user_message().unwrap_or(LOOKUP_FAILED);
        tracing::warn!("Lookup for '{}' failed: {}", word, err);

        let applied = self.transition(lineage, |_| {
            Some(LookupState::Error {
                message: message.to_string(),
            })
        });
        if !applied {
            return;
        }

        let callback = self.lock().on_error.clone();
        if let Some(callback) = callback {
            callback(message);
        }
    }
}

/// Debounced, cancellable dictionary lookup driven by the word input.
///
/// At most one request is live at a time. Every state update coming from a
/// request is checked against the lineage that is current at that moment, so a
/// superseded request can never overwrite the state of a newer one.
///
/// `set_word` and `clear` spawn Tokio tasks and must run inside a runtime.
pub struct LookupController {
    shared: Arc<Shared>,
}

impl LookupController {
    /// Create a controller and the channel every published state is sent on
    pub fn new(
        transport: Arc<dyn LookupTransport>,
        options: LookupOptions,
    ) -> (Self, AsyncReceiver<LookupState>) {
        let (state_tx, state_rx) = kanal::unbounded();

        let inner = Inner {
            word: String::new(),
            state: LookupState::Idle,
            generation: 0,
            current: None,
            debouncer: Debouncer::new(options.debounce),
            on_error: None,
            disposed: false,
        };

        let shared = Arc::new(Shared {
            inner: Mutex::new(inner),
            transport,
            options,
            state_tx,
        });

        (Self { shared }, state_rx.to_async())
    }

    pub fn with_error_callback<F>(self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.shared.lock().on_error = Some(Arc::new(callback));
        self
    }

    pub fn word(&self) -> String {
        self.shared.lock().word.clone()
    }

    pub fn state(&self) -> LookupState {
        self.shared.lock().state.clone()
    }

    /// True while a debounced lookup is waiting to start
    pub fn is_pending(&self) -> bool {
        self.shared.lock().debouncer.is_pending()
    }

    /// True until the current word's lookup settles: debounce waiting or request in flight
    pub fn is_busy(&self) -> bool {
        let inner = self.shared.lock();
        inner.debouncer.is_pending() || inner.state.is_loading()
    }

    /// Record the raw input and (re)start the debounced lookup
    pub fn set_word(&self, value: impl Into<String>) {
        let value = value.into();
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }

        let word = value.trim().to_string();
        inner.word = value;

        if word.chars().count() < self.shared.options.min_word_len {
            inner.debouncer.cancel();
            inner.cancel_lineage();
            self.shared.reset_to_idle(&mut inner);
            return;
        }

        let weak = Arc::downgrade(&self.shared);
        inner.debouncer.schedule(move |ticket| async move {
            if let Some(shared) = weak.upgrade() {
                start_lookup(shared, ticket, word);
            }
        });
    }

    pub fn clear(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }

        inner.word.clear();
        inner.debouncer.cancel();
        inner.cancel_lineage();
        self.shared.reset_to_idle(&mut inner);
    }

    pub fn reset(&self) {
        self.clear();
    }

    /// Cancel everything and stop accepting input. Called on drop.
    pub fn dispose(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }

        tracing::debug!("Disposing lookup controller");
        inner.disposed = true;
        inner.debouncer.cancel();
        inner.cancel_lineage();
    }
}

impl Drop for LookupController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Debounce elapsed: take over the state and spawn the request
fn start_lookup(shared: Arc<Shared>, ticket: u64, word: String) {
    let lineage = {
        let mut inner = shared.lock();
        if inner.disposed || !inner.debouncer.fire(ticket) {
            return;
        }
        shared.begin_lineage(&mut inner)
    };

    tracing::info!("Looking up '{}'", word);
    tokio::spawn(run_lineage(shared, lineage, word));
}

async fn run_lineage(shared: Arc<Shared>, lineage: Lineage, word: String) {
    let token = lineage.token.clone();

    let outcome = tokio::select! {
        _ = token.cancelled() => Err(LookupError::Cancelled),
        outcome = stream_lookup(&shared, &lineage, &word) => outcome,
    };

    match outcome {
        Ok(()) => {}
        Err(e) if e.is_cancellation() => {
            tracing::debug!("Lookup for '{}' cancelled", word);
        }
        Err(e) => shared.fail(&lineage, &word, e),
    }
}

async fn stream_lookup(shared: &Shared, lineage: &Lineage, word: &str) -> Result<(), LookupError> {
    let stream = shared.transport.open(word).await?;
    let mut reader = EventReader::new(stream);

    while let Some(event) = reader.next_event().await {
        match event? {
            LookupEvent::Text(text) => {
                let applied = shared.transition(lineage, |state| match state {
                    LookupState::Loading { partial_text } => Some(LookupState::Loading {
                        partial_text: format!("{partial_text}{text}"),
                    }),
                    _ => None,
                });
                if !applied {
                    return Err(LookupError::Cancelled);
                }
            }
            LookupEvent::Result(payload) => {
                let result = parse_result(&payload, &shared.options.languages)?;
                tracing::debug!(
                    "Result for '{}': {} definitions, {} translations",
                    word,
                    result.definitions.len(),
                    result.translations.len()
                );
                shared.transition(lineage, |_| Some(LookupState::Success { result }));
                return Ok(());
            }
        }
    }

    tracing::debug!("Stream for '{}' ended without a result", word);
    shared.transition(lineage, |_| Some(LookupState::Empty));
    Ok(())
}
