use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use kanal::AsyncReceiver;
use tokio::sync::mpsc;
use wordbook_types::LookupState;

use crate::error::LookupError;
use crate::transport::{ByteStream, LookupTransport};

mod controller_tests;

type Chunk = Result<Vec<u8>, LookupError>;

enum Script {
    Chunks(Vec<String>),
    Live(mpsc::UnboundedReceiver<Chunk>),
    Fail(LookupError),
}

/// In-memory transport answering each word with a prepared script
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<String>>,
    scripts: Mutex<HashMap<String, Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `word` with the given body chunks, then end the stream
    pub(crate) fn respond(&self, word: &str, chunks: &[String]) {
        self.scripts
            .lock()
            .unwrap()
            .insert(word.to_string(), Script::Chunks(chunks.to_vec()));
    }

    /// Answer `word` with a stream fed by the returned sender.
    /// The sender reports closed once the controller drops the stream.
    pub(crate) fn live(&self, word: &str) -> mpsc::UnboundedSender<Chunk> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts
            .lock()
            .unwrap()
            .insert(word.to_string(), Script::Live(rx));
        tx
    }

    pub(crate) fn fail(&self, word: &str, err: LookupError) {
        self.scripts
            .lock()
            .unwrap()
            .insert(word.to_string(), Script::Fail(err));
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LookupTransport for ScriptedTransport {
    async fn open(&self, word: &str) -> Result<ByteStream, LookupError> {
        self.requests.lock().unwrap().push(word.to_string());

        let script = self.scripts.lock().unwrap().remove(word);
        match script {
            Some(Script::Chunks(chunks)) => {
                Ok(stream::iter(chunks.into_iter().map(|c| Ok(c.into_bytes()))).boxed())
            }
            Some(Script::Live(rx)) => Ok(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|chunk| (chunk, rx))
            })
            .boxed()),
            Some(Script::Fail(err)) => Err(err),
            None => Ok(stream::empty().boxed()),
        }
    }
}

pub(crate) fn text_event(text: &str) -> String {
    format!("event: text\ndata: {text}\n\n")
}

pub(crate) fn result_event(json: &str) -> String {
    format!("event: result\ndata: {json}\n\n")
}

/// Let timers elapse and spawned tasks run (time is paused in these tests)
pub(crate) async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Every state published so far
pub(crate) fn drain(rx: &AsyncReceiver<LookupState>) -> Vec<LookupState> {
    let mut states = Vec::new();
    while let Ok(Some(state)) = rx.try_recv() {
        states.push(state);
    }
    states
}

pub(crate) fn loading(text: &str) -> LookupState {
    LookupState::Loading {
        partial_text: text.to_string(),
    }
}
