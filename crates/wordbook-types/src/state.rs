use crate::types::LookupResult;

/// Lookup progress as seen by the UI.
///
/// A lineage moves `Idle -> Loading -> Success | Empty | Error`; a new word starts
/// a new lineage from `Loading` (or `Idle` when it is too short to look up).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookupState {
    #[default]
    Idle,
    /// Request in flight; `partial_text` only ever grows within one lineage
    Loading { partial_text: String },
    Success { result: LookupResult },
    /// Stream ended without a structured result
    Empty,
    Error { message: String },
}

impl LookupState {
    pub fn loading() -> Self {
        LookupState::Loading {
            partial_text: String::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LookupState::Success { .. } | LookupState::Empty | LookupState::Error { .. }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading { .. })
    }

    pub fn partial_text(&self) -> Option<&str> {
        match self {
            LookupState::Loading { partial_text } => Some(partial_text),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&LookupResult> {
        match self {
            LookupState::Success { result } => Some(result),
            _ => None,
        }
    }
}
