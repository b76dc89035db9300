pub mod state;
pub mod types;

pub use state::LookupState;
pub use types::{
    AppEvent, Definition, ExamplePair, LanguagePair, LookupResult, PartOfSpeech, Translation,
};
