use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::LookupState;

/// Events flowing between the input side and the render side of the app
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw contents of the word input
    WordInput(String),
    ClearWord,
    StateChanged(LookupState),
    Notify(String),
    PickDefinition(usize),
    PickTranslation(usize),
    /// Manual definition for words the dictionary had nothing on
    AddDefinition(String),
    SaveEntry,
    Shutdown,
}

/// Structured payload of a finished lookup, in the order the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub definitions: Vec<Definition>,
    pub translations: Vec<Translation>,
}

impl LookupResult {
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.translations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    pub part_of_speech: Option<PartOfSpeech>,
    /// Example sentences using the word in this sense
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub part_of_speech: Option<PartOfSpeech>,
    pub examples: Vec<ExamplePair>,
}

/// Same example sentence in the source and the target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Determiner,
    Phrase,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Determiner => "determiner",
            PartOfSpeech::Phrase => "phrase",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language codes used as keys of translation example pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new("en", "ru")
    }
}
