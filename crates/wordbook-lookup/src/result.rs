use std::collections::HashMap;

use serde::Deserialize;
use wordbook_types::{Definition, ExamplePair, LanguagePair, LookupResult, PartOfSpeech, Translation};

use crate::error::LookupError;

#[derive(Deserialize)]
struct WireResult {
    #[serde(default)]
    definitions: Option<Vec<WireDefinition>>,
    #[serde(default)]
    translations: Option<Vec<WireTranslation>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDefinition {
    definition: String,
    #[serde(default)]
    part_of_speech: Option<PartOfSpeech>,
    #[serde(default)]
    example_sentences: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTranslation {
    translation: String,
    #[serde(default)]
    part_of_speech: Option<PartOfSpeech>,
    /// Keyed by language code
    #[serde(default)]
    examples: Option<Vec<HashMap<String, String>>>,
}

/// Parse the payload of a `result` event.
///
/// Translation examples are objects keyed by the source and target language codes;
/// an example missing either key makes the whole payload malformed.
pub fn parse_result(payload: &str, languages: &LanguagePair) -> Result<LookupResult, LookupError> {
    let wire: WireResult =
        serde_json::from_str(payload).map_err(|e| LookupError::MalformedResult(e.to_string()))?;

    let definitions = wire
        .definitions
        .unwrap_or_default()
        .into_iter()
        .map(|d| Definition {
            text: d.definition,
            part_of_speech: d.part_of_speech,
            examples: d.example_sentences.unwrap_or_default(),
        })
        .collect();

    let translations = wire
        .translations
        .unwrap_or_default()
        .into_iter()
        .map(|t| {
            let examples = t
                .examples
                .unwrap_or_default()
                .into_iter()
                .map(|mut example| {
                    Ok(ExamplePair {
                        source: take_language(&mut example, &languages.source)?,
                        target: take_language(&mut example, &languages.target)?,
                    })
                })
                .collect::<Result<Vec<_>, LookupError>>()?;

            Ok(Translation {
                text: t.translation,
                part_of_speech: t.part_of_speech,
                examples,
            })
        })
        .collect::<Result<Vec<_>, LookupError>>()?;

    Ok(LookupResult {
        definitions,
        translations,
    })
}

fn take_language(example: &mut HashMap<String, String>, code: &str) -> Result<String, LookupError> {
    example
        .remove(code)
        .ok_or_else(|| LookupError::MalformedResult(format!("example is missing '{}' text", code)))
}
