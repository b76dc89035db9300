use serde::{Deserialize, Serialize};
use wordbook_types::{Definition, LookupResult, Translation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectable<T> {
    pub item: T,
    pub selected: bool,
}

impl<T> Selectable<T> {
    fn selected(item: T) -> Self {
        Self {
            item,
            selected: true,
        }
    }
}

/// Entry being assembled from a lookup result before it is saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    word: String,
    definitions: Vec<Selectable<Definition>>,
    translations: Vec<Selectable<Translation>>,
}

/// Payload handed over to the entry store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub text: String,
    pub definitions: Vec<Definition>,
    pub translations: Vec<Translation>,
}

impl EntryDraft {
    /// Everything the lookup returned, all of it selected
    pub fn from_result(word: impl Into<String>, result: &LookupResult) -> Self {
        Self {
            word: word.into(),
            definitions: result
                .definitions
                .iter()
                .cloned()
                .map(Selectable::selected)
                .collect(),
            translations: result
                .translations
                .iter()
                .cloned()
                .map(Selectable::selected)
                .collect(),
        }
    }

    /// Blank draft for when the lookup came back empty or failed
    pub fn manual(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definitions: Vec::new(),
            translations: Vec::new(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn set_word(&mut self, word: impl Into<String>) {
        self.word = word.into();
    }

    pub fn toggle_definition(&mut self, index: usize) -> bool {
        toggle(&mut self.definitions, index)
    }

    pub fn toggle_translation(&mut self, index: usize) -> bool {
        toggle(&mut self.translations, index)
    }

    pub fn edit_definition(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.definitions.get_mut(index) {
            Some(definition) => {
                definition.item.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn edit_translation(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.translations.get_mut(index) {
            Some(translation) => {
                translation.item.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn add_definition(&mut self, text: impl Into<String>) {
        self.definitions.push(Selectable::selected(Definition {
            text: text.into(),
            part_of_speech: None,
            examples: Vec::new(),
        }));
    }

    pub fn selected_count(&self) -> usize {
        self.definitions.iter().filter(|d| d.selected).count()
            + self.translations.iter().filter(|t| t.selected).count()
    }

    /// Keep only the selected items. `None` when there is no word to save.
    pub fn into_entry(self) -> Option<NewEntry> {
        let text = self.word.trim().to_string();
        if text.is_empty() {
            return None;
        }

        Some(NewEntry {
            text,
            definitions: selected_items(self.definitions),
            translations: selected_items(self.translations),
        })
    }
}

fn toggle<T>(items: &mut [Selectable<T>], index: usize) -> bool {
    match items.get_mut(index) {
        Some(item) => {
            item.selected = !item.selected;
            true
        }
        None => false,
    }
}

fn selected_items<T>(items: Vec<Selectable<T>>) -> Vec<T> {
    items
        .into_iter()
        .filter(|s| s.selected)
        .map(|s| s.item)
        .collect()
}
