//! Genre translation to the display locale (pt-BR)

use crate::LibraryError;
use std::collections::{BTreeMap, HashMap};

/// Built-in source token → display token table
pub const GENRE_TRANSLATIONS: &[(&str, &str)] = &[
    ("Action", "Ação"),
    ("Adventure", "Aventura"),
    ("RPG", "RPG"),
    ("Strategy", "Estratégia"),
    ("Simulation", "Simulação"),
    ("Sports", "Esporte"),
    ("Puzzle", "Quebra-cabeça"),
    ("Racing", "Corrida"),
    ("Shooter", "Tiro"),
    ("Platformer", "Plataforma"),
    ("Fighting", "Luta"),
    ("Horror", "Terror"),
];

/// Translate with the built-in table; unmapped tokens come back unchanged
pub fn translate(token: &str) -> &str {
    GENRE_TRANSLATIONS
        .iter()
        .find(|(source, _)| *source == token)
        .map(|(_, display)| *display)
        .unwrap_or(token)
}

/// Built-in table plus configured extra mappings
#[derive(Debug, Clone)]
pub struct GenreTranslator {
    table: HashMap<String, String>,
}

impl Default for GenreTranslator {
    fn default() -> Self {
        Self {
            table: GENRE_TRANSLATIONS
                .iter()
                .map(|(source, display)| (source.to_string(), display.to_string()))
                .collect(),
        }
    }
}

impl GenreTranslator {
    /// Layer extra mappings over the built-in table
    ///
    /// Extras win over built-ins. The result must stay a fixed point under
    /// repeated translation, so a mapping whose target is itself a source
    /// token translated to something else is rejected.
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Result<Self, LibraryError> {
        let mut translator = Self::default();
        for (source, display) in extra {
            translator.table.insert(source.clone(), display.clone());
        }

        for (source, display) in &translator.table {
            if let Some(again) = translator.table.get(display) {
                if again != display {
                    return Err(LibraryError::InvalidTranslation(format!(
                        "{:?} -> {:?} would be translated again to {:?}",
                        source, display, again
                    )));
                }
            }
        }

        Ok(translator)
    }

    /// Translate one token, falling back to the token itself
    pub fn translate<'a>(&'a self, token: &'a str) -> &'a str {
        self.table.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Translate a decoded genre list in place order
    pub fn translate_all(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .map(|token| match self.table.get(&token) {
                Some(display) => display.clone(),
                None => token,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
