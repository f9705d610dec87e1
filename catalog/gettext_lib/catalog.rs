//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! In-memory message catalog
//!
//! This module provides the `Catalog` type, the editable representation of
//! one or more gettext catalog files. Entries are keyed by original,
//! context and source file and are kept in insertion order; headers are
//! kept per source on top of library defaults.

use std::collections::HashMap;
use std::path::Path;

use crate::gettext_lib::entry::{Original, Translation, TranslationEntry};
use crate::gettext_lib::error::{Error, Result};
use crate::gettext_lib::headers::{default_headers, timestamp, Headers};
use crate::gettext_lib::source::{SourceLookup, SourceRegistry};

/// Settings fixed when a catalog is created
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Headers reported unless overridden
    pub default_headers: Headers,
    /// Allow loading further files into a non-empty catalog
    pub collaborative: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            default_headers: default_headers(&timestamp()),
            collaborative: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    singular: String,
    context: Option<String>,
    source: Option<String>,
}

#[derive(Debug, Clone)]
struct Slot {
    source: Option<String>,
    entry: TranslationEntry,
}

impl Slot {
    fn key(&self) -> EntryKey {
        EntryKey {
            singular: self.entry.singular().to_string(),
            context: self.entry.context().map(String::from),
            source: self.source.clone(),
        }
    }
}

/// Editable gettext catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    collaborative: bool,
    defaults: Headers,
    /// Headers set without naming a source
    headers: Headers,
    source_headers: HashMap<String, Headers>,
    slots: Vec<Slot>,
    index: HashMap<EntryKey, usize>,
    sources: SourceRegistry,
}

impl Catalog {
    /// Create an empty catalog with default settings
    pub fn new() -> Self {
        Catalog::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Catalog {
            collaborative: config.collaborative,
            defaults: config.default_headers,
            headers: Headers::new(),
            source_headers: HashMap::new(),
            slots: Vec::new(),
            index: HashMap::new(),
            sources: SourceRegistry::new(),
        }
    }

    pub fn is_collaborative(&self) -> bool {
        self.collaborative
    }

    pub fn set_collaborative(&mut self, collaborative: bool) {
        self.collaborative = collaborative;
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Find the registered source matching a path, filename or identifier
    pub fn resolve_source_id(&self, definition: &str) -> SourceLookup {
        self.sources.lookup(definition)
    }

    /// Like `resolve_source_id`, failing unless exactly one source matches
    pub fn source_id(&self, definition: &str) -> Result<String> {
        self.sources.resolve(definition).map(String::from)
    }

    /// Record a catalog file, returning the identifier of its source
    pub fn register_source(&mut self, path: &Path, identifier: Option<&str>) -> Result<String> {
        self.sources.register(path, identifier)
    }

    /// Resolve an optional source definition to an identifier
    fn scope(&self, source: Option<&str>) -> Result<Option<String>> {
        source.map(|definition| self.source_id(definition)).transpose()
    }

    /// Create an entry and return it for further editing
    pub fn add_original<O: Into<Original>>(
        &mut self,
        original: O,
        context: &str,
        source: Option<&str>,
        translation: Option<Translation>,
    ) -> Result<&mut TranslationEntry> {
        let original = original.into();

        match &translation {
            Some(Translation::Plural(forms)) if forms.len() > 1 && !original.is_plural() => {
                return Err(Error::invalid_argument(format!(
                    "'{}': plural translations need a plural original",
                    original.singular()
                )));
            }
            Some(Translation::Singular(_)) if original.is_plural() => {
                return Err(Error::invalid_argument(format!(
                    "'{}': a plural original needs plural translations",
                    original.singular()
                )));
            }
            _ => {}
        }
        if original.singular().trim().is_empty() {
            return Err(Error::invalid_argument(
                "untranslated string cannot be empty",
            ));
        }

        let source = match source {
            Some(_) => self.scope(source)?,
            None => self.sole_source(),
        };
        let key = EntryKey {
            singular: original.singular().to_string(),
            context: (!context.is_empty()).then(|| context.to_string()),
            source: source.clone(),
        };
        // an unscoped add may not shadow the same message of any source
        let shadows = || {
            self.slots.iter().any(|slot| {
                slot.entry.singular() == key.singular
                    && slot.entry.context() == key.context.as_deref()
            })
        };
        if self.index.contains_key(&key) || (source.is_none() && shadows()) {
            return Err(Error::invalid_argument(format!(
                "'{}' already exists in this context",
                key.singular
            )));
        }

        let mut entry = TranslationEntry::new(original, Some(context))?;
        match translation {
            Some(Translation::Singular(text)) => {
                entry.set_translation(&text, 0)?;
            }
            Some(Translation::Plural(forms)) => {
                entry.set_translations(forms)?;
            }
            None => {}
        }

        let position = self.slots.len();
        self.index.insert(key, position);
        self.slots.push(Slot { source, entry });

        Ok(&mut self.slots[position].entry)
    }

    /// The identifier of the only registered source, if there is exactly one
    fn sole_source(&self) -> Option<String> {
        let mut files = self.sources.iter();
        match (files.next(), files.next()) {
            (Some(file), None) => Some(file.identifier().to_string()),
            _ => None,
        }
    }

    fn find(&self, original: &str, context: &str, source: Option<&str>) -> Result<usize> {
        let context = (!context.is_empty()).then_some(context);
        let found = match self.scope(source)? {
            Some(source) => self
                .index
                .get(&EntryKey {
                    singular: original.to_string(),
                    context: context.map(String::from),
                    source: Some(source),
                })
                .copied(),
            None => self.slots.iter().position(|slot| {
                slot.entry.singular() == original && slot.entry.context() == context
            }),
        };

        found.ok_or_else(|| {
            Error::invalid_argument(format!("original '{}' does not exist", original))
        })
    }

    /// Look up an entry; without a source every source is searched
    pub fn get_original(
        &self,
        original: &str,
        context: &str,
        source: Option<&str>,
    ) -> Result<&TranslationEntry> {
        let position = self.find(original, context, source)?;
        Ok(&self.slots[position].entry)
    }

    pub fn get_original_mut(
        &mut self,
        original: &str,
        context: &str,
        source: Option<&str>,
    ) -> Result<&mut TranslationEntry> {
        let position = self.find(original, context, source)?;
        Ok(&mut self.slots[position].entry)
    }

    /// Alias of `get_original`
    pub fn get_translation(
        &self,
        original: &str,
        context: &str,
        source: Option<&str>,
    ) -> Result<&TranslationEntry> {
        self.get_original(original, context, source)
    }

    /// Alias of `get_original_mut`
    pub fn get_translation_mut(
        &mut self,
        original: &str,
        context: &str,
        source: Option<&str>,
    ) -> Result<&mut TranslationEntry> {
        self.get_original_mut(original, context, source)
    }

    /// Remove entries of `original`
    ///
    /// Without a context every context is removed; `Some("")` selects the
    /// entry without context. Removing nothing is not an error.
    pub fn remove_translation(
        &mut self,
        original: &str,
        context: Option<&str>,
        source: Option<&str>,
    ) -> Result<()> {
        let scope = self.scope(source)?;
        let context = context.map(|c| (!c.is_empty()).then_some(c));

        let before = self.slots.len();
        self.slots.retain(|slot| {
            let matches = slot.entry.singular() == original
                && context.map_or(true, |c| slot.entry.context() == c)
                && scope.as_ref().map_or(true, |s| slot.source.as_ref() == Some(s));
            !matches
        });

        if self.slots.len() != before {
            log::debug!(
                "removed {} entries of '{}'",
                before - self.slots.len(),
                original
            );
            self.reindex();
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .slots
            .iter()
            .enumerate()
            .map(|(position, slot)| (slot.key(), position))
            .collect();
    }

    /// Merged header view: defaults overridden by stored headers
    ///
    /// Without a source, every source's headers apply in registration
    /// order, then the headers set without a source.
    pub fn get_headers(&self, source: Option<&str>) -> Result<Headers> {
        let mut merged = self.defaults.clone();
        match self.scope(source)? {
            Some(source) => {
                if let Some(headers) = self.source_headers.get(&source) {
                    merged.overlay(headers);
                }
            }
            None => {
                for file in self.sources.iter() {
                    if let Some(headers) = self.source_headers.get(file.identifier()) {
                        merged.overlay(headers);
                    }
                }
                merged.overlay(&self.headers);
            }
        }
        Ok(merged)
    }

    pub fn set_header<K, V>(&mut self, key: K, value: V, source: Option<&str>) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        match self.scope(source)? {
            Some(source) => self
                .source_headers
                .entry(source)
                .or_default()
                .set(key, value),
            None => self.headers.set(key, value),
        }
        Ok(())
    }

    pub fn set_headers<I, K, V>(&mut self, headers: I, source: Option<&str>) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let scope = self.scope(source)?;
        let target = match scope {
            Some(source) => self.source_headers.entry(source).or_default(),
            None => &mut self.headers,
        };
        for (key, value) in headers {
            target.set(key, value);
        }
        Ok(())
    }

    /// Override one library default for this catalog
    pub fn set_default_header<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.defaults.set(key, value);
    }

    pub fn set_default_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.defaults.set(key, value);
        }
    }

    /// Entries in insertion order, optionally limited to one source
    pub fn get_translations(
        &self,
        source: Option<&str>,
    ) -> Result<impl Iterator<Item = &TranslationEntry>> {
        let scope = self.scope(source)?;
        Ok(self
            .slots
            .iter()
            .filter(move |slot| scope.is_none() || slot.source == scope)
            .map(|slot| &slot.entry))
    }

    /// Number of (original, context) pairs, counting each source separately
    pub fn translations_count(&self, source: Option<&str>) -> Result<usize> {
        Ok(self.get_translations(source)?.count())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
