//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! A single translation entry
//!
//! An entry holds the untranslated original (singular and optional plural),
//! an optional context, the translated variants indexed by plural form and
//! the structured comments a .po file can attach to it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::gettext_lib::error::{Error, Result};

/// Kind of a .po comment line
///
/// Variants are declared in the order comments are written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommentKind {
    /// `# ` translator comment
    Comment,
    /// `#.` comment extracted from the program source
    ExtractedComment,
    /// `#:` source reference (file:line)
    Reference,
    /// `#,` flags such as fuzzy or c-format
    Flag,
    /// `#| msgctxt` context of the previous msgid
    PreviousContext,
    /// `#| msgid` previous untranslated string
    PreviousUntranslatedString,
}

impl CommentKind {
    /// Every kind, in canonical output order
    pub const ALL: [CommentKind; 6] = [
        CommentKind::Comment,
        CommentKind::ExtractedComment,
        CommentKind::Reference,
        CommentKind::Flag,
        CommentKind::PreviousContext,
        CommentKind::PreviousUntranslatedString,
    ];

    /// Name used when comments are addressed by string
    pub fn name(self) -> &'static str {
        match self {
            CommentKind::Comment => "comment",
            CommentKind::ExtractedComment => "extracted-comment",
            CommentKind::Reference => "reference",
            CommentKind::Flag => "flag",
            CommentKind::PreviousContext => "previous-context",
            CommentKind::PreviousUntranslatedString => "previous-untranslated-string",
        }
    }

    /// Line prefix in .po files, without the separating space
    pub fn po_prefix(self) -> &'static str {
        match self {
            CommentKind::Comment => "#",
            CommentKind::ExtractedComment => "#.",
            CommentKind::Reference => "#:",
            CommentKind::Flag => "#,",
            CommentKind::PreviousContext => "#| msgctxt",
            CommentKind::PreviousUntranslatedString => "#| msgid",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CommentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = CommentKind::ALL.iter().map(|k| k.name()).collect();
                Error::invalid_argument(format!(
                    "unsupported comment type '{}', expected one of: {}",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}

/// Untranslated original: singular form plus optional plural form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Original {
    singular: String,
    plural: Option<String>,
}

impl Original {
    pub fn new<S: Into<String>>(singular: S) -> Self {
        Original {
            singular: singular.into(),
            plural: None,
        }
    }

    pub fn with_plural<S: Into<String>, P: Into<String>>(singular: S, plural: P) -> Self {
        Original {
            singular: singular.into(),
            plural: Some(plural.into()),
        }
    }

    pub fn singular(&self) -> &str {
        &self.singular
    }

    pub fn plural(&self) -> Option<&str> {
        self.plural.as_deref()
    }

    pub fn is_plural(&self) -> bool {
        self.plural.is_some()
    }
}

impl From<&str> for Original {
    fn from(singular: &str) -> Self {
        Original::new(singular)
    }
}

impl From<String> for Original {
    fn from(singular: String) -> Self {
        Original::new(singular)
    }
}

impl From<(&str, &str)> for Original {
    fn from((singular, plural): (&str, &str)) -> Self {
        Original::with_plural(singular, plural)
    }
}

/// Translation supplied when an entry is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// One translated string for a non-plural original
    Singular(String),
    /// Translations indexed by plural form
    Plural(Vec<String>),
}

impl From<&str> for Translation {
    fn from(s: &str) -> Self {
        Translation::Singular(s.to_string())
    }
}

impl From<String> for Translation {
    fn from(s: String) -> Self {
        Translation::Singular(s)
    }
}

impl From<Vec<String>> for Translation {
    fn from(forms: Vec<String>) -> Self {
        Translation::Plural(forms)
    }
}

impl From<Vec<&str>> for Translation {
    fn from(forms: Vec<&str>) -> Self {
        Translation::Plural(forms.into_iter().map(String::from).collect())
    }
}

/// One message of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    original: Option<Original>,
    /// Empty contexts are stored as `None`
    context: Option<String>,
    context_fixed: bool,
    translations: BTreeMap<usize, String>,
    comments: BTreeMap<CommentKind, String>,
}

impl TranslationEntry {
    /// Create an entry with its key (original and context) fixed
    pub fn new(original: Original, context: Option<&str>) -> Result<Self> {
        let mut entry = TranslationEntry::default();
        entry.set_original(original)?;
        entry.set_context(context.unwrap_or(""))?;
        Ok(entry)
    }

    pub fn set_original(&mut self, original: Original) -> Result<&mut Self> {
        if original.singular.trim().is_empty() {
            return Err(Error::invalid_argument(
                "untranslated string cannot be empty",
            ));
        }
        if self.original.is_some() {
            return Err(Error::invalid_state(
                "unable to change the untranslated string, create a new entry instead",
            ));
        }
        self.original = Some(original);
        Ok(self)
    }

    pub fn set_plural(&mut self, plural: &str) -> Result<&mut Self> {
        let original = self.original.as_mut().ok_or_else(|| {
            Error::invalid_state("plural form cannot be set without a singular form")
        })?;
        if original.plural.is_some() {
            return Err(Error::invalid_state(
                "unable to change the plural form, create a new entry instead",
            ));
        }
        original.plural = Some(plural.to_string());
        Ok(self)
    }

    /// Fix the context; an empty string means the entry has none
    pub fn set_context(&mut self, context: &str) -> Result<&mut Self> {
        if self.context_fixed {
            return Err(Error::invalid_state(
                "unable to change the context, create a new entry instead",
            ));
        }
        self.context = (!context.is_empty()).then(|| context.to_string());
        self.context_fixed = true;
        Ok(self)
    }

    /// Set the translation at `index`
    ///
    /// An empty translation marks the index untranslated and removes it.
    pub fn set_translation(&mut self, translation: &str, index: usize) -> Result<&mut Self> {
        if index > 0 && !self.is_plural() {
            return Err(Error::invalid_argument(format!(
                "translation index {} needs a plural form of the original",
                index
            )));
        }
        if translation.is_empty() {
            self.translations.remove(&index);
        } else {
            self.translations.insert(index, translation.to_string());
        }
        Ok(self)
    }

    /// Set translations in order, the position being the plural index
    pub fn set_translations<I, S>(&mut self, translations: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (index, translation) in translations.into_iter().enumerate() {
            self.set_translation(translation.as_ref(), index)?;
        }
        Ok(self)
    }

    /// Append to the translation at `index`, creating it when absent
    pub(crate) fn append_translation(&mut self, text: &str, index: usize) -> Result<&mut Self> {
        let mut value = self.translations.get(&index).cloned().unwrap_or_default();
        value.push_str(text);
        self.set_translation(&value, index)
    }

    pub fn set_comment<S: Into<String>>(&mut self, kind: CommentKind, comment: S) -> &mut Self {
        self.comments.insert(kind, comment.into());
        self
    }

    /// Set comments addressed by kind name
    pub fn set_comments<I, K, V>(&mut self, comments: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (kind, comment) in comments {
            let kind: CommentKind = kind.as_ref().parse()?;
            self.set_comment(kind, comment);
        }
        Ok(self)
    }

    pub fn original(&self) -> Option<&Original> {
        self.original.as_ref()
    }

    /// Singular original, empty while the original is unset
    pub fn singular(&self) -> &str {
        self.original.as_ref().map_or("", |o| o.singular())
    }

    pub fn plural(&self) -> Option<&str> {
        self.original.as_ref().and_then(|o| o.plural())
    }

    pub fn is_plural(&self) -> bool {
        self.plural().is_some()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn translations(&self) -> &BTreeMap<usize, String> {
        &self.translations
    }

    pub fn translation(&self, index: usize) -> Result<&str> {
        self.translations
            .get(&index)
            .map(|s| s.as_str())
            .ok_or_else(|| {
                Error::invalid_argument(format!("translation index {} does not exist", index))
            })
    }

    pub fn comments(&self) -> &BTreeMap<CommentKind, String> {
        &self.comments
    }

    pub fn comment(&self, kind: CommentKind) -> Result<&str> {
        self.comments
            .get(&kind)
            .map(|s| s.as_str())
            .ok_or_else(|| Error::invalid_argument(format!("no {} is set", kind)))
    }
}
