//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! .po (Portable Object) file parser and generator
//!
//! The .po file format is a human-readable format for translated message catalogs.
//! This module loads .po text into a [`Catalog`] and writes a catalog back out.
//!
//! PO file format:
//! - Comments: lines starting with #
//!   - #  - translator comments
//!   - #. - extracted comments
//!   - #: - reference (file:line)
//!   - #, - flags (fuzzy, c-format, etc.)
//!   - #| msgctxt, #| msgid - previous context and msgid
//! - msgctxt "context" - message context (optional)
//! - msgid "original" - original string
//! - msgid_plural "plural" - plural original (optional)
//! - msgstr "translation" - translation (for singular)
//! - msgstr[N] "translation" - plural translations
//!
//! The entry with an empty msgid carries the catalog headers.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::gettext_lib::catalog::Catalog;
use crate::gettext_lib::entry::{CommentKind, Original, TranslationEntry};
use crate::gettext_lib::error::{Error, Result};
use crate::gettext_lib::headers::Headers;

/// A classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum PoLine {
    Comment(CommentKind, String),
    Context(String),
    Id(String),
    IdPlural(String),
    Str(usize, String),
    Continuation(String),
    Blank,
    Ignored,
}

/// Field extended by a continuation line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    None,
    Context,
    Id,
    Plural,
    Translation(usize),
    Header,
}

/// State of the block being read, reset when the block closes
#[derive(Debug, Default)]
struct BlockState {
    pending_context: Option<String>,
    pending_comments: BTreeMap<CommentKind, String>,
    pending_id: Option<String>,
    pending_plural: Option<String>,
    /// (singular, context) of the entry added to the catalog
    open_entry: Option<(String, String)>,
    /// Header text collected from the msgstr of an empty msgid
    header: Option<String>,
    last_index: usize,
    field: Field,
}

impl BlockState {
    fn has_translation(&self) -> bool {
        matches!(self.field, Field::Translation(_) | Field::Header)
    }
}

/// Parser for .po text
pub struct PoParser<'a> {
    catalog: &'a mut Catalog,
    source: Option<String>,
    line_number: usize,
    state: BlockState,
}

impl<'a> PoParser<'a> {
    /// Create a parser adding to `catalog`, attributing entries to `source`
    pub fn new(catalog: &'a mut Catalog, source: Option<&str>) -> Self {
        PoParser {
            catalog,
            source: source.map(String::from),
            line_number: 0,
            state: BlockState::default(),
        }
    }

    /// Parse the whole text
    pub fn parse(mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            self.line_number += 1;
            let line = self.classify(line)?;
            log::trace!("line {}: {:?}", self.line_number, line);
            let line_number = self.line_number;
            self.process(line).map_err(|e| annotate(e, line_number))?;
        }

        let line_number = self.line_number;
        self.finish_block().map_err(|e| annotate(e, line_number))
    }

    fn classify(&self, line: &str) -> Result<PoLine> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(PoLine::Blank);
        }

        if let Some(rest) = line.strip_prefix('#') {
            return Ok(Self::classify_comment(rest));
        }

        if line.starts_with('"') {
            return Ok(PoLine::Continuation(self.parse_quoted_string(line)?));
        }

        if let Some(rest) = line.strip_prefix("msgctxt") {
            Ok(PoLine::Context(self.parse_string_value(rest)?))
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            Ok(PoLine::IdPlural(self.parse_string_value(rest)?))
        } else if let Some(rest) = line.strip_prefix("msgid") {
            Ok(PoLine::Id(self.parse_string_value(rest)?))
        } else if let Some(rest) = line.strip_prefix("msgstr[") {
            let idx_end = rest.find(']').ok_or_else(|| self.error("unterminated msgstr index"))?;
            let idx: usize = rest[..idx_end]
                .parse()
                .map_err(|_| self.error("invalid msgstr index"))?;
            Ok(PoLine::Str(idx, self.parse_string_value(&rest[idx_end + 1..])?))
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            Ok(PoLine::Str(0, self.parse_string_value(rest)?))
        } else {
            log::warn!("line {}: skipping unrecognized line", self.line_number);
            Ok(PoLine::Ignored)
        }
    }

    /// Classify the text following a leading '#'
    fn classify_comment(rest: &str) -> PoLine {
        fn text(s: &str) -> String {
            s.strip_prefix(' ').unwrap_or(s).to_string()
        }

        if let Some(content) = rest.strip_prefix("| msgctxt") {
            PoLine::Comment(CommentKind::PreviousContext, text(content))
        } else if rest.starts_with("| msgid_plural") {
            PoLine::Ignored
        } else if let Some(content) = rest.strip_prefix("| msgid") {
            PoLine::Comment(CommentKind::PreviousUntranslatedString, text(content))
        } else if let Some(content) = rest.strip_prefix('.') {
            PoLine::Comment(CommentKind::ExtractedComment, text(content))
        } else if let Some(content) = rest.strip_prefix(':') {
            PoLine::Comment(CommentKind::Reference, text(content))
        } else if let Some(content) = rest.strip_prefix(',') {
            PoLine::Comment(CommentKind::Flag, text(content))
        } else if rest.starts_with('~') || rest.starts_with('|') {
            // obsolete entries and unknown previous-value lines
            PoLine::Ignored
        } else {
            PoLine::Comment(CommentKind::Comment, text(rest))
        }
    }

    fn process(&mut self, line: PoLine) -> Result<()> {
        match line {
            PoLine::Blank => self.finish_block(),
            PoLine::Ignored => Ok(()),
            PoLine::Comment(kind, text) => {
                if self.state.has_translation() || self.state.pending_id.is_some() {
                    self.finish_block()?;
                }
                match self.state.pending_comments.entry(kind) {
                    Entry::Vacant(slot) => {
                        slot.insert(text);
                    }
                    Entry::Occupied(mut slot) => {
                        let value = slot.get_mut();
                        value.push('\n');
                        value.push_str(&text);
                    }
                }
                Ok(())
            }
            PoLine::Context(text) => {
                if self.state.has_translation() || self.state.pending_id.is_some() {
                    self.finish_block()?;
                }
                self.state.pending_context = Some(text);
                self.state.field = Field::Context;
                Ok(())
            }
            PoLine::Id(text) => {
                if self.state.has_translation() || self.state.pending_id.is_some() {
                    self.finish_block()?;
                }
                self.state.pending_id = Some(text);
                self.state.field = Field::Id;
                Ok(())
            }
            PoLine::IdPlural(text) => {
                if self.state.pending_id.is_none() {
                    return Err(self.error("msgid_plural without msgid"));
                }
                self.state.pending_plural = Some(text);
                self.state.field = Field::Plural;
                Ok(())
            }
            PoLine::Str(index, text) => self.translation(index, &text),
            PoLine::Continuation(text) => self.continuation(&text),
        }
    }

    /// Add the pending msgid to the catalog, or enter the header block
    fn open_entry(&mut self) -> Result<()> {
        if self.state.open_entry.is_some() || self.state.header.is_some() {
            return Ok(());
        }
        let Some(id) = self.state.pending_id.take() else {
            return Ok(());
        };

        if id.is_empty() {
            if self.state.pending_context.is_none() {
                self.state.header = Some(String::new());
            } else {
                log::warn!("line {}: ignoring entry with empty msgid", self.line_number);
            }
            return Ok(());
        }

        let original = match self.state.pending_plural.take() {
            Some(plural) => Original::with_plural(id.clone(), plural),
            None => Original::new(id.clone()),
        };
        let context = self.state.pending_context.take().unwrap_or_default();

        let entry = self
            .catalog
            .add_original(original, &context, self.source.as_deref(), None)?;
        for (kind, text) in std::mem::take(&mut self.state.pending_comments) {
            entry.set_comment(kind, text);
        }

        self.state.open_entry = Some((id, context));
        Ok(())
    }

    fn open_entry_mut(&mut self) -> Result<Option<&mut TranslationEntry>> {
        match &self.state.open_entry {
            Some((singular, context)) => self
                .catalog
                .get_original_mut(singular, context, self.source.as_deref())
                .map(Some),
            None => Ok(None),
        }
    }

    fn translation(&mut self, index: usize, text: &str) -> Result<()> {
        self.open_entry()?;

        if let Some(header) = self.state.header.as_mut() {
            header.push_str(text);
            self.state.field = Field::Header;
            return Ok(());
        }

        match self.open_entry_mut()? {
            // an empty msgstr stays untranslated unless continuation lines follow
            Some(entry) => {
                entry.set_translation(text, index)?;
            }
            None => {
                log::warn!("line {}: msgstr without msgid ignored", self.line_number);
                return Ok(());
            }
        }
        self.state.last_index = index;
        self.state.field = Field::Translation(index);
        Ok(())
    }

    fn continuation(&mut self, text: &str) -> Result<()> {
        match self.state.field {
            Field::Context => push_pending(&mut self.state.pending_context, text),
            Field::Id => push_pending(&mut self.state.pending_id, text),
            Field::Plural => push_pending(&mut self.state.pending_plural, text),
            Field::Translation(_) => {
                let index = self.state.last_index;
                if let Some(entry) = self.open_entry_mut()? {
                    entry.append_translation(text, index)?;
                }
            }
            Field::Header | Field::None => {
                push_pending(&mut self.state.header, text);
                self.state.field = Field::Header;
            }
        }
        Ok(())
    }

    /// Close the current block and reset the state
    fn finish_block(&mut self) -> Result<()> {
        self.open_entry()?;

        if let Some(blob) = self.state.header.take() {
            let headers = Headers::parse_metadata(&blob);
            log::debug!("read {} headers", headers.len());
            self.catalog
                .set_headers(headers.iter(), self.source.as_deref())?;
        }
        if !self.state.pending_comments.is_empty() && self.state.open_entry.is_none() {
            log::trace!("dropping comments not attached to an entry");
        }

        self.state = BlockState::default();
        Ok(())
    }

    /// Parse a string value after a keyword (e.g., after "msgid ")
    fn parse_string_value(&self, rest: &str) -> Result<String> {
        let rest = rest.trim();
        if !rest.starts_with('"') {
            return Err(self.error("expected quoted string"));
        }
        self.parse_quoted_string(rest)
    }

    /// Parse a quoted string (including escape sequences)
    fn parse_quoted_string(&self, s: &str) -> Result<String> {
        let s = s.trim();
        let Some(s) = s.strip_prefix('"') else {
            return Err(self.error("expected quoted string"));
        };

        let mut result = String::new();
        let mut chars = s.chars();

        loop {
            match chars.next() {
                None => return Err(self.error("unterminated string")),
                Some('"') => break,
                Some('\\') => match chars.next() {
                    None => return Err(self.error("unterminated string")),
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some(c) => {
                        // Unknown escape - keep as-is
                        result.push('\\');
                        result.push(c);
                    }
                },
                Some(c) => result.push(c),
            }
        }

        Ok(result)
    }

    fn error(&self, msg: &str) -> Error {
        Error::format(format!("line {}: {}", self.line_number, msg))
    }
}

fn push_pending(slot: &mut Option<String>, text: &str) {
    slot.get_or_insert_with(String::new).push_str(text);
}

/// Prefix catalog errors with the line that caused them
fn annotate(err: Error, line_number: usize) -> Error {
    match err {
        Error::InvalidArgument(msg) => {
            Error::InvalidArgument(format!("line {}: {}", line_number, msg))
        }
        Error::InvalidState(msg) => Error::InvalidState(format!("line {}: {}", line_number, msg)),
        other => other,
    }
}

/// Parse .po text into `catalog`
pub fn parse(catalog: &mut Catalog, text: &str, source: Option<&str>) -> Result<()> {
    PoParser::new(catalog, source).parse(text)
}

/// Generate .po text for the catalog, or for one of its sources
pub fn generate(catalog: &Catalog, source: Option<&str>) -> Result<String> {
    let headers = catalog.get_headers(source)?;
    let mut out = String::new();

    write_string(&mut out, "msgid", "");
    write_string(&mut out, "msgstr", &headers.to_metadata());
    out.push('\n');

    for entry in catalog.get_translations(source)? {
        write_entry(&mut out, entry);
    }

    Ok(out)
}

fn write_entry(out: &mut String, entry: &TranslationEntry) {
    for (kind, comment) in entry.comments() {
        for line in comment.split('\n') {
            out.push_str(kind.po_prefix());
            if !line.is_empty() {
                out.push(' ');
                out.push_str(line);
            }
            out.push('\n');
        }
    }

    if let Some(context) = entry.context() {
        write_string(out, "msgctxt", context);
    }
    write_string(out, "msgid", entry.singular());
    if let Some(plural) = entry.plural() {
        write_string(out, "msgid_plural", plural);
    }

    let translations = entry.translations();
    let last = translations.keys().next_back().copied().unwrap_or(0);
    if entry.is_plural() || last > 0 {
        for index in 0..=last {
            let translation = translations.get(&index).map_or("", String::as_str);
            write_string(out, &format!("msgstr[{}]", index), translation);
        }
    } else {
        let translation = translations.get(&0).map_or("", String::as_str);
        write_string(out, "msgstr", translation);
    }

    out.push('\n');
}

/// Write `keyword "value"`, splitting values with inner newlines
/// into one quoted line per segment
fn write_string(out: &mut String, keyword: &str, value: &str) {
    out.push_str(keyword);
    if value.trim_end_matches('\n').contains('\n') {
        out.push_str(" \"\"\n");
        for segment in value.split_inclusive('\n') {
            out.push('"');
            out.push_str(&escape(segment));
            out.push_str("\"\n");
        }
    } else {
        out.push_str(" \"");
        out.push_str(&escape(value));
        out.push_str("\"\n");
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
