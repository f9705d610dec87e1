//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Catalog header metadata
//!
//! Headers are `Key: Value` pairs stored in the entry with an empty msgid.
//! Both file formats carry them as one metadata blob; this module parses and
//! generates that blob and supplies the library defaults.

use chrono::Local;

/// Date format of POT-Creation-Date and PO-Revision-Date
pub const HEADER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

/// Header refreshed on every save
pub const REVISION_DATE: &str = "PO-Revision-Date";

/// Ordered header map; keys keep the position of their first insertion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Headers::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a header
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Apply every header of `other` on top of this map
    pub fn overlay(&mut self, other: &Headers) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the metadata blob stored under the empty msgid
    pub fn to_metadata(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}: {}\n", key, value))
            .collect()
    }

    /// Parse a metadata blob
    ///
    /// Pairs are separated by newlines or commas and split on the first
    /// `": "`. A comma fragment that does not start a new pair belongs to the
    /// previous value, so `Last-Translator: Doe, John` stays one header.
    pub fn parse_metadata(blob: &str) -> Headers {
        let mut entries: Vec<(String, String)> = Vec::new();

        for line in blob.split('\n') {
            for fragment in line.split(',') {
                if fragment.trim().is_empty() {
                    continue;
                }
                if let Some((key, value)) = split_pair(fragment) {
                    entries.push((key.to_string(), value.trim().to_string()));
                } else if let Some(last) = entries.last_mut() {
                    last.1.push(',');
                    last.1.push_str(fragment.trim_end());
                } else {
                    log::warn!("ignoring header fragment without key: {:?}", fragment);
                }
            }
        }

        entries.into_iter().collect()
    }
}

/// Split `Key: Value`, accepting a bare `Key:` as an empty value
fn split_pair(fragment: &str) -> Option<(&str, &str)> {
    let fragment = fragment.trim_end_matches('\r');
    let (key, value) = fragment
        .split_once(": ")
        .or_else(|| fragment.strip_suffix(':').map(|key| (key, "")))?;
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (key, value) in iter {
            headers.set(key, value);
        }
        headers
    }
}

/// Current local time in header date format
pub fn timestamp() -> String {
    Local::now().format(HEADER_DATE_FORMAT).to_string()
}

/// Library default headers, with both dates set to `now`
pub fn default_headers(now: &str) -> Headers {
    Headers::from_iter([
        ("Project-Id-Version", ""),
        ("POT-Creation-Date", now),
        (REVISION_DATE, now),
        ("Language-Team", ""),
        ("MIME-Version", "1.0"),
        ("Content-Type", "text/plain; charset=UTF-8"),
        ("Content-Transfer-Encoding", "8bit"),
        ("Plural-Forms", "nplurals=2; plural=(n==1)? 0 : 1;"),
        ("Last-Translator", ""),
    ])
}
