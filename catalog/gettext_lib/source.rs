//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Registry of the files merged into a catalog
//!
//! Every loaded file is recorded as a source with a short identifier.
//! A .po and a .mo sharing directory and stem are the same source.

use std::path::{Path, PathBuf};

use crate::gettext_lib::error::{Error, Result};

/// Catalog file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// .po text catalog
    Po,
    /// .mo binary catalog
    Mo,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<FileFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("po") => Ok(FileFormat::Po),
            Some("mo") => Ok(FileFormat::Mo),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Po => "po",
            FileFormat::Mo => "mo",
        }
    }
}

/// One registered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    identifier: String,
    directory: PathBuf,
    stem: String,
    portable: bool,
    machine: bool,
}

impl SourceFile {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Filename without extension
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Whether a file of this format has contributed to the source
    pub fn has_format(&self, format: FileFormat) -> bool {
        match format {
            FileFormat::Po => self.portable,
            FileFormat::Mo => self.machine,
        }
    }

    pub fn filename(&self, format: FileFormat) -> String {
        format!("{}.{}", self.stem, format.extension())
    }

    pub fn path(&self, format: FileFormat) -> PathBuf {
        self.directory.join(self.filename(format))
    }

    fn mark(&mut self, format: FileFormat) {
        match format {
            FileFormat::Po => self.portable = true,
            FileFormat::Mo => self.machine = true,
        }
    }

    fn is_file(&self, directory: &Path, stem: &str) -> bool {
        self.directory == directory && self.stem == stem
    }

    /// Match by `stem.ext` or by full path, for each contributed format
    fn matches_file(&self, definition: &str) -> bool {
        [FileFormat::Po, FileFormat::Mo]
            .into_iter()
            .filter(|&format| self.has_format(format))
            .any(|format| {
                self.filename(format) == definition || self.path(format) == Path::new(definition)
            })
    }
}

/// Result of resolving a source definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLookup {
    Found(usize),
    Ambiguous,
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    files: Vec<SourceFile>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        SourceRegistry::default()
    }

    /// Resolve an identifier, a bare filename or a full path
    ///
    /// Identifiers are unique, so an identifier match wins outright.
    /// Filename and path matches must be unique to resolve.
    pub fn lookup(&self, definition: &str) -> SourceLookup {
        if let Some(index) = self
            .files
            .iter()
            .position(|file| file.identifier == definition)
        {
            return SourceLookup::Found(index);
        }

        let mut matches = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, file)| file.matches_file(definition))
            .map(|(index, _)| index);

        match (matches.next(), matches.next()) {
            (None, _) => SourceLookup::NotFound,
            (Some(index), None) => SourceLookup::Found(index),
            (Some(_), Some(_)) => SourceLookup::Ambiguous,
        }
    }

    /// Resolve a definition to its identifier
    pub fn resolve(&self, definition: &str) -> Result<&str> {
        match self.lookup(definition) {
            SourceLookup::Found(index) => Ok(self.files[index].identifier()),
            SourceLookup::Ambiguous => Err(Error::invalid_argument(format!(
                "more than one file matches '{}'",
                definition
            ))),
            SourceLookup::NotFound => Err(Error::invalid_argument(format!(
                "no dictionary file matches '{}'",
                definition
            ))),
        }
    }

    /// Record a file and return its identifier
    ///
    /// Without an explicit identifier, the file reuses the source of a
    /// sibling with the same stem, or gets its lowercased stem.
    pub fn register(&mut self, path: &Path, identifier: Option<&str>) -> Result<String> {
        let format = FileFormat::from_path(path)?;
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::invalid_argument(format!("{}: no file name", path.display())))?;

        let existing = match identifier {
            Some(id) => self.files.iter().position(|file| file.identifier == id),
            None => self
                .files
                .iter()
                .position(|file| file.is_file(&directory, &stem)),
        };

        if let Some(index) = existing {
            let file = &mut self.files[index];
            if !file.is_file(&directory, &stem) {
                return Err(Error::invalid_argument(format!(
                    "identifier '{}' already belongs to {}",
                    file.identifier,
                    file.path(format).display()
                )));
            }
            file.mark(format);
            return Ok(file.identifier.clone());
        }

        let identifier = match identifier {
            Some(id) => id.to_string(),
            None => {
                let id = stem.to_lowercase();
                if self.files.iter().any(|file| file.identifier == id) {
                    return Err(Error::invalid_argument(format!(
                        "unable to generate a unique identifier for {}",
                        path.display()
                    )));
                }
                id
            }
        };

        let mut file = SourceFile {
            identifier: identifier.clone(),
            directory,
            stem,
            portable: false,
            machine: false,
        };
        file.mark(format);
        log::debug!("registered source '{}' for {}", identifier, path.display());
        self.files.push(file);

        Ok(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.identifier == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
