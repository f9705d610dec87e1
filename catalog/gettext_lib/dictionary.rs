//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Loading and saving catalog files
//!
//! The file extension selects the codec. Paths are checked before a codec
//! runs, so a missing or unwritable file fails without touching the catalog.

use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::gettext_lib::catalog::Catalog;
use crate::gettext_lib::error::{Error, Result};
use crate::gettext_lib::headers::{timestamp, REVISION_DATE};
use crate::gettext_lib::mo_file::{self, Endian, MoHeader};
use crate::gettext_lib::po_file;
use crate::gettext_lib::source::FileFormat;

impl Catalog {
    /// Create a catalog with default settings from one file
    pub fn open<P: AsRef<Path>>(path: P, identifier: Option<&str>) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        catalog.load_dictionary(path, identifier)?;
        Ok(catalog)
    }

    /// Load a .po or .mo file, returning the identifier of its source
    ///
    /// Only a collaborative catalog accepts a file once it holds data.
    pub fn load_dictionary<P: AsRef<Path>>(
        &mut self,
        path: P,
        identifier: Option<&str>,
    ) -> Result<String> {
        let path = path.as_ref();
        if !self.is_collaborative() && !(self.is_empty() && self.sources().is_empty()) {
            return Err(Error::invalid_state(format!(
                "{}: catalog already holds a dictionary",
                path.display()
            )));
        }

        let format = FileFormat::from_path(path)?;
        check_readable(path)?;
        let path = fs::canonicalize(path).map_err(|e| Error::io(path, e))?;
        let data = fs::read(&path).map_err(|e| Error::io(&path, e))?;

        if format == FileFormat::Mo && data.len() < MoHeader::SIZE {
            return Err(Error::format(format!(
                "{}: dictionary file is not .mo compatible",
                path.display()
            )));
        }

        let source = self.register_source(&path, identifier)?;
        match format {
            FileFormat::Po => {
                let text = String::from_utf8(data).map_err(|e| {
                    Error::format(format!("{}: invalid UTF-8: {}", path.display(), e))
                })?;
                po_file::parse(self, &text, Some(&source))?;
            }
            FileFormat::Mo => mo_file::read(self, &data, Some(&source))?,
        }

        log::debug!(
            "loaded {} entries from {} as '{}'",
            self.translations_count(Some(&source))?,
            path.display(),
            source
        );
        Ok(source)
    }

    /// Save the catalog, or the source named by `identifier`, to `path`
    ///
    /// `PO-Revision-Date` of the saved scope is set to the current time.
    pub fn save_dictionary<P: AsRef<Path>>(
        &mut self,
        path: P,
        identifier: Option<&str>,
    ) -> Result<()> {
        self.save_dictionary_with(path, identifier, Endian::default())
    }

    /// Like `save_dictionary`, choosing the byte order of .mo output
    pub fn save_dictionary_with<P: AsRef<Path>>(
        &mut self,
        path: P,
        identifier: Option<&str>,
        endian: Endian,
    ) -> Result<()> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let scope = identifier.map(|id| self.source_id(id)).transpose()?;
        let scope = scope.as_deref();

        check_writable(path)?;
        if scope.is_none() && self.sources().len() > 1 {
            self.warn_merged_duplicates(path)?;
        }

        self.set_header(REVISION_DATE, timestamp(), scope)?;
        let data = match format {
            FileFormat::Po => po_file::generate(self, scope)?.into_bytes(),
            FileFormat::Mo => mo_file::write_to_bytes(self, scope, endian)?,
        };
        fs::write(path, &data).map_err(|e| Error::io(path, e))?;

        log::debug!(
            "saved {} entries to {}",
            self.translations_count(scope)?,
            path.display()
        );
        Ok(())
    }

    /// Entries of different sources may share original and context; such
    /// a file cannot be loaded back.
    fn warn_merged_duplicates(&self, path: &Path) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in self.get_translations(None)? {
            if !seen.insert((entry.singular(), entry.context())) {
                log::warn!(
                    "{}: '{}' is defined by more than one source",
                    path.display(),
                    entry.singular()
                );
            }
        }
        Ok(())
    }
}

fn check_readable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if metadata.is_dir() {
        return Err(Error::io(
            path,
            io::Error::new(ErrorKind::InvalidInput, "is a directory"),
        ));
    }
    Ok(())
}

fn check_writable(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(metadata) => {
            if metadata.is_dir() {
                return Err(Error::io(
                    path,
                    io::Error::new(ErrorKind::InvalidInput, "is a directory"),
                ));
            }
            if metadata.permissions().readonly() {
                return Err(Error::io(
                    path,
                    io::Error::new(ErrorKind::PermissionDenied, "file is not writable"),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let metadata = fs::metadata(parent).map_err(|e| Error::io(parent, e))?;
            if !metadata.is_dir() {
                return Err(Error::io(
                    parent,
                    io::Error::new(ErrorKind::NotFound, "not a directory"),
                ));
            }
            if metadata.permissions().readonly() {
                return Err(Error::io(
                    parent,
                    io::Error::new(ErrorKind::PermissionDenied, "directory is not writable"),
                ));
            }
            Ok(())
        }
        Err(e) => Err(Error::io(path, e)),
    }
}
