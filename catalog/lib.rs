//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! posixutils-catalog library
//!
//! This library reads, edits and writes GNU gettext message catalogs:
//! - .po text catalogs (parse and generate)
//! - .mo binary catalogs (parse and generate, either byte order)
//! - merging several catalog files into one in-memory catalog

pub mod gettext_lib;

pub use gettext_lib::catalog::{Catalog, CatalogConfig};
pub use gettext_lib::entry::{CommentKind, Original, Translation, TranslationEntry};
pub use gettext_lib::error::{Error, Result};
