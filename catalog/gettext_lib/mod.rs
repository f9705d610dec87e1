//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! gettext catalog library
//!
//! This module provides the in-memory catalog model together with the
//! .po text codec and the .mo binary codec that load into and save from it.

pub mod catalog;
pub mod dictionary;
pub mod entry;
pub mod error;
pub mod headers;
pub mod mo_file;
pub mod po_file;
pub mod source;
