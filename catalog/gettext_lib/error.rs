//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io;
use std::path::PathBuf;

/// Error type shared by the catalog model and both codecs
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed or semantically invalid input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Operation not legal in the current object state
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// File extension is neither .po nor .mo
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    /// Path missing, unreadable or unwritable, or the transfer itself failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Content does not have the structure of its format
    #[error("invalid format: {0}")]
    Format(String),
}

impl Error {
    pub(crate) fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Error::InvalidState(msg.into())
    }

    pub(crate) fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }

    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
