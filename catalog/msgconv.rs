//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! msgconv - convert between message catalog formats
//!
//! The msgconv utility loads one or more .po or .mo files into a single
//! catalog and writes it out as .po or .mo, chosen by the output extension.

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use posixutils_catalog::gettext_lib::mo_file::Endian;
use posixutils_catalog::{Catalog, CatalogConfig};
use std::path::{Path, PathBuf};
use std::process::exit;

/// msgconv - convert between message catalog formats
#[derive(Parser)]
#[command(
    version,
    about = gettext("msgconv - convert between message catalog formats"),
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    #[arg(short = 'c', help = gettext("Check that the input files load, write nothing"))]
    check: bool,

    #[arg(short = 'v', help = gettext("Print the number of entries of each source"))]
    verbose: bool,

    #[arg(short = 'B', help = gettext("Write .mo output in big-endian byte order"))]
    big_endian: bool,

    #[arg(short = 's', long = "source", help = gettext("Only write the entries of this source"))]
    source: Option<String>,

    #[arg(
        short = 'H',
        long = "header",
        action = clap::ArgAction::Append,
        value_parser = parse_header,
        help = gettext("Set header KEY to VALUE")
    )]
    headers: Vec<(String, String)>,

    #[arg(
        short = 'o',
        long = "output-file",
        required_unless_present = "check",
        help = gettext("Output file name, .po or .mo")
    )]
    output: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::HelpLong, help = gettext("Print help"))]
    help: Option<bool>,

    #[arg(short = 'V', long, action = clap::ArgAction::Version, help = gettext("Print version"))]
    version: Option<bool>,

    #[arg(required = true, help = gettext("Input .po or .mo files"))]
    files: Vec<PathBuf>,
}

fn parse_header(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(gettext("expected KEY=VALUE")),
    }
}

fn fail(path: &Path, err: impl std::fmt::Display) -> ! {
    eprintln!("msgconv: {}: {}", path.display(), err);
    exit(1);
}

fn main() {
    setlocale(LocaleCategory::LcAll, "");
    if textdomain("posixutils-rs").is_err() {
        // Ignore error - translation may not be available
    }
    let _ = bind_textdomain_codeset("posixutils-rs", "UTF-8");
    env_logger::init();

    let args = Args::parse();

    let mut catalog = Catalog::with_config(CatalogConfig {
        collaborative: args.files.len() > 1,
        ..CatalogConfig::default()
    });

    for path in &args.files {
        if let Err(e) = catalog.load_dictionary(path, None) {
            fail(path, e);
        }
    }

    if args.verbose {
        for source in catalog.sources().iter() {
            match catalog.translations_count(Some(source.identifier())) {
                Ok(count) => eprintln!(
                    "{}: {} {}",
                    source.identifier(),
                    count,
                    gettext("entries")
                ),
                Err(e) => fail(source.directory(), e),
            }
        }
    }

    if args.check {
        return;
    }

    let Some(output) = args.output.as_deref() else {
        eprintln!("msgconv: {}", gettext("no output file given"));
        exit(1);
    };

    let scope = args.source.as_deref();
    if let Err(e) = catalog.set_headers(args.headers.iter().cloned(), scope) {
        fail(output, e);
    }

    let endian = if args.big_endian {
        Endian::Big
    } else {
        Endian::Little
    };
    if let Err(e) = catalog.save_dictionary_with(output, scope, endian) {
        fail(output, e);
    }
}
