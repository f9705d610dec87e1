//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use posixutils_catalog::Catalog;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestPlan {
    args: Vec<String>,
    expected_out: String,
    expected_err: String,
    expected_exit_code: i32,
}

fn run_msgconv(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msgconv"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("LC_ALL", "C")
        .output()
        .expect("failed to run msgconv")
}

fn run_test(plan: TestPlan) {
    let output = run_msgconv(&plan.args);
    assert_eq!(String::from_utf8_lossy(&output.stdout), plan.expected_out);
    assert_eq!(String::from_utf8_lossy(&output.stderr), plan.expected_err);
    assert_eq!(output.status.code(), Some(plan.expected_exit_code));
}

fn arg(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn create_temp_po_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PO_CONTENT: &str = r#"msgid ""
msgstr ""
"Language: cs\n"

msgid "Hello"
msgstr "Ahoj"

msgid "One file"
msgid_plural "%d files"
msgstr[0] "Jeden soubor"
msgstr[1] "%d soubory"
msgstr[2] "%d souborů"
"#;

#[test]
fn test_msgconv_po_to_mo() {
    let dir = TempDir::new().unwrap();
    let po_path = create_temp_po_file(&dir, "cs.po", PO_CONTENT);
    let mo_path = dir.path().join("cs.mo");

    run_test(TestPlan {
        args: vec![String::from("-o"), arg(&mo_path), arg(&po_path)],
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    let data = fs::read(&mo_path).unwrap();
    assert_eq!(&data[0..4], &[0xde, 0x12, 0x04, 0x95]);

    let catalog = Catalog::open(&mo_path, None).unwrap();
    assert_eq!(catalog.translations_count(None).unwrap(), 2);
    let files = catalog.get_original("One file", "", None).unwrap();
    assert_eq!(files.translation(2).unwrap(), "%d souborů");
    assert_eq!(catalog.get_headers(None).unwrap().get("Language"), Some("cs"));
}

#[test]
fn test_msgconv_big_endian() {
    let dir = TempDir::new().unwrap();
    let po_path = create_temp_po_file(&dir, "cs.po", PO_CONTENT);
    let mo_path = dir.path().join("be.mo");

    run_test(TestPlan {
        args: vec![
            String::from("-B"),
            String::from("-o"),
            arg(&mo_path),
            arg(&po_path),
        ],
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    let data = fs::read(&mo_path).unwrap();
    assert_eq!(&data[0..4], &[0x95, 0x04, 0x12, 0xde]);
    let catalog = Catalog::open(&mo_path, None).unwrap();
    assert_eq!(
        catalog
            .get_original("Hello", "", None)
            .unwrap()
            .translation(0)
            .unwrap(),
        "Ahoj"
    );
}

#[test]
fn test_msgconv_headers() {
    let dir = TempDir::new().unwrap();
    let po_path = create_temp_po_file(&dir, "cs.po", PO_CONTENT);
    let out_path = dir.path().join("out.po");

    run_test(TestPlan {
        args: vec![
            String::from("-H"),
            String::from("Last-Translator=Jan Novák <jan@example.org>"),
            String::from("-o"),
            arg(&out_path),
            arg(&po_path),
        ],
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    let text = fs::read_to_string(&out_path).unwrap();
    assert!(text.contains("\"Last-Translator: Jan Novák <jan@example.org>\\n\"\n"));
    assert!(text.contains("\"Language: cs\\n\"\n"));
}

#[test]
fn test_msgconv_check_and_verbose() {
    let dir = TempDir::new().unwrap();
    let po_path = create_temp_po_file(&dir, "cs.po", PO_CONTENT);

    run_test(TestPlan {
        args: vec![String::from("-c"), String::from("-v"), arg(&po_path)],
        expected_out: String::new(),
        expected_err: String::from("cs: 2 entries\n"),
        expected_exit_code: 0,
    });
}

#[test]
fn test_msgconv_merge_and_scope() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let app = create_temp_po_file(&first, "app.po", "msgid \"Open\"\nmsgstr \"Otevřít\"\n");
    let lib = create_temp_po_file(&second, "lib.po", "msgid \"Close\"\nmsgstr \"Zavřít\"\n");
    let merged = first.path().join("merged.po");
    let scoped = first.path().join("scoped.mo");

    run_test(TestPlan {
        args: vec![String::from("-o"), arg(&merged), arg(&app), arg(&lib)],
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
    let catalog = Catalog::open(&merged, None).unwrap();
    assert_eq!(catalog.translations_count(None).unwrap(), 2);

    run_test(TestPlan {
        args: vec![
            String::from("-s"),
            String::from("lib"),
            String::from("-o"),
            arg(&scoped),
            arg(&app),
            arg(&lib),
        ],
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
    let catalog = Catalog::open(&scoped, None).unwrap();
    assert_eq!(catalog.translations_count(None).unwrap(), 1);
    assert!(catalog.get_original("Close", "", None).is_ok());
}

#[test]
fn test_msgconv_errors() {
    let dir = TempDir::new().unwrap();
    let bad = create_temp_po_file(&dir, "bad.mo", "tiny");
    let out = dir.path().join("out.po");

    let output = run_msgconv(&[String::from("-o"), arg(&out), arg(&bad)]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with(&format!("msgconv: {}: ", bad.display())));
    assert!(stderr.contains("not .mo compatible"));
    assert!(!out.exists());

    let txt = create_temp_po_file(&dir, "notes.txt", "");
    let output = run_msgconv(&[String::from("-o"), arg(&out), arg(&txt)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported file type"));
}
