//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use posixutils_catalog::gettext_lib::source::{FileFormat, SourceLookup};
use posixutils_catalog::{Catalog, CatalogConfig, CommentKind, Error};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CS_PO: &str = r#"# Czech translation
msgid ""
msgstr ""
"Project-Id-Version: demo 1.0\n"
"Language: cs\n"
"Plural-Forms: nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;\n"

#. greeting on the start page
#: src/main.c:10
msgid "Hello"
msgstr "Ahoj"

#, c-format
msgid "%d cat"
msgid_plural "%d cats"
msgstr[0] "%d kočka"
msgstr[1] "%d kočky"
msgstr[2] "%d koček"

msgctxt "menu"
msgid "File"
msgstr "Soubor"

msgid "Untranslated"
msgstr ""
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn collaborative() -> Catalog {
    Catalog::with_config(CatalogConfig {
        collaborative: true,
        ..CatalogConfig::default()
    })
}

#[test]
fn test_load_po_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cs.po", CS_PO);

    let catalog = Catalog::open(&path, None).unwrap();
    assert_eq!(catalog.translations_count(None).unwrap(), 4);

    let hello = catalog.get_original("Hello", "", None).unwrap();
    assert_eq!(hello.translation(0).unwrap(), "Ahoj");
    assert_eq!(
        hello.comment(CommentKind::ExtractedComment).unwrap(),
        "greeting on the start page"
    );
    assert_eq!(hello.comment(CommentKind::Reference).unwrap(), "src/main.c:10");

    let cat = catalog.get_original("%d cat", "", Some("cs")).unwrap();
    assert_eq!(cat.plural(), Some("%d cats"));
    assert_eq!(cat.translation(2).unwrap(), "%d koček");
    assert_eq!(cat.comment(CommentKind::Flag).unwrap(), "c-format");

    let headers = catalog.get_headers(Some("cs")).unwrap();
    assert_eq!(headers.get("Project-Id-Version"), Some("demo 1.0"));
    assert_eq!(headers.get("Language"), Some("cs"));
    assert_eq!(headers.get("MIME-Version"), Some("1.0"));
}

#[test]
fn test_po_and_mo_files_agree() {
    let dir = TempDir::new().unwrap();
    let po_path = write_file(&dir, "cs.po", CS_PO);
    let mo_path = dir.path().join("out.mo");

    let mut catalog = Catalog::open(&po_path, None).unwrap();
    catalog.save_dictionary(&mo_path, None).unwrap();

    let from_po = Catalog::open(&po_path, None).unwrap();
    let from_mo = Catalog::open(&mo_path, None).unwrap();

    assert_eq!(
        from_po.translations_count(None).unwrap(),
        from_mo.translations_count(None).unwrap()
    );
    for entry in from_po.get_translations(None).unwrap() {
        let other = from_mo
            .get_original(entry.singular(), entry.context().unwrap_or(""), None)
            .unwrap();
        assert_eq!(entry.plural(), other.plural());
        assert_eq!(entry.translations(), other.translations());
    }
    assert_eq!(
        from_mo.get_headers(None).unwrap().get("Plural-Forms"),
        Some("nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;")
    );
}

#[test]
fn test_save_po_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cs.po", CS_PO);
    let copy = dir.path().join("copy.po");

    let mut catalog = Catalog::open(&path, None).unwrap();
    catalog
        .get_original_mut("Untranslated", "", None)
        .unwrap()
        .set_translation("Nepřeloženo", 0)
        .unwrap();
    catalog.save_dictionary(&copy, None).unwrap();

    let text = fs::read_to_string(&copy).unwrap();
    assert!(text.starts_with("msgid \"\"\nmsgstr \"\"\n"));
    assert!(text.contains("#. greeting on the start page\n#: src/main.c:10\nmsgid \"Hello\"\n"));
    assert!(text.contains("msgctxt \"menu\"\nmsgid \"File\"\nmsgstr \"Soubor\"\n"));

    let reloaded = Catalog::open(&copy, None).unwrap();
    assert_eq!(
        reloaded
            .get_original("Untranslated", "", None)
            .unwrap()
            .translation(0)
            .unwrap(),
        "Nepřeloženo"
    );
}

#[test]
fn test_five_byte_mo_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cs.mo");
    fs::write(&path, b"\xde\x12\x04\x95\x00").unwrap();

    match Catalog::open(&path, None) {
        Err(Error::Format(msg)) => assert!(msg.contains("not .mo compatible")),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_invalid_utf8_po_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cs.po");
    fs::write(&path, b"msgid \"a\"\nmsgstr \"\xff\"\n").unwrap();

    assert!(matches!(Catalog::open(&path, None), Err(Error::Format(_))));
}

#[test]
fn test_syntax_error_reports_line() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cs.po", "msgid \"a\"\nmsgstr \"b\n");

    match Catalog::open(&path, None) {
        Err(Error::Format(msg)) => assert!(msg.contains("line 2"), "{}", msg),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_and_unsupported_files() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Catalog::open(dir.path().join("missing.po"), None),
        Err(Error::Io { .. })
    ));
    assert!(matches!(
        Catalog::open(dir.path().join("cs.pot"), None),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_collaborative_merge() {
    let app_dir = TempDir::new().unwrap();
    let lib_dir = TempDir::new().unwrap();
    let app = write_file(&app_dir, "cs.po", "msgid \"Hello\"\nmsgstr \"Ahoj\"\n");
    let lib = write_file(
        &lib_dir,
        "cs.po",
        "msgid \"\"\nmsgstr \"Language: cs\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Nazdar\"\n",
    );

    let mut catalog = collaborative();
    assert_eq!(catalog.load_dictionary(&app, None).unwrap(), "cs");
    assert!(matches!(
        catalog.load_dictionary(&lib, None),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(catalog.load_dictionary(&lib, Some("lib")).unwrap(), "lib");

    assert_eq!(catalog.translations_count(None).unwrap(), 2);
    assert_eq!(
        catalog
            .get_original("Hello", "", Some("lib"))
            .unwrap()
            .translation(0)
            .unwrap(),
        "Nazdar"
    );
    assert_eq!(catalog.resolve_source_id("cs.po"), SourceLookup::Ambiguous);
    assert!(catalog.source_id("cs.po").is_err());
    assert_eq!(catalog.get_headers(Some("cs")).unwrap().get("Language"), None);
    assert_eq!(catalog.get_headers(Some("lib")).unwrap().get("Language"), Some("cs"));

    let out = app_dir.path().join("lib.mo");
    catalog.save_dictionary(&out, Some("lib")).unwrap();
    let saved = Catalog::open(&out, None).unwrap();
    assert_eq!(saved.translations_count(None).unwrap(), 1);
    assert_eq!(saved.get_headers(None).unwrap().get("Language"), Some("cs"));
}

#[test]
fn test_sibling_formats_share_source() {
    let dir = TempDir::new().unwrap();
    let po_path = write_file(&dir, "cs.po", CS_PO);
    let mut source = Catalog::open(&po_path, None).unwrap();
    source.save_dictionary(dir.path().join("cs.mo"), None).unwrap();

    let mut catalog = collaborative();
    catalog.load_dictionary(&po_path, None).unwrap();
    // same keys again under the same source
    assert!(matches!(
        catalog.load_dictionary(dir.path().join("cs.mo"), None),
        Err(Error::InvalidArgument(_))
    ));

    let record = catalog.sources().get("cs").unwrap();
    assert!(record.has_format(FileFormat::Po));
    assert!(record.has_format(FileFormat::Mo));
    assert_eq!(catalog.sources().len(), 1);
}

#[test]
fn test_unscoped_save_of_merged_sources() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let a = write_file(&first, "a.po", "msgid \"One\"\nmsgstr \"Jedna\"\n");
    let b = write_file(&second, "b.po", "msgid \"Two\"\nmsgstr \"Dva\"\n");

    let mut catalog = collaborative();
    catalog.load_dictionary(&a, None).unwrap();
    catalog.load_dictionary(&b, None).unwrap();

    let out = first.path().join("merged.po");
    catalog.save_dictionary(&out, None).unwrap();
    let merged = Catalog::open(&out, None).unwrap();
    assert_eq!(merged.translations_count(None).unwrap(), 2);
    assert!(merged.get_original("Two", "", None).is_ok());
}

#[test]
fn test_source_path_lookup() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cs.po", CS_PO);
    let catalog = Catalog::open(&path, None).unwrap();

    let canonical = fs::canonicalize(&path).unwrap();
    assert_eq!(
        catalog.source_id(canonical.to_str().unwrap()).unwrap(),
        "cs"
    );
    assert_eq!(catalog.source_id("cs.po").unwrap(), "cs");
    assert_eq!(
        catalog.sources().get("cs").unwrap().path(FileFormat::Mo),
        canonical.with_extension("mo")
    );
    assert!(Path::new(&canonical).is_absolute());
}

#[test]
fn test_add_to_opened_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cs.po", CS_PO);
    let copy = dir.path().join("copy.po");

    let mut catalog = Catalog::open(&path, None).unwrap();
    assert!(matches!(
        catalog.add_original("Hello", "", None, Some("Nazdar".into())),
        Err(Error::InvalidArgument(_))
    ));
    catalog
        .add_original("Goodbye", "", None, Some("Nashledanou".into()))
        .unwrap();
    assert_eq!(catalog.translations_count(Some("cs")).unwrap(), 5);

    catalog.save_dictionary(&copy, None).unwrap();
    let reloaded = Catalog::open(&copy, None).unwrap();
    assert_eq!(reloaded.translations_count(None).unwrap(), 5);
    assert_eq!(
        reloaded
            .get_original("Hello", "", None)
            .unwrap()
            .translation(0)
            .unwrap(),
        "Ahoj"
    );
    assert_eq!(
        reloaded
            .get_original("Goodbye", "", None)
            .unwrap()
            .translation(0)
            .unwrap(),
        "Nashledanou"
    );
}

#[test]
fn test_partially_translated_plural_through_mo() {
    let dir = TempDir::new().unwrap();
    let po_path = write_file(
        &dir,
        "cs.po",
        "msgid \"%d cat\"\nmsgid_plural \"%d cats\"\n\
         msgstr[0] \"\"\nmsgstr[1] \"\"\nmsgstr[2] \"%d koček\"\n",
    );
    let mo_path = dir.path().join("cs.mo");

    let mut catalog = Catalog::open(&po_path, None).unwrap();
    catalog.save_dictionary(&mo_path, None).unwrap();

    let from_po = Catalog::open(&po_path, None).unwrap();
    let from_mo = Catalog::open(&mo_path, None).unwrap();
    let expected = from_po.get_original("%d cat", "", None).unwrap();
    let actual = from_mo.get_original("%d cat", "", None).unwrap();
    assert_eq!(actual.translations(), expected.translations());
    assert_eq!(actual.translation(2).unwrap(), "%d koček");
    assert!(actual.translation(0).is_err());
}
