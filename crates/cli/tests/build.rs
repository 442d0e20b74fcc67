mod common;

use common::{path_str, Workspace};
use deck_cli::build_deck;
use deck_core::{BuildConfig, Error, ErrorKind};
use deck_pptx::Presentation;

const HEADERS: [&str; 3] = ["name", "usn", "photo_path"];

#[test]
fn test_two_rows_one_missing_photo() {
    let ws = Workspace::new();
    let template = ws.template();
    let photo = ws.photo("a.png", 300, 300);
    let missing = ws.path("missing.jpg");
    let sheet = ws.workbook(
        &HEADERS,
        &[
            &["ann lee", "1rv20cs001", path_str(&photo).as_str()],
            &["bo kim", "1rv20cs002", path_str(&missing).as_str()],
        ],
    );
    let config = ws.config(&template, &sheet);

    let summary = build_deck(&config).unwrap();
    assert_eq!(summary.slides_created, 2);
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].name, "BO KIM");
    assert!(summary.failures.is_empty());

    let deck = Presentation::open(&config.output_path).unwrap();
    let slides = deck.slide_contents().unwrap();
    assert_eq!(slides.len(), 2);

    let first = &slides[0];
    assert_eq!(first.layout_name.as_deref(), Some("StudentLayout"));
    assert_eq!(first.placeholder(11).unwrap().text, "ANN LEE");
    assert_eq!(first.placeholder(12).unwrap().text, "1RV20CS001");
    assert!(first.placeholder(10).unwrap().has_picture);

    let second = &slides[1];
    assert_eq!(second.placeholder(11).unwrap().text, "BO KIM");
    assert_eq!(second.placeholder(12).unwrap().text, "1RV20CS002");
    assert!(!second.placeholder(10).unwrap().has_picture);
}

#[test]
fn test_one_slide_per_row() {
    let ws = Workspace::new();
    let template = ws.template();
    let photo = ws.photo("p.png", 40, 60);
    let photo = path_str(&photo);
    let names: Vec<String> = (0..5).map(|i| format!("student {}", i)).collect();
    let rows: Vec<[&str; 3]> = names.iter().map(|n| [n.as_str(), "usn", photo.as_str()]).collect();
    let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
    let sheet = ws.workbook(&HEADERS, &row_refs);
    let config = ws.config(&template, &sheet);

    let summary = build_deck(&config).unwrap();
    assert_eq!(summary.slides_created, 5);
    assert!(summary.warnings.is_empty());

    let slides = Presentation::open(&config.output_path)
        .unwrap()
        .slide_contents()
        .unwrap();
    assert_eq!(slides.len(), 5);
    for (slide, name) in slides.iter().zip(&names) {
        assert_eq!(slide.placeholder(11).unwrap().text, name.to_uppercase());
        assert!(slide.placeholder(10).unwrap().has_picture);
    }
}

#[test]
fn test_empty_sheet_saves_empty_deck() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[]);
    let config = ws.config(&template, &sheet);

    let summary = build_deck(&config).unwrap();
    assert_eq!(summary.slides_created, 0);
    assert_eq!(Presentation::open(&config.output_path).unwrap().slide_count(), 0);
}

#[test]
fn test_missing_column_writes_nothing() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&["name", "usn"], &[&["ann", "1"]]);
    let config = ws.config(&template, &sheet);

    let err = build_deck(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(!config.output_path.exists());
}

#[test]
fn test_missing_spreadsheet() {
    let ws = Workspace::new();
    let template = ws.template();
    let config = ws.config(&template, &ws.path("nope.xlsx"));

    let err = build_deck(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingFile);
    assert!(!config.output_path.exists());
}

#[test]
fn test_missing_template() {
    let ws = Workspace::new();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"]]);
    let config = ws.config(&ws.path("nope.pptx"), &sheet);

    let err = build_deck(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingFile);
}

#[test]
fn test_unknown_layout_lists_available() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"]]);
    let config = BuildConfig {
        layout_name: "Student Layout".to_string(),
        ..ws.config(&template, &sheet)
    };

    match build_deck(&config).unwrap_err() {
        Error::LayoutNotFound { name, available } => {
            assert_eq!(name, "Student Layout");
            assert_eq!(available, vec!["Title Slide", "StudentLayout"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.output_path.exists());
}

#[test]
fn test_unreadable_selected_layout_aborts_run() {
    let ws = Workspace::new();
    let template = ws.template_with_broken_layout(2, "StudentLayout");
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"]]);
    let config = ws.config(&template, &sheet);

    match build_deck(&config).unwrap_err() {
        Error::LayoutUnreadable { name, .. } => assert_eq!(name, "StudentLayout"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.output_path.exists());
}

#[test]
fn test_unreadable_other_layout_is_ignored() {
    let ws = Workspace::new();
    let template = ws.template_with_broken_layout(1, "Title Slide");
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"]]);
    let config = ws.config(&template, &sheet);

    let summary = build_deck(&config).unwrap();
    assert_eq!(summary.slides_created, 1);
    assert_eq!(Presentation::open(&config.output_path).unwrap().slide_count(), 1);
}

#[test]
fn test_sentinel_layout_touches_no_files() {
    let ws = Workspace::new();
    let config = BuildConfig {
        layout_name: "YOUR_LAYOUT_NAME_HERE".to_string(),
        ..ws.config(&ws.path("nope.pptx"), &ws.path("nope.xlsx"))
    };

    let err = build_deck(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_unknown_placeholder_aborts_run() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"], &["bo", "2", "b.png"]]);
    let config = BuildConfig {
        usn_idx: 13,
        ..ws.config(&template, &sheet)
    };

    let err = build_deck(&config).unwrap_err();
    assert!(matches!(err, Error::PlaceholderNotFound { idx: 13 }));
    assert!(!config.output_path.exists());
}

#[test]
fn test_unknown_photo_placeholder_aborts_when_photo_exists() {
    let ws = Workspace::new();
    let template = ws.template();
    let photo = ws.photo("a.png", 10, 10);
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", path_str(&photo).as_str()]]);
    let config = BuildConfig {
        photo_idx: 20,
        ..ws.config(&template, &sheet)
    };

    let err = build_deck(&config).unwrap_err();
    assert!(matches!(err, Error::PlaceholderNotFound { idx: 20 }));
    assert!(!config.output_path.exists());
}

#[test]
fn test_shared_text_index_keeps_last_value() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1rv20cs001", "a.png"]]);
    let config = BuildConfig {
        usn_idx: 11,
        ..ws.config(&template, &sheet)
    };

    let summary = build_deck(&config).unwrap();
    assert!(summary.failures.is_empty());

    let slides = Presentation::open(&config.output_path)
        .unwrap()
        .slide_contents()
        .unwrap();
    assert_eq!(slides[0].placeholder(11).unwrap().text, "1RV20CS001");
    assert_eq!(slides[0].placeholder(12).unwrap().text, "");
}

#[test]
fn test_wrong_placeholder_kind_is_per_row() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"], &["bo", "2", "b.png"]]);
    let config = BuildConfig {
        name_idx: 10,
        usn_idx: 12,
        photo_idx: 11,
        ..ws.config(&template, &sheet)
    };

    let summary = build_deck(&config).unwrap();
    assert_eq!(summary.slides_created, 2);
    assert_eq!(summary.failures.len(), 2);
    assert_eq!(summary.failures[0].name, "ANN");
    assert!(summary.failures[0].message.contains("PICTURE"));
    assert_eq!(Presentation::open(&config.output_path).unwrap().slide_count(), 2);
}

#[test]
fn test_unreadable_photo_keeps_text_slide() {
    let ws = Workspace::new();
    let template = ws.template();
    let bad = ws.path("bad.png");
    std::fs::write(&bad, b"not an image").unwrap();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", path_str(&bad).as_str()]]);
    let config = ws.config(&template, &sheet);

    let summary = build_deck(&config).unwrap();
    assert_eq!(summary.failures.len(), 1);

    let slides = Presentation::open(&config.output_path)
        .unwrap()
        .slide_contents()
        .unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].placeholder(11).unwrap().text, "ANN");
    assert!(!slides[0].placeholder(10).unwrap().has_picture);
}

#[test]
fn test_rebuild_is_deterministic() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "missing.png"]]);
    let config = ws.config(&template, &sheet);

    build_deck(&config).unwrap();
    let first = Presentation::open(&config.output_path).unwrap().slide_contents().unwrap();
    build_deck(&config).unwrap();
    let second = Presentation::open(&config.output_path).unwrap().slide_contents().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_save_failure_leaves_no_output() {
    let ws = Workspace::new();
    let template = ws.template();
    let sheet = ws.workbook(&HEADERS, &[&["ann", "1", "a.png"]]);
    let config = BuildConfig {
        output_path: ws.path("no_such_dir").join("out.pptx"),
        ..ws.config(&template, &sheet)
    };

    let err = build_deck(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Save);
    assert!(!config.output_path.exists());
}
