use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn query() -> Value {
    json!({
        "document": {
            "id": "doc-1",
            "friend": { "name": "George Fox", "alphabeticalName": "Fox, George", "lang": "en" },
            "altLanguageId": null,
            "title": "Journal",
            "originalTitle": "A Journal or Historical Account",
            "slug": "journal",
            "filename": "Journal",
            "description": "",
            "partialDescription": "",
            "featuredDescription": null,
            "published": 1694,
            "incomplete": false,
            "tags": [{ "type": "journal" }],
            "relatedDocuments": [],
            "editions": [
                { "type": "original", "editor": null, "isDraft": false, "paperbackSplits": [] }
            ]
        },
        "selectableDocuments": [
            { "id": "doc-123", "title": "Apology", "friend": { "name": "Robert Barclay", "alphabeticalName": "Barclay, Robert", "lang": "en" } }
        ]
    })
}

fn catalog(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_catalog"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_edit_and_save() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("query.json"), query().to_string()).unwrap();
    fs::create_dir(dir.path().join("scripts")).unwrap();
    fs::write(
        dir.path().join("scripts").join("ops.json"),
        json!([
            { "type": "replace_value", "at": "editions[0].editor", "with": "Jane Doe" },
            { "type": "add_item", "at": "relatedDocuments", "value": { "documentId": "doc-123", "description": "" } }
        ])
        .to_string(),
    )
    .unwrap();

    let output = catalog(
        dir.path(),
        &["edit", "query.json", "--script", "ops.json", "--save", "out.json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
    assert_eq!(saved["editions"][0]["editor"], json!("Jane Doe"));
    assert_eq!(saved["relatedDocuments"][0]["documentId"], json!("doc-123"));
}

#[test]
fn test_invalid_document_blocks_save() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("query.json"), query().to_string()).unwrap();
    fs::write(
        dir.path().join("ops.json"),
        json!([{ "type": "replace_value", "at": "slug", "with": "Bad Slug" }]).to_string(),
    )
    .unwrap();

    let args = ["edit", "query.json", "--script", "ops.json", "--save", "out.json"];
    let output = catalog(dir.path(), &args);
    assert!(!output.status.success());
    assert!(!dir.path().join("out.json").exists());

    let mut forced = args.to_vec();
    forced.push("--force");
    assert!(catalog(dir.path(), &forced).status.success());
    assert!(dir.path().join("out.json").exists());
}

#[test]
fn test_validate_reports_issues() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.json"), query().to_string()).unwrap();

    let mut bad = query();
    bad["document"]["published"] = json!("16x4");
    fs::write(dir.path().join("bad.json"), bad.to_string()).unwrap();

    assert!(catalog(dir.path(), &["validate", "good.json"]).status.success());
    let output = catalog(dir.path(), &["validate", "bad.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("must be a four digit year"));
}

#[test]
fn test_out_of_range_script_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("query.json"), query().to_string()).unwrap();
    fs::write(
        dir.path().join("ops.json"),
        json!([{ "type": "delete_item", "at": "editions[3]" }]).to_string(),
    )
    .unwrap();

    let output = catalog(dir.path(), &["edit", "query.json", "--script", "ops.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of bounds"));
}

#[test]
fn test_untyped_value_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("query.json"), query().to_string()).unwrap();
    fs::write(
        dir.path().join("ops.json"),
        json!([{ "type": "replace_value", "at": "published", "with": "16x" }]).to_string(),
    )
    .unwrap();

    let output = catalog(dir.path(), &["edit", "query.json", "--script", "ops.json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("must be a four digit year"));
    assert!(stdout.contains("Unavailable"));

    let output = catalog(
        dir.path(),
        &["edit", "query.json", "--script", "ops.json", "--save", "out.json", "--force"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot save"));
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn test_show_labels_alternate_language() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = query();
    doc["document"]["altLanguageId"] = json!("doc-es-1");
    fs::write(dir.path().join("query.json"), doc.to_string()).unwrap();

    let output = catalog(dir.path(), &["show", "query.json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Spanish Version Document ID: doc-es-1"));
    assert!(stdout.contains("Barclay, Robert: Apology"));
}
