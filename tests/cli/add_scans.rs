use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, jsonl};

const METADATA: &str = r#"{
    "iiifBaseUrlPerPage": {"scan001.jpg": "https://iiif.example/iiif/scan001"},
    "manifestUrlPerPage": {"scan001.jpg": "https://iiif.example/manifest.json"}
}"#;

fn page_input() -> String {
    jsonl(&[
        r#"{"id":"p1","body":{"type":"Page","image":{"url":"https://host/scans/scan001.jpg"}},"target":{"type":"Text","source":"http://x/1"}}"#,
        r#"{"id":"p2","body":{"type":"Page","image":{"url":"https://host/scans/scan002.jpg"}},"target":["http://x/2"]}"#,
        r#"{"id":"w1","body":{"type":"Word"},"target":["http://x/3"]}"#,
    ])
}

#[test]
fn test_add_scans_appends_canvas_and_image() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("metadata.json", METADATA)?;

    let mut cmd = test.add_scans_command();
    cmd.args(["--metadata", "metadata.json"]);
    let output = test.run(cmd, &page_input())?;

    assert_eq!(output.code, Some(0));
    let records = output.records()?;
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        json!({
            "id": "p1",
            "body": {"type": "Page", "image": {"url": "https://host/scans/scan001.jpg"}},
            "target": [
                {"type": "Text", "source": "http://x/1"},
                {"type": "Canvas", "source": "https://iiif.example/manifest.json"},
                {"type": "Image", "source": "https://iiif.example/iiif/scan001/full/max/0/default.jpg"}
            ]
        })
    );
    assert_eq!(records[1]["target"], json!(["http://x/2"]));
    insta::assert_snapshot!(output.stderr, @"✓ Added scans for 1 of 2 pages");
    Ok(())
}

#[test]
fn test_add_scans_delete_removes_image() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("metadata.json", METADATA)?;

    let mut cmd = test.add_scans_command();
    cmd.args(["--metadata", "metadata.json", "--delete"]);
    let output = test.run(cmd, &page_input())?;

    let records = output.records()?;
    assert_eq!(records[0]["body"], json!({"type": "Page"}));
    assert_eq!(records[0]["target"].as_array().map(Vec::len), Some(3));
    // unmatched pages keep their image
    assert_eq!(
        records[1]["body"]["image"],
        json!({"url": "https://host/scans/scan002.jpg"})
    );
    Ok(())
}

#[test]
fn test_add_scans_missing_keys_exits_with_2() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("metadata.json", r#"{"iiifBaseUrlPerPage": {}}"#)?;

    let mut cmd = test.add_scans_command();
    cmd.args(["--metadata", "metadata.json"]);
    let output = test.run(cmd, &page_input())?;

    assert_eq!(output.code, Some(2));
    assert_eq!(output.stdout, "");
    insta::assert_snapshot!(output.stderr, @"error: Missing 'iiifBaseUrlPerPage' or 'manifestUrlPerPage' keys in metadata file metadata.json");
    Ok(())
}

#[test]
fn test_add_scans_missing_metadata_file_fails() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.add_scans_command();
    cmd.args(["--metadata", "nope.json"]);
    let output = test.run(cmd, "")?;

    assert_eq!(output.code, Some(1));
    assert!(
        output
            .stderr
            .starts_with("error: Failed to read metadata file: nope.json"),
        "unexpected stderr: {}",
        output.stderr
    );
    Ok(())
}
