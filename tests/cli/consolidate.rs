use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, jsonl};

#[test]
fn test_consolidate_merges_normalized_variant() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[
        r#"{"id":"a1","target":["http://x/1"]}"#,
        r#"{"id":"a1.normal","target":["http://x/1","http://x/2"]}"#,
    ]);

    let output = test.run(test.consolidate_command(), &input)?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        "{\"id\":\"a1\",\"target\":[{\"type\":\"OriginalText\",\"source\":\"http://x/1\"},{\"type\":\"NormalText\",\"source\":\"http://x/2\"}]}\n"
    );
    insta::assert_snapshot!(output.stderr, @"✓ Consolidated 1 (out of 1) annotations, passed 0, skipped 0");
    Ok(())
}

#[test]
fn test_consolidate_passes_blank_nodes_last() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[
        r#"{"body":{"value":"naïve"},"target":["http://x/9"]}"#,
        r#"{"id":"w1","target":["http://x/1"]}"#,
        r#"{"id":"w1-translated","target":["http://x/1"]}"#,
    ]);

    let output = test.run(test.consolidate_command(), &input)?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.records()?,
        vec![
            json!({"id": "w1", "target": [{"type": "NormalText", "source": "http://x/1"}]}),
            json!({"body": {"value": "naïve"}, "target": [{"type": "NormalText", "source": "http://x/9"}]}),
        ]
    );
    assert!(output.stdout.contains("naïve"), "non-ASCII must not be escaped");
    insta::assert_snapshot!(output.stderr, @"✓ Consolidated 0 (out of 0) annotations, passed 2, skipped 1");
    Ok(())
}

#[test]
fn test_consolidate_no_pass_drops_blank_nodes() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[
        r#"{"target":["http://x/9"]}"#,
        r#"{"id":"w1","target":["http://x/1"]}"#,
    ]);

    let mut cmd = test.consolidate_command();
    cmd.arg("--no-pass");
    let output = test.run(cmd, &input)?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.records()?.len(), 1);
    insta::assert_snapshot!(output.stderr, @"✓ Consolidated 0 (out of 0) annotations, passed 1, skipped 1");
    Ok(())
}

#[test]
fn test_consolidate_structures_single_url_targets() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[
        r#"{"id":"b","target":"http://x/1"}"#,
        r#"{"target":"http://x/9"}"#,
    ]);

    let output = test.run(test.consolidate_command(), &input)?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.records()?,
        vec![
            json!({"id": "b", "target": {"type": "NormalText", "source": "http://x/1"}}),
            json!({"target": {"type": "NormalText", "source": "http://x/9"}}),
        ]
    );

    let mut legacy = test.consolidate_command();
    legacy.arg("--legacy");
    let output = test.run(legacy, &input)?;
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn test_consolidate_custom_types_from_env() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[
        r#"{"id":"p","target":["http://x/1"]}"#,
        r#"{"id":"p.logical","target":["http://x/2"]}"#,
    ]);

    let mut cmd = test.consolidate_command();
    cmd.env("ANNOTOOL_ID_SUFFIX", ".logical");
    cmd.args(["--new-type", "Logical", "--original-type", "Physical"]);
    let output = test.run(cmd, &input)?;

    assert_eq!(
        output.records()?,
        vec![json!({"id": "p", "target": [
            {"type": "Physical", "source": "http://x/1"},
            {"type": "Logical", "source": "http://x/2"}
        ]})]
    );
    Ok(())
}

#[test]
fn test_consolidate_with_apparatus_and_body_ids() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "apparatus/doc1-entity-dict.json",
        r#"{"doc1/e5": {"type": "person", "name": "Ann"}}"#,
    )?;
    let input = jsonl(&[
        r#"{"id":"a","body":{"tei:ref":"doc1.xml#e5"},"target":["http://x/1"]}"#,
        r#"{"id":"b","body":{"tei:ref":"doc1.xml#e6"},"target":["http://x/2"]}"#,
    ]);

    let mut cmd = test.consolidate_command();
    cmd.arg("--apparatus-dir").arg(test.root().join("apparatus"));
    cmd.args(["--body-id-prefix", "urn:body:"]);
    let output = test.run(cmd, &input)?;

    assert_eq!(output.code, Some(0));
    let records = output.records()?;
    assert_eq!(
        records[0]["body"],
        json!({"tei:ref": {"tei:type": "person", "name": "Ann"}, "id": "urn:body:1"})
    );
    assert_eq!(
        records[1]["body"],
        json!({"tei:ref": {"doc1.xml#e6": null}, "id": "urn:body:2"})
    );
    insta::assert_snapshot!(output.stderr, @r"
    warning: entity not found: doc1.xml#e6 (doc1/e6)
    ✓ Consolidated 0 (out of 0) annotations, passed 2, skipped 0
    ✓ Assigned 2 body ids
    ✓ Resolved 1 entity reference
    ");
    Ok(())
}

#[test]
fn test_consolidate_verbose_notes() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[
        r#"{"id":"a","target":["http://x/1"]}"#,
        r#"{"id":"a.normal","target":["http://x/2"]}"#,
    ]);

    let mut cmd = test.consolidate_command();
    cmd.arg("--verbose");
    let output = test.run(cmd, &input)?;

    insta::assert_snapshot!(output.stderr, @r"
    note: merged a (+1 targets)
    note: a.normal is a secondary annotation
    ✓ Consolidated 1 (out of 1) annotations, passed 0, skipped 0
    ");
    Ok(())
}

#[test]
fn test_consolidate_malformed_input_fails() -> Result<()> {
    let test = CliTest::new()?;
    let input = jsonl(&[r#"{"id":"a","target":[]}"#, r#"{"id": oops}"#]);

    let output = test.run(test.consolidate_command(), &input)?;

    assert_eq!(output.code, Some(1));
    assert_eq!(output.stdout, "");
    assert!(
        output
            .stderr
            .starts_with("error: Malformed annotation on input line 2: "),
        "unexpected stderr: {}",
        output.stderr
    );
    Ok(())
}

#[test]
fn test_consolidate_missing_apparatus_fails() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.consolidate_command();
    cmd.args(["--apparatus-dir", "does-not-exist"]);
    let output = test.run(cmd, "")?;

    assert_eq!(output.code, Some(1));
    insta::assert_snapshot!(output.stderr, @"error: Apparatus directory not found: does-not-exist");
    Ok(())
}
