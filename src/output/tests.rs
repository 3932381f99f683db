//! Tests for the output writer and artifact index.

use super::*;
use crate::config::NamingPolicy;
use std::fs;
use tempfile::TempDir;

fn meta(phase: &str, theme: &str, step: u32) -> ArtifactMeta {
    ArtifactMeta {
        topic: "Acme Growth".to_string(),
        phase: phase.to_string(),
        theme: theme.to_string(),
        step,
    }
}

fn file_count(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_write_places_artifact_under_topic_and_phase() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Sequence);

    let path = writer
        .write(&meta("phase_2", "3", 1), ArtifactKind::Prompt, "prompt text")
        .unwrap();

    assert_eq!(
        path,
        temp_dir
            .path()
            .join("acme-growth")
            .join("phase_2")
            .join("3_step1_prompt_001.md")
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "prompt text");
}

#[test]
fn test_timestamp_writes_never_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Timestamp);
    let m = meta("phase_1", "A", 1);

    let first = writer.write(&m, ArtifactKind::Prompt, "first").unwrap();
    let second = writer.write(&m, ArtifactKind::Prompt, "second").unwrap();

    assert_ne!(first, second);
    assert_eq!(fs::read_to_string(&first).unwrap(), "first");
    assert_eq!(fs::read_to_string(&second).unwrap(), "second");
    assert_eq!(file_count(first.parent().unwrap()), 2);
}

#[test]
fn test_sequence_writes_count_up() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Sequence);
    let m = meta("phase_1", "A", 2);

    let names: Vec<String> = (0..3)
        .map(|i| {
            writer
                .write(&m, ArtifactKind::Report, &format!("report {}", i))
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string()
        })
        .collect();

    assert_eq!(
        names,
        vec![
            "A_step2_report_001.md",
            "A_step2_report_002.md",
            "A_step2_report_003.md"
        ]
    );
}

#[test]
fn test_sequence_is_per_slot() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Sequence);

    writer.write(&meta("phase_1", "A", 1), ArtifactKind::Prompt, "a").unwrap();
    writer.write(&meta("phase_1", "A", 1), ArtifactKind::Prompt, "b").unwrap();
    let other_kind = writer.write(&meta("phase_1", "A", 1), ArtifactKind::Report, "c").unwrap();
    let other_theme = writer.write(&meta("phase_1", "B", 1), ArtifactKind::Prompt, "d").unwrap();

    assert!(other_kind.ends_with("A_step1_report_001.md"));
    assert!(other_theme.ends_with("B_step1_prompt_001.md"));
}

#[test]
fn test_sequence_skips_past_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Sequence);
    let dir = writer.artifact_dir("Acme Growth", "phase_1");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("A_step1_prompt_007.md"), "old").unwrap();

    let path = writer.write(&meta("phase_1", "A", 1), ArtifactKind::Prompt, "new").unwrap();

    assert!(path.ends_with("A_step1_prompt_008.md"));
    assert_eq!(fs::read_to_string(dir.join("A_step1_prompt_007.md")).unwrap(), "old");
}

#[test]
fn test_index_finds_newest_report() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Sequence);
    let m = meta("phase_1", "A", 1);

    writer.write(&m, ArtifactKind::Report, "old").unwrap();
    let newest = writer.write(&m, ArtifactKind::Report, "new").unwrap();
    writer.write(&m, ArtifactKind::Prompt, "prompt").unwrap();

    let index = ArtifactIndex::scan(temp_dir.path(), "Acme Growth").unwrap();

    assert_eq!(index.artifacts().len(), 3);
    let found = index.newest("phase_1", "A", 1, ArtifactKind::Report).unwrap();
    assert_eq!(found.path, newest);
    assert!(index.newest("phase_1", "A", 2, ArtifactKind::Report).is_none());
}

#[test]
fn test_index_newest_final_step() {
    let temp_dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp_dir.path(), NamingPolicy::Sequence);

    writer.write(&meta("phase_1", "A", 1), ArtifactKind::Report, "s1").unwrap();
    let step3 = writer.write(&meta("phase_1", "A", 3), ArtifactKind::Report, "s3").unwrap();
    writer.write(&meta("phase_1", "A", 4), ArtifactKind::Prompt, "p4").unwrap();

    let index = ArtifactIndex::scan(temp_dir.path(), "Acme Growth").unwrap();

    let found = index.newest_final_step("phase_1", "A", ArtifactKind::Report).unwrap();
    assert_eq!(found.path, step3);
    assert!(index.newest_final_step("phase_1", "B", ArtifactKind::Report).is_none());
}

#[test]
fn test_index_of_unknown_topic_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let index = ArtifactIndex::scan(temp_dir.path(), "Nothing Yet").unwrap();
    assert!(index.artifacts().is_empty());
}

#[test]
fn test_index_ignores_foreign_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("acme-growth").join("phase_1");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("notes.md"), "x").unwrap();
    fs::write(temp_dir.path().join("acme-growth").join("stray.md"), "x").unwrap();

    let index = ArtifactIndex::scan(temp_dir.path(), "Acme Growth").unwrap();
    assert!(index.artifacts().is_empty());
}

#[test]
fn test_meta_target() {
    assert_eq!(meta("phase_2", "3", 1).target(), "phase_2/3/1");
}
