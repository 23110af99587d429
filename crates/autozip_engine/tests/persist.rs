use std::fs;

use autozip_engine::{ensure_dir, read_optional, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("cache.ron");
    let writer = AtomicFileWriter::new(&target);

    writer.write("first").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "first");

    writer.write("second").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn write_fails_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let writer = AtomicFileWriter::new(blocker.join("cache.ron"));
    assert!(writer.write("data").is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn missing_file_reads_as_none() {
    let temp = TempDir::new().unwrap();
    assert_eq!(read_optional(&temp.path().join("absent.ron")).unwrap(), None);

    let present = temp.path().join("present.ron");
    fs::write(&present, "hello").unwrap();
    assert_eq!(read_optional(&present).unwrap().as_deref(), Some("hello"));
}
