use flate2::write::GzEncoder;
use flate2::Compression;
use polydecode::document::node::Node;
use polydecode::file::loader::{load_document, load_document_from_reader};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn write_gzipped(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let file = fs::File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "doc.json", r#"{"type": "horse", "shoes": 4}"#);
    let node = load_document(&path).unwrap();
    assert_eq!(node.get("shoes").and_then(Node::as_i64), Some(4));
}

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "doc.yml", "type: duck\nfeathers: 12\n");
    let node = load_document(&path).unwrap();
    assert_eq!(node.get("type").and_then(Node::as_str), Some("duck"));
}

#[test]
fn test_load_gzipped_files() {
    let dir = TempDir::new().unwrap();

    let json = write_gzipped(&dir, "doc.json.gz", r#"{"a": [1, 2]}"#);
    let node = load_document(&json).unwrap();
    assert!(matches!(node.get("a"), Some(Node::Sequence(items)) if items.len() == 2));

    let yaml = write_gzipped(&dir, "doc.yaml.gz", "a: b\n");
    assert_eq!(load_document(&yaml).unwrap().get("a").and_then(Node::as_str), Some("b"));
}

#[test]
fn test_yaml_content_in_json_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "doc.json", "type: duck\n");
    let err = load_document(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse JSON"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(load_document(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_corrupted_gzip() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "doc.json.gz", "not gzip at all");
    let err = load_document(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to decompress"));
}

#[test]
fn test_reader_prefers_json() {
    // "1" is valid in both formats; JSON wins and yields an integer
    let node = load_document_from_reader("1".as_bytes()).unwrap();
    assert_eq!(node.as_i64(), Some(1));
}
