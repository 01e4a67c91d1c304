//! Document loading.
//!
//! Files are read as JSON or YAML depending on their extension and may be
//! gzip-compressed. Standard input carries no name, so its format is guessed.

use crate::document::node::Node;
use crate::document::parser::{parse_json, parse_yaml};
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// The text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from the file name, ignoring a trailing `.gz`.
    ///
    /// - `animals.yaml` → YAML
    /// - `animals.yml.gz` → YAML
    /// - anything else → JSON
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path.as_ref().to_string_lossy().to_lowercase();
        let base = name.strip_suffix(".gz").unwrap_or(&name);
        if base.ends_with(".yaml") || base.ends_with(".yml") {
            Format::Yaml
        } else {
            Format::Json
        }
    }
}

/// Parses `content` in the given format.
pub fn parse_document(content: &str, format: Format) -> Result<Node> {
    match format {
        Format::Json => parse_json(content).context("Failed to parse JSON"),
        Format::Yaml => parse_yaml(content),
    }
}

/// Loads and parses a document from the filesystem.
///
/// # Examples
///
/// ```no_run
/// use polydecode::file::loader::load_document;
///
/// let document = load_document("animals.json.gz").unwrap();
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read or decompressed, or does not parse in
/// the format its name implies.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file {}", path_ref.display()))?
    };

    tracing::debug!(path = %path_ref.display(), gzipped = is_gzipped, "loaded document");
    parse_document(&content, Format::from_path(path_ref))
}

/// Loads a document from standard input.
///
/// See [`load_document_from_reader`] for how the input is interpreted.
pub fn load_document_from_stdin() -> Result<Node> {
    load_document_from_reader(std::io::stdin().lock())
}

/// Reads a document of unknown format from `reader`.
///
/// Gzip input is recognised by its magic bytes (0x1f 0x8b). The content is
/// parsed as JSON first and as YAML if that fails.
pub fn load_document_from_reader<R: Read>(mut reader: R) -> Result<Node> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .context("Failed to read input")?;

    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")?
    };

    if let Ok(node) = parse_json(&content) {
        return Ok(node);
    }
    parse_yaml(&content).context("Failed to parse input: it is neither valid JSON nor valid YAML")
}

fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(content: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("a.json"), Format::Json);
        assert_eq!(Format::from_path("a.yaml"), Format::Yaml);
        assert_eq!(Format::from_path("a.YML"), Format::Yaml);
        assert_eq!(Format::from_path("a.yml.gz"), Format::Yaml);
        assert_eq!(Format::from_path("a.json.gz"), Format::Json);
        assert_eq!(Format::from_path("noext"), Format::Json);
    }

    #[test]
    fn test_reader_json() {
        let node = load_document_from_reader(r#"{"type": "duck"}"#.as_bytes()).unwrap();
        assert_eq!(node.get("type").and_then(Node::as_str), Some("duck"));
    }

    #[test]
    fn test_reader_falls_back_to_yaml() {
        let node = load_document_from_reader("type: duck\nfeathers: 3\n".as_bytes()).unwrap();
        assert_eq!(node.get("feathers").and_then(Node::as_i64), Some(3));
    }

    #[test]
    fn test_reader_gzip() {
        let bytes = gzip(r#"{"type": "horse"}"#);
        let node = load_document_from_reader(bytes.as_slice()).unwrap();
        assert_eq!(node.get("type").and_then(Node::as_str), Some("horse"));
    }

    #[test]
    fn test_reader_rejects_garbage() {
        assert!(load_document_from_reader("{ [".as_bytes()).is_err());
    }

    #[test]
    fn test_parse_document_reports_format() {
        let err = parse_document("{", Format::Json).unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }
}
