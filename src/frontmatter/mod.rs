use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::filesystem::{self, FilesystemError};

/// Key under which the text after the frontmatter block is stored.
pub const BODY_KEY: &str = "body";

const DELIMITER: &str = "---";

/// Error type for `read_frontmatter_file`.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Splits a document into its `---` frontmatter fields and body.
///
/// Frontmatter lines are `key: value` pairs split on the first `:`, with both
/// sides trimmed. Lines without a `:` are skipped. The body is stored under
/// [`BODY_KEY`], trimmed.
///
/// A document that does not open with a `---` line is all body. If the closing
/// `---` is missing, the whole remainder is treated as frontmatter.
pub fn parse_frontmatter(text: &str) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    let mut lines = text.lines();

    if !lines.next().is_some_and(|line| line.trim() == DELIMITER) {
        data.insert(BODY_KEY.to_string(), text.trim().to_string());
        return data;
    }

    for line in lines.by_ref() {
        if line.trim() == DELIMITER {
            break;
        }
        if let Some((key, value)) = split_line(line) {
            data.insert(key.to_string(), value.to_string());
        }
    }

    let body = lines.collect::<Vec<_>>().join("\n");
    data.insert(BODY_KEY.to_string(), body.trim().to_string());
    data
}

/// Reads a UTF-8 file and parses it with [`parse_frontmatter`].
///
/// # Errors
///
/// Returns `FrontmatterError` if the path cannot be resolved or the file cannot be read.
pub fn read_frontmatter_file<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>, FrontmatterError> {
    let path = filesystem::resolve(path)?;
    let content = filesystem::read_file(path)?;
    Ok(parse_frontmatter(&content))
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn splits_fields_and_body() {
        let text = "---\ntitle: Blue GUI\nurl: https://example.com/x\n---\n\n# Heading\nText\n";
        let data = parse_frontmatter(text);
        assert_eq!(data["title"], "Blue GUI");
        assert_eq!(data["url"], "https://example.com/x");
        assert_eq!(data[BODY_KEY], "# Heading\nText");
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn skips_lines_without_separator() {
        let data = parse_frontmatter("---\njust words\nkey:value\n---\nbody");
        assert_eq!(data.get("just words"), None);
        assert_eq!(data["key"], "value");
        assert_eq!(data[BODY_KEY], "body");
    }

    #[test]
    fn no_frontmatter_means_everything_is_body() {
        let data = parse_frontmatter("  plain text\nmore: stuff \n");
        assert_eq!(data.len(), 1);
        assert_eq!(data[BODY_KEY], "plain text\nmore: stuff");
    }

    #[test]
    fn unterminated_block_leaves_empty_body() {
        let data = parse_frontmatter("---\na: 1\nb: 2");
        assert_eq!(data["a"], "1");
        assert_eq!(data["b"], "2");
        assert_eq!(data[BODY_KEY], "");
    }

    #[test]
    fn empty_document() {
        let data = parse_frontmatter("");
        assert_eq!(data[BODY_KEY], "");
    }

    #[test]
    fn reads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.md");
        fs::write(&path, "---\nslug: blue-gui\n---\nHello").unwrap();
        let data = read_frontmatter_file(&path).unwrap();
        assert_eq!(data["slug"], "blue-gui");
        assert_eq!(data[BODY_KEY], "Hello");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            read_frontmatter_file("does_not_exist.md"),
            Err(FrontmatterError::Filesystem(FilesystemError::Io(_)))
        ));
    }

    #[test]
    fn unsupported_path_is_an_error() {
        assert!(matches!(
            read_frontmatter_file("~someone/project.md"),
            Err(FrontmatterError::Filesystem(FilesystemError::UserExpansionNotSupported))
        ));
    }
}
