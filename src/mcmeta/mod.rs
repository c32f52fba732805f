use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filesystem::{self, FilesystemError, WriteOptions};

/// Pack format written when the caller does not pick one.
pub const DEFAULT_PACK_FORMAT: u32 = 37;

/// Upper bound of `supported_formats`, kept open so newer game versions still load the pack.
pub const MAX_SUPPORTED_FORMAT: u32 = 9999;

/// Represents the contents of a `pack.mcmeta` file, which is used in Minecraft resource packs
/// to provide metadata about the pack, such as its format version and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mcmeta {
    /// The `pack` section containing format and description.
    pub pack: PackSection,
}

/// Represents the `pack` section in `pack.mcmeta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSection {
    /// The format version of the resource pack.
    pub pack_format: u32,
    /// Range of formats the pack declares itself compatible with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<SupportedFormats>,
    /// A description of the resource pack.
    pub description: String,
}

/// Inclusive range of pack formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedFormats {
    pub min_inclusive: u32,
    pub max_inclusive: u32,
}

impl PackSection {
    /// Builds a section whose supported range starts at `pack_format` and is open-ended.
    pub fn new(description: impl Into<String>, pack_format: u32) -> Self {
        Self {
            pack_format,
            supported_formats: Some(SupportedFormats {
                min_inclusive: pack_format,
                max_inclusive: MAX_SUPPORTED_FORMAT,
            }),
            description: description.into(),
        }
    }
}

/// Custom error type for reading and writing `pack.mcmeta` files.
#[derive(Debug, Error)]
pub enum McmetaError {
    #[error("Failed to read the file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Writes a `pack.mcmeta` descriptor to `path`, replacing any existing file.
///
/// # Arguments
///
/// * `path` - Where to write the descriptor. Its parent directory must exist.
/// * `description` - The pack description, written as-is.
/// * `pack_format` - The pack format, [`DEFAULT_PACK_FORMAT`] when `None`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be written.
pub fn create_pack_metadata<P: AsRef<Path>>(
    path: P,
    description: &str,
    pack_format: Option<u32>,
) -> Result<Mcmeta, McmetaError> {
    let path = filesystem::resolve(path)?;
    let mcmeta = Mcmeta {
        pack: PackSection::new(description, pack_format.unwrap_or(DEFAULT_PACK_FORMAT)),
    };

    let content = serde_json::to_string_pretty(&mcmeta)?;
    filesystem::write_file(&path, &content, WriteOptions::default())?;

    tracing::debug!(path = %path.display(), pack_format = mcmeta.pack.pack_format, "wrote pack metadata");
    Ok(mcmeta)
}

/// Parses a `pack.mcmeta` file and returns its contents as an `Mcmeta` struct.
///
/// # Arguments
///
/// * `path` - A path to the `pack.mcmeta` file to parse.
///
/// # Returns
///
/// * `Ok(Mcmeta)` if the file is successfully read and parsed.
/// * `Err(McmetaError)` if there is an error reading the file or parsing its contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if the contents cannot be deserialized
/// as JSON, which includes a missing `pack` section. Field values are not range checked.
pub fn parse_resource_pack_mcmeta<P: AsRef<Path>>(path: P) -> Result<Mcmeta, McmetaError> {
    let path = filesystem::resolve(path)?;
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
