use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::filesystem::{self, FilesystemError, RemoveOptions};

/// Errors that can occur while packing a directory into a zip archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The source path does not exist or is not a directory.
    #[error("{0} is not a directory or does not exist")]
    NotADirectory(PathBuf),
    /// The source path has no usable parent or name to derive the archive path from.
    #[error("Cannot derive an archive path from {0}")]
    InvalidPath(PathBuf),
    /// A file inside the directory has a name that cannot be stored as-is in a zip entry.
    #[error("Cannot store {0} in the archive: name is not valid UTF-8")]
    NonUtf8Name(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Failed to walk directory: {0}")]
    WalkDir(#[from] walkdir::Error),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Returns where [`compress_and_remove_directory`] writes the archive for `directory`.
///
/// Without a name the directory's own path is used with its extension replaced
/// by `zip`. With a name the archive is `<parent>/<name>.zip`.
///
/// # Errors
///
/// Returns `InvalidPath` if `directory` has no parent or file name (e.g. `/`).
pub fn archive_path_for(directory: &Path, zip_name: Option<&str>) -> Result<PathBuf, ArchiveError> {
    if directory.file_name().is_none() {
        return Err(ArchiveError::InvalidPath(directory.to_path_buf()));
    }
    match zip_name {
        None => Ok(directory.with_extension("zip")),
        Some(name) => {
            let parent = directory
                .parent()
                .ok_or_else(|| ArchiveError::InvalidPath(directory.to_path_buf()))?;
            Ok(parent.join(format!("{name}.zip")))
        }
    }
}

/// Compresses the contents of `directory` into a zip archive, then deletes the directory.
///
/// Entries are stored relative to `directory`, so the archive root holds the
/// directory's contents rather than the directory itself. An existing archive
/// at the target path is replaced.
///
/// The archive is built in a temporary file next to the target and moved into
/// place once complete. The source directory is only removed after that move
/// succeeded, so a failure leaves it intact and no partial archive behind.
///
/// # Arguments
///
/// * `directory` - Directory to compress and remove.
/// * `zip_name` - Optional base name (without `.zip`) for the archive.
///
/// # Returns
///
/// The path of the written archive.
///
/// # Errors
///
/// Returns `NotADirectory` without touching the filesystem if `directory` is not
/// an existing directory. Other variants report failures while archiving or removing.
pub fn compress_and_remove_directory<P: AsRef<Path>>(
    directory: P,
    zip_name: Option<&str>,
) -> Result<PathBuf, ArchiveError> {
    let directory = filesystem::resolve(directory)?;
    if !filesystem::dir_exists(&directory) {
        return Err(ArchiveError::NotADirectory(directory));
    }

    let zip_path = archive_path_for(&directory, zip_name)?;
    let staging_dir = match zip_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".pack-").suffix(".zip.tmp");
    // Plain files get 0o666 minus the umask; tempfile would otherwise use 0o600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut staged = builder.tempfile_in(&staging_dir)?;
    let entries = write_zip(&directory, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(&zip_path).map_err(|e| ArchiveError::Io(e.error))?;

    tracing::info!(
        source = %directory.display(),
        archive = %zip_path.display(),
        entries,
        "created archive"
    );

    filesystem::remove_if_exists(&directory, RemoveOptions { recursive: true })?;
    Ok(zip_path)
}

/// Writes every file under `root` into a zip on `writer`, returning the entry count.
fn write_zip<W: Write + Seek>(root: &Path, writer: W) -> Result<usize, ArchiveError> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|_| ArchiveError::InvalidPath(path.to_path_buf()))?;
        let relative = entry_name(relative)?;

        if entry.file_type().is_dir() {
            if is_empty_dir(path)? {
                zip.add_directory(format!("{relative}/"), options)?;
                entries += 1;
            }
            continue;
        }

        tracing::debug!(entry = %relative, "adding file");
        zip.start_file(relative, options)?;
        let mut file = File::open(path)?;
        io::copy(&mut file, &mut zip)?;
        entries += 1;
    }

    zip.finish()?;
    Ok(entries)
}

/// Joins the components of a relative path with `/`, refusing names that would not round-trip.
fn entry_name(relative: &Path) -> Result<String, ArchiveError> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| ArchiveError::NonUtf8Name(relative.to_path_buf()))?;
                parts.push(part);
            }
            _ => return Err(ArchiveError::InvalidPath(relative.to_path_buf())),
        }
    }
    Ok(parts.join("/"))
}

fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(path.read_dir()?.next().is_none())
}

/// Computes the lowercase hex SHA-1 of a file, as advertised for server resource pack downloads.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn archive_sha1<P: AsRef<Path>>(path: P) -> Result<String, ArchiveError> {
    let path = filesystem::resolve(path)?;
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha1::new();

    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize().to_vec()))
}
