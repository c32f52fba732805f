use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// Wrapper for standard IO errors.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Error for empty path input.
    #[error("Path is empty")]
    EmptyPath,
    /// Error for paths that are not valid UTF-8 and so cannot be expanded.
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
    /// Error when the home directory cannot be determined.
    #[error("Home directory not found")]
    HomeDirNotFound,
    /// Error for unsupported user expansion in paths (e.g., ~user).
    #[error("User expansion (~user) not supported")]
    UserExpansionNotSupported,
}

/// Options for writing files, such as whether to overwrite existing files.
pub struct WriteOptions {
    /// If true, allows overwriting an existing file.
    pub overwrite: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

/// Options for removing files or directories, such as recursive removal.
#[derive(Default)]
pub struct RemoveOptions {
    /// If true, removes directories recursively.
    pub recursive: bool,
}

/// Expands `~` in a path and rejects paths that expand to nothing.
///
/// # Errors
///
/// * `EmptyPath` for an empty path.
/// * `NonUtf8Path` for a path that is not valid UTF-8.
/// * `UserExpansionNotSupported` for `~user` forms.
/// * `HomeDirNotFound` when `~` is used and no home directory is known.
pub fn resolve<P: AsRef<Path>>(path: P) -> Result<PathBuf, FilesystemError> {
    let path = path.as_ref();
    let raw = path
        .to_str()
        .ok_or_else(|| FilesystemError::NonUtf8Path(path.to_path_buf()))?;
    if raw.is_empty() {
        return Err(FilesystemError::EmptyPath);
    }

    let expanded = expand_home(raw);
    if !expanded.as_os_str().is_empty() {
        return Ok(expanded);
    }

    if raw == "~" || raw.starts_with("~/") || raw.starts_with("~\\") {
        Err(FilesystemError::HomeDirNotFound)
    } else {
        Err(FilesystemError::UserExpansionNotSupported)
    }
}

/// Checks if a directory exists at the given path.
pub fn dir_exists<P: AsRef<Path>>(dir: P) -> bool {
    dir.as_ref().is_dir()
}

/// Checks if a file exists at the given path.
pub fn file_exists<P: AsRef<Path>>(file: P) -> bool {
    file.as_ref().is_file()
}

/// Removes a file or directory at the given path, with options.
///
/// Missing paths are not an error.
///
/// # Errors
///
/// Returns `FilesystemError` if the removal fails.
pub fn remove_if_exists<P: AsRef<Path>>(path: P, options: RemoveOptions) -> Result<(), FilesystemError> {
    let p = path.as_ref();
    if p.is_dir() {
        if options.recursive {
            fs::remove_dir_all(p)?;
        } else {
            fs::remove_dir(p)?;
        }
    } else if p.is_file() {
        fs::remove_file(p)?;
    }
    Ok(())
}

/// Reads the contents of a UTF-8 file into a string.
///
/// # Errors
///
/// Returns `FilesystemError` if the file cannot be read.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String, FilesystemError> {
    Ok(fs::read_to_string(path)?)
}

/// Writes content to a file, with options for overwriting.
///
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns `FilesystemError` if the write fails or overwrite is not allowed.
pub fn write_file<P: AsRef<Path>>(path: P, content: &str, options: WriteOptions) -> Result<(), FilesystemError> {
    let p = path.as_ref();
    if p.exists() && !options.overwrite {
        return Err(FilesystemError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "File exists and overwrite is false",
        )));
    }
    let mut file = fs::File::create(p)?;
    file.write_all(content.as_bytes())?;
    tracing::debug!(path = %p.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Expands a path that starts with `~` to the user's home directory.
///
/// Returns an empty `PathBuf` if expansion fails.
pub fn expand_home(path: &str) -> PathBuf {
    if path.is_empty() {
        return PathBuf::new();
    }
    if !path.starts_with('~') {
        return PathBuf::from(path);
    }
    let home = match dirs::home_dir() {
        Some(h) => h,
        None => return PathBuf::new(),
    };
    if path == "~" {
        return home;
    }
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        return home.join(rest);
    }
    PathBuf::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_paths_are_left_alone() {
        assert_eq!(expand_home("build/pack"), PathBuf::from("build/pack"));
        assert_eq!(resolve("build/pack").unwrap(), PathBuf::from("build/pack"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/packs"), home.join("packs"));
        }
    }

    #[test]
    fn rejects_empty_and_user_paths() {
        assert!(matches!(resolve(""), Err(FilesystemError::EmptyPath)));
        assert!(matches!(
            resolve("~steve/packs"),
            Err(FilesystemError::UserExpansionNotSupported)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_reported_as_such() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"pack\xff"));
        assert!(matches!(resolve(path), Err(FilesystemError::NonUtf8Path(ref p)) if p == path));
    }

    #[test]
    fn write_file_overwrites_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_file(&path, "first", WriteOptions::default()).unwrap();
        write_file(&path, "second", WriteOptions::default()).unwrap();
        assert_eq!(read_file(&path).unwrap(), "second");
    }

    #[test]
    fn write_file_refuses_when_overwrite_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_file(&path, "first", WriteOptions::default()).unwrap();
        let result = write_file(&path, "second", WriteOptions { overwrite: false });
        assert!(result.is_err());
        assert_eq!(read_file(&path).unwrap(), "first");
    }

    #[test]
    fn write_file_fails_without_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(matches!(
            write_file(&path, "x", WriteOptions::default()),
            Err(FilesystemError::Io(_))
        ));
    }

    #[test]
    fn remove_if_exists_handles_trees_and_missing_paths() {
        let dir = tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("sub")).unwrap();
        fs::write(tree.join("sub").join("f.txt"), "x").unwrap();

        assert!(remove_if_exists(&tree, RemoveOptions::default()).is_err());
        remove_if_exists(&tree, RemoveOptions { recursive: true }).unwrap();
        assert!(!dir_exists(&tree));
        remove_if_exists(&tree, RemoveOptions { recursive: true }).unwrap();
    }

    #[test]
    fn existence_checks_distinguish_files_and_dirs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(dir_exists(dir.path()));
        assert!(!file_exists(dir.path()));
        assert!(file_exists(&file));
        assert!(!dir_exists(&file));
    }
}
