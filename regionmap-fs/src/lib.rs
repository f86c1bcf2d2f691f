//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Boundary configuration and record files are JSON; these helpers open them
//! through capability-based handles and report failures with the offending
//! path attached.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::{Serialize, de::DeserializeOwned};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Component;
use thiserror::Error;

/// Errors raised while reading or writing JSON files.
#[derive(Debug, Error)]
pub enum JsonFileError {
    /// The file could not be opened or created.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file contents were not valid JSON for the target type.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path whose contents were rejected.
        path: Utf8PathBuf,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Serialising or flushing the output failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying encoder or IO error.
        #[source]
        source: serde_json::Error,
    },
}

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve an ambient directory for the given path and return the directory with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_string();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file using capability-based IO.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Deserialise a JSON document from `path`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use regionmap_fs::read_json_file;
///
/// # fn main() -> Result<(), regionmap_fs::JsonFileError> {
/// let names: Vec<String> = read_json_file(Utf8Path::new("names.json"))?;
/// # let _ = names;
/// # Ok(())
/// # }
/// ```
pub fn read_json_file<T>(path: &Utf8Path) -> Result<T, JsonFileError>
where
    T: DeserializeOwned,
{
    let file = open_utf8_file(path).map_err(|source| JsonFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialise `value` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
pub fn write_json_file<T>(path: &Utf8Path, value: &T) -> Result<(), JsonFileError>
where
    T: Serialize + ?Sized,
{
    let open_error = |source| JsonFileError::Open {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(open_error)?;
    let (dir, name) = open_dir_and_file(path).map_err(open_error)?;
    let file = dir.create(name.as_str()).map_err(open_error)?;
    let write_error = |source| JsonFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(write_error)?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|err| write_error(serde_json::Error::io(err)))
}

/// Ensure the parent directory for `path` exists, handling absolute paths safely for cap-std.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_os_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)?;
    Ok(())
}

/// Split an absolute or relative parent path into an ambient base directory and a relative suffix.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;

    Ok((dir, relative))
}
