use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::error::IoError;

/// Outcome of [`ensure_dir`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyExisted,
}

/// Create `path` (and missing parents); an existing directory is not an error
pub async fn ensure_dir(path: &Path) -> Result<DirStatus, IoError> {
    let create_err = |source| IoError::CreateDir {
        path: path.to_path_buf(),
        source,
    };

    match fs::create_dir(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Created directory");
            Ok(DirStatus::Created)
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            let metadata = fs::metadata(path).await.map_err(create_err)?;
            if !metadata.is_dir() {
                return Err(IoError::NotADirectory(path.to_path_buf()));
            }
            info!("Directory {} already exists.", path.display());
            Ok(DirStatus::AlreadyExisted)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path).await.map_err(create_err)?;
            debug!(path = %path.display(), "Created directory and parents");
            Ok(DirStatus::Created)
        }
        Err(err) => Err(create_err(err)),
    }
}

/// Write `contents` to `path`, replacing any existing file
///
/// The handle is flushed and closed before returning.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    let write_err = |source| IoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).await.map_err(write_err)?;
    file.write_all(contents).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}

pub async fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    fs::read(path).await.map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy a file verbatim, returning the number of bytes copied
pub async fn copy_file(from: &Path, to: &Path) -> Result<u64, IoError> {
    let bytes = fs::copy(from, to).await.map_err(|source| IoError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    debug!(from = %from.display(), to = %to.display(), bytes, "Copied file");
    Ok(bytes)
}
