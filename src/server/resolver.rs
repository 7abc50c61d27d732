//! Maps request targets onto files under the document root.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File served for a directory target ending in '/'.
pub const INDEX_FILE: &str = "index.html";

/// A regular file a target resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub len: u64,
    pub modified: SystemTime,
}

/// Why a target resolved to nothing. Every variant is served as 404.
#[derive(Debug)]
pub enum NotFound {
    /// The target climbs above the document root
    OutsideRoot,
    /// A directory was requested without a trailing '/'
    MissingTrailingSlash,
    /// A file was requested with a trailing '/'
    TrailingSlashOnFile,
    /// Neither a regular file nor a directory
    UnsupportedFileType,
    Io(io::Error),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFound::OutsideRoot => write!(f, "target escapes document root"),
            NotFound::MissingTrailingSlash => write!(f, "directory target without trailing slash"),
            NotFound::TrailingSlashOnFile => write!(f, "file target with trailing slash"),
            NotFound::UnsupportedFileType => write!(f, "not a regular file or directory"),
            NotFound::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for NotFound {}

impl From<io::Error> for NotFound {
    fn from(e: io::Error) -> Self {
        NotFound::Io(e)
    }
}

/// Joins `target` onto `doc_root`, resolving "." and ".." lexically.
///
/// Returns None if a ".." would step above the root.
pub fn join_within_root(doc_root: &Path, target: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }

    let mut path = doc_root.to_path_buf();
    path.extend(segments);
    Some(path)
}

/// Resolves a validated request target to a file to serve.
///
/// Directories are only served through their index file and only when the
/// target ends in '/'. Regular files are only served when it doesn't.
pub async fn resolve(doc_root: &Path, target: &str) -> Result<ResolvedFile, NotFound> {
    let candidate = join_within_root(doc_root, target).ok_or(NotFound::OutsideRoot)?;
    let wants_dir = target.ends_with('/');

    let meta = tokio::fs::metadata(&candidate).await?;

    let path = if meta.is_dir() {
        if !wants_dir {
            return Err(NotFound::MissingTrailingSlash);
        }
        candidate.join(INDEX_FILE)
    } else if meta.is_file() {
        if wants_dir {
            return Err(NotFound::TrailingSlashOnFile);
        }
        candidate
    } else {
        return Err(NotFound::UnsupportedFileType);
    };

    let meta = tokio::fs::metadata(&path).await?;
    if !meta.is_file() {
        return Err(NotFound::UnsupportedFileType);
    }

    Ok(ResolvedFile {
        path,
        len: meta.len(),
        modified: meta.modified()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_plain_targets() {
        let root = Path::new("/srv/www");
        assert_eq!(join_within_root(root, "/"), Some(PathBuf::from("/srv/www")));
        assert_eq!(
            join_within_root(root, "/css/site.css"),
            Some(PathBuf::from("/srv/www/css/site.css"))
        );
    }

    #[test]
    fn resolves_dot_segments_inside_root() {
        let root = Path::new("/srv/www");
        assert_eq!(
            join_within_root(root, "/a/./b/../c.txt"),
            Some(PathBuf::from("/srv/www/a/c.txt"))
        );
        assert_eq!(join_within_root(root, "/a/.."), Some(PathBuf::from("/srv/www")));
    }

    #[test]
    fn rejects_escapes() {
        let root = Path::new("/srv/www");
        assert_eq!(join_within_root(root, "/.."), None);
        assert_eq!(join_within_root(root, "/../etc/passwd"), None);
        assert_eq!(join_within_root(root, "/a/../../www/index.html"), None);
    }
}
