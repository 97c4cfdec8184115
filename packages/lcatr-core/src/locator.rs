//! Resolution of referenced files and content hashing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use sha1::{Digest as _, Sha1};

use crate::config::LocatorConfig;
use crate::error::SchemaError;
use crate::types::Digest;

/// Resolves referenced file paths against a search path.
#[derive(Debug, Clone)]
pub struct FileLocator {
    dirs: Vec<PathBuf>,
}

impl Default for FileLocator {
    fn default() -> Self {
        Self::new(&LocatorConfig::default())
    }
}

impl FileLocator {
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            dirs: config.search_dirs(),
        }
    }

    /// Locator configured from `$CCDTEST_ROOT` and `$CCDTEST_PATH`.
    pub fn from_env() -> Self {
        Self::new(&LocatorConfig::from_env())
    }

    /// Returns the first existing file matching `path`.
    ///
    /// Absolute paths are checked as given; relative paths are tried
    /// against each search directory in order.
    pub fn locate(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        let found = self
            .dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file());
        tracing::debug!("Locating '{}': {:?}", path.display(), found);
        found
    }

    /// SHA-1 of the contents of the file `path` resolves to.
    pub fn digest(&self, path: &str) -> Result<Digest, SchemaError> {
        let resolved = self
            .locate(path)
            .ok_or_else(|| SchemaError::HashComputation {
                path: path.to_string(),
                message: "file not found in search path".to_string(),
            })?;
        sha1_file(&resolved).map_err(|e| SchemaError::HashComputation {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// SHA-1 of a file's contents, read in chunks.
pub fn sha1_file(path: &Path) -> std::io::Result<Digest> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha1::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Digest::from_array(hasher.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;
    use std::fs;
    use tempfile::tempdir;

    #[timeout(1000)]
    #[test]
    fn test_config_from_vars() {
        let config = LocatorConfig::from_vars(Some("/data/ccd"), Some("/a::/b"));
        assert_eq!(config.root, Some(PathBuf::from("/data/ccd")));
        assert_eq!(
            config.search_path,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(
            config.search_dirs(),
            vec![
                PathBuf::from("."),
                PathBuf::from("/data/ccd"),
                PathBuf::from("/a"),
                PathBuf::from("/b")
            ]
        );

        let empty = LocatorConfig::from_vars(Some(""), None);
        assert!(empty.root.is_none());
        assert!(empty.search_path.is_empty());
    }

    #[timeout(1000)]
    #[test]
    fn test_locate_search_order() {
        let root = tempdir().unwrap();
        let extra = tempdir().unwrap();
        fs::write(root.path().join("flat1.fits"), b"root copy").unwrap();
        fs::write(extra.path().join("flat1.fits"), b"extra copy").unwrap();
        fs::write(extra.path().join("flat2.fits"), b"extra only").unwrap();

        let config = LocatorConfig {
            search_current_dir: false,
            root: Some(root.path().to_path_buf()),
            search_path: vec![extra.path().to_path_buf()],
        };
        let locator = FileLocator::new(&config);

        assert_eq!(
            locator.locate("flat1.fits"),
            Some(root.path().join("flat1.fits"))
        );
        assert_eq!(
            locator.locate("flat2.fits"),
            Some(extra.path().join("flat2.fits"))
        );
        assert_eq!(locator.locate("flat3.fits"), None);

        let absolute = extra.path().join("flat1.fits");
        assert_eq!(locator.locate(&absolute), Some(absolute.clone()));
    }

    #[timeout(1000)]
    #[test]
    fn test_digest_matches_in_memory_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let contents = vec![7u8; 200_000];
        fs::write(&path, &contents).unwrap();

        let locator = FileLocator::default();
        let digest = locator.digest(path.to_str().unwrap()).unwrap();
        assert_eq!(digest, Digest::of_bytes(&contents));

        let missing = locator.digest("/definitely/not/here.fits");
        assert!(matches!(missing, Err(SchemaError::HashComputation { .. })));
    }
}
