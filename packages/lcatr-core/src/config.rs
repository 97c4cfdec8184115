//! Locator configuration.

use std::path::PathBuf;

/// Environment variable naming the root directory of test data.
pub const ROOT_ENV: &str = "CCDTEST_ROOT";

/// Environment variable holding a colon-separated list of search directories.
pub const PATH_ENV: &str = "CCDTEST_PATH";

/// Where referenced files are looked up, in search order.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Search the current directory first
    pub search_current_dir: bool,
    /// Test data root ($CCDTEST_ROOT)
    pub root: Option<PathBuf>,
    /// Additional search directories ($CCDTEST_PATH)
    pub search_path: Vec<PathBuf>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            search_current_dir: true,
            root: None,
            search_path: Vec::new(),
        }
    }
}

impl LocatorConfig {
    /// Reads the root and search path from the environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(ROOT_ENV).ok().as_deref(),
            std::env::var(PATH_ENV).ok().as_deref(),
        )
    }

    /// Builds a configuration from raw variable values; empty values are unset.
    pub fn from_vars(root: Option<&str>, search_path: Option<&str>) -> Self {
        Self {
            root: root.filter(|r| !r.is_empty()).map(PathBuf::from),
            search_path: search_path
                .map(|p| {
                    p.split(':')
                        .filter(|entry| !entry.is_empty())
                        .map(PathBuf::from)
                        .collect()
                })
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Directories to search, in order.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.search_path.len() + 2);
        if self.search_current_dir {
            dirs.push(PathBuf::from("."));
        }
        dirs.extend(self.root.iter().cloned());
        dirs.extend(self.search_path.iter().cloned());
        dirs
    }
}
