//! Shared fixtures for integration tests.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use lcatr_core::{FileLocator, LocatorConfig};

/// Fixed observation time used by every fixture.
pub fn test_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2012, 6, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

/// Locator that only searches `root`.
pub fn locator_for(root: &Path) -> FileLocator {
    FileLocator::new(&LocatorConfig {
        search_current_dir: false,
        root: Some(root.to_path_buf()),
        search_path: Vec::new(),
    })
}

/// Writes small input files under `root` and returns their relative names.
pub fn write_inputs(root: &Path, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|name| {
            fs::write(root.join(name), format!("contents of {}", name)).unwrap();
            name.to_string()
        })
        .collect()
}
