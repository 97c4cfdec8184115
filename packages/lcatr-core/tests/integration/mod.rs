//! Integration test suite.
//!
//! Each built-in file type is produced, validated, written, read back
//! through the registry, and checked again against the files it references.

pub mod gnc_tests;
pub mod helpers;
pub mod limsmeta_tests;
pub mod ptc_tests;
pub mod schema_property_tests;
