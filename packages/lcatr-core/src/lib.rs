//! Schema definition and validation for CCD test-station result files.
//!
//! A result file is an ordered list of typed records: one header-only
//! primary record describing the test, followed by tabular records
//! holding measurements and file references. Each record type is a
//! static [`RecordSchema`]; a [`SchemaRegistry`] maps stored record names
//! back to their schemas when a file is read.

pub mod config;
pub mod container;
pub mod error;
pub mod locator;
pub mod record;
pub mod registry;
pub mod result_file;
pub mod schemas;
pub mod types;

pub use config::LocatorConfig;
pub use error::SchemaError;
pub use locator::FileLocator;
pub use record::{Column, ColumnDef, Field, FieldDef, Record, RecordKind, RecordSchema};
pub use registry::{register_builtin_schemas, SchemaRegistry};
pub use result_file::ResultFile;
pub use schemas::FileSchema;
pub use types::{Digest, TypeDescriptor, Value};
