//! Field type catalog and runtime values.

mod descriptor;
mod value;


pub use descriptor::{TypeDescriptor, TIMESTAMP_FORMAT};
pub use value::{Digest, Value};
