//! The property tree: typed leaves plus object and array containers.

mod array;
mod object;
mod property;

pub use array::ArrayProperty;
pub use object::ObjectProperty;
pub use property::{Property, PropertyKind};

use crate::{Error, Result};

/// Splits a dotted path into its segments.
///
/// The empty path yields no segments (it names the node itself). Empty
/// segments, as in `a..b` or `.a`, are rejected.
pub(crate) fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}
