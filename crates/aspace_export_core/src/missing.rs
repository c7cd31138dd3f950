//! Placeholder value for attributes that do not exist.

use std::fmt;

/// Stands in for an attribute that could not be found on a record.
///
/// Any further attribute access on a `Missing` returns the same value, so a
/// dotted path that fails part way through still ends in a `Missing`. It
/// displays as its placeholder string, which is empty by default.
///
/// ```rust
/// use aspace_export_core::Missing;
///
/// let missing = Missing::new("n/a");
/// assert_eq!(missing.attr("parent").attr("uri").to_string(), "n/a");
/// assert_eq!(format!("{missing:?}"), "#<Missing>");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Missing {
    placeholder: String,
}

impl Missing {
    /// Creates a sentinel that displays as `placeholder`.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Returns the placeholder string.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns `self` whatever the attribute name.
    pub fn attr(&self, _name: &str) -> &Self {
        self
    }
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.placeholder)
    }
}

impl fmt::Debug for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#<Missing>")
    }
}
