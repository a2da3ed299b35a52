//! Data models exchanged with the demo server.
//!
//! Field names are capitalised on the wire (`A`, `B`) to match servers that
//! encode exported struct fields verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Argument and reply record for the `swap` method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Args {
    #[serde(rename = "A", default)]
    pub a: i64,
    #[serde(rename = "B", default)]
    pub b: i64,
}

impl Args {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// The pair with its fields exchanged.
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A:{} B:{}", self.a, self.b)
    }
}
