//! Hand-maintained exceptions to the matching heuristics.
//!
//! Some exports produce names no heuristic can undo. Rather than special-case
//! them in code, they're supplied as configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Sidecar basename (filename minus `.json`) → media filename in the same
    /// directory. Authoritative: the title is never consulted for these.
    pub sidecars: BTreeMap<String, String>,
    /// Companion filename → main filename in the same directory. Tried before
    /// any other companion rule.
    pub companions: BTreeMap<String, String>,
}
impl Overrides {
    pub fn sidecar(&self, basename: &str) -> Option<&str> {
        self.sidecars.get(basename).map(String::as_str)
    }

    pub fn companion(&self, name: &str) -> Option<&str> {
        self.companions.get(name).map(String::as_str)
    }
}
