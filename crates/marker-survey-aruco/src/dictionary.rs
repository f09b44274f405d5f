//! Dictionary descriptors.

use serde::Serialize;

/// Name of the legacy dictionary whose geometry is not encoded in its name.
pub(crate) const LEGACY_ORIGINAL: &str = "DICT_ARUCO_ORIGINAL";

/// A fixed ArUco-style dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Dictionary {
    /// Canonical name, e.g. `DICT_6X6_250`.
    pub name: &'static str,
    /// Marker side length (number of inner bits per side).
    pub marker_size: usize,
    /// Number of distinct marker ids in the dictionary.
    pub marker_count: usize,
}

impl Dictionary {
    /// Whether `id` is a valid marker id for this dictionary.
    #[inline]
    pub fn contains_id(&self, id: u32) -> bool {
        (id as usize) < self.marker_count
    }
}

/// Derive `(marker_size, marker_count)` from a dictionary name.
///
/// `DICT_<N>X<N>_<COUNT>` yields `(N, COUNT)`, where `N` is the first
/// character of the second `_`-separated token. `DICT_ARUCO_ORIGINAL` maps to
/// `(6, 1024)`. Returns `None` for names that do not follow the pattern.
pub fn parse_dictionary_name(name: &str) -> Option<(usize, usize)> {
    if name == LEGACY_ORIGINAL {
        return Some((6, 1024));
    }
    let mut parts = name.split('_');
    if parts.next()? != "DICT" {
        return None;
    }
    let size = parts.next()?.chars().next()?.to_digit(10)? as usize;
    let count = parts.next()?.parse::<usize>().ok()?;
    if parts.next().is_some() || size == 0 || count == 0 {
        return None;
    }
    Some((size, count))
}

/// Errors raised while resolving dictionary names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("unknown dictionary {name}; available dictionaries: {available}")]
    Unknown { name: String, available: String },
    #[error("dictionary search list is empty")]
    EmptySearchList,
}
