//! Recognized dictionaries and their default search priority.

use crate::dictionary::{parse_dictionary_name, Dictionary, DictionaryError, LEGACY_ORIGINAL};

/// All recognized dictionary names, in default search order.
///
/// Smaller grids come first: in first-match mode they win over larger grids
/// that happen to decode the same region.
pub const BUILTIN_DICTIONARY_NAMES: &[&str] = &[
    "DICT_4X4_50",
    "DICT_4X4_100",
    "DICT_4X4_250",
    "DICT_4X4_1000",
    "DICT_5X5_50",
    "DICT_5X5_100",
    "DICT_5X5_250",
    "DICT_5X5_1000",
    "DICT_6X6_50",
    "DICT_6X6_100",
    "DICT_6X6_250",
    "DICT_6X6_1000",
    "DICT_7X7_50",
    "DICT_7X7_100",
    "DICT_7X7_250",
    "DICT_7X7_1000",
    LEGACY_ORIGINAL,
];

/// Look up a built-in dictionary by name.
pub fn builtin_dictionary(name: &str) -> Option<Dictionary> {
    let name = *BUILTIN_DICTIONARY_NAMES.iter().find(|&&n| n == name)?;
    let (marker_size, marker_count) = parse_dictionary_name(name)?;
    Some(Dictionary {
        name,
        marker_size,
        marker_count,
    })
}

/// Every built-in dictionary, in default search order.
pub fn builtin_dictionaries() -> Vec<Dictionary> {
    BUILTIN_DICTIONARY_NAMES
        .iter()
        .filter_map(|name| builtin_dictionary(name))
        .collect()
}

/// Resolve a name or fail with the list of available dictionaries.
pub fn resolve_dictionary(name: &str) -> Result<Dictionary, DictionaryError> {
    builtin_dictionary(name).ok_or_else(|| DictionaryError::Unknown {
        name: name.to_string(),
        available: BUILTIN_DICTIONARY_NAMES.join(", "),
    })
}

/// Resolve a caller-supplied search order, preserving it.
pub fn resolve_search_order<S: AsRef<str>>(names: &[S]) -> Result<Vec<Dictionary>, DictionaryError> {
    if names.is_empty() {
        return Err(DictionaryError::EmptySearchList);
    }
    names.iter().map(|n| resolve_dictionary(n.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_resolve_with_expected_geometry() {
        let dicts = builtin_dictionaries();
        assert_eq!(dicts.len(), BUILTIN_DICTIONARY_NAMES.len());
        for d in &dicts {
            assert!((4..=7).contains(&d.marker_size), "{}", d.name);
            assert!(
                [50, 100, 250, 1000, 1024].contains(&d.marker_count),
                "{}",
                d.name
            );
        }
        let original = builtin_dictionary("DICT_ARUCO_ORIGINAL").expect("legacy dict");
        assert_eq!((original.marker_size, original.marker_count), (6, 1024));
    }

    #[test]
    fn default_order_starts_small() {
        let dicts = builtin_dictionaries();
        assert_eq!(dicts[0].name, "DICT_4X4_50");
        assert_eq!(dicts.last().map(|d| d.name), Some("DICT_ARUCO_ORIGINAL"));
    }

    #[test]
    fn unknown_name_lists_available() {
        let err = resolve_dictionary("DICT_9X9_5").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DICT_9X9_5"));
        assert!(msg.contains("DICT_6X6_250"));
        assert!(msg.contains("DICT_ARUCO_ORIGINAL"));
    }

    #[test]
    fn search_order_is_preserved() {
        let dicts = resolve_search_order(&["DICT_7X7_50", "DICT_4X4_50"][..]).expect("resolve");
        let names: Vec<_> = dicts.iter().map(|d| d.name).collect();
        assert_eq!(names, ["DICT_7X7_50", "DICT_4X4_50"]);
        assert_eq!(
            resolve_search_order::<&str>(&[]),
            Err(DictionaryError::EmptySearchList)
        );
    }
}
