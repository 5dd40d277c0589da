//! Slot availability policy
//!
//! Each slot key of a closed domain may be used by at most one record.
//! These functions compute what a record's selector may offer and which
//! key a newly added record receives.

use std::collections::HashSet;

/// Keys offered to one record's selector
///
/// Domain order is preserved. Keys used by other records are excluded, the
/// record's own `current` key is always offered (appended if it is not part
/// of the domain), and the result is never empty: with every key exhausted
/// and no current key, `default_key` is offered alone.
pub fn available_domain(
    all_keys: &[&str],
    used_excluding_self: &HashSet<&str>,
    current: Option<&str>,
    default_key: &str,
) -> Vec<String> {
    let current = current.filter(|key| !key.is_empty());

    let mut keys: Vec<String> = all_keys
        .iter()
        .filter(|key| !used_excluding_self.contains(*key) || Some(**key) == current)
        .map(|key| key.to_string())
        .collect();

    if let Some(current) = current {
        if !keys.iter().any(|key| key == current) {
            keys.push(current.to_string());
        }
    }

    if keys.is_empty() {
        keys.push(default_key.to_string());
    }
    keys
}

/// First key in domain order that no record uses, else `default_key`
pub fn next_free_key(all_keys: &[&str], used: &HashSet<&str>, default_key: &str) -> String {
    all_keys
        .iter()
        .find(|key| !used.contains(*key))
        .map(|key| key.to_string())
        .unwrap_or_else(|| default_key.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 3] = ["prepend_base", "append_base", "prepend_final"];

    fn used<'a>(keys: &[&'a str]) -> HashSet<&'a str> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_excludes_keys_used_elsewhere() {
        let offered = available_domain(&KEYS, &used(&["append_base"]), Some("prepend_base"), "prepend_base");
        assert_eq!(offered, vec!["prepend_base", "prepend_final"]);
    }

    #[test]
    fn test_current_key_is_always_offered() {
        let offered = available_domain(
            &KEYS,
            &used(&["prepend_base", "append_base", "prepend_final"]),
            Some("append_base"),
            "prepend_base",
        );
        assert_eq!(offered, vec!["append_base"]);
    }

    #[test]
    fn test_foreign_current_key_is_appended() {
        let offered = available_domain(&KEYS, &used(&[]), Some("legacy_step"), "prepend_base");
        assert_eq!(offered.last().map(String::as_str), Some("legacy_step"));
        assert_eq!(offered.len(), 4);
    }

    #[test]
    fn test_exhausted_without_current_falls_back_to_default() {
        let offered = available_domain(&KEYS, &used(&KEYS), None, "prepend_base");
        assert_eq!(offered, vec!["prepend_base"]);
    }

    #[test]
    fn test_never_empty() {
        for current in [None, Some(""), Some("append_base")] {
            assert!(!available_domain(&KEYS, &used(&KEYS), current, "prepend_base").is_empty());
            assert!(!available_domain(&[], &used(&[]), current, "prepend_base").is_empty());
        }
    }

    #[test]
    fn test_next_free_key() {
        assert_eq!(next_free_key(&KEYS, &used(&[]), "prepend_base"), "prepend_base");
        assert_eq!(
            next_free_key(&KEYS, &used(&["prepend_base"]), "prepend_base"),
            "append_base"
        );
        assert_eq!(next_free_key(&KEYS, &used(&KEYS), "prepend_base"), "prepend_base");
    }
}
