//! Pure string/value heuristics backing the 1NF and 2NF checks.
//!
//! Isolated here so they can be tuned or swapped without touching the
//! detection or planning logic.

use std::collections::HashMap;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::catalog::value::Value;

/// Characters that mark a text value as a packed list.
pub const SEPARATOR_CHARS: [char; 6] = [',', ';', '/', '|', '[', ']'];

static RE_TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\d+)$").unwrap());

/// Is `value` a single atomic value in the 1NF sense?
///
/// A value is atomic unless it is a string containing one of
/// [`SEPARATOR_CHARS`] or starting with `{` or `[`. Nulls and non-string
/// values are atomic; column types the scan cannot inspect are skipped
/// rather than failed.
pub fn is_atomic_value(value: &Value) -> bool {
    let Value::Text(s) = value else {
        return true;
    };
    if s.contains(SEPARATOR_CHARS) {
        return false;
    }
    let trimmed = s.trim_start();
    !(trimmed.starts_with('{') || trimmed.starts_with('['))
}

/// Group attribute names that differ only by a trailing-digit suffix,
/// e.g. `Phone1, Phone2` under the base `phone`.
///
/// The group key is the trimmed, lowercased prefix; only families with more
/// than one member are returned, in order of first appearance.
pub fn repeated_name_groups(attrs: &[String]) -> Vec<(String, Vec<String>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for attr in attrs {
        let Some(caps) = RE_TRAILING_DIGITS.captures(attr) else {
            continue;
        };
        let base = caps[1].trim().to_ascii_lowercase();
        let members = groups.entry(base.clone()).or_default();
        if members.is_empty() {
            order.push(base);
        }
        members.push(attr.clone());
    }

    order
        .into_iter()
        .filter_map(|base| {
            let members = groups.remove(&base)?;
            (members.len() > 1).then_some((base, members))
        })
        .collect()
}

/// All non-empty proper subsets of `cols`, smallest first, preserving the
/// original column order within each subset.
///
/// Enumeration is `2^|cols|`; acceptable because primary keys are small in
/// practice.
pub fn proper_subsets(cols: &[String]) -> Vec<Vec<String>> {
    (1..cols.len())
        .flat_map(|r| cols.iter().cloned().combinations(r))
        .collect()
}
