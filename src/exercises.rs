//! Introductory exercises: small string, collection and number utilities.
//!
//! Everything here is pure and returns its result instead of printing it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::ops::RangeInclusive;

/// Number of characters (not bytes) in `s`.
pub fn strlen(s: &str) -> usize {
    s.chars().count()
}

/// Case-insensitive character frequencies.
pub fn char_count(s: &str) -> BTreeMap<char, usize> {
    let mut counts = BTreeMap::new();
    for c in s.chars().flat_map(char::to_lowercase) {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Distinct words, sorted.
pub fn sort_unique<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// All positive divisors of `n`. Empty for zero.
pub fn divisors(n: u64) -> BTreeSet<u64> {
    let mut found = BTreeSet::new();
    let mut i = 1;
    while i <= n / i {
        if n % i == 0 {
            found.insert(i);
            found.insert(n / i);
        }
        i += 1;
    }
    found
}

/// Keys of a map in ascending order.
pub fn sorted_keys<K: Ord + Clone, V>(map: &HashMap<K, V>) -> Vec<K> {
    let mut keys: Vec<K> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Every value that appears in any of the maps.
pub fn unique_values<K, V: Ord + Clone>(maps: &[HashMap<K, V>]) -> BTreeSet<V>
where
    K: Eq + Hash,
{
    maps.iter().flat_map(|m| m.values().cloned()).collect()
}

/// Joins decimal digits into a number: `[1, 2, 3]` → `123`.
///
/// Returns `None` if a digit is above 9 or the result overflows.
pub fn digits_to_number(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &d| {
        if d > 9 {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(d))
    })
}

/// A tab-separated multiplication table.
///
/// The header row lists the column factors; each following row starts with
/// its row factor and holds the products. Products are computed in `u128`,
/// which holds any product of two `u64` factors.
pub fn multiplication_table(rows: RangeInclusive<u64>, cols: RangeInclusive<u64>) -> String {
    let header: Vec<String> = cols.clone().map(|c| c.to_string()).collect();
    let mut table = format!("\t{}\n", header.join("\t"));

    for r in rows {
        let products: Vec<String> = cols
            .clone()
            .map(|c| (u128::from(r) * u128::from(c)).to_string())
            .collect();
        table.push_str(&format!("{r}\t{}\n", products.join("\t")));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strlen_counts_chars() {
        assert_eq!(strlen(""), 0);
        assert_eq!(strlen("hello"), 5);
        assert_eq!(strlen("привет"), 6);
    }

    #[test]
    fn test_char_count_ignores_case() {
        let counts = char_count("AbBa");
        assert_eq!(counts.get(&'a'), Some(&2));
        assert_eq!(counts.get(&'b'), Some(&2));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_sort_unique() {
        assert_eq!(
            sort_unique(&["pear", "apple", "pear", "fig"]),
            vec!["apple", "fig", "pear"]
        );
    }

    #[test]
    fn test_divisors() {
        assert_eq!(divisors(12).into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(1).into_iter().collect::<Vec<_>>(), vec![1]);
        assert!(divisors(0).is_empty());
    }

    #[test]
    fn test_sorted_keys() {
        let map = HashMap::from([("b", 1), ("c", 2), ("a", 3)]);
        assert_eq!(sorted_keys(&map), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unique_values() {
        let maps = vec![
            HashMap::from([("x", "S001"), ("y", "S002")]),
            HashMap::from([("z", "S001"), ("w", "S005")]),
        ];
        assert_eq!(
            unique_values(&maps).into_iter().collect::<Vec<_>>(),
            vec!["S001", "S002", "S005"]
        );
    }

    #[test]
    fn test_digits_to_number() {
        assert_eq!(digits_to_number(&[1, 2, 3, 4]), Some(1234));
        assert_eq!(digits_to_number(&[0, 7]), Some(7));
        assert_eq!(digits_to_number(&[]), Some(0));
        assert_eq!(digits_to_number(&[12]), None);
        assert_eq!(digits_to_number(&[9; 25]), None);
    }

    #[test]
    fn test_multiplication_table() {
        assert_eq!(
            multiplication_table(2..=3, 4..=5),
            "\t4\t5\n2\t8\t10\n3\t12\t15\n"
        );
    }

    #[test]
    fn test_multiplication_table_large_factors() {
        let max = u64::MAX;
        assert_eq!(
            multiplication_table(max..=max, 2..=2),
            format!("\t2\n{max}\t36893488147419103230\n")
        );
    }
}
