use std::collections::HashSet;
use std::hash::Hash;

/// Merge ordered sequences into one, keeping the first occurrence of every item.
///
/// The output order is the order in which items are first seen across the
/// flattened input, so callers must feed sequences in a stable order.
pub fn ordered_union<I, S, T>(sequences: I) -> Vec<T>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for sequence in sequences {
        for item in sequence {
            if seen.insert(item.clone()) {
                merged.push(item);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let merged = ordered_union(vec![vec!["a", "b"], vec!["b", "c"]]);
        assert_eq!(merged, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        let merged: Vec<&str> = ordered_union(Vec::<Vec<&str>>::new());
        assert!(merged.is_empty());

        let merged: Vec<&str> = ordered_union(vec![vec![], vec![]]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_duplicates_within_one_sequence() {
        let merged = ordered_union(vec![vec![3, 1, 3, 2, 1]]);
        assert_eq!(merged, vec![3, 1, 2]);
    }

    #[test]
    fn test_order_follows_input_order() {
        let forward = ordered_union(vec![vec!["x"], vec!["y", "x"]]);
        let backward = ordered_union(vec![vec!["y", "x"], vec!["x"]]);
        assert_eq!(forward, vec!["x", "y"]);
        assert_eq!(backward, vec!["y", "x"]);
    }

    #[test]
    fn test_accepts_borrowed_slices() {
        let first = vec!["00001".to_string(), "00002".to_string()];
        let second = vec!["00002".to_string(), "00003".to_string()];
        let merged: Vec<&String> = ordered_union([first.iter(), second.iter()]);
        assert_eq!(merged, vec!["00001", "00002", "00003"]);
    }
}
