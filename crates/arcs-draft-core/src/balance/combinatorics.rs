// Small-set enumeration helpers for the balanced-draft search.
//
// Both functions materialize every result, so they are only usable for the
// handful of players and pool cards a single table of Arcs involves.

/// Every way to choose `k` items from `items`, preserving input order within
/// each combination. Produces C(n, k) vectors; empty when `k > n`, a single
/// empty vector when `k == 0`.
pub fn combinations_of<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }

    let mut result = Vec::new();
    for i in 0..=items.len() - k {
        for mut rest in combinations_of(&items[i + 1..], k - 1) {
            rest.insert(0, items[i].clone());
            result.push(rest);
        }
    }
    result
}

/// Every ordering of `items`. Produces n! vectors (one empty vector for an
/// empty input). Orderings are generated with the first element varying
/// slowest.
pub fn permutations_of<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut perm in permutations_of(&rest) {
            perm.insert(0, head.clone());
            result.push(perm);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_count_and_order() {
        let combos = combinations_of(&['a', 'b', 'c', 'd'], 2);
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0], vec!['a', 'b']);
        assert_eq!(combos[5], vec!['c', 'd']);
        assert!(combos.iter().all(|c| c[0] < c[1]));
    }

    #[test]
    fn combinations_edge_cases() {
        assert_eq!(combinations_of(&[1, 2, 3], 0), vec![Vec::<i32>::new()]);
        assert!(combinations_of(&[1, 2], 3).is_empty());
        assert_eq!(combinations_of(&[1, 2, 3], 3), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn permutations_count_and_uniqueness() {
        let perms = permutations_of(&[1, 2, 3, 4]);
        assert_eq!(perms.len(), 24);
        let mut sorted = perms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 24);
        assert_eq!(perms[0], vec![1, 2, 3, 4]);
        assert_eq!(perms[23], vec![4, 3, 2, 1]);
    }

    #[test]
    fn permutations_of_small_inputs() {
        assert_eq!(permutations_of::<u8>(&[]), vec![Vec::<u8>::new()]);
        assert_eq!(permutations_of(&["x"]), vec![vec!["x"]]);
    }
}
