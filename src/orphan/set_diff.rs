//! Set subtraction over resource identities.

use std::collections::HashSet;
use std::hash::Hash;

/// Returns every element of `left` with no equal element in `right`.
///
/// Elements keep the order in which they first appear in `left`, and repeated
/// elements of `left` are reported once. Callers cannot tell an empty result
/// caused by equal inputs from one caused by empty inputs.
#[must_use]
pub fn subtract<T: Eq + Hash + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    let excluded: HashSet<&T> = right.iter().collect();
    let mut seen: HashSet<&T> = HashSet::with_capacity(left.len());

    left.iter()
        .filter(|item| !excluded.contains(item) && seen.insert(*item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceIdentity;

    fn id(name: &str) -> ResourceIdentity {
        ResourceIdentity::cluster_scoped("storage.k8s.io", "StorageClass", name)
    }

    #[test]
    fn test_self_subtraction_is_empty() {
        let a = vec![id("x"), id("y")];
        assert!(subtract(&a, &a).is_empty());
    }

    #[test]
    fn test_subtracting_empty_keeps_left() {
        let a = vec![id("x"), id("y"), id("z")];
        assert_eq!(subtract(&a, &[]), a);
    }

    #[test]
    fn test_empty_left_is_empty() {
        assert!(subtract(&[], &[id("x")]).is_empty());
    }

    #[test]
    fn test_live_minus_managed() {
        let managed = vec![id("x"), id("y")];
        let live = vec![id("x"), id("y"), id("z")];
        assert_eq!(subtract(&live, &managed), vec![id("z")]);
    }

    #[test]
    fn test_preserves_order_and_dedups() {
        let left = vec![id("c"), id("a"), id("c"), id("b")];
        let right = vec![id("a")];
        assert_eq!(subtract(&left, &right), vec![id("c"), id("b")]);
    }

    #[test]
    fn test_results_are_members_of_left() {
        let left = vec![id("a"), id("b")];
        let right = vec![id("b"), id("q")];
        for item in subtract(&left, &right) {
            assert!(left.contains(&item));
            assert!(!right.contains(&item));
        }
    }

    #[test]
    fn test_namespace_distinguishes_identities() {
        let left = vec![ResourceIdentity::new("", "ConfigMap", "cfg", "a")];
        let right = vec![ResourceIdentity::new("", "ConfigMap", "cfg", "b")];
        assert_eq!(subtract(&left, &right), left);
    }
}
