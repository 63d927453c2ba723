/**
 * Cross-Reference Resolver
 * Turns arrays of bare foreign identifiers into display names or nested
 * objects. Resolution never fails: unresolved names fall back to the raw
 * identifier, unresolved objects are silently dropped. An empty referenced
 * collection (e.g. its fetch was degraded upstream) therefore reduces name
 * resolution to identity passthrough.
 */
use std::collections::HashMap;

/// One-pass identifier -> display-name table from a referenced collection.
pub fn name_lookup<T>(
    items: &[T],
    id: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
) -> HashMap<String, String> {
    items
        .iter()
        .map(|item| (id(item).to_string(), name(item).to_string()))
        .collect()
}

/// Map every identifier through the table, substituting the raw identifier
/// when it does not resolve. The output always has one slot per input.
pub fn resolve_names(ids: &[String], lookup: &HashMap<String, String>) -> Vec<String> {
    ids.iter()
        .map(|id| lookup.get(id).cloned().unwrap_or_else(|| id.clone()))
        .collect()
}

/// One-pass identifier -> entity table for denormalization.
pub fn object_lookup<T: Clone>(items: &[T], id: impl Fn(&T) -> &str) -> HashMap<String, T> {
    items
        .iter()
        .map(|item| (id(item).to_string(), item.clone()))
        .collect()
}

/// Denormalize identifiers into full entities, dropping any identifier
/// that fails to resolve. The output may be shorter than the input.
pub fn resolve_objects<T: Clone>(ids: &[String], lookup: &HashMap<String, T>) -> Vec<T> {
    ids.iter().filter_map(|id| lookup.get(id).cloned()).collect()
}

/// Ascending stable sort on the priority key: equal priorities keep their
/// input order.
pub fn sort_by_priority<T>(items: &mut [T], priority: impl Fn(&T) -> i64) {
    items.sort_by_key(|item| priority(item));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Named {
        id: String,
        name: String,
        priority: i64,
    }

    fn named(id: &str, name: &str, priority: i64) -> Named {
        Named {
            id: id.to_string(),
            name: name.to_string(),
            priority,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_name_resolution_keeps_every_slot() {
        let targets = vec![named("t1", "Rust", 0), named("t2", "Axum", 0)];
        let lookup = name_lookup(&targets, |t| &t.id, |t| &t.name);

        let resolved = resolve_names(&ids(&["t1", "ghost", "t2"]), &lookup);
        assert_eq!(resolved, vec!["Rust", "ghost", "Axum"]);
    }

    #[test]
    fn test_name_resolution_empty_collection_is_passthrough() {
        let lookup = name_lookup::<Named>(&[], |t| &t.id, |t| &t.name);
        let resolved = resolve_names(&ids(&["a", "b"]), &lookup);
        assert_eq!(resolved, vec!["a", "b"]);
    }

    #[test]
    fn test_object_resolution_drops_unresolved() {
        let targets = vec![named("t1", "Rust", 0), named("t2", "Axum", 0)];
        let lookup = object_lookup(&targets, |t| &t.id);

        let resolved = resolve_objects(&ids(&["t2", "ghost", "t1"]), &lookup);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "Axum");
        assert_eq!(resolved[1].name, "Rust");
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let mut items = vec![
            named("a", "first-of-two", 2),
            named("b", "one", 1),
            named("c", "second-of-two", 2),
            named("d", "zero", 0),
        ];
        sort_by_priority(&mut items, |i| i.priority);

        let order: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);
    }
}
