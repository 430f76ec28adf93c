//! Tests for the generic registry
//!
//! One registry type backs every level of the hierarchy; these tests pin
//! down its insert/replace/remove contract.

use stratakv::index::Registry;

#[test]
fn test_insert_and_get() {
    let mut registry: Registry<u64> = Registry::new();

    registry.insert("key", 42);

    assert_eq!(registry.get("key"), Some(&42));
    assert_eq!(registry.get("other"), None);
    assert!(registry.contains("key"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_insert_replaces_previous_handle() {
    let mut registry: Registry<u64> = Registry::new();

    registry.insert("key", 1);
    registry.insert("key", 2);

    assert_eq!(registry.get("key"), Some(&2));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_remove() {
    let mut registry: Registry<&str> = Registry::new();

    registry.insert("key", "value");

    assert_eq!(registry.remove("key"), Some("value"));
    assert_eq!(registry.remove("key"), None);
    assert!(registry.is_empty());
}

#[test]
fn test_get_mut() {
    let mut registry: Registry<Vec<u8>> = Registry::new();
    registry.insert("key", vec![1]);

    registry.get_mut("key").unwrap().push(2);

    assert_eq!(registry.get("key"), Some(&vec![1, 2]));
}

#[test]
fn test_iteration() {
    let mut registry: Registry<u64> = Registry::new();
    registry.insert("a", 1);
    registry.insert("b", 2);

    let mut keys: Vec<&String> = registry.keys().collect();
    keys.sort();
    assert_eq!(keys, ["a", "b"]);

    assert_eq!(registry.iter().count(), 2);
}
