use super::*;

#[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
struct Counter {
    hits: u32,
    at: Option<chrono::DateTime<chrono::Utc>>,
}

// =============================================================
// read_json / write_json
// =============================================================

#[test]
fn read_json_missing_key_is_none() {
    let backend = MemoryStorage::new();
    assert_eq!(read_json::<Counter>(&backend, "nope"), None);
}

#[test]
fn read_json_corrupt_entry_is_none() {
    let backend = MemoryStorage::new();
    backend.set_item("bad", "{not json").unwrap();
    assert_eq!(read_json::<Counter>(&backend, "bad"), None);
}

#[test]
fn read_json_reconstitutes_dates_from_iso_strings() {
    let backend = MemoryStorage::new();
    backend
        .set_item("counter", r#"{"hits":3,"at":"2024-05-01T10:30:00.000Z"}"#)
        .unwrap();
    let counter: Counter = read_json(&backend, "counter").unwrap();
    assert_eq!(counter.hits, 3);
    assert_eq!(counter.at.unwrap().to_rfc3339(), "2024-05-01T10:30:00+00:00");
}

#[test]
fn write_json_then_read_json() {
    let backend = MemoryStorage::new();
    write_json(&backend, "counter", &Counter { hits: 7, at: None }).unwrap();
    assert_eq!(backend.raw("counter").as_deref(), Some(r#"{"hits":7,"at":null}"#));
}

#[test]
fn has_entry_distinguishes_empty_list_from_absent() {
    let backend = MemoryStorage::new();
    assert!(!has_entry(&backend, "list"));
    write_json(&backend, "list", &Vec::<u32>::new()).unwrap();
    assert!(has_entry(&backend, "list"));
}

#[test]
fn remove_item_clears_entry() {
    let backend = MemoryStorage::new();
    backend.set_item("k", "1").unwrap();
    backend.remove_item("k").unwrap();
    assert!(!has_entry(&backend, "k"));
}

// =============================================================
// BrowserStorage outside the browser
// =============================================================

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_storage_is_unavailable_in_native_tests() {
    let backend = BrowserStorage;
    assert!(matches!(backend.get_item("x"), Err(StorageError::Unavailable)));
    assert!(matches!(backend.set_item("x", "1"), Err(StorageError::Unavailable)));
    assert_eq!(read_json::<Counter>(&backend, "x"), None);
}

// =============================================================
// Persisted
// =============================================================

#[test]
fn persisted_starts_unloaded_with_default() {
    let store = Persisted::new("counter", Counter::default());
    assert!(!store.loaded());
    assert_eq!(store.get().hits, 0);
    assert_eq!(store.key(), "counter");
}

#[test]
fn persisted_hydrate_marks_loaded_even_when_empty() {
    let backend = MemoryStorage::new();
    let mut store = Persisted::new("counter", Counter::default());
    store.hydrate(&backend);
    assert!(store.loaded());
    assert_eq!(store.get(), &Counter::default());
}

#[test]
fn persisted_hydrate_keeps_default_on_corrupt_entry() {
    let backend = MemoryStorage::new();
    backend.set_item("counter", "[1,2").unwrap();
    let mut store = Persisted::new("counter", Counter { hits: 9, at: None });
    store.hydrate(&backend);
    assert!(store.loaded());
    assert_eq!(store.get().hits, 9);
}

#[test]
fn persisted_update_writes_through() {
    let backend = MemoryStorage::new();
    let mut store = Persisted::new("counter", Counter::default());
    store.hydrate(&backend);
    let hits = store.update(&backend, |c| {
        c.hits += 2;
        c.hits
    });
    assert_eq!(hits.unwrap(), 2);

    let mut reloaded = Persisted::new("counter", Counter::default());
    reloaded.hydrate(&backend);
    assert_eq!(reloaded.get().hits, 2);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn persisted_set_reports_write_failure_but_keeps_value() {
    let mut store = Persisted::new("counter", Counter::default());
    let result = store.set(&BrowserStorage, Counter { hits: 4, at: None });
    assert!(result.is_err());
    assert_eq!(store.get().hits, 4);
}
