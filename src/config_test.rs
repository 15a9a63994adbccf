use super::*;

use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_has_no_overrides() {
    let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, ServerConfig::default());
}

#[test]
fn parses_port_and_site_root() {
    let cfg = ServerConfig::from_lookup(lookup(&[("PORT", " 8080 "), ("SITE_ROOT", "dist/site")])).unwrap();
    assert_eq!(cfg.port, Some(8080));
    assert_eq!(cfg.site_root.as_deref(), Some("dist/site"));
}

#[test]
fn blank_values_are_ignored() {
    let cfg = ServerConfig::from_lookup(lookup(&[("PORT", ""), ("SITE_ROOT", "  ")])).unwrap();
    assert_eq!(cfg, ServerConfig::default());
}

#[test]
fn rejects_non_numeric_port() {
    let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
    assert!(err.to_string().contains("\"http\""));
}

#[test]
fn rejects_out_of_range_port() {
    assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
}
