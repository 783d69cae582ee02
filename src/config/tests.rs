use super::{AppConfig, ConfigError, ConfigFormat, DispatchConfig, FailurePolicy, SlotBinding};
use std::collections::HashMap;
use std::path::Path;

fn slots(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(s, i)| (s.to_string(), i.to_string()))
        .collect()
}

#[test]
fn test_format_from_extension() {
    assert_eq!(
        ConfigFormat::from_path(Path::new("a/dispatch.yml")).unwrap(),
        ConfigFormat::Yaml
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("dispatch.JSON")).unwrap(),
        ConfigFormat::Json
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("dispatch.toml")).unwrap(),
        ConfigFormat::Toml
    );
    assert!(matches!(
        ConfigFormat::from_path(Path::new("dispatch.ini")),
        Err(ConfigError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_failure_policy_parse() {
    assert_eq!(FailurePolicy::parse("abort"), Some(FailurePolicy::Abort));
    assert_eq!(
        FailurePolicy::parse(" Placeholder "),
        Some(FailurePolicy::Placeholder)
    );
    assert_eq!(FailurePolicy::parse("retry"), None);
}

#[test]
fn test_bindings_are_classified_against_defaults() {
    let mut defaults = HashMap::new();
    defaults.insert(
        "Dispatch\\Main".to_string(),
        slots(&[("sidebar", "Dispatch\\Sidebar"), ("footer", "Layout\\Footer")]),
    );
    defaults.insert(
        "Dispatch\\Sidebar".to_string(),
        slots(&[("basket", "Layout\\Basket")]),
    );
    let config = DispatchConfig::from_bindings(defaults, HashMap::new()).unwrap();

    let main = config.resolve_slots("home", "Dispatch\\Main");
    assert_eq!(
        main.get("sidebar"),
        Some(&SlotBinding::Tree("Dispatch\\Sidebar".to_string()))
    );
    assert_eq!(
        main.get("footer"),
        Some(&SlotBinding::Leaf("Layout\\Footer".to_string()))
    );
    assert!(config.is_tree("Dispatch\\Sidebar"));
    assert!(!config.is_tree("Layout\\Footer"));
    assert_eq!(
        config.leaf_identities(),
        vec!["Layout\\Basket", "Layout\\Footer"]
    );
}

#[test]
fn test_route_override_keeps_position_and_appends_new_slots() {
    let mut defaults = HashMap::new();
    defaults.insert(
        "Dispatch\\Main".to_string(),
        slots(&[("header", "Layout\\Header"), ("footer", "Layout\\Footer")]),
    );
    let mut trees = HashMap::new();
    trees.insert(
        "Dispatch\\Main".to_string(),
        slots(&[("promo", "Layout\\Promo"), ("header", "Layout\\AlternativeHeader")]),
    );
    let mut routes = HashMap::new();
    routes.insert("home".to_string(), trees);

    let config = DispatchConfig::from_bindings(defaults, routes).unwrap();
    let merged = config.resolve_slots("home", "Dispatch\\Main");

    assert_eq!(merged.slot_names(), vec!["header", "footer", "promo"]);
    assert_eq!(
        merged.get("header").map(SlotBinding::identity),
        Some("Layout\\AlternativeHeader")
    );
    // Other routes only see the defaults
    assert_eq!(
        config
            .resolve_slots("about", "Dispatch\\Main")
            .get("header")
            .map(SlotBinding::identity),
        Some("Layout\\Header")
    );
}

#[test]
fn test_unknown_tree_resolves_to_empty_mapping() {
    let config = DispatchConfig::default();
    assert!(config.resolve_slots("home", "Dispatch\\Missing").is_empty());
}

#[test]
fn test_cycle_through_defaults_is_rejected() {
    let mut defaults = HashMap::new();
    defaults.insert("A".to_string(), slots(&[("x", "B")]));
    defaults.insert("B".to_string(), slots(&[("y", "A")]));

    let err = DispatchConfig::from_bindings(defaults, HashMap::new()).unwrap_err();
    match err {
        ConfigError::Cycle { route, path } => {
            assert!(route.is_none());
            assert_eq!(path.first(), path.last());
            assert_eq!(path.len(), 3);
        }
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn test_cycle_introduced_by_route_override_is_rejected() {
    let mut defaults = HashMap::new();
    defaults.insert("A".to_string(), slots(&[("x", "B")]));
    defaults.insert("B".to_string(), slots(&[("y", "Leaf")]));
    let mut trees = HashMap::new();
    trees.insert("B".to_string(), slots(&[("y", "A")]));
    let mut routes = HashMap::new();
    routes.insert("loop".to_string(), trees);

    let err = DispatchConfig::from_bindings(defaults, routes).unwrap_err();
    assert!(matches!(err, ConfigError::Cycle { route: Some(ref r), .. } if r == "loop"));
    assert!(err.to_string().contains("on route 'loop'"));
}

#[test]
fn test_override_replacing_tree_with_leaf_breaks_no_cycle() {
    let mut defaults = HashMap::new();
    defaults.insert("A".to_string(), slots(&[("x", "B")]));
    defaults.insert("B".to_string(), slots(&[("y", "Leaf")]));
    assert!(DispatchConfig::from_bindings(defaults, HashMap::new()).is_ok());
}

#[test]
fn test_yaml_null_tree_is_empty() {
    let yaml = r#"
dispatch:
  defaults:
    Dispatch\Empty:
"#;
    let config = AppConfig::parse(yaml, ConfigFormat::Yaml).unwrap();
    assert!(config.dispatch.is_tree("Dispatch\\Empty"));
    assert!(config
        .dispatch
        .resolve_slots("home", "Dispatch\\Empty")
        .is_empty());
}

#[test]
fn test_json_preserves_slot_order() {
    let json = r#"{
        "dispatch": {
            "failure_policy": "placeholder",
            "defaults": {
                "Dispatch\\Main": { "zeta": "Z", "alpha": "A", "mid": "M" }
            }
        }
    }"#;
    let config = AppConfig::parse(json, ConfigFormat::Json).unwrap();
    assert_eq!(
        config
            .dispatch
            .resolve_slots("home", "Dispatch\\Main")
            .slot_names(),
        vec!["zeta", "alpha", "mid"]
    );
    assert_eq!(config.dispatch.failure_policy(), FailurePolicy::Placeholder);
}

#[test]
fn test_toml_config() {
    let toml = r#"
[dispatch]
nested_partials = true
placeholder_template = "partial/unavailable"

[dispatch.defaults."Dispatch\\Main"]
header = "Layout\\Header"
footer = "Layout\\Footer"

[view_manager]
display_exceptions = true

[router.routes.home]
path = "/"
defaults = { dispatch = "Dispatch\\Main", controller = "Page\\Index", action = "index" }
"#;
    let config = AppConfig::parse(toml, ConfigFormat::Toml).unwrap();
    assert!(config.dispatch.nested_partials());
    assert_eq!(config.dispatch.placeholder_template(), "partial/unavailable");
    assert!(config.view_manager.display_exceptions);
    assert_eq!(config.view_manager.not_found_template, "error/404");
    assert_eq!(
        config
            .dispatch
            .resolve_slots("home", "Dispatch\\Main")
            .slot_names(),
        vec!["header", "footer"]
    );
    let m = config.router.route("home").unwrap();
    assert_eq!(m.get_param("controller"), Some("Page\\Index"));
}

#[test]
fn test_parse_error_names_format() {
    let err = AppConfig::parse("dispatch: [", ConfigFormat::Yaml).unwrap_err();
    assert!(err.to_string().starts_with("invalid YAML config"));
}

#[test]
fn test_diamond_shaped_trees_load_quickly() {
    // Every layer binds two slots to the next one: 2^40 paths, 41 trees
    let mut defaults = HashMap::new();
    for layer in 0..40 {
        let next = format!("Layer{}", layer + 1);
        defaults.insert(
            format!("Layer{layer}"),
            vec![("left".to_string(), next.clone()), ("right".to_string(), next)],
        );
    }
    defaults.insert("Layer40".to_string(), slots(&[("leaf", "Layout\\Leaf")]));

    let config = DispatchConfig::from_bindings(defaults.clone(), HashMap::new()).unwrap();
    assert!(config.is_tree("Layer40"));

    // A back edge at the bottom is still found
    defaults.insert("Layer40".to_string(), slots(&[("back", "Layer0")]));
    let err = DispatchConfig::from_bindings(defaults, HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Cycle { route: None, .. }));
}
