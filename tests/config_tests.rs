//! Loading dispatch configuration from files
//!
//! Every supported format has to produce the same trees, in the same slot
//! order, and route overrides have to merge the same way.

use std::path::Path;
use tempfile::TempDir;
use viewtree::config::{AppConfig, ConfigError, FailurePolicy, SlotBinding};

const YAML: &str = r#"
dispatch:
  failure_policy: placeholder
  defaults:
    Dispatch\Main:
      header: Layout\Header
      sidebar: Dispatch\Sidebar
      footer: Layout\Footer
    Dispatch\Sidebar:
      basket: Layout\Basket
  routes:
    promo:
      Dispatch\Main:
        header: Layout\AlternativeHeader
        banner: Layout\Banner
"#;

const JSON: &str = r#"{
  "dispatch": {
    "failure_policy": "placeholder",
    "defaults": {
      "Dispatch\\Main": {
        "header": "Layout\\Header",
        "sidebar": "Dispatch\\Sidebar",
        "footer": "Layout\\Footer"
      },
      "Dispatch\\Sidebar": { "basket": "Layout\\Basket" }
    },
    "routes": {
      "promo": {
        "Dispatch\\Main": {
          "header": "Layout\\AlternativeHeader",
          "banner": "Layout\\Banner"
        }
      }
    }
  }
}"#;

const TOML: &str = r#"
[dispatch]
failure_policy = "placeholder"

[dispatch.defaults."Dispatch\\Main"]
header = "Layout\\Header"
sidebar = "Dispatch\\Sidebar"
footer = "Layout\\Footer"

[dispatch.defaults."Dispatch\\Sidebar"]
basket = "Layout\\Basket"

[dispatch.routes.promo."Dispatch\\Main"]
header = "Layout\\AlternativeHeader"
banner = "Layout\\Banner"
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn assert_demo_trees(config: &AppConfig) {
    let dispatch = &config.dispatch;
    assert_eq!(dispatch.failure_policy(), FailurePolicy::Placeholder);
    assert_eq!(dispatch.tree_names(), vec!["Dispatch\\Main", "Dispatch\\Sidebar"]);

    let home = dispatch.resolve_slots("home", "Dispatch\\Main");
    assert_eq!(home.slot_names(), vec!["header", "sidebar", "footer"]);
    assert!(home.get("sidebar").is_some_and(SlotBinding::is_tree));

    let promo = dispatch.resolve_slots("promo", "Dispatch\\Main");
    assert_eq!(promo.slot_names(), vec!["header", "sidebar", "footer", "banner"]);
    assert_eq!(
        promo.get("header").map(SlotBinding::identity),
        Some("Layout\\AlternativeHeader")
    );
}

#[test]
fn test_every_format_loads_the_same_trees() {
    let dir = TempDir::new().unwrap();
    for (name, content) in [
        ("dispatch.yaml", YAML),
        ("dispatch.yml", YAML),
        ("dispatch.json", JSON),
        ("dispatch.toml", TOML),
    ] {
        let path = write(&dir, name, content);
        let config = AppConfig::load(&path).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_demo_trees(&config);
    }
}

#[test]
fn test_resolving_twice_gives_the_same_mapping() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load(&write(&dir, "dispatch.yaml", YAML)).unwrap();

    let first = config.dispatch.resolve_slots("promo", "Dispatch\\Main");
    let second = config.dispatch.resolve_slots("promo", "Dispatch\\Main");
    assert_eq!(first, second);
    // The defaults are left untouched by a route's merge
    assert_eq!(
        config.dispatch.resolve_slots("home", "Dispatch\\Main").len(),
        3
    );
}

#[test]
fn test_route_without_defaults_uses_its_overrides() {
    let yaml = r#"
dispatch:
  routes:
    landing:
      Dispatch\Landing: { hero: Layout\Hero }
"#;
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load(&write(&dir, "landing.yaml", yaml)).unwrap();

    let slots = config.dispatch.resolve_slots("landing", "Dispatch\\Landing");
    assert_eq!(slots.slot_names(), vec!["hero"]);
    assert!(config.dispatch.resolve_slots("home", "Dispatch\\Landing").is_empty());
}

#[test]
fn test_cyclic_file_is_rejected() {
    let yaml = r#"
dispatch:
  defaults:
    Dispatch\Main: { sidebar: Dispatch\Sidebar }
    Dispatch\Sidebar: { again: Dispatch\Main }
"#;
    let dir = TempDir::new().unwrap();
    let err = AppConfig::load(&write(&dir, "loop.yaml", yaml)).unwrap_err();

    assert!(matches!(err, ConfigError::Cycle { route: None, .. }));
    assert!(err.to_string().contains("Dispatch\\Main"));
}

#[test]
fn test_self_reference_is_a_cycle() {
    let yaml = r#"
dispatch:
  defaults:
    Dispatch\Main: { inner: Dispatch\Main }
"#;
    let dir = TempDir::new().unwrap();
    let err = AppConfig::load(&write(&dir, "self.yaml", yaml)).unwrap_err();
    assert!(matches!(err, ConfigError::Cycle { .. }));
}

#[test]
fn test_unsupported_extension_and_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = AppConfig::load(&write(&dir, "dispatch.ini", YAML)).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));

    let err = AppConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_bundled_demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/dispatch.yaml");
    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.dispatch.failure_policy(), FailurePolicy::Abort);
    assert_eq!(config.router.route_names(), vec!["home", "plain", "promo"]);
    assert!(config.view_manager.display_exceptions);
}
