//! Unit tests for CLI commands

use crate::cli::{inspect, run, validate, Cli, Commands};
use crate::config::{AppConfig, ConfigFormat};
use crate::registry::demo_registry;
use clap::Parser;

const CONFIG: &str = r#"
dispatch:
  defaults:
    Dispatch\Main: { header: Layout\Header, sidebar: Dispatch\Sidebar, footer: Layout\Footer }
    Dispatch\Sidebar: { basket: Layout\Basket }
  routes:
    promo:
      Dispatch\Main: { header: Layout\AlternativeHeader }
router:
  routes:
    home:
      path: /
      defaults: { dispatch: Dispatch\Main, controller: Page\Index, action: index }
    promo:
      path: /promo
      defaults: { dispatch: Dispatch\Main, controller: Page\Index, action: index }
"#;

fn config() -> AppConfig {
    AppConfig::parse(CONFIG, ConfigFormat::Yaml).unwrap()
}

fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut out = Vec::new();
    f(&mut out);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_dispatch_command_with_flags() {
    let cli = Cli::try_parse_from([
        "viewtree",
        "dispatch",
        "--config",
        "app.yaml",
        "--query",
        "dispatch=basket",
        "--post",
        "item=apple",
        "--json",
        "--request-id",
        "01ARZ3NDEKTSV4RRFFQ69G5FAV",
    ])
    .unwrap();

    match cli.command {
        Commands::Dispatch {
            config,
            views,
            route,
            query,
            post,
            json,
            request_id,
        } => {
            assert_eq!(config.to_string_lossy(), "app.yaml");
            assert_eq!(views.to_string_lossy(), "views");
            assert_eq!(route, "home");
            assert_eq!(query.as_deref(), Some("dispatch=basket"));
            assert_eq!(post.as_deref(), Some("item=apple"));
            assert!(json);
            assert_eq!(request_id.as_deref(), Some("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        }
        _ => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_inspect_lists_trees_and_route_overrides() {
    let config = config();
    let text = output(|out| inspect(&config, None, out).unwrap());

    assert!(text.contains("trees:\n  Dispatch\\Main\n    header: Layout\\Header\n    sidebar: Dispatch\\Sidebar (tree)\n    footer: Layout\\Footer\n"));
    assert!(text.contains("  promo -> Dispatch\\Main\n    header: Layout\\AlternativeHeader\n"));
    assert!(text.contains("  home -> Dispatch\\Main\n    header: Layout\\Header\n"));
}

#[test]
fn test_inspect_unknown_route_fails() {
    let config = config();
    let mut out = Vec::new();
    let err = inspect(&config, Some("missing"), &mut out).unwrap_err();
    assert_eq!(err.to_string(), "unknown route 'missing'");
}

#[test]
fn test_validate_demo_config_is_clean() {
    assert!(validate(&config(), &demo_registry()).is_empty());
}

#[test]
fn test_validate_reports_unregistered_identities() {
    let config = AppConfig::parse(
        r#"
dispatch:
  defaults:
    Dispatch\Other: { widget: Layout\Widget }
router:
  routes:
    home:
      defaults: { dispatch: Dispatch\Gone, controller: Page\Missing }
"#,
        ConfigFormat::Yaml,
    )
    .unwrap();

    let problems = validate(&config, &demo_registry());
    assert_eq!(
        problems,
        vec![
            "tree 'Dispatch\\Other' has no shell controller".to_string(),
            "controller 'Layout\\Widget' is not registered".to_string(),
            "route 'home' uses unknown tree 'Dispatch\\Gone'".to_string(),
            "route 'home' uses unregistered controller 'Page\\Missing'".to_string(),
        ]
    );
}

#[test]
fn test_validate_command_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yaml");
    std::fs::write(&path, CONFIG).unwrap();

    let cli = Cli::try_parse_from(["viewtree", "validate", "--config", path.to_str().unwrap()])
        .unwrap();
    let text = output(|out| run(&cli, out).unwrap());
    assert_eq!(text, "ok: 2 trees, 2 routes\n");
}
