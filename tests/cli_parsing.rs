use clap::Parser;
use confstore::cli::{Cli, Commands};
use confstore::infrastructure::logging::LogFormat;
use confstore::{SourceFormat, Strictness};
use std::path::PathBuf;

#[test]
fn test_parse_check() {
    let cli = Cli::try_parse_from(vec!["confstore", "check", "custom.config.yaml"]).unwrap();

    match cli.command {
        Commands::Check(args) => assert_eq!(args.config, PathBuf::from("custom.config.yaml")),
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
    assert_eq!(cli.load.strictness(), Strictness::Permissive);
}

#[test]
fn test_parse_get_with_default() {
    let cli = Cli::try_parse_from(vec![
        "confstore",
        "get",
        "custom.config.yaml",
        "redis.port",
        "--default",
        "6379",
    ])
    .unwrap();

    match cli.command {
        Commands::Get(args) => {
            assert_eq!(args.key, "redis.port");
            assert_eq!(args.default.as_deref(), Some("6379"));
            assert!(!args.required);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_get_default_conflicts_with_required() {
    let result = Cli::try_parse_from(vec![
        "confstore",
        "get",
        "custom.config.yaml",
        "redis.port",
        "--default",
        "1",
        "--required",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_export_format() {
    let cli = Cli::try_parse_from(vec![
        "confstore",
        "export",
        "custom.config.yaml",
        "--format",
        "json",
    ])
    .unwrap();

    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.format, SourceFormat::Json);
            assert!(args.output.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(vec![
        "confstore",
        "show",
        "custom.config.yaml",
        "--strict",
        "--json",
        "--no-env",
        "--log-format",
        "json",
        "--local",
        "local.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.load.strictness(), Strictness::Strict);
    assert!(cli.load.no_env);
    assert_eq!(cli.load.local, Some(PathBuf::from("local.yaml")));
    assert_eq!(cli.logging.log_format, LogFormat::Json);
    assert!(matches!(cli.command, Commands::Show(_)));
}

#[test]
fn test_parse_schema_and_summary() {
    let cli = Cli::try_parse_from(vec!["confstore", "schema"]).unwrap();
    assert!(matches!(cli.command, Commands::Schema(_)));

    let cli = Cli::try_parse_from(vec!["confstore", "summary", "cfg.json"]).unwrap();
    assert!(matches!(cli.command, Commands::Summary(_)));
}

#[test]
fn test_missing_config_path_is_rejected() {
    assert!(Cli::try_parse_from(vec!["confstore", "check"]).is_err());
    assert!(Cli::try_parse_from(vec!["confstore", "frobnicate"]).is_err());
}
