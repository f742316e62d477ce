// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use rolodex_db::Store;
use rolodex_tui::ViewOptions;
use runtime::Session;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

const MEMORY_DB: &str = ":memory:";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    match options.action {
        Action::Help => {
            print_help();
            return Ok(());
        }
        Action::PrintConfigPath => {
            println!("{}", options.config_path.display());
            return Ok(());
        }
        Action::PrintExampleConfig => {
            print!("{}", Config::example_config(&options.config_path));
            return Ok(());
        }
        Action::PrintDbPath | Action::Check | Action::Launch => {}
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `rolodex --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let db_path = resolve_db_path(&options, &config)?;
    if options.action == Action::PrintDbPath {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = open_store(&db_path, options.demo)?;
    let texts = config.text_catalog()?;
    if options.action == Action::Check {
        return Ok(());
    }

    logging::init_logging(config.log_level(), &config.log_path()?)?;
    info!(db = %db_path.display(), demo = options.demo, "starting rolodex");

    let session = Session::open(store, texts, config.coordinator_settings())?;
    session.run(ViewOptions {
        toast_duration: config.toast_duration(),
    })
}

/// What a single invocation does. When several flags are given the highest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Action {
    Launch,
    Check,
    PrintDbPath,
    PrintExampleConfig,
    PrintConfigPath,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    demo: bool,
    action: Action,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        demo: false,
        action: Action::Launch,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let action = match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
                continue;
            }
            "--demo" => {
                options.demo = true;
                continue;
            }
            "--check" => Action::Check,
            "--print-path" => Action::PrintDbPath,
            "--print-example-config" => Action::PrintExampleConfig,
            "--print-config-path" => Action::PrintConfigPath,
            "--help" | "-h" => Action::Help,
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        };
        options.action = options.action.max(action);
    }

    Ok(options)
}

fn resolve_db_path(options: &CliOptions, config: &Config) -> Result<PathBuf> {
    if options.demo {
        return Ok(PathBuf::from(MEMORY_DB));
    }
    config.db_path()
}

/// Opens and bootstraps the store; demo sessions also get the seeded directory.
fn open_store(db_path: &Path, demo: bool) -> Result<Store> {
    let store = Store::open(db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or ROLODEX_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if demo {
        let seeded = store.seed_demo()?;
        info!(seeded, "demo directory loaded");
    }
    Ok(store)
}

fn print_help() {
    println!("rolodex: edit a people directory with batched saves");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with the demo directory (in-memory)");
    println!("  --check                  Validate config and database, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{Action, CliOptions, MEMORY_DB, open_store, parse_cli_args, resolve_db_path};
    use crate::config::Config;
    use anyhow::Result;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        parse_cli_args(args.iter().copied(), PathBuf::from("/tmp/rolodex-config.toml"))
    }

    #[test]
    fn no_arguments_launch_with_the_default_config() -> Result<()> {
        let options = parse(&[])?;
        assert_eq!(options.action, Action::Launch);
        assert_eq!(options.config_path, PathBuf::from("/tmp/rolodex-config.toml"));
        assert!(!options.demo);
        Ok(())
    }

    #[test]
    fn demo_check_validates_against_the_seeded_memory_store() -> Result<()> {
        let options = parse(&["--demo", "--check"])?;
        assert_eq!(options.action, Action::Check);

        let db_path = resolve_db_path(&options, &Config::default())?;
        assert_eq!(db_path, PathBuf::from(MEMORY_DB));
        let store = open_store(&db_path, options.demo)?;
        assert_eq!(store.person_count()?, 12);
        Ok(())
    }

    #[test]
    fn config_override_combines_with_other_flags_in_any_order() -> Result<()> {
        let before = parse(&["--config", "/custom/rolodex.toml", "--print-path"])?;
        let after = parse(&["--print-path", "--config", "/custom/rolodex.toml"])?;
        assert_eq!(before, after);
        assert_eq!(before.config_path, PathBuf::from("/custom/rolodex.toml"));
        assert_eq!(before.action, Action::PrintDbPath);
        Ok(())
    }

    #[test]
    fn print_flags_win_over_check_and_help_wins_over_all() -> Result<()> {
        assert_eq!(
            parse(&["--check", "--print-path"])?.action,
            Action::PrintDbPath
        );
        assert_eq!(
            parse(&["--print-config-path", "--print-example-config"])?.action,
            Action::PrintConfigPath
        );
        assert_eq!(parse(&["--print-config-path", "-h"])?.action, Action::Help);
        Ok(())
    }

    #[test]
    fn demo_print_path_reports_the_memory_database() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config_path = temp.path().join("config.toml");
        std::fs::write(
            &config_path,
            "version = 1\n[storage]\ndb_path = \"/srv/rolodex/people.db\"\n",
        )?;
        let config = Config::load(&config_path)?;

        let plain = parse(&["--print-path"])?;
        assert_eq!(
            resolve_db_path(&plain, &config)?,
            PathBuf::from("/srv/rolodex/people.db")
        );
        let demo = parse(&["--demo", "--print-path"])?;
        assert_eq!(resolve_db_path(&demo, &config)?, PathBuf::from(MEMORY_DB));
        Ok(())
    }

    #[test]
    fn file_store_is_not_seeded_outside_demo() -> Result<()> {
        let (_dir, path) = rolodex_testkit::temp_db_path()?;
        let store = open_store(&path, false)?;
        assert_eq!(store.person_count()?, 0);
        Ok(())
    }

    #[test]
    fn bad_arguments_are_rejected_with_guidance() {
        let error = parse(&["--config"]).expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse(&["--demo", "--wat"]).expect_err("unknown arg should fail");
        assert!(error.to_string().contains("--help"));
    }
}
