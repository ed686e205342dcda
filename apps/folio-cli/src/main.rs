//! folio-sync - publication sync for the site document
//!
//! Reads scraped publication records (a JSON array, from a file or stdin),
//! merges them into `config.json` and writes the document back when the run
//! changed something.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use folio_domain::{DocumentError, ScrapedRecord, SiteDocument};
use folio_sync::{sync_document, ConfigError, Reconciler, SyncConfig, SyncError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "folio-sync")]
#[command(about = "Merge scraped publications into the site configuration document")]
#[command(version)]
struct Cli {
    /// Site configuration document to update
    #[arg(long, short = 'c', default_value = "config.json")]
    config: PathBuf,

    /// Scraped publications as a JSON array, or `-` for stdin
    #[arg(long, short = 'i')]
    input: String,

    /// Site owner's full name (defaults to `personal.name`)
    #[arg(long)]
    owner: Option<String>,

    /// Engine settings (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run the sync without writing the document
    #[arg(long, short = 'd')]
    dry_run: bool,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid scraped records in {source_name}: {source}")]
    Scraped {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Settings(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => SyncConfig::default(),
    };
    let scraped = read_scraped(&cli.input)?;
    let mut document = SiteDocument::load(&cli.config)?;

    let reconciler = Reconciler::new(config, Local::now().date_naive());
    let run = sync_document(&mut document, &scraped, &reconciler, cli.owner.as_deref())?;

    if !run.changes_made {
        tracing::info!("No changes, {:?} left as is", cli.config);
        return Ok(());
    }
    if cli.dry_run {
        tracing::info!(
            "Dry run, not writing {:?} ({})",
            cli.config,
            run.report.summary()
        );
        return Ok(());
    }

    document.save(&cli.config)?;
    Ok(())
}

fn load_settings(path: &Path) -> Result<SyncConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        source_name: path.display().to_string(),
        source,
    })?;
    let config = SyncConfig::from_toml(&text)?;
    tracing::debug!("Loaded settings from {:?}", path);
    Ok(config)
}

fn read_scraped(input: &str) -> Result<Vec<ScrapedRecord>, CliError> {
    let (source_name, text) = if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Read {
                source_name: "stdin".to_string(),
                source,
            })?;
        ("stdin".to_string(), text)
    } else {
        let text = fs::read_to_string(input).map_err(|source| CliError::Read {
            source_name: input.to_string(),
            source,
        })?;
        (input.to_string(), text)
    };

    parse_scraped(&text).map_err(|source| CliError::Scraped {
        source_name,
        source,
    })
}

fn parse_scraped(text: &str) -> Result<Vec<ScrapedRecord>, serde_json::Error> {
    let records: Vec<ScrapedRecord> = serde_json::from_str(text)?;
    tracing::debug!("Read {} scraped records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_args() {
        let cli = Cli::parse_from(["folio-sync", "-i", "-", "--dry-run", "--owner", "Jane Doe"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.input, "-");
        assert!(cli.dry_run);
        assert_eq!(cli.owner.as_deref(), Some("Jane Doe"));
        assert!(cli.settings.is_none());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["folio-sync"]).is_err());
    }

    #[test]
    fn test_parse_scraped() {
        let records = parse_scraped(
            r#"[{"title": "Neural Fields", "authors": ["J Doe"], "year": 2024, "link": ""}]"#,
        )
        .unwrap();
        assert_eq!(records[0].citations, 0);
        assert_eq!(records[0].link(), None);

        assert!(parse_scraped(r#"{"title": "not an array"}"#).is_err());
    }

    fn write_files(dir: &TempDir, scraped: &str) -> (PathBuf, PathBuf) {
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"personal": {"name": "Jane Doe"}, "publications": {}}"#,
        )
        .unwrap();
        let input = dir.path().join("scraped.json");
        fs::write(&input, scraped).unwrap();
        (config, input)
    }

    fn cli(config: &Path, input: &Path, dry_run: bool) -> Cli {
        Cli {
            config: config.to_path_buf(),
            input: input.display().to_string(),
            owner: None,
            settings: None,
            dry_run,
            verbose: false,
        }
    }

    const SCRAPED: &str =
        r#"[{"title": "Neural Fields", "authors": ["J Doe"], "venue": "CVPR 2025", "year": 2025}]"#;

    #[test]
    fn test_run_writes_document() {
        let dir = TempDir::new().unwrap();
        let (config, input) = write_files(&dir, SCRAPED);

        run(&cli(&config, &input, false)).unwrap();

        let document = SiteDocument::load(&config).unwrap();
        assert_eq!(document.publications.bucket("2025")[0].authors, vec!["Jane Doe"]);
        assert!(document.scholar_sync.is_some());
    }

    #[test]
    fn test_dry_run_leaves_document() {
        let dir = TempDir::new().unwrap();
        let (config, input) = write_files(&dir, SCRAPED);
        let before = fs::read_to_string(&config).unwrap();

        run(&cli(&config, &input, true)).unwrap();
        assert_eq!(fs::read_to_string(&config).unwrap(), before);
    }

    #[test]
    fn test_empty_input_leaves_document() {
        let dir = TempDir::new().unwrap();
        let (config, input) = write_files(&dir, "[]");
        let before = fs::read_to_string(&config).unwrap();

        run(&cli(&config, &input, false)).unwrap();
        assert_eq!(fs::read_to_string(&config).unwrap(), before);
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let (config, _) = write_files(&dir, "[]");
        let err = run(&cli(&config, &dir.path().join("missing.json"), false)).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let (config, input) = write_files(&dir, SCRAPED);
        let settings = dir.path().join("settings.toml");
        fs::write(&settings, "[dedup]\ncore_word_ratio = 2.0\n").unwrap();

        let mut args = cli(&config, &input, false);
        args.settings = Some(settings);
        assert!(matches!(run(&args).unwrap_err(), CliError::Settings(_)));
    }
}
