//! Command-line interface for extracta.
//!
//! Every command reads content from `--input <file>` or stdin and prints
//! JSON to stdout. Logs go to stderr.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;

use crate::config::{load_config, load_config_at, ResolvedConfig};
use crate::core::duration::{iso_duration_to_seconds, normalize_duration, NumericUnit};
use crate::core::sanitize::sanitize;
use crate::core::{AnalyzeOptions, ExtractionEngine};
use crate::domain::ContentDocument;

/// extracta - structured facts from loosely structured content
#[derive(Parser, Debug)]
#[command(name = "extracta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (discovered from the current directory if not provided)
    #[arg(long, global = true, env = "EXTRACTA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where content comes from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input file (reads from stdin if not provided)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every extractor and both classifiers
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Page permalink for chapter links
        #[arg(short, long)]
        permalink: Option<String>,

        /// Resolve video duration and metadata over the network
        #[arg(short, long)]
        remote: bool,

        /// Explicit thumbnail URL
        #[arg(long)]
        thumbnail: Option<String>,

        /// Principal image URL (defaults to the first image in the content)
        #[arg(long)]
        image: Option<String>,
    },

    /// Extract ordered instructional steps
    Steps {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Find an embedded video
    Video {
        #[command(flatten)]
        input: InputArgs,

        /// Resolve duration and thumbnail over the network
        #[arg(short, long)]
        remote: bool,
    },

    /// Extract timestamped chapters
    Chapters {
        #[command(flatten)]
        input: InputArgs,

        /// Page permalink for chapter links
        #[arg(short, long)]
        permalink: Option<String>,

        /// Resolve the video duration over the network (sets the last end offset)
        #[arg(short, long)]
        remote: bool,
    },

    /// Extract a transcript
    Transcript {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show signals, resource type and interactivity
    Classify {
        #[command(flatten)]
        input: InputArgs,

        /// Resolve the video duration over the network
        #[arg(short, long)]
        remote: bool,
    },

    /// Normalize a duration value to ISO-8601
    Duration {
        /// Value: a number, clock time, free text or ISO duration
        value: String,

        /// How to read a bare number
        #[arg(short, long, value_enum, default_value = "minutes")]
        unit: UnitArg,
    },

    /// Convert an ISO-8601 duration to seconds
    Seconds {
        /// ISO duration, e.g. PT1H30M
        iso: String,
    },

    /// Filter a JSON array of candidate labels
    Sanitize {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Unit of a bare number for the CLI (maps to NumericUnit)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Seconds,
    Minutes,
    Hours,
}

impl From<UnitArg> for NumericUnit {
    fn from(u: UnitArg) -> Self {
        match u {
            UnitArg::Seconds => NumericUnit::Seconds,
            UnitArg::Minutes => NumericUnit::Minutes,
            UnitArg::Hours => NumericUnit::Hours,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = match self.config.as_deref() {
            Some(path) => load_config_at(path)?,
            None => load_config()?,
        };

        match self.command {
            Commands::Analyze {
                input,
                permalink,
                remote,
                thumbnail,
                image,
            } => {
                let doc = read_document(&input)?;
                let options = AnalyzeOptions {
                    permalink,
                    resolve_remote: remote,
                    explicit_thumbnail: thumbnail,
                    principal_image: image,
                };
                let analysis = engine(&config, remote).analyze(&doc, &options).await;
                print_json(&analysis)
            }
            Commands::Steps { input } => {
                let doc = read_document(&input)?;
                print_json(&engine(&config, false).steps(&doc))
            }
            Commands::Video { input, remote } => {
                let doc = read_document(&input)?;
                let engine = engine(&config, remote);
                let video = match engine.video(&doc) {
                    Some(video) if remote => Some(engine.enrich_video(&video).await),
                    other => other,
                };
                print_json(&video)
            }
            Commands::Chapters {
                input,
                permalink,
                remote,
            } => {
                let doc = read_document(&input)?;
                let engine = engine(&config, remote);
                let mut video = engine.video(&doc);
                if remote {
                    if let Some(v) = video.as_mut() {
                        let seconds = engine.resolve_duration(v).await;
                        v.duration_seconds = Some(seconds).filter(|s| *s > 0);
                    }
                }
                print_json(&engine.chapters(&doc, video.as_ref(), permalink.as_deref()))
            }
            Commands::Transcript { input } => {
                let doc = read_document(&input)?;
                print_json(&engine(&config, false).transcript(&doc))
            }
            Commands::Classify { input, remote } => {
                let doc = read_document(&input)?;
                let engine = engine(&config, remote);
                let mut video = engine.video(&doc);
                if remote {
                    if let Some(v) = video.as_mut() {
                        let seconds = engine.resolve_duration(v).await;
                        v.duration_seconds = Some(seconds).filter(|s| *s > 0);
                    }
                }
                let signals = engine.signals(&doc);
                print_json(&json!({
                    "signals": signals,
                    "resource_type": engine.resource_type(&doc, video.as_ref(), &signals),
                    "interactivity": engine.interactivity(&doc, video.as_ref(), &signals),
                }))
            }
            Commands::Duration { value, unit } => {
                print_json(&json!({ "iso": normalize_duration(value.as_str(), unit.into()) }))
            }
            Commands::Seconds { iso } => {
                print_json(&json!({ "seconds": iso_duration_to_seconds(&iso) }))
            }
            Commands::Sanitize { input } => {
                let raw = read_input(input.input.as_deref())?;
                let items: Vec<serde_json::Value> = serde_json::from_str(&raw)
                    .context("Sanitize input must be a JSON array")?;
                print_json(&sanitize(&items))
            }
            Commands::Config => print_json(&config),
        }
    }
}

/// Engine for a command; network providers only when asked for
fn engine(config: &ResolvedConfig, remote: bool) -> ExtractionEngine {
    if remote {
        config.build_engine()
    } else {
        ExtractionEngine::new(config.engine_settings())
    }
}

/// Read content from a file, or from stdin when it is piped
fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    if io::stdin().is_terminal() {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

fn read_document(input: &InputArgs) -> Result<ContentDocument> {
    Ok(ContentDocument::new(read_input(input.input.as_deref())?))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_duration_command() {
        let cli = Cli::parse_from(["extracta", "duration", "2", "--unit", "hours"]);
        match cli.command {
            Commands::Duration { value, unit } => {
                assert_eq!(value, "2");
                assert_eq!(normalize_duration(value.as_str(), unit.into()), "PT2H");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_read_input_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "<p>hello</p>").unwrap();
        assert_eq!(read_input(Some(temp.path())).unwrap(), "<p>hello</p>");
        assert!(read_input(Some(Path::new("/nonexistent/input.html"))).is_err());
    }
}
