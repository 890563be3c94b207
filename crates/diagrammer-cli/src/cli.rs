//! Command-line interface for the diagrammer utility
//!
//! Replays scripted editing sessions against the engine and prints the
//! resulting diagram.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::colorizer::colorize_output;
use crate::dump::SessionDump;
use crate::script::{replay, Script};
use diagrammer::core::logging::{init_logging, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use diagrammer::{DiagramType, EditorConfig};

/// Diagrammer - replay editing sessions on UML-style diagrams
#[derive(Parser)]
#[command(name = "diagrammer")]
#[command(about = "Replay scripted editing sessions against the diagram editing engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay an editing script and print the resulting diagram
    Replay {
        /// Script file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the dump (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the diagram as JSON
        #[arg(long)]
        json: bool,

        /// Canvas width in pixels
        #[arg(long, default_value_t = EditorConfig::default().canvas.width)]
        canvas_width: i32,

        /// Canvas height in pixels
        #[arg(long, default_value_t = EditorConfig::default().canvas.height)]
        canvas_height: i32,

        /// When to use colors in output
        #[arg(
            long,
            value_enum,
            default_value_t = ColorChoice::Auto
        )]
        color: ColorChoice,
    },

    /// Show supported diagram types
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct DiagrammerApp;

impl DiagrammerApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());
        let log_format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Diagrammer v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Replay {
                input,
                output,
                json,
                canvas_width,
                canvas_height,
                color,
            } => {
                let config = EditorConfig::new().with_canvas(canvas_width, canvas_height);
                self.replay_command(input, output, json, config, color, cli.verbose)
            }
            Commands::Types { json } => self.types_command(json, cli.verbose),
        }
    }

    /// Handle the replay command
    fn replay_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        json: bool,
        config: EditorConfig,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let script = Script::from_json(&content)?;
        let (session, report) = replay(&script, config)?;
        if verbose {
            eprintln!(
                "Replayed {} steps, {} rejected",
                report.steps,
                report.rejected.len()
            );
        }

        let dump = SessionDump::capture(&session, &report);
        let rendered = if json {
            dump.to_json()?
        } else if self.should_colorize(&output, color) {
            colorize_output(&dump.to_text())
        } else {
            dump.to_text()
        };
        self.write_output(output, &rendered)
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported diagram types");
        }

        let types = DiagramType::all();
        if json {
            let entries: Vec<serde_json::Value> = types
                .iter()
                .map(|diagram_type| {
                    serde_json::json!({
                        "name": diagram_type.to_string(),
                        "description": diagram_type.description(),
                        "node_kinds": diagram_type
                            .node_kinds()
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>(),
                        "edge_kinds": diagram_type
                            .edge_kinds()
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "supported_types": entries,
                "total": types.len()
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Supported diagram types:");
            for diagram_type in types {
                println!(
                    "  {:<10} - {}",
                    diagram_type.to_string(),
                    diagram_type.description()
                );
            }
            println!();
            println!("Total: {} diagram types supported", types.len());
        }
        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}
