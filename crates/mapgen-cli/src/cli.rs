//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mapgen_codegen::GeneratorOptions;
use mapgen_wizard::MatchMode;

#[derive(Parser)]
#[command(
    name = "mapgen",
    version,
    about = "Build table-to-table column mappings and generate Java mapping code",
    long_about = "Build table-to-table column mappings and generate Java mapping code.\n\n\
                  Mapping configurations are JSON files; the wizard subcommand edits them \
                  with a line-oriented command script."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the Java mapping class for a configuration file.
    Generate(GenerateArgs),

    /// Print the tables and mappings of a configuration file.
    Show(ShowArgs),

    /// Read table names from stdin and print registration statements.
    TableCode,

    /// List the data sources of a data-source file.
    Datasources(DatasourcesArgs),

    /// Run a wizard command script.
    Wizard(WizardArgs),
}

/// Options controlling the generated class.
#[derive(Args, Clone)]
pub struct GeneratorArgs {
    /// Name of the generated class.
    #[arg(long = "class-name", default_value = "GeneratedMappings")]
    pub class_name: String,

    /// Package declaration of the generated file.
    #[arg(long = "package")]
    pub package: Option<String>,

    /// Provider interface the generated class implements.
    #[arg(long = "interface", default_value = "MappingProvider")]
    pub interface: String,
}

impl GeneratorArgs {
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            package: self.package.clone(),
            class_name: self.class_name.clone(),
            interface_name: self.interface.clone(),
            ..GeneratorOptions::default()
        }
    }
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Mapping configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Destination `.java` file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Mapping configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Only show tables whose name matches this pattern.
    #[arg(long = "filter", value_name = "PATTERN")]
    pub filter: Option<String>,

    /// How the filter pattern is matched.
    #[arg(long = "match", value_enum, default_value = "prefix")]
    pub match_mode: MatchArg,
}

#[derive(Parser)]
pub struct DatasourcesArgs {
    /// Data-source JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct WizardArgs {
    /// Command script to run (reads stdin when omitted).
    #[arg(long = "script", value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Configuration loaded before the script starts.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MatchArg {
    Prefix,
    Contains,
    Wildcard,
}

impl From<MatchArg> for MatchMode {
    fn from(value: MatchArg) -> Self {
        match value {
            MatchArg::Prefix => MatchMode::Prefix,
            MatchArg::Contains => MatchMode::Contains,
            MatchArg::Wildcard => MatchMode::Wildcard,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
