use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mx-aero-pack")]
#[command(about = "Converts the Mexican aerodrome register into KML overlays and content packs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and hide progress bars")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Options shared by every command that reads the register
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(short, long, help = "Register exported as CSV")]
    pub input: PathBuf,

    #[arg(long, help = "Schema version: auto, legacy, classified, runway or custom")]
    pub schema: Option<String>,

    #[arg(long, help = "Prefix prepended to every designator")]
    pub identifier_prefix: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Layers to build (airports,heliports)")]
    pub layers: Vec<String>,

    #[arg(long)]
    pub max_workers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the full content pack: manifest plus one KMZ per layer
    Build {
        #[command(flatten)]
        input: InputArgs,

        #[arg(
            short,
            long,
            help = "Output pack path [default: mx-aerodromes-{YYMMDD}.zip]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Directory holding {base}_{suffix}.png icons")]
        icons_dir: Option<PathBuf>,

        #[arg(long, help = "Directory mirrored into the pack root")]
        extra_content: Option<PathBuf>,

        #[arg(long, help = "Staging directory [default: next to the output]")]
        staging_dir: Option<PathBuf>,

        #[arg(long, help = "Description block: html or text")]
        description_format: Option<String>,

        #[arg(long, help = "Manifest effective date (YYYY-MM-DD) [default: today]")]
        effective_date: Option<NaiveDate>,
    },

    /// Write one KML document per layer without packaging
    Convert {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[arg(long, help = "Description block: html or text")]
        description_format: Option<String>,
    },

    /// Run the pipeline and print the conversion report
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
}
