use std::path::PathBuf;

use clap::{Parser, Subcommand};

use license_expr::license::Strictness;

#[derive(Parser, Debug)]
#[command(
    name = "license-expr",
    about = "Parse, validate, and normalize SPDX license expressions",
    version
)]
pub struct Cli {
    /// Config file [default: ./.license-expr/config.toml, fallback ~/.config/license-expr/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show term details; repeat for debug logging (-vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print summary line
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse expressions and print their canonical and normalized forms
    Check {
        /// License expressions, e.g. "MIT OR Apache-2.0"
        #[arg(required = true, value_name = "EXPRESSION")]
        expressions: Vec<String>,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,

        /// Validation level [default: from config, else deprecated]
        #[arg(long, value_name = "LEVEL")]
        strictness: Option<StrictnessArg>,

        /// Accept "/" as OR, common license names, and scanner LicenseRefs
        #[arg(long)]
        lenient: bool,
    },

    /// Test whether a scanner LicenseRef denotes a license
    Match {
        /// Candidate identifier, e.g. LicenseRef-scancode-mit
        candidate: String,

        /// License name to test against [default: search the catalog]
        #[arg(long)]
        name: Option<String>,
    },

    /// Look up a license or exception identifier in the catalog
    Lookup {
        /// Identifier, e.g. GPL-2.0+ or Classpath-exception-2.0
        id: String,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum StrictnessArg {
    Any,
    Deprecated,
    Current,
}

impl From<&StrictnessArg> for Strictness {
    fn from(arg: &StrictnessArg) -> Self {
        match arg {
            StrictnessArg::Any => Strictness::AllowAny,
            StrictnessArg::Deprecated => Strictness::AllowDeprecated,
            StrictnessArg::Current => Strictness::AllowCurrent,
        }
    }
}
