pub mod setup;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::formatting::ColorMode;
use crate::model::Grouping;
use crate::output::OutputFormat;
use crate::predicate::FilterSpec;

#[derive(Parser, Debug)]
#[command(name = "pavemap")]
#[command(about = "Pavement condition classification, filtering and KPI aggregation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the nearest .pavemap.toml)
    #[arg(short, long, global = true, env = "PAVEMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// When to color terminal output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

/// Region/route/category restrictions shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Survey year
    #[arg(short, long)]
    pub year: u16,

    /// Subgroup category keys (comma-separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Region names (repeatable)
    #[arg(long = "region")]
    pub regions: Vec<String>,

    /// Route identifiers (comma-separated)
    #[arg(long = "route", value_delimiter = ',')]
    pub routes: Vec<String>,
}

impl FilterArgs {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new(self.year)
            .with_categories(self.categories.iter().cloned())
            .with_regions(self.regions.iter().cloned())
            .with_routes(self.routes.iter().cloned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Region,
    Category,
}

impl From<GroupBy> for Grouping {
    fn from(group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Region => Grouping::Region,
            GroupBy::Category => Grouping::Category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PredicateFormat {
    /// SQL WHERE clause
    #[default]
    Sql,
    /// Predicate tree as JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Classify KPI values
    Classify {
        /// KPI key (e.g. iri, rut, csc, mpd, psci)
        #[arg(short, long)]
        kpi: String,

        /// Survey year whose thresholds apply
        #[arg(short, long)]
        year: u16,

        /// Three-class good/fair/poor view
        #[arg(long)]
        simplified: bool,

        /// Values to classify; anything non-numeric has no class
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Print the record filter for a set of choices
    Where {
        #[command(flatten)]
        filter: FilterArgs,

        /// Chart selection `region:<name>:<class>` or `category:<key>:<class>` (repeatable).
        /// Selections are OR'd together and combined with the filter above.
        #[arg(long = "select")]
        selections: Vec<String>,

        /// KPI the selections refer to
        #[arg(short, long)]
        kpi: Option<String>,

        /// Three-class good/fair/poor view
        #[arg(long)]
        simplified: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "sql")]
        format: PredicateFormat,
    },

    /// Aggregate condition classes per group
    Aggregate {
        /// Record file: JSON array or {"features": [...]} document
        records: PathBuf,

        /// KPI key
        #[arg(short, long)]
        kpi: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Grouping
        #[arg(long = "group-by", value_enum, default_value = "region")]
        group_by: GroupBy,

        /// Three-class good/fair/poor view
        #[arg(long)]
        simplified: bool,

        /// Include per-group value statistics
        #[arg(long)]
        stats: bool,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        /// Aggregate on the current thread only
        #[arg(long)]
        sequential: bool,
    },
}
