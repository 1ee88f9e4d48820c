//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::data::{Category, ResearcherStatus};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Content snapshot generator and cache-then-live data accessor
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file path (default: sitedata.toml)
    #[arg(short = 'C', long, default_value = "sitedata.toml")]
    pub config: PathBuf,

    /// Remote content API base URL (overrides config and API_BASE_URL)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Snapshot directory
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch all collections from the remote API into snapshot files
    Generate,

    /// List published articles
    Articles {
        /// Only featured articles (takes priority over --category)
        #[arg(long)]
        featured: bool,

        /// computer-science, business or humanities
        #[arg(long)]
        category: Option<Category>,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a single article by slug
    Article { slug: String },

    /// List active team members
    Team,

    /// List researchers
    Researchers {
        /// active, alumni or inactive
        #[arg(long)]
        status: Option<ResearcherStatus>,

        #[arg(long)]
        program: Option<String>,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List tags
    Tags,

    /// Show snapshot build metadata
    BuildInfo,
}
