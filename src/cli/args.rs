//! CLI argument structures
//!
//! The main `Cli` structure and one subcommand per administrative chore.
//! Networked subcommands take the bearer token via `--token` or the
//! `CLASSOPS_TOKEN` environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Administrative chores for an e-learning platform instance
#[derive(Parser)]
#[command(name = "classops")]
#[command(about = "classops - administrative chores for an e-learning platform", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign matching courses to every group and write an outcome report
    #[command(name = "assign")]
    Assign {
        /// Base URL of the platform instance
        instance_url: String,

        /// Courses CSV (Course ID, Grade, Language)
        courses: PathBuf,

        /// Groups CSV (Group ID, Group Name, Grade, Language)
        groups: PathBuf,

        /// Directory for the timestamped outcome report
        output_dir: PathBuf,

        /// Bearer token for the platform API
        #[arg(long, env = "CLASSOPS_TOKEN", hide_env_values = true)]
        token: String,

        /// Process every group even after a rejected submission
        #[arg(long)]
        keep_going: bool,

        /// HTTP request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Retry attempts for transient remote failures (5xx, timeouts)
        #[arg(long)]
        retries: Option<u32>,

        /// Path to a TOML settings file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Filter a groups CSV by the group naming convention
    #[command(name = "extract-groups")]
    ExtractGroups {
        /// Groups CSV to filter (Group ID, Group Name)
        input: PathBuf,

        /// Directory for the timestamped filtered CSV
        output_dir: PathBuf,
    },

    /// Export every group on the instance to a CSV file
    #[command(name = "list-groups")]
    ListGroups {
        /// Base URL of the platform instance
        instance_url: String,

        /// Directory for the timestamped groups CSV
        output_dir: PathBuf,

        /// Bearer token for the platform API
        #[arg(long, env = "CLASSOPS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Print the number of groups on the instance
    #[command(name = "count-groups")]
    CountGroups {
        /// Base URL of the platform instance
        instance_url: String,

        /// Bearer token for the platform API
        #[arg(long, env = "CLASSOPS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Export the published course catalog to a JSON file
    #[command(name = "fetch-courses")]
    FetchCourses {
        /// Base URL of the platform instance
        instance_url: String,

        /// Directory for the timestamped catalog JSON
        output_dir: PathBuf,

        /// Bearer token for the platform API
        #[arg(long, env = "CLASSOPS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Substitute {{ name }} variables in a text file
    #[command(name = "render")]
    Render {
        /// Variables file (name = value lines, # comments)
        variables: PathBuf,

        /// Input text file
        input: PathBuf,

        /// Output file
        output: PathBuf,
    },

    /// Merge numbered HTML fragments in a directory into index.html
    #[command(name = "merge-html")]
    MergeHtml {
        /// Directory containing N-Title.html fragments
        directory: PathBuf,
    },

    /// Batch-convert presentations with an external converter
    #[command(name = "convert")]
    Convert {
        /// Path to the converter executable
        converter: PathBuf,

        /// A .pptx file or a directory of them
        input: PathBuf,
    },
}
