use crate::api::models::Style;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sbc")]
#[command(about = "Upload screenplays and follow storyboard generation from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Server URL, overriding the profile
    #[arg(long, global = true, env = "STORYBOARD_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the server is up
    Health,
    /// Upload a screenplay (.pdf, .txt or .fountain, up to 16MB)
    Upload {
        /// Screenplay file
        file: PathBuf,
    },
    /// Start storyboard generation for a project
    Generate {
        /// Project id (defaults to the last uploaded project)
        project_id: Option<String>,
        /// Visual style
        #[arg(long, value_enum, default_value_t = Style::Classic)]
        style: Style,
    },
    /// Show the current generation status once
    Status {
        /// Project id (defaults to the last uploaded project)
        project_id: Option<String>,
    },
    /// Follow generation progress until it finishes
    Watch {
        /// Project id (defaults to the last uploaded project)
        project_id: Option<String>,
        /// Milliseconds between status polls
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Give up after this many seconds
        #[arg(long, default_value = "1800")]
        timeout_secs: u64,
        /// Consecutive failed polls before giving up
        #[arg(long, default_value = "5")]
        max_failures: u32,
    },
    /// Estimate frame count and generation time
    Estimate {
        /// Number of scenes to storyboard
        max_scenes: u32,
        /// Frames per scene: low, medium or high
        #[arg(long, default_value = "medium")]
        density: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value (url, timeout, poll-interval)
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
