use clap::{Parser, Subcommand};

/// appbits - push application source, uploading only what the platform lacks
#[derive(Parser)]
#[command(name = "appbits")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding target configuration. Defaults to ~/.appbits
    #[arg(long, global = true, env = "APPBITS_CONFIG_DIR")]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stage and upload an application directory or zip
    Push {
        /// Application directory or zip file (defaults to current directory)
        path: Option<String>,

        /// GUID of the application receiving the bits
        #[arg(long)]
        app_guid: String,

        /// Compute and package the upload without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Preview files that would be considered for upload
    Preview {
        /// Application directory or zip file (defaults to current directory)
        path: Option<String>,

        /// Show all files (not just summary)
        #[arg(short, long)]
        all: bool,
    },
    /// Check application parameters for conflicting route settings
    Validate {
        /// JSON file with an `applications` list
        file: String,
    },
    /// Manage the platform target
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
}

#[derive(Subcommand)]
pub enum TargetAction {
    /// Save the API URL and access token
    Set {
        #[arg(long)]
        api_url: String,

        #[arg(long, env = "APPBITS_TOKEN", hide_env_values = true)]
        token: String,

        /// Label for the org/space being targeted
        #[arg(long)]
        space: Option<String>,
    },
    /// Show the current target
    Show,
    /// Forget the saved target
    Clear,
}
