use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vitrina_core::Route;
use vitrina_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Storefront client for the Telegram Mini App catalog", long_about = None)]
pub struct Cli {
    /// Host-signed init data (query string) used to open a session
    #[arg(long, env = "TG_INIT_DATA", global = true, hide_env_values = true)]
    pub init_data: Option<String>,

    /// Path to the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the catalog with its featured entry
    Home {
        /// Flip admin mode before rendering (administrators only)
        #[arg(long)]
        toggle_admin: bool,
    },

    /// Show one catalog entry
    Show { id: i64 },

    /// Resolve where an entry launches
    Open { id: i64 },

    /// Create an entry from a JSON draft
    Create {
        /// JSON file with the entry fields (camelCase)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Edit an entry with a JSON patch
    Edit {
        id: i64,

        /// JSON file with only the fields to change (camelCase)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete an entry
    Delete { id: i64 },

    /// Make an entry the featured one
    Promote { id: i64 },

    /// Send a broadcast message to all users
    Broadcast {
        /// Message text, at least 5 characters
        #[arg(short, long)]
        text: String,

        /// Image to upload and attach; the first uploaded file is used
        #[arg(short, long)]
        attach: Vec<PathBuf>,
    },

    /// Sign or check init data with a bot token (local development)
    DevInitData {
        /// Bot token shared with the backend
        #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
        bot_token: String,

        /// Telegram user id to sign for
        #[arg(long, default_value_t = 1)]
        user_id: i64,

        #[arg(long, default_value = "developer")]
        username: String,

        /// Check this payload instead of signing a new one
        #[arg(long)]
        check: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Commands {
    /// Location the command opens, `None` for commands that mount no page.
    pub fn route(&self) -> Option<Route> {
        match self {
            Commands::Home { .. } => Some(Route::Home),
            Commands::Show { id } | Commands::Open { id } | Commands::Delete { id } | Commands::Promote { id } => {
                Some(Route::Application { id: *id })
            }
            Commands::Create { .. } => Some(Route::CreateApplication),
            Commands::Edit { id, .. } => Some(Route::EditApplication { id: *id }),
            Commands::Broadcast { .. } => Some(Route::BroadcastMessage),
            Commands::DevInitData { .. } => None,
        }
    }
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Home { toggle_admin: false }
    }
}
