use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Keep flashcard notes and their media in sync from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local collection database
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to profile config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage note types
    Notetype {
        #[command(subcommand)]
        command: NotetypeCommands,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note type name
        #[arg(short = 't', long, value_name = "NAME")]
        notetype: String,
        /// Field values in declaration order
        fields: Vec<String>,
        /// Space-separated tags
        #[arg(long, value_name = "TAGS")]
        tags: Option<String>,
    },
    /// List notes
    List {
        /// Only notes of this note type
        #[arg(short = 't', long, value_name = "NAME")]
        notetype: Option<String>,
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a note's fields and tags
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one field of a note
    Set {
        /// Note ID
        id: String,
        /// Field name
        field: String,
        /// New field value
        value: String,
    },
    /// Add, remove or check note tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Check whether a note's first field is empty or duplicated
    Dupe {
        /// Note ID
        id: String,
    },
    /// Sync media files
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },
    /// Show or change the profile config
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum NotetypeCommands {
    /// Register a note type
    Add {
        /// Note type name
        name: String,
        /// Field names in order (repeat the flag)
        #[arg(short, long = "field", value_name = "NAME", required = true)]
        fields: Vec<String>,
    },
    /// List registered note types
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// Add a tag
    Add { id: String, tag: String },
    /// Remove a tag, ignoring case
    Remove { id: String, tag: String },
    /// Check for an exact tag
    Has { id: String, tag: String },
}

#[derive(Subcommand)]
pub enum MediaCommands {
    /// Run a media sync and print its log (Ctrl-C aborts)
    Sync,
    /// Print the media sync endpoint for the configured shard
    Endpoint,
    /// Store the sync key in the system keychain
    LogIn {
        /// Sync key issued by the server
        key: String,
        /// Server shard assigned with the key
        #[arg(long)]
        shard: Option<u32>,
    },
    /// Remove the stored sync key
    LogOut,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the profile config
    Show,
    /// Update profile config values
    Set {
        /// Enable or disable media sync
        #[arg(long, value_name = "BOOL")]
        media_sync: Option<bool>,
        /// Server shard
        #[arg(long, value_name = "N")]
        shard: Option<u32>,
        /// Local media folder
        #[arg(long, value_name = "PATH")]
        media_dir: Option<PathBuf>,
        /// Folder the local media folder is mirrored with
        #[arg(long, value_name = "PATH")]
        remote_media_dir: Option<PathBuf>,
    },
}
