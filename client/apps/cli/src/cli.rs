//! Command line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "blog", version, about = "Blog client tools and API access")]
pub struct Cli {
    /// Settings file (session id and other persisted values)
    #[arg(
        long,
        global = true,
        env = "BLOG_STORAGE_PATH",
        default_value = ".blog/storage.json"
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Format a millisecond timestamp, or show the current time
    Date {
        /// Millisecond timestamp (number or numeric text)
        stamp: Option<String>,
        /// IANA time zone, e.g. Asia/Shanghai
        #[arg(long)]
        tz: Option<String>,
    },

    /// Strip empty values from a JSON object
    Sanitize {
        /// JSON text
        json: String,
    },

    /// Hex encode or decode text
    Hex {
        #[arg(value_enum)]
        action: CodecAction,
        text: String,
    },

    /// Base64 encode or decode text
    Base64 {
        #[arg(value_enum)]
        action: CodecAction,
        text: String,
        /// Use the URL-safe alphabet without padding
        #[arg(long)]
        url_safe: bool,
    },

    /// Digest text with SHA-1, SHA-256 or SHA-512
    Hash {
        text: String,
        /// Algorithm name; all algorithms when omitted
        #[arg(long, short)]
        algorithm: Option<String>,
    },

    /// String helpers
    String {
        #[arg(value_enum)]
        action: StringAction,
        text: String,
    },

    /// GET an API path and print the response body
    Get {
        /// Path below the API base URL
        path: String,
        /// Query parameter as key=value; values that parse as JSON are sent typed
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
        /// Session id to send (remembered for later calls)
        #[arg(long)]
        session: Option<String>,
    },

    /// Resolve a view path through the auth gate
    Open {
        /// View path, e.g. /editor/12
        path: String,
        /// Session id to use (remembered for later calls)
        #[arg(long)]
        session: Option<String>,
    },

    /// Forget the remembered session id
    Logout,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CodecAction {
    Encode,
    Decode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StringAction {
    Upper,
    Lower,
    Trim,
    Reverse,
    Stats,
}
