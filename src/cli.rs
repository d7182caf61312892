use clap::{Parser, Subcommand};
use shoptrack_common::TaskStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shoptrack")]
#[command(author, version, about = "Work-order tracker for small vehicle repair shops")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, list and edit work orders
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Manage the mechanic roster
    Mechanic {
        #[command(subcommand)]
        action: MechanicCommand,
    },

    /// Write a JSON backup of all work orders and mechanics
    Export {
        /// Directory to write the backup into (defaults to export.dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Restore a JSON backup, replacing the collections it contains
    Import {
        /// Backup file to read
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Delete all work orders and mechanics
    Clear,

    /// Normalize photos without touching stored data
    Image {
        #[command(subcommand)]
        action: ImageCommand,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Create a work order
    Add {
        /// Short title
        #[arg(required = true)]
        title: String,

        /// Assigned mechanic (must be on the roster)
        #[arg(short, long)]
        mechanic: String,

        /// Checklist item (repeatable)
        #[arg(short, long = "item")]
        items: Vec<String>,

        /// Initial status
        #[arg(short, long, default_value = "pending")]
        status: TaskStatus,

        /// Make, model, plate...
        #[arg(long)]
        vehicle: Option<String>,

        /// Estimated labour hours
        #[arg(long)]
        hours: Option<f64>,

        /// Photo to attach (repeatable)
        #[arg(short, long = "photo")]
        photos: Vec<PathBuf>,
    },

    /// List work orders, newest first
    List {
        /// Only tasks assigned to this mechanic
        #[arg(short, long)]
        mechanic: Option<String>,

        /// Only tasks in this status
        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// Case-insensitive text search
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single work order
    Show {
        #[arg(required = true)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a work order; omitted fields keep their current value
    Update {
        #[arg(required = true)]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        mechanic: Option<String>,

        /// Replace the checklist (repeatable)
        #[arg(short, long = "item")]
        items: Vec<String>,

        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// Vehicle description; pass "" to clear
        #[arg(long)]
        vehicle: Option<String>,

        #[arg(long)]
        hours: Option<f64>,
    },

    /// Delete a work order
    Delete {
        #[arg(required = true)]
        id: String,
    },

    /// Compress photos and attach them to a work order
    Attach {
        #[arg(required = true)]
        id: String,

        /// Photo files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove a photo from a work order
    Detach {
        #[arg(required = true)]
        id: String,

        /// Zero-based position of the photo, as listed by `task show`
        #[arg(required = true)]
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum MechanicCommand {
    /// Show the roster
    List,

    /// Add a mechanic
    Add {
        #[arg(required = true)]
        name: String,
    },

    /// Remove a mechanic (their tasks keep the name)
    Remove {
        #[arg(required = true)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ImageCommand {
    /// Resize and re-encode a photo as a JPEG data URL
    Compress {
        #[arg(required = true)]
        input: PathBuf,

        /// Write the data URL here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_width: Option<u32>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_height: Option<u32>,

        /// JPEG quality in (0, 1]
        #[arg(long)]
        quality: Option<f32>,
    },

    /// Make a square thumbnail data URL
    Thumbnail {
        /// Image file or a file holding a data URL
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Edge length in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: Option<u32>,
    },

    /// Print the pixel dimensions of an image
    Info {
        /// Image file or a file holding a data URL
        #[arg(required = true)]
        input: PathBuf,
    },
}
