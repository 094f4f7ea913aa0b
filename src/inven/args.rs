use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inven")]
#[command(about = "Local-first inventory tracking for the command line", long_about = None)]
#[command(version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("GIT_COMMIT_DATE"),
    ")"
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $INVEN_HOME, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage items
    #[command(alias = "i")]
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Manage racks
    Rack {
        #[command(subcommand)]
        command: RackCommands,
    },

    /// Manage shelves
    Shelf {
        #[command(subcommand)]
        command: ShelfCommands,
    },

    /// Manage cartons
    #[command(alias = "box")]
    Carton {
        #[command(subcommand)]
        command: HolderCommands,
    },

    /// Manage binders
    Binder {
        #[command(subcommand)]
        command: HolderCommands,
    },

    /// Manage containers (free-form sub-containers with a type label)
    Container {
        #[command(subcommand)]
        command: ContainerCommands,
    },

    /// Search items by name, description, tag, or location
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// Show the rack/shelf/sub-container tree with occupancy counts
    #[command(alias = "tree")]
    Locations,

    /// Write a JSON backup of the whole inventory to the current directory
    Export,

    /// Report dangling references (changes nothing)
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (data-file, backup-prefix)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item
    #[command(alias = "a")]
    Add {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Image URL or data URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,

        /// Shelf the item sits on (id or unique prefix)
        #[arg(short, long)]
        shelf: String,

        /// Carton on that shelf
        #[arg(long, conflicts_with_all = ["binder", "container"])]
        carton: Option<String>,

        /// Binder on that shelf
        #[arg(long, conflicts_with = "container")]
        binder: Option<String>,

        /// Container on that shelf
        #[arg(long)]
        container: Option<String>,
    },

    /// List items
    #[command(alias = "ls")]
    List {
        /// Search term
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Only items in this rack
        #[arg(long)]
        rack: Option<String>,

        /// Only items on this shelf
        #[arg(long)]
        shelf: Option<String>,

        /// Only items in this carton
        #[arg(long)]
        carton: Option<String>,

        /// Only items in this binder
        #[arg(long)]
        binder: Option<String>,

        /// Only items in this container
        #[arg(long)]
        container: Option<String>,
    },

    /// Show full details for one item
    Show { ident: String },

    /// Edit an item (only the given fields change)
    #[command(alias = "e")]
    Edit {
        ident: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Comma-separated tags (replaces the tag list)
        #[arg(short, long)]
        tags: Option<String>,

        /// Image URL (repeatable; replaces the image list)
        #[arg(long = "image")]
        images: Vec<String>,

        /// Move to this shelf
        #[arg(long)]
        shelf: Option<String>,

        /// Into this carton (requires --shelf)
        #[arg(long, requires = "shelf", conflicts_with_all = ["binder", "container"])]
        carton: Option<String>,

        /// Into this binder (requires --shelf)
        #[arg(long, requires = "shelf", conflicts_with = "container")]
        binder: Option<String>,

        /// Into this container (requires --shelf)
        #[arg(long, requires = "shelf")]
        container: Option<String>,
    },

    /// Delete one or more items
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        idents: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RackCommands {
    /// Add a rack
    Add {
        number: u32,
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// List racks
    #[command(alias = "ls")]
    List,

    /// Edit a rack
    Edit {
        ident: String,

        #[arg(long)]
        number: Option<u32>,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete one or more racks (cascades to their shelves and sub-containers)
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        idents: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShelfCommands {
    /// Add a shelf to a rack
    Add {
        /// Rack the shelf belongs to (id or unique prefix)
        #[arg(short, long)]
        rack: String,

        number: u32,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// List shelves
    #[command(alias = "ls")]
    List {
        /// Only shelves in this rack
        #[arg(long)]
        rack: Option<String>,
    },

    /// Edit a shelf
    Edit {
        ident: String,

        #[arg(long)]
        rack: Option<String>,

        #[arg(long)]
        number: Option<u32>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete one or more shelves (cascades to their sub-containers)
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        idents: Vec<String>,
    },
}

/// Shared by cartons and binders; the two differ only in which collection
/// they live in.
#[derive(Subcommand, Debug)]
pub enum HolderCommands {
    /// Add to a shelf
    Add {
        /// Shelf it sits on (id or unique prefix)
        #[arg(short, long)]
        shelf: String,

        number: u32,
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// List
    #[command(alias = "ls")]
    List {
        /// Only those on this shelf
        #[arg(long)]
        shelf: Option<String>,
    },

    /// Edit
    Edit {
        ident: String,

        #[arg(long)]
        shelf: Option<String>,

        #[arg(long)]
        number: Option<u32>,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete one or more
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        idents: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContainerCommands {
    /// Add a container to a shelf
    Add {
        /// Shelf it sits on (id or unique prefix)
        #[arg(short, long)]
        shelf: String,

        number: u32,
        name: String,

        /// Free-text category label ("bag", "folder", ...)
        #[arg(long = "type")]
        kind: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// List containers
    #[command(alias = "ls")]
    List {
        /// Only containers on this shelf
        #[arg(long)]
        shelf: Option<String>,
    },

    /// Edit a container
    Edit {
        ident: String,

        #[arg(long)]
        shelf: Option<String>,

        #[arg(long)]
        number: Option<u32>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete one or more containers
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        idents: Vec<String>,
    },
}
