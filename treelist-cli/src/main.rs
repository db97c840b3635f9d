//! Tree-List command-line front-end.
//!
//! Drives an [`ItemStore`] backed by a SQLite blob store: seed or reset the
//! item list, print the tree view, and apply JSON patch batches.

mod logging;
mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use treelist_core::{ItemStore, SqliteBlobStore, TreeItem, TreeListError};

/// Tree-List item store tools.
#[derive(Parser)]
#[command(name = "treelist", about = "Maintain a tree of items stored as a flat list")]
struct Cli {
    /// Item store database file (default: from settings).
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Load the store, seeding the default tree if it is empty.
    Init,
    /// Replace the stored list with the default tree.
    Reset,
    /// Print the tree view as JSON.
    Read {
        /// Indent the output.
        #[arg(long)]
        pretty: bool,
    },
    /// Apply a JSON array of patches, e.g. `[{"uuid":"ABAA","order":3}]`.
    Write {
        /// Patch JSON, or `-` to read it from stdin.
        patches: String,
    },
    /// Show or change the saved settings.
    Config {
        /// Remember this file as the default item store.
        #[arg(long)]
        set_store: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let mut settings = settings::load_settings();

    if let Commands::Config { set_store } = &cli.command {
        if let Some(path) = set_store {
            settings.store_path = path.to_string_lossy().to_string();
            if let Err(e) = settings::save_settings(&settings) {
                eprintln!("Error: failed to save settings: {}", e.user_message());
                process::exit(exit_code(&e));
            }
        }
        println!("store: {}", settings.store_path);
        println!("settings file: {}", settings::settings_file_path().display());
        return;
    }

    let store_path = cli.store.unwrap_or_else(|| PathBuf::from(&settings.store_path));
    let command = match resolve_stdin(cli.command) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: failed to read patches from stdin: {e}");
            process::exit(2);
        }
    };

    match execute(&command, &store_path) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            process::exit(exit_code(&e));
        }
    }
}

/// Replaces a `write -` payload with the contents of stdin.
fn resolve_stdin(command: Commands) -> std::io::Result<Commands> {
    match command {
        Commands::Write { patches } if patches == "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(Commands::Write { patches: buf })
        }
        other => Ok(other),
    }
}

/// Runs one store command against the database at `store_path` and returns
/// the text to print.
fn execute(command: &Commands, store_path: &Path) -> Result<String, TreeListError> {
    if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let blobs = SqliteBlobStore::create(store_path)?;
    log::debug!("Using item store at {}", store_path.display());

    match command {
        Commands::Reset => {
            let mut store = ItemStore::new(blobs);
            store.reset()?;
            Ok(format!("reset: {} items", store.items()?.len()))
        }
        Commands::Init => {
            let store = ItemStore::open(blobs)?;
            Ok(format!("ready: {} items", store.items()?.len()))
        }
        Commands::Read { pretty } => {
            let store = ItemStore::open(blobs)?;
            if *pretty {
                let tree: Option<TreeItem> = store.read_tree()?;
                Ok(serde_json::to_string_pretty(&tree)?)
            } else {
                store.read()
            }
        }
        Commands::Write { patches } => {
            let mut store = ItemStore::open(blobs)?;
            let report = store.write(patches)?;
            Ok(serde_json::to_string(&report)?)
        }
        Commands::Config { .. } => Ok(String::new()),
    }
}

/// 1 = the request was rejected, 2 = the store or filesystem failed.
fn exit_code(e: &TreeListError) -> i32 {
    match e {
        TreeListError::Decode(_) | TreeListError::NotInitialized => 1,
        TreeListError::Database(_) | TreeListError::Io(_) | TreeListError::InvalidStore(_) => 2,
    }
}
