//! prefstore CLI
//!
//! Command-line interface over a filesystem-backed store.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use prefstore::{BackendKind, Config, Preferences, PrefsError, StorageRoot};
use tracing_subscriber::{fmt, EnvFilter};

/// prefstore CLI
#[derive(Parser, Debug)]
#[command(name = "prefstore-cli")]
#[command(about = "CLI for the prefstore namespaced key-value store")]
#[command(version)]
struct Args {
    /// Host directory holding the store
    #[arg(short, long, default_value = "./prefstore_data")]
    data_dir: String,

    /// Storage root inside the data directory
    #[arg(short, long, default_value = "/nvs")]
    root: String,

    /// Namespace to operate on
    #[arg(short, long)]
    namespace: String,

    /// Clear namespaces in place instead of by quarantine rename
    #[arg(long)]
    in_place_clear: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Check whether a key exists
    Has {
        /// The key to check
        key: String,
    },

    /// List the keys of the namespace
    Keys,

    /// Delete every key of the namespace
    Clear,
}

impl Commands {
    fn is_read_only(&self) -> bool {
        matches!(self, Commands::Get { .. } | Commands::Has { .. } | Commands::Keys)
    }
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,prefstore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .root(&args.root)
        .backend(BackendKind::Filesystem {
            base_dir: args.data_dir.clone().into(),
            atomic_clear: !args.in_place_clear,
        })
        .build();

    match run(config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config, args: &Args) -> Result<(), PrefsError> {
    let root = Arc::new(StorageRoot::from_config(config));
    let mut prefs = Preferences::new(root);
    prefs.begin(&args.namespace, args.command.is_read_only())?;

    match &args.command {
        Commands::Get { key } => {
            let value = prefs.get_bytes_vec(key)?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Put { key, value } => {
            let written = prefs.put_bytes(key, value.as_bytes())?;
            println!("OK ({} bytes)", written);
        }
        Commands::Del { key } => {
            prefs.remove(key)?;
            println!("OK");
        }
        Commands::Has { key } => {
            println!("{}", prefs.is_key(key));
        }
        Commands::Keys => {
            for key in prefs.keys()? {
                println!("{}", key);
            }
        }
        Commands::Clear => {
            prefs.clear()?;
            println!("OK");
        }
    }

    prefs.end();
    Ok(())
}
