mod cli;

use pixvault::store::ImageStore;
use pixvault::{config, session, source, store};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "pixvault=debug".to_string()
        } else {
            "pixvault=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let command = cli.command.unwrap_or(Commands::Session);

    match command {
        Commands::Save { id, image } => {
            save_image(&id, &image, cli.config.as_deref(), cli.data_dir)
        }
        Commands::Get { id, out, json } => {
            get_image(&id, out.as_deref(), json, cli.config.as_deref(), cli.data_dir)
        }
        Commands::List { json } => list_images(json, cli.config.as_deref(), cli.data_dir),
        Commands::Session => run_session(cli.config.as_deref(), cli.data_dir),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("pixvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Resolve the vault directory and build the store over it.
///
/// The `--data-dir` flag wins, then `storage.data_dir` from the config,
/// then the platform data directory.
fn open_store(config_path: Option<&Path>, data_dir_flag: Option<PathBuf>) -> Result<ImageStore> {
    let config = config::load_config_or_default(config_path)?;

    let data_dir = match data_dir_flag {
        Some(dir) => dir,
        None => config::resolve_data_dir(&config)?,
    };

    tracing::debug!("vault directory: {:?}", data_dir);
    Ok(ImageStore::new(data_dir).with_quality(config.storage.jpeg_quality))
}

fn save_image(
    id: &str,
    image: &Path,
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(config_path, data_dir)?;

    // Fail on a bad id before decoding anything
    store::validate_id(id)?;

    let loaded = source::load(image)?;
    let saved = store.put(id, &loaded.image)?;

    println!(
        "saved {:?} ({}x{}, {} bytes) -> {}",
        id,
        saved.width,
        saved.height,
        saved.bytes,
        saved.path.display()
    );

    Ok(())
}

fn get_image(
    id: &str,
    out: Option<&Path>,
    json: bool,
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(config_path, data_dir)?;

    let image = store
        .get(id)?
        .with_context(|| format!("no image stored under {:?}", id))?;
    let stored_path = store.entry_path(id)?;

    if let Some(out) = out {
        image
            .save(out)
            .with_context(|| format!("Failed to write image to {:?}", out))?;
    }

    if json {
        let summary = serde_json::json!({
            "id": id,
            "width": image.width(),
            "height": image.height(),
            "path": stored_path,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{:?}: {}x{}, stored at {}",
            id,
            image.width(),
            image.height(),
            stored_path.display()
        );
        if let Some(out) = out {
            println!("written to {}", out.display());
        }
    }

    Ok(())
}

fn list_images(json: bool, config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path, data_dir)?;
    let entries = store.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("vault is empty ({})", store.base_dir().display());
        return Ok(());
    }

    for entry in &entries {
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {} bytes  {}", entry.id, entry.bytes, modified);
    }

    Ok(())
}

fn run_session(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path, data_dir)?;

    println!(
        "pixvault {} - vault at {}",
        env!("CARGO_PKG_VERSION"),
        store.base_dir().display()
    );
    println!("type 'help' for commands, 'quit' to leave");

    let mut session = session::Session::new(store);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    session.run(&mut stdin.lock(), &mut stdout.lock())?;

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  JPEG quality: {}", config.storage.jpeg_quality);
            match &config.storage.data_dir {
                Some(dir) => println!("  Data dir: {}", dir.display()),
                None => println!("  Data dir: (platform default)"),
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  JPEG quality: {}", config.storage.jpeg_quality);
        }
    }

    Ok(())
}
