//! Deckpad Control Tool
//!
//! CLI for driving a button panel directly over USB HID.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deckpad_hw::{list_devices, Keypad};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, KeyConfig};

#[derive(Parser)]
#[command(name = "deckpadctl")]
#[command(about = "Control tool for deckpad button panels")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// HID path of the panel (default: first attached panel)
    #[arg(long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached panels
    List,
    /// Restore the factory display state
    Reset,
    /// Key image commands
    Image {
        #[command(subcommand)]
        action: ImageCommands,
    },
    /// Print key presses as they happen
    Watch {
        /// Poll timeout in milliseconds (-1 blocks)
        #[arg(long, default_value = "-1", allow_negative_numbers = true)]
        timeout: i32,

        /// Report each key only on its first press
        #[arg(long)]
        once: bool,
    },
    /// Apply a key profile and print labelled presses
    Apply {
        /// Profile file (TOML)
        config: PathBuf,
    },
    /// Write an example key profile
    Init {
        /// Output file path
        #[arg(default_value = "deckpad.toml")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Show a 72x72 PNG on a key
    Set {
        /// Logical key index (0-14)
        key: u8,
        /// PNG file
        path: PathBuf,
    },
    /// Blank a key
    Clear {
        /// Logical key index (0-14)
        key: u8,
    },
    /// Blank every key
    ClearAll,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::List => handle_list(),
        Commands::Init { output } => handle_init(&output),
        Commands::Reset => {
            open(cli.device.as_deref())?
                .reset()
                .context("Failed to reset panel")?;
            println!("Panel reset");
            Ok(())
        }
        Commands::Image { action } => handle_image(action, &mut open(cli.device.as_deref())?),
        Commands::Watch { timeout, once } => {
            handle_watch(&mut open(cli.device.as_deref())?, timeout, once)
        }
        Commands::Apply { config } => handle_apply(&config, &mut open(cli.device.as_deref())?),
    }
}

fn open(path: Option<&str>) -> Result<Keypad> {
    let keypad = match path {
        Some(path) => Keypad::open_path(path),
        None => Keypad::open(),
    }
    .context("Failed to open panel")?;
    info!("Using {}", keypad.layout().name);
    Ok(keypad)
}

fn handle_list() -> Result<()> {
    let devices = list_devices().context("Failed to enumerate devices")?;
    if devices.is_empty() {
        println!("No panels found");
        return Ok(());
    }
    for device in devices {
        let layout = device.layout.map_or("unsupported", |l| l.name);
        println!(
            "{:04X}:{:04X}  {}  {}",
            device.vendor_id, device.product_id, layout, device.path
        );
        if let Some(serial) = device.serial {
            println!("    serial: {}", serial);
        }
    }
    Ok(())
}

fn handle_image(action: ImageCommands, keypad: &mut Keypad) -> Result<()> {
    match action {
        ImageCommands::Set { key, path } => {
            keypad
                .set_key_image(key, &path)
                .with_context(|| format!("Failed to set image on key {}", key))?;
            println!("Key {} set to {}", key, path.display());
        }
        ImageCommands::Clear { key } => {
            keypad
                .clear_key_image(key)
                .with_context(|| format!("Failed to clear key {}", key))?;
            println!("Key {} cleared", key);
        }
        ImageCommands::ClearAll => {
            keypad.clear_all_images().context("Failed to clear keys")?;
            println!("All keys cleared");
        }
    }

    Ok(())
}

fn handle_watch(keypad: &mut Keypad, timeout: i32, once: bool) -> Result<()> {
    if once {
        for key in 0..keypad.layout().key_count() {
            keypad.set_key_handler(key, |key| {
                println!("Key {} pressed", key);
                false
            })?;
        }
    } else {
        keypad.set_global_key_handler(|key| {
            println!("Key {} pressed", key);
            true
        });
    }

    println!("Watching for key presses (Ctrl+C to stop)");
    loop {
        keypad
            .process_events(timeout)
            .context("Failed to read key presses")?;
    }
}

fn handle_apply(path: &Path, keypad: &mut Keypad) -> Result<()> {
    let config = Config::load(path)?;
    info!("Loaded profile from: {}", path.display());

    if config.reset {
        keypad.reset().context("Failed to reset panel")?;
    }

    for entry in &config.keys {
        let applied = match &entry.image {
            Some(image) => keypad.set_key_image(entry.key, image),
            None => keypad.clear_key_image(entry.key),
        };
        applied.with_context(|| format!("Failed to apply key {}", entry.key))?;

        let name = entry.display_name();
        keypad.set_key_handler(entry.key, move |_| {
            println!("{} pressed", name);
            true
        })?;
    }
    println!("Applied {} keys", config.keys.len());

    loop {
        keypad
            .process_events(config.timeout)
            .context("Failed to read key presses")?;
    }
}

fn handle_init(output: &Path) -> Result<()> {
    let config = Config {
        keys: vec![
            KeyConfig {
                key: 0,
                image: Some(PathBuf::from("icons/first.png")),
                label: Some("First".to_string()),
            },
            KeyConfig {
                key: 14,
                image: None,
                label: Some("Last".to_string()),
            },
        ],
        ..Config::default()
    };
    config.save(output)?;
    println!("Profile written to {}", output.display());
    Ok(())
}
