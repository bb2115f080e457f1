// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use quickshot::app::{AppModel, Flags};
use quickshot::backends::camera::Facing;
use quickshot::constants::ui;
use quickshot::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "quickshot")]
#[command(about = "Point-and-shoot camera for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List {
        /// Print the camera list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take a photo
    Photo {
        /// Camera direction: back or front
        #[arg(short, long, default_value = "back")]
        facing: Facing,

        /// Output file or directory (default: print the URI of the cached capture)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG controls the level, e.g. RUST_LOG=quickshot=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { json }) => cli::list_cameras(json),
        Some(Commands::Photo { facing, output }) => cli::take_photo(facing, output),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    cosmic::app::run::<AppModel>(settings, Flags::default())?;

    Ok(())
}
