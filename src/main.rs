use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use photo_annotator::Config;
use photo_annotator::draw::CompositionEngine;
use photo_annotator::editor::{
    CanvasSize, EditScript, EditorController, EditorDocument, FileImagePicker, ImagePicker,
    StrokeCanvas,
};
use photo_annotator::export::{FileExportSink, SaveLocation};
use photo_annotator::session::{SessionStore, options_from_config};
use std::path::PathBuf;
use std::sync::Arc;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PHOTO_ANNOTATOR_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "photo-annotator")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Photo annotation editor with freehand ink and text overlays"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a photo from an edit script and export the flattened PNG
    Render {
        /// Photo to annotate (PNG, JPEG, WebP, GIF, BMP)
        #[arg(long, value_name = "PATH")]
        image: PathBuf,

        /// TOML edit script with [[step]] entries
        #[arg(long, value_name = "PATH")]
        script: Option<PathBuf>,

        /// Output file (defaults to the configured export directory)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// Canvas size; defaults to the photo's own size
        #[arg(long, value_name = "WxH", value_parser = parse_canvas_size)]
        canvas: Option<CanvasSize>,
    },

    /// Show or clear the persisted sign-in session
    Session {
        /// Remove the session file
        #[arg(long)]
        clear: bool,
    },

    /// Write a documented config file to ~/.config/photo-annotator/config.toml
    InitConfig,
}

fn parse_canvas_size(raw: &str) -> Result<CanvasSize, String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{raw}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    let size = CanvasSize::new(width, height);
    if size.is_empty() {
        return Err("canvas dimensions must be non-zero".to_string());
    }
    Ok(size)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Render {
            image,
            script,
            output,
            canvas,
        }) => run_render(image, script, output, canvas),
        Some(Command::Session { clear }) => run_session(clear),
        Some(Command::InitConfig) => run_init_config(),
        None => {
            println!("photo-annotator: Photo annotation editor with freehand ink and text overlays");
            println!();
            println!("Usage:");
            println!("  photo-annotator render --image <PATH> [--script <PATH>] [--output <PATH>]");
            println!("  photo-annotator session [--clear]");
            println!("  photo-annotator init-config");
            println!("  photo-annotator --help");
            Ok(())
        }
    }
}

fn run_render(
    image: PathBuf,
    script: Option<PathBuf>,
    output: Option<PathBuf>,
    canvas: Option<CanvasSize>,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    let script = script
        .map(|path| {
            EditScript::load(&path)
                .with_context(|| format!("Failed to load edit script {}", path.display()))
        })
        .transpose()?
        .unwrap_or_default();

    let bytes = FileImagePicker::new(Some(image.clone()))
        .pick_image()
        .ok_or_else(|| anyhow!("Could not read image {}", image.display()))?;

    let sink = match output {
        Some(path) => FileExportSink::Path(path),
        None => FileExportSink::Directory(SaveLocation::from_config(&config.export)),
    };
    let document = EditorDocument::with_text_color(config.drawing.default_text_color.to_color());
    let ink = StrokeCanvas::new(config.ink.default_color.to_color(), config.ink.thickness);
    let mut controller = EditorController::with_exporter(
        document,
        ink,
        CompositionEngine::from_config(&config),
        Arc::new(sink),
    );

    if !controller.image_picked(bytes) {
        let message = controller.take_message().unwrap_or_default();
        bail!("{}: {}", message, image.display());
    }
    if let Some(size) = canvas {
        controller.canvas_laid_out(size);
    }

    script.replay(&mut controller)?;
    log::info!(
        "Replayed {} step(s), {} overlay(s)",
        script.steps.len(),
        controller.document().overlays().len()
    );

    let saved = controller.save().map(|result| result.saved_path.clone());
    match saved {
        Some(path) => {
            println!("Saved annotated image to {}", path.display());
            Ok(())
        }
        None => Err(anyhow!(
            "Export failed: {}",
            controller.message().unwrap_or("unknown error")
        )),
    }
}

fn run_session(clear: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let options = options_from_config(&config.session, &Config::config_dir()?)?;
    let store = SessionStore::new(options);

    if clear {
        let outcome = store.clear()?;
        if outcome.removed_session || outcome.removed_lock {
            println!("Cleared session data in {}", store.options().base_dir.display());
        } else {
            println!("No session data to clear");
        }
        return Ok(());
    }

    let inspection = store.inspect()?;
    println!("Session file: {}", inspection.session_path.display());
    if !inspection.exists {
        println!("  (not present, signed out)");
        return Ok(());
    }
    println!("  Signed in: {}", if inspection.signed_in { "yes" } else { "no" });
    if let Some(size) = inspection.size_bytes {
        println!("  Size: {} bytes", size);
    }
    if let Some(last_modified) = inspection.last_modified {
        println!("  Last modified: {}", last_modified);
    }
    Ok(())
}

fn run_init_config() -> anyhow::Result<()> {
    let path = Config::get_config_path()?;
    Config::create_default_file(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
