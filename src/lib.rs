//! Boxscope: a multi-format bounding-box annotation toolkit.
//!
//! Boxscope reads object-detection annotation files in several common
//! formats (COCO, COCO-Text, Pascal VOC, YOLO, plain JSON), normalizes
//! them into one box model, groups them per image, and writes them back
//! out as COCO-Text. The [`session`] module adds the interactive layer:
//! image/annotation pairing, selection, zoom mapping and box editing.
//!
//! # Modules
//!
//! - [`model`]: Normalized box, image and format types
//! - [`formats`]: Per-format readers and format detection
//! - [`grouping`]: Per-image bucketing of boxes
//! - [`viewport`]: Zoom state and screen-to-natural coordinate mapping
//! - [`editor`]: Drag/resize gesture state machine
//! - [`export`]: COCO-Text export serializer
//! - [`resolve`]: Relative image path resolution
//! - [`session`]: State container tying the above together
//! - [`error`]: Error types for boxscope operations

pub mod editor;
pub mod error;
pub mod export;
pub mod formats;
pub mod grouping;
pub mod model;
pub mod resolve;
pub mod session;
pub mod viewport;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use error::BoxscopeError;

use session::Session;

/// The boxscope CLI application.
#[derive(Parser)]
#[command(name = "boxscope")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse an annotation file and report its contents.
    Inspect(InspectArgs),
    /// Convert an annotation file to COCO-Text JSON.
    Export(ExportArgs),
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Annotation file to inspect (.json, .xml or .txt).
    input: PathBuf,

    /// Image file the annotations belong to; enables YOLO denormalization
    /// and filename-matching checks.
    #[arg(long)]
    image: Option<PathBuf>,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Annotation file to convert.
    input: PathBuf,

    /// Image file the exported document describes.
    #[arg(long)]
    image: PathBuf,

    /// Output path; defaults to '<image stem>_coco-text.json' next to
    /// the input.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Run the boxscope CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxscopeError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Export(args)) => run_export(args),
        None => {
            println!("boxscope {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Multi-format bounding-box annotation toolkit.");
            println!();
            println!("Run 'boxscope --help' for usage information.");
            Ok(())
        }
    }
}

fn load_session(input: &Path, image: Option<&Path>) -> Result<Session, BoxscopeError> {
    let mut session = Session::new();
    if let Some(image) = image {
        session.load_image(image)?;
    }

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string_lossy().to_string());
    let raw_text = fs::read_to_string(input)?;
    session.load_annotation(&file_name, &raw_text)?;
    Ok(session)
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), BoxscopeError> {
    let session = load_session(&args.input, args.image.as_deref())?;

    let Some(annotation) = session.annotation() else {
        return Ok(());
    };

    println!("file:   {}", annotation.file_name);
    println!("format: {}", annotation.format_label());
    if let Some(warning) = annotation.warning.as_deref() {
        println!("warning: {}", warning);
    }
    if let Some(mismatch) = session.mismatch() {
        println!("note:   {}", mismatch);
    }

    if annotation.images.is_empty() {
        println!("boxes:  {}", session.active_boxes().len());
    } else {
        println!("images: {}", annotation.images.len());
        for image in &annotation.images {
            let marker = if session.selected_image_id() == Some(image.id) {
                "*"
            } else {
                " "
            };
            println!(
                "  {} [{}] {} ({} boxes)",
                marker,
                image.id,
                image.file_name,
                session.box_count(image.id)
            );
        }
    }

    for bx in session.active_boxes() {
        let label = bx.label.as_deref().unwrap_or("-");
        println!(
            "  #{:<6} {:>8.1} {:>8.1} {:>8.1} {:>8.1}  {}",
            bx.id, bx.x, bx.y, bx.width, bx.height, label
        );
    }

    Ok(())
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), BoxscopeError> {
    let session = load_session(&args.input, Some(&args.image))?;

    let document = session
        .export_document()
        .ok_or(BoxscopeError::NothingToExport)?;

    let output = match args.output {
        Some(path) => path,
        None => {
            let name = session
                .export_file_name()
                .ok_or(BoxscopeError::NothingToExport)?;
            args.input.with_file_name(name)
        }
    };

    fs::write(&output, document)?;
    println!("wrote {}", output.display());
    Ok(())
}
