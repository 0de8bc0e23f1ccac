// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the cardify binary.
//!
//! Every subcommand loads repository data and an optional preset, applies
//! one layout operation and prints the resulting preset, rectangles or SVG.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use cardify::{
    AlignAction, BlockId, CardConfig, DistributeAxis, EditorEvent, EditorState, Error, Labels, Rect,
    RepoData, RepoReference, align_selected_blocks, apply_rect_to_config, distribute_selected_blocks,
    interactive_rects, io_error, load_preset, load_repository, render_svg, save_preset, write_preset,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for editing repository social cards.
#[derive(Debug, Parser,)]
#[command(name = "cardify", version, about = "Lay out and render repository social cards")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Render the card as SVG.
    Render(RenderArgs,),
    /// Print the interactive rectangle of every block.
    Rects(RectsArgs,),
    /// Resize or move one block to a requested rectangle.
    Resize(ResizeArgs,),
    /// Align the given blocks.
    Align(AlignArgs,),
    /// Distribute the given blocks evenly.
    Distribute(DistributeArgs,),
    /// Apply a JSON array of editor events.
    Replay(ReplayArgs,),
    /// Sanitize a preset file.
    Sanitize(SanitizeArgs,),
    /// Resolve `owner/repo` or a GitHub URL.
    Reference(ReferenceArgs,),
}

#[derive(Debug, Args,)]
struct CardArgs
{
    /// Repository data file (JSON or YAML).
    #[arg(long = "repo", value_name = "PATH")]
    repo:   PathBuf,

    /// Preset to start from; defaults are seeded from the repository.
    #[arg(long = "preset", value_name = "PATH")]
    preset: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
struct OutputArgs
{
    /// Write to this file instead of stdout.
    #[arg(long = "out", value_name = "PATH")]
    out:    Option<PathBuf,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct RenderArgs
{
    #[command(flatten)]
    card: CardArgs,

    /// Write the SVG to this file instead of stdout.
    #[arg(long = "out", value_name = "PATH")]
    out: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
struct RectsArgs
{
    #[command(flatten)]
    card: CardArgs,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct ResizeArgs
{
    #[command(flatten)]
    card:   CardArgs,

    /// Block to change.
    #[arg(long = "block", value_name = "BLOCK")]
    block:  BlockId,

    /// Requested rectangle as `x,y,w,h`.
    #[arg(long = "rect", value_name = "X,Y,W,H", value_parser = parse_rect, allow_hyphen_values = true)]
    rect:   Rect,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args,)]
struct AlignArgs
{
    #[command(flatten)]
    card:   CardArgs,

    /// Comma separated blocks to align.
    #[arg(long = "blocks", value_name = "BLOCKS", value_delimiter = ',', required = true)]
    blocks: Vec<BlockId,>,

    /// One of left, center, right, top, middle, bottom.
    #[arg(long = "action", value_name = "ACTION")]
    action: AlignAction,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args,)]
struct DistributeArgs
{
    #[command(flatten)]
    card:   CardArgs,

    /// Comma separated blocks to distribute.
    #[arg(long = "blocks", value_name = "BLOCKS", value_delimiter = ',', required = true)]
    blocks: Vec<BlockId,>,

    /// Either horizontal or vertical.
    #[arg(long = "axis", value_name = "AXIS")]
    axis:   DistributeAxis,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args,)]
struct ReplayArgs
{
    #[command(flatten)]
    card:   CardArgs,

    /// JSON file holding an array of editor events.
    #[arg(long = "events", value_name = "PATH")]
    events: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args,)]
struct SanitizeArgs
{
    /// Preset file to sanitize (JSON or YAML).
    #[arg(long = "preset", value_name = "PATH")]
    preset: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args,)]
struct ReferenceArgs
{
    /// `owner/repo` or a repository URL.
    #[arg(value_name = "REPOSITORY")]
    input: String,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();
    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, `warn` by default.
fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn",),);
    let _ = tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).try_init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates loading, transform and serialization errors.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    execute(cli.command, &mut handle,)
}

fn execute<W: io::Write,>(command: Command, writer: &mut W,) -> Result<(), Error,>
{
    match command {
        Command::Render(args,) => {
            let (repo, config,) = load_card(&args.card,)?;
            let svg = render_svg(&repo, &config, &Labels::default(),);
            match args.out {
                Some(path,) => {
                    fs::write(&path, svg,).map_err(|source| io_error(&path, source,),)?;
                    info!("Card written to {}", path.display());
                    Ok((),)
                }
                None => write_text(writer, &svg,),
            }
        }
        Command::Rects(args,) => {
            let (repo, config,) = load_card(&args.card,)?;
            let rects = interactive_rects(&config, &repo,);
            if args.pretty {
                serde_json::to_writer_pretty(&mut *writer, &rects,)?;
            } else {
                serde_json::to_writer(&mut *writer, &rects,)?;
            }
            write_text(writer, "\n",)
        }
        Command::Resize(args,) => {
            let (repo, config,) = load_card(&args.card,)?;
            let next = apply_rect_to_config(&config, &repo, args.block, args.rect,);
            emit_config(writer, &next, &args.output,)
        }
        Command::Align(args,) => {
            let (repo, config,) = load_card(&args.card,)?;
            let rects = interactive_rects(&config, &repo,);
            let next = align_selected_blocks(&config, &args.blocks, &rects, args.action,);
            emit_config(writer, &next, &args.output,)
        }
        Command::Distribute(args,) => {
            let (repo, config,) = load_card(&args.card,)?;
            let rects = interactive_rects(&config, &repo,);
            let next = distribute_selected_blocks(&config, &args.blocks, &rects, args.axis,);
            emit_config(writer, &next, &args.output,)
        }
        Command::Replay(args,) => {
            let (repo, config,) = load_card(&args.card,)?;
            let events = load_events(&args.events,)?;
            let state =
                events.iter().fold(EditorState::new(config, repo,), |state, event| state.reduce(event,),);
            info!("Replayed {} editor events", events.len());
            emit_config(writer, state.config(), &args.output,)
        }
        Command::Sanitize(args,) => {
            let config = load_preset(&args.preset,)?;
            emit_config(writer, &config, &args.output,)
        }
        Command::Reference(args,) => {
            let reference = RepoReference::parse(&args.input,)?;
            serde_json::to_writer(&mut *writer, &reference,)?;
            write_text(writer, "\n",)
        }
    }
}

/// Loads the repository and the starting configuration.
fn load_card(args: &CardArgs,) -> Result<(RepoData, CardConfig,), Error,>
{
    let repo = load_repository(&args.repo,)?;
    let config = match &args.preset {
        Some(path,) => load_preset(path,)?,
        None => CardConfig::default().reseeded(&repo, &Labels::default().no_description,),
    };
    Ok((repo, config,),)
}

fn load_events(path: &Path,) -> Result<Vec<EditorEvent,>, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| io_error(path, source,),)?;
    Ok(serde_json::from_str(&contents,)?,)
}

fn emit_config<W: io::Write,>(writer: &mut W, config: &CardConfig, output: &OutputArgs,) -> Result<(), Error,>
{
    match &output.out {
        Some(path,) => save_preset(path, config,),
        None => {
            write_preset(&mut *writer, config, output.pretty,)?;
            write_text(writer, "\n",)
        }
    }
}

fn write_text<W: io::Write,>(writer: &mut W, text: &str,) -> Result<(), Error,>
{
    writer.write_all(text.as_bytes(),).map_err(|source| io_error(Path::new("<stdout>",), source,),)
}

/// Parses `x,y,w,h` into a rectangle.
fn parse_rect(value: &str,) -> Result<Rect, Error,>
{
    let parts = value
        .split(',',)
        .map(|part| part.trim().parse::<f64>(),)
        .collect::<Result<Vec<f64,>, _,>>()
        .map_err(|error| Error::validation(format!("invalid rectangle '{value}': {error}"),),)?;

    match parts.as_slice() {
        [x, y, w, h,] => Ok(Rect::new(*x, *y, *w, *h,),),
        _ => Err(Error::validation(format!("invalid rectangle '{value}', expected x,y,w,h"),),),
    }
}
