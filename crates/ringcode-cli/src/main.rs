//! ringcode CLI — encode text into ring code images and decode captures.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ringcode::{
    decode, encode, max_payload_bytes, render_raster, render_svg, DecodeConfig, EccLevel,
    LayoutSummary, SearchOutcome, Style, STYLES,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ringcode")]
#[command(about = "Encode short text as a circular ring-code image, and decode captures of one")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text into a ring code image.
    Encode(CliEncodeArgs),

    /// Decode a ring code from an image file.
    Decode(CliDecodeArgs),

    /// Print capacity and layout information.
    Info,

    /// List the available render styles.
    Styles,
}

#[derive(Debug, Clone, Args)]
struct CliEncodeArgs {
    /// Text to encode.
    #[arg(long)]
    text: String,

    /// Path to write the raster image (PNG).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write vector markup (SVG).
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Redundancy level (0..=3; higher corrects more, holds less).
    #[arg(long, default_value = "1")]
    level: u8,

    /// Canvas size in pixels.
    #[arg(long, default_value = "512")]
    size: u32,

    /// Render style key (see `ringcode styles`).
    #[arg(long, default_value = "classic")]
    style: String,
}

#[derive(Debug, Clone, Args)]
struct CliDecodeArgs {
    /// Path to the captured image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the decode result (JSON).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Cap on evaluated hypotheses (full sweep when omitted).
    #[arg(long)]
    max_hypotheses: Option<usize>,

    /// Disable the parallel sweep.
    #[arg(long)]
    sequential: bool,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode(args) => run_encode(&args),
        Commands::Decode(args) => run_decode(&args),
        Commands::Info => run_info(),
        Commands::Styles => run_styles(),
    }
}

// ── encode ─────────────────────────────────────────────────────────────

fn run_encode(args: &CliEncodeArgs) -> CliResult<()> {
    let level = EccLevel::from_byte(args.level)
        .ok_or_else(|| -> CliError { format!("invalid ecc level {} (0..=3)", args.level).into() })?;
    let style = Style::by_key(&args.style).ok_or_else(|| -> CliError {
        format!("unknown style '{}' (see `ringcode styles`)", args.style).into()
    })?;
    if args.out.is_none() && args.svg.is_none() {
        return Err("nothing to do: pass --out and/or --svg".into());
    }

    let bits = encode(args.text.as_bytes(), level)?;
    tracing::info!(
        "Encoded {} of {} payload bytes at level {}",
        args.text.len(),
        max_payload_bytes(level),
        level,
    );

    if let Some(path) = &args.out {
        let img = render_raster(&bits, args.size, style);
        img.save(path)?;
        tracing::info!("Raster written to {}", path.display());
    }

    if let Some(path) = &args.svg {
        let markup = render_svg(&bits, args.size, style);
        std::fs::write(path, markup)?;
        tracing::info!("SVG written to {}", path.display());
    }

    Ok(())
}

// ── decode ─────────────────────────────────────────────────────────────

fn run_decode(args: &CliDecodeArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());

    let img = image::open(&args.image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", args.image.display(), e).into()
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let config = DecodeConfig {
        max_hypotheses: args.max_hypotheses,
        parallel: !args.sequential,
    };

    let progress = |variant: usize, total: usize| {
        tracing::info!("Scanning variant {}/{}", variant + 1, total);
    };

    let outcome = decode(rgba.as_raw(), w, h, &config, Some(&progress))?;

    match &outcome {
        SearchOutcome::Decoded(r) => {
            tracing::info!(
                "Decoded via {:?} ({} corrected symbols)",
                r.hypothesis.variant,
                r.corrected_symbols
            );
            println!("{}", r.text);
        }
        SearchOutcome::Exhausted { hypotheses_tried } => {
            tracing::warn!("No valid frame after {} hypotheses", hypotheses_tried);
        }
    }

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, &json)?;
        tracing::info!("Result written to {}", path.display());
    }

    if matches!(outcome, SearchOutcome::Exhausted { .. }) {
        return Err("search exhausted with no valid frame".into());
    }
    Ok(())
}

// ── info ───────────────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct LevelInfo {
    level: u8,
    parity_bytes: usize,
    correctable_symbols: usize,
    max_payload_bytes: usize,
}

#[derive(serde::Serialize)]
struct Info {
    layout: LayoutSummary,
    levels: Vec<LevelInfo>,
}

fn run_info() -> CliResult<()> {
    let info = Info {
        layout: LayoutSummary::new(),
        levels: EccLevel::ALL
            .iter()
            .map(|&level| LevelInfo {
                level: level.as_byte(),
                parity_bytes: level.parity_bytes(),
                correctable_symbols: level.correctable_symbols(),
                max_payload_bytes: max_payload_bytes(level),
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn run_styles() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&STYLES)?);
    Ok(())
}
