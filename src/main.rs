use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emojify::{assets, config, faces, Expression, Pipeline, Signal};
use log::{info, warn};

#[derive(Parser)]
#[command(name = "emojify")]
#[command(version, about = "Cover detected faces with matching emoji overlays")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overlay emoji on every face listed in a face record file
    Apply {
        /// Picture to decorate
        #[arg(short, long)]
        input: PathBuf,
        /// JSON face records produced by a detector
        #[arg(short, long)]
        faces: PathBuf,
        /// Where to write the result
        #[arg(short, long)]
        output: PathBuf,
        /// Overlay directory (overrides config)
        #[arg(short, long)]
        assets: Option<PathBuf>,
        /// Overlay width relative to face width (overrides config)
        #[arg(short, long)]
        scale: Option<f32>,
    },
    /// Print the expression for a set of probabilities
    #[command(allow_negative_numbers = true)]
    Classify {
        smiling: f32,
        left_eye_open: f32,
        right_eye_open: f32,
    },
    /// List which expressions have an overlay
    Assets {
        /// Overlay directory (overrides config)
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },
    /// Open config file in editor
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Apply {
            input,
            faces,
            output,
            assets,
            scale,
        } => {
            let assets_dir = assets.unwrap_or_else(|| cfg.assets_dir.clone());
            apply(
                &cfg,
                &input,
                &faces,
                &output,
                &assets_dir,
                scale.unwrap_or(cfg.scale_factor),
            )
        }
        Commands::Classify {
            smiling,
            left_eye_open,
            right_eye_open,
        } => {
            let expression = cfg
                .thresholds()
                .classify(smiling, left_eye_open, right_eye_open);
            println!("{}", expression);
            Ok(())
        }
        Commands::Assets { assets } => {
            let assets_dir = assets.unwrap_or_else(|| cfg.assets_dir.clone());
            list_assets(&assets_dir)
        }
        Commands::Config => open_config(cli.config.as_deref()),
    }
}

fn apply(
    cfg: &config::Config,
    input: &Path,
    faces_path: &Path,
    output: &Path,
    assets_dir: &Path,
    scale_factor: f32,
) -> Result<()> {
    info!("Loading overlays from {}", assets_dir.display());
    let catalog = assets::load_catalog(assets_dir).context("Failed to load overlays")?;
    if catalog.is_empty() {
        anyhow::bail!("No overlays found in {}", assets_dir.display());
    }

    let picture = image::open(input)
        .with_context(|| format!("Failed to open picture {}", input.display()))?;

    let pipeline = Pipeline::new(catalog)
        .with_thresholds(cfg.thresholds())
        .with_scale_factor(scale_factor);

    let mut detector = faces::FaceFile::new(faces_path);
    let outcome = pipeline
        .detect_and_process(&mut detector, &picture)
        .context("Failed to process picture")?;

    for (i, report) in outcome.faces.iter().enumerate() {
        info!(
            "Face {}: {} at ({:.0}, {:.0}) {:.0}x{:.0}",
            i + 1,
            report.expression,
            report.face.position.0,
            report.face.position.1,
            report.face.width,
            report.face.height
        );
    }

    for signal in &outcome.signals {
        match signal {
            Signal::NoFacesDetected => warn!("No faces detected"),
            Signal::NoOverlayForCategory { face, expression } => {
                warn!("Face {}: no emoji for {}", face + 1, expression)
            }
            Signal::CompositeFailed { face, error } => {
                warn!("Face {}: could not draw emoji: {}", face + 1, error)
            }
        }
    }

    outcome
        .image
        .save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    info!(
        "✓ {} of {} face(s) emojified, saved to {}",
        outcome.applied(),
        outcome.faces.len(),
        output.display()
    );
    Ok(())
}

fn list_assets(assets_dir: &Path) -> Result<()> {
    let catalog = assets::load_catalog(assets_dir).context("Failed to load overlays")?;

    for expression in Expression::CONCRETE {
        let file = assets::asset_file_name(expression).unwrap_or("-");
        match catalog.get(expression) {
            Some(img) => println!(
                "{:<22} {:<20} {}x{}",
                expression,
                file,
                img.width(),
                img.height()
            ),
            None => println!("{:<22} {:<20} missing", expression, file),
        }
    }

    info!(
        "{} of {} overlays available in {}",
        catalog.len(),
        Expression::CONCRETE.len(),
        assets_dir.display()
    );

    let missing = catalog.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|e| e.name()).collect();
        warn!("Faces classified as {} will be left bare", names.join(", "));
    }
    Ok(())
}

fn open_config(path: Option<&Path>) -> Result<()> {
    let config_path = path.unwrap_or(&config::CONFIG_PATH);
    if !config_path.exists() {
        config::save_config(&config::Config::default(), Some(config_path))
            .context("Failed to write default config")?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
