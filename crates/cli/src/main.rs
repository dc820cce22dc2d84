#![deny(unsafe_code)]
//! CLI binary for the algo-art generative art system.
//!
//! Subcommands:
//! - `render <algorithm>`: render one frame and write a PNG
//! - `list`: print available algorithms and palettes
//! - `schema <algorithm>`: print an algorithm's parameter schema

mod error;

use algo_art_core::palette::PALETTES;
use algo_art_core::params::ParamKind;
use algo_art_core::{RenderConfig, Renderer, RngKind, Theme};
use algo_art_engines::AlgorithmKind;
use clap::{Args, Parser, Subcommand};
use error::CliError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_WIDTH: usize = 800;
const DEFAULT_HEIGHT: usize = 600;
const DEFAULT_SEED: i64 = 42;
const DEFAULT_PALETTE: &str = "sunset";

#[derive(Parser)]
#[command(name = "algo-art", about = "Procedural 2-D art generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one frame and write it as a PNG.
    Render(RenderArgs),
    /// List available algorithms and palettes.
    List,
    /// Print the parameter schema of an algorithm.
    Schema {
        /// Algorithm id (e.g. "fractal").
        algorithm: String,
    },
}

/// Flags of `render`. Anything left unset comes from `--config`, or from the
/// built-in defaults when no config file is given.
#[derive(Args, Default)]
struct RenderArgs {
    /// Algorithm id: perlin, cellular, fractal, voronoi, mondrian, bubble.
    algorithm: Option<String>,

    /// Canvas width in pixels [default: 800].
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Canvas height in pixels [default: 600].
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Seed for deterministic output [default: 42].
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Palette id (sunset, forest, neon, monochrome, retro, pastel).
    #[arg(short, long)]
    palette: Option<String>,

    /// Background theme: light or dark.
    #[arg(long)]
    theme: Option<String>,

    /// Random generator: sine or xorshift.
    #[arg(long)]
    rng: Option<String>,

    /// Algorithm parameters as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// Reject parameters that are out of range instead of clamping them.
    #[arg(long)]
    strict: bool,

    /// Output file, or `-` for stdout [default: algorithmic-art-<algorithm>-<seed>.png].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Load a render configuration (JSON) to start from.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Resolves the flags into a full config, on top of `--config` if given.
    fn to_config(&self) -> Result<RenderConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
                serde_json::from_str::<RenderConfig>(&text).map_err(|e| {
                    CliError::Input(format!("invalid config {}: {e}", path.display()))
                })?
            }
            None => {
                let algorithm = self.algorithm.as_deref().ok_or_else(|| {
                    CliError::Input("an algorithm id or --config is required".into())
                })?;
                RenderConfig::new(
                    algorithm,
                    DEFAULT_WIDTH,
                    DEFAULT_HEIGHT,
                    DEFAULT_PALETTE,
                    DEFAULT_SEED,
                )
            }
        };

        if let Some(algorithm) = &self.algorithm {
            config.algorithm.clone_from(algorithm);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(palette) = &self.palette {
            config.palette.clone_from(palette);
        }
        if let Some(theme) = &self.theme {
            config.theme = Theme::from_name(theme)
                .ok_or_else(|| CliError::Input(format!("unknown theme: {theme}")))?;
        }
        if let Some(rng) = &self.rng {
            config.rng = RngKind::from_name(rng)
                .ok_or_else(|| CliError::Input(format!("unknown rng: {rng}")))?;
        }
        if let Some(params) = &self.params {
            config.params = serde_json::from_str(params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let algorithms = AlgorithmKind::list_algorithms();
            if cli.json {
                let info = serde_json::json!({
                    "algorithms": algorithms
                        .iter()
                        .map(|a| serde_json::json!({"id": a.id, "name": a.name}))
                        .collect::<Vec<_>>(),
                    "palettes": PALETTES,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Algorithms:");
                for a in algorithms {
                    println!("  {:<10} {}", a.id, a.name);
                }
                println!("Palettes:");
                for p in PALETTES {
                    println!("  {:<10} {:<11} {}", p.id, p.name, p.colors.join(" "));
                }
            }
        }
        Command::Schema { algorithm } => {
            let schema = AlgorithmKind::schema_for(&algorithm)?;
            if cli.json {
                let info = serde_json::json!({
                    "algorithm": schema.algorithm,
                    "params": schema.to_json(),
                    "defaults": schema.defaults(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}:", schema.algorithm);
                let defaults = schema.defaults();
                for spec in schema.params {
                    let default = defaults[spec.key].to_string();
                    let kind = spec.kind.as_str();
                    if spec.kind == ParamKind::Rule {
                        println!("  {:<16} {kind:<7} {default:<8} {}", spec.key, spec.description);
                    } else {
                        println!(
                            "  {:<16} {kind:<7} {default:<8} [{}, {}] {}",
                            spec.key, spec.min, spec.max, spec.description
                        );
                    }
                }
            }
        }
        Command::Render(args) => {
            let config = args.to_config()?;
            if args.strict {
                AlgorithmKind::schema_for(&config.algorithm)?.validate(&config.params)?;
            }

            let raster = algo_art_engines::render_raster(&config)?;
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(config.export_file_name()));
            let to_stdout = output == Path::new("-");
            if to_stdout {
                let bytes = algo_art_engines::snapshot::encode_png(&raster)?;
                std::io::stdout()
                    .lock()
                    .write_all(&bytes)
                    .map_err(|e| CliError::Io(format!("stdout: {e}")))?;
            } else {
                algo_art_engines::snapshot::write_png(&raster, &output)?;
            }

            if cli.json {
                let effective = AlgorithmKind::from_name(&config.algorithm, &config.params)?;
                let info = serde_json::json!({
                    "config": config,
                    "effective_params": effective.params(),
                    "output": output.display().to_string(),
                });
                let text = serde_json::to_string_pretty(&info)?;
                // stdout carries the image itself
                if to_stdout {
                    eprintln!("{text}");
                } else {
                    println!("{text}");
                }
            } else {
                eprintln!(
                    "rendered {} ({}x{}, palette {}, seed {}) -> {}",
                    config.algorithm,
                    config.width,
                    config.height,
                    config.palette,
                    config.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
