use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "isovox", version, about = "Convert a MagicaVoxel scene into isometric sprites")]
struct Cli {
    /// Input `.vox` file. Defaults to the first `*.vox` in the working directory.
    vox: Option<PathBuf>,

    /// Property origin tile, X.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_tile_x: i32,

    /// Property origin tile, Z.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_tile_z: i32,

    /// Only build structure meshes and render the whole scene once.
    #[arg(long)]
    scene_test_run: bool,

    /// Render with the full sample count.
    #[arg(long)]
    full_samples: bool,

    /// Render supersampled and crop with the strict alpha threshold.
    #[arg(long)]
    full_resolution: bool,

    /// Drop frame-edge -Z faces below the ground plane.
    #[arg(long)]
    cull_ground_faces: bool,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Blender executable.
    #[arg(long)]
    blender: Option<PathBuf>,

    /// Blender-side render script.
    #[arg(long)]
    script: Option<PathBuf>,

    /// JSON file overriding numeric constants.
    #[arg(long)]
    constants: Option<PathBuf>,

    /// More log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl Cli {
    fn log_level(&self) -> tracing::Level {
        match (self.verbose, self.quiet) {
            (0, 0) => tracing::Level::INFO,
            (1, _) => tracing::Level::DEBUG,
            (v, _) if v > 1 => tracing::Level::TRACE,
            (_, 1) => tracing::Level::WARN,
            _ => tracing::Level::ERROR,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let cfg = run_config(cli)?;
    let report = isovox::run(&cfg)?;

    if report.images.is_empty() {
        eprintln!(
            "rendered scene of {} structure(s) into {}",
            report.structures,
            cfg.output_dir.display()
        );
    } else {
        eprintln!(
            "wrote {} image(s) to {}",
            report.images.len(),
            cfg.layout().images.display()
        );
    }
    Ok(())
}

fn run_config(cli: Cli) -> anyhow::Result<isovox::RunConfig> {
    let vox_path = match cli.vox {
        Some(p) => p,
        None => {
            let cwd = std::env::current_dir().context("resolve working directory")?;
            isovox::find_default_vox(&cwd)?
        }
    };
    let constants = match &cli.constants {
        Some(p) => read_constants(p)?,
        None => isovox::Constants::default(),
    };

    Ok(isovox::RunConfig {
        vox_path,
        min_tile_x: cli.min_tile_x,
        min_tile_z: cli.min_tile_z,
        scene_test_run: cli.scene_test_run,
        full_samples: cli.full_samples,
        full_resolution: cli.full_resolution,
        cull_ground_faces: cli.cull_ground_faces,
        threads: cli.threads,
        output_dir: cli.output,
        renderer: isovox::RendererConfig {
            executable: cli.blender,
            script: cli.script,
        },
        constants,
    })
}

fn read_constants(path: &Path) -> anyhow::Result<isovox::Constants> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read constants '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse constants '{}'", path.display()))
}
