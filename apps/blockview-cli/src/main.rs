use anyhow::{Context, Result};
use blockview_assets::{CuboidMesh, MeshStore};
use blockview_common::{FrameInput, MoveIntent};
use blockview_kernel::{Scene, SceneConfig};
use blockview_render::{DebugTextRenderer, RecordingSink, Renderer};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Aspect ratio used when there is no window to measure.
const HEADLESS_ASPECT: f32 = 800.0 / 600.0;

#[derive(Parser)]
#[command(name = "blockview-cli", about = "Headless tools for the block viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default scene
    Info,
    /// Step the camera headlessly and print its trajectory
    Simulate {
        /// Number of frames to step
        #[arg(short, long, default_value = "10")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.1")]
        dt: f32,
        /// Intent held for every frame (repeatable)
        #[arg(short, long, value_enum)]
        intent: Vec<IntentArg>,
        /// Pointer delta applied every frame, as DX DY
        #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
        look: Option<Vec<f32>>,
        /// Scene config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the trace as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a cuboid vertex buffer as JSON
    Mesh {
        /// Edge length
        #[arg(long, default_value = "1.0")]
        size: f32,
        /// Center, as X Y Z
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        center: Option<Vec<f32>>,
    },
    /// Validate a scene config and describe the scene it builds
    CheckConfig { path: PathBuf },
    /// Print the default scene config as YAML
    DefaultConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IntentArg {
    Forward,
    Backward,
    Left,
    Right,
}

impl From<IntentArg> for MoveIntent {
    fn from(arg: IntentArg) -> Self {
        match arg {
            IntentArg::Forward => MoveIntent::Forward,
            IntentArg::Backward => MoveIntent::Backward,
            IntentArg::Left => MoveIntent::Left,
            IntentArg::Right => MoveIntent::Right,
        }
    }
}

/// Camera state after one simulated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct TraceRow {
    frame: u64,
    position: Vec3,
    velocity: Vec3,
    yaw: f32,
    pitch: f32,
    uploads: usize,
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

/// Run `frames` updates against a recording sink, holding the same input
/// every frame.
fn simulate(
    config: &SceneConfig,
    frames: u32,
    dt: f32,
    input: &FrameInput,
) -> Result<Vec<TraceRow>> {
    let mut scene = Scene::from_config(config, HEADLESS_ASPECT, &mut MeshStore::new())?;
    let mut sink = RecordingSink::new();
    scene.init(&mut sink).context("initial upload")?;

    let mut trace = Vec::with_capacity(frames as usize);
    for _ in 0..frames {
        sink.clear();
        scene.update(dt, input, &mut sink)?;
        scene.render(&mut sink)?;
        let cam = scene.camera();
        trace.push(TraceRow {
            frame: scene.frame(),
            position: cam.position(),
            velocity: cam.velocity(),
            yaw: cam.yaw(),
            pitch: cam.pitch(),
            uploads: sink.uploads().count(),
        });
    }
    Ok(trace)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("blockview-cli v{}", env!("CARGO_PKG_VERSION"));
            let mut meshes = MeshStore::new();
            let scene =
                Scene::from_config(&SceneConfig::default(), HEADLESS_ASPECT, &mut meshes)?;
            println!("default scene: {}", scene.summary());
            println!("shared meshes: {}", meshes.len());
            for id in meshes.ids() {
                if let Some(mesh) = meshes.get(id) {
                    println!("  [{id}] size={} vertices={}", mesh.size(), mesh.vertex_count());
                }
            }
        }
        Commands::Simulate {
            frames,
            dt,
            intent,
            look,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let mut input = FrameInput::new();
            for i in intent {
                input = input.with_intent(i.into());
            }
            if let Some([dx, dy]) = look.as_deref().and_then(|v| <[f32; 2]>::try_from(v).ok()) {
                input = input.with_pointer_delta(dx, dy);
            }
            tracing::debug!(frames, dt, ?input, "simulating");

            let trace = simulate(&config, frames, dt, &input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&trace)?);
            } else {
                for row in &trace {
                    let p = row.position;
                    let v = row.velocity;
                    println!(
                        "frame {:>4}: pos=({:.4}, {:.4}, {:.4}) vel=({:.4}, {:.4}, {:.4}) yaw={:.1} pitch={:.1} uploads={}",
                        row.frame, p.x, p.y, p.z, v.x, v.y, v.z, row.yaw, row.pitch, row.uploads
                    );
                }
            }
        }
        Commands::Mesh { size, center } => {
            let center = center
                .as_deref()
                .and_then(|v| <[f32; 3]>::try_from(v).ok())
                .map(Vec3::from_array)
                .unwrap_or(Vec3::ZERO);
            let mesh = CuboidMesh::new(center, size);
            println!("{}", serde_json::to_string_pretty(&mesh)?);
        }
        Commands::CheckConfig { path } => {
            let config = load_config(Some(&path))?;
            let mut meshes = MeshStore::new();
            let scene = Scene::from_config(&config, HEADLESS_ASPECT, &mut meshes)?;
            println!("{}: OK", path.display());
            println!("{}", scene.summary());
            println!("bindings overridden: {}", config.bindings.len());
            print!("{}", DebugTextRenderer::new().render(&scene));
        }
        Commands::DefaultConfig => {
            print!("{}", SceneConfig::default().to_yaml_string()?);
        }
    }

    Ok(())
}
