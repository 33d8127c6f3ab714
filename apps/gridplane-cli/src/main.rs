use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gridplane_kernel::{ParameterUpdate, PlaneConfig, PlaneGeometry, Scene};
use gridplane_persist::SceneSnapshot;
use gridplane_tools::MeshInspector;

#[derive(Parser)]
#[command(name = "gridplane-cli", about = "Build and inspect LOD-scaled grid planes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Plane configuration: an optional file, overridden by individual flags.
#[derive(Args)]
struct PlaneArgs {
    /// JSON or YAML plane config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Plane width
    #[arg(long, allow_negative_numbers = true)]
    x_size: Option<f32>,
    /// Plane height
    #[arg(long, allow_negative_numbers = true)]
    y_size: Option<f32>,
    /// Horizontal segments at full detail
    #[arg(long, allow_negative_numbers = true)]
    x_segments: Option<i32>,
    /// Vertical segments at full detail
    #[arg(long, allow_negative_numbers = true)]
    y_segments: Option<i32>,
    /// Level of detail in [0, 1]
    #[arg(long, allow_negative_numbers = true)]
    lod: Option<f64>,
}

impl PlaneArgs {
    fn to_config(&self) -> anyhow::Result<PlaneConfig> {
        let mut config = match &self.config {
            Some(path) => PlaneConfig::load(path)
                .with_context(|| format!("loading plane config {}", path.display()))?,
            None => PlaneConfig::default(),
        };
        config.x_size = self.x_size.or(config.x_size);
        config.y_size = self.y_size.or(config.y_size);
        config.x_segments = self.x_segments.or(config.x_segments);
        config.y_segments = self.y_segments.or(config.y_segments);
        config.lod = self.lod.or(config.lod);
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Build one plane and print its summary
    Build {
        #[command(flatten)]
        plane: PlaneArgs,
        /// Print the full buffers as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show effective grid and buffer sizes across the LOD range
    Sweep {
        #[command(flatten)]
        plane: PlaneArgs,
        /// Number of LOD steps between 0 and 1
        #[arg(short, long, default_value = "4")]
        steps: u32,
    },
    /// Apply parameter updates within one tick and report what happened
    Edit {
        #[command(flatten)]
        plane: PlaneArgs,
        /// Update as name=value, e.g. xSize=-3 or lod=1.5 (repeatable)
        #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
        updates: Vec<ParameterUpdate>,
    },
    /// Capture a scene snapshot of one plane
    Snapshot {
        #[command(flatten)]
        plane: PlaneArgs,
        /// Write the snapshot to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("gridplane-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("mesh: {}", gridplane_mesh::crate_info());
            println!("kernel: {}", gridplane_kernel::crate_info());
            println!("persist: {}", gridplane_persist::crate_info());
            println!("tools: {}", gridplane_tools::crate_info());
        }
        Commands::Build { plane, json } => {
            let plane = PlaneGeometry::new(&plane.to_config()?);
            if json {
                println!("{}", serde_json::to_string(plane.mesh())?);
            } else {
                println!("{}", MeshInspector::plane(&plane));
            }
        }
        Commands::Sweep { plane, steps } => {
            let mut plane = PlaneGeometry::new(&plane.to_config()?);
            let steps = steps.max(1);
            println!("LOD sweep over {steps} steps");
            for step in 0..=steps {
                let lod = f64::from(step) / f64::from(steps);
                plane.set_lod(lod);
                plane.rebuild_if_dirty();
                let grid = plane.effective_grid();
                let mesh = MeshInspector::summary(plane.mesh());
                println!(
                    "  lod={lod:.3} grid={}x{} vertices={} triangles={} indices={}",
                    grid.grid_x,
                    grid.grid_y,
                    mesh.vertex_count,
                    mesh.triangle_count,
                    mesh.index_format
                );
            }
        }
        Commands::Edit { plane, updates } => {
            let mut scene = Scene::new();
            let id = scene.spawn(&plane.to_config()?);

            tracing::info!(updates = updates.len(), "applying updates");
            scene.update_all(id, updates)?;
            for (_, change) in scene.drain_changes() {
                println!("changed: {change}");
            }
            for (_, warning) in scene.drain_warnings() {
                println!("corrected: {warning}");
            }
            println!("pending rebuilds before tick: {}", scene.pending_rebuilds());

            let stats = scene.tick();
            println!(
                "tick {}: scheduled={} rebuilt={} in {:?}",
                stats.tick, stats.scheduled, stats.rebuilt, stats.elapsed
            );
            if let Some(summary) = MeshInspector::inspect_plane(&scene, id) {
                println!("{summary}");
            }
        }
        Commands::Snapshot { plane, out } => {
            let mut scene = Scene::new();
            scene.spawn(&plane.to_config()?);
            let snap = SceneSnapshot::capture(&scene);
            match out {
                Some(path) => {
                    snap.save(&path)
                        .with_context(|| format!("writing snapshot {}", path.display()))?;
                    println!(
                        "Snapshot: planes={} sha256={} -> {}",
                        snap.planes.len(),
                        snap.sha256,
                        path.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&snap)?),
            }
        }
    }

    Ok(())
}
