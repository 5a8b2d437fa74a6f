use blockfield_common::{EngineConfig, TerrainConfig, Viewport};
use blockfield_input::InputState;
use blockfield_render::{HeadlessBackend, RenderSettings, Renderer};
use blockfield_terrain::{Heightmap, NoiseHeightmap, build_chunk_with};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockfield-cli", about = "Headless tooling for the blockfield renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Build one terrain chunk and print its statistics
    Chunk {
        /// Chunk edge length in columns
        #[arg(short, long)]
        size: Option<u32>,
        /// Noise seed
        #[arg(long)]
        seed: Option<u32>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the renderer without a GPU and print the recorded calls
    Render {
        /// Number of frames to tick
        #[arg(short, long, default_value = "1")]
        frames: u32,
    },
    /// Print the effective configuration as YAML
    Config,
}

#[derive(Debug, Serialize)]
struct ChunkStats {
    size: u32,
    seed: u32,
    vertices: usize,
    triangles: usize,
    min_height: i32,
    max_height: i32,
    bounds_min: Option<[f32; 3]>,
    bounds_max: Option<[f32; 3]>,
}

fn chunk_stats(terrain: &TerrainConfig) -> ChunkStats {
    let heightmap = NoiseHeightmap::from_config(terrain);
    let mesh = build_chunk_with(terrain.chunk_size, &heightmap);

    let heights: Vec<i32> = (0..terrain.chunk_size)
        .flat_map(|x| (0..terrain.chunk_size).map(move |z| (x, z)))
        .map(|(x, z)| heightmap.height(x, z))
        .collect();
    let bounds = mesh.bounds();

    ChunkStats {
        size: terrain.chunk_size,
        seed: terrain.seed,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
        min_height: heights.iter().copied().min().unwrap_or(0),
        max_height: heights.iter().copied().max().unwrap_or(0),
        bounds_min: bounds.map(|(min, _)| min.to_array()),
        bounds_max: bounds.map(|(_, max)| max.to_array()),
    }
}

fn render_log(config: &EngineConfig, frames: u32) -> String {
    let viewport = Viewport::new(config.window.width, config.window.height);
    let mut renderer = Renderer::init(
        HeadlessBackend::new(),
        viewport,
        &RenderSettings::from(config),
    );
    let input = InputState::new();
    tracing::debug!(frames, ?viewport, "running headless render");
    for frame in 0..frames {
        // Simulated 60 Hz clock.
        renderer.tick(&input, frame as f32 / 60.0);
    }
    renderer.shutdown().log()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let mut config = EngineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("blockfield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", blockfield_common::crate_info());
            println!("input: {}", blockfield_input::crate_info());
            println!("terrain: {}", blockfield_terrain::crate_info());
            println!("render: {}", blockfield_render::crate_info());
        }
        Commands::Chunk { size, seed, json } => {
            if let Some(size) = size {
                config.terrain.chunk_size = size;
            }
            if let Some(seed) = seed {
                config.terrain.seed = seed;
            }
            let stats = chunk_stats(&config.terrain);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Chunk: size={}, seed={}", stats.size, stats.seed);
                println!(
                    "Mesh: vertices={}, triangles={}",
                    stats.vertices, stats.triangles
                );
                println!("Heights: {}..={}", stats.min_height, stats.max_height);
                if let (Some(min), Some(max)) = (stats.bounds_min, stats.bounds_max) {
                    println!("Bounds: {min:?} .. {max:?}");
                }
            }
        }
        Commands::Render { frames } => {
            print!("{}", render_log(&config, frames));
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_for_single_column() {
        let terrain = TerrainConfig {
            chunk_size: 1,
            ..TerrainConfig::default()
        };
        let stats = chunk_stats(&terrain);
        assert_eq!(stats.vertices, 36);
        assert_eq!(stats.triangles, 12);
        assert!(stats.min_height >= 0 && stats.max_height <= 1);
        assert!(stats.bounds_min.is_some());
    }

    #[test]
    fn stats_for_empty_chunk() {
        let terrain = TerrainConfig {
            chunk_size: 0,
            ..TerrainConfig::default()
        };
        let stats = chunk_stats(&terrain);
        assert_eq!(stats.vertices, 0);
        assert_eq!(stats.bounds_min, None);
    }

    #[test]
    fn stats_serialize_to_json() {
        let stats = chunk_stats(&TerrainConfig {
            chunk_size: 2,
            ..TerrainConfig::default()
        });
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["vertices"], 144);
        assert_eq!(json["size"], 2);
    }

    #[test]
    fn render_log_has_one_present_per_frame() {
        let mut config = EngineConfig::default();
        config.terrain.chunk_size = 1;
        let log = render_log(&config, 3);
        assert_eq!(log.lines().filter(|l| *l == "present").count(), 3);
        assert_eq!(log.lines().filter(|l| *l == "draw_arrays(0, 36)").count(), 3);
        assert!(log.lines().any(|l| l.starts_with("delete_program")));
    }

    #[test]
    fn chunk_flags_parse() {
        let cli = Cli::parse_from(["blockfield-cli", "chunk", "--size", "4", "--json"]);
        match cli.command {
            Commands::Chunk { size, seed, json } => {
                assert_eq!(size, Some(4));
                assert_eq!(seed, None);
                assert!(json);
            }
            _ => panic!("expected chunk"),
        }
    }
}
