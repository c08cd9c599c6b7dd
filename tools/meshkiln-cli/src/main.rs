//! Meshkiln CLI - batch driver for the two-stage asset pipeline
//!
//! # Commands
//!
//! - `meshkiln init` - Create a new meshkiln.toml manifest
//! - `meshkiln mesh` - Stage 1: copy source meshes and run Blender
//!   (scale, save .blend, export _high, decimate, unwrap, export _low)
//! - `meshkiln texture` - Stage 2: drive Painter over remote scripting
//!   (create project, rename set, smart material, bake, save, export)
//! - `meshkiln pipeline` - Run both stages back to back
//!
//! # Usage
//!
//! In a folder with meshkiln.toml:
//! ```bash
//! # Process every asset subfolder through Blender
//! meshkiln mesh
//!
//! # Texture everything Blender produced (Painter must be running
//! # with --enable-remote-scripting)
//! meshkiln texture
//!
//! # Both stages
//! meshkiln pipeline
//! ```

mod blender;
mod init;
mod manifest;
mod mesh;
mod painter;
mod pipeline;
mod texture;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Meshkiln - Blender + Painter batch pipeline
#[derive(Parser)]
#[command(name = "meshkiln")]
#[command(about = "Batch driver for the Blender + Painter asset pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new meshkiln.toml manifest
    Init(init::InitArgs),

    /// Run the mesh stage (Blender decimate + unwrap)
    Mesh(mesh::MeshArgs),

    /// Run the texture stage (Painter material + bake + export)
    Texture(texture::TextureArgs),

    /// Run mesh stage then texture stage
    Pipeline(pipeline::PipelineArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init::execute(args),
        Commands::Mesh(args) => {
            mesh::execute(args)?;
            Ok(())
        }
        Commands::Texture(args) => {
            texture::execute(args)?;
            Ok(())
        }
        Commands::Pipeline(args) => pipeline::execute(args),
    }
}
