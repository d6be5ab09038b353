use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use glshader::{ShaderConfiguration, ShaderStage};

#[derive(Parser, Debug)]
#[command(
    name = "quadshade",
    author,
    version,
    about = "Checks the shader pipelines used to draw video frames on an OpenGL quad"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a shader configuration and report which stages are present.
    Check(CheckArgs),
    /// List the programs declared in a pipeline manifest.
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Pipeline manifest (TOML) to read the configuration from.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = [
            "vertex",
            "fragment",
            "geometry",
            "tess_control",
            "tess_evaluation",
            "compute",
        ]
    )]
    pub manifest: Option<PathBuf>,

    /// Program to check inside the manifest (defaults to the manifest default).
    #[arg(long, value_name = "NAME", requires = "manifest")]
    pub program: Option<String>,

    #[command(flatten)]
    pub stages: StageArgs,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct StageArgs {
    /// Vertex shader source.
    #[arg(long, value_name = "PATH")]
    pub vertex: Option<PathBuf>,

    /// Fragment shader source.
    #[arg(long, value_name = "PATH")]
    pub fragment: Option<PathBuf>,

    /// Optional geometry shader source.
    #[arg(long, value_name = "PATH")]
    pub geometry: Option<PathBuf>,

    /// Optional tessellation control shader source.
    #[arg(long, value_name = "PATH")]
    pub tess_control: Option<PathBuf>,

    /// Optional tessellation evaluation shader source.
    #[arg(long, value_name = "PATH")]
    pub tess_evaluation: Option<PathBuf>,

    /// Optional compute shader source.
    #[arg(long, value_name = "PATH")]
    pub compute: Option<PathBuf>,
}

impl StageArgs {
    pub fn is_empty(&self) -> bool {
        self.paths().iter().all(|(_, path)| path.is_none())
    }

    pub fn to_configuration(&self) -> ShaderConfiguration {
        self.paths()
            .into_iter()
            .fold(ShaderConfiguration::default(), |config, (stage, path)| {
                match path {
                    Some(path) => config.with_stage(stage, path.clone()),
                    None => config,
                }
            })
    }

    fn paths(&self) -> [(ShaderStage, Option<&PathBuf>); 6] {
        [
            (ShaderStage::Vertex, self.vertex.as_ref()),
            (ShaderStage::Fragment, self.fragment.as_ref()),
            (ShaderStage::Geometry, self.geometry.as_ref()),
            (ShaderStage::TessControl, self.tess_control.as_ref()),
            (ShaderStage::TessEvaluation, self.tess_evaluation.as_ref()),
            (ShaderStage::Compute, self.compute.as_ref()),
        ]
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pipeline manifest (TOML) to list.
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}
