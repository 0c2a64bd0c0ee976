use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "gitstory")]
#[command(about = "Scroll through a repository's history one commit at a time", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the viewer (the default)
    View(ViewArgs),
    /// Write the line table of a git repository
    Generate(GenerateArgs),
    /// Render the charts at one narrative step to SVG
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Line table to visualize
    #[arg(long, default_value = "loc.csv")]
    pub loc: PathBuf,
    /// Project catalog to browse
    #[arg(long)]
    pub projects: Option<PathBuf>,
    /// Repository URL commit links point to
    #[arg(long)]
    pub repo_url: Option<String>,
    /// Viewport fraction at which a step becomes active
    #[arg(long)]
    pub trigger_offset: Option<f32>,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            loc: PathBuf::from("loc.csv"),
            projects: None,
            repo_url: None,
            trigger_offset: None,
        }
    }
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Repository to blame
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
    /// Where to write the line table
    #[arg(long, default_value = "loc.csv")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long, default_value = "loc.csv")]
    pub loc: PathBuf,
    /// Narrative step to render, 0-based
    #[arg(long, default_value_t = 0)]
    pub step: usize,
    #[arg(long, default_value = "charts")]
    pub out_dir: PathBuf,
    #[arg(long)]
    pub repo_url: Option<String>,
    /// Render with the light theme
    #[arg(long)]
    pub light: bool,
}

impl ViewArgs {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            loc_path: self.loc.clone(),
            projects_path: self.projects.clone(),
            ..Settings::default()
        };
        if let Some(url) = &self.repo_url {
            settings.repo_url = url.clone();
        }
        if let Some(offset) = self.trigger_offset {
            settings.trigger_offset = offset.clamp(0.0, 1.0);
        }
        settings
    }
}

impl ExportArgs {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            loc_path: self.loc.clone(),
            ..Settings::default()
        };
        if let Some(url) = &self.repo_url {
            settings.repo_url = url.clone();
        }
        settings
    }
}
