mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pathlens_core::{
    classify, directories_from_path, directory_records, list_executables, scan, DirectoryRecord,
    ScanConfig, DEFAULT_DESCRIPTOR_NAME,
};
use std::path::PathBuf;

/// Classify the executables on your search path
#[derive(Parser)]
#[command(
    name = "pathlens",
    about = "Classify executables on PATH (script, binary, container) and find shadowed commands",
    version,
    author
)]
struct Cli {
    /// Directory to scan instead of $PATH; repeat to give an order
    #[arg(long = "dir", global = true)]
    dirs: Vec<PathBuf>,

    /// Root holding one build directory per container wrapper
    #[arg(long, env = "PATHLENS_CONTAINER_ROOT", global = true)]
    container_root: Option<PathBuf>,

    /// Descriptor file looked up inside each container build directory
    #[arg(long, default_value = DEFAULT_DESCRIPTOR_NAME, global = true)]
    descriptor: String,

    /// Classify one file at a time
    #[arg(long, global = true)]
    no_parallel: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every executable in every directory (default)
    Scan,
    /// Show only executables hidden by an earlier directory
    Shadows,
    /// List the search directories
    Dirs,
    /// Classify the given files
    Classify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

impl Cli {
    fn config(&self) -> ScanConfig {
        let mut config = match &self.container_root {
            Some(root) => ScanConfig::new(root),
            None => ScanConfig::default(),
        };
        config.descriptor_name = self.descriptor.clone();
        config.parallel = !self.no_parallel;
        config
    }

    fn directories(&self) -> Result<Vec<DirectoryRecord>> {
        if !self.dirs.is_empty() {
            return Ok(directory_records(self.dirs.iter().cloned(), "--dir"));
        }
        let path = std::env::var_os("PATH").context("PATH is not set; pass --dir")?;
        Ok(directories_from_path(&path, "PATH"))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.config();
    log::debug!("{config:?}");

    match &cli.command {
        None | Some(Command::Scan) => {
            let report = scan(cli.directories()?, &config);
            if cli.json {
                render::print_json(&report)?;
            } else {
                render::print_report(&report);
            }
        }

        Some(Command::Shadows) => {
            let report = scan(cli.directories()?, &config);
            if cli.json {
                let shadowed: Vec<_> = report.shadowed().collect();
                render::print_json(&shadowed)?;
            } else {
                render::print_shadows(&report);
            }
        }

        Some(Command::Dirs) => {
            let mut records = cli.directories()?;
            for record in records.iter_mut().filter(|r| r.exists && !r.duplicate) {
                record.executable_names = list_executables(&record.directory);
            }
            if cli.json {
                render::print_json(&records)?;
            } else {
                render::print_directories(&records);
            }
        }

        Some(Command::Classify { paths }) => {
            let classified: Vec<render::ClassifiedPath> = paths
                .iter()
                .map(|path| render::ClassifiedPath {
                    path: path.clone(),
                    classification: classify(path, &config),
                })
                .collect();
            if cli.json {
                render::print_json(&classified)?;
            } else {
                render::print_classified(&classified);
            }
        }
    }

    Ok(())
}
