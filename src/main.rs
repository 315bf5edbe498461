use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use mseq::Project;

/// Run a MIDI sequencing/routing project from a pair of YAML config files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the port config document (`ports:` physical bindings).
    #[arg(long, default_value = "ports.yml")]
    ports: PathBuf,
    /// Path to the project config document (instruments, parts, connectors).
    #[arg(long, default_value = "project.yml")]
    project: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let project = match Project::load(&cli.ports, &cli.project) {
        Ok(project) => project,
        Err(err) => {
            error!("failed to assemble project: {err}");
            return ExitCode::FAILURE;
        }
    };

    project.clock().commence();
    mseq::run_cli(&project);

    ExitCode::SUCCESS
}
