use colored::*;
use log::info;
use std::io;

use dcspice::cli::{create_cli, CliArgs};
use dcspice::solver::SolverConfig;
use dcspice::{output, Simulator, SimulatorConfig};

fn main() {
    let matches = create_cli().get_matches();

    if let Err(e) = run_application(&matches) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run_application(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let args = CliArgs::from_matches(matches)?;

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level())
        .init();

    info!("Input file: {}", args.input_file.bright_blue());

    let simulator = Simulator::with_config(SimulatorConfig {
        solver_config: SolverConfig {
            method: args.solver_method,
            ..SolverConfig::default()
        },
    });
    let op = simulator.solve_file(&args.input_file)?;

    match args.output_file {
        Some(output_file) => output::export_results(&op, &output_file, args.output_format)?,
        None => output::write_results(&op, args.output_format, io::stdout().lock())?,
    }

    info!("{}", "Operating point solved".green().bold());
    Ok(())
}
