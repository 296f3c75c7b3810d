use clap::ArgMatches;
use anyhow::{anyhow, Result};

use crate::solver::SolverMethod;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub input_file: String,
    pub output_file: Option<String>,
    pub output_format: OutputFormat,
    pub solver_method: SolverMethod,
    pub verbose_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let input_file = matches
            .get_one::<String>("input")
            .ok_or_else(|| anyhow!("Input file is required"))?
            .clone();

        let output_file = matches.get_one::<String>("output").cloned();

        let verbose_level = matches.get_count("verbose");

        let output_format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("table") | None => OutputFormat::Table,
            Some("csv") => OutputFormat::Csv,
            Some("json") => OutputFormat::Json,
            Some(other) => return Err(anyhow!("Invalid output format '{}'", other)),
        };

        let solver_method = match matches.get_one::<String>("method") {
            Some(method) => method.parse::<SolverMethod>().map_err(|e| anyhow!(e))?,
            None => SolverMethod::Lu,
        };

        Ok(CliArgs {
            input_file,
            output_file,
            output_format,
            solver_method,
            verbose_level,
        })
    }

    /// Log filter implied by the `-v` count
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose_level {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Command-line definition shared by the binary and the tests
pub fn create_cli() -> clap::Command {
    use clap::{Arg, ArgAction, Command};

    Command::new("dcspice")
        .version(crate::VERSION)
        .about(crate::DESCRIPTION)
        .arg(
            Arg::new("input")
                .help("Netlist file containing a .circuit ... .end block")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write results to FILE instead of stdout"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .default_value("table")
                .value_parser(["table", "csv", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .value_name("METHOD")
                .default_value("lu")
                .value_parser(["lu", "qr"])
                .help("Dense factorisation used for the solve"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase verbosity level"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> CliArgs {
        let matches = create_cli().try_get_matches_from(argv.iter().copied()).unwrap();
        CliArgs::from_matches(&matches).unwrap()
    }

    #[test]
    fn test_defaults() {
        let parsed = args(&["dcspice", "net.ckt"]);
        assert_eq!(parsed.input_file, "net.ckt");
        assert_eq!(parsed.output_file, None);
        assert_eq!(parsed.output_format, OutputFormat::Table);
        assert_eq!(parsed.solver_method, SolverMethod::Lu);
        assert_eq!(parsed.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_all_options() {
        let parsed = args(&["dcspice", "net.ckt", "-o", "out.json", "-f", "json", "--method", "qr", "-vv"]);
        assert_eq!(parsed.output_file.as_deref(), Some("out.json"));
        assert_eq!(parsed.output_format, OutputFormat::Json);
        assert_eq!(parsed.solver_method, SolverMethod::Qr);
        assert_eq!(parsed.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(create_cli().try_get_matches_from(["dcspice", "net.ckt", "-f", "xml"]).is_err());
    }
}
