pub mod circuit;
pub mod cli;
pub mod error;
pub mod mna;
pub mod output;
pub mod parser;
pub mod simulator;
pub mod solver;
pub mod validate;

use std::path::Path;

// Re-export commonly used types
pub use circuit::{Circuit, Component, ComponentKind, NodeIndex, GROUND};
pub use error::{CircuitError, Result};
pub use parser::SpiceParser;
pub use simulator::{OperatingPoint, Simulator, SimulatorConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Solve the netlist in `path` with the default solver
pub fn solve_file(path: impl AsRef<Path>) -> Result<OperatingPoint> {
    Simulator::new().solve_file(path)
}

/// Solve a netlist given as text with the default solver
pub fn solve_netlist(content: &str) -> Result<OperatingPoint> {
    Simulator::new().solve_netlist(content)
}
