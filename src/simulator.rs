use std::collections::BTreeMap;
use std::path::Path;
use nalgebra::DVector;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, NodeIndex, GROUND};
use crate::error::Result;
use crate::mna::MnaSystem;
use crate::parser::SpiceParser;
use crate::solver::{LinearSolver, SolverConfig};
use crate::validate::check_sources;

/// DC operating point: every node voltage and every voltage-source current
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub voltages: BTreeMap<String, f64>,
    pub currents: BTreeMap<String, f64>,
}

impl OperatingPoint {
    /// Map a solved unknown vector back to named quantities.
    ///
    /// Sources sharing a name collapse to a single entry holding the current
    /// of the last one declared.
    pub fn from_solution(solution: &DVector<f64>, index: &NodeIndex, circuit: &Circuit) -> Self {
        let mut voltages: BTreeMap<String, f64> = index
            .non_ground_nodes()
            .map(|(name, idx)| (name.to_string(), solution[idx - 1]))
            .collect();
        voltages.insert(GROUND.to_string(), 0.0);

        let node_count = index.node_count();
        let mut currents = BTreeMap::new();
        for (k, source) in circuit.voltage_sources().into_iter().enumerate() {
            currents.insert(source.name.clone(), solution[node_count + k]);
        }

        OperatingPoint { voltages, currents }
    }

    pub fn voltage(&self, node: &str) -> Option<f64> {
        self.voltages.get(node).copied()
    }

    pub fn current(&self, source: &str) -> Option<f64> {
        self.currents.get(source).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatorConfig {
    pub solver_config: SolverConfig,
}

/// Runs the parse -> index -> check -> assemble -> solve -> map pipeline.
///
/// Holds configuration only, every call works on fresh local state.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    parser: SpiceParser,
    solver: LinearSolver,
}

impl Simulator {
    /// Create a new simulator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new simulator with custom configuration
    pub fn with_config(config: SimulatorConfig) -> Self {
        Simulator {
            parser: SpiceParser::new(),
            solver: LinearSolver::with_config(config.solver_config),
        }
    }

    /// Solve a netlist stored in a file
    pub fn solve_file(&self, path: impl AsRef<Path>) -> Result<OperatingPoint> {
        let path = path.as_ref();
        info!("Loading netlist from: {}", path.display());
        let circuit = self.parser.parse_file(path)?;
        self.solve_circuit(&circuit)
    }

    /// Solve a netlist given as text
    pub fn solve_netlist(&self, content: &str) -> Result<OperatingPoint> {
        let circuit = self.parser.parse_netlist(content)?;
        self.solve_circuit(&circuit)
    }

    /// Run the operating point analysis on an already parsed circuit
    pub fn solve_circuit(&self, circuit: &Circuit) -> Result<OperatingPoint> {
        info!(
            "Loaded circuit: {} components, {} nodes",
            circuit.components.len(),
            circuit.nodes.len()
        );

        let index = circuit.index_nodes()?;
        check_sources(circuit)?;

        let system = MnaSystem::build(circuit, &index)?;
        let (solution, stats) = self.solver.solve_dense(&system.matrix, &system.rhs)?;
        debug!(
            "{:?} solve finished in {:.3}ms, residual {:.2e}",
            stats.method_used,
            stats.solve_time * 1000.0,
            stats.residual_norm
        );

        Ok(OperatingPoint::from_solution(&solution, &index, circuit))
    }
}
