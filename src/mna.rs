use nalgebra::{DMatrix, DVector};
use log::debug;

use crate::circuit::{Circuit, Component, NodeIndex};
use crate::error::{CircuitError, Result};

/// MNA system representation: [A][x] = [z]
/// where A is the system matrix, x is the unknown vector, and z is the RHS vector
#[derive(Debug, Clone)]
pub struct MnaSystem {
    /// System matrix A (coefficient matrix)
    pub matrix: DMatrix<f64>,
    /// Right-hand side vector z
    pub rhs: DVector<f64>,
    /// Total system size
    pub size: usize,
    /// Number of nodes (excluding ground)
    pub num_nodes: usize,
    /// Number of voltage sources
    pub num_voltage_sources: usize,
}

impl MnaSystem {
    /// Create a zeroed system sized for the given circuit
    pub fn new(circuit: &Circuit, index: &NodeIndex) -> Self {
        let num_nodes = index.node_count();
        let num_voltage_sources = circuit.voltage_sources().len();
        let size = num_nodes + num_voltage_sources;

        MnaSystem {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            size,
            num_nodes,
            num_voltage_sources,
        }
    }

    /// Build the DC system for a circuit in one step
    pub fn build(circuit: &Circuit, index: &NodeIndex) -> Result<Self> {
        let mut system = Self::new(circuit, index);
        system.assemble_dc(circuit, index)?;
        Ok(system)
    }

    /// Assemble the MNA system for DC analysis
    pub fn assemble_dc(&mut self, circuit: &Circuit, index: &NodeIndex) -> Result<()> {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);

        for component in circuit.resistors() {
            self.add_resistor(index, component)?;
        }

        // Branch rows follow the node rows, in declaration order
        for (k, component) in circuit.voltage_sources().into_iter().enumerate() {
            self.add_voltage_source(index, component, self.num_nodes + k);
        }

        for component in circuit.current_sources() {
            self.add_current_source(index, component);
        }

        debug!(
            "Assembled {}x{} MNA system ({} nodes, {} voltage sources)",
            self.size, self.size, self.num_nodes, self.num_voltage_sources
        );
        Ok(())
    }

    fn add_resistor(&mut self, index: &NodeIndex, component: &Component) -> Result<()> {
        // Only reachable with a hand-built circuit; the parser rejects zero ohms
        let conductance = component.conductance().ok_or_else(|| {
            CircuitError::invalid_component(0, format!("resistor '{}' has zero resistance", component.name))
        })?;

        let idx1 = index.row(&component.node1);
        let idx2 = index.row(&component.node2);

        if let Some(i) = idx1 {
            self.matrix[(i, i)] += conductance;
        }
        if let Some(j) = idx2 {
            self.matrix[(j, j)] += conductance;
        }
        if let (Some(i), Some(j)) = (idx1, idx2) {
            self.matrix[(i, j)] -= conductance;
            self.matrix[(j, i)] -= conductance;
        }

        Ok(())
    }

    /// Stamp the branch equation V(node1) - V(node2) = value
    fn add_voltage_source(&mut self, index: &NodeIndex, component: &Component, branch: usize) {
        if let Some(i) = index.row(&component.node1) {
            self.matrix[(i, branch)] = 1.0;
            self.matrix[(branch, i)] = 1.0;
        }
        if let Some(j) = index.row(&component.node2) {
            self.matrix[(j, branch)] = -1.0;
            self.matrix[(branch, j)] = -1.0;
        }

        self.rhs[branch] = component.value;
    }

    /// Current is drawn from node1 and delivered into node2
    fn add_current_source(&mut self, index: &NodeIndex, component: &Component) {
        if let Some(i) = index.row(&component.node1) {
            self.rhs[i] -= component.value;
        }
        if let Some(j) = index.row(&component.node2) {
            self.rhs[j] += component.value;
        }
    }
}
