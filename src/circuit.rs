use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};

/// Name of the reference node. Its voltage is fixed at zero.
pub const GROUND: &str = "GND";

/// Types of circuit components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Resistor,
    VoltageSource,
    CurrentSource,
}

impl ComponentKind {
    /// Classify a component by the leading letter of its name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.chars().next()? {
            'R' => Some(ComponentKind::Resistor),
            'V' => Some(ComponentKind::VoltageSource),
            'I' => Some(ComponentKind::CurrentSource),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::VoltageSource => "voltage",
            ComponentKind::CurrentSource => "current",
        };
        f.write_str(name)
    }
}

/// Two-terminal circuit element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub node1: String,
    pub node2: String,
    /// Ohms, volts or amps depending on `kind`
    pub value: f64,
}

impl Component {
    pub fn new_resistor(name: String, node1: String, node2: String, resistance: f64) -> Self {
        Component {
            name,
            kind: ComponentKind::Resistor,
            node1,
            node2,
            value: resistance,
        }
    }

    pub fn new_voltage_source(name: String, node_pos: String, node_neg: String, voltage: f64) -> Self {
        Component {
            name,
            kind: ComponentKind::VoltageSource,
            node1: node_pos,
            node2: node_neg,
            value: voltage,
        }
    }

    pub fn new_current_source(name: String, node1: String, node2: String, current: f64) -> Self {
        Component {
            name,
            kind: ComponentKind::CurrentSource,
            node1,
            node2,
            value: current,
        }
    }

    /// Get the conductance for resistive elements
    pub fn conductance(&self) -> Option<f64> {
        match self.kind {
            ComponentKind::Resistor if self.value != 0.0 => Some(1.0 / self.value),
            _ => None,
        }
    }

    /// True if both components sit between the same pair of nodes, in either orientation
    pub fn shares_terminals(&self, other: &Component) -> bool {
        (self.node1 == other.node1 && self.node2 == other.node2)
            || (self.node1 == other.node2 && self.node2 == other.node1)
    }
}

/// Parsed circuit: components in declaration order plus every node they reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Circuit {
    pub components: Vec<Component>,
    pub nodes: BTreeSet<String>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component and register both of its nodes
    pub fn add_component(&mut self, component: Component) {
        self.nodes.insert(component.node1.clone());
        self.nodes.insert(component.node2.clone());
        self.components.push(component);
    }

    pub fn has_ground(&self) -> bool {
        self.nodes.contains(GROUND)
    }

    fn components_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.components
            .iter()
            .filter(|comp| comp.kind == kind)
            .collect()
    }

    pub fn resistors(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::Resistor)
    }

    /// Get all voltage sources, in declaration order
    pub fn voltage_sources(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::VoltageSource)
    }

    /// Get all current sources
    pub fn current_sources(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::CurrentSource)
    }

    /// Assign matrix indices to the circuit's nodes.
    ///
    /// Ground gets 0; every other node gets 1, 2, 3, ... in lexicographic
    /// order of its name. The ordering fixes the row/column layout of the
    /// MNA system.
    pub fn index_nodes(&self) -> Result<NodeIndex> {
        if !self.has_ground() {
            return Err(CircuitError::MissingGround);
        }

        // BTreeSet iterates in byte order already
        let mut indices = BTreeMap::new();
        indices.insert(GROUND.to_string(), 0);
        for (i, name) in self.nodes.iter().filter(|n| *n != GROUND).enumerate() {
            indices.insert(name.clone(), i + 1);
        }

        Ok(NodeIndex {
            node_count: indices.len() - 1,
            indices,
        })
    }
}

/// Mapping from node names to MNA unknown indices (ground = 0)
#[derive(Debug, Clone, PartialEq)]
pub struct NodeIndex {
    indices: BTreeMap<String, usize>,
    node_count: usize,
}

impl NodeIndex {
    /// Number of non-ground nodes
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Matrix row/column for a node, or `None` for ground and unknown names
    pub fn row(&self, name: &str) -> Option<usize> {
        match self.get(name) {
            Some(0) | None => None,
            Some(idx) => Some(idx - 1),
        }
    }

    /// Non-ground nodes with their indices, in index order
    pub fn non_ground_nodes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.indices
            .iter()
            .filter(|&(_, &idx)| idx != 0)
            .map(|(name, &idx)| (name.as_str(), idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit_with_nodes(pairs: &[(&str, &str)]) -> Circuit {
        let mut circuit = Circuit::new();
        for (i, (a, b)) in pairs.iter().enumerate() {
            circuit.add_component(Component::new_resistor(
                format!("R{}", i),
                a.to_string(),
                b.to_string(),
                1.0,
            ));
        }
        circuit
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ComponentKind::from_name("R12"), Some(ComponentKind::Resistor));
        assert_eq!(ComponentKind::from_name("Vin"), Some(ComponentKind::VoltageSource));
        assert_eq!(ComponentKind::from_name("I1"), Some(ComponentKind::CurrentSource));
        assert_eq!(ComponentKind::from_name("r1"), None);
        assert_eq!(ComponentKind::from_name("X1"), None);
        assert_eq!(ComponentKind::from_name(""), None);
    }

    #[test]
    fn test_component_creation() {
        let resistor = Component::new_resistor("R1".to_string(), "1".to_string(), "2".to_string(), 1000.0);
        assert_eq!(resistor.name, "R1");
        assert_eq!(resistor.conductance(), Some(0.001));

        let source = Component::new_voltage_source("V1".to_string(), "1".to_string(), "GND".to_string(), 5.0);
        assert_eq!(source.conductance(), None);
    }

    #[test]
    fn test_shares_terminals_either_orientation() {
        let a = Component::new_current_source("I1".to_string(), "1".to_string(), "GND".to_string(), 1.0);
        let b = Component::new_current_source("I2".to_string(), "GND".to_string(), "1".to_string(), 1.0);
        let c = Component::new_current_source("I3".to_string(), "2".to_string(), "GND".to_string(), 1.0);
        assert!(a.shares_terminals(&b));
        assert!(!a.shares_terminals(&c));
    }

    #[test]
    fn test_index_nodes_sorted() {
        let circuit = circuit_with_nodes(&[("out", "GND"), ("a", "out"), ("10", "2")]);
        let index = circuit.index_nodes().unwrap();

        assert_eq!(index.node_count(), 4);
        assert_eq!(index.get("GND"), Some(0));
        // byte order: "10" < "2" < "a" < "out"
        assert_eq!(index.get("10"), Some(1));
        assert_eq!(index.get("2"), Some(2));
        assert_eq!(index.get("a"), Some(3));
        assert_eq!(index.get("out"), Some(4));
        assert_eq!(index.row("GND"), None);
        assert_eq!(index.row("a"), Some(2));

        let order: Vec<&str> = index.non_ground_nodes().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["10", "2", "a", "out"]);
    }

    #[test]
    fn test_index_nodes_missing_ground() {
        let circuit = circuit_with_nodes(&[("1", "2")]);
        assert!(matches!(circuit.index_nodes(), Err(CircuitError::MissingGround)));
    }

    #[test]
    fn test_lowercase_gnd_is_not_ground() {
        let circuit = circuit_with_nodes(&[("1", "gnd")]);
        assert!(matches!(circuit.index_nodes(), Err(CircuitError::MissingGround)));
    }
}
