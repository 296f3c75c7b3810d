use std::fs;
use std::path::Path;
use log::debug;

use crate::circuit::{Circuit, Component, ComponentKind};
use crate::error::{CircuitError, Result};

const CIRCUIT_MARKER: &str = ".circuit";
const END_MARKER: &str = ".end";

/// Parser for the `.circuit` ... `.end` netlist format.
///
/// Each body line is `<name> <node1> <node2> <value>` for resistors and
/// `<name> <node1> <node2> <slot> <value>` for voltage and current sources,
/// where `<slot>` (usually `dc`) is not interpreted.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpiceParser;

impl SpiceParser {
    pub fn new() -> Self {
        SpiceParser
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Circuit> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CircuitError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_netlist(&content)
    }

    pub fn parse_netlist(&self, content: &str) -> Result<Circuit> {
        let lines: Vec<&str> = content.lines().collect();
        let (start, end) = locate_body(&lines)?;

        let mut circuit = Circuit::new();
        for (offset, line) in lines[start + 1..end].iter().enumerate() {
            // 1-based line number within the whole input
            let line_num = start + offset + 2;
            if line.trim().is_empty() {
                continue;
            }
            circuit.add_component(self.parse_component_line(line, line_num)?);
        }

        debug!(
            "Parsed {} components over {} nodes",
            circuit.components.len(),
            circuit.nodes.len()
        );
        Ok(circuit)
    }

    fn parse_component_line(&self, line: &str, line_num: usize) -> Result<Component> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(CircuitError::invalid_component(
                line_num,
                format!("expected at least 4 fields, found {}", tokens.len()),
            ));
        }

        let name = tokens[0];
        let (node1, node2) = (tokens[1], tokens[2]);
        if node1 == node2 {
            return Err(CircuitError::InvalidNode { line: line_num });
        }

        let kind = ComponentKind::from_name(name).ok_or_else(|| CircuitError::UnsupportedElement {
            name: name.to_string(),
        })?;

        let value_token = match kind {
            ComponentKind::Resistor => tokens[3],
            ComponentKind::VoltageSource | ComponentKind::CurrentSource => {
                // tokens[3] is a free slot for sources; the value follows it
                *tokens.get(4).ok_or_else(|| {
                    CircuitError::invalid_component(line_num, format!("source '{}' has no value", name))
                })?
            }
        };
        let value = parse_value(value_token, line_num)?;

        if kind == ComponentKind::Resistor && value == 0.0 {
            return Err(CircuitError::invalid_component(
                line_num,
                format!("resistor '{}' has zero resistance", name),
            ));
        }

        Ok(Component {
            name: name.to_string(),
            kind,
            node1: node1.to_string(),
            node2: node2.to_string(),
            value,
        })
    }
}

/// Find the `.circuit` and `.end` lines, each of which must occur exactly once
/// and in that order.
fn locate_body(lines: &[&str]) -> Result<(usize, usize)> {
    let mut start = None;
    let mut end = None;

    for (i, line) in lines.iter().enumerate() {
        let marker = match line.trim() {
            CIRCUIT_MARKER => &mut start,
            END_MARKER => &mut end,
            _ => continue,
        };
        if marker.replace(i).is_some() {
            return Err(CircuitError::MalformedCircuit);
        }
    }

    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok((start, end)),
        _ => Err(CircuitError::MalformedCircuit),
    }
}

fn parse_value(token: &str, line_num: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| CircuitError::invalid_component(line_num, format!("invalid value '{}': {}", token, e)))
}
