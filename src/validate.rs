//! Structural consistency checks run before the system is assembled.

use crate::circuit::{Circuit, Component};
use crate::error::{CircuitError, Result};

/// Reject circuits with contradictory parallel sources.
///
/// Two current sources, or two voltage sources, connected between the same
/// pair of nodes (in either orientation) must carry the same value. Equal
/// duplicates are accepted.
pub fn check_sources(circuit: &Circuit) -> Result<()> {
    check_pairwise(&circuit.current_sources())?;
    check_pairwise(&circuit.voltage_sources())
}

fn check_pairwise(sources: &[&Component]) -> Result<()> {
    for (i, first) in sources.iter().enumerate() {
        for second in &sources[i + 1..] {
            if first.shares_terminals(second) && first.value != second.value {
                return Err(CircuitError::InconsistentSources {
                    kind: first.kind,
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentKind;

    fn source(kind: ComponentKind, name: &str, n1: &str, n2: &str, value: f64) -> Component {
        Component {
            name: name.to_string(),
            kind,
            node1: n1.to_string(),
            node2: n2.to_string(),
            value,
        }
    }

    fn circuit_of(components: Vec<Component>) -> Circuit {
        let mut circuit = Circuit::new();
        for c in components {
            circuit.add_component(c);
        }
        circuit
    }

    #[test]
    fn test_conflicting_current_sources() {
        let circuit = circuit_of(vec![
            source(ComponentKind::CurrentSource, "I1", "1", "GND", 2.0),
            source(ComponentKind::CurrentSource, "I2", "1", "GND", 3.0),
        ]);
        match check_sources(&circuit) {
            Err(CircuitError::InconsistentSources { kind, first, second }) => {
                assert_eq!(kind, ComponentKind::CurrentSource);
                assert_eq!(first, "I1");
                assert_eq!(second, "I2");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_voltage_sources_reversed() {
        let circuit = circuit_of(vec![
            source(ComponentKind::VoltageSource, "V1", "a", "b", 5.0),
            source(ComponentKind::VoltageSource, "V2", "b", "a", 5.0 + 1e-9),
        ]);
        assert!(matches!(
            check_sources(&circuit),
            Err(CircuitError::InconsistentSources { kind: ComponentKind::VoltageSource, .. })
        ));
    }

    #[test]
    fn test_equal_duplicates_allowed() {
        let circuit = circuit_of(vec![
            source(ComponentKind::CurrentSource, "I1", "1", "GND", 2.0),
            source(ComponentKind::CurrentSource, "I2", "GND", "1", 2.0),
            source(ComponentKind::VoltageSource, "V1", "2", "GND", 1.0),
            source(ComponentKind::VoltageSource, "V2", "2", "GND", 1.0),
        ]);
        assert!(check_sources(&circuit).is_ok());
    }

    #[test]
    fn test_mixed_kinds_not_compared() {
        let circuit = circuit_of(vec![
            source(ComponentKind::CurrentSource, "I1", "1", "GND", 2.0),
            source(ComponentKind::VoltageSource, "V1", "1", "GND", 3.0),
            source(ComponentKind::CurrentSource, "I2", "2", "GND", 7.0),
        ]);
        assert!(check_sources(&circuit).is_ok());
    }
}
