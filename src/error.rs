//! Error types for the DC solver.
//!
//! Every failure of the pipeline maps to one [`CircuitError`] variant. The
//! display strings are the messages users of the netlist format expect.

use std::path::PathBuf;
use thiserror::Error;

use crate::circuit::ComponentKind;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

#[derive(Error, Debug)]
pub enum CircuitError {
    /// Netlist file could not be opened or read
    #[error("Please give the name of a valid SPICE file as input ({path}): {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing, duplicated or misordered `.circuit` / `.end` markers
    #[error("Malformed circuit file")]
    MalformedCircuit,

    /// Too few tokens, unparsable value or zero-valued resistor
    #[error("Invalid component definition at line {line}: {reason}")]
    InvalidComponent { line: usize, reason: String },

    /// Both terminals of a component name the same node
    #[error("Invalid node definition at line {line}")]
    InvalidNode { line: usize },

    /// Leading letter of the component name is not R, V or I
    #[error("Only V, I, R elements are permitted (got '{name}')")]
    UnsupportedElement { name: String },

    #[error("GND node is missing from the circuit")]
    MissingGround,

    /// Parallel sources of the same kind with conflicting values
    #[error("Circuit error: no solution ({kind} sources '{first}' and '{second}' conflict)")]
    InconsistentSources {
        kind: ComponentKind,
        first: String,
        second: String,
    },

    /// The assembled system is singular or the solve produced non-finite values
    #[error("Circuit error: no solution")]
    NoSolution,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl CircuitError {
    pub(crate) fn invalid_component(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidComponent {
            line,
            reason: reason.into(),
        }
    }
}
