//! Engine configuration.
//!
//! The configuration is the serializable half of the engine: backend choice,
//! register size and RNG seed. A live [`Engine`](crate::engine::Engine) is
//! constructed from it and is itself never serialized.

use serde::{Deserialize, Serialize};

/// Which quantum-state backend to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BackendKind {
    /// The in-tree dense statevector simulator.
    #[default]
    Statevector,
}

/// Configuration for an execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the quantum register in qubits.
    pub num_qubits: u32,
    /// RNG seed for reproducible measurement sequences. `None` seeds from
    /// entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Backend choice.
    #[serde(default)]
    pub backend: BackendKind,
}

impl EngineConfig {
    /// Create a configuration for a register of the given size.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            seed: None,
            backend: BackendKind::default(),
        }
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Select the backend.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }
}
