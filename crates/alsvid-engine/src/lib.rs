//! Alsvid Reference Interpreter
//!
//! Executes compiled instruction-word programs against an in-memory quantum
//! register. The crate splits into a session/lifecycle state machine
//! ([`Engine`]) and an abstract quantum-state capability ([`QuantumState`] /
//! [`StateBackend`]) so the same interpreter loop can drive a statevector
//! simulator, a stabilizer simulator or a hardware link. The dense
//! [`Statevector`] backend ships in-tree.
//!
//! # Determinism
//!
//! Measurement is the only nondeterministic operation. The engine owns a
//! seedable RNG ([`EngineConfig::seed`]); a fixed seed replays the identical
//! outcome sequence across runs, which the test suites rely on.
//!
//! # Example
//!
//! ```rust
//! use alsvid_engine::{Engine, EngineConfig};
//! use alsvid_isa::{Instruction, MeasureResult, Opcode};
//!
//! let mut engine = Engine::from_config(EngineConfig::new(2).with_seed(7)).unwrap();
//!
//! engine.apply(Instruction::start_session().encode()).unwrap();
//! engine.apply(Instruction::prepare_all().encode()).unwrap();
//! engine
//!     .apply(Instruction::new(Opcode::H, &[], &[0]).unwrap().encode())
//!     .unwrap();
//! let word = engine
//!     .apply(Instruction::measure(0, 0, 0).unwrap().encode())
//!     .unwrap()
//!     .expect("measure returns a result word");
//!
//! let result = MeasureResult::decode(word);
//! assert_eq!(result.qubit, 0);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod statevector;

pub use config::{BackendKind, EngineConfig};
pub use engine::{Engine, MAX_REGISTER_QUBITS, QubitState};
pub use error::{EngineError, EngineResult};
pub use state::{GateOp, QuantumState, StateBackend};
pub use statevector::Statevector;
