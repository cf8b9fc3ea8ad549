//! # Signals Crate
//!
//! Stage one of the friend recommendation job: turning adjacency records into
//! keyed signals for the aggregation stage.
//!
//! ## Components
//!
//! ### Signal
//! `(target, candidate, kind)` where `kind` is either `AlreadyFriend`
//! (never recommend this candidate to this target) or `MutualVia(c)`
//! (target and candidate share friend `c`).
//!
//! ### PairEmitter
//! Stateless per record. Exclusions both ways for every listed friend, then
//! both directions of every pair of friends with the owner as the common friend.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::AdjacencyRecord;
//! use signals::PairEmitter;
//!
//! let emitter = PairEmitter::new();
//! let signals = emitter.emit(&AdjacencyRecord::new(1, vec![2, 3]));
//! assert_eq!(signals.len(), 6);
//! ```

// Public modules
pub mod types;
pub mod pair_emitter;

// Re-export commonly used types
pub use types::{Signal, SignalKind};
pub use pair_emitter::{PairEmitter, signal_count};
