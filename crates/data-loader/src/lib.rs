//! # Data Loader Crate
//!
//! Loads friendship adjacency data for the friend recommendation job.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (UserId, AdjacencyRecord, FriendGraph)
//! - **parser**: Parse tab/comma separated adjacency lines
//! - **index**: Build a symmetric FriendGraph for lookups
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parser, FriendGraph};
//! use std::path::Path;
//!
//! let record = parser::parse_adjacency_line("input", 1, "1\t2,3")?;
//!
//! let (graph, parsed) = FriendGraph::load_from_path(Path::new("data/friends.txt"))?;
//! println!("{} lines skipped", parsed.skipped);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{AdjacencyRecord, FriendGraph, ParsedInput, UserId};
