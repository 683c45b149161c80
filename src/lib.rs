//! Search solvers for three puzzle domains.
//!
//! This crate bundles a branch-and-bound solver that sorts amphipod-style
//! tokens into their home rooms at minimum energy, a Dijkstra shortest-path
//! search over weighted digit grids, and an exhaustive route enumerator for
//! cave networks with small-cave visit limits.

pub mod burrow;
pub mod caves;
pub mod grid;
pub mod pruning;
pub mod routes;
pub mod solver;

// Re-export main types
pub use burrow::{Burrow, Category, Placement, SpaceId, SpaceKind, State, TokenId};
pub use caves::{CaveId, CaveKind, CaveSystem, Route, RouteSet};
pub use grid::{PathResult, WeightGrid};
pub use routes::{all_moves, room_enterable, Move};
pub use solver::{solve, SolverConfig, SolverResult};
