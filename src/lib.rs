//! Shortens known Sokoban solutions.
//!
//! A solution is split into push segments, every walk between two pushes
//! is replaced by a shortest walk, and runs of pushes that return the boxes
//! to an earlier configuration are collapsed into a single walk.

pub mod direction;
pub mod error;
pub mod grid;
pub mod level;
pub mod levels;
pub mod merge;
pub mod optimizer;
pub mod path;
pub mod segment;
