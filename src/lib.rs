#![warn(missing_docs)]

//! # `hashi`
//!
//! A solver for [Hashiwokakero](https://en.wikipedia.org/wiki/Hashiwokakero), also known as "bridges".
//! Parse a [`Grid`] from its comma separated text form, turn it into a [`Puzzle`], then call [`Puzzle::solve`] with a [`Strategy`] and an [`Oracle`] such as [`VarisatOracle`].
//!
//! ```
//! use hashi::{Grid, Puzzle, Strategy, VarisatOracle};
//!
//! let puzzle = Puzzle::from("2,2".parse::<Grid>().unwrap());
//! let solution = puzzle.solve(Strategy::Direct, &VarisatOracle).unwrap().unwrap();
//! assert_eq!(puzzle.render(&solution), "22\n");
//! ```
//!
//! # Internals
//! The puzzle is compiled to a Boolean satisfiability problem and handed to a SAT solver; the model is then read back as bridge counts.
//!
//! From the grid we collect the islands, every candidate bridge (two islands sharing a row or column with only water between them),
//! and every pair of candidate bridges which would cross. Each candidate gets two variables, "single" and "double".
//! We then assert, in CNF:
//! 1. No candidate is both single and double.
//! 2. Around every island, singles weigh 1 and doubles 2, and the weights sum to the island's value (a weighted sequential counter).
//! 3. Of two crossing candidates, at least one is absent.
//! 4. The built bridges connect all islands. This is not a local property, so we certify it with flow:
//!    every island but the first receives exactly one unit of flow from a neighbour over a built bridge,
//!    flow runs at most one way per bridge, and each island is strictly deeper than the neighbour feeding it.
//!    The flow edges then form a spanning tree rooted at the first island.
//!
//! Besides one direct solver call, the [`solver`] module offers exhaustive, backtracking and best-first searches over the same formula,
//! which call the solver many times as a feasibility check. These are baselines and only practical for tiny puzzles.

pub use bridge::{BridgeId, CandidateBridge};
pub use cell::{Cell, IslandValue, MAX_ISLAND_VALUE};
pub use compiler::{compile, BridgeVars, Encoding, Statistics};
pub use crossing::CrossingPair;
pub use direction::{Axis, Direction};
pub use grid::{Grid, GridError};
pub use island::{Island, IslandId, Islands};
pub use location::Location;
pub use oracle::{Model, Oracle, SolverFailure, VarisatOracle};
pub use puzzle::Puzzle;
pub use solution::{Multiplicity, Solution, Violation};
pub use solver::Strategy;

pub(crate) mod bridge;
pub(crate) mod cell;
pub mod compiler;
pub(crate) mod crossing;
pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod island;
pub(crate) mod location;
pub(crate) mod logic;
pub mod oracle;
pub(crate) mod puzzle;
pub(crate) mod solution;
pub mod solver;
