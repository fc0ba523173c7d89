//! A* pathfinding on 2D grids, with Jump Point Search and hierarchical
//! (HPA*) acceleration.
//!
//! Everything goes through [`GridPathfinder`]:
//!
//! - **Flat A\*** over the cell grid, with per-cell weights and four
//!   [`DiagonalMode`] policies ([`GridPathfinder::try_id_path`])
//! - **Jump Point Search** for uniform-cost grids
//!   ([`GridPathfinder::set_jumping_enabled`])
//! - **HPA\*** over a cluster hierarchy built once per map change
//!   ([`GridPathfinder::update_hpa`])
//!
//! Search state is stamped with a pass counter and reused, so repeated
//! queries do not reallocate once the pathfinder has warmed up.
//!
//! # Costs
//!
//! Step costs and heuristics come from a [`Heuristic`] each, and either can
//! be overridden with a closure. The [`CostModel`] trait is the seam the
//! searches go through.
//!
//! Cell storage is internal; cells are edited through the pathfinder.
//!
//! ```compile_fail
//! let _grid = tilepath::Grid::new();
//! ```
//!
//! # Features
//!
//! - `serde`: (de)serialization of [`PathfinderConfig`] and the enums it
//!   holds.

mod astar;
mod config;
mod cost;
mod distance;
mod error;
mod grid;
mod hpa;
mod jps;
mod neighbors;
mod pathfinder;
mod solver;
mod traits;

pub use config::{HpaConfig, PathfinderConfig};
pub use cost::{CostFn, CostPolicy};
pub use distance::{Heuristic, chebyshev, euclidean, manhattan, octile};
pub use error::{ConfigError, GraphError, GridError, PathError};
pub use hpa::HpaStats;
pub use neighbors::DiagonalMode;
pub use pathfinder::GridPathfinder;
pub use traits::CostModel;

pub use tilepath_core::{Point, Range};
