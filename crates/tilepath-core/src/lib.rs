//! Geometry primitives shared by the *tilepath* crates.
//!
//! Grid coordinates are integer [`Point`]s and rectangular areas are
//! half-open [`Range`]s. Both are plain `Copy` values so they can be used as
//! map keys, cluster bounds and query arguments without ceremony.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
