//! Error types for configuration, cell access, queries and graph builds.

use std::fmt;

use tilepath_core::{Point, Range};

/// A rejected configuration change. The previous configuration is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Region width or height is negative.
    NegativeSize(Point),
    /// An HPA parameter was changed while HPA is disabled.
    HpaNotEnabled,
    /// Max level outside `1..=5`.
    MaxLevelOutOfRange(i32),
    /// Cluster size outside `10..=50`.
    ClusterSizeOutOfRange(i32),
    /// Cluster size larger than the grid in at least one axis.
    ClusterTooLarge { cluster_size: i32, size: Point },
    /// Grid size is not a whole number of clusters.
    UnevenClusters { cluster_size: i32, size: Point },
    /// Hierarchical graphs need even grid dimensions.
    OddGridSize(Point),
    /// Level growth factor below 2.
    LevelGrowthTooSmall(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSize(size) => write!(f, "region size {size} must not be negative"),
            Self::HpaNotEnabled => {
                f.write_str("HPA must be enabled before using its methods or properties")
            }
            Self::MaxLevelOutOfRange(level) => {
                write!(f, "the max level ({level}) must be within 1 to 5 range")
            }
            Self::ClusterSizeOutOfRange(size) => {
                write!(f, "the cluster size ({size}) must be within 10 to 50 range")
            }
            Self::ClusterTooLarge { cluster_size, size } => write!(
                f,
                "the cluster size ({cluster_size}) must not exceed the grid size {size}"
            ),
            Self::UnevenClusters { cluster_size, size } => write!(
                f,
                "grid size {size} must be a whole number of clusters of size {cluster_size}"
            ),
            Self::OddGridSize(size) => write!(f, "the grid size {size} must be even to use HPA"),
            Self::LevelGrowthTooSmall(growth) => {
                write!(f, "the level growth factor ({growth}) must be at least 2")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A rejected cell read or write.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The grid changed geometry and `update` has not been called since.
    NotInitialized,
    /// The target coordinate or rectangle lies outside the region.
    OutOfBounds { target: Range, region: Range },
    /// Weight scales must be `>= 0`.
    NegativeWeightScale(f32),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("grid is not initialized, call update"),
            Self::OutOfBounds { target, region } => {
                write!(f, "{target} is out of bounds {region}")
            }
            Self::NegativeWeightScale(w) => {
                write!(f, "weight scale must not be less than 0.0: {w}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Why a path query produced no path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// The grid is dirty.
    NotInitialized,
    /// An endpoint lies outside the region.
    OutOfBounds { id: Point, region: Range },
    /// HPA is enabled but the hierarchical graph is stale or missing.
    HpaNotInitialized,
    /// The search finished without reaching the goal.
    NoPath { from: Point, to: Point },
    /// The hierarchical graph broke an invariant while inserting the query.
    Graph(GraphError),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("grid is not initialized, call update"),
            Self::OutOfBounds { id, region } => {
                write!(f, "can't get path: point {id} out of bounds {region}")
            }
            Self::HpaNotInitialized => f.write_str("HPA is not initialized, call update_hpa"),
            Self::NoPath { from, to } => write!(f, "no path from {from} to {to}"),
            Self::Graph(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for PathError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

/// A failed hierarchical graph build.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// `update_hpa` called with HPA disabled.
    HpaDisabled,
    /// `update_hpa` called before `update`.
    GridDirty,
    /// A border node referenced a coordinate with no concrete node.
    MissingNode(Point),
    /// An edge was created without its reverse edge.
    MissingTwin { from: Point, to: Point },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HpaDisabled => {
                f.write_str("HPA must be enabled before using its methods or properties")
            }
            Self::GridDirty => f.write_str("grid is not initialized, call update before update_hpa"),
            Self::MissingNode(p) => write!(f, "hpa graph: no concrete node at {p}"),
            Self::MissingTwin { from, to } => {
                write!(f, "hpa graph: edge {from} -> {to} has no twin")
            }
        }
    }
}

impl std::error::Error for GraphError {}
