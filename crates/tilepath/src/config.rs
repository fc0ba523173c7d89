use glam::Vec2;
use tilepath_core::Point;

use crate::distance::Heuristic;
use crate::error::ConfigError;
use crate::neighbors::DiagonalMode;

/// Hierarchical graph parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HpaConfig {
    /// Number of abstraction levels, `1..=5`.
    pub max_level: i32,
    /// Side of a level-0 cluster, `10..=50`.
    pub cluster_size: i32,
    /// Cluster size multiplier between consecutive levels.
    pub level_growth: i32,
}

impl Default for HpaConfig {
    fn default() -> Self {
        Self {
            max_level: 1,
            cluster_size: 10,
            level_growth: 3,
        }
    }
}

impl HpaConfig {
    pub const MAX_LEVEL_RANGE: std::ops::RangeInclusive<i32> = 1..=5;
    pub const CLUSTER_SIZE_RANGE: std::ops::RangeInclusive<i32> = 10..=50;

    /// Check the parameters against a grid of the given size.
    pub fn validate(&self, size: Point) -> Result<(), ConfigError> {
        if size.x % 2 != 0 || size.y % 2 != 0 {
            return Err(ConfigError::OddGridSize(size));
        }
        if !Self::MAX_LEVEL_RANGE.contains(&self.max_level) {
            return Err(ConfigError::MaxLevelOutOfRange(self.max_level));
        }
        if !Self::CLUSTER_SIZE_RANGE.contains(&self.cluster_size) {
            return Err(ConfigError::ClusterSizeOutOfRange(self.cluster_size));
        }
        if self.level_growth < 2 {
            return Err(ConfigError::LevelGrowthTooSmall(self.level_growth));
        }
        if self.cluster_size > size.x || self.cluster_size > size.y {
            return Err(ConfigError::ClusterTooLarge {
                cluster_size: self.cluster_size,
                size,
            });
        }
        if size.x % self.cluster_size != 0 || size.y % self.cluster_size != 0 {
            return Err(ConfigError::UnevenClusters {
                cluster_size: self.cluster_size,
                size,
            });
        }
        Ok(())
    }
}

/// Everything needed to set up a [`GridPathfinder`](crate::GridPathfinder)
/// except cell contents and cost closures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    pub origin: Point,
    pub size: Point,
    pub offset: Vec2,
    pub cell_size: Vec2,
    pub diagonal_mode: DiagonalMode,
    pub compute_heuristic: Heuristic,
    pub estimate_heuristic: Heuristic,
    pub jumping_enabled: bool,
    /// `Some` enables the hierarchical graph.
    pub hpa: Option<HpaConfig>,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            size: Point::ZERO,
            offset: Vec2::ZERO,
            cell_size: Vec2::ONE,
            diagonal_mode: DiagonalMode::default(),
            compute_heuristic: Heuristic::Euclidean,
            estimate_heuristic: Heuristic::Euclidean,
            jumping_enabled: false,
            hpa: None,
        }
    }
}
