use glam::Vec2;
use tilepath_core::{Point, Range};

use crate::error::{ConfigError, GridError};

/// Persistent per-cell data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cell {
    pub(crate) solid: bool,
    pub(crate) weight_scale: f32,
    pub(crate) position: Vec2,
}

/// Rectangular cell storage with world-space geometry.
///
/// Geometry changes (region, offset, cell size) only take effect on the next
/// [`Grid::update`]; until then the grid is dirty and every cell access fails.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    region: Range,
    offset: Vec2,
    cell_size: Vec2,
    cells: Vec<Cell>,
    width: usize,
    dirty: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An empty grid with unit cell size.
    pub fn new() -> Self {
        Self {
            region: Range::default(),
            offset: Vec2::ZERO,
            cell_size: Vec2::ONE,
            cells: Vec::new(),
            width: 0,
            dirty: false,
        }
    }

    /// Set the region from its top-left corner and its size.
    ///
    /// Rejects negative sizes. Marks the grid dirty only when the region
    /// actually changes.
    pub fn set_region(&mut self, origin: Point, size: Point) -> Result<(), ConfigError> {
        if size.x < 0 || size.y < 0 {
            return Err(ConfigError::NegativeSize(size));
        }
        let region = Range::with_size(origin, size);
        if region.min != self.region.min || region.max != self.region.max {
            self.region = region;
            self.dirty = true;
        }
        Ok(())
    }

    #[inline]
    pub fn region(&self) -> Range {
        self.region
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.region.size()
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        if !offset.abs_diff_eq(self.offset, f32::EPSILON) {
            self.offset = offset;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_cell_size(&mut self, cell_size: Vec2) {
        if !cell_size.abs_diff_eq(self.cell_size, f32::EPSILON) {
            self.cell_size = cell_size;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Rebuild the cell array for the current geometry.
    ///
    /// Every cell starts walkable with unit weight. Cells are laid out in
    /// row-major order.
    pub fn update(&mut self) {
        self.width = self.region.width().max(0) as usize;
        self.cells.clear();
        self.cells.reserve(self.region.len());
        for p in self.region {
            self.cells.push(Cell {
                solid: false,
                weight_scale: 1.0,
                position: self.offset + Vec2::new(p.x as f32, p.y as f32) * self.cell_size,
            });
        }
        self.dirty = false;
    }

    /// Release all cells and reset the region to empty.
    pub fn clear(&mut self) {
        self.cells = Vec::new();
        self.region = Range::default();
        self.width = 0;
        self.dirty = false;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        self.region.contains(Point::new(x, y))
    }

    #[inline]
    pub fn is_in_boundsv(&self, p: Point) -> bool {
        self.region.contains(p)
    }

    pub fn set_solid(&mut self, p: Point, solid: bool) -> Result<(), GridError> {
        self.cell_mut(p)?.solid = solid;
        Ok(())
    }

    pub fn is_solid(&self, p: Point) -> Result<bool, GridError> {
        Ok(self.cell(p)?.solid)
    }

    /// Set the weight scale of a cell. Negative and NaN scales are rejected.
    pub fn set_weight_scale(&mut self, p: Point, weight_scale: f32) -> Result<(), GridError> {
        check_weight_scale(weight_scale)?;
        self.cell_mut(p)?.weight_scale = weight_scale;
        Ok(())
    }

    pub fn weight_scale(&self, p: Point) -> Result<f32, GridError> {
        Ok(self.cell(p)?.weight_scale)
    }

    /// World position of a cell.
    pub fn position(&self, p: Point) -> Result<Vec2, GridError> {
        Ok(self.cell(p)?.position)
    }

    /// Set the solid flag of every cell in `rng`, clipped to the region.
    pub fn fill_solid(&mut self, rng: Range, solid: bool) -> Result<(), GridError> {
        let clipped = self.clip(rng)?;
        for p in clipped {
            if let Some(i) = self.idx(p) {
                self.cells[i].solid = solid;
            }
        }
        Ok(())
    }

    /// Set the weight scale of every cell in `rng`, clipped to the region.
    pub fn fill_weight_scale(&mut self, rng: Range, weight_scale: f32) -> Result<(), GridError> {
        check_weight_scale(weight_scale)?;
        let clipped = self.clip(rng)?;
        for p in clipped {
            if let Some(i) = self.idx(p) {
                self.cells[i].weight_scale = weight_scale;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Crate internals
    // -----------------------------------------------------------------------

    /// Number of cells currently allocated.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.region.contains(p) {
            return None;
        }
        let x = (p.x - self.region.min.x) as usize;
        let y = (p.y - self.region.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let w = self.width.max(1);
        let x = (idx % w) as i32 + self.region.min.x;
        let y = (idx / w) as i32 + self.region.min.y;
        Point::new(x, y)
    }

    #[inline]
    pub(crate) fn cell_at(&self, p: Point) -> Option<&Cell> {
        self.idx(p).and_then(|i| self.cells.get(i))
    }

    /// In bounds and not solid.
    #[inline]
    pub(crate) fn is_walkable(&self, p: Point) -> bool {
        self.cell_at(p).is_some_and(|c| !c.solid)
    }

    /// Weight scale of an in-bounds cell, 1 otherwise.
    #[inline]
    pub(crate) fn weight_at(&self, p: Point) -> f32 {
        self.cell_at(p).map_or(1.0, |c| c.weight_scale)
    }

    fn cell(&self, p: Point) -> Result<&Cell, GridError> {
        if self.dirty {
            return Err(GridError::NotInitialized);
        }
        let region = self.region;
        self.cell_at(p).ok_or(GridError::OutOfBounds {
            target: Range::with_size(p, Point::new(1, 1)),
            region,
        })
    }

    fn cell_mut(&mut self, p: Point) -> Result<&mut Cell, GridError> {
        if self.dirty {
            return Err(GridError::NotInitialized);
        }
        let region = self.region;
        match self.idx(p) {
            Some(i) if i < self.cells.len() => Ok(&mut self.cells[i]),
            _ => Err(GridError::OutOfBounds {
                target: Range::with_size(p, Point::new(1, 1)),
                region,
            }),
        }
    }

    fn clip(&self, rng: Range) -> Result<Range, GridError> {
        if self.dirty {
            return Err(GridError::NotInitialized);
        }
        let clipped = rng.intersect(self.region);
        if clipped.is_empty() {
            return Err(GridError::OutOfBounds {
                target: rng,
                region: self.region,
            });
        }
        Ok(clipped)
    }
}

fn check_weight_scale(weight_scale: f32) -> Result<(), GridError> {
    // NaN fails the comparison too.
    if weight_scale >= 0.0 {
        Ok(())
    } else {
        Err(GridError::NegativeWeightScale(weight_scale))
    }
}
