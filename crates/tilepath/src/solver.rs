use tilepath_core::Point;

/// Parent sentinel for the start node of a search.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Per-node search state
// ---------------------------------------------------------------------------

/// Transient A* bookkeeping attached to a grid cell or a graph node.
///
/// The state is only meaningful when one of the pass stamps equals the
/// solver's current pass; older stamps mean "untouched by this search".
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchState {
    pub(crate) g: f32,
    pub(crate) f: f32,
    /// Cell index in grid mode, edge index in graph mode.
    pub(crate) parent: usize,
    pub(crate) open_pass: u64,
    pub(crate) closed_pass: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            g: 0.0,
            f: 0.0,
            parent: NO_PARENT,
            open_pass: 0,
            closed_pass: 0,
        }
    }
}

impl SearchState {
    /// Seed state for the start node of a search.
    #[inline]
    pub(crate) fn start(f: f32, pass: u64) -> Self {
        Self {
            g: 0.0,
            f,
            parent: NO_PARENT,
            open_pass: pass,
            closed_pass: 0,
        }
    }
}

/// Heap entry, ordered so that `BinaryHeap` (a max-heap) pops the smallest
/// `f` first and, among equal `f`, the largest `g`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenEntry {
    pub(crate) idx: usize,
    pub(crate) f: f32,
    pub(crate) g: f32,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for OpenEntry {}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Owns the search caches shared by flat and graph searches.
///
/// Grid-cell search state lives in `nodes`, indexed like the grid's cells;
/// graph nodes carry their own state. A single pass counter versions both.
#[derive(Debug, Default)]
pub(crate) struct Solver {
    pub(crate) nodes: Vec<SearchState>,
    pub(crate) pass: u64,
    pub(crate) nbuf: Vec<Point>,
}

impl Solver {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            pass: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Resize the grid-cell state to `len` cells, dropping stale state.
    pub(crate) fn resize(&mut self, len: usize) {
        self.nodes.clear();
        self.nodes.resize(len, SearchState::default());
    }

    /// Start a new search generation and return its id.
    #[inline]
    pub(crate) fn begin_pass(&mut self) -> u64 {
        self.pass += 1;
        self.pass
    }
}
