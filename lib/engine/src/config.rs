use rdf_sage_model::GraphName;
use rdf_sage_physical::operator::UnionMode;
use std::time::Duration;

/// The default wall-clock quota of a single invocation.
pub const DEFAULT_QUOTA: Duration = Duration::from_millis(75);

/// The default number of steps between two yields of a cooperative execution.
pub const DEFAULT_YIELD_EVERY: usize = 64;

/// Configures how queries are planned and executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SageConfig {
    /// The wall-clock time an invocation may run before it is suspended.
    pub quota: Duration,
    /// The number of solutions after which an invocation is suspended.
    pub max_results: Option<usize>,
    /// The graph on which patterns outside a `GRAPH` clause are evaluated.
    pub default_graph: GraphName,
    /// How the branches of a union are interleaved.
    pub union_mode: UnionMode,
    /// The number of steps between two yields to the tokio scheduler.
    pub yield_every: usize,
}

impl SageConfig {
    #[must_use]
    pub fn with_quota(mut self, quota: Duration) -> Self {
        self.quota = quota;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_default_graph(mut self, default_graph: GraphName) -> Self {
        self.default_graph = default_graph;
        self
    }

    #[must_use]
    pub fn with_union_mode(mut self, union_mode: UnionMode) -> Self {
        self.union_mode = union_mode;
        self
    }

    /// Sets the number of steps between two yields. Zero is treated as one.
    #[must_use]
    pub fn with_yield_every(mut self, yield_every: usize) -> Self {
        self.yield_every = yield_every.max(1);
        self
    }
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA,
            max_results: None,
            default_graph: GraphName::DefaultGraph,
            union_mode: UnionMode::default(),
            yield_every: DEFAULT_YIELD_EVERY,
        }
    }
}
