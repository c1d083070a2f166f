//! Engine configuration.

use std::time::Duration;

/// Tunables shared by both calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Tile edge length in pixels. Not consumed by the searches
    /// themselves; carried for rendering-side collaborators that share
    /// this configuration object.
    pub tile_size: i32,
    /// Maximum age of a cached query result.
    pub cache_ttl: Duration,
    /// Maximum number of entries per result cache.
    pub max_cache_entries: usize,
    /// Hard cap on A* node expansions per query. Reaching it terminates
    /// the search with an empty path; the event is visible only in
    /// metrics.
    pub node_exploration_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            cache_ttl: Duration::from_secs(5),
            max_cache_entries: 64,
            node_exploration_cap: 500,
        }
    }
}
