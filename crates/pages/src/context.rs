use api::{ApiClient, ResultsCache};
use std::sync::Arc;

/// Cache keys for the few responses worth keeping between views.
pub mod cache_keys {
    pub const SCHEMA: &str = "GET /api/text2cypher/schema";
    pub const TOOLS: &str = "GET /api/agentic-rag/tools";
    pub const STATS: &str = "GET /api/stats";
    pub const CONTRACT_STATS: &str = "GET /api/knowledge-graph/statistics";
}

/// Shared collaborators handed to every page.
#[derive(Clone)]
pub struct Context {
    pub client: Arc<ApiClient>,
    pub cache: Arc<ResultsCache>,
}

impl Context {
    pub fn new(client: ApiClient) -> Self {
        let cache = ResultsCache::from_config(&client.config().cache);
        Self {
            client: Arc::new(client),
            cache: Arc::new(cache),
        }
    }

    /// Anything cached may be stale once the graph has been mutated.
    pub fn invalidate_graph_caches(&self) {
        self.cache.clear();
    }
}
