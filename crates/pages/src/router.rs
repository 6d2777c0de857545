use std::fmt;

/// Every view reachable from the sidebar. Paths are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Documents,
    Rag,
    Text2Cypher,
    AgenticRag,
    Entities,
    Contracts,
    GraphRag,
    KnowledgeGraph,
    Statistics,
    Admin,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Home,
        Route::Documents,
        Route::Rag,
        Route::Text2Cypher,
        Route::AgenticRag,
        Route::Entities,
        Route::Contracts,
        Route::GraphRag,
        Route::KnowledgeGraph,
        Route::Statistics,
        Route::Admin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Documents => "/documents",
            Route::Rag => "/rag",
            Route::Text2Cypher => "/text2cypher",
            Route::AgenticRag => "/agentic-rag",
            Route::Entities => "/entities",
            Route::Contracts => "/contracts",
            Route::GraphRag => "/graph-rag",
            Route::KnowledgeGraph => "/knowledge-graph",
            Route::Statistics => "/statistics",
            Route::Admin => "/admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Documents => "Documents",
            Route::Rag => "RAG Query",
            Route::Text2Cypher => "Text2Cypher",
            Route::AgenticRag => "Agentic RAG",
            Route::Entities => "Entity Extraction",
            Route::Contracts => "Contract Extraction",
            Route::GraphRag => "Graph RAG",
            Route::KnowledgeGraph => "Knowledge Graph",
            Route::Statistics => "Statistics",
            Route::Admin => "Database Admin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Route::Home => "Overview of the playground",
            Route::Documents => "Upload or download PDFs into the vector store",
            Route::Rag => "Vector, keyword, hybrid and step-back retrieval",
            Route::Text2Cypher => "Natural language to Cypher over the graph",
            Route::AgenticRag => "Tool-using agent over the movie graph",
            Route::Entities => "Extract entities and relationships from text",
            Route::Contracts => "Structured contract field extraction",
            Route::GraphRag => "Global and local community-based search",
            Route::KnowledgeGraph => "Build and query a contract knowledge graph",
            Route::Statistics => "Live node and relationship counts",
            Route::Admin => "Reset the database",
        }
    }

    /// Exact match only; no trailing-slash folding, no parameters.
    pub fn from_path(path: &str) -> Option<Route> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Sidebar renderer. Knows nothing about pages beyond the current path.
pub struct NavShell;

impl NavShell {
    pub fn render(current_path: &str) -> Vec<String> {
        Route::ALL
            .iter()
            .map(|route| {
                let marker = if route.path() == current_path { '>' } else { ' ' };
                format!("{marker} {:<20} {}", route.label(), route.path())
            })
            .collect()
    }

    pub fn active(current_path: &str) -> Option<Route> {
        Route::from_path(current_path)
    }
}
