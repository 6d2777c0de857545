//! Typed client for the GraphRAG playground backend.
//!
//! One [`ApiClient`] is created per process and borrowed by the domain modules:
//!
//! ```no_run
//! use api::{ApiClient, ClientConfig, RagQueryRequest, SearchType};
//!
//! # async fn run() -> api::Result<()> {
//! let client = ApiClient::new(ClientConfig::from_env())?;
//! let request = RagQueryRequest::new("Who directed The Matrix?", SearchType::Hybrid);
//! let response = client.rag().query(&request).await?;
//! println!("{}", response.answer);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod types;

pub mod agentic;
pub mod contracts;
pub mod database;
pub mod entities;
pub mod graph_rag;
pub mod knowledge_graph;
pub mod pdf;
pub mod rag;
pub mod stats;
pub mod text2cypher;

pub use cache::ResultsCache;
pub use config::{CacheConfig, ClientConfig};
pub use error::{ApiError, Result};
pub use http::{ApiClient, ApiResponse, BearerAuth, RequestHook};
pub use metrics::MetricsSnapshot;
pub use types::*;
