use tracing::error;

use crate::error::{ApiError, Result};
use crate::http::ApiClient;
use crate::types::{
    ConstraintsReport, ContractGraphQuery, ContractGraphStatistics, DocumentRequest,
    KnowledgeGraphImport, QuestionRequest, SampleContract, StatusMessage,
};

pub const EXTRACT_PATH: &str = "/api/knowledge-graph/extract";
pub const IMPORT_PATH: &str = "/api/knowledge-graph/import";
pub const DATA_PATH: &str = "/api/knowledge-graph/data";
pub const QUERY_PATH: &str = "/api/knowledge-graph/query";
pub const CONSTRAINTS_PATH: &str = "/api/knowledge-graph/constraints";
pub const STATISTICS_PATH: &str = "/api/knowledge-graph/statistics";
pub const CLEAR_PATH: &str = "/api/knowledge-graph/clear";
pub const SAMPLE_CONTRACT_PATH: &str = "/api/knowledge-graph/sample-contract";

/// Contract knowledge-graph construction and querying.
pub struct KnowledgeGraphApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn knowledge_graph(&self) -> KnowledgeGraphApi<'_> {
        KnowledgeGraphApi { client: self }
    }
}

impl KnowledgeGraphApi<'_> {
    /// Structured extraction only; the shape depends on the document.
    pub async fn extract(&self, document: &str) -> Result<serde_json::Value> {
        self.client
            .post(EXTRACT_PATH, &document_body(document))
            .await
            .map(|r| r.data)
    }

    /// Extract and import into the graph in one backend call. An import that
    /// failed after a successful extraction is reported inside `import_result`.
    pub async fn import(&self, document: &str) -> Result<KnowledgeGraphImport> {
        let response = self
            .client
            .post::<_, KnowledgeGraphImport>(IMPORT_PATH, &document_body(document))
            .await?;

        let nested_error = response
            .data
            .import_result
            .extra
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string);
        match nested_error {
            Some(message) => {
                error!(path = IMPORT_PATH, status = response.status, error = %message, "contract import failed");
                Err(ApiError::Backend {
                    status: response.status,
                    message,
                    raw: serde_json::to_string(&response.data).unwrap_or_default(),
                })
            }
            None => Ok(response.data),
        }
    }

    /// Visualization data; node and edge shapes are backend-defined.
    pub async fn data(&self) -> Result<serde_json::Value> {
        self.client.get(DATA_PATH, &[]).await.map(|r| r.data)
    }

    pub async fn query(&self, question: &str) -> Result<ContractGraphQuery> {
        self.client
            .post(QUERY_PATH, &QuestionRequest::new(question))
            .await
            .map(|r| r.data)
    }

    pub async fn create_constraints(&self) -> Result<ConstraintsReport> {
        self.client.post_empty(CONSTRAINTS_PATH).await.map(|r| r.data)
    }

    pub async fn statistics(&self) -> Result<ContractGraphStatistics> {
        self.client.get(STATISTICS_PATH, &[]).await.map(|r| r.data)
    }

    /// Removes all contract data. Irreversible; callers must confirm first.
    pub async fn clear(&self) -> Result<StatusMessage> {
        self.client.post_empty(CLEAR_PATH).await.map(|r| r.data)
    }

    pub async fn sample_contract(&self) -> Result<String> {
        self.client
            .get::<SampleContract>(SAMPLE_CONTRACT_PATH, &[])
            .await
            .map(|r| r.data.sample_contract)
    }
}

fn document_body(document: &str) -> DocumentRequest {
    DocumentRequest {
        document: document.to_string(),
    }
}
