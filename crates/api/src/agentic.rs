use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{AgenticRagResponse, QuestionRequest, ToolDescriptor, ToolsResponse};

pub const QUERY_PATH: &str = "/api/agentic-rag/query";
pub const TOOLS_PATH: &str = "/api/agentic-rag/tools";

pub struct AgenticRagApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn agentic_rag(&self) -> AgenticRagApi<'_> {
        AgenticRagApi { client: self }
    }
}

impl AgenticRagApi<'_> {
    pub async fn query(&self, question: &str) -> Result<AgenticRagResponse> {
        self.client
            .post(QUERY_PATH, &QuestionRequest::new(question))
            .await
            .map(|r| r.data)
    }

    /// Retrieval tools the agent can call.
    pub async fn tools(&self) -> Result<Vec<ToolDescriptor>> {
        self.client
            .get::<ToolsResponse>(TOOLS_PATH, &[])
            .await
            .map(|r| r.data.tools)
    }
}
