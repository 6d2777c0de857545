use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{GraphRagRequest, GraphRagResponse, StatusMessage};

pub const COMMUNITIES_PATH: &str = "/api/graph-rag/communities";

pub struct GraphRagApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn graph_rag(&self) -> GraphRagApi<'_> {
        GraphRagApi { client: self }
    }
}

impl GraphRagApi<'_> {
    /// Global or local search, picked by `request.mode`.
    pub async fn query(&self, request: &GraphRagRequest) -> Result<GraphRagResponse> {
        self.client
            .post(request.mode.path(), request)
            .await
            .map(|r| r.data)
    }

    /// Triggers community detection on the backend graph.
    pub async fn detect_communities(&self) -> Result<StatusMessage> {
        self.client.post_empty(COMMUNITIES_PATH).await.map(|r| r.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::types::GraphRagMode;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_mode_selects_path() {
        let mut server = mockito::Server::new_async().await;
        let global = server
            .mock("POST", "/api/graph-rag/global")
            .match_body(Matcher::Json(json!({"question": "What are the main themes?"})))
            .with_body(r#"{"question":"What are the main themes?","answer":"Freedom.","search_type":"global_graph_rag"}"#)
            .create_async()
            .await;
        let local = server
            .mock("POST", "/api/graph-rag/local")
            .match_body(Matcher::Json(json!({"question": "Who is Neo?"})))
            .with_body(r#"{"question":"Who is Neo?","answer":"The One.","search_type":"local_graph_rag"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let g = client
            .graph_rag()
            .query(&GraphRagRequest::new("What are the main themes?", GraphRagMode::Global))
            .await
            .unwrap();
        let l = client
            .graph_rag()
            .query(&GraphRagRequest::new("Who is Neo?", GraphRagMode::Local))
            .await
            .unwrap();

        assert_eq!(g.search_type, "global_graph_rag");
        assert_eq!(l.answer, "The One.");
        global.assert_async().await;
        local.assert_async().await;
    }

    #[tokio::test]
    async fn test_detect_communities_failure_in_band() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", COMMUNITIES_PATH)
            .with_body(r#"{"error":"Failed to calculate communities"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let err = client.graph_rag().detect_communities().await.unwrap_err();
        assert_eq!(err.message(), "Failed to calculate communities");
    }
}
