use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{DocumentCounts, QuestionRequest, RagQueryRequest, RagQueryResponse, SearchType};

pub const QUERY_PATH: &str = "/api/rag/query";
pub const STEPBACK_PATH: &str = "/api/rag/stepback";
pub const DOCUMENT_COUNTS_PATH: &str = "/api/rag/documents/count";

pub struct RagApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn rag(&self) -> RagApi<'_> {
        RagApi { client: self }
    }
}

impl RagApi<'_> {
    /// Vector, keyword and hybrid go to the query endpoint with the body as given.
    /// Step-back has its own endpoint that only takes the question.
    pub async fn query(&self, request: &RagQueryRequest) -> Result<RagQueryResponse> {
        match request.search_type {
            SearchType::Stepback => self.stepback(&request.question).await,
            _ => self.client.post(QUERY_PATH, request).await.map(|r| r.data),
        }
    }

    pub async fn stepback(&self, question: &str) -> Result<RagQueryResponse> {
        self.client
            .post(STEPBACK_PATH, &QuestionRequest::new(question))
            .await
            .map(|r| r.data)
    }

    pub async fn document_counts(&self) -> Result<DocumentCounts> {
        self.client
            .get(DOCUMENT_COUNTS_PATH, &[])
            .await
            .map(|r| r.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_hybrid_query_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", QUERY_PATH)
            .match_body(Matcher::Json(json!({
                "question": "Who directed The Matrix?",
                "search_type": "hybrid"
            })))
            .with_body(
                json!({
                    "question": "Who directed The Matrix?",
                    "answer": "The Matrix was directed by the Wachowskis.",
                    "retrieved_documents": [
                        {"text": "The Matrix is a 1999 film by the Wachowskis.", "score": 0.93},
                        {"text": "Keanu Reeves stars as Neo.", "score": 0.71}
                    ],
                    "search_type": "hybrid"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let request = RagQueryRequest::new("Who directed The Matrix?", SearchType::Hybrid);
        let response = client.rag().query(&request).await.unwrap();

        assert_eq!(response.answer, "The Matrix was directed by the Wachowskis.");
        assert_eq!(response.search_type, SearchType::Hybrid);
        assert_eq!(response.retrieved_documents.len(), 2);
        assert!(response.stepback_question.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stepback_routes_to_stepback_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let query = server.mock("POST", QUERY_PATH).expect(0).create_async().await;
        let stepback = server
            .mock("POST", STEPBACK_PATH)
            .match_body(Matcher::Json(json!({"question": "Who directed The Matrix?"})))
            .with_body(
                json!({
                    "original_question": "Who directed The Matrix?",
                    "stepback_question": "Which directors made science fiction films in 1999?",
                    "retrieved_documents": [],
                    "answer": "The Wachowskis.",
                    "search_type": "stepback_rag"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let request = RagQueryRequest::new("Who directed The Matrix?", SearchType::Stepback);
        let response = client.rag().query(&request).await.unwrap();

        assert_eq!(
            response.stepback_question.as_deref(),
            Some("Which directors made science fiction films in 1999?")
        );
        stepback.assert_async().await;
        query.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_question_is_sent_as_is() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", QUERY_PATH)
            .match_body(Matcher::Json(json!({"question": "", "search_type": "vector"})))
            .with_body(r#"{"answer":"","retrieved_documents":[],"search_type":"vector"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let request = RagQueryRequest::new("", SearchType::Vector);
        client.rag().query(&request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_document_counts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DOCUMENT_COUNTS_PATH)
            .with_body(r#"{"documents":2,"chunks":40,"parents":0,"children":0,"total_chunks":40}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let counts = client.rag().document_counts().await.unwrap();
        assert_eq!(counts.documents, 2);
        assert_eq!(counts.total_chunks, 40);
    }
}
