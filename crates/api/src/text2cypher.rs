use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{CypherQueryRequest, CypherQueryResponse, SchemaResponse, StatusMessage};

pub const QUERY_PATH: &str = "/api/text2cypher/query";
pub const SCHEMA_PATH: &str = "/api/text2cypher/schema";
pub const LOAD_MOVIES_PATH: &str = "/api/text2cypher/load-movies";

pub struct Text2CypherApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn text2cypher(&self) -> Text2CypherApi<'_> {
        Text2CypherApi { client: self }
    }
}

impl Text2CypherApi<'_> {
    pub async fn query(&self, request: &CypherQueryRequest) -> Result<CypherQueryResponse> {
        self.client.post(QUERY_PATH, request).await.map(|r| r.data)
    }

    pub async fn schema(&self) -> Result<SchemaResponse> {
        self.client.get(SCHEMA_PATH, &[]).await.map(|r| r.data)
    }

    /// Seeds the database with the sample movies dataset.
    pub async fn load_movies(&self) -> Result<StatusMessage> {
        self.client.post_empty(LOAD_MOVIES_PATH).await.map(|r| r.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_query_with_hints() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", QUERY_PATH)
            .match_body(Matcher::Json(json!({
                "question": "Who acted in Heat?",
                "terminology": "Persons are people",
                "examples": ""
            })))
            .with_body(
                json!({
                    "question": "Who acted in Heat?",
                    "cypher_query": "MATCH (p:Person)-[:ACTED_IN]->(m:Movie {title:'Heat'}) RETURN p.name",
                    "results": [{"p.name": "Al Pacino"}, {"p.name": "Robert De Niro"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let request = CypherQueryRequest::new("Who acted in Heat?").with_terminology("Persons are people");
        let response = client.text2cypher().query(&request).await.unwrap();

        assert!(response.cypher_query.starts_with("MATCH"));
        assert_eq!(response.results.len(), 2);
        assert!(response.answer.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_schema_and_load_movies() {
        let mut server = mockito::Server::new_async().await;
        let schema = server
            .mock("GET", SCHEMA_PATH)
            .with_body(r#"{"structured_schema":{},"schema_string":"Node properties:\nMovie {title: STRING}"}"#)
            .create_async()
            .await;
        let load = server
            .mock("POST", LOAD_MOVIES_PATH)
            .with_body(r#"{"message":"Movies dataset loaded","status":"success"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let s = client.text2cypher().schema().await.unwrap();
        assert!(s.schema_string.contains("Movie"));
        let ack = client.text2cypher().load_movies().await.unwrap();
        assert_eq!(ack.status.as_deref(), Some("success"));

        schema.assert_async().await;
        load.assert_async().await;
    }
}
