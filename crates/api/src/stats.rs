use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{Health, StatisticsSnapshot};

pub const STATS_PATH: &str = "/api/stats";
pub const HEALTH_PATH: &str = "/health";

pub struct StatsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi { client: self }
    }
}

impl StatsApi<'_> {
    pub async fn snapshot(&self) -> Result<StatisticsSnapshot> {
        self.client.get(STATS_PATH, &[]).await.map(|r| r.data)
    }

    pub async fn health(&self) -> Result<Health> {
        self.client.get(HEALTH_PATH, &[]).await.map(|r| r.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;

    #[tokio::test]
    async fn test_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", STATS_PATH)
            .with_body(
                json!({
                    "node_counts": {"Chunk": 40, "Document": 2},
                    "relationship_counts": {"PART_OF": 40},
                    "total_nodes": 42,
                    "total_relationships": 40
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let snap = client.stats().snapshot().await.unwrap();
        assert_eq!(snap.node_counts["Chunk"], 40);
        assert_eq!(snap.total_nodes, 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HEALTH_PATH)
            .with_body(r#"{"status":"healthy"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        assert!(client.stats().health().await.unwrap().is_healthy());
    }
}
