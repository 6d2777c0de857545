use crate::error::Result;
use crate::http::ApiClient;
use crate::types::StatusMessage;

pub const RESET_PATH: &str = "/api/database/reset";

pub struct DatabaseApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn database(&self) -> DatabaseApi<'_> {
        DatabaseApi { client: self }
    }
}

impl DatabaseApi<'_> {
    /// Deletes every node and relationship. Irreversible; callers must confirm first.
    pub async fn reset(&self) -> Result<StatusMessage> {
        self.client.post_empty(RESET_PATH).await.map(|r| r.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_reset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", RESET_PATH)
            .with_body(r#"{"message":"Database reset successfully","status":"success"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())).unwrap();
        let ack = client.database().reset().await.unwrap();
        assert_eq!(ack.summary(), "Database reset successfully (success)");
        mock.assert_async().await;
    }
}
