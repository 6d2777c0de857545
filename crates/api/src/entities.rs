use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{EntityExtractionRequest, EntityExtractionResult, EntityGraph};

pub const EXTRACT_PATH: &str = "/api/entities/extract";
pub const GRAPH_PATH: &str = "/api/entities/graph";

pub struct EntitiesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn entities(&self) -> EntitiesApi<'_> {
        EntitiesApi { client: self }
    }
}

impl EntitiesApi<'_> {
    pub async fn extract(&self, request: &EntityExtractionRequest) -> Result<EntityExtractionResult> {
        self.client.post(EXTRACT_PATH, request).await.map(|r| r.data)
    }

    pub async fn graph(&self) -> Result<EntityGraph> {
        self.client.get(GRAPH_PATH, &[]).await.map(|r| r.data)
    }
}
