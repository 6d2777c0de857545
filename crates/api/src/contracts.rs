use crate::error::Result;
use crate::http::ApiClient;
use crate::types::{ContractExtraction, ContractList, ContractRequest};

pub const EXTRACT_PATH: &str = "/api/contracts/extract";
pub const LIST_PATH: &str = "/api/contracts/list";

pub struct ContractsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn contracts(&self) -> ContractsApi<'_> {
        ContractsApi { client: self }
    }
}

impl ContractsApi<'_> {
    pub async fn extract(&self, contract_text: &str) -> Result<ContractExtraction> {
        let body = ContractRequest {
            contract_text: contract_text.to_string(),
        };
        self.client.post(EXTRACT_PATH, &body).await.map(|r| r.data)
    }

    pub async fn list(&self) -> Result<ContractList> {
        self.client.get(LIST_PATH, &[]).await.map(|r| r.data)
    }
}
