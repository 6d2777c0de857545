//! Extraction pages. Besides the toast, failures here also produce an inline
//! error panel next to the input.

use api::{
    ConstraintsReport, ContractExtraction, ContractGraphQuery, ContractGraphStatistics,
    ContractList, EntityExtractionRequest, EntityExtractionResult, EntityGraph, EntityType,
    KnowledgeGraphImport, StatusMessage,
};
use std::collections::BTreeSet;

use crate::confirm::{CLEAR_CONTRACTS_PROMPT, Confirm};
use crate::context::{Context, cache_keys};
use crate::page::{PageError, PageState, Settle};

pub struct EntityPage {
    ctx: Context,
    text: String,
    selected: BTreeSet<EntityType>,
    pub view: PageState<EntityExtractionResult>,
    pub graph: PageState<EntityGraph>,
}

impl EntityPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            text: String::new(),
            selected: EntityType::DEFAULT_SELECTION.into_iter().collect(),
            view: PageState::default(),
            graph: PageState::default(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.view.input_changed();
    }

    /// Flip one checkbox.
    pub fn toggle(&mut self, entity_type: EntityType) {
        if !self.selected.remove(&entity_type) {
            self.selected.insert(entity_type);
        }
        self.view.input_changed();
    }

    pub fn select_only(&mut self, types: impl IntoIterator<Item = EntityType>) {
        self.selected = types.into_iter().collect();
        self.view.input_changed();
    }

    pub fn selected(&self) -> &BTreeSet<EntityType> {
        &self.selected
    }

    pub async fn submit(&mut self) -> Settle {
        let request = EntityExtractionRequest::new(self.text.clone(), self.selected.iter().copied());
        let ticket = self.view.begin();
        let outcome = self.ctx.client.entities().extract(&request).await;
        self.view.settle_api(ticket, outcome)
    }

    pub async fn load_graph(&mut self) -> Settle {
        let ticket = self.graph.begin();
        let outcome = self.ctx.client.entities().graph().await;
        self.graph.settle_api(ticket, outcome)
    }

    pub fn error_panel(&self) -> Option<String> {
        self.view.error().map(|e| e.inline_panel("Entity extraction"))
    }
}

pub struct ContractPage {
    ctx: Context,
    contract_text: String,
    pub view: PageState<ContractExtraction>,
    pub stored: PageState<ContractList>,
}

impl ContractPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            contract_text: String::new(),
            view: PageState::default(),
            stored: PageState::default(),
        }
    }

    pub fn set_contract_text(&mut self, text: impl Into<String>) {
        self.contract_text = text.into();
        self.view.input_changed();
    }

    pub async fn submit(&mut self) -> Settle {
        let text = self.contract_text.clone();
        let ticket = self.view.begin();
        let outcome = self.ctx.client.contracts().extract(&text).await;
        self.view.settle_api(ticket, outcome)
    }

    pub async fn load_stored(&mut self) -> Settle {
        let ticket = self.stored.begin();
        let outcome = self.ctx.client.contracts().list().await;
        self.stored.settle_api(ticket, outcome)
    }

    pub fn error_panel(&self) -> Option<String> {
        self.view.error().map(|e| e.inline_panel("Contract extraction"))
    }
}

/// Contract knowledge-graph construction.
pub struct KnowledgeGraphPage {
    ctx: Context,
    document: String,
    question: String,
    pub extraction: PageState<serde_json::Value>,
    pub import: PageState<KnowledgeGraphImport>,
    pub answer: PageState<ContractGraphQuery>,
    pub constraints: PageState<ConstraintsReport>,
    pub statistics: PageState<ContractGraphStatistics>,
    pub graph: PageState<serde_json::Value>,
    pub admin: PageState<StatusMessage>,
}

impl KnowledgeGraphPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            document: String::new(),
            question: String::new(),
            extraction: PageState::default(),
            import: PageState::default(),
            answer: PageState::default(),
            constraints: PageState::default(),
            statistics: PageState::default(),
            graph: PageState::default(),
            admin: PageState::default(),
        }
    }

    pub fn set_document(&mut self, document: impl Into<String>) {
        self.document = document.into();
        self.extraction.input_changed();
        self.import.input_changed();
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.answer.input_changed();
    }

    /// Fill the document input with the backend's sample contract.
    pub async fn load_sample(&mut self) -> Result<(), PageError> {
        let sample = self.ctx.client.knowledge_graph().sample_contract().await?;
        self.set_document(sample);
        Ok(())
    }

    pub async fn extract(&mut self) -> Settle {
        let document = self.document.clone();
        let ticket = self.extraction.begin();
        let outcome = self.ctx.client.knowledge_graph().extract(&document).await;
        self.extraction.settle_api(ticket, outcome)
    }

    pub async fn import(&mut self) -> Settle {
        let document = self.document.clone();
        let ticket = self.import.begin();
        let outcome = self.ctx.client.knowledge_graph().import(&document).await;
        if outcome.is_ok() {
            self.ctx.invalidate_graph_caches();
        }
        self.import.settle_api(ticket, outcome)
    }

    pub async fn ask(&mut self) -> Settle {
        let question = self.question.clone();
        let ticket = self.answer.begin();
        let outcome = self.ctx.client.knowledge_graph().query(&question).await;
        self.answer.settle_api(ticket, outcome)
    }

    pub async fn create_constraints(&mut self) -> Settle {
        let ticket = self.constraints.begin();
        let outcome = self.ctx.client.knowledge_graph().create_constraints().await;
        self.constraints.settle_api(ticket, outcome)
    }

    pub async fn load_statistics(&mut self) -> Settle {
        let ticket = self.statistics.begin();
        let client = &self.ctx.client;
        let outcome = self
            .ctx
            .cache
            .get_or_fetch(cache_keys::CONTRACT_STATS, || async move {
                client.knowledge_graph().statistics().await
            })
            .await;
        self.statistics.settle_api(ticket, outcome)
    }

    pub async fn load_graph(&mut self) -> Settle {
        let ticket = self.graph.begin();
        let outcome = self.ctx.client.knowledge_graph().data().await;
        self.graph.settle_api(ticket, outcome)
    }

    /// Removes all contract data, but only after `confirm` agrees.
    pub async fn clear(&mut self, confirm: &dyn Confirm) -> Settle {
        if !confirm.confirm(CLEAR_CONTRACTS_PROMPT) {
            return Settle::Cancelled;
        }
        let ticket = self.admin.begin();
        let outcome = self.ctx.client.knowledge_graph().clear().await;
        let cleared = outcome.is_ok();
        let settled = self.admin.settle_api(ticket, outcome);
        if cleared {
            self.ctx.invalidate_graph_caches();
            self.extraction.clear();
            self.import.clear();
            self.answer.clear();
            self.statistics.clear();
            self.graph.clear();
        }
        settled
    }

    pub fn error_panel(&self) -> Option<String> {
        self.extraction
            .error()
            .map(|e| e.inline_panel("Contract extraction"))
            .or_else(|| self.import.error().map(|e| e.inline_panel("Graph import")))
    }
}
