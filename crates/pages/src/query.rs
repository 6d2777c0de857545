//! Question-answering pages: RAG, Text2Cypher, agentic RAG and Graph RAG.

use api::{
    AgenticRagResponse, CypherQueryRequest, CypherQueryResponse, GraphRagMode, GraphRagRequest,
    GraphRagResponse, RagQueryRequest, RagQueryResponse, SchemaResponse, SearchType,
    StatusMessage, ToolDescriptor,
};

use crate::context::{Context, cache_keys};
use crate::page::{PageError, PageState, ResponseOrdering, Settle, Ticket};

pub struct RagPage {
    ctx: Context,
    question: String,
    search_type: SearchType,
    pub view: PageState<RagQueryResponse>,
}

impl RagPage {
    pub fn new(ctx: Context) -> Self {
        Self::with_ordering(ctx, ResponseOrdering::default())
    }

    pub fn with_ordering(ctx: Context, ordering: ResponseOrdering) -> Self {
        Self {
            ctx,
            question: String::new(),
            search_type: SearchType::default(),
            view: PageState::new(ordering),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.view.input_changed();
    }

    pub fn set_search_type(&mut self, search_type: SearchType) {
        self.search_type = search_type;
        self.view.input_changed();
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    /// Issue half of a submission: a fresh request and its ticket.
    pub fn start(&mut self) -> (Ticket, RagQueryRequest) {
        let request = RagQueryRequest::new(self.question.clone(), self.search_type);
        (self.view.begin(), request)
    }

    pub fn finish(&mut self, ticket: Ticket, outcome: api::Result<RagQueryResponse>) -> Settle {
        self.view.settle_api(ticket, outcome)
    }

    pub async fn submit(&mut self) -> Settle {
        let (ticket, request) = self.start();
        let outcome = self.ctx.client.rag().query(&request).await;
        self.finish(ticket, outcome)
    }
}

pub struct CypherPage {
    ctx: Context,
    question: String,
    terminology: String,
    examples: String,
    pub view: PageState<CypherQueryResponse>,
    pub schema: PageState<SchemaResponse>,
    pub dataset: PageState<StatusMessage>,
}

impl CypherPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            question: String::new(),
            terminology: String::new(),
            examples: String::new(),
            view: PageState::default(),
            schema: PageState::default(),
            dataset: PageState::default(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.view.input_changed();
    }

    pub fn set_terminology(&mut self, terminology: impl Into<String>) {
        self.terminology = terminology.into();
        self.view.input_changed();
    }

    pub fn set_examples(&mut self, examples: impl Into<String>) {
        self.examples = examples.into();
        self.view.input_changed();
    }

    fn request(&self) -> CypherQueryRequest {
        let mut request = CypherQueryRequest::new(self.question.clone());
        if !self.terminology.trim().is_empty() {
            request = request.with_terminology(self.terminology.clone());
        }
        if !self.examples.trim().is_empty() {
            request = request.with_examples(self.examples.clone());
        }
        request
    }

    pub async fn submit(&mut self) -> Settle {
        let request = self.request();
        let ticket = self.view.begin();
        let outcome = self.ctx.client.text2cypher().query(&request).await;
        self.view.settle_api(ticket, outcome)
    }

    pub async fn load_schema(&mut self) -> Settle {
        let ticket = self.schema.begin();
        let client = &self.ctx.client;
        let outcome = self
            .ctx
            .cache
            .get_or_fetch(cache_keys::SCHEMA, || async move { client.text2cypher().schema().await })
            .await;
        self.schema.settle_api(ticket, outcome)
    }

    pub async fn load_movies(&mut self) -> Settle {
        let ticket = self.dataset.begin();
        let outcome = self.ctx.client.text2cypher().load_movies().await;
        if outcome.is_ok() {
            self.ctx.invalidate_graph_caches();
        }
        self.dataset.settle_api(ticket, outcome)
    }
}

pub struct AgenticRagPage {
    ctx: Context,
    question: String,
    pub view: PageState<AgenticRagResponse>,
    pub tools: PageState<Vec<ToolDescriptor>>,
}

impl AgenticRagPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            question: String::new(),
            view: PageState::default(),
            tools: PageState::default(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.view.input_changed();
    }

    /// The agent reports its own failures with `status: "error"`; those land in
    /// the error state rather than being shown as an answer.
    pub async fn submit(&mut self) -> Settle {
        let question = self.question.clone();
        let ticket = self.view.begin();
        let outcome = match self.ctx.client.agentic_rag().query(&question).await {
            Ok(response) if response.is_error() => Err(PageError {
                status: Some(200),
                message: response.answer,
            }),
            other => other.map_err(PageError::from),
        };
        self.view.settle(ticket, outcome)
    }

    pub async fn load_tools(&mut self) -> Settle {
        let ticket = self.tools.begin();
        let client = &self.ctx.client;
        let outcome = self
            .ctx
            .cache
            .get_or_fetch(cache_keys::TOOLS, || async move { client.agentic_rag().tools().await })
            .await;
        self.tools.settle_api(ticket, outcome)
    }
}

pub struct GraphRagPage {
    ctx: Context,
    question: String,
    mode: GraphRagMode,
    pub view: PageState<GraphRagResponse>,
    pub communities: PageState<StatusMessage>,
}

impl GraphRagPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            question: String::new(),
            mode: GraphRagMode::default(),
            view: PageState::default(),
            communities: PageState::default(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.view.input_changed();
    }

    pub fn set_mode(&mut self, mode: GraphRagMode) {
        self.mode = mode;
        self.view.input_changed();
    }

    pub async fn submit(&mut self) -> Settle {
        let request = GraphRagRequest::new(self.question.clone(), self.mode);
        let ticket = self.view.begin();
        let outcome = self.ctx.client.graph_rag().query(&request).await;
        self.view.settle_api(ticket, outcome)
    }

    pub async fn detect_communities(&mut self) -> Settle {
        let ticket = self.communities.begin();
        let outcome = self.ctx.client.graph_rag().detect_communities().await;
        self.communities.settle_api(ticket, outcome)
    }
}
