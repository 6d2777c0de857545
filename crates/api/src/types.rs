//! Wire shapes exchanged with the backend.
//!
//! Responses are decoded once here, at the client boundary. Fields the backend
//! may omit are `Option` or defaulted so pages never see half-populated data.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// RAG

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Vector,
    Keyword,
    #[default]
    Hybrid,
    #[serde(alias = "stepback_rag")]
    Stepback,
}

impl SearchType {
    pub const ALL: [SearchType; 4] = [
        SearchType::Vector,
        SearchType::Keyword,
        SearchType::Hybrid,
        SearchType::Stepback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Vector => "vector",
            SearchType::Keyword => "keyword",
            SearchType::Hybrid => "hybrid",
            SearchType::Stepback => "stepback",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagQueryRequest {
    pub question: String,
    pub search_type: SearchType,
}

impl RagQueryRequest {
    pub fn new(question: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            question: question.into(),
            search_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionRequest {
    pub question: String,
}

impl QuestionRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    pub text: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagQueryResponse {
    pub answer: String,
    #[serde(default)]
    pub retrieved_documents: Vec<RetrievedDocument>,
    pub search_type: SearchType,
    #[serde(default)]
    pub stepback_question: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub original_question: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentCounts {
    #[serde(default)]
    pub documents: u64,
    #[serde(default)]
    pub chunks: u64,
    #[serde(default)]
    pub parents: u64,
    #[serde(default)]
    pub children: u64,
    #[serde(default)]
    pub total_chunks: u64,
}

// ---------------------------------------------------------------------------
// Documents

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentIngested {
    #[serde(default)]
    pub message: Option<String>,
    pub document_id: String,
    pub chunks_count: u64,
}

// ---------------------------------------------------------------------------
// Text2Cypher

/// Few-shot hints are optional; absent hints go over the wire as empty strings,
/// which is what the backend treats as "none".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CypherQueryRequest {
    pub question: String,
    #[serde(serialize_with = "none_as_empty", default)]
    pub terminology: Option<String>,
    #[serde(serialize_with = "none_as_empty", default)]
    pub examples: Option<String>,
}

impl CypherQueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    pub fn with_terminology(mut self, terminology: impl Into<String>) -> Self {
        self.terminology = Some(terminology.into());
        self
    }

    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = Some(examples.into());
        self
    }
}

fn none_as_empty<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or(""))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CypherQueryResponse {
    #[serde(default)]
    pub question: Option<String>,
    pub cypher_query: String,
    /// Result rows; their schema depends on the generated query.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaResponse {
    pub schema_string: String,
    #[serde(default)]
    pub structured_schema: serde_json::Value,
}

/// Generic acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl StatusMessage {
    pub fn summary(&self) -> String {
        match (&self.message, &self.status) {
            (Some(m), Some(s)) => format!("{m} ({s})"),
            (Some(m), None) => m.clone(),
            (None, Some(s)) => s.clone(),
            (None, None) => "done".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Agentic RAG

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgenticRagResponse {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub critique_questions: Vec<String>,
    #[serde(default)]
    pub retrieval_steps: u32,
    pub status: String,
}

impl AgenticRagResponse {
    /// The agent reports its own failures in-band with `status: "error"`.
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: ToolParameters,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolParameters {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsResponse {
    pub tools: Vec<ToolDescriptor>,
}

// ---------------------------------------------------------------------------
// Entity extraction

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Organization,
    Location,
    Event,
    Concept,
    Product,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Person,
        EntityType::Organization,
        EntityType::Location,
        EntityType::Event,
        EntityType::Concept,
        EntityType::Product,
    ];

    /// The selection the backend uses when none is given.
    pub const DEFAULT_SELECTION: [EntityType; 4] = [
        EntityType::Person,
        EntityType::Organization,
        EntityType::Location,
        EntityType::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Organization => "ORGANIZATION",
            EntityType::Location => "LOCATION",
            EntityType::Event => "EVENT",
            EntityType::Concept => "CONCEPT",
            EntityType::Product => "PRODUCT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `entity_types` is a set: only checked types are serialized, each once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityExtractionRequest {
    pub text: String,
    pub entity_types: BTreeSet<EntityType>,
}

impl EntityExtractionRequest {
    pub fn new(text: impl Into<String>, entity_types: impl IntoIterator<Item = EntityType>) -> Self {
        Self {
            text: text.into(),
            entity_types: entity_types.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedEntity {
    pub entity_name: String,
    pub entity_type: String,
    #[serde(default)]
    pub entity_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedRelationship {
    pub source_entity: String,
    pub target_entity: String,
    #[serde(default)]
    pub relationship_description: String,
    #[serde(deserialize_with = "strength_1_to_10")]
    pub relationship_strength: u8,
}

/// The backend emits strengths as floats; normalize to an integer in 1..=10.
fn strength_1_to_10<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(d)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("relationship_strength is not a number"));
    }
    Ok(raw.round().clamp(1.0, 10.0) as u8)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityExtractionResult {
    #[serde(default)]
    pub entities: Vec<ExtractedEntity>,
    #[serde(default)]
    pub relationships: Vec<ExtractedRelationship>,
    #[serde(default)]
    pub entities_count: Option<usize>,
    #[serde(default)]
    pub relationships_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    /// Entities created only as a relationship endpoint have no type.
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub node_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub degree: u64,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub strength: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphStats {
    #[serde(default)]
    pub total_nodes: u64,
    #[serde(default)]
    pub total_edges: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub stats: GraphStats,
}

// ---------------------------------------------------------------------------
// Contracts

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractRequest {
    pub contract_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Location {
    /// Comma-joined non-empty parts, e.g. "Austin, TX, USA".
    pub fn display(&self) -> String {
        [&self.address, &self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractExtraction {
    pub contract_type: String,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub contract_scope: Option<String>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub governing_law: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractList {
    #[serde(default)]
    pub contracts: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Graph RAG

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GraphRagMode {
    #[default]
    Global,
    Local,
}

impl GraphRagMode {
    pub fn path(&self) -> &'static str {
        match self {
            GraphRagMode::Global => "/api/graph-rag/global",
            GraphRagMode::Local => "/api/graph-rag/local",
        }
    }
}

/// `mode` selects the endpoint; only the question is sent.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphRagRequest {
    pub question: String,
    #[serde(skip)]
    pub mode: GraphRagMode,
}

impl GraphRagRequest {
    pub fn new(question: impl Into<String>, mode: GraphRagMode) -> Self {
        Self {
            question: question.into(),
            mode,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphRagResponse {
    pub answer: String,
    pub search_type: String,
    #[serde(default)]
    pub question: String,
}

// ---------------------------------------------------------------------------
// Statistics

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatisticsSnapshot {
    #[serde(default)]
    pub node_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub relationship_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_nodes: u64,
    #[serde(default)]
    pub total_relationships: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ---------------------------------------------------------------------------
// Knowledge graph construction

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRequest {
    pub document: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeGraphImport {
    pub extraction_result: serde_json::Value,
    pub import_result: StatusMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractGraphQuery {
    pub question: String,
    pub cypher_query: String,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractGraphStatistics {
    #[serde(default)]
    pub contracts: u64,
    #[serde(default)]
    pub organizations: u64,
    #[serde(default)]
    pub locations: u64,
    #[serde(default)]
    pub party_relationships: u64,
    #[serde(default)]
    pub location_relationships: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintOutcome {
    pub query: String,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintsReport {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub constraints: Vec<ConstraintOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleContract {
    pub sample_contract: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_request_serializes_only_selected_types() {
        let req = EntityExtractionRequest::new("Neo lives in Zion", [EntityType::Person]);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"text": "Neo lives in Zion", "entity_types": ["PERSON"]}));
    }

    #[test]
    fn test_entity_types_are_deduplicated() {
        let req = EntityExtractionRequest::new(
            "t",
            [EntityType::Location, EntityType::Person, EntityType::Location],
        );
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["entity_types"], json!(["PERSON", "LOCATION"]));
    }

    #[test]
    fn test_relationship_strength_normalized() {
        let rel: ExtractedRelationship = serde_json::from_value(json!({
            "source_entity": "NEO",
            "target_entity": "MORPHEUS",
            "relationship_description": "mentored by",
            "relationship_strength": 8.6
        }))
        .unwrap();
        assert_eq!(rel.relationship_strength, 9);

        let rel: ExtractedRelationship = serde_json::from_value(json!({
            "source_entity": "A",
            "target_entity": "B",
            "relationship_strength": 42
        }))
        .unwrap();
        assert_eq!(rel.relationship_strength, 10);
    }

    #[test]
    fn test_stepback_response_decodes() {
        let resp: RagQueryResponse = serde_json::from_value(json!({
            "original_question": "Who directed The Matrix?",
            "stepback_question": "What films did the Wachowskis make?",
            "retrieved_documents": [{"text": "The Matrix (1999)", "score": 0.91, "id": "c1"}],
            "answer": "The Wachowskis.",
            "search_type": "stepback_rag"
        }))
        .unwrap();
        assert_eq!(resp.search_type, SearchType::Stepback);
        assert_eq!(resp.retrieved_documents.len(), 1);
        assert!(resp.stepback_question.is_some());
    }

    #[test]
    fn test_cypher_request_sends_empty_hints() {
        let body = serde_json::to_value(CypherQueryRequest::new("Who acted in Heat?")).unwrap();
        assert_eq!(
            body,
            json!({"question": "Who acted in Heat?", "terminology": "", "examples": ""})
        );
    }

    #[test]
    fn test_graph_rag_request_omits_mode() {
        let req = GraphRagRequest::new("main themes?", GraphRagMode::Local);
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"question": "main themes?"}));
        assert_eq!(req.mode.path(), "/api/graph-rag/local");
    }

    #[test]
    fn test_contract_extraction_partial() {
        let c: ContractExtraction = serde_json::from_value(json!({
            "contract_type": "Service Agreement",
            "effective_date": "2024-01-01",
            "contract_scope": "Consulting",
            "parties": [{"name": "Acme", "role": "Provider", "location": {"city": "Austin", "state": "TX"}}]
        }))
        .unwrap();
        assert!(c.total_amount.is_none());
        assert!(c.governing_law.is_none());
        assert_eq!(c.parties[0].location.display(), "Austin, TX");
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("person"), Some(EntityType::Person));
        assert_eq!(EntityType::parse(" EVENT "), Some(EntityType::Event));
        assert_eq!(EntityType::parse("planet"), None);
    }
}
