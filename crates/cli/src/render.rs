//! Plain-text rendering of backend results for the terminal.

use api::{
    AgenticRagResponse, ConstraintsReport, ContractExtraction, ContractGraphQuery,
    ContractGraphStatistics, CypherQueryResponse, DocumentCounts, DocumentIngested,
    EntityExtractionResult, EntityGraph, GraphRagResponse, MetricsSnapshot, RagQueryResponse,
    StatisticsSnapshot, StatusMessage, ToolDescriptor,
};
use std::fmt::Write;

pub fn rag(resp: &RagQueryResponse) -> String {
    let mut out = String::new();
    if let Some(stepback) = &resp.stepback_question {
        let _ = writeln!(out, "Step-back question: {stepback}");
    }
    let _ = writeln!(out, "{}", resp.answer);
    if !resp.retrieved_documents.is_empty() {
        let _ = writeln!(out, "\nSources ({}, {}):", resp.retrieved_documents.len(), resp.search_type);
        for (i, doc) in resp.retrieved_documents.iter().enumerate() {
            let _ = writeln!(out, "  [{}] score {:.3}  {}", i + 1, doc.score, excerpt(&doc.text, 100));
        }
    }
    out
}

pub fn cypher(resp: &CypherQueryResponse) -> String {
    let mut out = format!("Cypher:\n  {}\n", resp.cypher_query);
    if let Some(answer) = &resp.answer {
        let _ = writeln!(out, "\n{answer}");
    }
    let _ = writeln!(out, "\n{} row(s)", resp.results.len());
    for row in &resp.results {
        let _ = writeln!(out, "  {row}");
    }
    out
}

pub fn agentic(resp: &AgenticRagResponse) -> String {
    let mut out = format!("{}\n", resp.answer);
    let _ = writeln!(out, "\nRetrieval steps: {}", resp.retrieval_steps);
    if !resp.critique_questions.is_empty() {
        let _ = writeln!(out, "Follow-up questions asked by the critic:");
        for q in &resp.critique_questions {
            let _ = writeln!(out, "  - {q}");
        }
    }
    out
}

pub fn tools(tools: &[ToolDescriptor]) -> String {
    let mut out = String::new();
    for tool in tools {
        let _ = writeln!(out, "{}  {}", tool.name, tool.description);
        if !tool.parameters.required.is_empty() {
            let _ = writeln!(out, "    requires: {}", tool.parameters.required.join(", "));
        }
    }
    out
}

pub fn entities(result: &EntityExtractionResult) -> String {
    let mut out = format!("Entities ({}):\n", result.entities.len());
    for e in &result.entities {
        let _ = writeln!(out, "  {} [{}]  {}", e.entity_name, e.entity_type, e.entity_description);
    }
    let _ = writeln!(out, "Relationships ({}):", result.relationships.len());
    for r in &result.relationships {
        let _ = writeln!(
            out,
            "  {} -> {}  ({}/10)  {}",
            r.source_entity, r.target_entity, r.relationship_strength, r.relationship_description
        );
    }
    out
}

pub fn entity_graph(graph: &EntityGraph) -> String {
    let mut out = format!(
        "{} node(s), {} edge(s)\n",
        graph.stats.total_nodes, graph.stats.total_edges
    );
    let mut nodes: Vec<_> = graph.nodes.iter().collect();
    nodes.sort_by(|a, b| b.degree.cmp(&a.degree));
    for node in nodes.iter().take(20) {
        let _ = writeln!(out, "  {} [{}] degree {}", node.label, node.node_type, node.degree);
    }
    out
}

pub fn contract(c: &ContractExtraction) -> String {
    let mut out = format!("Type: {}\n", c.contract_type);
    if let Some(d) = &c.effective_date {
        let _ = writeln!(out, "Effective: {d}");
    }
    if let Some(d) = &c.end_date {
        let _ = writeln!(out, "Ends: {d}");
    }
    if let Some(amount) = c.total_amount {
        let _ = writeln!(out, "Total amount: {amount:.2}");
    }
    if let Some(scope) = &c.contract_scope {
        let _ = writeln!(out, "Scope: {scope}");
    }
    for party in &c.parties {
        let role = party.role.as_deref().unwrap_or("party");
        let _ = writeln!(out, "  {} ({role})  {}", party.name, party.location.display());
    }
    if let Some(law) = &c.governing_law {
        let _ = writeln!(out, "Governing law: {}", law.display());
    }
    out
}

pub fn graph_rag(resp: &GraphRagResponse) -> String {
    format!("{}\n\n({})\n", resp.answer, resp.search_type)
}

/// Louvain summary: community count plus size distribution when present.
pub fn communities(reply: &StatusMessage) -> String {
    let Some(count) = reply.extra.get("communityCount").and_then(|c| c.as_u64()) else {
        return format!("{}\n", reply.summary());
    };
    let mut out = format!("{count} communities detected\n");
    if let Some(dist) = reply.extra.get("communityDistribution") {
        let sizes: Vec<String> = ["min", "max", "mean"]
            .into_iter()
            .filter_map(|k| dist.get(k).and_then(|v| v.as_f64()).map(|v| format!("{k} {v:.1}")))
            .collect();
        if !sizes.is_empty() {
            let _ = writeln!(out, "Community size: {}", sizes.join(", "));
        }
    }
    out
}

pub fn ingested(doc: &DocumentIngested) -> String {
    format!(
        "{} (document {}, {} chunks)\n",
        doc.message.as_deref().unwrap_or("Processed"),
        doc.document_id,
        doc.chunks_count
    )
}

pub fn counts(c: &DocumentCounts) -> String {
    format!(
        "documents {}  chunks {}  parents {}  children {}  total {}\n",
        c.documents, c.chunks, c.parents, c.children, c.total_chunks
    )
}

/// Counts sorted by size, largest first.
pub fn statistics(s: &StatisticsSnapshot) -> String {
    let mut out = format!(
        "{} node(s), {} relationship(s)\n",
        s.total_nodes, s.total_relationships
    );
    for (title, counts) in [("Nodes", &s.node_counts), ("Relationships", &s.relationship_counts)] {
        let mut rows: Vec<_> = counts.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let _ = writeln!(out, "{title}:");
        for (label, count) in rows {
            let _ = writeln!(out, "  {label:<24} {count}");
        }
    }
    out
}

pub fn contract_statistics(s: &ContractGraphStatistics) -> String {
    format!(
        "contracts {}  organizations {}  locations {}  party links {}  location links {}\n",
        s.contracts, s.organizations, s.locations, s.party_relationships, s.location_relationships
    )
}

pub fn constraints(report: &ConstraintsReport) -> String {
    let mut out = String::new();
    if let Some(message) = &report.message {
        let _ = writeln!(out, "{message}");
    }
    for c in &report.constraints {
        match &c.error {
            Some(err) => {
                let _ = writeln!(out, "  [{}] {}  {err}", c.status, c.query);
            }
            None => {
                let _ = writeln!(out, "  [{}] {}", c.status, c.query);
            }
        }
    }
    out
}

pub fn contract_query(q: &ContractGraphQuery) -> String {
    let mut out = format!("Cypher:\n  {}\n\n{}\n", q.cypher_query, q.answer);
    for row in &q.results {
        let _ = writeln!(out, "  {row}");
    }
    out
}

pub fn metrics(m: &MetricsSnapshot) -> String {
    format!(
        "requests {}  ok {}  failed {} ({} transport)  avg {:.0} ms  max {:.0} ms\n",
        m.total_requests,
        m.successful_requests,
        m.failed_requests,
        m.transport_failures,
        m.avg_latency_ms,
        m.max_latency_ms
    )
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_excerpt_flattens_and_truncates() {
        assert_eq!(excerpt("a\n  b", 10), "a b");
        assert_eq!(excerpt("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_communities_shows_count() {
        let reply: StatusMessage = serde_json::from_value(serde_json::json!({
            "communityCount": 7,
            "communityDistribution": {"min": 1, "max": 12, "mean": 4.3, "p50": 3},
            "projection": {"graph": "entity", "nodes": 30, "rels": 41}
        }))
        .unwrap();
        assert_eq!(
            communities(&reply),
            "7 communities detected\nCommunity size: min 1.0, max 12.0, mean 4.3\n"
        );

        let plain: StatusMessage =
            serde_json::from_value(serde_json::json!({"message": "ok"})).unwrap();
        assert_eq!(communities(&plain), "ok\n");
    }

    #[test]
    fn test_statistics_sorted_by_count() {
        let snapshot = StatisticsSnapshot {
            node_counts: BTreeMap::from([
                ("Chunk".to_string(), 12),
                ("Person".to_string(), 133),
                ("Movie".to_string(), 38),
            ]),
            total_nodes: 183,
            ..StatisticsSnapshot::default()
        };
        let text = statistics(&snapshot);
        let person = text.find("Person").unwrap();
        let movie = text.find("Movie").unwrap();
        let chunk = text.find("Chunk").unwrap();
        assert!(person < movie && movie < chunk);
        assert!(text.starts_with("183 node(s)"));
    }
}
