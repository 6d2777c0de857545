use api::{ContractGraphStatistics, StatisticsSnapshot};

use crate::context::{Context, cache_keys};
use crate::page::{PageState, Settle};
use crate::poller::PollEvent;

/// Graph statistics dashboard. Fed either by explicit refreshes or by a
/// [`StatsPoller`](crate::poller::StatsPoller) through [`apply_poll`](Self::apply_poll).
pub struct StatisticsPage {
    ctx: Context,
    pub live: PageState<StatisticsSnapshot>,
    pub contracts: PageState<ContractGraphStatistics>,
    last_tick: u64,
}

impl StatisticsPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            live: PageState::default(),
            contracts: PageState::default(),
            last_tick: 0,
        }
    }

    /// `force` bypasses the results cache.
    pub async fn refresh(&mut self, force: bool) -> Settle {
        if force {
            self.ctx.cache.invalidate(cache_keys::STATS);
        }
        let ticket = self.live.begin();
        let client = &self.ctx.client;
        let outcome = self
            .ctx
            .cache
            .get_or_fetch(cache_keys::STATS, || async move { client.stats().snapshot().await })
            .await;
        self.live.settle_api(ticket, outcome)
    }

    pub fn apply_poll(&mut self, event: PollEvent) -> Settle {
        if let Ok(snapshot) = &event.result {
            self.ctx.cache.insert(cache_keys::STATS, snapshot);
        }
        self.last_tick = event.tick;
        let ticket = self.live.begin();
        self.live.settle(ticket, event.result)
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    pub async fn refresh_contracts(&mut self) -> Settle {
        let ticket = self.contracts.begin();
        let client = &self.ctx.client;
        let outcome = self
            .ctx
            .cache
            .get_or_fetch(cache_keys::CONTRACT_STATS, || async move {
                client.knowledge_graph().statistics().await
            })
            .await;
        self.contracts.settle_api(ticket, outcome)
    }

    /// Label/count rows sorted by count, largest first.
    pub fn node_rows(&self) -> Vec<(&str, u64)> {
        let Some(snapshot) = self.live.result() else {
            return Vec::new();
        };
        let mut rows: Vec<_> = snapshot
            .node_counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageError, Phase};
    use api::{ApiClient, ClientConfig};
    use std::collections::BTreeMap;

    fn ctx_for(server: &mockito::Server) -> Context {
        Context::new(ApiClient::new(ClientConfig::new(server.url())).unwrap())
    }

    const STATS_BODY: &str = r#"{
        "node_counts": {"Movie": 38, "Person": 133, "Chunk": 12},
        "relationship_counts": {"ACTED_IN": 172},
        "total_nodes": 183,
        "total_relationships": 172
    }"#;

    #[tokio::test]
    async fn test_refresh_uses_cache_until_forced() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/stats")
            .with_body(STATS_BODY)
            .expect(2)
            .create_async()
            .await;

        let mut page = StatisticsPage::new(ctx_for(&server));
        page.refresh(false).await;
        page.refresh(false).await;
        page.refresh(true).await;

        assert_eq!(page.live.result().unwrap().total_nodes, 183);
        assert_eq!(page.node_rows()[0], ("Person", 133));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_error_keeps_last_snapshot() {
        let server = mockito::Server::new_async().await;
        let mut page = StatisticsPage::new(ctx_for(&server));

        let snapshot = StatisticsSnapshot {
            node_counts: BTreeMap::from([("Movie".to_string(), 38)]),
            total_nodes: 38,
            ..StatisticsSnapshot::default()
        };
        page.apply_poll(PollEvent {
            tick: 1,
            result: Ok(snapshot),
        });
        page.apply_poll(PollEvent {
            tick: 2,
            result: Err(PageError::new("connection refused")),
        });

        assert_eq!(page.live.phase(), Phase::Error);
        assert_eq!(page.live.result().unwrap().total_nodes, 38);
        assert_eq!(page.last_tick(), 2);
    }
}
