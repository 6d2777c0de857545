use api::{Health, StatusMessage};

use crate::confirm::{Confirm, RESET_DATABASE_PROMPT};
use crate::context::Context;
use crate::page::{PageState, Settle};

pub struct AdminPage {
    ctx: Context,
    pub reset: PageState<StatusMessage>,
    pub health: PageState<Health>,
}

impl AdminPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            reset: PageState::default(),
            health: PageState::default(),
        }
    }

    /// Wipes the graph database. Nothing is sent unless `confirm` agrees.
    pub async fn reset_database(&mut self, confirm: &dyn Confirm) -> Settle {
        if !confirm.confirm(RESET_DATABASE_PROMPT) {
            tracing::info!("database reset cancelled");
            return Settle::Cancelled;
        }
        let ticket = self.reset.begin();
        let outcome = self.ctx.client.database().reset().await;
        if outcome.is_ok() {
            self.ctx.invalidate_graph_caches();
        }
        self.reset.settle_api(ticket, outcome)
    }

    pub async fn check_health(&mut self) -> Settle {
        let ticket = self.health.begin();
        let outcome = self.ctx.client.stats().health().await;
        self.health.settle_api(ticket, outcome)
    }
}
