use api::{DocumentCounts, DocumentIngested};

use crate::context::Context;
use crate::page::{PageError, PageState, Settle, Ticket};

/// PDF ingestion plus the chunk counters shown under the upload form.
pub struct DocumentsPage {
    ctx: Context,
    pub ingest: PageState<DocumentIngested>,
    pub counts: PageState<DocumentCounts>,
}

impl DocumentsPage {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            ingest: PageState::default(),
            counts: PageState::default(),
        }
    }

    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) -> Settle {
        if bytes.is_empty() {
            let ticket = self.ingest.begin();
            return self
                .ingest
                .settle(ticket, Err(PageError::new(format!("{file_name} is empty"))));
        }
        let ticket = self.ingest.begin();
        let outcome = self.ctx.client.pdf().upload(file_name, bytes).await;
        self.after_ingest(ticket, outcome).await
    }

    pub async fn download(&mut self, url: &str) -> Settle {
        let ticket = self.ingest.begin();
        let outcome = self.ctx.client.pdf().download(url).await;
        self.after_ingest(ticket, outcome).await
    }

    pub async fn refresh_counts(&mut self) -> Settle {
        let ticket = self.counts.begin();
        let outcome = self.ctx.client.rag().document_counts().await;
        self.counts.settle_api(ticket, outcome)
    }

    async fn after_ingest(
        &mut self,
        ticket: Ticket,
        outcome: api::Result<DocumentIngested>,
    ) -> Settle {
        let ingested = outcome.is_ok();
        let settled = self.ingest.settle_api(ticket, outcome);
        if ingested {
            self.ctx.invalidate_graph_caches();
            self.refresh_counts().await;
        }
        settled
    }
}
