//! Headless page controllers for the playground.
//!
//! Each page owns its inputs and one [`PageState`] per independently loading
//! slice. Pages share an [`api::ApiClient`] through [`Context`].

pub mod admin;
pub mod confirm;
pub mod context;
pub mod documents;
pub mod extraction;
pub mod page;
pub mod poller;
pub mod query;
pub mod router;
pub mod statistics;

pub use admin::AdminPage;
pub use confirm::{AssumeYes, Confirm};
pub use context::Context;
pub use documents::DocumentsPage;
pub use extraction::{ContractPage, EntityPage, KnowledgeGraphPage};
pub use page::{PageError, PageState, Phase, ResponseOrdering, Settle, Ticket};
pub use poller::{PollEvent, PollerError, StatsPoller};
pub use query::{AgenticRagPage, CypherPage, GraphRagPage, RagPage};
pub use router::{NavShell, Route};
pub use statistics::StatisticsPage;
