use api::ApiError;
use serde::Serialize;
use thiserror::Error;

/// Error as a page shows it: optional HTTP status plus the message to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct PageError {
    pub status: Option<u16>,
    pub message: String,
}

impl PageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// One-line notification text.
    pub fn toast(&self) -> String {
        match self.status {
            None => format!("Could not reach the backend: {}", self.message),
            // 2xx with an in-band error payload
            Some(status) if status < 400 => format!("Backend error: {}", self.message),
            Some(status) => format!("Request failed ({status}): {}", self.message),
        }
    }

    /// Multi-line panel shown inline on extraction pages.
    pub fn inline_panel(&self, action: &str) -> String {
        let mut panel = format!("{action} failed\n  {}", self.message);
        if let Some(status) = self.status {
            panel.push_str(&format!("\n  HTTP status: {status}"));
        }
        panel
    }
}

impl From<&ApiError> for PageError {
    fn from(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            message: err.message().to_string(),
        }
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        Self::from(&err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Error,
}

/// How a page reconciles responses that settle out of submission order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseOrdering {
    /// Only the most recently issued request may update the view.
    #[default]
    LatestSubmitted,
    /// Whatever settles last wins, regardless of when it was submitted.
    LastResolved,
}

/// Sequence number handed out when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Applied,
    /// Superseded by a later submission and dropped.
    Discarded,
    /// A destructive action was not confirmed, so nothing was sent.
    Cancelled,
}

/// View state of one slice of a page: `idle -> submitting -> {success, error}`.
///
/// A failure never clears the last successful result; it stays visible next to
/// the error.
#[derive(Debug, Clone)]
pub struct PageState<T> {
    phase: Phase,
    result: Option<T>,
    error: Option<PageError>,
    ordering: ResponseOrdering,
    issued: u64,
    pending: usize,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self::new(ResponseOrdering::default())
    }
}

impl<T> PageState<T> {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            error: None,
            ordering,
            issued: 0,
            pending: 0,
        }
    }

    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.pending += 1;
        self.phase = Phase::Submitting;
        Ticket(self.issued)
    }

    pub fn settle(&mut self, ticket: Ticket, outcome: Result<T, PageError>) -> Settle {
        self.pending = self.pending.saturating_sub(1);

        if self.ordering == ResponseOrdering::LatestSubmitted && ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding superseded response"
            );
            return Settle::Discarded;
        }

        match outcome {
            Ok(value) => {
                self.result = Some(value);
                self.error = None;
                self.phase = Phase::Success;
            }
            Err(err) => {
                self.error = Some(err);
                self.phase = Phase::Error;
            }
        }
        Settle::Applied
    }

    /// Convenience for settling straight from a domain call.
    pub fn settle_api(&mut self, ticket: Ticket, outcome: api::Result<T>) -> Settle {
        self.settle(ticket, outcome.map_err(PageError::from))
    }

    /// Editing an input returns a settled page to idle.
    pub fn input_changed(&mut self) {
        if matches!(self.phase, Phase::Success | Phase::Error) {
            self.phase = Phase::Idle;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&PageError> {
        if self.phase == Phase::Error {
            self.error.as_ref()
        } else {
            None
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending
    }

    /// Drop everything, e.g. after a destructive reset.
    pub fn clear(&mut self) {
        self.result = None;
        self.error = None;
        if self.pending == 0 {
            self.phase = Phase::Idle;
        }
    }
}
