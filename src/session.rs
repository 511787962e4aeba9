//! Search session state machine.
//!
//! `Idle --submit--> Searching --outcome--> Idle`. The network call runs on a
//! spawned task and reports back over a oneshot channel which the UI loop
//! polls, so at most one request is ever in flight per session.

use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{error, info, warn};

use crate::constants::constants;
use crate::render::render;
use crate::results::{ResponseError, normalize_value};
use crate::transport::{Method, Transport, TransportError};
use crate::view::View;

type Outcome = Result<Value, TransportError>;

/// A trimmed, non-empty query. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  text: String,
  max_per_page: u32,
}

impl Query {
  pub fn new(input: &str, max_per_page: u32) -> Option<Self> {
    let text = input.trim();
    if text.is_empty() {
      return None;
    }
    Some(Self { text: text.to_string(), max_per_page })
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn to_payload(&self) -> Value {
    json!({ "q": self.text, "max_per_page": self.max_per_page })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
  Started,
  /// A search is already in flight; the submit was dropped.
  Rejected,
  EmptyQuery,
}

#[derive(Debug, Error)]
pub enum SearchError {
  #[error(transparent)]
  Transport(#[from] TransportError),
  #[error(transparent)]
  Response(#[from] ResponseError),
  #[error("search task ended without reporting")]
  TaskLost,
}

enum SessionState {
  Idle,
  Searching { rx: oneshot::Receiver<Outcome> },
}

pub struct SearchSession<T: Transport> {
  transport: T,
  endpoint: String,
  max_per_page: u32,
  state: SessionState,
}

impl<T: Transport> SearchSession<T> {
  pub fn new(transport: T, endpoint: String, max_per_page: u32) -> Self {
    Self { transport, endpoint, max_per_page, state: SessionState::Idle }
  }

  pub fn is_searching(&self) -> bool {
    matches!(self.state, SessionState::Searching { .. })
  }

  /// Start a search. Must be called from within a tokio runtime.
  pub fn submit(&mut self, input: &str, view: &mut impl View) -> SubmitOutcome {
    if self.is_searching() {
      return SubmitOutcome::Rejected;
    }
    let Some(query) = Query::new(input, self.max_per_page) else {
      return SubmitOutcome::EmptyQuery;
    };

    info!(query = %query.text(), endpoint = %self.endpoint, "search triggered");
    view.collapse_chrome();
    view.clear_results();
    view.set_loader_visible(true);

    let transport = self.transport.clone();
    let url = self.endpoint.clone();
    let payload = query.to_payload();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(transport.request(Method::Post, &url, Some(payload)).await);
    });
    self.state = SessionState::Searching { rx };
    SubmitOutcome::Started
  }

  /// Non-blocking check for a finished search. Returns the number of rendered
  /// results, or the error behind the failure notice.
  pub fn poll(&mut self, view: &mut impl View) -> Option<Result<usize, SearchError>> {
    let SessionState::Searching { rx } = &mut self.state else {
      return None;
    };
    let outcome = match rx.try_recv() {
      Ok(outcome) => Some(outcome),
      Err(TryRecvError::Empty) => return None,
      Err(TryRecvError::Closed) => None,
    };
    Some(self.finish(outcome, view))
  }

  /// Wait for the in-flight search, if any.
  pub async fn settle(&mut self, view: &mut impl View) -> Option<Result<usize, SearchError>> {
    let SessionState::Searching { rx } = std::mem::replace(&mut self.state, SessionState::Idle) else {
      return None;
    };
    let outcome = rx.await.ok();
    Some(self.finish(outcome, view))
  }

  fn finish(&mut self, outcome: Option<Outcome>, view: &mut impl View) -> Result<usize, SearchError> {
    self.state = SessionState::Idle;
    view.set_loader_visible(false);

    let results = match outcome {
      Some(outcome) => outcome.map_err(SearchError::from).and_then(|value| Ok(normalize_value(value)?)),
      None => Err(SearchError::TaskLost),
    };

    match results {
      Ok(results) => {
        info!(count = results.len(), "search complete");
        render(view, &results);
        Ok(results.len())
      }
      Err(e) => {
        match &e {
          SearchError::TaskLost => error!("search: task dropped its channel"),
          other => warn!(err = %other, "search failed"),
        }
        view.notify_failure(&constants().failure_notice);
        Err(e)
      }
    }
  }
}
