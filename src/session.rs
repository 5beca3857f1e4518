//! Async driver wiring a provider, the expansion controller and a view sink
//!
//! All work happens on one cooperative thread; the only suspension points are
//! provider calls. Stale responses are dropped silently, fetch failures are
//! forwarded to the sink and returned so the caller can report them.
//!
//! [`TreeSession::expand`] borrows the session until its fetch resolves, so a
//! session runs one fetch at a time and cannot switch files mid-fetch. Callers
//! that need overlapping fetches drive [`ExpansionController`] directly: take
//! the [`FetchTicket`](crate::controller::FetchTicket) from
//! [`ExpansionController::expand`], await the provider on their own schedule
//! and hand the result to [`ExpansionController::complete_fetch`] in any order.

use crate::config::ViewConfig;
use crate::context::ViewContext;
use crate::controller::{ExpandOutcome, ExpansionController, ExpansionState};
use crate::error::TreeError;
use crate::node::NodeId;
use crate::provider::{CallTreeProvider, ProviderError};
use crate::record::RecentFile;
use crate::view::{TreeViewSink, ViewUpdate, VisibleRow};
use thiserror::Error;

/// Errors surfaced by a session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// One interactive call-tree view bound to a data provider
pub struct TreeSession<P, S> {
    provider: P,
    controller: ExpansionController,
    sink: S,
}

impl<P: CallTreeProvider, S: TreeViewSink> TreeSession<P, S> {
    pub fn new(provider: P, config: &ViewConfig, sink: S) -> Self {
        Self {
            provider,
            controller: ExpansionController::new(ViewContext::from_config(config)),
            sink,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn controller(&self) -> &ExpansionController {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn rows(&self) -> Vec<VisibleRow> {
        self.controller.visible_rows()
    }

    pub async fn recent_files(&self) -> Result<Vec<RecentFile>> {
        Ok(self.provider.recent_files().await?)
    }

    /// Open a trace file and show its top-level calls
    ///
    /// Returns the number of visible root calls. On failure the current view
    /// is left untouched.
    pub async fn open(&mut self, path: &str) -> Result<usize> {
        let calls = self.provider.top_level_calls(path).await?;
        let update = self.controller.open_file(path, &calls);
        let visible = match &update {
            ViewUpdate::Reset { rows } => rows.len(),
            _ => 0,
        };
        self.sink.apply(&update);
        tracing::info!("{}: {} of {} root calls visible", path, visible, calls.len());
        Ok(visible)
    }

    /// Re-open the file the provider reports as active
    pub async fn refresh(&mut self) -> Result<usize> {
        let active = self.provider.active_file().await?;
        self.open(&active.path).await
    }

    pub fn clear(&mut self) {
        let update = self.controller.clear();
        self.sink.apply(&update);
    }

    /// Expand a node, fetching its subcalls on first expansion
    pub async fn expand(&mut self, id: &NodeId) -> Result<()> {
        let outcome = self.controller.expand(id)?;
        if let Some(update) = outcome.update() {
            self.sink.apply(&update);
        }

        let ExpandOutcome::Fetch(ticket) = outcome else {
            return Ok(());
        };

        let response = self.provider.subcalls(&ticket.id).await;
        match self.controller.complete_fetch(&ticket, response) {
            Ok(update) => {
                self.sink.apply(&update);
                Ok(())
            }
            Err(TreeError::StaleResponse { .. }) => {
                tracing::debug!("Dropped stale subcalls for {}", ticket.id);
                Ok(())
            }
            Err(TreeError::FetchFailure { id, message }) => {
                self.sink.apply(&ViewUpdate::FetchFailed {
                    id: ticket.id.clone(),
                    message: message.clone(),
                });
                Err(TreeError::FetchFailure { id, message }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn collapse(&mut self, id: &NodeId) -> Result<()> {
        if let Some(update) = self.controller.collapse(id)? {
            self.sink.apply(&update);
        }
        Ok(())
    }

    /// Expand a collapsed node or collapse an expanded one
    pub async fn toggle(&mut self, id: &NodeId) -> Result<()> {
        match self.controller.state(id) {
            Some(ExpansionState::Expanded) => self.collapse(id),
            _ => self.expand(id).await,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.provider.shutdown().await?)
    }
}
