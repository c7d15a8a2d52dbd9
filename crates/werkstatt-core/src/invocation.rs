// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool invocation — the processing/complete/error state every tool page
// shares, wrapped once around a pure operation.

use tracing::{debug, info, warn};

use crate::config::ToolDefaults;
use crate::error::Result;
use crate::history::{HistoryEntry, HistoryStore};

/// Lifecycle of a single tool page's current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// Nothing has run yet.
    Idle,
    /// The operation is executing.
    Processing,
    /// The last run succeeded.
    Complete,
    /// The last run failed; see [`ToolInvocation::last_error`].
    Failed,
}

type Operation<'a, P, R> = Box<dyn Fn(P) -> Result<R> + 'a>;
type Listener<'a> = Box<dyn FnMut(ToolStatus) + 'a>;

struct HistorySink<'a, R> {
    store: Box<dyn HistoryStore + 'a>,
    cap: usize,
    describe: Box<dyn Fn(&R) -> HistoryEntry + 'a>,
}

/// Runs one tool's operation and tracks its status.
///
/// The operation itself stays a pure function of its parameters; this wrapper
/// owns the status transitions, notifies subscribers, and optionally records
/// successful runs in an injected [`HistoryStore`].
pub struct ToolInvocation<'a, P, R> {
    name: String,
    operation: Operation<'a, P, R>,
    status: ToolStatus,
    last_error: Option<String>,
    listeners: Vec<Listener<'a>>,
    history: Option<HistorySink<'a, R>>,
}

impl<'a, P, R> ToolInvocation<'a, P, R> {
    pub fn new(name: impl Into<String>, operation: impl Fn(P) -> Result<R> + 'a) -> Self {
        Self {
            name: name.into(),
            operation: Box::new(operation),
            status: ToolStatus::Idle,
            last_error: None,
            listeners: Vec::new(),
            history: None,
        }
    }

    /// Record each successful run in `store`, keeping at most `cap` entries.
    pub fn with_history(
        mut self,
        store: impl HistoryStore + 'a,
        cap: usize,
        describe: impl Fn(&R) -> HistoryEntry + 'a,
    ) -> Self {
        self.history = Some(HistorySink {
            store: Box::new(store),
            cap,
            describe: Box::new(describe),
        });
        self
    }

    /// [`with_history`](Self::with_history) capped at `defaults.history_cap`.
    pub fn with_default_history(
        self,
        store: impl HistoryStore + 'a,
        defaults: &ToolDefaults,
        describe: impl Fn(&R) -> HistoryEntry + 'a,
    ) -> Self {
        self.with_history(store, defaults.history_cap, describe)
    }

    /// Call `listener` on every status transition.
    pub fn subscribe(&mut self, listener: impl FnMut(ToolStatus) + 'a) {
        self.listeners.push(Box::new(listener));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ToolStatus {
        self.status
    }

    /// Message of the most recent failure, cleared when a new run starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Recent runs from the attached history store, if any.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        match &self.history {
            Some(sink) => sink.store.list(),
            None => Ok(Vec::new()),
        }
    }

    /// Run the operation once with `params`.
    ///
    /// Errors are returned unchanged; the wrapper never retries.
    pub fn run(&mut self, params: P) -> Result<R> {
        self.last_error = None;
        self.transition(ToolStatus::Processing);
        info!(tool = %self.name, "Tool run started");

        let outcome = (self.operation)(params);

        match &outcome {
            Ok(result) => {
                if let Some(sink) = self.history.as_mut() {
                    let entry = (sink.describe)(result);
                    if let Err(err) = sink.store.append(entry, sink.cap) {
                        warn!(tool = %self.name, %err, "Could not record history entry");
                    }
                }
                self.transition(ToolStatus::Complete);
                debug!(tool = %self.name, "Tool run complete");
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.transition(ToolStatus::Failed);
                warn!(tool = %self.name, %err, "Tool run failed");
            }
        }

        outcome
    }

    fn transition(&mut self, status: ToolStatus) {
        self.status = status;
        for listener in &mut self.listeners {
            listener(status);
        }
    }
}
