//! Async executor for view effects.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐  Effects   ┌──────────────────────────────┐
//! │  ViewModel    │ ─────────► │ Driver                       │
//! │  (sync state) │            │  ├── JoinSet (one task each) │
//! │               │ ◄───────── │  └── mpsc::Receiver<Outcome> │
//! └───────────────┘  Outcome   └──────────────────────────────┘
//! ```
//!
//! Each request effect runs on its own task and reports one [`Outcome`].
//! A new search cancels the previous one through a [`CancellationToken`];
//! the cancelled task reports [`ApiError::Cancelled`], which the view drops
//! because its token is no longer the latest.
//!
//! Plot events are forwarded as the visualization sends them, so a
//! visualization that keeps running after its layout is ready still
//! clears the loading state and can request navigation.

use std::sync::Arc;

use cv_api::{ApiError, AppStore, CuratedGroupApi, GroupBackend, SearchBackend, SearchQuery};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::effect::{Effect, Effects, Outcome, RequestToken, ViewModel};
use crate::error::ViewError;
use crate::plot::Visualization;

enum Next {
    Outcome(Outcome),
    Joined(Result<(), JoinError>),
    Idle,
}

/// Runs view effects against the collaborators.
pub struct Driver<B, S, V> {
    api: CuratedGroupApi<B, S>,
    visualization: Arc<V>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
    tasks: JoinSet<()>,
    search_in_flight: Option<CancellationToken>,
    scroll_requests: usize,
}

impl<B, S, V> Driver<B, S, V>
where
    B: GroupBackend + SearchBackend + 'static,
    S: AppStore + 'static,
    V: Visualization,
{
    /// Creates a driver over `api` and `visualization`.
    pub fn new(api: CuratedGroupApi<B, S>, visualization: Arc<V>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            api,
            visualization,
            outcomes_tx,
            outcomes_rx,
            tasks: JoinSet::new(),
            search_in_flight: None,
            scroll_requests: 0,
        }
    }

    /// Returns the curated group API.
    pub const fn api(&self) -> &CuratedGroupApi<B, S> {
        &self.api
    }

    /// Returns how many scroll-to-top requests were handled.
    pub const fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    /// Returns the number of effect tasks still running.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Starts `effects` and applies outcomes to `view` until nothing is
    /// left running.
    pub async fn run<M: ViewModel>(&mut self, view: &mut M, effects: Effects) -> Result<(), ViewError> {
        self.execute(effects);
        self.settle(view).await
    }

    /// Starts `effects` without waiting for them.
    pub fn execute(&mut self, effects: Effects) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    /// Applies outcomes to `view`, including outcomes of follow-up
    /// effects, until no task is left running.
    pub async fn settle<M: ViewModel>(&mut self, view: &mut M) -> Result<(), ViewError> {
        loop {
            // Tasks report before they finish, so once every task has been
            // joined its outcome is already queued.
            while let Ok(outcome) = self.outcomes_rx.try_recv() {
                let effects = view.apply(outcome);
                self.execute(effects);
            }
            if self.tasks.is_empty() {
                return Ok(());
            }

            let next = tokio::select! {
                biased;
                Some(outcome) = self.outcomes_rx.recv() => Next::Outcome(outcome),
                Some(joined) = self.tasks.join_next() => Next::Joined(joined),
                else => Next::Idle,
            };

            match next {
                Next::Outcome(outcome) => {
                    let effects = view.apply(outcome);
                    self.execute(effects);
                }
                Next::Joined(joined) => joined?,
                Next::Idle => return Ok(()),
            }
        }
    }

    fn spawn(&mut self, effect: Effect) {
        trace!(?effect, "effect");
        match effect {
            Effect::FetchGroup { id, order_by, page } => {
                let api = self.api.clone();
                let tx = self.outcomes_tx.clone();
                self.tasks.spawn(async move {
                    let result = api.get_group(id, order_by, page).await;
                    report(&tx, Outcome::GroupLoaded(result));
                });
            }
            Effect::RemoveStudent { id, sid } => {
                let api = self.api.clone();
                let tx = self.outcomes_tx.clone();
                self.tasks.spawn(async move {
                    let result = api.remove_student(id, &sid).await;
                    report(&tx, Outcome::StudentRemoved { sid, result });
                });
            }
            Effect::Search { token, query } => self.spawn_search(token, query),
            Effect::RefreshPlot {
                generation,
                students,
            } => {
                let visualization = Arc::clone(&self.visualization);
                let tx = self.outcomes_tx.clone();
                self.tasks.spawn(async move {
                    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
                    let forward = async {
                        while let Some(event) = events_rx.recv().await {
                            report(&tx, Outcome::Plot { generation, event });
                        }
                    };
                    tokio::join!(visualization.refresh(students, events_tx), forward);
                });
            }
            Effect::ScrollToTop => {
                self.scroll_requests += 1;
                trace!("scroll to top");
            }
        }
    }

    fn spawn_search(&mut self, token: RequestToken, query: SearchQuery) {
        let cancel = CancellationToken::new();
        if let Some(previous) = self.search_in_flight.replace(cancel.clone()) {
            debug!(%token, "superseding search in flight");
            previous.cancel();
        }

        let api = self.api.clone();
        let tx = self.outcomes_tx.clone();
        self.tasks.spawn(async move {
            let result = tokio::select! {
                () = cancel.cancelled() => Err(ApiError::Cancelled),
                result = api.search(&query) => result,
            };
            report(&tx, Outcome::SearchCompleted { token, result });
        });
    }
}

fn report(tx: &mpsc::UnboundedSender<Outcome>, outcome: Outcome) {
    if tx.send(outcome).is_err() {
        debug!("driver dropped before outcome was reported");
    }
}
