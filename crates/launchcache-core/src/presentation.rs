//! Presentation state for the launch list.
//!
//! `LaunchFeed` owns the observable `PresentationState` and the handle of
//! the retrieval task driving it. At most one retrieval runs per feed;
//! triggers arriving while one is in flight are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::LaunchRecord;
use crate::retrieval::{LoadError, RetrievalService};

/// What the UI should show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PresentationState {
    #[default]
    Uninitialized,
    Loading,
    Error,
    Content(Vec<LaunchRecord>),
}

impl PresentationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PresentationState::Loading)
    }

    /// True once a retrieval has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        matches!(self, PresentationState::Content(_) | PresentationState::Error)
    }

    pub fn launches(&self) -> Option<&[LaunchRecord]> {
        match self {
            PresentationState::Content(launches) => Some(launches.as_slice()),
            _ => None,
        }
    }

    fn from_result(result: Result<Vec<LaunchRecord>, LoadError>) -> Self {
        match result {
            Ok(launches) => PresentationState::Content(launches),
            Err(_) => PresentationState::Error,
        }
    }
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
    /// State to restore if the retrieval is cancelled
    previous: PresentationState,
}

#[derive(Default)]
struct TaskSlot {
    generation: u64,
    current: Option<InFlight>,
}

struct FeedShared {
    state: watch::Sender<PresentationState>,
    slot: Mutex<TaskSlot>,
}

impl FeedShared {
    fn slot(&self) -> MutexGuard<'_, TaskSlot> {
        // A panic while holding the slot cannot leave it half-written
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish the outcome of retrieval `generation`, unless it was cancelled
    /// or superseded in the meantime.
    fn finish(&self, generation: u64, next: PresentationState) {
        let mut slot = self.slot();
        match slot.current.as_ref() {
            Some(in_flight) if in_flight.generation == generation => {
                slot.current = None;
                self.state.send_replace(next);
            }
            _ => debug!(generation, "Discarding result of cancelled retrieval"),
        }
    }
}

/// Owner of the presentation state and the retrieval task handle.
///
/// Dropping the feed cancels any retrieval still in flight.
pub struct LaunchFeed {
    service: Arc<RetrievalService>,
    shared: Arc<FeedShared>,
}

impl LaunchFeed {
    pub fn new(service: Arc<RetrievalService>) -> Self {
        let (state, _) = watch::channel(PresentationState::Uninitialized);
        Self {
            service,
            shared: Arc::new(FeedShared {
                state,
                slot: Mutex::new(TaskSlot::default()),
            }),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> PresentationState {
        self.shared.state.borrow().clone()
    }

    /// Observe every state transition
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.shared.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.slot().current.is_some()
    }

    /// Start a retrieval. Returns `false` (and changes nothing) when one is
    /// already in flight. Must be called from within a tokio runtime.
    pub fn trigger(&self, force_reload: bool) -> bool {
        let mut slot = self.shared.slot();
        if slot.current.is_some() {
            debug!(force_reload, "Retrieval already in flight, ignoring trigger");
            return false;
        }

        slot.generation += 1;
        let generation = slot.generation;
        let previous = self.shared.state.send_replace(PresentationState::Loading);
        info!(generation, force_reload, "Retrieval started");

        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let result = service.retrieve(force_reload).await;
            shared.finish(generation, PresentationState::from_result(result));
        });

        slot.current = Some(InFlight {
            generation,
            handle,
            previous,
        });
        true
    }

    /// Abort the in-flight retrieval, if any, and restore the state shown
    /// before it started.
    pub fn cancel(&self) {
        let mut slot = self.shared.slot();
        if let Some(in_flight) = slot.current.take() {
            in_flight.handle.abort();
            self.shared.state.send_replace(in_flight.previous);
            info!(generation = in_flight.generation, "Retrieval cancelled");
        }
    }
}

impl Drop for LaunchFeed {
    fn drop(&mut self) {
        self.cancel();
    }
}
