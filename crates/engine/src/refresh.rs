//! Serialized item refreshes.
//!
//! At most one fetch is in flight per sidebar. Starting a new refresh aborts
//! the previous task and bumps the generation; an outcome that still arrives
//! from an older generation is discarded, so the tree is only ever written by
//! the latest request and only from the UI loop that calls [`RefreshCoordinator::accept`].

use std::future::Future;

use navtree_types::SidebarItem;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::DataSourceError;

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    /// Initial or changed `data-source`.
    DataSource,
    /// `api-endpoint` polling tick.
    Poll,
    /// Explicit host request.
    Manual,
}

#[derive(Debug)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub origin: RefreshOrigin,
    pub result: Result<Vec<SidebarItem>, DataSourceError>,
}

#[derive(Debug)]
pub struct RefreshCoordinator {
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    sender: mpsc::UnboundedSender<RefreshOutcome>,
}

impl RefreshCoordinator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RefreshOutcome>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                generation: 0,
                in_flight: None,
                sender,
            },
            receiver,
        )
    }

    /// Start a refresh, superseding any in-flight one. Must run inside a Tokio runtime.
    pub fn start<F>(&mut self, origin: RefreshOrigin, fetch: F) -> u64
    where
        F: Future<Output = Result<Vec<SidebarItem>, DataSourceError>> + Send + 'static,
    {
        if let Some(previous) = self.in_flight.take() {
            debug!(generation = self.generation, "superseding in-flight sidebar refresh");
            previous.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        let sender = self.sender.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = fetch.await;
            let _ = sender.send(RefreshOutcome {
                generation,
                origin,
                result,
            });
        }));
        generation
    }

    /// Accept an outcome delivered on the receiver. Stale generations yield `None`.
    pub fn accept(&mut self, outcome: RefreshOutcome) -> Option<(RefreshOrigin, Result<Vec<SidebarItem>, DataSourceError>)> {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding superseded sidebar refresh"
            );
            return None;
        }
        self.in_flight = None;
        Some((outcome.origin, outcome.result))
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Abort the in-flight refresh, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            self.generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn items(id: &str) -> Vec<SidebarItem> {
        vec![SidebarItem::new(id, id)]
    }

    #[tokio::test]
    async fn delivers_the_latest_refresh() {
        let (mut coordinator, mut receiver) = RefreshCoordinator::new();
        coordinator.start(RefreshOrigin::Manual, async { Ok(items("a")) });
        assert!(coordinator.is_loading());

        let outcome = receiver.recv().await.unwrap();
        let (origin, result) = coordinator.accept(outcome).unwrap();
        assert_eq!(origin, RefreshOrigin::Manual);
        assert_eq!(result.unwrap()[0].id, "a");
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn superseded_refresh_is_aborted() {
        let (mut coordinator, mut receiver) = RefreshCoordinator::new();
        coordinator.start(RefreshOrigin::Poll, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(items("slow"))
        });
        let latest = coordinator.start(RefreshOrigin::Manual, async { Ok(items("fast")) });

        let outcome = receiver.recv().await.unwrap();
        assert_eq!(outcome.generation, latest);
        let (_, result) = coordinator.accept(outcome).unwrap();
        assert_eq!(result.unwrap()[0].id, "fast");
    }

    #[tokio::test]
    async fn stale_outcomes_are_discarded() {
        let (mut coordinator, _receiver) = RefreshCoordinator::new();
        coordinator.start(RefreshOrigin::Manual, async { Ok(items("a")) });
        coordinator.start(RefreshOrigin::Manual, async { Ok(items("b")) });
        let stale = RefreshOutcome {
            generation: 1,
            origin: RefreshOrigin::Manual,
            result: Ok(items("a")),
        };
        assert!(coordinator.accept(stale).is_none());
    }
}
