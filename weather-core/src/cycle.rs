//! The fetch-and-render cycle.
//!
//! At most one fetch is outstanding at a time; a trigger that arrives while
//! one is running is dropped rather than queued. Only the completion path
//! writes the display state.

use std::{
    future::Future,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::watch,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    display::{DisplaySink, DisplayState, DisplayUpdate},
    location::Location,
    provider::WeatherProvider,
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Outcome of asking the cycle to refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Another fetch was already running.
    Skipped,
    Completed(DisplayUpdate),
}

#[derive(Debug)]
pub struct FetchCycle {
    provider: Arc<dyn WeatherProvider>,
    state: Mutex<DisplayState>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FetchCycle {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(DisplayState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Fetch once for `location` and fold the result into the display state.
    pub async fn trigger(&self, location: &Location) -> Trigger {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!(%location, "fetch already in flight, skipping trigger");
            return Trigger::Skipped;
        };

        let result = self.provider.fetch_weather(location).await;
        if result.is_ok() {
            info!(%location, "weather updated");
        }

        Trigger::Completed(self.lock_state().apply(result))
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Copy of the current display state.
    pub fn state(&self) -> DisplayState {
        self.lock_state().clone()
    }

    /// Refresh on a fixed interval and whenever the selected location changes,
    /// until `shutdown` resolves. The first fetch happens immediately.
    pub async fn run_periodic<S, F>(
        &self,
        mut location: watch::Receiver<Location>,
        every: Duration,
        sink: &mut S,
        shutdown: F,
    ) where
        S: DisplaySink + ?Sized,
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut selector_open = true;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
                changed = location.changed(), if selector_open => {
                    if changed.is_err() {
                        selector_open = false;
                        continue;
                    }
                    ticker.reset();
                }
            }

            // Shutdown also abandons a fetch that is still waiting on the network.
            let current = *location.borrow_and_update();
            tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.trigger(&current) => {
                    if let Trigger::Completed(update) = outcome {
                        sink.present(&update);
                    }
                }
            }
        }

        debug!("periodic refresh stopped");
    }

    fn lock_state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
