//! Panel tasks and stale-result rejection.
//!
//! Every panel keeps a [`PanelSlot`]. Starting a fetch issues a [`Ticket`]
//! tagged with a new generation and aborts the fetch it supersedes. When a
//! fetch completes, its result is only accepted if its ticket is still the
//! newest one, so a slow older fetch can never overwrite a newer result.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tracing::debug;
use tracing::warn;

/// A cancellation flag shared between a panel and its running fetch.
#[derive(Debug, Clone, Default)]
pub(crate) struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> AbortHandle {
        Self::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Identifies one fetch of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket {
    generation: u64,
}

#[derive(Debug)]
struct SlotState<T> {
    latest: u64,
    abort: AbortHandle,
    value: Option<T>,
}

/// The latest accepted result of a panel.
#[derive(Debug)]
pub(crate) struct PanelSlot<T> {
    name: &'static str,
    state: Mutex<SlotState<T>>,
}

impl<T> PanelSlot<T> {
    pub fn new(name: &'static str) -> PanelSlot<T> {
        Self {
            name,
            state: Mutex::new(SlotState {
                latest: 0,
                abort: AbortHandle::new(),
                value: None,
            }),
        }
    }

    /// Starts a new fetch, aborting the one in flight.
    pub fn begin(&self) -> (Ticket, AbortHandle) {
        let mut state = self.lock();

        state.abort.abort();
        state.abort = AbortHandle::new();
        state.latest += 1;

        debug!(panel = self.name, generation = state.latest, "fetch started");

        (
            Ticket {
                generation: state.latest,
            },
            state.abort.clone(),
        )
    }

    /// Stores `value` if `ticket` belongs to the newest fetch. Returns `false`
    /// and drops the value otherwise.
    pub fn complete(&self, ticket: Ticket, value: T) -> bool {
        let mut state = self.lock();

        if ticket.generation != state.latest {
            warn!(
                panel = self.name,
                generation = ticket.generation,
                latest = state.latest,
                "discarding stale panel result"
            );
            return false;
        }

        state.value = Some(value);
        true
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn into_inner(self) -> Option<T> {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .value
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs one fetch of a panel and stores its result.
///
/// `task` receives the abort handle of the fetch. A result produced after the
/// fetch was aborted or superseded is discarded.
pub(crate) fn run<T, F>(slot: &PanelSlot<T>, task: F) -> bool
where
    F: FnOnce(&AbortHandle) -> T,
{
    let (ticket, abort) = slot.begin();
    let value = task(&abort);

    if abort.is_aborted() {
        debug!(panel = slot.name(), "discarding aborted panel result");
        return false;
    }

    slot.complete(ticket, value)
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use super::*;

    #[test]
    fn newest_result_is_accepted() {
        let slot = PanelSlot::new("overview");

        let (first, _) = slot.begin();
        let (second, _) = slot.begin();

        assert!(slot.complete(second, "2023"));
        assert!(!slot.complete(first, "2022"));
        assert_eq!(slot.into_inner(), Some("2023"));
    }

    #[test]
    fn stale_result_arriving_last_is_discarded() {
        let slot = PanelSlot::new("fuel mix");

        let (older, older_abort) = slot.begin();
        let (newer, newer_abort) = slot.begin();

        assert!(older_abort.is_aborted());
        assert!(!newer_abort.is_aborted());

        assert!(slot.complete(newer, 2023));
        assert!(!slot.complete(older, 2022));
        assert_eq!(slot.into_inner(), Some(2023));
    }

    #[test]
    fn slot_without_result_is_empty() {
        let slot: PanelSlot<u8> = PanelSlot::new("sectors");
        let _ = slot.begin();

        assert_eq!(slot.into_inner(), None);
    }

    #[test]
    fn superseded_task_on_another_thread_is_discarded() {
        let slot = PanelSlot::new("transformation");
        let shared = &slot;
        let (started_tx, started_rx) = mpsc::channel();
        let (resume_tx, resume_rx) = mpsc::channel::<()>();

        thread::scope(|s| {
            let slow = s.spawn(move || {
                run(shared, |abort| {
                    started_tx.send(()).ok();
                    resume_rx.recv().ok();
                    assert!(abort.is_aborted());
                    "slow"
                })
            });

            started_rx.recv().ok();
            assert!(run(shared, |_| "fast"));
            resume_tx.send(()).ok();

            assert!(!slow.join().unwrap_or(true));
        });

        assert_eq!(slot.into_inner(), Some("fast"));
    }

    #[test]
    fn superseding_fetch_aborts_the_task_in_flight() {
        let slot = PanelSlot::new("trends");

        let accepted = run(&slot, |abort| {
            let _ = slot.begin();
            assert!(abort.is_aborted());
            1
        });

        assert!(!accepted);
        assert_eq!(slot.into_inner(), None);
    }
}
