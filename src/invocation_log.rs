//! Thread-safe, ordered record of the invocations made on one mock.
//!
//! Invocations live in a fixed-capacity slot array that is replaced by one of
//! double the size when full. Slots below `count` are written exactly once and
//! never change afterwards, so a snapshot only needs to capture the current
//! array and count: later appends land beyond the captured count, growth and
//! `clear` install a new array, and neither disturbs a snapshot in progress.
//!
//! Lock order: the log lock is never held while the owner's setup registry is
//! locked. `clear` releases the log lock before resetting setup state.

use crate::invocation::Invocation;
use crate::logging;
use crate::setup::SetupRegistry;
use crate::{MockError, Result};
use std::iter;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

const INITIAL_CAPACITY: usize = 4;

type Slots = Arc<[OnceLock<Arc<Invocation>>]>;

#[derive(Default)]
struct LogState {
    slots: Option<Slots>,
    count: usize,
}

impl LogState {
    fn capacity(&self) -> usize {
        self.slots.as_ref().map_or(0, |slots| slots.len())
    }

    fn grow(&mut self) {
        let target = match self.capacity() {
            0 => INITIAL_CAPACITY,
            capacity => capacity * 2,
        };
        let existing = self.slots.as_deref().unwrap_or(&[]);
        let grown: Slots = existing
            .iter()
            .cloned()
            .chain(iter::repeat_with(OnceLock::new))
            .take(target)
            .collect();
        self.slots = Some(grown);
    }

    fn iter(&self) -> impl Iterator<Item = &Arc<Invocation>> {
        self.slots
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .take(self.count)
            .filter_map(OnceLock::get)
    }
}

pub struct InvocationLog {
    state: Mutex<LogState>,
    owner: Arc<SetupRegistry>,
}

impl InvocationLog {
    /// Creates an empty log whose `clear` resets the state of `owner`'s setups.
    pub fn new(owner: Arc<SetupRegistry>) -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            owner,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self) -> usize {
        self.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Current size of the backing slot array.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Appends `invocation` after every invocation recorded so far.
    pub fn add(&self, invocation: Arc<Invocation>) {
        let mut state = self.lock();
        if state.count == state.capacity() {
            state.grow();
        }
        let index = state.count;
        if let Some(slots) = &state.slots {
            let stored = slots[index].set(invocation);
            debug_assert!(stored.is_ok(), "slot {} was already occupied", index);
        }
        state.count += 1;
    }

    pub fn get(&self, index: usize) -> Result<Arc<Invocation>> {
        let state = self.lock();
        let out_of_range = MockError::IndexOutOfRange {
            index,
            count: state.count,
        };
        if index >= state.count {
            return Err(out_of_range);
        }
        state
            .slots
            .as_deref()
            .and_then(|slots| slots.get(index))
            .and_then(OnceLock::get)
            .cloned()
            .ok_or(out_of_range)
    }

    /// Discards every recorded invocation, then resets the owner's setup state.
    pub fn clear(&self) {
        let discarded = {
            let mut state = self.lock();
            let discarded = state.count;
            *state = LogState::default();
            discarded
        };
        logging::log_invocations_cleared(discarded);
        self.owner.reset();
    }

    /// Point-in-time copy of all recorded invocations.
    pub fn to_vec(&self) -> Vec<Arc<Invocation>> {
        let state = self.lock();
        let mut result = Vec::with_capacity(state.count);
        result.extend(state.iter().cloned());
        result
    }

    /// Point-in-time copy of the invocations satisfying `predicate`, in order.
    ///
    /// The predicate runs while appends are blocked, so it must be cheap and
    /// free of side effects.
    pub fn to_vec_matching<P>(&self, mut predicate: P) -> Vec<Arc<Invocation>>
    where
        P: FnMut(&Invocation) -> bool,
    {
        let state = self.lock();
        state
            .iter()
            .filter(|invocation| predicate(invocation))
            .cloned()
            .collect()
    }

    /// Iterates over the invocations recorded when this call was made.
    pub fn iter(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            slots: state.slots.clone(),
            count: state.count,
            position: 0,
        }
    }
}

impl Default for InvocationLog {
    fn default() -> Self {
        Self::new(Arc::new(SetupRegistry::new()))
    }
}

impl std::fmt::Debug for InvocationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("InvocationLog")
            .field("count", &state.count)
            .field("capacity", &state.capacity())
            .finish()
    }
}

impl<'a> IntoIterator for &'a InvocationLog {
    type Item = Arc<Invocation>;
    type IntoIter = Snapshot;

    fn into_iter(self) -> Snapshot {
        self.iter()
    }
}

/// Lazy iteration over a captured slot array and count.
pub struct Snapshot {
    slots: Option<Slots>,
    count: usize,
    position: usize,
}

impl Iterator for Snapshot {
    type Item = Arc<Invocation>;

    fn next(&mut self) -> Option<Arc<Invocation>> {
        if self.position >= self.count {
            return None;
        }
        let slot = self.slots.as_ref()?.get(self.position)?;
        self.position += 1;
        slot.get().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Snapshot {}
