//! Latest-reading store
//!
//! One slot per quantity, each behind its own lock. A write replaces the
//! whole `Option<Reading<_>>` under the write guard, so a reader either sees
//! the previous reading or the new one, never a mix of the two.
//!
//! The arrival time is read from the clock while the write guard is held,
//! so the stored arrival time of a slot never moves backwards.

use crate::clock::Clock;
use crate::reading::{PhSample, Reading, TurbiditySample};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

fn replace_stamped<S: Clone>(
    slot: &RwLock<Option<Reading<S>>>,
    clock: &dyn Clock,
    build: impl FnOnce(DateTime<Utc>) -> Reading<S>,
) -> Reading<S> {
    let mut guard = slot.write();
    let reading = build(clock.now());
    *guard = Some(reading.clone());
    reading
}

/// In-memory holder of the most recent pH and turbidity readings
#[derive(Debug, Default)]
pub struct ReadingStore {
    ph: RwLock<Option<Reading<PhSample>>>,
    turbidity: RwLock<Option<Reading<TurbiditySample>>>,
}

impl ReadingStore {
    /// Create a store with both slots absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pH slot (last write wins)
    ///
    /// `build` receives the arrival time, taken under the slot's write lock.
    pub fn put_ph_with(
        &self,
        clock: &dyn Clock,
        build: impl FnOnce(DateTime<Utc>) -> Reading<PhSample>,
    ) -> Reading<PhSample> {
        replace_stamped(&self.ph, clock, build)
    }

    /// Replace the turbidity slot (last write wins)
    pub fn put_turbidity_with(
        &self,
        clock: &dyn Clock,
        build: impl FnOnce(DateTime<Utc>) -> Reading<TurbiditySample>,
    ) -> Reading<TurbiditySample> {
        replace_stamped(&self.turbidity, clock, build)
    }

    pub fn ph(&self) -> Option<Reading<PhSample>> {
        self.ph.read().clone()
    }

    pub fn turbidity(&self) -> Option<Reading<TurbiditySample>> {
        self.turbidity.read().clone()
    }

    /// Read both slots
    ///
    /// Each slot is individually consistent; the pair is not read under a
    /// common lock since the quantities are independent.
    pub fn both(&self) -> (Option<Reading<PhSample>>, Option<Reading<TurbiditySample>>) {
        (self.ph(), self.turbidity())
    }
}
