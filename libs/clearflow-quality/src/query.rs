//! Query gateway: point-in-time views of the store

use crate::assessment::Assessment;
use crate::clock::{Clock, SystemClock};
use crate::freshness::FreshReadings;
use crate::snapshot::{PhReadingView, TurbidityReadingView, WaterQualitySnapshot};
use crate::store::ReadingStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct QueryGateway {
    store: Arc<ReadingStore>,
    clock: Arc<dyn Clock>,
}

impl QueryGateway {
    pub fn new(store: Arc<ReadingStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<ReadingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn ph_view(&self) -> PhReadingView {
        PhReadingView::from(self.store.ph().as_ref())
    }

    pub fn turbidity_view(&self) -> TurbidityReadingView {
        TurbidityReadingView::from(self.store.turbidity().as_ref())
    }

    /// Both readings plus the time this view was generated
    pub fn snapshot(&self) -> WaterQualitySnapshot {
        let (ph, turbidity) = self.store.both();
        WaterQualitySnapshot {
            ph: PhReadingView::from(ph.as_ref()),
            turbidity: TurbidityReadingView::from(turbidity.as_ref()),
            timestamp: self.clock.now(),
        }
    }

    /// Classifier applied to the current store contents
    pub fn assessment(&self) -> Assessment {
        let (ph, turbidity) = self.store.both();
        let fresh = FreshReadings::from_readings(ph.as_ref(), turbidity.as_ref(), self.clock.now());
        Assessment::from_fresh(&fresh)
    }
}
