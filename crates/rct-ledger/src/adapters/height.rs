//! Manually driven height counter.
//!
//! Implements the `HeightSource` port for tests, simulations and the node's
//! request loop, where heights arrive with each request.

use crate::domain::Height;
use crate::errors::ServiceError;
use crate::ports::outbound::HeightSource;
use std::sync::atomic::{AtomicU64, Ordering};

/// Height counter that only moves forward when told to.
#[derive(Debug, Default)]
pub struct ManualHeightSource {
    height: AtomicU64,
}

impl ManualHeightSource {
    /// Start at `height`.
    pub fn new(height: Height) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Move to `height`. Staying put is allowed; going back is not.
    pub fn advance_to(&self, height: Height) -> Result<Height, ServiceError> {
        self.height
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (height >= current).then_some(height)
            })
            .map(|_| height)
            .map_err(|current| ServiceError::HeightRegression {
                current,
                requested: height,
            })
    }

    /// Move forward by `delta`, saturating at `Height::MAX`.
    pub fn advance_by(&self, delta: Height) -> Height {
        let previous = self
            .height
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(delta))
            })
            .unwrap_or_else(|current| current);
        previous.saturating_add(delta)
    }
}

impl HeightSource for ManualHeightSource {
    fn current_height(&self) -> Height {
        self.height.load(Ordering::SeqCst)
    }
}
