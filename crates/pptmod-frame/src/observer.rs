//! Caller-side hooks for decoded values.
//!
//! The decoder stays silent; callers that want per-field diagnostics hand a
//! decoded frame to an observer after the fact.

use crate::codec::{DecodedFrame, Measurement};

/// Receives decoded measurements.
pub trait DecodeObserver {
    /// Called once per field, in table order.
    fn on_measurement(&mut self, measurement: &Measurement<'_>);

    /// Called once per frame. The default walks every measurement.
    fn on_frame(&mut self, frame: &DecodedFrame<'_>) {
        for measurement in frame {
            self.on_measurement(measurement);
        }
    }
}

/// Emits one `tracing` debug event per field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn on_measurement(&mut self, measurement: &Measurement<'_>) {
        tracing::debug!(
            field = measurement.name(),
            offset = measurement.spec.offset,
            raw = measurement.raw,
            value = measurement.value,
            unit = measurement.unit(),
            "decoded field"
        );
    }

    fn on_frame(&mut self, frame: &DecodedFrame<'_>) {
        tracing::trace!(fields = frame.len(), "frame decoded");
        for measurement in frame {
            self.on_measurement(measurement);
        }
    }
}
