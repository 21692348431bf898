//! Epoch to epoch propagation of positions
use log::trace;
use nalgebra::Vector3;

use crate::error::Error;

/// [Motion] describes how a location moves through time, in a given frame.
/// This is the only knowledge the propagator requires.
pub trait Motion {
    /// Secular velocity (ECEF, m/yr) at this location and epoch.
    fn velocity(&self, ecef_m: &Vector3<f64>, epoch: f64) -> Result<Vector3<f64>, Error>;

    /// Epochs of the discontinuities (events) lying in (min(t0, t1), max(t0, t1)],
    /// sorted in the direction of travel. Default: none.
    fn event_epochs(&self, _t0: f64, _t1: f64) -> Vec<f64> {
        Vec::new()
    }

    /// Step (ECEF, m) occurring at event_epoch, at this location.
    /// It applies to epochs at or after event_epoch.
    fn event_offset(&self, _ecef_m: &Vector3<f64>, _event_epoch: f64) -> Result<Vector3<f64>, Error> {
        Ok(Vector3::zeros())
    }

    /// Accumulated non linear displacement (ECEF, m) at this epoch.
    fn transient(&self, _ecef_m: &Vector3<f64>, _epoch: f64) -> Result<Vector3<f64>, Error> {
        Ok(Vector3::zeros())
    }
}

/// Propagates ECEF coordinates (m) from t0 to t1 (decimal years).
///
/// The interval is split at every crossed event.
/// Each segment adds the velocity times the elapsed time, plus the change
/// of transient displacement. Each crossed event adds its step when moving
/// forward, and removes it when moving backward.
/// When t0 equals t1, the input is returned untouched.
pub fn propagate<M: Motion + ?Sized>(
    motion: &M,
    ecef_m: &Vector3<f64>,
    t0: f64,
    t1: f64,
) -> Result<Vector3<f64>, Error> {
    if t0 == t1 {
        return Ok(*ecef_m);
    }

    let sign = if t1 > t0 { 1.0 } else { -1.0 };

    let mut position = *ecef_m;
    let mut epoch = t0;

    for event_epoch in motion.event_epochs(t0, t1) {
        position = advance(motion, &position, epoch, event_epoch)?;
        let offset = motion.event_offset(&position, event_epoch)?;
        trace!("event at {:.4}: step {:?}", event_epoch, offset * sign);
        position += offset * sign;
        epoch = event_epoch;
    }

    advance(motion, &position, epoch, t1)
}

/// Continuous motion over a segment free of events.
fn advance<M: Motion + ?Sized>(
    motion: &M,
    ecef_m: &Vector3<f64>,
    t0: f64,
    t1: f64,
) -> Result<Vector3<f64>, Error> {
    if t0 == t1 {
        return Ok(*ecef_m);
    }
    let velocity = motion.velocity(ecef_m, t0)?;
    let transient = motion.transient(ecef_m, t1)? - motion.transient(ecef_m, t0)?;
    Ok(ecef_m + velocity * (t1 - t0) + transient)
}
