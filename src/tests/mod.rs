mod batch;
mod frames;
mod properties;


use log::LevelFilter;
use std::sync::Once;

use rstest::*;

use crate::prelude::{Datum, Engine, FrameId, Geodetic, Position};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

#[fixture]
pub fn engine() -> Engine {
    init_logger();
    Engine::default()
}

/// Colorado, North American plate
pub fn colorado(frame: FrameId, epoch: f64) -> Position {
    Position::new(frame, epoch, Geodetic::new(40.0, 105.0, 1500.0).unwrap())
}

/// NAD 83 realization a frame is tied to, directly or by equivalence.
fn nad83_realization(frame: FrameId) -> Option<FrameId> {
    match frame {
        FrameId::Wgs84Transit | FrameId::Wgs72 => Some(FrameId::Nad83_2011),
        frame if frame.datum() == Datum::Nad83 => Some(frame),
        _ => None,
    }
}

/// True when transforming between both frames changes NAD 83 realization.
pub fn changes_nad83_realization(source: FrameId, target: FrameId) -> bool {
    matches!(
        (nad83_realization(source), nad83_realization(target)),
        (Some(a), Some(b)) if a != b
    )
}
