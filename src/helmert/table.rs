use std::collections::{HashMap, VecDeque};

use itertools::Itertools;
use log::debug;

use crate::{
    error::Error,
    frame::{Datum, FrameId},
    helmert::{HelmertParams, TransformPath},
};

/// Validated range of the IERS inter-realization parameters.
const ITRF_VALIDITY: (f64, f64) = (1980.0, 2030.0);

/// Validated range of the NAD 83 realization parameters.
const NAD83_VALIDITY: (f64, f64) = (1994.0, 2030.0);

/// From ITRF2014 to older ITRF realizations, IERS tables at epoch 2010.0.
/// (target, T mm, D ppb, R mas, Ṫ mm/yr, Ḋ ppb/yr, Ṙ mas/yr)
#[allow(clippy::type_complexity)]
const ITRF2014_TO_PAST_REALIZATIONS: [(
    FrameId,
    (f64, f64, f64),
    f64,
    (f64, f64, f64),
    (f64, f64, f64),
    f64,
    (f64, f64, f64),
); 11] = [
    (
        FrameId::Itrf2008,
        (1.6, 1.9, 2.4),
        -0.02,
        (0.0, 0.0, 0.0),
        (0.0, 0.0, -0.1),
        0.03,
        (0.0, 0.0, 0.0),
    ),
    (
        FrameId::Itrf2005,
        (2.6, 1.0, -2.3),
        0.92,
        (0.0, 0.0, 0.0),
        (0.3, 0.0, -0.1),
        0.03,
        (0.0, 0.0, 0.0),
    ),
    (
        FrameId::Itrf2000,
        (0.7, 1.2, -26.1),
        2.12,
        (0.0, 0.0, 0.0),
        (0.1, 0.1, -1.9),
        0.11,
        (0.0, 0.0, 0.0),
    ),
    (
        FrameId::Itrf97,
        (7.4, -0.5, -62.8),
        3.80,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
    (
        FrameId::Itrf96,
        (7.4, -0.5, -62.8),
        3.80,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
    (
        FrameId::Itrf94,
        (7.4, -0.5, -62.8),
        3.80,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
    (
        FrameId::Itrf93,
        (50.4, -3.3, -60.2),
        4.29,
        (2.81, 3.38, -0.40),
        (2.8, 0.1, -2.5),
        0.12,
        (0.11, 0.19, -0.07),
    ),
    (
        FrameId::Itrf92,
        (15.4, 1.5, -70.8),
        3.09,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
    (
        FrameId::Itrf91,
        (27.4, 15.5, -76.8),
        4.49,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
    (
        FrameId::Itrf90,
        (25.4, 11.5, -92.8),
        4.79,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
    (
        FrameId::Itrf89,
        (30.4, 35.5, -130.8),
        8.19,
        (0.0, 0.0, 0.26),
        (0.1, -0.5, -3.3),
        0.12,
        (0.0, 0.0, 0.02),
    ),
];

/// WGS 84 realizations aligned on an ITRF (or NAD 83) realization.
const EQUIVALENCES: [(FrameId, FrameId, f64); 8] = [
    (FrameId::Wgs84G730, FrameId::Itrf91, 1994.0),
    (FrameId::Wgs84G873, FrameId::Itrf94, 1997.0),
    (FrameId::Wgs84G1150, FrameId::Itrf2000, 2001.0),
    (FrameId::Wgs84G1674, FrameId::Itrf2008, 2005.0),
    (FrameId::Wgs84G1762, FrameId::Itrf2008, 2005.0),
    (FrameId::Wgs84G2139, FrameId::Itrf2014, 2010.0),
    (FrameId::Wgs84G2296, FrameId::Itrf2020, 2015.0),
    (FrameId::Wgs84Transit, FrameId::Nad83_2011, 1984.0),
];

/// [TransformTable] of published [HelmertParams].
/// Each entry may be used in both directions.
#[derive(Debug, Clone)]
pub struct TransformTable {
    entries: Vec<HelmertParams>,
}

impl Default for TransformTable {
    fn default() -> Self {
        let mut entries = Vec::with_capacity(32);

        for (target, t, d, r, dt, dd, dr) in ITRF2014_TO_PAST_REALIZATIONS {
            entries.push(
                HelmertParams::from_published(FrameId::Itrf2014, target, 2010.0, t, r, d, dt, dr, dd)
                    .with_validity(ITRF_VALIDITY.0, ITRF_VALIDITY.1),
            );
        }

        // ITRF88 carries a rotation about X as well
        entries.push(
            HelmertParams::from_published(
                FrameId::Itrf2014,
                FrameId::Itrf88,
                2010.0,
                (25.4, -0.5, -154.8),
                (0.1, 0.0, 0.26),
                11.29,
                (0.1, -0.5, -3.3),
                (0.0, 0.0, 0.02),
                0.12,
            )
            .with_validity(ITRF_VALIDITY.0, ITRF_VALIDITY.1),
        );

        entries.push(
            HelmertParams::from_published(
                FrameId::Itrf2020,
                FrameId::Itrf2014,
                2015.0,
                (-1.4, -0.9, 1.4),
                (0.0, 0.0, 0.0),
                -0.42,
                (0.0, -0.1, 0.2),
                (0.0, 0.0, 0.0),
                0.0,
            )
            .with_validity(ITRF_VALIDITY.0, ITRF_VALIDITY.1),
        );

        // NAD 83 realizations, each attached to its own plate.
        // Rotations converted to the position vector convention.
        entries.push(
            HelmertParams::from_published(
                FrameId::Itrf2014,
                FrameId::Nad83_2011,
                2010.0,
                (1005.30, -1909.21, -541.57),
                (-26.781_38, 0.420_27, -10.932_06),
                0.368_91,
                (0.79, -0.60, -1.44),
                (-0.066_67, 0.757_44, 0.051_33),
                -0.072_01,
            )
            .with_validity(NAD83_VALIDITY.0, NAD83_VALIDITY.1),
        );

        entries.push(
            HelmertParams::from_published(
                FrameId::Itrf2014,
                FrameId::Nad83Pa11,
                2010.0,
                (908.70, -2013.20, -587.60),
                (-22.749, -26.560, 25.706),
                0.368_91,
                (0.79, -0.60, -1.44),
                (0.384, -1.007, 2.186),
                -0.072_01,
            )
            .with_validity(NAD83_VALIDITY.0, NAD83_VALIDITY.1),
        );

        entries.push(
            HelmertParams::from_published(
                FrameId::Itrf2014,
                FrameId::Nad83Ma11,
                2010.0,
                (908.70, -2013.20, -587.60),
                (-28.711, -11.785, -4.417),
                0.368_91,
                (0.79, -0.60, -1.44),
                (0.020, -0.105, 0.347),
                -0.072_01,
            )
            .with_validity(NAD83_VALIDITY.0, NAD83_VALIDITY.1),
        );

        // WGS 72: 4.5 m shift along Z, 0.554" about Z, -0.2263 ppm
        entries.push(HelmertParams::from_published(
            FrameId::Wgs84Transit,
            FrameId::Wgs72,
            1984.0,
            (0.0, 0.0, -4500.0),
            (0.0, 0.0, -554.0),
            -226.3,
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            0.0,
        ));

        for (source, target, epoch) in EQUIVALENCES {
            entries.push(HelmertParams::identity(source, target, epoch));
        }

        Self { entries }
    }
}

impl TransformTable {
    /// Builds a [TransformTable] from custom entries.
    pub fn from_entries(entries: Vec<HelmertParams>) -> Self {
        Self { entries }
    }

    /// Published entries
    pub fn entries(&self) -> &[HelmertParams] {
        &self.entries
    }

    /// Direct parameters for the ordered pair, inverting a published entry if needed.
    pub fn direct(&self, source: FrameId, target: FrameId) -> Option<HelmertParams> {
        self.entries.iter().find_map(|entry| {
            if entry.source == source && entry.target == target {
                Some(entry.clone())
            } else if entry.source == target && entry.target == source {
                Some(entry.inverse())
            } else {
                None
            }
        })
    }

    /// Rejects a composition that crosses more than one NAD 83 realization.
    /// Identity legs count: a frame defined as equivalent to a NAD 83
    /// realization (like WGS 84 (Transit)) is tied to that realization.
    fn check_datum_realizations(
        source: FrameId,
        target: FrameId,
        legs: &[HelmertParams],
    ) -> Result<(), Error> {
        let crossed = std::iter::once(source)
            .chain(legs.iter().map(|leg| leg.target))
            .filter(|frame| frame.datum() == Datum::Nad83)
            .unique()
            .count();

        if crossed > 1 {
            Err(Error::UnsupportedDatumRealizationChange(source, target))
        } else {
            Ok(())
        }
    }

    /// Resolves the [TransformPath] from source to target frame.
    /// Direct entries are preferred, otherwise the shortest composition
    /// through intermediate frames is used.
    pub fn path(&self, source: FrameId, target: FrameId) -> Result<TransformPath, Error> {
        if source == target {
            return Ok(TransformPath::identity(source));
        }

        if source.datum() == Datum::Nad83 && target.datum() == Datum::Nad83 {
            return Err(Error::UnsupportedDatumRealizationChange(source, target));
        }

        if let Some(direct) = self.direct(source, target) {
            let legs = vec![direct];
            Self::check_datum_realizations(source, target, &legs)?;
            return Ok(TransformPath::new(source, target, legs));
        }

        // breadth first search: shortest composition
        let mut previous = HashMap::<FrameId, (FrameId, HelmertParams)>::new();
        let mut queue = VecDeque::from([source]);

        while let Some(frame) = queue.pop_front() {
            if frame == target {
                break;
            }
            for entry in self.entries.iter() {
                let leg = if entry.source == frame {
                    entry.clone()
                } else if entry.target == frame {
                    entry.inverse()
                } else {
                    continue;
                };
                if leg.target == source || previous.contains_key(&leg.target) {
                    continue;
                }
                queue.push_back(leg.target);
                previous.insert(leg.target, (frame, leg));
            }
        }

        let mut legs = Vec::new();
        let mut current = target;

        while current != source {
            let (from, leg) = previous
                .get(&current)
                .ok_or(Error::NoTransformPath(source, target))?;
            legs.push(leg.clone());
            current = *from;
        }

        legs.reverse();
        Self::check_datum_realizations(source, target, &legs)?;

        debug!(
            "{} to {}: composed through {} legs",
            source,
            target,
            legs.len()
        );

        Ok(TransformPath::new(source, target, legs))
    }
}
