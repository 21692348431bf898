use nalgebra::Vector3;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rstest::*;

use crate::{
    geodetic::{to_cartesian, to_geodetic},
    prelude::{Ellipsoid, Engine, FrameId, Geodetic, Position, Velocity, VelocityGrid},
    tests::{engine, init_logger},
};

const SAMPLES: usize = 64;

/// Random location over the conterminous United States
fn random_conus(rng: &mut SmallRng) -> Geodetic {
    Geodetic::new(
        rng.random_range(30.0..48.0),
        rng.random_range(80.0..110.0),
        rng.random_range(-100.0..4000.0),
    )
    .unwrap()
}

#[test]
fn geodetic_round_trip() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(0);

    for ellipsoid in [Ellipsoid::GRS80, Ellipsoid::WGS72] {
        for _ in 0..SAMPLES {
            let geodetic = Geodetic::new(
                rng.random_range(-90.0..=90.0),
                rng.random_range(0.0..360.0),
                rng.random_range(-1000.0..100_000.0),
            )
            .unwrap();

            let ecef = to_cartesian(&geodetic, &ellipsoid);
            let back = to_geodetic(&ecef, &ellipsoid).unwrap();

            assert!(
                (to_cartesian(&back, &ellipsoid) - ecef).norm() < 1.0E-6,
                "{:?} round trip",
                geodetic
            );
            assert!(
                (back.height_m - geodetic.height_m).abs() < 1.0E-6,
                "{:?} height",
                geodetic
            );
            assert!(
                (back.latitude_deg - geodetic.latitude_deg).abs() < 1.0E-9,
                "{:?} latitude",
                geodetic
            );

            // longitude is undefined at the poles
            if geodetic.latitude_deg.abs() < 90.0 - 1.0E-6 {
                let dlon = (back.longitude_deg - geodetic.longitude_deg).rem_euclid(360.0);
                assert!(
                    dlon.min(360.0 - dlon) < 1.0E-9,
                    "{:?} longitude {}",
                    geodetic,
                    back.longitude_deg
                );
            }
        }
    }
}

#[rstest]
fn identity_is_exact(engine: Engine) {
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..SAMPLES {
        let frame = FrameId::ALL[rng.random_range(0..FrameId::ALL.len())];
        let epoch = rng.random_range(1906.0..2030.0);
        let position = Position::new(frame, epoch, random_conus(&mut rng));
        let output = engine.transform_position(&position, frame, epoch).unwrap();
        assert_eq!(output.value, position);
        assert!(output.is_clean());
    }
}

#[rstest]
fn propagation_is_reversible(engine: Engine) {
    let mut rng = SmallRng::seed_from_u64(2);
    for _ in 0..SAMPLES {
        let t0 = rng.random_range(1950.0..2030.0);
        let t1 = rng.random_range(1950.0..2030.0);
        let position = Position::new(FrameId::Itrf2014, t0, random_conus(&mut rng));

        let there = engine
            .transform_position(&position, FrameId::Itrf2014, t1)
            .unwrap();
        let back = engine
            .transform_position(&there.value, FrameId::Itrf2014, t0)
            .unwrap();

        let residual = (back.value.ecef_m() - position.ecef_m()).norm();
        assert!(residual < 1.0E-6, "{} to {}: residual {} m", t0, t1, residual);
    }
}

#[rstest]
fn frame_inverse(engine: Engine) {
    let mut rng = SmallRng::seed_from_u64(3);
    let transformer = engine.transformer();

    for source in FrameId::ALL {
        for target in FrameId::ALL {
            if engine.table().path(source, target).is_err() {
                continue;
            }
            let epoch = rng.random_range(1980.0..2030.0);
            let ecef = to_cartesian(&random_conus(&mut rng), &source.ellipsoid());

            let there = transformer.transform(&ecef, source, target, epoch).unwrap();
            let back = transformer
                .transform(&there.value, target, source, epoch)
                .unwrap();

            let residual = (back.value - ecef).norm();
            assert!(
                residual < 1.0E-6,
                "{} to {}: residual {} m",
                source,
                target,
                residual
            );
        }
    }
}

#[rstest]
fn velocity_linearity(engine: Engine) {
    let mut rng = SmallRng::seed_from_u64(4);
    let zero = Vector3::zeros();

    for _ in 0..SAMPLES {
        let geodetic = random_conus(&mut rng);
        let enu = Vector3::new(
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
            rng.random_range(-10.0..10.0),
        );
        let k = rng.random_range(-3.0..3.0);

        let v = Velocity::from_enu_mm_yr(FrameId::Itrf2008, &geodetic, enu);
        let offset = engine
            .transform_velocity(&Velocity::new(FrameId::Itrf2008, zero), &geodetic, FrameId::Itrf2020)
            .unwrap()
            .value
            .ecef_m_yr;

        let tv = engine
            .transform_velocity(&v, &geodetic, FrameId::Itrf2020)
            .unwrap()
            .value
            .ecef_m_yr;
        let tkv = engine
            .transform_velocity(&v.scaled(k), &geodetic, FrameId::Itrf2020)
            .unwrap()
            .value
            .ecef_m_yr;

        let residual = ((tkv - offset) - (tv - offset) * k).norm();
        assert!(residual < 1.0E-12, "residual {} m/yr", residual);
    }
}

#[test]
fn grid_edge_consistency() {
    let mut rng = SmallRng::seed_from_u64(5);
    let (rows, columns) = (6, 8);

    let values = (0..rows * columns)
        .map(|_| {
            Vector3::new(
                rng.random_range(-1.0E-2..1.0E-2),
                rng.random_range(-1.0E-2..1.0E-2),
                rng.random_range(-1.0E-3..1.0E-3),
            )
        })
        .collect::<Vec<_>>();

    let grid = VelocityGrid::new("random", (30.0, 100.0), (0.5, 0.25), rows, columns, values)
        .unwrap();

    for _ in 0..SAMPLES {
        // on a row of nodes: linear between both neighbors
        let row = rng.random_range(0..rows);
        let x = rng.random_range(0.0..(columns - 1) as f64);
        let column = x.floor() as usize;
        let fraction = x - column as f64;

        let latitude = 30.0 + 0.5 * row as f64;
        let longitude = 100.0 + 0.25 * x;

        let expected = grid.node(row, column).unwrap() * (1.0 - fraction)
            + grid.node(row, column + 1).unwrap() * fraction;

        let value = grid.value_at(latitude, longitude).unwrap();
        assert!((value - expected).norm() < 1.0E-12);
    }
}
