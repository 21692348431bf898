use rstest::*;

use crate::{
    prelude::{
        BatchRequest, Engine, Error, FrameId, NamedPoint, NamedVelocity, Stage,
        VelocityBatchRequest,
    },
    tests::engine,
};

fn request(points: Vec<NamedPoint>) -> BatchRequest {
    BatchRequest {
        source_frame: FrameId::Itrf2014,
        source_epoch: 2010.0,
        target_frame: FrameId::Itrf2020,
        target_epoch: 2020.0,
        points,
    }
}

#[rstest]
fn partial_failures_are_isolated(engine: Engine) {
    let points = vec![
        NamedPoint::new("DENVER", 39.74, 104.99, 1609.0),
        NamedPoint::new("", 39.74, 104.99, 1609.0),
        NamedPoint::new("TOO FAR NORTH", 91.0, 104.99, 0.0),
        NamedPoint::new("ATLANTIC", 0.0, 30.0, 0.0),
        NamedPoint::new("HONOLULU", 21.31, 157.86, 5.0),
        NamedPoint::new("A NAME WAY TOO LONG TO BE KEPT", 39.74, 104.99, 1609.0),
    ];

    let report = engine.transform_batch(&request(points.clone())).unwrap();

    assert_eq!(report.points.len(), points.len());
    assert_eq!(report.successes(), 2);
    assert_eq!(report.failures(), 4);

    // request order is preserved
    for (point, outcome) in points.iter().zip(report.points.iter()) {
        assert_eq!(point.name, outcome.name);
    }

    let failure = |index: usize| report.points[index].outcome.as_ref().unwrap_err();

    assert_eq!(failure(1).stage, Stage::Validation);
    assert!(matches!(failure(1).error, Error::InvalidName(_)));

    assert_eq!(failure(2).stage, Stage::Validation);
    assert!(matches!(failure(2).error, Error::InvalidCoordinate(_)));

    assert_eq!(failure(3).stage, Stage::SourcePropagation);
    assert!(matches!(failure(3).error, Error::UnmodeledRegion(_, _)));

    assert_eq!(failure(5).stage, Stage::Validation);

    // successful points do not depend on their neighbors
    let alone = engine
        .transform_batch(&request(vec![points[0].clone()]))
        .unwrap();
    assert_eq!(alone.points[0], report.points[0]);

    let honolulu = report.points[4].outcome.as_ref().unwrap();
    assert_eq!(honolulu.value.frame, FrameId::Itrf2020);
    // the Pacific plate moves north west
    assert!(honolulu.value.geodetic.latitude_deg > 21.31);
    assert!(honolulu.value.geodetic.longitude_deg > 157.86);
}

#[rstest]
fn reported_names_are_trimmed(engine: Engine) {
    let report = engine
        .transform_batch(&request(vec![
            NamedPoint::new("  DENVER\t", 39.74, 104.99, 1609.0),
            NamedPoint::new(" FAR NORTH ", 91.0, 104.99, 0.0),
        ]))
        .unwrap();

    assert_eq!(report.points[0].name, "DENVER");
    assert!(report.points[0].is_ok());
    assert_eq!(report.points[1].name, "FAR NORTH");
    assert!(!report.points[1].is_ok());

    let request = VelocityBatchRequest {
        source_frame: FrameId::Itrf2014,
        target_frame: FrameId::Itrf2020,
        velocities: vec![NamedVelocity {
            point: NamedPoint::new(" V1  ", 40.0, 105.0, 1500.0),
            north_mm_yr: -5.0,
            east_mm_yr: -15.0,
            up_mm_yr: 0.0,
        }],
    };
    let report = engine.transform_velocity_batch(&request).unwrap();
    assert_eq!(report.points[0].name, "V1");
}

#[rstest]
fn request_frames_are_shared(engine: Engine) {
    let mut request = request(vec![
        NamedPoint::new("P1", 40.0, 105.0, 1500.0),
        NamedPoint::new("P2", 35.0, 90.0, 100.0),
    ]);
    request.source_frame = FrameId::Nad83_2011;
    request.target_frame = FrameId::Nad83Ma11;

    let report = engine.transform_batch(&request).unwrap();
    assert_eq!(report.failures(), 2);
    for point in report.points.iter() {
        let failure = point.outcome.as_ref().unwrap_err();
        assert_eq!(failure.stage, Stage::FrameTransform);
        assert_eq!(
            failure.error,
            Error::UnsupportedDatumRealizationChange(FrameId::Nad83_2011, FrameId::Nad83Ma11)
        );
    }
}

#[rstest]
fn velocity_batch(engine: Engine) {
    let velocity = |name: &str, east: f64| NamedVelocity {
        point: NamedPoint::new(name, 40.0, 105.0, 1500.0),
        north_mm_yr: -5.0,
        east_mm_yr: east,
        up_mm_yr: 0.0,
    };

    let request = VelocityBatchRequest {
        source_frame: FrameId::Itrf2014,
        target_frame: FrameId::Nad83_2011,
        velocities: vec![
            velocity("V1", -15.0),
            velocity("V2", f64::NAN),
            velocity("V3", -15.0),
        ],
    };

    let report = engine.transform_velocity_batch(&request).unwrap();
    assert_eq!(report.successes(), 2);
    assert_eq!(
        report.points[1].outcome.as_ref().unwrap_err().stage,
        Stage::Validation
    );

    let v1 = report.points[0].outcome.as_ref().unwrap();
    let v3 = report.points[2].outcome.as_ref().unwrap();
    assert_eq!(v1, v3);
    assert_eq!(v1.value.frame, FrameId::Nad83_2011);

    // Colorado velocity in NAD 83 is close to zero:
    // the input velocity is the ITRF2014 motion of this location,
    // the output should be its residual motion.
    let predicted = engine
        .predict_velocity(&crate::tests::colorado(FrameId::Itrf2014, 2010.0))
        .unwrap();
    let geodetic = crate::tests::colorado(FrameId::Itrf2014, 2010.0).geodetic;
    let enu = predicted.velocity.enu_mm_yr(&geodetic);

    let request = VelocityBatchRequest {
        source_frame: FrameId::Itrf2014,
        target_frame: FrameId::Nad83_2011,
        velocities: vec![NamedVelocity {
            point: NamedPoint::new("COLORADO", 40.0, 105.0, 1500.0),
            north_mm_yr: enu[1],
            east_mm_yr: enu[0],
            up_mm_yr: enu[2],
        }],
    };
    let report = engine.transform_velocity_batch(&request).unwrap();
    let residual = report.points[0].outcome.as_ref().unwrap();
    assert!(residual.value.horizontal_mm_yr(&geodetic) < 4.0);

    let empty = VelocityBatchRequest {
        velocities: Vec::new(),
        ..request
    };
    assert_eq!(engine.transform_velocity_batch(&empty), Err(Error::EmptyRequest));
}
