use rstest::*;

use crate::{
    prelude::{
        Config, Engine, Error, FrameId, HelmertParams, Stage, TransformTable, Warning,
    },
    tests::{changes_nad83_realization, colorado, engine},
};

#[rstest]
fn catalog_listing(engine: Engine) {
    let catalog = engine.catalog();
    let frames = catalog.list_frames();
    assert_eq!(frames.len(), FrameId::ALL.len());

    // every listed frame resolves from its index and its label
    for (index, label) in frames {
        let by_index = catalog.resolve(&index.to_string()).unwrap();
        let by_label = catalog.resolve(label).unwrap();
        assert_eq!(by_index, by_label, "{}", label);
        assert_eq!(catalog.frame(by_index).label, label);
    }

    assert_eq!(catalog.resolve("27"), Err(Error::UnknownFrame("27".to_string())));
    assert!(catalog.resolve("ETRF89").is_err());
}

#[rstest]
fn every_pair_transforms(engine: Engine) {
    for source in FrameId::ALL {
        for target in FrameId::ALL {
            let position = colorado(source, 2010.0);
            let output = engine.transform_position(&position, target, 2012.0);
            if changes_nad83_realization(source, target) {
                assert_eq!(
                    output,
                    Err(Error::UnsupportedDatumRealizationChange(source, target))
                );
            } else {
                let output = output.unwrap_or_else(|e| panic!("{} to {}: {}", source, target, e));
                assert_eq!(output.value.frame, target);
                assert_eq!(output.value.epoch, 2012.0);
            }
        }
    }
}

/// ITRF2014 to ITRF2008, only validated after 2012
fn narrow_table() -> TransformTable {
    TransformTable::from_entries(vec![HelmertParams::from_published(
        FrameId::Itrf2014,
        FrameId::Itrf2008,
        2010.0,
        (1.6, 1.9, 2.4),
        (0.0, 0.0, 0.0),
        -0.02,
        (0.0, 0.0, -0.1),
        (0.0, 0.0, 0.0),
        0.03,
    )
    .with_validity(2012.0, 2030.0)])
}

#[rstest]
fn extrapolation_policy(engine: Engine) {
    let position = colorado(FrameId::Itrf2014, 2010.0);

    let warning = engine.with_table(narrow_table());
    let output = warning
        .transform_position(&position, FrameId::Itrf2008, 2010.0)
        .unwrap();
    assert_eq!(
        output.warnings,
        vec![Warning::ExtrapolatedParameters {
            source: FrameId::Itrf2014,
            target: FrameId::Itrf2008,
            epoch: 2010.0,
            validity: (2012.0, 2030.0),
        }]
    );

    let rejecting = Engine::new(Config::default().with_reject_extrapolation(true))
        .with_table(narrow_table());
    let failure = rejecting
        .transform_position_staged(&position, FrameId::Itrf2008, 2010.0)
        .unwrap_err();
    assert_eq!(failure.stage, Stage::FrameTransform);
    assert_eq!(
        failure.error,
        Error::ExtrapolatedParameters(FrameId::Itrf2014, FrameId::Itrf2008, 2010.0)
    );
}

#[rstest]
fn disconnected_frames(engine: Engine) {
    let engine = engine.with_table(narrow_table());
    let position = colorado(FrameId::Itrf2008, 2010.0);
    assert_eq!(
        engine.transform_position(&position, FrameId::Itrf2020, 2010.0),
        Err(Error::NoTransformPath(FrameId::Itrf2008, FrameId::Itrf2020))
    );
}
