// htdp demo: frame listing, position transformation, velocity prediction
// and batch processing, from the command line.
#[macro_use]
extern crate log;

use env_logger::{Builder, Target};
use std::fs::read_to_string;

mod cli;
use cli::Cli;

use htdp::prelude::{BatchRequest, Engine, Geodetic, Position};

fn east_longitude(geodetic: &Geodetic) -> f64 {
    let east = -geodetic.longitude_deg;
    if east < -180.0 {
        east + 360.0
    } else {
        east
    }
}

fn report(position: &Position, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(position)
                .unwrap_or_else(|e| panic!("serialization: {}", e))
        );
    } else {
        println!(
            "{} @ {:.4}: lat={:.9}°N lon={:.9}°E h={:.4}m",
            position.frame,
            position.epoch,
            position.geodetic.latitude_deg,
            east_longitude(&position.geodetic),
            position.geodetic.height_m
        );
    }
}

fn transform(engine: &Engine, cli: &Cli) {
    let Some(matches) = cli.matches().subcommand_matches("transform") else {
        return;
    };

    let source = cli::frame(engine, matches, "from");
    let target = cli::frame(engine, matches, "to");
    let epoch = *matches.get_one::<f64>("epoch").unwrap_or(&2010.0);
    let to_epoch = *matches.get_one::<f64>("to-epoch").unwrap_or(&epoch);

    let (lat, lon, h) = cli::point(matches);
    let geodetic = Geodetic::new(lat, lon, h).unwrap_or_else(|e| panic!("{}", e));
    let position = Position::new(source, epoch, geodetic);

    match engine.transform_position(&position, target, to_epoch) {
        Ok(output) => {
            for warning in output.warnings.iter() {
                warn!("{}", warning);
            }
            report(&output.value, cli.json());
            if let Ok(displacement) = engine.displacement(&position, to_epoch) {
                info!(
                    "motion in {}: north={:.4}m east={:.4}m up={:.4}m",
                    source, displacement.north_m, displacement.east_m, displacement.up_m
                );
            }
        },
        Err(e) => error!("{}", e),
    }
}

fn velocity(engine: &Engine, cli: &Cli) {
    let Some(matches) = cli.matches().subcommand_matches("velocity") else {
        return;
    };

    let frame = cli::frame(engine, matches, "frame");
    let epoch = *matches.get_one::<f64>("epoch").unwrap_or(&2010.0);
    let (lat, lon, h) = cli::point(matches);
    let geodetic = Geodetic::new(lat, lon, h).unwrap_or_else(|e| panic!("{}", e));

    match engine.predict_velocity(&Position::new(frame, epoch, geodetic)) {
        Ok(predicted) => {
            let enu = predicted.velocity.enu_mm_yr(&geodetic);
            if cli.json() {
                println!(
                    "{}",
                    serde_json::json!({
                        "frame": frame,
                        "source": predicted.source,
                        "north_mm_yr": enu[1],
                        "east_mm_yr": enu[0],
                        "up_mm_yr": enu[2],
                    })
                );
            } else {
                println!(
                    "{} ({}): vn={:.2} ve={:.2} vu={:.2} mm/yr",
                    frame, predicted.source, enu[1], enu[0], enu[2]
                );
            }
        },
        Err(e) => error!("{}", e),
    }
}

fn batch(engine: &Engine, cli: &Cli) {
    let Some(matches) = cli.matches().subcommand_matches("batch") else {
        return;
    };

    let path = matches
        .get_one::<String>("request")
        .unwrap_or_else(|| panic!("missing request file"));
    let content = read_to_string(path).unwrap_or_else(|e| panic!("failed to read request: {}", e));
    let request: BatchRequest = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse request: {}", e));

    match engine.transform_batch(&request) {
        Ok(batch) => {
            for point in batch.points.iter() {
                match &point.outcome {
                    Ok(output) => {
                        print!("{:<24} ", point.name);
                        report(&output.value, cli.json());
                    },
                    Err(failure) => println!("{:<24} {}", point.name, failure),
                }
            }
            info!("{} success(es), {} failure(s)", batch.successes(), batch.failures());
        },
        Err(e) => error!("{}", e),
    }
}

pub fn main() {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let engine = cli.engine();

    if cli.matches().subcommand_matches("frames").is_some() {
        for (index, label) in engine.catalog().list_frames() {
            println!("{:>2} {}", index, label);
        }
    }

    transform(&engine, &cli);
    velocity(&engine, &cli);
    batch(&engine, &cli);
}
