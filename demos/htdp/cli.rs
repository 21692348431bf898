// Command line interface of the htdp demo
use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::fs::read_to_string;

use htdp::prelude::{Config, Dataset, Engine, FrameId};

pub struct Cli {
    matches: ArgMatches,
}

fn point_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("lat")
            .long("lat")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
            .required(true)
            .help("Latitude (°N)"),
    )
    .arg(
        Arg::new("lon")
            .long("lon")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
            .required(true)
            .help("Longitude (°E, negative west of Greenwich)"),
    )
    .arg(
        Arg::new("height")
            .long("height")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
            .default_value("0")
            .help("Ellipsoidal height (m)"),
    )
}

impl Cli {
    pub fn new() -> Self {
        let cmd = Command::new("htdp")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Time dependent geodetic positioning demo")
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .arg(
                Arg::new("cfg")
                    .short('c')
                    .long("cfg")
                    .action(ArgAction::Set)
                    .global(true)
                    .help("Load a JSON configuration (Optional)"),
            )
            .arg(
                Arg::new("dataset")
                    .short('d')
                    .long("dataset")
                    .action(ArgAction::Set)
                    .global(true)
                    .help("Load a JSON crustal motion dataset (Optional)"),
            )
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .global(true)
                    .help("JSON output"),
            )
            .subcommand(Command::new("frames").about("List supported reference frames"))
            .subcommand(point_args(
                Command::new("transform")
                    .about("Transform a position between (frame, epoch) pairs")
                    .arg(Arg::new("from").long("from").required(true).help("Source frame"))
                    .arg(Arg::new("to").long("to").required(true).help("Target frame"))
                    .arg(
                        Arg::new("epoch")
                            .long("epoch")
                            .value_parser(value_parser!(f64))
                            .required(true)
                            .help("Source epoch (decimal year)"),
                    )
                    .arg(
                        Arg::new("to-epoch")
                            .long("to-epoch")
                            .value_parser(value_parser!(f64))
                            .help("Target epoch (decimal year), source epoch by default"),
                    ),
            ))
            .subcommand(point_args(
                Command::new("velocity")
                    .about("Predict the velocity of a location")
                    .arg(Arg::new("frame").long("frame").default_value("ITRF2014"))
                    .arg(
                        Arg::new("epoch")
                            .long("epoch")
                            .value_parser(value_parser!(f64))
                            .default_value("2010.0"),
                    ),
            ))
            .subcommand(
                Command::new("batch")
                    .about("Transform a JSON batch request")
                    .long_about(
                        "Transform a JSON batch request. Request longitudes \
                        (\"longitude_west_deg\") are counted positive WEST, \
                        unlike the --lon option. Reported longitudes are positive east.",
                    )
                    .arg(
                        Arg::new("request")
                            .required(true)
                            .help("Request file (longitudes positive west)"),
                    ),
            );

        Self {
            matches: cmd.get_matches(),
        }
    }

    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    pub fn json(&self) -> bool {
        self.matches.get_flag("json")
    }

    /// Builds the [Engine], from the optional configuration and dataset.
    pub fn engine(&self) -> Engine {
        let cfg = match self.matches.get_one::<String>("cfg") {
            Some(path) => {
                let content = read_to_string(path)
                    .unwrap_or_else(|e| panic!("failed to read configuration: {}", e));
                serde_json::from_str::<Config>(&content)
                    .unwrap_or_else(|e| panic!("failed to parse configuration: {}", e))
            },
            None => Config::default(),
        };

        let engine = Engine::new(cfg);

        match self.matches.get_one::<String>("dataset") {
            Some(path) => {
                let dataset = Dataset::from_file(path)
                    .unwrap_or_else(|e| panic!("failed to load dataset: {}", e));
                engine.with_dataset(&dataset)
            },
            None => engine,
        }
    }
}

/// Resolves a frame argument (index, label or alias).
pub fn frame(engine: &Engine, matches: &ArgMatches, key: &str) -> FrameId {
    let value = matches
        .get_one::<String>(key)
        .unwrap_or_else(|| panic!("missing --{}", key));
    engine
        .catalog()
        .resolve(value)
        .unwrap_or_else(|e| panic!("{}", e))
}

/// (latitude °N, longitude °W, height m) from the point arguments.
/// Longitudes are entered positive east.
pub fn point(matches: &ArgMatches) -> (f64, f64, f64) {
    let get = |key: &str| *matches.get_one::<f64>(key).unwrap_or(&0.0);
    (get("lat"), -get("lon"), get("height"))
}
