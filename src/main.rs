//! Command-line entry point: index (and optionally fetch) FGVC-Aircraft and print a summary.

use std::path::PathBuf;

use metad2a_data::app_dirs;
use metad2a_data::config::{self, DatasetSettings};
use metad2a_data::dataset::{AircraftOptions, ClassType, Dataset, Split};
use metad2a_data::logging::{self, LoggingOptions};

const DEFAULT_SHOW: usize = 5;

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    root: Option<PathBuf>,
    class_type: Option<ClassType>,
    split: Option<Split>,
    download: bool,
    archive_url: Option<String>,
    archive_sha256: Option<String>,
    show: Option<usize>,
    no_log_file: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(CliOptions),
    Help,
}

fn main() {
    let result = parse_args(std::env::args().skip(1).collect()).and_then(|command| match command {
        Command::Run(options) => {
            let installed = if options.no_log_file {
                logging::init_with(LoggingOptions {
                    file: false,
                    ..LoggingOptions::default()
                })
            } else {
                logging::init()
            };
            if let Err(err) = installed {
                eprintln!("Logging disabled: {err}");
            }
            run(options)
        }
        Command::Help => {
            print_help();
            Ok(())
        }
    });
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> Result<(), String> {
    let mut settings = match &options.config {
        Some(path) => config::load_settings_from(path).map_err(|err| err.to_string())?,
        None => DatasetSettings::default(),
    };
    apply_overrides(&mut settings, &options);

    let default_root = match &settings.root {
        Some(root) => root.clone(),
        None => app_dirs::datasets_dir().map_err(|err| err.to_string())?,
    };
    let dataset = AircraftOptions::from_settings(&settings, default_root)
        .build()
        .map_err(|err| err.to_string())?;

    println!("{dataset}");
    println!("    Classes: {}", dataset.classes().len());
    let show = options.show.unwrap_or(DEFAULT_SHOW).min(dataset.len());
    for sample in &dataset.samples()[..show] {
        let class = dataset.class_index().name(sample.target).unwrap_or("?");
        println!(
            "    {} -> {} ({class})",
            sample.path.display(),
            sample.target
        );
    }
    Ok(())
}

fn apply_overrides(settings: &mut DatasetSettings, options: &CliOptions) {
    if let Some(root) = &options.root {
        settings.root = Some(root.clone());
    }
    if let Some(class_type) = options.class_type {
        settings.class_type = class_type;
    }
    if let Some(split) = options.split {
        settings.split = split;
    }
    if options.download {
        settings.download = true;
    }
    if let Some(url) = &options.archive_url {
        settings.archive_url = url.clone();
    }
    if let Some(sha256) = &options.archive_sha256 {
        settings.archive_sha256 = Some(sha256.clone());
    }
}

fn parse_args(args: Vec<String>) -> Result<Command, String> {
    let mut options = CliOptions::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| format!("Missing value for {flag}"))
        };
        match arg.as_str() {
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            "--root" => options.root = Some(PathBuf::from(value("--root")?)),
            "--class-type" => {
                let raw = value("--class-type")?;
                let class_type = raw.parse::<ClassType>().map_err(|err| format!("{err}"))?;
                options.class_type = Some(class_type);
            }
            "--split" => {
                let raw = value("--split")?;
                let split = raw.parse::<Split>().map_err(|err| format!("{err}"))?;
                options.split = Some(split);
            }
            "--download" => options.download = true,
            "--no-log-file" => options.no_log_file = true,
            "--archive-url" => options.archive_url = Some(value("--archive-url")?),
            "--archive-sha256" => options.archive_sha256 = Some(value("--archive-sha256")?),
            "--show" => {
                let raw = value("--show")?;
                options.show = Some(
                    raw.parse::<usize>()
                        .map_err(|_| format!("Invalid --show value: {raw}"))?,
                );
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(Command::Run(options))
}

fn print_help() {
    println!(
        "Usage: metad2a-data [--config <file.toml>] [--root <dir>] [--class-type <variant|family|manufacturer>] \
         [--split <train|val|trainval|test>] [--download] [--archive-url <url>] [--archive-sha256 <hex>] [--show <n>] [--no-log-file]"
    );
}
