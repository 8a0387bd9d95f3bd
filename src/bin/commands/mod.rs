use irbind::{analyzer::Analyzer, config::Config, rcdev::Rcdev, Error};
use log::debug;
use std::path::PathBuf;

pub mod bindings;
pub mod devices;
pub mod receive;

/// Settings from the configuration file, overridden by the command line
pub fn config(args: &crate::App) -> Config {
    let mut config = if let Some(path) = &args.config {
        match Config::parse(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    if let Some(inputdev) = &args.device.input_dev {
        config.device.clone_from(inputdev);
    } else if let Some(rcdev) = &args.device.rc_dev {
        config.device = find_input(rcdev);
    }

    if let Some(bindings) = &args.bindings {
        config.bindings.clone_from(bindings);
    }

    debug!(
        "device {} bindings {} debounce {}ms",
        config.device.display(),
        config.bindings.display(),
        config.debounce
    );

    config
}

pub fn analyzer(args: &crate::App) -> Analyzer {
    Analyzer::from_config(&config(args))
}

fn find_input(name: &str) -> PathBuf {
    match Rcdev::find(name) {
        Ok(Rcdev {
            inputdev: Some(inputdev),
            ..
        }) => PathBuf::from(inputdev),
        Ok(_) => {
            eprintln!("error: {name}: no input device, not an infrared receiver");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print the error and exit. Failures of the receiver carry their identifier
/// so scripts can tell them apart.
pub fn fail(e: Error) -> ! {
    match e {
        Error::DeviceNotFound(_)
        | Error::PermissionDenied(_)
        | Error::Timeout(_)
        | Error::Io(..) => eprintln!("error: {}: {e}", e.id()),
        _ => eprintln!("error: {e}"),
    }

    std::process::exit(1);
}
