use clap::{ArgAction, Args, Parser, Subcommand};
use log::{Level, LevelFilter, Metadata, Record};
use std::{path::PathBuf, time::Duration};

mod commands;

#[derive(Parser)]
#[command(
    name = "irbind",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Bind infrared remote signals to buttons",
    subcommand_required = true
)]
struct App {
    /// Increase message verbosity
    #[arg(long, short, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    verbose: u8,

    /// Silence all warnings
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file
    #[arg(long = "config", short = 'c', global = true, name = "CONFIG")]
    config: Option<PathBuf>,

    #[clap(flatten)]
    device: RcDevice,

    /// Json file with the bindings
    #[arg(long = "bindings", short = 'b', global = true, name = "BINDINGS")]
    bindings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RcDevice {
    /// Select input device to read (e.g. /dev/input/event1)
    #[arg(
        long = "device",
        short = 'd',
        conflicts_with = "RCDEV",
        name = "INPUTDEV",
        global = true,
        help_heading = "DEVICE"
    )]
    input_dev: Option<PathBuf>,

    /// Select device to use by rc core device (e.g. rc0)
    #[arg(
        long = "rcdev",
        short = 's',
        conflicts_with = "INPUTDEV",
        name = "RCDEV",
        global = true,
        help_heading = "DEVICE"
    )]
    rc_dev: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the button at a point on the remote control diagram
    Locate(Locate),
    /// Wait for an infrared signal and print it
    Receive(Receive),
    /// Wait for an infrared signal and bind it to a button
    Learn(Learn),
    /// Bind a signal to a button
    Bind(Bind),
    /// Remove the binding of a button
    Unbind(Unbind),
    /// List all bindings
    List,
    /// List infrared receivers
    Devices,
}

#[derive(Args)]
struct Locate {
    #[arg(name = "X", allow_negative_numbers = true)]
    x: f64,

    #[arg(name = "Y", allow_negative_numbers = true)]
    y: f64,
}

#[derive(Args)]
struct Receive {
    /// Seconds to wait for a signal
    #[arg(long = "timeout", short = 't', value_parser = parse_timeout, default_value = "5")]
    timeout: Duration,

    /// Make up a signal rather than reading the device
    #[arg(long = "simulate")]
    simulate: bool,
}

#[derive(Args)]
struct Learn {
    /// Button to bind, e.g. up or play_pause
    #[arg(name = "BUTTON")]
    button: String,

    /// Seconds to wait for a signal
    #[arg(long = "timeout", short = 't', value_parser = parse_timeout, default_value = "5")]
    timeout: Duration,
}

#[derive(Args)]
struct Bind {
    /// Button to bind, e.g. up or play_pause
    #[arg(name = "BUTTON")]
    button: String,

    /// Signal like 0x20DF02FD
    #[arg(name = "SIGNAL")]
    signal: String,
}

#[derive(Args)]
struct Unbind {
    /// Button to unbind
    #[arg(name = "BUTTON")]
    button: String,
}

fn parse_timeout(arg: &str) -> Result<Duration, String> {
    let secs: f64 = arg.parse().map_err(|e| format!("{e}"))?;

    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

fn main() {
    let args = App::parse();

    log::set_logger(&CLI_LOGGER).unwrap();

    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    log::set_max_level(level);

    match &args.command {
        Commands::Locate(locate) => commands::bindings::locate(&args, locate),
        Commands::Receive(receive) => commands::receive::receive(&args, receive),
        Commands::Learn(learn) => commands::receive::learn(&args, learn),
        Commands::Bind(bind) => commands::bindings::bind(&args, bind),
        Commands::Unbind(unbind) => commands::bindings::unbind(&args, unbind),
        Commands::List => commands::bindings::list(&args),
        Commands::Devices => commands::devices::devices(),
    }
}

static CLI_LOGGER: CliLogger = CliLogger;

struct CliLogger;

impl log::Log for CliLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{}: {}",
                match record.level() {
                    Level::Trace => "trace",
                    Level::Debug => "debug",
                    Level::Info => "info",
                    Level::Warn => "warn",
                    Level::Error => "error",
                },
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
