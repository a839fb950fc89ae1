extern crate tipsy as lib;

use flexi_logger::{Duplicate, FileSpec, Logger};
use lib::events::Dispatcher;
use lib::notify::{DesktopNotifier, LogNotifier};
use lib::proximity::{self, Notifier, ProximityMonitor};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tipsy-watch",
    about = "Alerts when position fixes read from stdin come close to a bar."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(long = "log-only", help = "log alerts instead of showing notifications")]
    pub log_only: bool,

    #[structopt(long = "timeout", help = "notification timeout in milliseconds")]
    pub timeout_ms: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    let mut logger = Logger::try_with_env_or_str("info")?.duplicate_to_stderr(Duplicate::Warn);

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("tipsy-watch ran into a fatal error!");
        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    if config.proximity.points.is_empty() {
        log::warn!("No points of interest configured, nothing to watch");
        return Ok(());
    }

    log::info!(
        "Watching {} point(s) of interest within {} m",
        config.proximity.points.len(),
        config.proximity.radius_meters
    );

    let mut monitor = ProximityMonitor::from_config(&config.proximity);
    let notifier: Box<dyn Notifier> = if args.log_only {
        Box::new(LogNotifier)
    } else if let Some(timeout_ms) = args.timeout_ms {
        Box::new(DesktopNotifier::with_timeout_ms(timeout_ms))
    } else {
        Box::new(DesktopNotifier::default())
    };

    let mut dispatcher = Dispatcher::from_stdin()?;
    proximity::watch(&mut dispatcher, notifier.as_ref(), &mut monitor);

    Ok(())
}
