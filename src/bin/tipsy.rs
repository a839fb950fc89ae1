extern crate tipsy as lib;

use chrono::{Local, NaiveDate};
use flexi_logger::{FileSpec, Logger};
use lib::calendar::{build_grid, YearMonth};
use lib::chat::{CannedReplies, Conversation};
use lib::ui::MonthView;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tipsy",
    about = "Tipsy - sobriety calendar and companion chat."
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

    #[structopt(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, StructOpt)]
pub enum Cmd {
    /// Print the calendar of a month
    Month {
        #[structopt(help = "month to show as YYYY-MM, defaults to the current month")]
        month: Option<YearMonth>,

        #[structopt(long = "today", help = "date treated as today (YYYY-MM-DD)")]
        today: Option<NaiveDate>,
    },
    /// Ask the companion chat something
    Chat {
        #[structopt(required = true, help = "message to send")]
        message: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    match args.cmd {
        Cmd::Month { month, today } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let month = match month {
                Some(month) => month,
                None => YearMonth::of(&today)?,
            };

            let grid = build_grid(month, today, config.first_weekday)?;
            let view = MonthView::new(month, config.first_weekday).theme(&config.theme);
            println!("{}", view.render(&grid));
        }
        Cmd::Chat { message } => {
            let service = CannedReplies::from_config(&config.chat);
            let mut conversation = Conversation::from_config(&config.chat);

            let reply = conversation.send(&service, &message.join(" "));
            println!("{}", reply.text);
        }
    }

    Ok(())
}
