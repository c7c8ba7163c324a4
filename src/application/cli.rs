use crate::application::{Config, DashboardApp, FilterPanel, Theme};
use crate::infrastructure::{Clock, FixedClock, SystemClock, init_file_logger};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "transit-filters")]
#[command(about = "Date range and day-of-week filters for transit performance dashboards")]
#[command(version)]
pub struct Cli {
    /// Treat this date as today (YYYY-MM-DD format)
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Edit the filters interactively, then print the resulting query
    Panel {
        /// Query string to start from, e.g. "startDate=2023-05-01&date=2023-05-07"
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Print the labels and canonical query for a query string
    Describe {
        #[arg(short, long)]
        query: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the date range presets as they resolve today
    Presets,
}

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Self::parse();
        let config = Config::from_env()?;
        init_file_logger(&config.log_path, config.log_level)?;

        let clock: Rc<dyn Clock> = match cli.today {
            Some(date_str) => {
                let today = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --today '{}'", date_str))?;
                Rc::new(FixedClock(today))
            }
            None => Rc::new(SystemClock),
        };

        match cli.command {
            Some(Commands::Describe { query, json }) => {
                let app = DashboardApp::new(config, clock, query.as_deref());
                let description = app.describe();
                if json {
                    println!("{}", serde_json::to_string_pretty(&description)?);
                } else {
                    println!("{}", description);
                }
            }
            Some(Commands::Presets) => {
                let app = DashboardApp::new(config, clock, None);
                for preset in app.presets() {
                    println!(
                        "{:<14} {} .. {}",
                        preset.label, preset.start_date, preset.end_date
                    );
                }
            }
            Some(Commands::Panel { query }) => Self::run_panel(config, clock, query.as_deref())?,
            None => Self::run_panel(config, clock, None)?,
        }

        Ok(())
    }

    fn run_panel(config: Config, clock: Rc<dyn Clock>, query: Option<&str>) -> Result<()> {
        let theme = Theme::by_name(&config.theme);
        let mut app = DashboardApp::new(config, clock, query);

        {
            let mut panel = FilterPanel::new(&mut app, theme)?;
            panel.run()?;
        } // panel is dropped here, releasing the borrow

        if let Some(error) = app.decode_error() {
            eprintln!("Query not understood, started from defaults: {}", error);
        }
        println!("{}", app.current_query());
        Ok(())
    }
}
