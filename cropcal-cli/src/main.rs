use anyhow::Result;
use clap::{Parser, Subcommand};

mod config;
mod generate;
mod notify;
mod remind_cmd;
mod render;
mod schedules_cmd;
mod state;
mod store;
mod tips_cmd;
mod weather_cmd;

const KNOWN_LOCATIONS: [&str; 20] = [
    "Mumbai",
    "Pune",
    "Nagpur",
    "Nashik",
    "Aurangabad",
    "Solapur",
    "Amravati",
    "Kolhapur",
    "Thane",
    "Jalgaon",
    "Akola",
    "Nanded",
    "Chandrapur",
    "Latur",
    "Sangli",
    "Ahmednagar",
    "Dhule",
    "Jalna",
    "Ratnagiri",
    "Bhandara",
];

const KNOWN_CROPS: [&str; 21] = [
    "Rice",
    "Wheat",
    "Sugarcane",
    "Cotton",
    "Soybean",
    "Groundnut",
    "Maize",
    "Jowar",
    "Bajra",
    "Tur",
    "Gram",
    "Sunflower",
    "Onion",
    "Potato",
    "Tomato",
    "Chilli",
    "Brinjal",
    "Cabbage",
    "Cauliflower",
    "Banana",
    "Grapes",
];

#[derive(Parser, Debug)]
#[command(name = "cropcal", version, about = "Crop schedule assistant with weather-aware reminders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and save a schedule for a crop and location
    Generate {
        #[arg(long)]
        crop: String,

        #[arg(long)]
        location: String,

        /// Skip arming reminders for the new schedule
        #[arg(long)]
        no_reminders: bool,
    },

    /// List saved schedules
    List,

    /// Show a schedule (the selected one by default)
    Show {
        /// Schedule id (defaults to the selected schedule)
        id: Option<String>,

        /// Expanded list view instead of the timeline grid
        #[arg(long)]
        list: bool,
    },

    /// Select the schedule other commands operate on
    Select { id: String },

    /// Delete a saved schedule
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show the activity to focus on today
    Current,

    /// Generate daily tips for the current activity and today's weather
    Tips,

    /// Show the forecast for a location
    Weather {
        /// Defaults to the selected schedule's location
        #[arg(long)]
        location: Option<String>,

        /// Forecast days (defaults to the configured horizon)
        #[arg(long)]
        days: Option<u32>,
    },

    /// List known locations and crops
    Options,

    /// Reminder queue operations
    Remind {
        #[command(subcommand)]
        command: remind_cmd::RemindCommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config.toml if missing
    Init,

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            crop,
            location,
            no_reminders,
        } => {
            generate::run(&crop, &location, no_reminders).await?;
        }

        Command::List => schedules_cmd::list()?,

        Command::Show { id, list } => schedules_cmd::show(id.as_deref(), list)?,

        Command::Select { id } => schedules_cmd::select(&id)?,

        Command::Delete { id, yes } => schedules_cmd::delete(&id, yes)?,

        Command::Current => schedules_cmd::current()?,

        Command::Tips => tips_cmd::run().await?,

        Command::Weather { location, days } => {
            weather_cmd::run(location.as_deref(), days).await?;
        }

        Command::Options => print_options(),

        Command::Remind { command } => remind_cmd::run(command).await?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn print_options() {
    println!("Locations:");
    for chunk in KNOWN_LOCATIONS.chunks(5) {
        println!("  {}", chunk.join(", "));
    }
    println!();
    println!("Crops:");
    for chunk in KNOWN_CROPS.chunks(5) {
        println!("  {}", chunk.join(", "));
    }
}
