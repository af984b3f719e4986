use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crm_assistant_lib::db::{ContactDb, MemoryContactStore};
use crm_assistant_lib::error::{CrmError, ErrorResponse};
use crm_assistant_lib::services;
use crm_assistant_lib::state::{self, AppState};
use crm_assistant_lib::types::NewContact;

#[derive(Parser)]
#[command(name = "crm-assistant")]
#[command(about = "Contact intelligence for your CRM", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database holding the contacts table
    #[arg(long, global = true, env = "CRM_ASSISTANT_DB")]
    db: Option<PathBuf>,

    /// Read contacts from a JSON array instead of the database (takes precedence
    /// over --db; added contacts are not saved)
    #[arg(long, global = true)]
    contacts: Option<PathBuf>,

    /// Config file (default: ~/.crm-assistant/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed every random draw for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Service status and enabled features
    Health,

    /// Aggregate insights over every contact
    Insights,

    /// Revenue overview, distribution and top performers
    Analytics,

    /// Time-bucketed follow-up actions
    Recommendations,

    /// Contact graph with typed connections
    RelationshipMap,

    /// Revenue forecast for one contact
    Predict {
        /// Contact ID
        contact_id: String,
    },

    /// Ask a question in plain English
    Chat {
        /// The question, e.g. "who is my top client"
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Newest contacts with AI score and forecast
    Contacts {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Add a contact
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        company: Option<String>,

        #[arg(short, long)]
        revenue: Option<f64>,
    },

    /// Contacts with the highest revenue
    TopClients {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Find contacts by name or email
    Search {
        query: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let compact = cli.compact;

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", render(&ErrorResponse::from(&e), compact));
            if e.is_caller_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn open_state(cli: &Cli) -> Result<AppState, CrmError> {
    let mut config = match &cli.config {
        Some(path) => state::load_config_from(path)?,
        None => state::load_config()?,
    };
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    if let Some(path) = &cli.contacts {
        let store = MemoryContactStore::from_json_file(path)?;
        return Ok(AppState::new(config, Box::new(store)));
    }

    // clap already folds CRM_ASSISTANT_DB into `--db`.
    let path = ContactDb::resolve_path(cli.db.as_deref(), &config)?;
    let db = ContactDb::open_at(path)?;
    Ok(AppState::new(config, Box::new(db)))
}

fn run(cli: Cli) -> Result<String, CrmError> {
    let state = open_state(&cli)?;
    let compact = cli.compact;

    let output = match cli.command {
        Commands::Health => render(&services::health(&state), compact),
        Commands::Insights => render(&services::get_insights(&state)?, compact),
        Commands::Analytics => render(&services::get_analytics(&state)?, compact),
        Commands::Recommendations => render(&services::get_recommendations(&state)?, compact),
        Commands::RelationshipMap => render(&services::relationship_map(&state)?, compact),
        Commands::Predict { contact_id } => {
            render(&services::predict_revenue(&state, &contact_id)?, compact)
        }
        Commands::Chat { message } => {
            render(&services::chat(&state, &message.join(" "))?, compact)
        }
        Commands::Contacts { limit } => render(&services::list_contacts(&state, limit)?, compact),
        Commands::Add {
            name,
            email,
            company,
            revenue,
        } => {
            let new = NewContact {
                name,
                email,
                company,
                revenue,
            };
            render(&services::add_contact(&state, &new)?, compact)
        }
        Commands::TopClients { limit } => render(&services::top_clients(&state, limit)?, compact),
        Commands::Search { query } => render(&services::search(&state, &query)?, compact),
    };

    Ok(output)
}

fn render<T: Serialize>(value: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    result.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}
