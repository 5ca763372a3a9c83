//! Galavisor command-line client.
//!
//! # Responsibility
//! - Map subcommands onto core services against the configured database.
//! - Render outcomes as plain text; all rules live in `galavisor_core`.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use galavisor_core::db::open_db;
use galavisor_core::{
    init_logging, init_logging_from_config, ActivityService, ConfigKey, ConfigStore,
    IdentityResolver, NewPlanet, Planet, PlanetService, PlanetServiceError,
    SqliteActivityRepository, SqliteIdentityResolver, SqlitePlanetRepository, StaticAdminList,
    DEFAULT_CONFIG_FILE,
};
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

/// Galavisor travel catalogue client
#[derive(Parser, Debug)]
#[command(name = "galavisor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the key-value configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); needs --log-dir or LogDir
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Catalogue(CatalogueCommand),

    /// Read or change configuration values
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Commands that run against the configured database.
#[derive(Subcommand, Debug)]
enum CatalogueCommand {
    /// Add an activity, or report that it already exists
    AddActivity {
        /// Name of the activity to add
        name: String,
    },

    /// List all activities, or the activities of one planet
    GetActivity(GetActivityArgs),

    /// Rename an existing activity
    UpdateActivity {
        current_name: String,
        new_name: String,
    },

    /// Delete an activity and its planet link
    DeleteActivity {
        /// Name of the activity to delete
        name: String,
    },

    /// Link an existing activity to a planet
    LinkActivity {
        /// Name of the existing activity to link
        activity: String,
        /// Name of the planet to link the activity to
        planet: String,
    },

    /// List planets
    ListPlanets,

    /// Add a planet (admin only)
    AddPlanet {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Identity subject of the caller
        #[arg(long)]
        subject: String,
    },

    /// Rename a planet or replace its description (admin only)
    UpdatePlanet {
        id: i64,
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Identity subject of the caller
        #[arg(long)]
        subject: String,
    },

    /// Delete a planet by id (admin only)
    DeletePlanet {
        id: i64,
        /// Identity subject of the caller
        #[arg(long)]
        subject: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct GetActivityArgs {
    /// Get activities for a specific planet
    #[arg(short, long)]
    planet: Option<String>,

    /// Get all activities
    #[arg(short, long)]
    all: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Set a configuration value
    Set { key: String, value: String },
    /// Print a configuration value
    Get { key: String },
    /// Remove a configuration value
    Remove { key: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Request failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ConfigStore::load(&cli.config)
        .with_context(|| format!("failed to load config `{}`", cli.config.display()))?;
    start_logging(&cli, &config)?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        galavisor_core::core_version()
    );

    match cli.command {
        Commands::Config(command) => run_config(&mut config, command),
        Commands::Catalogue(command) => {
            let conn = open_configured_db(&config)?;
            run_catalogue(&conn, &config, command)
        }
    }
}

fn start_logging(cli: &Cli, config: &ConfigStore) -> Result<()> {
    match cli.log_dir.as_deref() {
        Some(log_dir) => {
            let level = cli
                .log_level
                .as_deref()
                .unwrap_or_else(|| config.get_or(ConfigKey::LogLevel, "info"));
            init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
        }
        None => {
            init_logging_from_config(config).map_err(anyhow::Error::msg)?;
        }
    }
    Ok(())
}

fn open_configured_db(config: &ConfigStore) -> Result<Connection> {
    let path = config
        .get(ConfigKey::DatabaseConnectionString)
        .context("run `galavisor config set DatabaseConnectionString <path>` first")?;
    open_db(path).with_context(|| format!("failed to open database `{path}`"))
}

fn run_catalogue(
    conn: &Connection,
    config: &ConfigStore,
    command: CatalogueCommand,
) -> Result<()> {
    let activities = ActivityService::new(SqliteActivityRepository::try_new(conn)?);

    match command {
        CatalogueCommand::AddActivity { name } => {
            let outcome = activities.add_activity(&name, None)?;
            if outcome.is_newly_created {
                println!("Activity Added Successfully");
            } else {
                println!("Activity Already Exists");
            }
            println!("  Name: {}", outcome.activity.name);
        }
        CatalogueCommand::GetActivity(args) => {
            let (title, empty, items) = match args.planet.as_deref() {
                Some(planet) if !args.all => (
                    format!("Activities for Planet: {planet}"),
                    format!("No activities found for planet {planet}"),
                    activities.get_activities_by_planet(planet)?,
                ),
                _ => (
                    "All Activities".to_string(),
                    "No activities found".to_string(),
                    activities.get_all_activities()?,
                ),
            };
            if items.is_empty() {
                println!("{empty}");
            } else {
                println!("{title}");
                for activity in items {
                    println!("  {}", activity.name);
                }
            }
        }
        CatalogueCommand::UpdateActivity {
            current_name,
            new_name,
        } => match activities.update_activity(&current_name, &new_name) {
            Ok(true) => println!(
                "Activity '{current_name}' updated to '{new_name}' successfully"
            ),
            Ok(false) => bail!("activity not found: {current_name}"),
            Err(err) => return Err(err.into()),
        },
        CatalogueCommand::DeleteActivity { name } => {
            if !activities.delete_activity(&name)? {
                bail!("activity not found: {name}");
            }
            println!("Activity '{name}' deleted successfully");
        }
        CatalogueCommand::LinkActivity { activity, planet } => {
            let outcome = activities.link_activity_to_planet(&activity, &planet)?;
            if outcome.is_newly_linked {
                println!("Activity Linked to Planet");
            } else {
                println!("Activity Already Linked");
            }
            println!("  Activity: {}", outcome.activity.name);
            println!(
                "  Planet: {}",
                outcome.activity.planet_name.as_deref().unwrap_or_default()
            );
        }
        CatalogueCommand::ListPlanets => {
            let planets = planet_service(conn, config)?;
            for planet in planets.get_all_planets()? {
                println!("  {:>4}  {}", planet.id, planet.name);
            }
        }
        CatalogueCommand::AddPlanet {
            name,
            description,
            subject,
        } => {
            let planets = planet_service(conn, config)?;
            let planet = NewPlanet { name, description };
            let created = planets.add_planet(&subject, &planet).map_err(planet_error)?;
            println!("Planet '{}' added with id {}", created.name, created.id);
        }
        CatalogueCommand::UpdatePlanet {
            id,
            name,
            description,
            subject,
        } => {
            let planets = planet_service(conn, config)?;
            let planet = Planet {
                id,
                name,
                description,
            };
            if !planets.update_planet(&subject, &planet).map_err(planet_error)? {
                bail!("planet not found: {id}");
            }
            println!("Planet {id} updated successfully");
        }
        CatalogueCommand::DeletePlanet { id, subject } => {
            let planets = planet_service(conn, config)?;
            if !planets.delete_planet(&subject, id).map_err(planet_error)? {
                bail!("planet not found: {id}");
            }
            println!("Planet {id} deleted successfully");
        }
    }

    Ok(())
}

type CliPlanetService<'conn> =
    PlanetService<SqlitePlanetRepository<'conn>, Box<dyn IdentityResolver + 'conn>>;

fn planet_service<'conn>(
    conn: &'conn Connection,
    config: &ConfigStore,
) -> Result<CliPlanetService<'conn>> {
    Ok(PlanetService::new(
        SqlitePlanetRepository::try_new(conn)?,
        admin_policy(conn, config)?,
    ))
}

/// Uses the configured allow-list when present, otherwise the users table.
fn admin_policy<'conn>(
    conn: &'conn Connection,
    config: &ConfigStore,
) -> Result<Box<dyn IdentityResolver + 'conn>> {
    if config.exists(ConfigKey::AdminSubjects) {
        let subjects = config.get_or(ConfigKey::AdminSubjects, "");
        return Ok(Box::new(StaticAdminList::parse(subjects)));
    }
    Ok(Box::new(SqliteIdentityResolver::try_new(conn)?))
}

fn planet_error(err: PlanetServiceError) -> anyhow::Error {
    match err {
        PlanetServiceError::Forbidden { .. } => anyhow::anyhow!("{err} (forbidden)"),
        other => other.into(),
    }
}

fn run_config(config: &mut ConfigStore, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => {
            config.set(parse_key(&key)?, value)?;
            println!("Config '{key}' saved");
        }
        ConfigCommand::Get { key } => {
            println!("{}", config.get(parse_key(&key)?)?);
        }
        ConfigCommand::Remove { key } => {
            config.remove(parse_key(&key)?)?;
            println!("Config '{key}' removed");
        }
    }
    Ok(())
}

fn parse_key(value: &str) -> Result<ConfigKey> {
    match ConfigKey::parse(value) {
        Some(key) => Ok(key),
        None => {
            let known = ConfigKey::all()
                .iter()
                .map(|key| key.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!("unknown config key `{value}`; expected one of: {known}")
        }
    }
}
