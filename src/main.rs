use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use areaclaim::claim::{
    ClaimDecision, ClaimGate, FileSession, FixedLocation, MemorySession, SessionStore,
};
use areaclaim::config::FileConfig;
use areaclaim::dataset::AreaDataset;
use areaclaim::domain::Coordinate;
use areaclaim::geometry::find_containing_area;
use areaclaim::store::{RealtimeStore, RestStore, Subscription};

/// Capture-the-area game client: check where you are and claim areas
///
/// Examples:
///   # List the areas in the dataset
///   areaclaim areas
///
///   # Which area am I standing in?
///   areaclaim locate --lat 58.585 --lon 16.190
///
///   # Pick a team once, then claim from the current position
///   areaclaim team select Red
///   areaclaim claim Park --lat 58.585 --lon 16.190
///
///   # Follow the leaderboard
///   areaclaim watch
#[derive(Parser, Debug)]
#[command(name = "areaclaim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches areaclaim.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Area dataset JSON file (defaults to areas.json)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Realtime database URL (overrides the config file)
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the areas of the dataset
    Areas,

    /// Find the first area containing a location
    Locate {
        #[command(flatten)]
        at: LocationArgs,

        /// Only consider areas nobody has claimed yet (requires a store)
        #[arg(long)]
        unclaimed: bool,
    },

    /// Claim an area for the selected team
    Claim {
        /// Area name as it appears in the dataset
        area: String,

        /// Team to claim for (defaults to the selected team)
        #[arg(short = 't', long)]
        team: Option<String>,

        #[command(flatten)]
        at: LocationArgs,

        /// Only evaluate the claim, do not submit it
        #[arg(long)]
        dry_run: bool,
    },

    /// Follow live areas and teams and print the standings on every change
    Watch {
        /// Poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Manage teams and the selected team
    #[command(subcommand)]
    Team(TeamCommand),

    /// Register dataset areas missing from the store as unclaimed
    Seed {
        /// Points awarded for each new area
        #[arg(long, default_value = "1")]
        points: i64,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// Show the selected team
    Show,
    /// Select the team to play for
    Select { name: String },
    /// Add a team to the store
    Add {
        name: String,
        /// CSS color used on the map
        #[arg(default_value = "#3388ff")]
        color: String,
    },
    /// Delete a team from the store
    Delete { name: String },
}

#[derive(clap::Args, Debug)]
struct LocationArgs {
    /// Latitude of the current fix (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the current fix (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
}

impl LocationArgs {
    fn fix(&self, file_config: &FileConfig) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => file_config.location,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config_path, mut file_config): (Option<PathBuf>, FileConfig) =
        if let Some(ref config_path) = args.config {
            if config_path.exists() {
                let contents = std::fs::read_to_string(config_path)
                    .context(format!("Failed to read config file: {:?}", config_path))?;
                let config = toml::from_str(&contents).context("Failed to parse config file")?;
                (Some(config_path.clone()), config)
            } else {
                bail!("Config file not found: {:?}", config_path);
            }
        } else {
            match FileConfig::load() {
                Some((path, config)) => (Some(path), config),
                None => (None, FileConfig::default()),
            }
        };
    // relative dataset paths follow the config file, wherever it was found
    file_config.dataset = file_config.dataset_path(config_path.as_deref().and_then(Path::parent));

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    match &args.command {
        Command::Areas => list_areas(&load_dataset(&args, &file_config)?),
        Command::Locate { at, unclaimed } => {
            let dataset = load_dataset(&args, &file_config)?;
            let Some(fix) = at.fix(&file_config) else {
                bail!("No location given: pass --lat and --lon or set `location` in the config");
            };
            locate(&args, &file_config, &dataset, fix, *unclaimed)
        }
        Command::Claim {
            area,
            team,
            at,
            dry_run,
        } => {
            let dataset = load_dataset(&args, &file_config)?;
            claim(&args, &file_config, &dataset, area, team.as_deref(), at, *dry_run)
        }
        Command::Watch { interval } => {
            let secs = interval.unwrap_or(file_config.poll_interval_secs);
            watch(&open_store(&args, &file_config)?, Duration::from_secs(secs))
        }
        Command::Team(cmd) => team(&args, &file_config, cmd),
        Command::Seed { points } => {
            let dataset = load_dataset(&args, &file_config)?;
            seed(&open_store(&args, &file_config)?, &dataset, *points)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_dataset(args: &Args, file_config: &FileConfig) -> Result<AreaDataset> {
    let path = args
        .dataset
        .clone()
        .unwrap_or_else(|| file_config.dataset.clone());

    AreaDataset::load(&path).context(format!("Failed to load area dataset: {}", path.display()))
}

fn open_store(args: &Args, file_config: &FileConfig) -> Result<RestStore> {
    let mut store_config = file_config.store.clone().unwrap_or_default();
    if let Some(url) = &args.store_url {
        store_config.database_url = url.clone();
    }
    if store_config.database_url.is_empty() {
        bail!("No realtime store configured: pass --store-url or add a [store] section to the config");
    }

    RestStore::new(&store_config).context("Failed to create store client")
}

fn session() -> Result<FileSession> {
    FileSession::default_path()
        .map(FileSession::new)
        .context("Could not determine a config directory for the session file")
}

fn list_areas(dataset: &AreaDataset) -> Result<()> {
    println!("{} areas", dataset.len());
    println!();

    for (name, polygon) in dataset.iter() {
        let b = polygon.bounds();
        println!(
            "  {:<24} {:>3} vertices  lat {:.5}..{:.5}  lng {:.5}..{:.5}",
            name,
            polygon.len(),
            b.min_lat,
            b.max_lat,
            b.min_lng,
            b.max_lng
        );
    }

    if let Some(bounds) = dataset.bounds() {
        println!();
        println!("Play field centre: {}", bounds.center());
    }

    Ok(())
}

fn locate(
    args: &Args,
    file_config: &FileConfig,
    dataset: &AreaDataset,
    fix: Coordinate,
    unclaimed_only: bool,
) -> Result<()> {
    let found = if unclaimed_only {
        let store = open_store(args, file_config)?;
        let spinner = create_spinner("Fetching areas...");
        let areas = store.areas().context("Failed to fetch areas from store")?;
        spinner.finish_and_clear();

        let open: Vec<&str> = areas
            .iter()
            .filter(|a| !a.is_claimed())
            .map(|a| a.name.as_str())
            .collect();
        find_containing_area(
            fix,
            dataset.iter().filter(|(name, _)| open.contains(name)),
        )
        .map(str::to_string)
    } else {
        dataset.find_containing(fix).map(str::to_string)
    };

    match found {
        Some(name) => println!("{} is inside {}", fix, name),
        None => println!("{} is not in any area", fix),
    }

    Ok(())
}

fn claim(
    args: &Args,
    file_config: &FileConfig,
    dataset: &AreaDataset,
    area: &str,
    team: Option<&str>,
    at: &LocationArgs,
    dry_run: bool,
) -> Result<()> {
    let team = match team {
        Some(t) => Some(t.to_string()),
        None => session()
            .ok()
            .and_then(|s| s.selected_team())
            .or_else(|| file_config.team.clone()),
    };
    let session = MemorySession::new(team.clone());
    let gate = ClaimGate::new(dataset, FixedLocation(at.fix(file_config)), &session);

    let decision = if dry_run {
        gate.evaluate(area)
    } else {
        let store = open_store(args, file_config)?;
        let spinner = create_spinner("Submitting claim...");
        let start = Instant::now();
        let result = gate.claim(area, &store);
        match result.as_ref().ok().and_then(|d| store_update_message(d, start.elapsed())) {
            Some(message) => spinner.finish_with_message(message),
            None => spinner.finish_and_clear(),
        }
        result.context("Failed to submit claim")?
    };

    match decision {
        ClaimDecision::Allowed if dry_run => {
            println!("Claim allowed: {} may claim {}", team.unwrap_or_default(), area)
        }
        ClaimDecision::Allowed => {
            println!("Claimed area! {} now holds {}", team.unwrap_or_default(), area)
        }
        ClaimDecision::Denied(reason) => println!("Failed to claim {}: {}", area, reason),
    }

    Ok(())
}

/// Spinner message for a submitted claim; denied claims write nothing
fn store_update_message(decision: &ClaimDecision, elapsed: Duration) -> Option<String> {
    decision
        .is_allowed()
        .then(|| format!("Store updated [{:.1}s]", elapsed.as_secs_f32()))
}

fn watch(store: &RestStore, interval: Duration) -> Result<()> {
    tracing::info!(interval_secs = interval.as_secs(), "watching store");

    for update in Subscription::new(store, interval) {
        let snapshot = match update {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "poll failed");
                continue;
            }
        };

        println!();
        println!("Leaderboard");
        println!("===========");
        for (rank, standing) in snapshot.standings().iter().enumerate() {
            println!(
                "  {}. {:<20} {:>4} pts  ({} areas)",
                rank + 1,
                standing.team,
                standing.points,
                standing.areas_held
            );
        }
        println!(
            "  {} of {} areas still unclaimed",
            snapshot.unclaimed().count(),
            snapshot.areas.len()
        );
    }

    Ok(())
}

fn team(args: &Args, file_config: &FileConfig, cmd: &TeamCommand) -> Result<()> {
    match cmd {
        TeamCommand::Show => {
            let selected = session()?.selected_team().or_else(|| file_config.team.clone());
            match selected {
                Some(name) => println!("Playing for {}", name),
                None => println!("No team selected"),
            }
        }
        TeamCommand::Select { name } => {
            let session = session()?;
            session
                .select_team(name)
                .context("Failed to save selected team")?;
            println!("Now playing for {}", name);
        }
        TeamCommand::Add { name, color } => {
            if name.is_empty() {
                bail!("Team name must not be empty");
            }
            open_store(args, file_config)?
                .add_team(name, color)
                .context("Failed to add team")?;
            println!("Added team {}", name);
        }
        TeamCommand::Delete { name } => {
            open_store(args, file_config)?
                .delete_team(name)
                .context("Failed to delete team")?;
            println!("Deleted team {}", name);
        }
    }

    Ok(())
}

fn seed(store: &RestStore, dataset: &AreaDataset, points: i64) -> Result<()> {
    let spinner = create_spinner("Fetching areas...");
    let existing = store.areas().context("Failed to fetch areas from store")?;
    spinner.finish_and_clear();

    let mut added = 0;
    for name in dataset.names() {
        if existing.iter().any(|a| a.name == name) {
            continue;
        }
        store
            .add_area(name, points)
            .context(format!("Failed to add area {}", name))?;
        added += 1;
    }

    println!(
        "Added {} areas ({} already present)",
        added,
        dataset.len() - added
    );
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_claim() {
        let args = Args::parse_from([
            "areaclaim", "claim", "Park", "--lat", "58.585", "--lon", "16.19", "--dry-run",
        ]);
        match args.command {
            Command::Claim { area, at, dry_run, .. } => {
                assert_eq!(area, "Park");
                assert!(dry_run);
                assert_eq!(
                    at.fix(&FileConfig::default()),
                    Some(Coordinate::new(58.585, 16.19))
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_location_falls_back_to_config() {
        let at = LocationArgs {
            lat: None,
            lon: None,
        };
        let config = FileConfig {
            location: Some(Coordinate::new(1.0, 2.0)),
            ..FileConfig::default()
        };
        assert_eq!(at.fix(&config), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(at.fix(&FileConfig::default()), None);
    }

    #[test]
    fn test_store_update_message_only_when_allowed() {
        use areaclaim::claim::DenialReason;

        assert_eq!(
            store_update_message(&ClaimDecision::Allowed, Duration::from_millis(1500)),
            Some("Store updated [1.5s]".to_string())
        );
        assert_eq!(
            store_update_message(
                &ClaimDecision::Denied(DenialReason::NotInsideArea),
                Duration::from_millis(1500)
            ),
            None
        );
    }

    #[test]
    fn test_negative_longitude() {
        let args = Args::parse_from(["areaclaim", "locate", "--lat", "37.77", "--lon", "-122.42"]);
        match args.command {
            Command::Locate { at, unclaimed } => {
                assert!(!unclaimed);
                assert_eq!(at.lon, Some(-122.42));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
