//! MatchMate CLI - review a batch of candidate profiles from the terminal.
//!
//! Fetches profiles from the random user API, keeps the last batch cached
//! for offline use, and records accept/decline decisions.

mod format;

use std::io;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use matchmate_core::{
    ApiClient, CacheManager, Config, MatchStatus, Profile, ProfileSynchronizer, StatusUpdate,
};

const USAGE: &str = "\
Usage: matchmate [COMMAND]

Commands:
  fetch             Fetch a new batch of profiles (default)
  list              Show cached profiles
  accept <id>       Accept a profile
  decline <id>      Decline a profile
  reset <id>        Mark a profile as pending again

Ids may be shortened to any unique prefix.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Fetch,
    List,
    SetStatus { id: String, status: MatchStatus },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let mut args = args.iter().map(String::as_str);
        let command = match args.next() {
            None | Some("fetch") => Command::Fetch,
            Some("list") => Command::List,
            Some(verb @ ("accept" | "decline" | "reset")) => {
                let Some(id) = args.next() else {
                    bail!("{} requires a profile id", verb);
                };
                let status = match verb {
                    "accept" => MatchStatus::Accepted,
                    "decline" => MatchStatus::Declined,
                    _ => MatchStatus::Pending,
                };
                Command::SetStatus {
                    id: id.to_string(),
                    status,
                }
            }
            Some(other) => bail!("Unknown command: {}", other),
        };

        if let Some(extra) = args.next() {
            bail!("Unexpected argument: {}", extra);
        }
        Ok(command)
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Resolve a full id or a unique id prefix against the current list
fn resolve_id(profiles: &[Profile], arg: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(arg) {
        return Ok(id);
    }

    let prefix = arg.to_lowercase();
    let matches: Vec<Uuid> = profiles
        .iter()
        .map(|p| p.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No profile matches id {}", arg),
        _ => bail!("Id prefix {} is ambiguous ({} matches)", arg, matches.len()),
    }
}

fn print_profiles(sync: &ProfileSynchronizer) {
    if sync.profiles().is_empty() {
        println!("No profiles.");
        return;
    }
    for profile in sync.profiles() {
        println!("{}", format::profile_line(profile));
    }
}

fn build_synchronizer(config: &Config) -> Result<ProfileSynchronizer> {
    let api = ApiClient::with_endpoint(config.api_url(), config.batch_size())?;
    let cache = CacheManager::new(config.cache_dir()?)?;
    Ok(ProfileSynchronizer::new(Arc::new(api), cache))
}

async fn run(command: Command, config: Config) -> Result<()> {
    let mut sync = build_synchronizer(&config)?;

    // Show the previous session even if the fetch below fails
    if let Err(e) = sync.load_from_cache() {
        eprintln!("Warning: could not read cached profiles: {:#}", e);
    }

    match command {
        Command::Fetch => {
            sync.trigger_fetch();
            if let Some(outcome) = sync.wait_for_fetch().await {
                println!("{}", format::outcome_line(outcome, sync.cache_age().as_deref()));
            }
            print_profiles(&sync);
        }
        Command::List => {
            let age = sync.cache_age().unwrap_or_else(|| "never".to_string());
            println!("Cached profiles (updated {})", age);
            print_profiles(&sync);
        }
        Command::SetStatus { id, status } => {
            let id = resolve_id(sync.profiles(), &id)?;
            match sync.update_status(id, status) {
                StatusUpdate::Updated => {}
                StatusUpdate::NotPersisted => {
                    eprintln!("Warning: decision recorded but could not be saved");
                }
                StatusUpdate::NotFound => bail!("No profile with id {}", id),
            }
            if let Some(profile) = sync.profile(id) {
                println!("{}", format::profile_line(profile));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("-h" | "--help" | "help")) {
        println!("{}", USAGE);
        return Ok(());
    }

    let command = match Command::parse(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let config = Config::load()?;
    info!(api_url = config.api_url(), batch_size = config.batch_size(), "MatchMate starting");

    run(command, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args(&[])).unwrap(), Command::Fetch);
        assert_eq!(Command::parse(&args(&["fetch"])).unwrap(), Command::Fetch);
        assert_eq!(Command::parse(&args(&["list"])).unwrap(), Command::List);
        assert_eq!(
            Command::parse(&args(&["accept", "abc"])).unwrap(),
            Command::SetStatus {
                id: "abc".into(),
                status: MatchStatus::Accepted
            }
        );
        assert_eq!(
            Command::parse(&args(&["decline", "abc"])).unwrap(),
            Command::SetStatus {
                id: "abc".into(),
                status: MatchStatus::Declined
            }
        );
        assert_eq!(
            Command::parse(&args(&["reset", "abc"])).unwrap(),
            Command::SetStatus {
                id: "abc".into(),
                status: MatchStatus::Pending
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse(&args(&["accept"])).is_err());
        assert!(Command::parse(&args(&["swipe"])).is_err());
        assert!(Command::parse(&args(&["list", "extra"])).is_err());
    }

    #[test]
    fn test_resolve_id() {
        let a = Profile::new("A".into(), 20, String::new(), String::new());
        let b = Profile::new("B".into(), 21, String::new(), String::new());
        let profiles = vec![a.clone(), b.clone()];

        // Full ids resolve even if not in the list
        let other = Uuid::new_v4();
        assert_eq!(resolve_id(&profiles, &other.to_string()).unwrap(), other);

        // A full-length prefix is always unique
        let a_str = a.id.to_string();
        assert_eq!(resolve_id(&profiles, &a_str[..36]).unwrap(), a.id);
        assert_eq!(resolve_id(&profiles, &a_str[..8].to_uppercase()).unwrap(), a.id);

        assert!(resolve_id(&profiles, "zzz").is_err());
        // Empty prefix matches everything
        assert!(resolve_id(&profiles, "").is_err());
    }
}
