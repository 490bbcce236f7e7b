//! terrace-node — epoch-boundary harness for the treasury policy controllers.
//!
//! Opens (or initialises) the state database, optionally installs a params
//! file, then runs one of:
//!   seed       load supply, exchange rates and indicators from a JSON snapshot
//!   end-block  run the epoch driver for a block height
//!   show       print the current policy state

mod snapshot;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use terrace_core::{Params, BLOCKS_PER_EPOCH};
use terrace_policy::EpochDriver;
use terrace_state::StateDb;

use snapshot::{PolicyState, Snapshot};

#[derive(Parser, Debug)]
#[command(
    name = "terrace-node",
    version,
    about = "Terrace treasury policy — tax rate, reward weight and tax caps per epoch"
)]
struct Args {
    /// Directory for the persistent state database.
    #[arg(long, default_value = "~/.terrace/data")]
    data_dir: PathBuf,

    /// Policy params JSON to validate and install before running the command.
    #[arg(long)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a chain-state snapshot (supply, exchange rates, indicators).
    Seed {
        #[arg(long)]
        file: PathBuf,
    },
    /// Run the end-of-block policy hook at `height`.
    EndBlock {
        #[arg(long)]
        height: u64,

        #[arg(long, default_value_t = BLOCKS_PER_EPOCH)]
        blocks_per_epoch: u64,
    },
    /// Print the current tax rate, reward weight and tax caps.
    Show,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,terrace=debug")),
        )
        .init();

    let args = Args::parse();

    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let db = StateDb::open(&data_dir).context("opening state database")?;

    if let Some(path) = args.params.as_deref() {
        let params = Params::from_json_file(path)
            .with_context(|| format!("loading params from {}", path.display()))?;
        db.put_params(&params).context("storing params")?;
        info!(path = %path.display(), "params installed");
    }

    match args.command {
        Command::Seed { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading snapshot from {}", file.display()))?;
            let snapshot: Snapshot =
                serde_json::from_str(&json).context("parsing snapshot JSON")?;
            snapshot.apply(&db).context("applying snapshot")?;
            info!(
                denoms = snapshot.supply.len(),
                indicators = snapshot.indicators.len(),
                "snapshot applied"
            );
        }
        Command::EndBlock {
            height,
            blocks_per_epoch,
        } => {
            let driver =
                EpochDriver::new(&db, &db, &db).with_blocks_per_epoch(blocks_per_epoch);
            let update = driver
                .end_block(height)
                .with_context(|| format!("end-block at height {height}"))?;
            match &update {
                Some(update) => db
                    .set_last_policy_epoch(update.epoch)
                    .context("recording policy epoch")?,
                None => info!(height, "no policy update at this height"),
            }
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
        Command::Show => {
            let state = PolicyState::read(&db).context("reading policy state")?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    db.flush().context("flushing state database")?;
    Ok(())
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
