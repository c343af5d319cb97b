// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
mod color;
mod command;
mod config;
mod lamp;
mod plan;
mod playsync;
mod sequence;

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::lamp::LampError;
use crate::plan::{Options, Plan, Summary};
use crate::playsync::CancelHandle;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Plays with a cloud connected RGB lamp."
)]
struct Cli {
    /// The access token for your Particle account.
    #[arg(short, long)]
    access: Option<String>,
    /// The device name of the lamp to control.
    #[arg(short, long)]
    device: Option<String>,
    /// Path to a YAML settings file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pause between the colours of a sequence, e.g. 250ms.
    #[arg(long)]
    delay: Option<String>,
    /// Give up on a cloud request after this long, e.g. 10s.
    #[arg(long)]
    timeout: Option<String>,
    /// Lists the devices in the account and exits.
    #[arg(long)]
    list: bool,
    #[command(flatten)]
    options: Options,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?.with_overrides(
        cli.access,
        cli.device,
        cli.timeout,
        cli.delay,
    );
    let account = settings.account()?;

    // The cloud client blocks, so everything that talks to the lamp runs off the runtime.
    if cli.list {
        let devices = tokio::task::spawn_blocking(move || lamp::list_devices(&account)).await??;
        if devices.is_empty() {
            println!("No devices found.");
            return Ok(());
        }

        println!("Devices:");
        for device in devices {
            println!("- {}", device);
        }
        return Ok(());
    }

    let device = settings.device()?.to_string();
    let delay = settings.delay()?;
    let plan = Plan::from_options(&cli.options)?;
    let seed = cli.options.seed;
    for step in plan.steps() {
        debug!(%step, "Planned.");
    }

    let cancel_handle = CancelHandle::new();
    let mut join = {
        let cancel_handle = cancel_handle.clone();
        tokio::task::spawn_blocking(move || -> Result<Summary, LampError> {
            let lamp = lamp::get(&device, &account)?;
            info!(%lamp, "Found lamp.");

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            plan.run(lamp.as_ref(), &mut rng, &cancel_handle, delay)
        })
    };

    let summary = tokio::select! {
        result = &mut join => result??,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping after the current command.");
            cancel_handle.cancel();
            join.await??
        }
    };

    info!(
        sent = summary.sent,
        cancelled = summary.cancelled,
        "Finished."
    );
    Ok(())
}
