use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::sleep,
    time::{Duration, Instant},
};

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::{
    cli::{ConnectionArgs, OutputArgs},
    e3dc::BatteryStorage,
    prelude::*,
    tables::build_power_status_table,
};

const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(long, env = "E3DC_POLLING_INTERVAL", default_value = "5s")]
    pub interval: humantime::Duration,
}

impl WatchArgs {
    /// Poll until `SIGINT` or `SIGTERM`.
    ///
    /// A failed cycle is logged, and the connection gets re-established on the next tick.
    pub fn run(self) -> Result {
        let should_terminate = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&should_terminate))?;
        signal_hook::flag::register(SIGINT, Arc::clone(&should_terminate))?;

        let interval: Duration = self.interval.into();
        let mut storage = self.connection.connect()?;
        while !should_terminate.load(Ordering::Relaxed) {
            if let Err(error) = self.tick(&mut storage) {
                error!("failed to poll the storage: {error:#}");
                storage.shutdown();
            }
            sleep_unless_terminated(interval, &should_terminate);
        }
        info!("terminating…");
        storage.shutdown();
        Ok(())
    }

    #[instrument(skip_all)]
    fn tick(&self, storage: &mut BatteryStorage) -> Result {
        if !storage.is_initialized() {
            storage.initialize()?;
        }
        let status = storage.get_current_power_status()?;
        if self.output.json {
            println!("{}", serde_json::to_string(&status)?);
        } else {
            println!("{}", build_power_status_table(&status));
        }
        Ok(())
    }
}

/// Sleep for the interval, waking up early once termination is requested.
fn sleep_unless_terminated(interval: Duration, should_terminate: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while !should_terminate.load(Ordering::Relaxed) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        sleep(remaining.min(SLEEP_SLICE));
    }
}
