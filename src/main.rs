mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::scheduler::unban::UnbanScheduler;
use crate::state::BotState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Arc::new(Config::from_env()?);

    loop {
        // Reloaded on every session so a restart picks up hand edits to the file.
        let store = startup::load_member_store(&config)?;
        let state = BotState::new(config.clone(), store.clone());

        let mut client = bot::start::init_bot(&state).await?;

        let sweep_actions = Arc::new(state.moderation(client.http.clone()));
        let unban_sweeps = UnbanScheduler::new(store, sweep_actions)
            .start(config.unban_sweep_interval)
            .await?;

        let result = bot::start::start_bot(&mut client).await;

        // Stopped before the next iteration reloads the store.
        unban_sweeps.shutdown().await?;
        result?;

        if !state.take_restart_request() {
            break;
        }
        tracing::info!("Restarting the bot");
    }

    tracing::info!("Shutting down");
    Ok(())
}
