use crate::config::Config;
use crate::data::member_store::{MemberStore, SharedMemberStore};
use crate::error::AppError;

/// Log filter used when `RUST_LOG` is not set.
static DEFAULT_LOG_FILTER: &str = "info,serenity=warn";

/// Installs the global tracing subscriber.
///
/// Reads the filter from `RUST_LOG`, falling back to `info,serenity=warn`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Loads the member store from the configured path.
///
/// Creates the store file if it does not exist yet. Malformed rows are skipped and
/// logged by the store; a summary is logged here.
///
/// # Arguments
/// - `config` - Application configuration containing the store path
///
/// # Returns
/// - `Ok(SharedMemberStore)` - Loaded store ready to share between tasks
/// - `Err(AppError::StoreErr)` - The file could not be read or created
pub fn load_member_store(config: &Config) -> Result<SharedMemberStore, AppError> {
    let (store, report) = MemberStore::load(config.member_store_path.clone())?;

    if report.created {
        tracing::info!("Starting with an empty member store");
    } else if !report.skipped.is_empty() {
        tracing::warn!(
            "Loaded {} member record(s), skipped {} malformed row(s) in {}",
            report.loaded,
            report.skipped.len(),
            config.member_store_path.display()
        );
    }

    Ok(store.into_shared())
}
