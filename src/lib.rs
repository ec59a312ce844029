//! On-device mood pipeline: free text in, sentiment, ranked emoji and
//! history patterns out.
//!
//! - [`services`] holds the engines and the stateful [`services::Orchestrator`].
//! - [`commands`] are the thin entry points the UI and voice layers call.
//! - [`store`] is the in-memory mood store the pipeline reads snapshots from.
//! - [`models`] are the plain serde types shared by all of the above.
//! - [`utils`] covers config, logging and time bucketing.

pub mod commands;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use std::path::Path;

pub use errors::{PipelineError, PipelineResult};
pub use services::Orchestrator;
pub use store::{MoodSource, MoodStore};

/// Loads `.env` and settings, starts logging and builds the orchestrator.
pub fn init(data_dir: &Path) -> anyhow::Result<(models::Settings, Orchestrator)> {
    utils::config::load_dotenv();
    let settings = utils::config::load_settings(&commands::settings::settings_path(data_dir))?;
    utils::logging::init_logging(&settings.logging.level);
    log::info!("[MoodFlow] Data dir: {}", data_dir.display());
    let orchestrator = Orchestrator::new(&settings);
    Ok((settings, orchestrator))
}
