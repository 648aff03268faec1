use std::sync::Arc;

use anyhow::Result;

use crate::{config::SETTINGS, database::PostgresSQL, web::state::AppState};

pub mod calculation;
pub mod config;
pub mod database;
pub mod declare;
pub mod logging;
pub mod util;
pub mod web;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let store = PostgresSQL::new(&SETTINGS.database_url())?;
    let state = AppState::new(Arc::new(store), SETTINGS.system.clone());

    if let Err(why) = web::serve(state).await {
        logging::error_file_async(format!("Failed to serve because {:#}", why));
        logging::error_console(format!("Failed to serve because {:#}", why));
        return Err(why);
    }

    Ok(())
}
