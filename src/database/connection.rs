use crate::error::StoreError;
use log::{debug, error};
use rusqlite::Connection;

// Embed migrations from the migrations directory
refinery::embed_migrations!("migrations");

/// Opens the SQLite file (or `:memory:`) and brings the schema up to date
pub fn init_connection(db_path: &str) -> Result<Connection, StoreError> {
    let mut conn = Connection::open(db_path)?;

    match migrations::runner().run(&mut conn) {
        Ok(report) => {
            debug!(
                "Migrations completed successfully ({} applied)",
                report.applied_migrations().len()
            );
        }
        Err(e) => {
            error!("Refinery migration error: {}", e);
            return Err(StoreError::Migration(e.to_string()));
        }
    }

    Ok(conn)
}
