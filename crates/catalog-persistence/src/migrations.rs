//! Wrapper para correr migraciones embebidas.
//!
//! Las migraciones viven en `migrations/` dentro de este crate y se embeben
//! en el binario. Al construir el pool se ejecutan una vez.

use crate::error::PersistenceError;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Aplica las migraciones pendientes de `table_metadata`.
pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<(), PersistenceError> {
    // gen_random_uuid() es nativo desde Postgres 13; antes viene de pgcrypto.
    // Sin permisos para crear la extensión la migración decide.
    if let Err(e) = conn.batch_execute("CREATE EXTENSION IF NOT EXISTS pgcrypto;") {
        log::warn!("migrations: pgcrypto no disponible: {e}");
    }
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| PersistenceError::Unknown(format!("migration error: {e}")))?;
    for version in &applied {
        log::info!("migrations: applied {version}");
    }
    Ok(())
}
