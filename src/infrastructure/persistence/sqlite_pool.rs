use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversion_sessions (
    id           TEXT PRIMARY KEY,
    direction    TEXT NOT NULL,
    input_ref    TEXT NOT NULL,
    prompt       TEXT,
    output_ref   TEXT,
    models_used  TEXT NOT NULL DEFAULT '',
    status       TEXT NOT NULL,
    error_text   TEXT,
    created_at   TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS audio_recordings (
    id            TEXT PRIMARY KEY,
    session_id    TEXT NOT NULL REFERENCES conversion_sessions(id) ON DELETE CASCADE,
    media_ref     TEXT NOT NULL,
    duration_secs REAL NOT NULL,
    created_at    TEXT NOT NULL
);
"#;

/// Opens (creating if missing) the SQLite database and ensures the schema
/// exists. Foreign keys are enabled so recording rows cascade with their
/// session.
pub async fn connect_sqlite(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;

    Ok(pool)
}
