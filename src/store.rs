//! Pool construction and table DDL for the three clinic tables.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Connect to `database_url`, creating the database file if missing.
/// Call before anything else touches storage.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

/// Create the dentists, patients, and appointments tables if absent.
/// The appointment foreign keys are declared but not enforced: SQLite leaves
/// them inert without `PRAGMA foreign_keys`, which this service does not set.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    let dentists = r#"
        CREATE TABLE IF NOT EXISTS dentists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            last_name TEXT,
            first_name TEXT,
            license TEXT
        )
        "#;

    let patients = r#"
        CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            last_name TEXT,
            first_name TEXT,
            address TEXT,
            dni TEXT,
            registration_date TEXT
        )
        "#;

    let appointments = r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT,
            time TEXT,
            description TEXT,
            patient_id INTEGER,
            dentist_id INTEGER,
            FOREIGN KEY(patient_id) REFERENCES patients(id),
            FOREIGN KEY(dentist_id) REFERENCES dentists(id)
        )
        "#;

    for ddl in [dentists, patients, appointments] {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
