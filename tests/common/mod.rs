#![allow(dead_code)]

use schema_crud::infra::config;
use schema_crud::DataEngine;
use sqlx::{Connection, Executor, MySqlConnection};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Connects to `TEST_DATABASE_URL`, runs `statements` as plain text queries
/// and hands the connection to a new engine. Returns `None` (and the test
/// passes vacuously) when no test database is configured.
pub async fn engine_with(statements: &[&str]) -> Result<Option<DataEngine>, Box<dyn std::error::Error>> {
    let Some(url) = config::test_database_url() else {
        println!("TEST_DATABASE_URL not set; skipping database test");
        return Ok(None);
    };
    let mut conn = MySqlConnection::connect(&url).await?;
    for statement in statements {
        (&mut conn).execute(*statement).await?;
    }
    Ok(Some(DataEngine::with_connection(conn).await?))
}

/// A second connection to the test database, for changes made behind the
/// engine's back.
pub async fn side_connection() -> Result<Option<MySqlConnection>, Box<dyn std::error::Error>> {
    let Some(url) = config::test_database_url() else {
        return Ok(None);
    };
    Ok(Some(MySqlConnection::connect(&url).await?))
}
