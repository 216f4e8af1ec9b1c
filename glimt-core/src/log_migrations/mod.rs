//! Log database migrations - embedded SQL files
//!
//! The event log lives in its own database (logs.duckdb) so that logging
//! never contends with application writes. Migrations follow the same
//! include_str! scheme as the main database.

/// All log migrations, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
