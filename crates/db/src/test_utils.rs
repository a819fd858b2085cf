//! Helpers for tests that run against a real `PostgreSQL` instance.
//!
//! Connection settings come from `TEST_DB_*` environment variables.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::{AvailabilityStatus, BloodType, UserRole, donor_profile, user};
use crate::migrations::Migrator;

/// Tables truncated between tests, children before parents.
const TABLES: [&str; 6] = [
    "notification",
    "donation_history",
    "request_donor_mapping",
    "donation_request",
    "donor_profile",
    "user",
];

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        let var = |key: &str, fallback: &str| std::env::var(key).unwrap_or_else(|_| fallback.to_string());
        Self {
            host: var("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: var("TEST_DB_USER", "bloodlink_test"),
            password: var("TEST_DB_PASSWORD", "bloodlink_test"),
            database: var("TEST_DB_NAME", "bloodlink_test"),
        }
    }
}

impl TestDbConfig {
    /// URL of the test database.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the server's maintenance database, used to create and drop test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }

    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: DatabaseConnection,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the shared test database and bring its schema up to date.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect using an explicit configuration and run migrations.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to test database");
        Ok(Self { conn, config })
    }

    /// Create a fresh, uniquely named database so tests can run in parallel.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("bloodlink_test_{}", &suffix[..8]);

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %config.database, "Created unique test database");
        Self::with_config(config).await
    }

    /// Get the database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Remove every row from the application tables.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let sql = format!(
            "TRUNCATE TABLE {} CASCADE",
            TABLES.map(|t| format!("\"{t}\"")).join(", ")
        );
        self.conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, sql))
            .await?;
        Ok(())
    }

    /// Drop a database created by [`Self::create_unique`].
    pub async fn drop_database(self) -> Result<(), DbErr> {
        self.conn.close().await?;

        let admin = Database::connect(&self.config.postgres_url()).await?;
        // Stray pool connections would block the drop
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!(
                    "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
                    self.config.database
                ),
            ))
            .await
            .ok();
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\"", self.config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }

    /// Insert a user with the given role. `id` doubles as the token.
    pub async fn insert_user(
        &self,
        id: &str,
        name: &str,
        contact: &str,
        role: UserRole,
    ) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            contact_number: Set(contact.to_string()),
            email: Set(None),
            password_hash: Set("unused".to_string()),
            role: Set(role),
            token: Set(id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(&self.conn)
        .await
    }

    /// Insert an available donor profile with no cooldown.
    pub async fn insert_profile(
        &self,
        user_id: &str,
        blood_type: BloodType,
        city: &str,
        pincode: &str,
        next_eligible: Option<NaiveDate>,
    ) -> Result<donor_profile::Model, DbErr> {
        donor_profile::ActiveModel {
            user_id: Set(user_id.to_string()),
            blood_type: Set(blood_type),
            city: Set(city.to_string()),
            pincode: Set(pincode.to_string()),
            availability_status: Set(AvailabilityStatus::Available),
            status_reason: Set(None),
            unavailable_until: Set(None),
            next_eligible_donation_date: Set(next_eligible),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(&self.conn)
        .await
    }
}
