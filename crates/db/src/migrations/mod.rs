//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_donor_profile_table;
mod m20250101_000003_create_donation_request_table;
mod m20250101_000004_create_request_donor_mapping_table;
mod m20250101_000005_create_donation_history_table;
mod m20250101_000006_create_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_donor_profile_table::Migration),
            Box::new(m20250101_000003_create_donation_request_table::Migration),
            Box::new(m20250101_000004_create_request_donor_mapping_table::Migration),
            Box::new(m20250101_000005_create_donation_history_table::Migration),
            Box::new(m20250101_000006_create_notification_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(names.len(), 6);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names[0].ends_with("create_user_table"));
    }
}
