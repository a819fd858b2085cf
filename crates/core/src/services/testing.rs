//! Helpers for inspecting what services wrote to a mock connection.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, Statement, Value};

/// Every statement run on `db`, in order.
///
/// All other handles to the connection must be dropped first.
pub fn logged_statements(db: Arc<DatabaseConnection>) -> Vec<Statement> {
    let Ok(conn) = Arc::try_unwrap(db) else {
        panic!("connection still shared");
    };
    conn.into_transaction_log()
        .iter()
        .flat_map(|t| t.statements().to_vec())
        .collect()
}

/// Statements whose SQL starts with `prefix`, e.g. `INSERT INTO "notification"`.
pub fn statements_starting_with<'a>(
    statements: &'a [Statement],
    prefix: &str,
) -> Vec<&'a Statement> {
    statements
        .iter()
        .filter(|s| s.sql.starts_with(prefix))
        .collect()
}

/// Whether `statement` binds `value` as a parameter.
pub fn binds(statement: &Statement, value: impl Into<Value>) -> bool {
    let value = value.into();
    statement
        .values
        .as_ref()
        .is_some_and(|values| values.0.contains(&value))
}
