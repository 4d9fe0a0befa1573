//! Tests for the embedded schema migrations.

use diesel::prelude::*;
use diesel_migrations::MigrationHarness;

use cohorts_test::db::db::migrations::MIGRATIONS;
use cohorts_test::db::db::schema::auth_user;

use super::helpers::*;

/// ## Summary
/// Reverting every migration drops the cohort tables but keeps `auth_user` and its rows.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn revert_keeps_identity_table() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db.seed_user("alice").await.expect("seed alice");
    let url = test_db.url();

    let users = tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)?;
        conn.revert_all_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to revert migrations: {e}"))?;
        let users = auth_user::table.count().get_result::<i64>(&mut conn)?;
        Ok::<_, anyhow::Error>(users)
    })
    .await
    .expect("revert task")
    .expect("revert succeeds");

    assert_eq!(users, 1);
}
