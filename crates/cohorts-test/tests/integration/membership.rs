//! Tests for group membership operations.

use cohorts_test::db::db::enums::GroupType;
use cohorts_test::db::db::query::{cohort, group, membership};

use super::helpers::*;

/// ## Summary
/// Adding a member twice keeps a single link; removing reports whether a link existed.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn membership_add_is_idempotent() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let alice = test_db.seed_user("alice").await.expect("seed alice");
    let bob = test_db.seed_user("bob").await.expect("seed bob");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    let (g, _) = cohort::create_cohort(&mut conn, "Cohort A", &course, None)
        .await
        .expect("create cohort");

    assert!(membership::add_user_to_group(&mut conn, bob, g.id).await.expect("add bob"));
    assert!(membership::add_user_to_group(&mut conn, alice, g.id).await.expect("add alice"));
    assert!(!membership::add_user_to_group(&mut conn, alice, g.id).await.expect("re-add alice"));

    let members = membership::list_group_members(&mut conn, g.id)
        .await
        .expect("list members");
    let names: Vec<&str> = members.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);

    assert!(membership::remove_user_from_group(&mut conn, alice, g.id).await.expect("remove"));
    assert!(!membership::remove_user_from_group(&mut conn, alice, g.id).await.expect("remove again"));
    assert_eq!(membership::count_group_members(&mut conn, g.id).await.expect("count"), 1);
}

/// ## Summary
/// Memberships referencing a missing user or group are rejected.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn membership_requires_existing_user_and_group() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let alice = test_db.seed_user("alice").await.expect("seed alice");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    let (g, _) = cohort::create_cohort(&mut conn, "Cohort A", &course, None)
        .await
        .expect("create cohort");

    let err = membership::add_user_to_group(&mut conn, alice + 1000, g.id)
        .await
        .expect_err("unknown user");
    assert!(err.is_referential_integrity_violation(), "unexpected error: {err:?}");

    let err = membership::add_user_to_group(&mut conn, alice, g.id + 1000)
        .await
        .expect_err("unknown group");
    assert!(err.is_referential_integrity_violation(), "unexpected error: {err:?}");
}

/// ## Summary
/// Moving a user between cohorts leaves exactly one cohort membership in the course
/// and does not touch other courses.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn move_user_keeps_one_cohort_per_course() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let alice = test_db.seed_user("alice").await.expect("seed alice");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();
    let other = other_course();

    let (a, _) = cohort::create_cohort(&mut conn, "Cohort A", &course, None)
        .await
        .expect("create A");
    let (b, _) = cohort::create_cohort(&mut conn, "Cohort B", &course, None)
        .await
        .expect("create B");
    let (elsewhere, _) = cohort::create_cohort(&mut conn, "Cohort A", &other, None)
        .await
        .expect("create in other course");

    membership::add_user_to_group(&mut conn, alice, a.id).await.expect("join A");
    membership::add_user_to_group(&mut conn, alice, elsewhere.id)
        .await
        .expect("join other course");

    let moved = membership::move_user_to_cohort(&mut conn, alice, b.id)
        .await
        .expect("move to B");
    assert_eq!(moved.id, b.id);

    let cohorts = membership::groups_for_user(&mut conn, alice, &course, Some(GroupType::Cohort))
        .await
        .expect("groups for user");
    assert_eq!(cohorts.iter().map(|g| g.id).collect::<Vec<_>>(), vec![b.id]);

    let current = membership::cohort_for_user(&mut conn, alice, &course)
        .await
        .expect("cohort for user")
        .expect("user has a cohort");
    assert_eq!(current.id, b.id);

    let other_cohort = membership::cohort_for_user(&mut conn, alice, &other)
        .await
        .expect("cohort in other course")
        .expect("other course membership kept");
    assert_eq!(other_cohort.id, elsewhere.id);

    // Moving into the current cohort is a no-op.
    membership::move_user_to_cohort(&mut conn, alice, b.id)
        .await
        .expect("move to same cohort");
    assert_eq!(membership::count_group_members(&mut conn, b.id).await.expect("count"), 1);
}

/// ## Summary
/// Moving to a cohort that does not exist fails and leaves the existing membership.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn move_to_missing_cohort_keeps_membership() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let alice = test_db.seed_user("alice").await.expect("seed alice");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    let (a, _) = cohort::create_cohort(&mut conn, "Cohort A", &course, None)
        .await
        .expect("create A");
    membership::add_user_to_group(&mut conn, alice, a.id).await.expect("join A");

    let err = membership::move_user_to_cohort(&mut conn, alice, a.id + 1000)
        .await
        .expect_err("missing target cohort");
    assert!(err.is_referential_integrity_violation());

    let current = membership::cohort_for_user(&mut conn, alice, &course)
        .await
        .expect("cohort for user");
    assert_eq!(current.map(|g| g.id), Some(a.id));

    let groups = group::list_groups(&mut conn, &course, Some(GroupType::Cohort))
        .await
        .expect("list cohorts");
    assert_eq!(groups.len(), 1);
}

/// ## Summary
/// Concurrent moves of one user to different cohorts leave a single cohort membership.
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
#[ignore = "requires postgres"]
async fn concurrent_moves_leave_one_cohort() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let alice = test_db.seed_user("alice").await.expect("seed alice");
    let course = course();

    let (a, b) = {
        let mut conn = test_db.get_conn().await.expect("Failed to get connection");
        let (a, _) = cohort::create_cohort(&mut conn, "Cohort A", &course, None)
            .await
            .expect("create A");
        let (b, _) = cohort::create_cohort(&mut conn, "Cohort B", &course, None)
            .await
            .expect("create B");
        (a, b)
    };

    for _ in 0..20 {
        let mut first = test_db.get_conn().await.expect("first connection");
        let mut second = test_db.get_conn().await.expect("second connection");

        let (to_a, to_b) = tokio::join!(
            membership::move_user_to_cohort(&mut first, alice, a.id),
            membership::move_user_to_cohort(&mut second, alice, b.id),
        );
        to_a.expect("move to A");
        to_b.expect("move to B");

        let cohorts =
            membership::groups_for_user(&mut first, alice, &course, Some(GroupType::Cohort))
                .await
                .expect("groups for user");
        assert_eq!(cohorts.len(), 1, "user ended in {cohorts:?}");
    }
}

/// ## Summary
/// Moving a user that does not exist is a referential integrity violation.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn move_unknown_user_is_rejected() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let alice = test_db.seed_user("alice").await.expect("seed alice");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    let (a, _) = cohort::create_cohort(&mut conn, "Cohort A", &course, None)
        .await
        .expect("create A");

    let err = membership::move_user_to_cohort(&mut conn, alice + 1000, a.id)
        .await
        .expect_err("unknown user");
    assert!(err.is_referential_integrity_violation(), "unexpected error: {err:?}");
    assert_eq!(membership::count_group_members(&mut conn, a.id).await.expect("count"), 0);
}
