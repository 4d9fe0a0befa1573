//! Tests for per-course cohort settings.

use cohorts_test::db::db::query::settings;
use cohorts_test::db::model::cohort::settings::{
    CourseCohortsSettingsChangeset, NewCourseCohortsSettings,
};

use super::helpers::*;

/// ## Summary
/// Setting the same course twice updates the single row.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn set_settings_twice_keeps_one_row() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    let first = settings::set_cohorts_settings(
        &mut conn,
        &NewCourseCohortsSettings::new(&course)
            .cohorted(true)
            .with_discussions(&["general", "week-1"])
            .expect("encodes"),
    )
    .await
    .expect("first set");
    assert!(first.is_cohorted);

    let second = settings::set_cohorts_settings(
        &mut conn,
        &NewCourseCohortsSettings::new(&course).cohorted(false),
    )
    .await
    .expect("second set");
    assert_eq!(second.id, first.id);
    assert!(!second.is_cohorted);
    // A full set overwrites the discussion list as well.
    assert!(second.cohorted_discussion_ids().expect("decodes").is_empty());

    assert!(!settings::is_course_cohorted(&mut conn, &course).await.expect("flag"));
}

/// ## Summary
/// A direct second insert for the same course fails with a uniqueness violation.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn direct_second_insert_is_rejected() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    settings::create_cohorts_settings(&mut conn, &NewCourseCohortsSettings::new(&course))
        .await
        .expect("first insert");
    let err = settings::create_cohorts_settings(
        &mut conn,
        &NewCourseCohortsSettings::new(&course).cohorted(true),
    )
    .await
    .expect_err("second insert must fail");
    assert!(err.is_uniqueness_violation(), "unexpected error: {err:?}");
}

/// ## Summary
/// Settings are created lazily with defaults and partial updates leave other fields alone.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn lazy_create_and_partial_update() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let course = course();

    assert!(
        settings::get_cohorts_settings(&mut conn, &course)
            .await
            .expect("get")
            .is_none()
    );
    assert!(!settings::is_course_cohorted(&mut conn, &course).await.expect("flag"));

    let missing = settings::update_cohorts_settings(
        &mut conn,
        &course,
        &CourseCohortsSettingsChangeset {
            is_cohorted: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("update of missing row");
    assert!(missing.is_none());

    let created = settings::get_or_create_cohorts_settings(&mut conn, &course)
        .await
        .expect("lazy create");
    assert!(!created.is_cohorted);
    assert!(created.always_cohort_inline_discussions);
    assert!(created.cohorted_discussions.is_none());

    let again = settings::get_or_create_cohorts_settings(&mut conn, &course)
        .await
        .expect("second get_or_create");
    assert_eq!(again.id, created.id);

    let updated = settings::update_cohorts_settings(
        &mut conn,
        &course,
        &CourseCohortsSettingsChangeset {
            is_cohorted: Some(true),
            ..Default::default()
        }
        .with_discussions(&["general"])
        .expect("encodes"),
    )
    .await
    .expect("update")
    .expect("row exists");
    assert!(updated.is_cohorted);
    assert!(updated.always_cohort_inline_discussions);
    assert_eq!(
        updated.cohorted_discussion_ids().expect("decodes"),
        vec!["general".to_owned()]
    );

    let unchanged = settings::update_cohorts_settings(
        &mut conn,
        &course,
        &CourseCohortsSettingsChangeset::default(),
    )
    .await
    .expect("empty update")
    .expect("row exists");
    assert_eq!(unchanged, updated);
}

/// ## Summary
/// An over-long course id is a validation error on both insert paths.
#[test_log::test(tokio::test)]
#[ignore = "requires postgres"]
async fn overlong_course_id_is_a_validation_error() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");

    let course_id = "c".repeat(300);
    let new = NewCourseCohortsSettings {
        course_id: &course_id,
        is_cohorted: true,
        cohorted_discussions: None,
        always_cohort_inline_discussions: true,
    };

    let err = settings::create_cohorts_settings(&mut conn, &new)
        .await
        .expect_err("course id too long");
    assert!(err.is_validation_error(), "unexpected error: {err:?}");

    let err = settings::set_cohorts_settings(&mut conn, &new)
        .await
        .expect_err("course id too long");
    assert!(err.is_validation_error(), "unexpected error: {err:?}");
}
