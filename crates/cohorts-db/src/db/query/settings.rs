//! Query functions for per-course cohort settings.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use cohorts_core::types::CourseKey;

use crate::db::connection::DbConnection;
use crate::db::schema::course_groups_coursecohortssettings as cohorts_settings;
use crate::error::DbResult;
use crate::model::cohort::settings::{
    CourseCohortsSettings, CourseCohortsSettingsChangeset, NewCourseCohortsSettings,
};

/// ## Summary
/// Returns a query to find the settings row of a course.
#[must_use]
pub fn by_course(course: &CourseKey) -> cohorts_settings::BoxedQuery<'_, diesel::pg::Pg> {
    cohorts_settings::table
        .filter(cohorts_settings::course_id.eq(course.as_str()))
        .into_boxed()
}

/// ## Summary
/// Retrieves the settings row of a course.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_cohorts_settings(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
) -> DbResult<Option<CourseCohortsSettings>> {
    Ok(by_course(course)
        .get_result::<CourseCohortsSettings>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Returns whether cohorting is enabled for a course. A course without a settings
/// row is not cohorted.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn is_course_cohorted(conn: &mut DbConnection<'_>, course: &CourseKey) -> DbResult<bool> {
    Ok(cohorts_settings::table
        .filter(cohorts_settings::course_id.eq(course.as_str()))
        .select(cohorts_settings::is_cohorted)
        .get_result::<bool>(conn)
        .await
        .optional()?
        .unwrap_or(false))
}

/// ## Summary
/// Inserts the settings row of a course.
///
/// ## Errors
/// Returns `DbError::ValidationError` if the course id is invalid,
/// `DbError::UniquenessViolation` if the course already has settings,
/// or a database error if the insert fails.
#[tracing::instrument(skip(conn, settings), fields(course_id = %settings.course_id))]
pub async fn create_cohorts_settings(
    conn: &mut DbConnection<'_>,
    settings: &NewCourseCohortsSettings<'_>,
) -> DbResult<CourseCohortsSettings> {
    settings.validate()?;

    Ok(diesel::insert_into(cohorts_settings::table)
        .values(settings)
        .returning(CourseCohortsSettings::as_returning())
        .get_result(conn)
        .await?)
}

/// ## Summary
/// Writes the full settings of a course, inserting the row or overwriting every
/// field of the existing one.
///
/// ## Errors
/// Returns `DbError::ValidationError` if the course id is invalid, or a database
/// error if the upsert fails.
#[tracing::instrument(skip(conn, settings), fields(course_id = %settings.course_id))]
pub async fn set_cohorts_settings(
    conn: &mut DbConnection<'_>,
    settings: &NewCourseCohortsSettings<'_>,
) -> DbResult<CourseCohortsSettings> {
    settings.validate()?;

    let row = diesel::insert_into(cohorts_settings::table)
        .values(settings)
        .on_conflict(cohorts_settings::course_id)
        .do_update()
        .set(settings)
        .returning(CourseCohortsSettings::as_returning())
        .get_result(conn)
        .await?;

    tracing::debug!(
        settings_id = row.id,
        is_cohorted = row.is_cohorted,
        "Set course cohort settings"
    );

    Ok(row)
}

/// ## Summary
/// Retrieves the settings of a course, creating a row with default values if
/// none exists yet.
///
/// ## Errors
/// Returns a database error if the insert or query fails.
#[tracing::instrument(skip(conn), fields(course_id = %course))]
pub async fn get_or_create_cohorts_settings(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
) -> DbResult<CourseCohortsSettings> {
    let created = diesel::insert_into(cohorts_settings::table)
        .values(&NewCourseCohortsSettings::new(course))
        .on_conflict(cohorts_settings::course_id)
        .do_nothing()
        .execute(conn)
        .await?;

    if created > 0 {
        tracing::debug!("Created default course cohort settings");
    }

    Ok(by_course(course)
        .get_result::<CourseCohortsSettings>(conn)
        .await?)
}

/// ## Summary
/// Applies a partial update to the settings of a course. Returns `None` if the
/// course has no settings row.
///
/// ## Errors
/// Returns a database error if the update fails.
#[tracing::instrument(skip(conn, changes), fields(course_id = %course))]
pub async fn update_cohorts_settings(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
    changes: &CourseCohortsSettingsChangeset,
) -> DbResult<Option<CourseCohortsSettings>> {
    if changes.is_empty() {
        return get_cohorts_settings(conn, course).await;
    }

    Ok(diesel::update(cohorts_settings::table)
        .filter(cohorts_settings::course_id.eq(course.as_str()))
        .set(changes)
        .returning(CourseCohortsSettings::as_returning())
        .get_result(conn)
        .await
        .optional()?)
}
