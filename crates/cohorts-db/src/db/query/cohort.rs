//! Query functions for cohort assignment policies.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use cohorts_core::types::{CourseKey, validate_group_name};

use crate::db::connection::DbConnection;
use crate::db::enums::{AssignmentType, GroupType};
use crate::db::query::group::{create_group, require_group};
use crate::db::schema::course_groups_coursecohort as course_cohort;
use crate::db::schema::course_groups_courseusergroup as course_user_group;
use crate::db::transaction::with_transaction;
use crate::error::{DbError, DbResult};
use crate::model::cohort::{CourseCohort, NewCourseCohort};
use crate::model::group::{CourseUserGroup, NewCourseUserGroup};

const COHORT_GROUP_FK: &str = "course_groups_coursecohort_course_user_group_id_fkey";

/// ## Summary
/// Returns a query to find the cohort record of a group.
#[must_use]
pub fn by_group(course_user_group_id: i32) -> course_cohort::BoxedQuery<'static, diesel::pg::Pg> {
    course_cohort::table
        .filter(course_cohort::course_user_group_id.eq(course_user_group_id))
        .into_boxed()
}

/// ## Summary
/// Inserts a cohort record without checking the group type.
///
/// ## Errors
/// Returns `DbError::UniquenessViolation` if the group already has a cohort record,
/// `DbError::ReferentialIntegrityViolation` if the group does not exist, or a database error.
pub async fn insert_course_cohort(
    conn: &mut DbConnection<'_>,
    new_cohort: &NewCourseCohort,
) -> DbResult<CourseCohort> {
    Ok(diesel::insert_into(course_cohort::table)
        .values(new_cohort)
        .returning(CourseCohort::as_returning())
        .get_result(conn)
        .await?)
}

/// ## Summary
/// Attaches a cohort record to an existing cohort-type group.
/// `assignment_type` defaults to [`AssignmentType::Manual`].
///
/// ## Errors
/// Returns `DbError::ReferentialIntegrityViolation` if the group does not exist,
/// `DbError::ValidationError` if the group is not a cohort, `DbError::UniquenessViolation`
/// if the group already has a cohort record, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn create_course_cohort(
    conn: &mut DbConnection<'_>,
    course_user_group_id: i32,
    assignment_type: Option<AssignmentType>,
) -> DbResult<CourseCohort> {
    let group = require_group(conn, course_user_group_id, COHORT_GROUP_FK).await?;
    if group.group_type != GroupType::Cohort {
        return Err(DbError::ValidationError(format!(
            "group {course_user_group_id} has type {}, expected {}",
            group.group_type,
            GroupType::Cohort
        )));
    }

    let cohort = insert_course_cohort(
        conn,
        &NewCourseCohort::new(course_user_group_id, assignment_type),
    )
    .await?;

    tracing::debug!(cohort_id = cohort.id, assignment_type = %cohort.assignment_type, "Created course cohort");

    Ok(cohort)
}

/// ## Summary
/// Creates a cohort-type group and its cohort record in one transaction.
///
/// ## Errors
/// Returns `DbError::ValidationError` for an invalid name, `DbError::UniquenessViolation`
/// if the course already has a group with this name, or a database error.
#[tracing::instrument(skip(conn), fields(course_id = %course))]
pub async fn create_cohort(
    conn: &mut DbConnection<'_>,
    name: &str,
    course: &CourseKey,
    assignment_type: Option<AssignmentType>,
) -> DbResult<(CourseUserGroup, CourseCohort)> {
    validate_group_name(name)?;
    let name = name.to_owned();
    let course = course.clone();

    with_transaction(conn, |tx| {
        async move {
            let group = create_group(tx, &NewCourseUserGroup::cohort(&name, &course)?).await?;
            let cohort =
                insert_course_cohort(tx, &NewCourseCohort::new(group.id, assignment_type)).await?;
            Ok((group, cohort))
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Retrieves the cohort record of a group.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_course_cohort(
    conn: &mut DbConnection<'_>,
    course_user_group_id: i32,
) -> DbResult<Option<CourseCohort>> {
    Ok(by_group(course_user_group_id)
        .get_result::<CourseCohort>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Changes the assignment policy of a cohort. Returns `None` if the group has no
/// cohort record.
///
/// ## Errors
/// Returns a database error if the update fails.
#[tracing::instrument(skip(conn))]
pub async fn set_assignment_type(
    conn: &mut DbConnection<'_>,
    course_user_group_id: i32,
    assignment_type: AssignmentType,
) -> DbResult<Option<CourseCohort>> {
    Ok(diesel::update(course_cohort::table)
        .filter(course_cohort::course_user_group_id.eq(course_user_group_id))
        .set(course_cohort::assignment_type.eq(assignment_type))
        .returning(CourseCohort::as_returning())
        .get_result(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Lists the cohorts of a course with their assignment policy, ordered by name.
///
/// Cohort-type groups without a cohort record are not included.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_cohorts(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
) -> DbResult<Vec<(CourseUserGroup, CourseCohort)>> {
    Ok(course_user_group::table
        .inner_join(course_cohort::table)
        .filter(course_user_group::course_id.eq(course.as_str()))
        .filter(course_user_group::group_type.eq(GroupType::Cohort))
        .select((CourseUserGroup::as_select(), CourseCohort::as_select()))
        .order(course_user_group::name.asc())
        .load(conn)
        .await?)
}

/// ## Summary
/// Lists the cohorts of a course that use the given assignment policy, ordered by name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_cohorts_by_assignment(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
    assignment_type: AssignmentType,
) -> DbResult<Vec<CourseUserGroup>> {
    Ok(course_user_group::table
        .inner_join(course_cohort::table)
        .filter(course_user_group::course_id.eq(course.as_str()))
        .filter(course_user_group::group_type.eq(GroupType::Cohort))
        .filter(course_cohort::assignment_type.eq(assignment_type))
        .select(CourseUserGroup::as_select())
        .order(course_user_group::name.asc())
        .load(conn)
        .await?)
}
