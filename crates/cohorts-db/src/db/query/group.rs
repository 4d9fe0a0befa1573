//! Query functions for course user groups.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use cohorts_core::types::{CourseKey, validate_group_name};

use crate::db::connection::DbConnection;
use crate::db::enums::GroupType;
use crate::db::schema::course_groups_courseusergroup as course_user_group;
use crate::error::{DbError, DbResult};
use crate::model::group::{CourseUserGroup, NewCourseUserGroup};

type BoxedQuery<'a> = course_user_group::BoxedQuery<'a, diesel::pg::Pg>;

/// ## Summary
/// Returns a query to select all groups.
#[must_use]
pub fn all<'a>() -> BoxedQuery<'a> {
    course_user_group::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a group by ID.
#[must_use]
pub fn by_id(id: i32) -> BoxedQuery<'static> {
    all().filter(course_user_group::id.eq(id))
}

/// ## Summary
/// Returns a query to find the groups of a course, ordered by ID.
#[must_use]
pub fn by_course(course: &CourseKey) -> BoxedQuery<'_> {
    all()
        .filter(course_user_group::course_id.eq(course.as_str()))
        .order(course_user_group::id.asc())
}

/// ## Summary
/// Returns a query to find the groups of one type in a course.
#[must_use]
pub fn by_course_and_type(course: &CourseKey, group_type: GroupType) -> BoxedQuery<'_> {
    by_course(course).filter(course_user_group::group_type.eq(group_type))
}

/// ## Summary
/// Returns a query to find a group by its name within a course.
#[must_use]
pub fn by_name_and_course<'a>(name: &'a str, course: &'a CourseKey) -> BoxedQuery<'a> {
    all()
        .filter(course_user_group::name.eq(name))
        .filter(course_user_group::course_id.eq(course.as_str()))
}

/// ## Summary
/// Inserts a new group and returns the inserted record.
///
/// ## Errors
/// Returns `DbError::ValidationError` if a field exceeds its column limit,
/// `DbError::UniquenessViolation` if the course already has a group with
/// this name, or a database error if the insert fails.
#[tracing::instrument(skip(conn, new_group), fields(course_id = %new_group.course_id, name = %new_group.name))]
pub async fn create_group(
    conn: &mut DbConnection<'_>,
    new_group: &NewCourseUserGroup<'_>,
) -> DbResult<CourseUserGroup> {
    new_group.validate()?;

    let group = diesel::insert_into(course_user_group::table)
        .values(new_group)
        .returning(CourseUserGroup::as_returning())
        .get_result(conn)
        .await?;

    tracing::debug!(group_id = group.id, "Created course user group");

    Ok(group)
}

/// ## Summary
/// Retrieves a group by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_group(conn: &mut DbConnection<'_>, id: i32) -> DbResult<Option<CourseUserGroup>> {
    Ok(by_id(id)
        .get_result::<CourseUserGroup>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Retrieves a group that a write is about to reference.
///
/// ## Errors
/// Returns `DbError::ReferentialIntegrityViolation` naming `constraint` if the group
/// does not exist, or a database error if the query fails.
pub(crate) async fn require_group(
    conn: &mut DbConnection<'_>,
    id: i32,
    constraint: &str,
) -> DbResult<CourseUserGroup> {
    get_group(conn, id)
        .await?
        .ok_or_else(|| DbError::missing_reference(constraint, format!("group {id} does not exist")))
}

/// ## Summary
/// Retrieves a group by name within a course.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_group_by_name(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
    name: &str,
) -> DbResult<Option<CourseUserGroup>> {
    Ok(by_name_and_course(name, course)
        .get_result::<CourseUserGroup>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Lists the groups of a course, optionally restricted to one type.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_groups(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
    group_type: Option<GroupType>,
) -> DbResult<Vec<CourseUserGroup>> {
    let query = match group_type {
        Some(group_type) => by_course_and_type(course, group_type),
        None => by_course(course),
    };
    Ok(query.load::<CourseUserGroup>(conn).await?)
}

/// ## Summary
/// Renames a group. Returns `None` if the group does not exist.
///
/// ## Errors
/// Returns `DbError::ValidationError` for an invalid name, `DbError::UniquenessViolation`
/// if another group in the course already has the name, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn rename_group(
    conn: &mut DbConnection<'_>,
    id: i32,
    name: &str,
) -> DbResult<Option<CourseUserGroup>> {
    validate_group_name(name)?;

    Ok(diesel::update(course_user_group::table)
        .filter(course_user_group::id.eq(id))
        .set(course_user_group::name.eq(name))
        .returning(CourseUserGroup::as_returning())
        .get_result(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Deletes a group along with its memberships, partition link and cohort record.
/// Returns whether a row was deleted.
///
/// ## Errors
/// Returns a database error if the delete fails.
#[tracing::instrument(skip(conn))]
pub async fn delete_group(conn: &mut DbConnection<'_>, id: i32) -> DbResult<bool> {
    let deleted = diesel::delete(course_user_group::table.filter(course_user_group::id.eq(id)))
        .execute(conn)
        .await?;

    tracing::debug!(deleted, "Deleted course user group");

    Ok(deleted > 0)
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
