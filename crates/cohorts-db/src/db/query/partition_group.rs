//! Query functions for links between groups and content partition groups.

use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use cohorts_core::types::CourseKey;

use crate::db::connection::DbConnection;
use crate::db::schema::course_groups_courseusergroup as course_user_group;
use crate::db::schema::course_groups_courseusergrouppartitiongroup as partition_group;
use crate::error::DbResult;
use crate::model::group::CourseUserGroup;
use crate::model::group::partition_group::{
    CourseUserGroupPartitionGroup, NewCourseUserGroupPartitionGroup,
};

/// ## Summary
/// Returns a query to find the partition link of a group.
#[must_use]
pub fn by_group(
    course_user_group_id: i32,
) -> partition_group::BoxedQuery<'static, diesel::pg::Pg> {
    partition_group::table
        .filter(partition_group::course_user_group_id.eq(course_user_group_id))
        .into_boxed()
}

/// ## Summary
/// Inserts a partition link for a group that has none.
///
/// ## Errors
/// Returns `DbError::UniquenessViolation` if the group already has a link,
/// `DbError::ReferentialIntegrityViolation` if the group does not exist, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn create_partition_group(
    conn: &mut DbConnection<'_>,
    link: &NewCourseUserGroupPartitionGroup,
) -> DbResult<CourseUserGroupPartitionGroup> {
    Ok(diesel::insert_into(partition_group::table)
        .values(link)
        .returning(CourseUserGroupPartitionGroup::as_returning())
        .get_result(conn)
        .await?)
}

/// ## Summary
/// Creates or replaces the partition link of a group.
///
/// `created_at` keeps its first-insert value; `updated_at` is set to the database's
/// current time on every call, even when the partition and group ids are unchanged.
///
/// ## Errors
/// Returns `DbError::ReferentialIntegrityViolation` if the group does not exist,
/// or a database error if the upsert fails.
#[tracing::instrument(skip(conn))]
pub async fn set_partition_group(
    conn: &mut DbConnection<'_>,
    course_user_group_id: i32,
    partition_id: i32,
    group_id: i32,
) -> DbResult<CourseUserGroupPartitionGroup> {
    let link = diesel::insert_into(partition_group::table)
        .values(&NewCourseUserGroupPartitionGroup {
            course_user_group_id,
            partition_id,
            group_id,
        })
        .on_conflict(partition_group::course_user_group_id)
        .do_update()
        .set((
            partition_group::partition_id.eq(excluded(partition_group::partition_id)),
            partition_group::group_id.eq(excluded(partition_group::group_id)),
            partition_group::updated_at.eq(now),
        ))
        .returning(CourseUserGroupPartitionGroup::as_returning())
        .get_result(conn)
        .await?;

    tracing::debug!(link_id = link.id, "Set partition group link");

    Ok(link)
}

/// ## Summary
/// Retrieves the partition link of a group.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_partition_group(
    conn: &mut DbConnection<'_>,
    course_user_group_id: i32,
) -> DbResult<Option<CourseUserGroupPartitionGroup>> {
    Ok(by_group(course_user_group_id)
        .get_result::<CourseUserGroupPartitionGroup>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Removes the partition link of a group. Returns whether a link existed.
///
/// ## Errors
/// Returns a database error if the delete fails.
#[tracing::instrument(skip(conn))]
pub async fn delete_partition_group(
    conn: &mut DbConnection<'_>,
    course_user_group_id: i32,
) -> DbResult<bool> {
    let deleted = diesel::delete(
        partition_group::table
            .filter(partition_group::course_user_group_id.eq(course_user_group_id)),
    )
    .execute(conn)
    .await?;

    Ok(deleted > 0)
}

/// ## Summary
/// Lists the groups of a course linked to a given partition group.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn groups_for_partition_group(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
    partition_id: i32,
    group_id: i32,
) -> DbResult<Vec<CourseUserGroup>> {
    Ok(course_user_group::table
        .inner_join(partition_group::table)
        .filter(course_user_group::course_id.eq(course.as_str()))
        .filter(partition_group::partition_id.eq(partition_id))
        .filter(partition_group::group_id.eq(group_id))
        .select(CourseUserGroup::as_select())
        .order(course_user_group::id.asc())
        .load(conn)
        .await?)
}
