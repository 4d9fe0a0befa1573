//! Query functions for group membership.
//!
//! A user may belong to several groups of a course, but the course policy allows
//! at most one cohort per course. The schema does not enforce that policy;
//! [`move_user_to_cohort`] is the write path that keeps it.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use cohorts_core::types::CourseKey;

use crate::db::connection::DbConnection;
use crate::db::enums::GroupType;
use crate::db::query::group::require_group;
use crate::db::schema::auth_user;
use crate::db::schema::course_groups_courseusergroup as course_user_group;
use crate::db::schema::course_groups_courseusergroup_users as group_users;
use crate::db::transaction::with_transaction;
use crate::error::{DbError, DbResult};
use crate::model::group::CourseUserGroup;
use crate::model::group::membership::NewMembership;
use crate::model::user::User;

const MEMBERSHIP_GROUP_FK: &str = "course_groups_courseusergroup_users_courseusergroup_id_fkey";
const MEMBERSHIP_USER_FK: &str = "course_groups_courseusergroup_users_user_id_fkey";

/// ## Summary
/// Adds a user to a group. Returns `false` if the user was already a member.
///
/// ## Errors
/// Returns `DbError::ReferentialIntegrityViolation` if the user or group does not
/// exist, or a database error if the insert fails.
#[tracing::instrument(skip(conn))]
pub async fn add_user_to_group(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    group_id: i32,
) -> DbResult<bool> {
    let inserted = diesel::insert_into(group_users::table)
        .values(&NewMembership {
            courseusergroup_id: group_id,
            user_id,
        })
        .on_conflict((group_users::courseusergroup_id, group_users::user_id))
        .do_nothing()
        .execute(conn)
        .await?;

    tracing::debug!(inserted, "Added user to group");

    Ok(inserted > 0)
}

/// ## Summary
/// Removes a user from a group. Returns `false` if the user was not a member.
///
/// ## Errors
/// Returns a database error if the delete fails.
#[tracing::instrument(skip(conn))]
pub async fn remove_user_from_group(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    group_id: i32,
) -> DbResult<bool> {
    let deleted = diesel::delete(
        group_users::table
            .filter(group_users::courseusergroup_id.eq(group_id))
            .filter(group_users::user_id.eq(user_id)),
    )
    .execute(conn)
    .await?;

    Ok(deleted > 0)
}

/// ## Summary
/// Lists the users in a group, ordered by username.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_group_members(
    conn: &mut DbConnection<'_>,
    group_id: i32,
) -> DbResult<Vec<User>> {
    Ok(auth_user::table
        .inner_join(group_users::table)
        .filter(group_users::courseusergroup_id.eq(group_id))
        .select(User::as_select())
        .order(auth_user::username.asc())
        .load(conn)
        .await?)
}

/// ## Summary
/// Counts the users in a group.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_group_members(conn: &mut DbConnection<'_>, group_id: i32) -> DbResult<i64> {
    Ok(group_users::table
        .filter(group_users::courseusergroup_id.eq(group_id))
        .count()
        .get_result(conn)
        .await?)
}

/// ## Summary
/// Lists the groups of a course that a user belongs to, optionally restricted to one type.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn groups_for_user(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    course: &CourseKey,
    group_type: Option<GroupType>,
) -> DbResult<Vec<CourseUserGroup>> {
    let mut query = course_user_group::table
        .inner_join(group_users::table)
        .filter(group_users::user_id.eq(user_id))
        .filter(course_user_group::course_id.eq(course.as_str()))
        .select(CourseUserGroup::as_select())
        .order(course_user_group::id.asc())
        .into_boxed();

    if let Some(group_type) = group_type {
        query = query.filter(course_user_group::group_type.eq(group_type));
    }

    Ok(query.load(conn).await?)
}

/// ## Summary
/// Returns the cohort a user belongs to in a course, if any.
///
/// If the user is in several cohorts (possible only through direct membership
/// writes), the oldest cohort is returned.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn cohort_for_user(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    course: &CourseKey,
) -> DbResult<Option<CourseUserGroup>> {
    let cohorts = groups_for_user(conn, user_id, course, Some(GroupType::Cohort)).await?;

    if cohorts.len() > 1 {
        tracing::warn!(
            user_id,
            course_id = %course,
            cohorts = cohorts.len(),
            "User belongs to more than one cohort in course"
        );
    }

    Ok(cohorts.into_iter().next())
}

/// ## Summary
/// Places a user in a cohort, removing them from any other cohort of the same course.
///
/// Runs in a single transaction that holds a row lock on the user, so concurrent
/// moves of the same user apply one after the other. Memberships in non-cohort
/// groups are untouched.
///
/// ## Errors
/// Returns `DbError::ReferentialIntegrityViolation` if the cohort or user does not exist,
/// `DbError::ValidationError` if the target group is not a cohort, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn move_user_to_cohort(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    cohort_id: i32,
) -> DbResult<CourseUserGroup> {
    with_transaction(conn, |tx| {
        async move {
            auth_user::table
                .find(user_id)
                .select(auth_user::id)
                .for_update()
                .get_result::<i32>(tx)
                .await
                .optional()?
                .ok_or_else(|| {
                    DbError::missing_reference(
                        MEMBERSHIP_USER_FK,
                        format!("user {user_id} does not exist"),
                    )
                })?;

            let cohort = require_group(tx, cohort_id, MEMBERSHIP_GROUP_FK).await?;
            if !cohort.is_cohort() {
                return Err(DbError::ValidationError(format!(
                    "group {cohort_id} is not a cohort"
                )));
            }

            let other_cohorts = course_user_group::table
                .select(course_user_group::id)
                .filter(course_user_group::course_id.eq(cohort.course_id.clone()))
                .filter(course_user_group::group_type.eq(GroupType::Cohort))
                .filter(course_user_group::id.ne(cohort_id));

            let removed = diesel::delete(
                group_users::table
                    .filter(group_users::user_id.eq(user_id))
                    .filter(group_users::courseusergroup_id.eq_any(other_cohorts)),
            )
            .execute(tx)
            .await?;

            add_user_to_group(tx, user_id, cohort_id).await?;

            tracing::debug!(removed, course_id = %cohort.course_id, "Moved user to cohort");

            Ok(cohort)
        }
        .scope_boxed()
    })
    .await
}
