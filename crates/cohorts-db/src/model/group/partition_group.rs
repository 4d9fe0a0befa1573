use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

/// Link from a course user group to a group of a content partition.
///
/// `created_at` is set by the database on insert and never changed;
/// `updated_at` is refreshed on every write.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Queryable, Selectable, Identifiable, Associations, Serialize,
)]
#[diesel(table_name = schema::course_groups_courseusergrouppartitiongroup)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::CourseUserGroup, foreign_key = course_user_group_id))]
pub struct CourseUserGroupPartitionGroup {
    pub id: i32,
    pub course_user_group_id: i32,
    pub partition_id: i32,
    pub group_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::course_groups_courseusergrouppartitiongroup)]
pub struct NewCourseUserGroupPartitionGroup {
    pub course_user_group_id: i32,
    pub partition_id: i32,
    pub group_id: i32,
}
