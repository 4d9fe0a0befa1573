use crate::db::schema;
use diesel::prelude::*;

/// Link between a user and a course user group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::course_groups_courseusergroup_users)]
pub struct NewMembership {
    pub courseusergroup_id: i32,
    pub user_id: i32,
}
