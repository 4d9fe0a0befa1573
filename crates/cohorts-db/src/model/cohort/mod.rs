pub mod settings;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

// Re-export AssignmentType for public API
pub use crate::db::enums::AssignmentType;

/// Assignment policy attached to a cohort-type group.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Queryable, Selectable, Identifiable, Associations, Serialize,
)]
#[diesel(table_name = schema::course_groups_coursecohort)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::group::CourseUserGroup, foreign_key = course_user_group_id))]
pub struct CourseCohort {
    pub id: i32,
    pub course_user_group_id: i32,
    pub assignment_type: AssignmentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::course_groups_coursecohort)]
pub struct NewCourseCohort {
    pub course_user_group_id: i32,
    pub assignment_type: AssignmentType,
}

impl NewCourseCohort {
    #[must_use]
    pub fn new(course_user_group_id: i32, assignment_type: Option<AssignmentType>) -> Self {
        Self {
            course_user_group_id,
            assignment_type: assignment_type.unwrap_or_default(),
        }
    }
}
