pub mod membership;
pub mod partition_group;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use cohorts_core::error::CoreResult;
use cohorts_core::types::{CourseKey, validate_group_name};

use crate::db::schema;

// Re-export GroupType for public API
pub use crate::db::enums::GroupType;

/// A named group of learners within one course run.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Queryable, Selectable, Identifiable, Serialize,
)]
#[diesel(table_name = schema::course_groups_courseusergroup)]
#[diesel(check_for_backend(Pg))]
pub struct CourseUserGroup {
    pub id: i32,
    pub name: String,
    pub course_id: String,
    pub group_type: GroupType,
}

impl CourseUserGroup {
    #[must_use]
    pub fn is_cohort(&self) -> bool {
        self.group_type == GroupType::Cohort
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::course_groups_courseusergroup)]
pub struct NewCourseUserGroup<'a> {
    pub name: &'a str,
    pub course_id: &'a str,
    pub group_type: GroupType,
}

impl<'a> NewCourseUserGroup<'a> {
    /// ## Summary
    /// Builds an insertable group after checking the name against the column limits.
    ///
    /// ## Errors
    /// Returns a validation error if the name is blank or too long.
    pub fn new(name: &'a str, course: &'a CourseKey, group_type: GroupType) -> CoreResult<Self> {
        validate_group_name(name)?;
        Ok(Self {
            name,
            course_id: course.as_str(),
            group_type,
        })
    }

    /// ## Summary
    /// Builds an insertable cohort-type group.
    ///
    /// ## Errors
    /// Returns a validation error if the name is blank or too long.
    pub fn cohort(name: &'a str, course: &'a CourseKey) -> CoreResult<Self> {
        Self::new(name, course, GroupType::Cohort)
    }

    /// ## Summary
    /// Checks the fields against the column limits.
    ///
    /// ## Errors
    /// Returns a validation error if the name or course id would not fit its column.
    pub fn validate(&self) -> CoreResult<()> {
        validate_group_name(self.name)?;
        CourseKey::parse(self.course_id)?;
        Ok(())
    }
}
