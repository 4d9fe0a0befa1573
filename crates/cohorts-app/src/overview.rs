//! Read-only summary of a course's cohort configuration.

use serde::Serialize;

use cohorts_core::types::CourseKey;
use cohorts_db::db::connection::DbConnection;
use cohorts_db::db::enums::{AssignmentType, GroupType};
use cohorts_db::db::query::{cohort, group, membership, partition_group, settings};
use cohorts_db::error::DbResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOverview {
    pub course_id: String,
    pub settings: Option<SettingsOverview>,
    pub groups: Vec<GroupOverview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsOverview {
    pub is_cohorted: bool,
    pub cohorted_discussions: Vec<String>,
    pub always_cohort_inline_discussions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionLink {
    pub partition_id: i32,
    pub group_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOverview {
    pub id: i32,
    pub name: String,
    pub group_type: GroupType,
    pub member_count: i64,
    pub assignment_type: Option<AssignmentType>,
    pub partition: Option<PartitionLink>,
}

/// ## Summary
/// Collects the settings row and every group of a course with its member count,
/// cohort policy and partition link.
///
/// ## Errors
/// Returns a database error if any query fails, or a validation error if the stored
/// discussion list is malformed.
pub async fn course_overview(
    conn: &mut DbConnection<'_>,
    course: &CourseKey,
) -> DbResult<CourseOverview> {
    let settings = match settings::get_cohorts_settings(conn, course).await? {
        Some(row) => Some(SettingsOverview {
            cohorted_discussions: row.cohorted_discussion_ids()?,
            is_cohorted: row.is_cohorted,
            always_cohort_inline_discussions: row.always_cohort_inline_discussions,
        }),
        None => None,
    };

    let mut groups = Vec::new();
    for row in group::list_groups(conn, course, None).await? {
        let member_count = membership::count_group_members(conn, row.id).await?;
        let assignment_type = cohort::get_course_cohort(conn, row.id)
            .await?
            .map(|c| c.assignment_type);
        let partition = partition_group::get_partition_group(conn, row.id)
            .await?
            .map(|link| PartitionLink {
                partition_id: link.partition_id,
                group_id: link.group_id,
            });

        groups.push(GroupOverview {
            id: row.id,
            name: row.name,
            group_type: row.group_type,
            member_count,
            assignment_type,
            partition,
        });
    }

    tracing::debug!(groups = groups.len(), "Collected course overview");

    Ok(CourseOverview {
        course_id: course.to_string(),
        settings,
        groups,
    })
}
