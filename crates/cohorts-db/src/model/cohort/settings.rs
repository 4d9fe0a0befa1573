//! Per-course cohorting configuration.

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use cohorts_core::types::CourseKey;

use crate::db::schema;
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = schema::course_groups_coursecohortssettings)]
#[diesel(check_for_backend(Pg))]
pub struct CourseCohortsSettings {
    pub id: i32,
    pub is_cohorted: bool,
    pub course_id: String,
    /// JSON list of discussion topic ids, stored as text.
    pub cohorted_discussions: Option<String>,
    pub always_cohort_inline_discussions: bool,
}

impl CourseCohortsSettings {
    /// ## Summary
    /// Decodes the stored list of cohorted discussion topic ids.
    ///
    /// A NULL or empty column decodes to an empty list.
    ///
    /// ## Errors
    /// Returns `DbError::ValidationError` if the stored text is not a JSON list of strings.
    pub fn cohorted_discussion_ids(&self) -> DbResult<Vec<String>> {
        decode_discussions(self.cohorted_discussions.as_deref())
    }
}

/// Insertable settings row. Field defaults match the column defaults.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::course_groups_coursecohortssettings)]
#[diesel(treat_none_as_null = true)]
pub struct NewCourseCohortsSettings<'a> {
    pub course_id: &'a str,
    pub is_cohorted: bool,
    pub cohorted_discussions: Option<String>,
    pub always_cohort_inline_discussions: bool,
}

impl<'a> NewCourseCohortsSettings<'a> {
    #[must_use]
    pub fn new(course: &'a CourseKey) -> Self {
        Self {
            course_id: course.as_str(),
            is_cohorted: false,
            cohorted_discussions: None,
            always_cohort_inline_discussions: true,
        }
    }

    /// ## Summary
    /// Checks the course id against the column limit.
    ///
    /// ## Errors
    /// Returns `DbError::ValidationError` if the course id is not a valid course key.
    pub fn validate(&self) -> DbResult<()> {
        CourseKey::parse(self.course_id)?;
        Ok(())
    }

    #[must_use]
    pub fn cohorted(mut self, is_cohorted: bool) -> Self {
        self.is_cohorted = is_cohorted;
        self
    }

    /// ## Summary
    /// Sets the cohorted discussion topic ids.
    ///
    /// ## Errors
    /// Returns an error if the list cannot be serialized.
    pub fn with_discussions<S: AsRef<str>>(mut self, topic_ids: &[S]) -> DbResult<Self> {
        self.cohorted_discussions = Some(encode_discussions(topic_ids)?);
        Ok(self)
    }
}

/// Partial update of an existing settings row; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = schema::course_groups_coursecohortssettings)]
pub struct CourseCohortsSettingsChangeset {
    pub is_cohorted: Option<bool>,
    /// `Some(None)` clears the column.
    pub cohorted_discussions: Option<Option<String>>,
    pub always_cohort_inline_discussions: Option<bool>,
}

impl CourseCohortsSettingsChangeset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_cohorted.is_none()
            && self.cohorted_discussions.is_none()
            && self.always_cohort_inline_discussions.is_none()
    }

    /// ## Summary
    /// Replaces the cohorted discussion topic ids.
    ///
    /// ## Errors
    /// Returns an error if the list cannot be serialized.
    pub fn with_discussions<S: AsRef<str>>(mut self, topic_ids: &[S]) -> DbResult<Self> {
        self.cohorted_discussions = Some(Some(encode_discussions(topic_ids)?));
        Ok(self)
    }
}

/// ## Summary
/// Serializes discussion topic ids into the stored JSON form.
///
/// ## Errors
/// Returns `DbError::ValidationError` if serialization fails.
pub fn encode_discussions<S: AsRef<str>>(topic_ids: &[S]) -> DbResult<String> {
    let ids: Vec<&str> = topic_ids.iter().map(AsRef::as_ref).collect();
    serde_json::to_string(&ids)
        .map_err(|e| DbError::ValidationError(format!("cannot encode discussion ids: {e}")))
}

/// ## Summary
/// Parses the stored JSON form of discussion topic ids.
///
/// ## Errors
/// Returns `DbError::ValidationError` if the text is not a JSON list of strings.
pub fn decode_discussions(raw: Option<&str>) -> DbResult<Vec<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| {
            DbError::ValidationError(format!("malformed cohorted_discussions: {e}"))
        }),
    }
}
