//! Identifier and field types shared across crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_COURSE_KEY_LENGTH, MAX_GROUP_NAME_LENGTH};
use crate::error::{CoreError, CoreResult};

/// Opaque identifier of a course run (e.g. `course-v1:Org+CS1+2024`).
///
/// Groups belong to a specific run of a course, so two runs of the same course
/// never share groups or settings. The key is stored verbatim; the only rules
/// enforced here are the ones the storage column imposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseKey(String);

impl CourseKey {
    /// ## Summary
    /// Parses a serialized course key.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if the key is empty, has surrounding
    /// whitespace, or exceeds the column length.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        if raw.is_empty() {
            return Err(CoreError::ValidationError(
                "course key must not be empty".to_owned(),
            ));
        }
        if raw.trim() != raw {
            return Err(CoreError::ValidationError(format!(
                "course key {raw:?} has surrounding whitespace"
            )));
        }
        let length = raw.chars().count();
        if length > MAX_COURSE_KEY_LENGTH {
            return Err(CoreError::ValidationError(format!(
                "course key is {length} characters, maximum is {MAX_COURSE_KEY_LENGTH}"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CourseKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CourseKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CourseKey> for String {
    fn from(key: CourseKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CourseKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ## Summary
/// Checks a group name against the column constraints.
///
/// ## Errors
/// Returns `CoreError::ValidationError` if the name is blank or longer than
/// [`MAX_GROUP_NAME_LENGTH`] characters.
pub fn validate_group_name(name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "group name must not be blank".to_owned(),
        ));
    }
    let length = name.chars().count();
    if length > MAX_GROUP_NAME_LENGTH {
        return Err(CoreError::ValidationError(format!(
            "group name is {length} characters, maximum is {MAX_GROUP_NAME_LENGTH}"
        )));
    }
    Ok(())
}
