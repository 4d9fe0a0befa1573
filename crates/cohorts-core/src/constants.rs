/// Maximum length, in characters, of a group name.
pub const MAX_GROUP_NAME_LENGTH: usize = 255;

/// Maximum length, in characters, of a serialized course key.
pub const MAX_COURSE_KEY_LENGTH: usize = 255;

/// Maximum length of a stored choice value (`group_type`, `assignment_type`).
pub const MAX_CHOICE_LENGTH: usize = 20;
