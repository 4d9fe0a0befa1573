use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

/// Row of the identity table that memberships reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::auth_user)]
#[diesel(check_for_backend(Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::auth_user)]
pub struct NewUser<'a> {
    pub username: &'a str,
}
