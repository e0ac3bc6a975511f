use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub document: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub state: String,
}

/// Fields required to insert a user. The id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub document: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub state: String,
}

/// Partial update applied to a user located by its `document`.
///
/// Each slot is independent: `None` leaves the stored value alone, and so does
/// `Some("")`. Empty strings are skipped rather than clearing the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl UserPatch {
    /// Merges the non-empty slots into `user`. Returns true if any stored value changed.
    pub fn apply_to(&self, user: &mut User) -> bool {
        let mut changed = false;
        changed |= merge_field(&mut user.username, self.username.as_deref());
        changed |= merge_field(&mut user.phone_number, self.phone_number.as_deref());
        changed |= merge_field(&mut user.email, self.email.as_deref());
        changed |= merge_field(&mut user.password, self.password.as_deref());
        changed |= merge_field(&mut user.state, self.state.as_deref());
        changed
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.username,
            &self.phone_number,
            &self.email,
            &self.password,
            &self.state,
        ]
        .iter()
        .all(|slot| slot.as_deref().map_or(true, str::is_empty))
    }
}

fn merge_field(stored: &mut String, incoming: Option<&str>) -> bool {
    match incoming {
        Some(value) if !value.is_empty() && value != stored.as_str() => {
            *stored = value.to_string();
            true
        }
        _ => false,
    }
}
