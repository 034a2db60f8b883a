//! Lookup keys. Each variant is one valid combination of fields, so a caller
//! always states which key it is searching by.

/// Identifies a problem set by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetInfo {
    Id(i64),
    Name(String),
}

impl SetInfo {
    pub fn name(name: impl Into<String>) -> Self {
        SetInfo::Name(name.into())
    }
}

impl From<i64> for SetInfo {
    fn from(set_id: i64) -> Self {
        SetInfo::Id(set_id)
    }
}

impl From<&str> for SetInfo {
    fn from(set_name: &str) -> Self {
        SetInfo::Name(set_name.to_owned())
    }
}

/// Identifies a user by global user id or by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInfo {
    UserId(i64),
    Username(String),
}

impl UserInfo {
    pub fn username(username: impl Into<String>) -> Self {
        UserInfo::Username(username.into())
    }
}

/// Identifies one user set, either directly or through its set and owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSetQuery {
    ById(i64),
    BySetAndUser { set: SetInfo, username: String },
}

impl UserSetQuery {
    pub fn by_set_and_user(set: impl Into<SetInfo>, username: impl Into<String>) -> Self {
        UserSetQuery::BySetAndUser {
            set: set.into(),
            username: username.into(),
        }
    }
}
