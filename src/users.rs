use std::sync::{Arc, RwLock};

use crate::{api::ApiClient, error::Result, models::MergedUser};

/// Roster of the active course.
pub trait UserDirectory {
    fn find_by_course_user_id(&self, course_user_id: i64) -> Option<MergedUser>;
    fn find_by_username(&self, username: &str) -> Option<MergedUser>;
}

impl<T: UserDirectory + ?Sized> UserDirectory for Arc<T> {
    fn find_by_course_user_id(&self, course_user_id: i64) -> Option<MergedUser> {
        (**self).find_by_course_user_id(course_user_id)
    }

    fn find_by_username(&self, username: &str) -> Option<MergedUser> {
        (**self).find_by_username(username)
    }
}

#[derive(Debug, Default)]
pub struct UserRoster {
    users: RwLock<Vec<MergedUser>>,
}

impl UserRoster {
    pub fn new(users: Vec<MergedUser>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Replaces the roster with the enrolled users of `course_id`.
    pub async fn fetch(&self, api: &ApiClient, course_id: i64) -> Result<usize> {
        let users: Vec<MergedUser> = api.get(&format!("courses/{course_id}/users")).await?;
        tracing::debug!(course_id, count = users.len(), "fetched course users");
        let count = users.len();
        self.replace(users);
        Ok(count)
    }

    pub fn replace(&self, users: Vec<MergedUser>) {
        *self.users.write().unwrap_or_else(|e| e.into_inner()) = users;
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, pred: impl Fn(&MergedUser) -> bool) -> Option<MergedUser> {
        self.users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|u| pred(u))
            .cloned()
    }
}

impl UserDirectory for UserRoster {
    fn find_by_course_user_id(&self, course_user_id: i64) -> Option<MergedUser> {
        self.find(|u| u.course_user_id == course_user_id)
    }

    fn find_by_username(&self, username: &str) -> Option<MergedUser> {
        self.find(|u| u.username == username)
    }
}
