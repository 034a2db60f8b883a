use crate::{
    api::ApiClient,
    error::{Result, StoreError},
    merge::{merge_lenient, merge_user_set},
    models::{MergedUserSet, ProblemSet, UserSet},
    query::{SetInfo, UserInfo, UserSetQuery},
    session::SessionProvider,
    users::UserDirectory,
};

/// Cache of the problem sets and user sets of the active course, kept in
/// step with the server by the async actions below.
///
/// The user-set collection holds whatever the last `fetch_*` call loaded; it
/// is not keyed by scope.
pub struct ProblemSetStore<S, U> {
    api: ApiClient,
    session: S,
    users: U,
    problem_sets: Vec<ProblemSet>,
    user_sets: Vec<UserSet>,
}

impl<S: SessionProvider, U: UserDirectory> ProblemSetStore<S, U> {
    pub fn new(api: ApiClient, session: S, users: U) -> Self {
        Self {
            api,
            session,
            users,
            problem_sets: Vec::new(),
            user_sets: Vec::new(),
        }
    }

    pub fn problem_sets(&self) -> &[ProblemSet] {
        &self.problem_sets
    }

    pub fn user_sets(&self) -> &[UserSet] {
        &self.user_sets
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    fn active_course(&self) -> Result<i64> {
        self.session.course_id().ok_or(StoreError::NoActiveCourse)
    }

    // --- getters ---

    pub fn find_problem_set(&self, info: &SetInfo) -> Option<&ProblemSet> {
        match info {
            SetInfo::Id(set_id) => self.problem_sets.iter().find(|s| s.set_id == Some(*set_id)),
            SetInfo::Name(name) => self.problem_sets.iter().find(|s| &s.set_name == name),
        }
    }

    /// All user sets of one problem set; empty when a name does not resolve.
    pub fn find_user_sets(&self, info: &SetInfo) -> Vec<&UserSet> {
        let set_id = match info {
            SetInfo::Id(set_id) => Some(*set_id),
            SetInfo::Name(_) => self.find_problem_set(info).and_then(|s| s.set_id),
        };
        match set_id {
            Some(set_id) => self.user_sets.iter().filter(|us| us.set_id == set_id).collect(),
            None => Vec::new(),
        }
    }

    /// Every cached user set merged with its problem set and owner. Missing
    /// partners are replaced by empty records and logged.
    pub fn merged_user_sets(&self) -> Vec<MergedUserSet> {
        self.user_sets
            .iter()
            .map(|us| {
                let problem_set = self.find_problem_set(&SetInfo::Id(us.set_id));
                let user = self.users.find_by_course_user_id(us.course_user_id);
                merge_lenient(us, problem_set, user.as_ref())
            })
            .collect()
    }

    /// Like [`merged_user_sets`](Self::merged_user_sets) but fails on the
    /// first user set whose problem set or owner is not loaded.
    pub fn try_merged_user_sets(&self) -> Result<Vec<MergedUserSet>> {
        self.user_sets
            .iter()
            .map(|us| {
                let problem_set = self.find_problem_set(&SetInfo::Id(us.set_id)).ok_or(
                    StoreError::Dangling {
                        user_set_id: us.user_set_id,
                        missing: "problem set",
                    },
                )?;
                let user = self.users.find_by_course_user_id(us.course_user_id).ok_or(
                    StoreError::Dangling {
                        user_set_id: us.user_set_id,
                        missing: "user",
                    },
                )?;
                Ok(merge_user_set(us, problem_set, &user))
            })
            .collect()
    }

    pub fn find_merged_user_set(&self, query: &UserSetQuery) -> Option<MergedUserSet> {
        match query {
            UserSetQuery::ById(user_set_id) => {
                let user_set = self
                    .user_sets
                    .iter()
                    .find(|us| us.user_set_id == Some(*user_set_id))?;
                let problem_set = self.find_problem_set(&SetInfo::Id(user_set.set_id))?;
                let user = self.users.find_by_course_user_id(user_set.course_user_id)?;
                Some(merge_user_set(user_set, problem_set, &user))
            }
            UserSetQuery::BySetAndUser { set, username } => {
                let problem_set = self.find_problem_set(set)?;
                let set_id = problem_set.set_id?;
                let user = self.users.find_by_username(username)?;
                let user_set = self
                    .user_sets
                    .iter()
                    .find(|us| us.set_id == set_id && us.course_user_id == user.course_user_id)?;
                Some(merge_user_set(user_set, problem_set, &user))
            }
        }
    }

    /// Opt-in fallback for [`find_merged_user_set`](Self::find_merged_user_set):
    /// missing partners become empty records, and a user set that cannot be
    /// located yields `MergedUserSet::default()`.
    pub fn find_merged_user_set_or_default(&self, query: &UserSetQuery) -> MergedUserSet {
        let user_set = match query {
            UserSetQuery::ById(user_set_id) => self
                .user_sets
                .iter()
                .find(|us| us.user_set_id == Some(*user_set_id)),
            UserSetQuery::BySetAndUser { set, username } => {
                let set_id = self.find_problem_set(set).and_then(|s| s.set_id);
                let user = self.users.find_by_username(username);
                match (set_id, user) {
                    (Some(set_id), Some(user)) => self
                        .user_sets
                        .iter()
                        .find(|us| us.set_id == set_id && us.course_user_id == user.course_user_id),
                    _ => None,
                }
            }
        };
        match user_set {
            Some(us) => {
                let problem_set = self.find_problem_set(&SetInfo::Id(us.set_id));
                let user = self.users.find_by_course_user_id(us.course_user_id);
                merge_lenient(us, problem_set, user.as_ref())
            }
            None => {
                tracing::warn!(?query, "no user set matches query");
                MergedUserSet::default()
            }
        }
    }

    /// Empties both collections, e.g. on course switch or logout.
    pub fn clear_all(&mut self) {
        self.problem_sets.clear();
        self.user_sets.clear();
    }

    // --- problem set actions ---

    pub async fn fetch_problem_sets(&mut self, course_id: i64) -> Result<()> {
        let sets: Vec<ProblemSet> = self.api.get(&format!("courses/{course_id}/sets")).await?;
        tracing::debug!(course_id, count = sets.len(), "fetched problem sets");
        for set in sets.iter().filter(|s| s.course_id != course_id) {
            tracing::warn!(
                course_id,
                set_id = ?set.set_id,
                set_course_id = set.course_id,
                "problem set belongs to another course"
            );
        }
        self.problem_sets = sets;
        Ok(())
    }

    pub async fn add_problem_set(&mut self, set: &ProblemSet) -> Result<ProblemSet> {
        let new_set: ProblemSet = self
            .api
            .post(&format!("courses/{}/sets", set.course_id), set)
            .await?;
        tracing::info!(set_id = ?new_set.set_id, set_name = %new_set.set_name, "added problem set");
        self.problem_sets.push(new_set.clone());
        Ok(new_set)
    }

    /// Sends a full replacement of `set`. A non-2xx response is returned as
    /// [`StoreError::Api`] and leaves the collection as it was.
    pub async fn update_set(&mut self, set: &ProblemSet) -> Result<ProblemSet> {
        let set_id = set.set_id.ok_or(StoreError::MissingId("set_id"))?;
        let updated: ProblemSet = self
            .api
            .put(&format!("courses/{}/sets/{set_id}", set.course_id), set)
            .await?;
        if updated != *set {
            tracing::error!(set_id, "response does not match requested update to set");
        }

        match self.problem_sets.iter().position(|s| s.set_id == Some(set_id)) {
            Some(index) => self.problem_sets[index] = updated.clone(),
            None => tracing::warn!(set_id, "updated set is not cached, collection unchanged"),
        }
        tracing::info!(set_id, "{} was successfully updated", updated.set_name);
        Ok(updated)
    }

    pub async fn delete_problem_set(&mut self, set: &ProblemSet) -> Result<ProblemSet> {
        let set_id = set.set_id.ok_or(StoreError::MissingId("set_id"))?;
        let deleted: ProblemSet = self
            .api
            .delete(&format!("courses/{}/sets/{set_id}", set.course_id))
            .await?;
        let target = deleted.set_id.unwrap_or(set_id);
        if let Some(index) = self.problem_sets.iter().position(|s| s.set_id == Some(target)) {
            self.problem_sets.remove(index);
        }
        tracing::info!(set_id = target, "deleted problem set");
        Ok(deleted)
    }

    // --- user set actions ---

    pub async fn fetch_all_user_sets(&mut self, course_id: i64) -> Result<()> {
        let path = format!("courses/{course_id}/user-sets");
        self.user_sets = self.api.get(&path).await?;
        tracing::debug!(course_id, count = self.user_sets.len(), "fetched user sets");
        Ok(())
    }

    pub async fn fetch_user_sets(&mut self, course_id: i64, set_id: i64) -> Result<()> {
        let path = format!("courses/{course_id}/sets/{set_id}/users");
        self.user_sets = self.api.get(&path).await?;
        tracing::debug!(course_id, set_id, count = self.user_sets.len(), "fetched user sets");
        Ok(())
    }

    pub async fn fetch_user_sets_for_user(&mut self, info: &UserInfo) -> Result<()> {
        let user_id = match info {
            UserInfo::UserId(user_id) => *user_id,
            UserInfo::Username(username) => {
                self.users
                    .find_by_username(username)
                    .ok_or_else(|| StoreError::UnknownUser(username.clone()))?
                    .user_id
            }
        };
        let course_id = self.active_course()?;
        let path = format!("courses/{course_id}/users/{user_id}/sets");
        self.user_sets = self.api.get(&path).await?;
        tracing::debug!(course_id, user_id, count = self.user_sets.len(), "fetched user sets");
        Ok(())
    }

    pub async fn add_user_set(&mut self, user_set: &UserSet) -> Result<UserSet> {
        let course_id = self.active_course()?;
        let added: UserSet = self
            .api
            .post(&format!("courses/{course_id}/sets/{}/users", user_set.set_id), user_set)
            .await?;
        tracing::info!(
            user_set_id = ?added.user_set_id,
            set_id = added.set_id,
            course_user_id = added.course_user_id,
            "added user set"
        );
        self.user_sets.push(added.clone());
        Ok(added)
    }

    pub async fn update_user_set(&mut self, user_set: &UserSet) -> Result<UserSet> {
        let course_id = self.active_course()?;
        let path = format!(
            "courses/{course_id}/sets/{}/users/{}",
            user_set.set_id, user_set.course_user_id
        );
        let updated: UserSet = self.api.put(&path, user_set).await?;
        if !user_set_echo_matches(user_set, &updated) {
            tracing::error!(
                set_id = user_set.set_id,
                course_user_id = user_set.course_user_id,
                "response does not match requested update to user set"
            );
        }

        match self.user_set_position(updated.user_set_id.or(user_set.user_set_id)) {
            Some(index) => self.user_sets[index] = updated.clone(),
            None => tracing::warn!(
                user_set_id = ?updated.user_set_id,
                "updated user set is not cached, collection unchanged"
            ),
        }
        Ok(updated)
    }

    pub async fn delete_user_set(&mut self, user_set: &UserSet) -> Result<UserSet> {
        let course_id = self.active_course()?;
        let path = format!(
            "courses/{course_id}/sets/{}/users/{}",
            user_set.set_id, user_set.course_user_id
        );
        let deleted: UserSet = self.api.delete(&path).await?;
        if let Some(index) = self.user_set_position(deleted.user_set_id.or(user_set.user_set_id)) {
            self.user_sets.remove(index);
        }
        tracing::info!(user_set_id = ?deleted.user_set_id, "deleted user set");
        Ok(deleted)
    }

    fn user_set_position(&self, user_set_id: Option<i64>) -> Option<usize> {
        let user_set_id = user_set_id?;
        self.user_sets
            .iter()
            .position(|us| us.user_set_id == Some(user_set_id))
    }
}

/// The echo must equal the request; a request without `user_set_id` accepts
/// whatever id the server reports.
fn user_set_echo_matches(requested: &UserSet, echoed: &UserSet) -> bool {
    match requested.user_set_id {
        Some(_) => echoed == requested,
        None => {
            let echoed = UserSet {
                user_set_id: None,
                ..echoed.clone()
            };
            echoed == *requested
        }
    }
}
