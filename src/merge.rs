//! Builds [`MergedUserSet`] views out of a user set, its problem set and the
//! user who owns it.
//!
//! Fields are layered user first, then problem set, then user set, so the user
//! set wins wherever the records overlap (`set_id`, `course_user_id`,
//! `set_visible`, `set_params`, `set_dates`).

use crate::models::{MergedUser, MergedUserSet, ProblemSet, UserSet};

pub fn merge_user_set(
    user_set: &UserSet,
    problem_set: &ProblemSet,
    user: &MergedUser,
) -> MergedUserSet {
    MergedUserSet {
        // user
        username: user.username.clone(),
        // problem set
        set_name: problem_set.set_name.clone(),
        set_type: problem_set.set_type.clone(),
        // user set
        user_set_id: user_set.user_set_id,
        set_id: user_set.set_id,
        course_user_id: user_set.course_user_id,
        set_version: user_set.set_version,
        set_visible: user_set.set_visible,
        set_params: user_set.set_params.clone(),
        set_dates: user_set.set_dates.clone(),
    }
}

/// Merges with empty records standing in for missing partners. Each
/// substitution is logged since it usually means the collections were loaded
/// for different courses or are only partly loaded.
pub fn merge_lenient(
    user_set: &UserSet,
    problem_set: Option<&ProblemSet>,
    user: Option<&MergedUser>,
) -> MergedUserSet {
    let empty_set;
    let problem_set = match problem_set {
        Some(set) => set,
        None => {
            tracing::warn!(
                user_set_id = ?user_set.user_set_id,
                set_id = user_set.set_id,
                "no problem set for user set, merging with an empty set"
            );
            empty_set = ProblemSet::default();
            &empty_set
        }
    };
    let empty_user;
    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!(
                user_set_id = ?user_set.user_set_id,
                course_user_id = user_set.course_user_id,
                "no user for user set, merging with an empty user"
            );
            empty_user = MergedUser::default();
            &empty_user
        }
    };
    merge_user_set(user_set, problem_set, user)
}
