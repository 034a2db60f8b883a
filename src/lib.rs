//! In-memory cache of a course's problem sets and user sets, kept in sync
//! with the course REST API, plus the lookups that merge a user set with its
//! problem set and owner.

pub mod api;
pub mod error;
pub mod merge;
pub mod models;
pub mod query;
pub mod session;
pub mod store;
pub mod users;

pub use api::{ApiClient, ApiConfig};
pub use error::{Result, StoreError};
pub use models::{MergedUser, MergedUserSet, ProblemSet, SetType, UserSet};
pub use query::{SetInfo, UserInfo, UserSetQuery};
pub use session::{CourseSession, SessionProvider};
pub use store::ProblemSetStore;
pub use users::{UserDirectory, UserRoster};
