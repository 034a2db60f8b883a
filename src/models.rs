use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

/// Variant-specific configuration of a set, passed through untouched.
pub type SetParams = Map<String, Value>;

/// Named set dates (`open`, `due`, `answer`, ...) as unix seconds.
pub type SetDates = BTreeMap<String, i64>;

/// Kind of set. Types this crate does not know keep their wire name so they
/// are written back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum SetType {
    #[default]
    Homework,
    Quiz,
    Review,
    Unknown(String),
}

impl SetType {
    pub fn as_str(&self) -> &str {
        match self {
            SetType::Homework => "HW",
            SetType::Quiz => "QUIZ",
            SetType::Review => "REVIEW",
            SetType::Unknown(name) => name,
        }
    }
}

impl From<String> for SetType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "HW" => SetType::Homework,
            "QUIZ" => SetType::Quiz,
            "REVIEW" => SetType::Review,
            _ => SetType::Unknown(s),
        }
    }
}

impl From<SetType> for String {
    fn from(t: SetType) -> Self {
        match t {
            SetType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ProblemSet {
    #[serde(default)]
    pub set_id: Option<i64>, // assigned by the server on create
    pub course_id: i64,
    pub set_name: String,
    #[serde(default)]
    pub set_type: SetType,
    #[serde(default)]
    pub set_visible: bool,
    #[serde(default)]
    pub set_params: SetParams,
    #[serde(default)]
    pub set_dates: SetDates,
}

impl ProblemSet {
    pub fn new(course_id: i64, set_name: impl Into<String>, set_type: SetType) -> Self {
        Self {
            course_id,
            set_name: set_name.into(),
            set_type,
            ..Default::default()
        }
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSet {
    #[serde(default)]
    pub user_set_id: Option<i64>,
    pub set_id: i64,
    pub course_user_id: i64,
    #[serde(default = "first_version")]
    pub set_version: i64,
    #[serde(default)]
    pub set_visible: bool,
    #[serde(default)]
    pub set_params: SetParams,
    #[serde(default)]
    pub set_dates: SetDates,
}

fn first_version() -> i64 {
    1
}

impl Default for UserSet {
    fn default() -> Self {
        Self {
            user_set_id: None,
            set_id: 0,
            course_user_id: 0,
            set_version: first_version(),
            set_visible: false,
            set_params: SetParams::new(),
            set_dates: SetDates::new(),
        }
    }
}

impl UserSet {
    pub fn new(set_id: i64, course_user_id: i64) -> Self {
        Self {
            set_id,
            course_user_id,
            ..Default::default()
        }
    }
}

/// A user joined with their enrollment in one course.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MergedUser {
    pub user_id: i64,
    pub course_user_id: i64,
    pub course_id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
    pub section: Option<String>,
}

/// Denormalized view of a user set with its problem set and owner.
/// Built on demand by the merge functions; never sent to the server.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MergedUserSet {
    pub user_set_id: Option<i64>,
    pub set_id: i64,
    pub course_user_id: i64,
    pub set_version: i64,
    pub set_visible: bool,
    pub set_name: String,
    pub username: String,
    pub set_type: SetType,
    pub set_params: SetParams,
    pub set_dates: SetDates,
}

pub fn parse_problem_set(value: Value) -> serde_json::Result<ProblemSet> {
    serde_json::from_value(value)
}

pub fn parse_user_set(value: Value) -> serde_json::Result<UserSet> {
    serde_json::from_value(value)
}
