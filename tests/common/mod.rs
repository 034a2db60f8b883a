use axum::{
    extract::{Path, Request, State},
    http::{Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use problemset_store::{ApiClient, ApiConfig, MergedUser, ProblemSet, SetType, UserSet};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// State of the fake course API.
#[derive(Default)]
pub struct Backend {
    pub sets: Vec<ProblemSet>,
    pub user_sets: Vec<UserSet>,
    pub users: Vec<MergedUser>,
    pub next_id: i64,
    /// When set, every set update is rejected with this message.
    pub reject_updates: Option<String>,
    /// When set, set updates echo this record instead of the request.
    pub update_echo: Option<ProblemSet>,
    /// `METHOD path` of every request received.
    pub requests: Vec<String>,
}

pub type Shared = Arc<Mutex<Backend>>;

fn err(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

pub fn problem_set(course_id: i64, set_id: i64, name: &str) -> ProblemSet {
    ProblemSet {
        set_id: Some(set_id),
        ..ProblemSet::new(course_id, name, SetType::Homework)
    }
}

pub fn user_set(user_set_id: i64, set_id: i64, course_user_id: i64) -> UserSet {
    UserSet {
        user_set_id: Some(user_set_id),
        ..UserSet::new(set_id, course_user_id)
    }
}

pub fn user(user_id: i64, course_user_id: i64, username: &str) -> MergedUser {
    MergedUser {
        user_id,
        course_user_id,
        course_id: 1,
        username: username.into(),
        role: "student".into(),
        ..Default::default()
    }
}

/// Course 1 with sets HW1 (1) and Quiz (2), users alice (cu 5) and bob (cu 6).
pub fn seeded() -> Backend {
    Backend {
        sets: vec![
            problem_set(1, 1, "HW1"),
            problem_set(1, 2, "Quiz"),
            problem_set(2, 3, "Other course"),
        ],
        user_sets: vec![user_set(10, 1, 5), user_set(11, 1, 6), user_set(12, 2, 5)],
        users: vec![user(50, 5, "alice"), user(60, 6, "bob")],
        next_id: 100,
        ..Default::default()
    }
}

async fn record(
    State(b): State<Shared>,
    method: Method,
    uri: Uri,
    req: Request,
    next: Next,
) -> Response {
    b.lock().unwrap().requests.push(format!("{method} {}", uri.path()));
    next.run(req).await
}

async fn list_sets(State(b): State<Shared>, Path(course_id): Path<i64>) -> Json<Vec<ProblemSet>> {
    let b = b.lock().unwrap();
    Json(b.sets.iter().filter(|s| s.course_id == course_id).cloned().collect())
}

async fn create_set(
    State(b): State<Shared>,
    Path(course_id): Path<i64>,
    Json(mut set): Json<ProblemSet>,
) -> Json<ProblemSet> {
    let mut b = b.lock().unwrap();
    b.next_id += 1;
    set.set_id = Some(b.next_id);
    set.course_id = course_id;
    b.sets.push(set.clone());
    Json(set)
}

async fn update_set(
    State(b): State<Shared>,
    Path((_course_id, set_id)): Path<(i64, i64)>,
    Json(set): Json<ProblemSet>,
) -> Response {
    let mut b = b.lock().unwrap();
    if let Some(message) = b.reject_updates.clone() {
        return err(StatusCode::BAD_REQUEST, &message);
    }
    let echo = b.update_echo.clone().unwrap_or(set);
    match b.sets.iter_mut().find(|s| s.set_id == Some(set_id)) {
        Some(slot) => {
            *slot = echo.clone();
            Json(echo).into_response()
        }
        None => err(StatusCode::NOT_FOUND, "set not found"),
    }
}

async fn delete_set(
    State(b): State<Shared>,
    Path((_course_id, set_id)): Path<(i64, i64)>,
) -> Response {
    let mut b = b.lock().unwrap();
    match b.sets.iter().position(|s| s.set_id == Some(set_id)) {
        Some(i) => Json(b.sets.remove(i)).into_response(),
        None => err(StatusCode::NOT_FOUND, "set not found"),
    }
}

async fn all_user_sets(State(b): State<Shared>, Path(course_id): Path<i64>) -> Json<Vec<UserSet>> {
    let b = b.lock().unwrap();
    let in_course: Vec<i64> = b
        .sets
        .iter()
        .filter(|s| s.course_id == course_id)
        .filter_map(|s| s.set_id)
        .collect();
    Json(b.user_sets.iter().filter(|us| in_course.contains(&us.set_id)).cloned().collect())
}

async fn set_users(
    State(b): State<Shared>,
    Path((_course_id, set_id)): Path<(i64, i64)>,
) -> Json<Vec<UserSet>> {
    let b = b.lock().unwrap();
    Json(b.user_sets.iter().filter(|us| us.set_id == set_id).cloned().collect())
}

async fn create_user_set(
    State(b): State<Shared>,
    Path((_course_id, set_id)): Path<(i64, i64)>,
    Json(mut user_set): Json<UserSet>,
) -> Json<UserSet> {
    let mut b = b.lock().unwrap();
    b.next_id += 1;
    user_set.user_set_id = Some(b.next_id);
    user_set.set_id = set_id;
    b.user_sets.push(user_set.clone());
    Json(user_set)
}

async fn update_user_set(
    State(b): State<Shared>,
    Path((_course_id, set_id, course_user_id)): Path<(i64, i64, i64)>,
    Json(user_set): Json<UserSet>,
) -> Response {
    let mut b = b.lock().unwrap();
    match b
        .user_sets
        .iter_mut()
        .find(|us| us.set_id == set_id && us.course_user_id == course_user_id)
    {
        Some(slot) => {
            let user_set_id = slot.user_set_id;
            *slot = UserSet { user_set_id, ..user_set };
            Json(slot.clone()).into_response()
        }
        None => err(StatusCode::NOT_FOUND, "user set not found"),
    }
}

async fn delete_user_set(
    State(b): State<Shared>,
    Path((_course_id, set_id, course_user_id)): Path<(i64, i64, i64)>,
) -> Response {
    let mut b = b.lock().unwrap();
    match b
        .user_sets
        .iter()
        .position(|us| us.set_id == set_id && us.course_user_id == course_user_id)
    {
        Some(i) => Json(b.user_sets.remove(i)).into_response(),
        None => err(StatusCode::NOT_FOUND, "user set not found"),
    }
}

async fn course_users(
    State(b): State<Shared>,
    Path(course_id): Path<i64>,
) -> Json<Vec<MergedUser>> {
    let b = b.lock().unwrap();
    Json(b.users.iter().filter(|u| u.course_id == course_id).cloned().collect())
}

async fn user_sets_for_user(
    State(b): State<Shared>,
    Path((_course_id, user_id)): Path<(i64, i64)>,
) -> Json<Vec<UserSet>> {
    let b = b.lock().unwrap();
    let course_user_id = b.users.iter().find(|u| u.user_id == user_id).map(|u| u.course_user_id);
    Json(
        b.user_sets
            .iter()
            .filter(|us| Some(us.course_user_id) == course_user_id)
            .cloned()
            .collect(),
    )
}

/// Serves `backend` under `/api` on an ephemeral port and returns a client
/// pointed at it.
pub async fn spawn(backend: Backend) -> (ApiClient, Shared) {
    let shared: Shared = Arc::new(Mutex::new(backend));
    let api = Router::new()
        .route("/courses/:course_id/sets", get(list_sets).post(create_set))
        .route("/courses/:course_id/sets/:set_id", put(update_set).delete(delete_set))
        .route("/courses/:course_id/user-sets", get(all_user_sets))
        .route("/courses/:course_id/sets/:set_id/users", get(set_users).post(create_user_set))
        .route(
            "/courses/:course_id/sets/:set_id/users/:course_user_id",
            put(update_user_set).delete(delete_user_set),
        )
        .route("/courses/:course_id/users", get(course_users))
        .route("/courses/:course_id/users/:user_id/sets", get(user_sets_for_user))
        .layer(middleware::from_fn_with_state(shared.clone(), record))
        .with_state(shared.clone());
    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::new(&ApiConfig::new(format!("http://{addr}/api"))).unwrap();
    (client, shared)
}
