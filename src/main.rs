use anyhow::Context;
use problemset_store::{ApiClient, ApiConfig, CourseSession, ProblemSetStore, UserRoster};
use std::{env, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "problemset_store=info".into())
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let course_id: i64 = env::var("COURSE_ID")
        .context("COURSE_ID not set")?
        .parse()
        .context("COURSE_ID must be an integer")?;

    let config = ApiConfig::from_env();
    let api = ApiClient::new(&config)?;
    tracing::info!(base_url = %api.base_url(), course_id, "loading course");

    let roster = Arc::new(UserRoster::default());
    roster.fetch(&api, course_id).await?;

    let mut store = ProblemSetStore::new(api, CourseSession::new(Some(course_id)), roster);
    store.fetch_problem_sets(course_id).await?;
    store.fetch_all_user_sets(course_id).await?;
    tracing::info!(
        problem_sets = store.problem_sets().len(),
        user_sets = store.user_sets().len(),
        "course loaded"
    );

    // stdout carries only the JSON, logs go to stderr
    println!("{}", serde_json::to_string_pretty(&store.merged_user_sets())?);
    Ok(())
}
