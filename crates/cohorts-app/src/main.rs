use cohorts_app::{logging, overview};
use cohorts_core::config::load_config;
use cohorts_core::types::CourseKey;
use cohorts_db::db::DbProvider;
use cohorts_db::db::connection::create_pool;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "cohorts-inspect failed");
        eprintln!("cohorts-inspect: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let filter_handle = logging::init();

    let course_arg = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: cohorts-inspect <course_id>"))?;
    let course = CourseKey::parse(&course_arg)?;

    let config = load_config()?;
    logging::apply_level(&filter_handle, &config.logging.level);

    tracing::debug!(course_id = %course, "Configuration loaded");

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;
    let mut conn = pool.get_connection().await?;

    let report = overview::course_overview(&mut conn, &course).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
