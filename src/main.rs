use article_search::{build_backend, run_demo, DemoConfig, DemoError};
use article_search_log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DemoError> {
    article_search_log::init();

    let config = DemoConfig::load()?;
    info!(
        "Using {:?} backend at {} (index {}, seed data: {})",
        config.backend, config.url, config.index, config.seed_data
    );

    let backend = build_backend(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_demo(&config, backend.as_ref(), &mut out).await?;

    info!("Done: {:?}", summary.hits);
    Ok(())
}
