use api_router::{api_routes, api_state::ApiState};
use axum::Router;
use common::{storage::store::ImageStore, utils::config::get_config};
use tower_http::services::ServeDir;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    let storage = ImageStore::new(&config).await?;
    let image_root = storage.local_base_path().map(ToOwned::to_owned);

    let api_state = ApiState::new(&config, storage).await?;
    info!(
        pool_size = api_state.db.size(),
        storage = ?config.storage,
        environment = ?config.environment,
        "Gallery initialized"
    );

    match api_state.gallery.reconcile().await {
        Ok(report) if !report.is_clean() => warn!(
            orphaned_files = ?report.orphaned_files,
            missing_files = ?report.missing_files,
            "Image store and metadata disagree"
        ),
        Ok(_) => {}
        Err(err) => warn!(error = %err, "Startup reconciliation failed"),
    }

    let mut app = Router::new().merge(api_routes(&api_state));
    if let Some(root) = image_root {
        info!(root = %root.display(), "Serving stored images under /images");
        app = app.nest_service("/images", ServeDir::new(root));
    }
    let app = app.with_state(api_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
