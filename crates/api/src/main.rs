use anyhow::Context;

use rolegate_api::config::ServerConfig;
use rolegate_api::guard::RouteGuard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rolegate_observability::init();

    let config = ServerConfig::from_env()?;
    let access = config.load_access_control()?;
    tracing::info!(
        roles = access.registry().len(),
        policies = access.policies().rules().len(),
        "access control ready"
    );

    let app = rolegate_api::app::build_app(config.jwt_secret.clone(), access, RouteGuard::builtin());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
