use clipcast_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env if present; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    clipcast_api::setup::init_tracing();

    let config = Config::from_env()?;

    let (_state, router) = clipcast_api::setup::initialize_app(config.clone()).await?;

    clipcast_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
