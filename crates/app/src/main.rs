use web::{ApiClient, AppState};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dompet={level},web={level},aggregator={level}",
            level = settings.app.level
        ))
        .init();

    let key = settings.session.cookie_key()?;
    let api = ApiClient::new(reqwest::Client::new(), settings.api.base_url.as_str());

    let listener = tokio::net::TcpListener::bind(settings.listen_addr()).await?;
    web::run_with_listener(AppState::new(api, key), listener).await?;

    Ok(())
}
