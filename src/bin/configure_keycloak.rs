use anyhow::Result;

use podium::keycloak::{KeycloakClient, KeycloakSettings, ProvisionPlan, provision};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = KeycloakSettings::from_env()?;
    log::info!("Configuring Keycloak at {} as {}", settings.url, settings.admin);

    let admin = KeycloakClient::login(&settings).await?;
    let report = provision(&admin, &ProvisionPlan::dev_defaults()).await?;

    log::info!(
        "Done: realm {:?}, scope {:?} (+{} mappers), client {:?}, {} user(s)",
        report.realm,
        report.client_scope,
        report.mappers_added.len(),
        report.client,
        report.users.len()
    );
    Ok(())
}
