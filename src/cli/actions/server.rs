use crate::{
    api,
    api::handlers::auth::AuthConfig,
    cli::{actions::Action, globals::GlobalArgs},
};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            site_url,
            provider_url,
            provider_key,
            microsoft_client_id,
        } => {
            let mut globals = GlobalArgs::new(site_url.clone(), provider_url);
            globals.set_provider_key(provider_key);

            let auth_config =
                AuthConfig::new(site_url).with_microsoft_client_id(microsoft_client_id);

            api::new(port, dsn, &globals, auth_config).await?;
        }
    }

    Ok(())
}
