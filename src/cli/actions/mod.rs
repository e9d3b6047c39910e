pub mod server;

use secrecy::SecretString;

/// Actions produced by CLI dispatch.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        site_url: String,
        provider_url: String,
        provider_key: SecretString,
        microsoft_client_id: String,
    },
}
