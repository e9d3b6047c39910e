use secrecy::SecretString;

/// Shared configuration derived from CLI arguments and the environment.
///
/// The provider API key never appears in logs or debug output; it is held in
/// a [`SecretString`] and only exposed when building outbound requests.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub site_url: String,
    pub provider_url: String,
    pub provider_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(site_url: String, provider_url: String) -> Self {
        Self {
            site_url,
            provider_url,
            provider_key: SecretString::default(),
        }
    }

    pub fn set_provider_key(&mut self, key: SecretString) {
        self.provider_key = key;
    }
}
