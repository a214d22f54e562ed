use anyhow::Context;

/// Runtime configuration, read once at startup. The announcement secret
/// is a capability token and never lives in source.
#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub client_secret_path: String,
    pub oauth_redirect_base: String,
    pub announcement_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Ok(Config {
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned()),
            database_url: dotenv::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            client_secret_path: dotenv::var("CLIENT_SECRET_PATH")
                .unwrap_or_else(|_| "client_secret.json".to_owned()),
            oauth_redirect_base: dotenv::var("OAUTH_REDIRECT_BASE")
                .unwrap_or_else(|_| "http://localhost:8080".to_owned()),
            announcement_password: dotenv::var("ANNOUNCEMENT_PASSWORD")
                .context("ANNOUNCEMENT_PASSWORD must be set")?,
        })
    }
}
