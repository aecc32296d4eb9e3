use std::{env, io::Write};

use chrono::Duration;
use eats_common::{
    helpers::{parse_boolean_flag, parse_list},
    Secret,
};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde_json::json;
use stripe_tools::StripeConfig;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_EATS_HOST: &str = "127.0.0.1";
const DEFAULT_EATS_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/eats.db";
const DEFAULT_TOKEN_EXPIRY: Duration = Duration::hours(24);
const RANDOM_SECRET_LENGTH: usize = 48;
/// Shorter secrets are rejected, since HS256 keys should be at least as long as the hash output.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub stripe: StripeConfig,
    /// Accounts that sign up with one of these emails are restaurant administrators.
    pub admin_emails: Vec<String>,
    /// The web client's origin. Cross-origin requests with credentials are only accepted from here.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_EATS_HOST.to_string(),
            port: DEFAULT_EATS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            stripe: StripeConfig::default(),
            admin_emails: Vec::new(),
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("EATS_HOST").ok().unwrap_or_else(|| DEFAULT_EATS_HOST.into());
        let port = env::var("EATS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for EATS_PORT. {e} Using the default, {DEFAULT_EATS_PORT}, instead."
                    );
                    DEFAULT_EATS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_EATS_PORT);
        let database_url = env::var("EATS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ EATS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let mut auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let stripe = StripeConfig::new_from_env_or_default();
        let admin_emails = env::var("EATS_ADMIN_EMAILS").map(|s| parse_list(&s)).unwrap_or_else(|_| {
            info!("🪛️ EATS_ADMIN_EMAILS is not set. No new accounts will be given restaurant admin rights.");
            Vec::new()
        });
        let cors_origin = env::var("EATS_CORS_ORIGIN").ok().filter(|s| !s.trim().is_empty()).or_else(|| {
            info!("🪛️ EATS_CORS_ORIGIN is not set. Cross-origin requests will be refused.");
            None
        });
        auth.secure_cookies = parse_boolean_flag(env::var("EATS_SECURE_COOKIES").ok(), false);
        Self { host, port, database_url, auth, stripe, admin_emails, cors_origin }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC key used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    pub token_expiry: Duration,
    /// If true, the auth cookie is only sent over https.
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT operate \
             on production like this, since every token will be invalidated when the server restarts. 🚨️🚨️🚨️"
        );
        let secret: String =
            thread_rng().sample_iter(&Alphanumeric).take(RANDOM_SECRET_LENGTH).map(char::from).collect();
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                         you are doing it wrong! Set the EATS_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
                }
            },
            None => warn!("🪛️ Could not create a temporary file to store the JWT secret."),
        }
        Self { jwt_secret: Secret::new(secret), token_expiry: DEFAULT_TOKEN_EXPIRY, secure_cookies: false }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S, token_expiry: Duration) -> Self {
        Self { jwt_secret: Secret::new(secret.into()), token_expiry, secure_cookies: false }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("EATS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [EATS_JWT_SECRET]")))?;
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "EATS_JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters long"
            )));
        }
        let token_expiry = env::var("EATS_JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for EATS_JWT_EXPIRY_HOURS. {e}"))
                    .ok()
                    .filter(|h| *h > 0)
            })
            .map(Duration::hours)
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);
        Ok(Self { jwt_secret: Secret::new(secret), token_expiry, secure_cookies: false })
    }
}
