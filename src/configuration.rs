use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub hasher: HasherSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    3
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// One year. Refresh tokens, at ten times this, still fit in a timestamp.
pub const MAX_EXPIRES_IN_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Token signer settings, fixed for the lifetime of the process
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    /// HMAC signing secret
    pub salt: String,
    pub issuer: String,
    pub subject: String,
    pub audience: Vec<String>,
    /// Access token lifetime in seconds; refresh tokens live ten times longer
    pub expires_in: i64,
}

// Keeps the signing secret out of logs.
impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("salt", &"[redacted]")
            .field("issuer", &self.issuer)
            .field("subject", &self.subject)
            .field("audience", &self.audience)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl JwtSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.salt.is_empty() {
            return Err(ConfigError::MissingRequired("jwt.salt".to_string()));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::MissingRequired("jwt.issuer".to_string()));
        }
        if self.audience.is_empty() || self.audience.iter().any(|a| a.is_empty()) {
            return Err(ConfigError::MissingRequired("jwt.audience".to_string()));
        }
        if self.expires_in <= 0 || self.expires_in > MAX_EXPIRES_IN_SECONDS {
            return Err(ConfigError::InvalidValue(format!(
                "jwt.expires_in must be between 1 and {} seconds, got {}",
                MAX_EXPIRES_IN_SECONDS, self.expires_in
            )));
        }
        Ok(())
    }
}

// Work factors bcrypt accepts
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct HasherSettings {
    /// bcrypt work factor
    pub cost: u32,
}

impl HasherSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.cost) {
            return Err(ConfigError::InvalidValue(format!(
                "hasher.cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.cost
            )));
        }
        Ok(())
    }
}

impl Default for HasherSettings {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Reads `configuration.{yaml,toml,json}` from the working directory, then
/// applies `APP__<SECTION>__<KEY>` environment overrides.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.jwt.validate()?;
    settings.hasher.validate()?;
    Ok(settings)
}
