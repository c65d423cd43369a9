use anvil_core::{Error, ErrorContext, Result};
use std::borrow::Cow;
use url::Url;
use urlencoding::decode;

/// Client name and DSN scheme used when none is configured.
pub const DEFAULT_DRIVER_NAME: &str = "dm";
/// Port the DM8 server listens on by default.
pub const DEFAULT_PORT: u16 = 5236;

/// Settings of the DM8 driver.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database client name, also the expected DSN scheme. Empty means `dm`.
    pub driver_name: String,
    /// `dm://user:password@host:port?key=value`
    pub dsn: String,
    /// Length of key string columns declared without a size. Zero means 256.
    pub default_string_size: u32,
    /// Leave foreign keys out of the migrated tables.
    pub disable_foreign_key_constraints: bool,
}

impl Config {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Default::default()
        }
    }

    pub fn driver_name(&self) -> &str {
        if self.driver_name.is_empty() {
            DEFAULT_DRIVER_NAME
        } else {
            &self.driver_name
        }
    }

    /// Parse the DSN, its scheme must be the driver name.
    pub fn connect_options(&self) -> Result<ConnectOptions> {
        ConnectOptions::parse(&self.dsn, self.driver_name())
    }
}

/// Parts of a DM8 DSN.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Query parameters, in order of appearance.
    pub params: Vec<(String, String)>,
}

impl ConnectOptions {
    pub fn parse(dsn: &str, scheme: &str) -> Result<Self> {
        let context = || format!("While parsing the DM8 connection url `{}`", dsn);
        let url = Url::parse(dsn).with_context(context)?;
        if url.scheme() != scheme {
            return Err(Error::msg(format!(
                "DM8 connection url must start with `{}://`",
                scheme
            )))
            .with_context(context);
        }
        let host = url
            .host_str()
            .filter(|v| !v.is_empty())
            .context("The host is missing")
            .with_context(context)?
            .to_string();
        let user = decode(url.username())
            .with_context(context)?
            .into_owned();
        let password = url
            .password()
            .map(decode)
            .transpose()
            .with_context(context)?
            .map(Cow::into_owned)
            .unwrap_or_default();
        let params = url
            .query_pairs()
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Ok(Self {
            user,
            password,
            host,
            port: url.port().unwrap_or(DEFAULT_PORT),
            params,
        })
    }

    /// Value of the query parameter `key`, the last one wins.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
