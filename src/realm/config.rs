use std::env;
use std::time::Duration;
use log::{info, warn};
use thiserror::Error;
use crate::kerberos::{FormatError, Principal, PrincipalDirectory, RealmKey};

pub const DEFAULT_PRINCIPALS: &str = "client1,client2";
pub const DEFAULT_TICKET_LIFETIME: Duration = Duration::from_secs(4);

const AS_REALM: &str = "AS";
const TGS_REALM: &str = "TGS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} ticket lifetime must be longer than zero")]
    ZeroLifetime(&'static str),
    #[error("invalid principal in {variable}: {source}")]
    Principal {
        variable: &'static str,
        source: FormatError,
    },
    #[error("{variable} is not a number of milliseconds: {value:?}")]
    Lifetime {
        variable: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TicketLifetimes {
    tgt: Duration,
    service: Duration,
}

impl TicketLifetimes {
    pub fn new(tgt: Duration, service: Duration) -> Result<Self> {
        // a ticket has to expire strictly after it was issued
        if tgt.as_millis() == 0 {
            return Err(ConfigError::ZeroLifetime("ticket-granting"));
        }
        if service.as_millis() == 0 {
            return Err(ConfigError::ZeroLifetime("service"));
        }

        Ok(Self { tgt, service })
    }

    #[inline]
    pub fn tgt(&self) -> Duration {
        self.tgt
    }

    #[inline]
    pub fn service(&self) -> Duration {
        self.service
    }
}

impl Default for TicketLifetimes {
    fn default() -> Self {
        Self {
            tgt: DEFAULT_TICKET_LIFETIME,
            service: DEFAULT_TICKET_LIFETIME,
        }
    }
}

#[derive(Debug)]
pub struct RealmConfig {
    pub directory: PrincipalDirectory,
    pub lifetimes: TicketLifetimes,
    pub as_key: RealmKey,
    pub tgs_key: RealmKey,
}

impl RealmConfig {
    pub fn new(directory: PrincipalDirectory, lifetimes: TicketLifetimes) -> Self {
        Self {
            directory,
            lifetimes,
            as_key: RealmKey::generate(),
            tgs_key: RealmKey::generate(),
        }
    }

    /// Reads `KRB_PRINCIPALS`, `KRB_TGT_LIFETIME_MS`, `KRB_SERVICE_TICKET_LIFETIME_MS`,
    /// `KRB_AS_PASSWORD` and `KRB_TGS_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        let principals = env::var("KRB_PRINCIPALS").unwrap_or_else(|_| DEFAULT_PRINCIPALS.to_owned());
        let directory = parse_principals("KRB_PRINCIPALS", &principals)?;

        let lifetimes = TicketLifetimes::new(
            lifetime_from_env("KRB_TGT_LIFETIME_MS")?,
            lifetime_from_env("KRB_SERVICE_TICKET_LIFETIME_MS")?,
        )?;

        if directory.is_empty() {
            warn!("no principals configured, every authentication will fail");
        }

        info!(
            "realm configured with {} principals, tgt lifetime {:?}, service ticket lifetime {:?}",
            directory.len(),
            lifetimes.tgt(),
            lifetimes.service()
        );

        Ok(Self {
            directory,
            lifetimes,
            as_key: key_from_env("KRB_AS_PASSWORD", AS_REALM),
            tgs_key: key_from_env("KRB_TGS_PASSWORD", TGS_REALM),
        })
    }
}

fn parse_principals(variable: &'static str, value: &str) -> Result<PrincipalDirectory> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Principal::new(name).map_err(|source| ConfigError::Principal { variable, source }))
        .collect()
}

fn lifetime_from_env(variable: &'static str) -> Result<Duration> {
    let Ok(value) = env::var(variable) else {
        return Ok(DEFAULT_TICKET_LIFETIME);
    };

    value
        .trim()
        .parse()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::Lifetime { variable, value })
}

fn key_from_env(variable: &str, realm: &str) -> RealmKey {
    match env::var(variable) {
        Ok(password) => {
            info!("deriving {} key from {}", realm, variable);
            RealmKey::derive(realm, &password)
        }
        Err(_) => RealmKey::generate(),
    }
}
