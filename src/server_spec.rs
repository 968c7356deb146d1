//! Resolved connection parameters for a git server.

use std::fmt;
use std::time::Duration;

use crate::config::ServerOpts;
use crate::error::{Error, Result};

/// How long a single git command may run unless a server says otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4 * 60);

/// The URL form used to reach a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// `git@host:org/repo.git`
    #[default]
    Ssh,
    /// `https://host[:port]/org/repo.git`
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Ssh => "ssh",
            Scheme::Https => "https",
        }
    }

    /// Case-sensitive lookup of a scheme name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ssh" => Ok(Scheme::Ssh),
            "https" => Ok(Scheme::Https),
            other => Err(Error::UnknownScheme {
                scheme: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-domain settings, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    port: u16,
    scheme: Scheme,
    timeout: Duration,
}

impl Default for ServerSpec {
    fn default() -> Self {
        Self {
            port: 0,
            scheme: Scheme::Ssh,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServerSpec {
    /// Builds a spec from its serialized form, starting from the defaults and
    /// overriding each field the options actually set.
    pub fn from_server_opts(opts: &ServerOpts) -> Result<Self> {
        let mut spec = Self::default();
        if let Some(timeout) = opts.timeout.as_deref().filter(|t| !t.is_empty()) {
            spec.timeout =
                humantime::parse_duration(timeout).map_err(|e| Error::InvalidDuration {
                    value: timeout.to_string(),
                    message: e.to_string(),
                })?;
        }
        if let Some(scheme) = opts.scheme.as_deref().filter(|s| !s.is_empty()) {
            spec.scheme = Scheme::from_name(scheme)?;
        }
        spec.port = opts.port;
        Ok(spec)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Display for ServerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scheme={} port={} timeout={}",
            self.scheme,
            self.port,
            humantime::format_duration(self.timeout)
        )
    }
}
