//! Development server configuration.
//!
//! Turns the resolved `server` section into a concrete bind address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, ToSocketAddrs};

use brio_config::{ConfigError, ResolvedServer};

use crate::error::Result;

/// How many ports above the requested one are tried without `strictPort`.
const PORT_SEARCH_RANGE: u16 = 10;

#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Host as configured, used for display
    pub host: String,

    /// Server socket address (IP + port)
    pub addr: SocketAddr,

    /// Open browser automatically on start
    pub open: bool,

    /// Answer CORS preflights for any origin
    pub cors: bool,
}

impl DevConfig {
    /// Build the server configuration from the resolved `server` section.
    ///
    /// # Errors
    ///
    /// Returns error if the host cannot be resolved, or no port could be
    /// bound (`strictPort` allows only the configured one).
    pub fn from_server(server: &ResolvedServer) -> Result<Self> {
        let ip = resolve_host(&server.host)?;
        let addr = Self::find_available_port(ip, server.port, server.strict_port)?;

        Ok(Self {
            host: server.host.clone(),
            addr,
            open: server.open,
            cors: server.cors,
        })
    }

    /// Find an available port starting from the requested port.
    ///
    /// Tries the requested port first, then the next ports up to
    /// +[`PORT_SEARCH_RANGE`] unless `strict` is set.
    fn find_available_port(ip: IpAddr, requested_port: u16, strict: bool) -> Result<SocketAddr> {
        if let Some(addr) = try_bind(SocketAddr::new(ip, requested_port)) {
            return Ok(addr);
        }

        if strict {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                hint: Some(format!(
                    "Port {} is in use and strictPort is set. Free the port or drop --strict-port.",
                    requested_port
                )),
            }
            .into());
        }

        for offset in 1..=PORT_SEARCH_RANGE {
            let port = requested_port.saturating_add(offset);
            if let Some(addr) = try_bind(SocketAddr::new(ip, port)) {
                crate::ui::warning(&format!(
                    "Port {} is busy, using port {} instead",
                    requested_port, addr.port()
                ));
                return Ok(addr);
            }
        }

        Err(ConfigError::InvalidValue {
            field: "server.port".to_string(),
            hint: Some(format!(
                "Ports {}-{} are all in use. Try a different port range.",
                requested_port,
                requested_port.saturating_add(PORT_SEARCH_RANGE)
            )),
        }
        .into())
    }

    /// Get the server URL as a string.
    ///
    /// Wildcard binds are shown as `localhost`.
    pub fn server_url(&self) -> String {
        if self.addr.ip().is_unspecified() {
            format!("http://localhost:{}", self.addr.port())
        } else {
            format!("http://{}", self.addr)
        }
    }
}

fn try_bind(addr: SocketAddr) -> Option<SocketAddr> {
    // Port 0 asks the OS; report the port it picked.
    TcpListener::bind(addr)
        .ok()
        .and_then(|listener| listener.local_addr().ok())
}

fn resolve_host(host: &str) -> Result<IpAddr> {
    if host == "localhost" {
        return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    (host, 0)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| addr.ip())
        .ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "server.host".to_string(),
                hint: Some(format!("Cannot resolve host '{}'", host)),
            }
            .into()
        })
}
