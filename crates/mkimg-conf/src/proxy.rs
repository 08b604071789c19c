//! Proxy settings applied from the `create` section

use serde::Serialize;

/// Proxy URL plus the hosts that bypass it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProxySettings {
    proxy: Option<String>,
    no_proxy: Vec<String>,
}

impl ProxySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current settings.
    ///
    /// `no_proxy` is a comma-separated host list; `*` disables the proxy for
    /// every host, a leading `.` matches a domain and its subdomains.
    pub fn set_proxies(&mut self, proxy: Option<&str>, no_proxy: Option<&str>) {
        self.proxy = proxy
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        self.no_proxy = no_proxy
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(proxy) = &self.proxy {
            tracing::debug!(proxy, no_proxy = ?self.no_proxy, "Proxy configured");
        }
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn no_proxy(&self) -> &[String] {
        &self.no_proxy
    }

    /// Proxy to use for `url`, if any
    pub fn proxy_for(&self, url: &str) -> Option<&str> {
        let proxy = self.proxy.as_deref()?;
        let (scheme, rest) = url.split_once("://")?;
        if scheme == "file" {
            return None;
        }

        let authority = rest.split('/').next().unwrap_or_default();
        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        let host = host_port.split(':').next().unwrap_or(host_port);

        let bypass = self.no_proxy.iter().any(|entry| {
            if entry == "*" {
                return true;
            }
            let domain = entry.trim_start_matches('.');
            host == domain || host.ends_with(&format!(".{}", domain))
        });

        if bypass { None } else { Some(proxy) }
    }
}
