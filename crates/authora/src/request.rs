//! Cross-site request checks.

use url::Url;

/// Checks an `Origin` header against an allow-list of domains.
///
/// Allowed domains may be bare hosts (`example.com`, `localhost:3000`) or
/// full origins (`http://localhost:3000`). Bare hosts are read as
/// `https://`. Hosts are compared including any non-default port.
///
/// Returns `false` for an empty allow-list or an origin that isn't a URL
/// (such as the literal `null`).
pub fn verify_request_origin<S: AsRef<str>>(origin: &str, allowed_domains: &[S]) -> bool {
    if origin.is_empty() || allowed_domains.is_empty() {
        return false;
    }
    let Some(origin_host) = Url::parse(origin).ok().as_ref().and_then(host_with_port) else {
        return false;
    };

    allowed_domains.iter().any(|domain| {
        let domain = domain.as_ref();
        let parsed = if domain.starts_with("http://") || domain.starts_with("https://") {
            Url::parse(domain)
        } else {
            Url::parse(&format!("https://{domain}"))
        };
        parsed.ok().as_ref().and_then(host_with_port).as_deref() == Some(origin_host.as_str())
    })
}

fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}
