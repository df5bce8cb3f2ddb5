//! URL handling module for quarry
//!
//! Origin comparison and fragment stripping used by the crawl frontier and
//! the link discoverer. The crawl never leaves the seed URL's origin, where
//! origin means scheme plus host (the port is part of the host comparison so
//! that non-default ports, common in test servers, stay distinct).

use url::Url;

/// Returns true if both URLs share a scheme, host, and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme() && a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

/// Returns a copy of the URL with any fragment removed
pub fn without_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}
