use std::collections::BTreeSet;

use crate::error::PeerError;

/// Set of known peers, keyed by network location (`host[:port]`).
#[derive(Debug, Default, Clone)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer from a URL-like address. The network location is
    /// stored when present, the bare path otherwise. Idempotent.
    pub fn register(&mut self, address: &str) -> Result<String, PeerError> {
        let location = extract_location(address)
            .ok_or_else(|| PeerError::InvalidAddress(address.to_string()))?
            .to_string();
        self.peers.insert(location.clone());
        Ok(location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.peers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// `scheme://netloc/path?query#fragment` -> netloc, or path when there is no
/// netloc. `None` when both are empty.
fn extract_location(address: &str) -> Option<&str> {
    let address = address.trim();
    let rest = match address.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => Some(rest),
        _ => address.strip_prefix("//"),
    };

    if let Some(rest) = rest {
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (netloc, tail) = rest.split_at(end);
        if !netloc.is_empty() {
            return Some(netloc);
        }
        return non_empty(strip_query(tail));
    }

    non_empty(strip_query(address))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn strip_query(s: &str) -> &str {
    s.find(['?', '#']).map_or(s, |end| &s[..end])
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
