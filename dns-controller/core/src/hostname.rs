//! Hostname matching between a listener and the routes attached to it.
//!
//! Wildcards cover exactly one leading label: `*.example.org` matches
//! `foo.example.org` but neither `example.org` nor `a.b.example.org`.

use crate::endpoint::trim_root;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostMatch<'h> {
    Exact(&'h str),
    Wildcard { suffix: &'h str },
}

// === impl HostMatch ===

impl<'h> HostMatch<'h> {
    pub fn parse(hostname: &'h str) -> Self {
        match hostname.strip_prefix("*.") {
            Some(suffix) => Self::Wildcard { suffix },
            None => Self::Exact(hostname),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard { .. })
    }

    /// Whether a concrete hostname falls under this wildcard's single label.
    fn covers(&self, hostname: &str) -> bool {
        let Self::Wildcard { suffix } = self else {
            return false;
        };
        match hostname.split_once('.') {
            Some((label, parent)) => !label.is_empty() && parent.eq_ignore_ascii_case(suffix),
            None => false,
        }
    }
}

/// Computes the hostnames a route serves through a listener.
///
/// With only one side present, that side is returned. With both, each route
/// hostname is compared against the listener's and the more specific of an
/// overlapping pair is kept; pairs that do not overlap are dropped. A
/// trailing root dot on either side is ignored.
pub fn intersect<S: AsRef<str>>(listener: Option<&str>, route: &[S]) -> Vec<String> {
    let listener = listener.map(trim_root).filter(|h| !h.is_empty());
    let route = route.iter().map(|h| trim_root(h.as_ref()));
    let Some(listener) = listener else {
        return dedup(route);
    };

    let mut route = route.peekable();
    if route.peek().is_none() {
        return vec![listener.to_string()];
    }
    dedup(route.filter_map(|route| intersect_one(listener, route)))
}

fn intersect_one<'h>(listener: &'h str, route: &'h str) -> Option<&'h str> {
    if listener.eq_ignore_ascii_case(route) {
        return Some(route);
    }
    let (lmatch, rmatch) = (HostMatch::parse(listener), HostMatch::parse(route));
    if lmatch.is_wildcard() && !rmatch.is_wildcard() && lmatch.covers(route) {
        return Some(route);
    }
    if rmatch.is_wildcard() && !lmatch.is_wildcard() && rmatch.covers(listener) {
        return Some(listener);
    }
    None
}

fn dedup<'h>(hostnames: impl Iterator<Item = &'h str>) -> Vec<String> {
    let mut out = Vec::<String>::new();
    for hostname in hostnames {
        if !hostname.is_empty() && !out.iter().any(|h| h == hostname) {
            out.push(hostname.to_string());
        }
    }
    out
}
