//! Semantic version ordering shared by the daemon and the hub.
//!
//! Handles the version tokens that appear in release listings: an optional
//! `v` prefix, `MAJOR.MINOR.PATCH`, optional pre-release identifiers and
//! build metadata. Precedence follows SemVer 2.0.0.

use std::cmp::Ordering;

/// Strip surrounding whitespace from a version token.
pub fn normalize(v: &str) -> &str {
    v.trim()
}

/// Compare two version strings under SemVer precedence.
///
/// Unparseable numeric components are read as 0, so malformed tokens still
/// order deterministically instead of failing the caller.
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = Parsed::from(normalize(a));
    let b = Parsed::from(normalize(b));

    a.core
        .cmp(&b.core)
        .then_with(|| compare_prerelease(a.pre, b.pre))
}

/// True when `candidate` is strictly newer than `running`.
pub fn is_newer(candidate: &str, running: &str) -> bool {
    compare(candidate, running) == Ordering::Greater
}

struct Parsed<'a> {
    core: (u64, u64, u64),
    pre: Option<&'a str>,
}

impl<'a> Parsed<'a> {
    fn from(v: &'a str) -> Self {
        let v = v.strip_prefix(['v', 'V']).unwrap_or(v);
        // Build metadata never participates in precedence.
        let v = v.split('+').next().unwrap_or_default();
        let (core, pre) = match v.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (v, None),
        };

        let mut parts = core.split('.');
        let mut component = || parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Self {
            core: (component(), component(), component()),
            pre,
        }
    }
}

/// Pre-release precedence: absence outranks presence, then dot-separated
/// identifiers compare left to right with numeric identifiers ordering below
/// alphanumeric ones.
fn compare_prerelease(a: Option<&str>, b: Option<&str>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_core_versions() {
        assert_eq!(compare("1.0.0", "1.0.0"), Ordering::Equal);
        assert!(is_newer("1.0.1", "1.0.0"));
        assert!(is_newer("1.1.0", "1.0.9"));
        assert!(is_newer("2.0.0", "1.99.99"));
        assert!(!is_newer("1.0.0", "1.0.0"));
        assert!(!is_newer("0.9.9", "1.0.0"));
    }

    #[test]
    fn accepts_v_prefix_and_whitespace() {
        assert_eq!(compare("v1.2.0", "1.2.0"), Ordering::Equal);
        assert_eq!(compare(" v1.2.0\n", "1.2.0"), Ordering::Equal);
        assert!(is_newer("v1.2.0", "v1.1.9"));
    }

    #[test]
    fn ignores_build_metadata() {
        assert_eq!(compare("1.0.0+build.1", "1.0.0+build.2"), Ordering::Equal);
        assert!(is_newer("1.0.1+linux", "1.0.0"));
    }

    #[test]
    fn prerelease_orders_below_release() {
        assert!(is_newer("1.0.0", "1.0.0-rc.1"));
        assert!(!is_newer("1.0.0-rc.1", "1.0.0"));
    }

    #[test]
    fn prerelease_precedence_chain() {
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        for pair in chain.windows(2) {
            assert!(
                is_newer(pair[1], pair[0]),
                "{} should be newer than {}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn missing_components_read_as_zero() {
        assert_eq!(compare("1.2", "1.2.0"), Ordering::Equal);
        assert!(is_newer("1.2.1", "1.2"));
    }

    #[test]
    fn sorts_a_release_listing() {
        let mut versions = vec!["v1.10.0", "v1.2.0", "v1.9.1"];
        versions.sort_by(|a, b| compare(a, b));
        assert_eq!(versions, vec!["v1.2.0", "v1.9.1", "v1.10.0"]);
    }
}
