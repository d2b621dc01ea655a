use regex::bytes::Regex;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// Decides which attribute names a dump includes.
pub trait NameFilter {
    /// Whether `name` is dumped.
    fn matches(&self, name: &OsStr) -> bool;
}

impl<F> NameFilter for F
where
    F: Fn(&OsStr) -> bool,
{
    fn matches(&self, name: &OsStr) -> bool {
        self(name)
    }
}

/// Name filter driven by a `--match` pattern.
///
/// The pattern is an unanchored regular expression searched for in the raw
/// name bytes. `-` matches every name.
#[derive(Clone, Debug)]
pub struct PatternFilter {
    matcher: Matcher,
}

#[derive(Clone, Debug)]
enum Matcher {
    All,
    Prefixes(&'static [&'static str]),
    Pattern(Regex),
}

impl PatternFilter {
    /// The pattern used when none is given.
    pub const DEFAULT_PATTERN: &'static str = r"^user\.";
    /// The pattern selected by `-s`.
    pub const SYSTEM_PATTERN: &'static str = r"^system\.|^user\.";

    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the regex error for an invalid pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let matcher = if pattern == "-" {
            Matcher::All
        } else {
            Matcher::Pattern(Regex::new(pattern)?)
        };
        Ok(Self { matcher })
    }

    /// Matches every name.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            matcher: Matcher::All,
        }
    }

    /// Matches `user.` names only.
    #[must_use]
    pub const fn user() -> Self {
        Self {
            matcher: Matcher::Prefixes(&["user."]),
        }
    }

    /// Matches `system.` and `user.` names.
    #[must_use]
    pub const fn system_and_user() -> Self {
        Self {
            matcher: Matcher::Prefixes(&["system.", "user."]),
        }
    }
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self::user()
    }
}

impl NameFilter for PatternFilter {
    fn matches(&self, name: &OsStr) -> bool {
        let bytes = name.as_bytes();
        match &self.matcher {
            Matcher::All => true,
            Matcher::Prefixes(prefixes) => prefixes
                .iter()
                .any(|prefix| bytes.starts_with(prefix.as_bytes())),
            Matcher::Pattern(regex) => regex.is_match(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(filter: &impl NameFilter, name: &str) -> bool {
        filter.matches(OsStr::new(name))
    }

    #[test]
    fn default_selects_user_namespace() {
        let filter = PatternFilter::default();
        assert!(check(&filter, "user.a"));
        assert!(!check(&filter, "trusted.a"));
        assert!(!check(&filter, "xuser.a"));
    }

    #[test]
    fn builtin_filters_agree_with_their_patterns() {
        let names = ["user.a", "system.posix_acl_access", "security.selinux", "user"];
        let pairs = [
            (PatternFilter::user(), PatternFilter::DEFAULT_PATTERN),
            (PatternFilter::system_and_user(), PatternFilter::SYSTEM_PATTERN),
        ];
        for (builtin, pattern) in pairs {
            let compiled = PatternFilter::new(pattern).unwrap();
            for name in names {
                assert_eq!(check(&builtin, name), check(&compiled, name), "{name}");
            }
        }
    }

    #[test]
    fn dash_matches_everything() {
        let filter = PatternFilter::new("-").unwrap();
        assert!(check(&filter, "security.selinux"));
        assert!(check(&PatternFilter::all(), "anything"));
    }

    #[test]
    fn patterns_are_unanchored() {
        let filter = PatternFilter::new("mime").unwrap();
        assert!(check(&filter, "user.mime_type"));
        assert!(!check(&filter, "user.comment"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(PatternFilter::new("(").is_err());
    }

    #[test]
    fn closures_are_filters() {
        let filter = |name: &OsStr| name.len() > 6;
        assert!(check(&filter, "user.long"));
        assert!(!check(&filter, "user.a"));
    }
}
