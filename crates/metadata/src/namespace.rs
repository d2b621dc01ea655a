//! Attribute namespaces and the `attr` short-name convention.

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};

/// A Linux extended attribute namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `user.`: ordinary attributes any file owner may set.
    User,
    /// `trusted.`: visible to privileged processes only.
    Trusted,
    /// `security.`: used by security modules.
    Security,
    /// `system.`: kernel-interpreted attributes such as ACLs.
    System,
}

impl Namespace {
    /// Every namespace.
    pub const ALL: [Self; 4] = [Self::User, Self::Trusted, Self::Security, Self::System];

    /// The prefix, trailing dot included.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::User => "user.",
            Self::Trusted => "trusted.",
            Self::Security => "security.",
            Self::System => "system.",
        }
    }

    /// The namespace `name` belongs to, if any.
    #[must_use]
    pub fn of(name: &OsStr) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|namespace| name.as_bytes().starts_with(namespace.prefix().as_bytes()))
    }
}

/// Whether `name` lives in the `system.` namespace, where a missing value is
/// routine and never reported.
#[must_use]
pub fn is_protected(name: &OsStr) -> bool {
    Namespace::of(name) == Some(Namespace::System)
}

/// Prepends the namespace prefix to a short name.
///
/// ```
/// use metadata::namespace::{Namespace, qualify};
/// use std::ffi::OsStr;
///
/// assert_eq!(qualify(Namespace::Trusted, OsStr::new("md5")), "trusted.md5");
/// ```
#[must_use]
pub fn qualify(namespace: Namespace, name: &OsStr) -> OsString {
    let mut full = OsString::with_capacity(namespace.prefix().len() + name.len());
    full.push(namespace.prefix());
    full.push(name);
    full
}

/// Removes the namespace prefix, returning `None` for names outside it.
#[must_use]
pub fn strip(namespace: Namespace, name: &OsStr) -> Option<OsString> {
    name.as_bytes()
        .strip_prefix(namespace.prefix().as_bytes())
        .map(|short| OsString::from_vec(short.to_vec()))
}
