use crate::error::{AttrErrorKind, MetadataError};
use crate::namespace::is_protected;
use logging::debug_log;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Reads and writes the extended attributes of filesystem objects.
///
/// `follow` selects whether a symbolic link named by `path` is resolved to its
/// target (`true`) or operated on itself.
pub trait AttributeAccess {
    /// Lists the attribute names present on `path`.
    ///
    /// # Errors
    ///
    /// Fails when the object cannot be inspected.
    fn list(&self, path: &Path, follow: bool) -> Result<Vec<OsString>, MetadataError>;

    /// Fetches one attribute value.
    ///
    /// # Errors
    ///
    /// An absent attribute is an error of kind [`AttrErrorKind::NotFound`].
    fn get(&self, path: &Path, name: &OsStr, follow: bool) -> Result<Vec<u8>, MetadataError>;

    /// Creates or replaces one attribute.
    ///
    /// # Errors
    ///
    /// Fails when the value cannot be stored.
    fn set(&self, path: &Path, name: &OsStr, value: &[u8], follow: bool)
    -> Result<(), MetadataError>;

    /// Deletes one attribute.
    ///
    /// # Errors
    ///
    /// An absent attribute is an error of kind [`AttrErrorKind::NotFound`].
    fn remove(&self, path: &Path, name: &OsStr, follow: bool) -> Result<(), MetadataError>;
}

impl<T: AttributeAccess + ?Sized> AttributeAccess for &T {
    fn list(&self, path: &Path, follow: bool) -> Result<Vec<OsString>, MetadataError> {
        (**self).list(path, follow)
    }

    fn get(&self, path: &Path, name: &OsStr, follow: bool) -> Result<Vec<u8>, MetadataError> {
        (**self).get(path, name, follow)
    }

    fn set(
        &self,
        path: &Path,
        name: &OsStr,
        value: &[u8],
        follow: bool,
    ) -> Result<(), MetadataError> {
        (**self).set(path, name, value, follow)
    }

    fn remove(&self, path: &Path, name: &OsStr, follow: bool) -> Result<(), MetadataError> {
        (**self).remove(path, name, follow)
    }
}

/// [`AttributeAccess`] backed by the host filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsAttributes;

impl AttributeAccess for FsAttributes {
    fn list(&self, path: &Path, follow: bool) -> Result<Vec<OsString>, MetadataError> {
        debug_log!(Xattr, 2, "listxattr {} (follow={follow})", path.display());
        let attrs = if follow {
            xattr::list_deref(path)
        } else {
            xattr::list(path)
        }
        .map_err(|error| MetadataError::new("list extended attributes", path, error))?;
        Ok(attrs.collect())
    }

    fn get(&self, path: &Path, name: &OsStr, follow: bool) -> Result<Vec<u8>, MetadataError> {
        const CONTEXT: &str = "read extended attribute";
        debug_log!(
            Xattr,
            2,
            "getxattr {} {} (follow={follow})",
            path.display(),
            name.to_string_lossy()
        );
        let result = if follow {
            xattr::get_deref(path, name)
        } else {
            xattr::get(path, name)
        };
        result
            .map_err(|error| MetadataError::new(CONTEXT, path, error).with_name(name))?
            .ok_or_else(|| MetadataError::missing(CONTEXT, path, name))
    }

    fn set(
        &self,
        path: &Path,
        name: &OsStr,
        value: &[u8],
        follow: bool,
    ) -> Result<(), MetadataError> {
        debug_log!(
            Xattr,
            1,
            "setxattr {} {} ({} bytes)",
            path.display(),
            name.to_string_lossy(),
            value.len()
        );
        let result = if follow {
            xattr::set_deref(path, name, value)
        } else {
            xattr::set(path, name, value)
        };
        result.map_err(|error| {
            MetadataError::new("write extended attribute", path, error).with_name(name)
        })
    }

    fn remove(&self, path: &Path, name: &OsStr, follow: bool) -> Result<(), MetadataError> {
        debug_log!(
            Xattr,
            1,
            "removexattr {} {}",
            path.display(),
            name.to_string_lossy()
        );
        let result = if follow {
            xattr::remove_deref(path, name)
        } else {
            xattr::remove(path, name)
        };
        result.map_err(|error| {
            MetadataError::new("remove extended attribute", path, error).with_name(name)
        })
    }
}

/// Copies the extended attributes of `source` onto `destination`.
///
/// Every listed name accepted by `filter` (by default, everything outside the
/// `system.` namespace) is read and written. A failure on one attribute is
/// logged and counted and the copy moves on to the next. Attributes already
/// on the destination are left alone.
///
/// Returns the number of attributes that could not be copied.
///
/// # Errors
///
/// Fails only when the source's attributes cannot be listed. A source on a
/// filesystem without attribute support has nothing to copy.
pub fn copy_xattrs<A: AttributeAccess + ?Sized>(
    access: &A,
    source: &Path,
    destination: &Path,
    follow: bool,
    filter: Option<&dyn Fn(&OsStr) -> bool>,
) -> Result<usize, MetadataError> {
    let names = match access.list(source, follow) {
        Ok(names) => names,
        Err(error) if error.kind() == AttrErrorKind::Unsupported => return Ok(0),
        Err(error) => return Err(error),
    };

    let mut failures = 0;
    for name in &names {
        let allow = filter.map_or_else(|| !is_protected(name), |predicate| predicate(name));
        if !allow {
            continue;
        }

        let copied = access
            .get(source, name, follow)
            .and_then(|value| access.set(destination, name, &value, follow));
        if let Err(error) = copied {
            debug_log!(Xattr, 1, "{error}");
            failures += 1;
        }
    }
    Ok(failures)
}
