use crate::error::MetadataError;
use crate::access::AttributeAccess;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

type AttributeMap = BTreeMap<OsString, Vec<u8>>;

/// In-memory [`AttributeAccess`] for tests and dry runs.
///
/// Every path exists and starts with no attributes. Failures can be injected
/// per path, either for listing or for one attribute name. The `follow` flag
/// of each call is recorded so callers can assert on symlink handling.
#[derive(Debug, Default)]
pub struct MemoryAttributes {
    files: RefCell<BTreeMap<PathBuf, AttributeMap>>,
    failures: RefCell<HashMap<(PathBuf, Option<OsString>), i32>>,
    follows: RefCell<Vec<(PathBuf, bool)>>,
}

impl MemoryAttributes {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an attribute directly, bypassing failure injection.
    pub fn insert(&self, path: impl AsRef<Path>, name: impl AsRef<OsStr>, value: &[u8]) {
        self.files
            .borrow_mut()
            .entry(path.as_ref().to_path_buf())
            .or_default()
            .insert(name.as_ref().to_os_string(), value.to_vec());
    }

    /// Makes operations on `path` fail with `errno`: listing when `name` is
    /// `None`, otherwise any access to that attribute.
    pub fn fail(&self, path: impl AsRef<Path>, name: Option<&str>, errno: i32) {
        self.failures.borrow_mut().insert(
            (path.as_ref().to_path_buf(), name.map(OsString::from)),
            errno,
        );
    }

    /// A snapshot of the attributes stored for `path`.
    #[must_use]
    pub fn attributes(&self, path: impl AsRef<Path>) -> AttributeMap {
        self.files
            .borrow()
            .get(path.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// The `(path, follow)` pair of every call made so far.
    #[must_use]
    pub fn follows(&self) -> Vec<(PathBuf, bool)> {
        self.follows.borrow().clone()
    }

    fn enter(
        &self,
        context: &'static str,
        path: &Path,
        name: Option<&OsStr>,
        follow: bool,
    ) -> Result<(), MetadataError> {
        self.follows.borrow_mut().push((path.to_path_buf(), follow));
        let key = (path.to_path_buf(), name.map(OsStr::to_os_string));
        match self.failures.borrow().get(&key) {
            Some(&errno) => {
                let error = MetadataError::new(context, path, io::Error::from_raw_os_error(errno));
                Err(match name {
                    Some(name) => error.with_name(name),
                    None => error,
                })
            }
            None => Ok(()),
        }
    }
}

impl AttributeAccess for MemoryAttributes {
    fn list(&self, path: &Path, follow: bool) -> Result<Vec<OsString>, MetadataError> {
        self.enter("list extended attributes", path, None, follow)?;
        Ok(self.attributes(path).into_keys().collect())
    }

    fn get(&self, path: &Path, name: &OsStr, follow: bool) -> Result<Vec<u8>, MetadataError> {
        const CONTEXT: &str = "read extended attribute";
        self.enter(CONTEXT, path, Some(name), follow)?;
        self.files
            .borrow()
            .get(path)
            .and_then(|attrs| attrs.get(name))
            .cloned()
            .ok_or_else(|| MetadataError::missing(CONTEXT, path, name))
    }

    fn set(
        &self,
        path: &Path,
        name: &OsStr,
        value: &[u8],
        follow: bool,
    ) -> Result<(), MetadataError> {
        self.enter("write extended attribute", path, Some(name), follow)?;
        self.insert(path, name, value);
        Ok(())
    }

    fn remove(&self, path: &Path, name: &OsStr, follow: bool) -> Result<(), MetadataError> {
        const CONTEXT: &str = "remove extended attribute";
        self.enter(CONTEXT, path, Some(name), follow)?;
        self.files
            .borrow_mut()
            .get_mut(path)
            .and_then(|attrs| attrs.remove(name))
            .map(drop)
            .ok_or_else(|| MetadataError::missing(CONTEXT, path, name))
    }
}
