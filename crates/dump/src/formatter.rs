use crate::filter::NameFilter;
use crate::record::DumpRecord;
use codec::{EncodedValue, Encoding, quote};
use logging::trace_xattr;
use metadata::namespace::is_protected;
use metadata::{AttrErrorKind, AttributeAccess};
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use walk::WalkNode;

/// What a dump prints and how.
#[derive(Clone, Debug)]
pub struct DumpOptions {
    /// Scheme for printed values.
    pub encoding: Encoding,
    /// Print values, not just names.
    pub dump_values: bool,
    /// Print raw value bytes only, without headers or encoding.
    pub only_values: bool,
    /// Keep leading `/` in header paths.
    pub absolute_names: bool,
    /// Operate on symlinks themselves rather than their targets.
    pub no_dereference: bool,
    /// Look up this single attribute instead of listing.
    pub name: Option<OsString>,
    /// Prefix for diagnostics.
    pub program: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Text,
            dump_values: false,
            only_values: false,
            absolute_names: false,
            no_dereference: false,
            name: None,
            program: "getfattr".to_string(),
        }
    }
}

/// Writes the attributes of visited files in the dump format.
///
/// Output goes to `out`; diagnostics go to `err` as `program: path: message`.
/// Every method returns the number of failures it reported.
pub struct Dumper<A, M, W, E> {
    access: A,
    filter: M,
    options: DumpOptions,
    out: W,
    err: E,
    warned_absolute: bool,
}

impl<A, M, W, E> Dumper<A, M, W, E>
where
    A: AttributeAccess,
    M: NameFilter,
    W: Write,
    E: Write,
{
    /// Creates a dumper.
    pub const fn new(access: A, filter: M, options: DumpOptions, out: W, err: E) -> Self {
        Self {
            access,
            filter,
            options,
            out,
            err,
            warned_absolute: false,
        }
    }

    /// The options in force.
    pub const fn options(&self) -> &DumpOptions {
        &self.options
    }

    /// Gives back the output and diagnostic writers.
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Walk visitor: dumps one node.
    ///
    /// Failed nodes are reported. Symlinks the walk did not follow are only
    /// dumped when operating on links themselves.
    pub fn dump_node(&mut self, node: &WalkNode) -> usize {
        if let Some(error) = node.error() {
            self.report(node.path(), None, &error.message());
            return 1;
        }
        if node.symlink_not_followed() && !self.options.no_dereference {
            return 0;
        }
        self.dump_path(node.path())
    }

    /// Dumps the attributes of one path.
    pub fn dump_path(&mut self, path: &Path) -> usize {
        let follow = !self.options.no_dereference;
        let fetch =
            self.options.dump_values || self.options.only_values || self.options.name.is_some();

        let names = match self.options.name.clone() {
            Some(name) => vec![name],
            None => match self.list_names(path, follow) {
                Ok(names) => names,
                Err(failures) => return failures,
            },
        };

        let mut failures = 0;
        let mut record = DumpRecord::default();
        for name in names {
            let value = if fetch {
                match self.access.get(path, &name, follow) {
                    Ok(value) => Some(value),
                    Err(error)
                        if error.kind() == AttrErrorKind::NotFound && is_protected(&name) =>
                    {
                        continue;
                    }
                    Err(error) => {
                        self.report(path, Some(&name), &error.message());
                        failures += 1;
                        continue;
                    }
                }
            } else {
                None
            };

            if self.options.only_values {
                let value = value.unwrap_or_default();
                if let Err(error) = self.out.write_all(&value) {
                    self.report(path, None, &error.to_string());
                    return failures + 1;
                }
                continue;
            }

            let encoded = value
                .filter(|value| !value.is_empty())
                .map(|value| EncodedValue::encode(&value, self.options.encoding));
            record.attributes.push((name, encoded));
        }

        if !record.is_empty() {
            record.path = self.header_path(path);
            if let Err(error) = record.write_to(&mut self.out) {
                self.report(path, None, &error.to_string());
                failures += 1;
            }
        }
        failures
    }

    fn list_names(&mut self, path: &Path, follow: bool) -> Result<Vec<OsString>, usize> {
        let mut names = match self.access.list(path, follow) {
            Ok(names) => names,
            Err(error)
                if matches!(
                    error.kind(),
                    AttrErrorKind::NotFound | AttrErrorKind::Unsupported
                ) =>
            {
                trace_xattr!("{}: no attributes ({})", path.display(), error.message());
                Vec::new()
            }
            Err(error) => {
                self.report(path, None, &error.message());
                return Err(1);
            }
        };
        names.retain(|name| self.filter.matches(name));
        names.sort();
        Ok(names)
    }

    fn header_path(&mut self, path: &Path) -> Vec<u8> {
        let mut shown = path.as_os_str().as_bytes();
        if self.options.absolute_names {
            return quote(shown, b"").into_owned();
        }
        if shown.first() == Some(&b'/') {
            if !self.warned_absolute {
                self.warned_absolute = true;
                let _ = writeln!(
                    self.err,
                    "{}: Removing leading '/' from absolute path names",
                    self.options.program
                );
            }
            shown = trim_slashes(shown);
        } else if let Some(rest) = shown.strip_prefix(b"./") {
            shown = trim_slashes(rest);
        }
        if shown.is_empty() {
            shown = b".";
        }
        quote(shown, b"").into_owned()
    }

    fn report(&mut self, path: &Path, name: Option<&OsStr>, message: &str) {
        let path = quote(path.as_os_str().as_bytes(), b"");
        let _ = write!(self.err, "{}: ", self.options.program);
        let _ = self.err.write_all(&path);
        if let Some(name) = name {
            let _ = self.err.write_all(b": ");
            let _ = self.err.write_all(&quote(name.as_bytes(), b"="));
        }
        let _ = writeln!(self.err, ": {message}");
    }
}

fn trim_slashes(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().take_while(|&&byte| byte == b'/').count();
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternFilter;
    use metadata::MemoryAttributes;

    #[cfg(any(target_os = "linux", target_os = "android"))]
    const NO_ATTRIBUTE: i32 = libc::ENODATA;
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    const NO_ATTRIBUTE: i32 = libc::ENOATTR;

    fn dumper(
        store: &MemoryAttributes,
        options: DumpOptions,
    ) -> Dumper<&MemoryAttributes, PatternFilter, Vec<u8>, Vec<u8>> {
        Dumper::new(store, PatternFilter::default(), options, Vec::new(), Vec::new())
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    fn with_values() -> DumpOptions {
        DumpOptions {
            dump_values: true,
            ..DumpOptions::default()
        }
    }

    #[test]
    fn names_only_by_default() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.b", b"2");
        store.insert("f", "user.a", b"1");

        let mut dumper = dumper(&store, DumpOptions::default());
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, err) = dumper.into_writers();
        assert_eq!(text(out), "# file: f\nuser.a\nuser.b\n\n");
        assert!(err.is_empty());
    }

    #[test]
    fn values_are_encoded_and_empty_values_print_bare() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.a", b"hello");
        store.insert("f", "user.e", b"");

        let options = DumpOptions {
            encoding: Encoding::Hex,
            ..with_values()
        };
        let mut dumper = dumper(&store, options);
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, _) = dumper.into_writers();
        assert_eq!(text(out), "# file: f\nuser.a=0x68656c6c6f\nuser.e\n\n");
    }

    #[test]
    fn file_without_matching_attributes_prints_nothing() {
        let store = MemoryAttributes::new();
        store.insert("f", "trusted.x", b"1");

        let mut dumper = dumper(&store, with_values());
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, err) = dumper.into_writers();
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn absolute_paths_warn_once() {
        let store = MemoryAttributes::new();
        store.insert("/a", "user.x", b"1");
        store.insert("//b", "user.x", b"1");

        let mut dumper = dumper(&store, DumpOptions::default());
        dumper.dump_path(Path::new("/a"));
        dumper.dump_path(Path::new("//b"));
        let (out, err) = dumper.into_writers();
        assert_eq!(text(out), "# file: a\nuser.x\n\n# file: b\nuser.x\n\n");
        assert_eq!(
            text(err),
            "getfattr: Removing leading '/' from absolute path names\n"
        );
    }

    #[test]
    fn absolute_names_keep_the_slash() {
        let store = MemoryAttributes::new();
        store.insert("/a", "user.x", b"1");

        let options = DumpOptions {
            absolute_names: true,
            ..DumpOptions::default()
        };
        let mut dumper = dumper(&store, options);
        dumper.dump_path(Path::new("/a"));
        let (out, err) = dumper.into_writers();
        assert_eq!(text(out), "# file: /a\nuser.x\n\n");
        assert!(err.is_empty());
    }

    #[test]
    fn absolute_names_keep_the_dot_slash() {
        let store = MemoryAttributes::new();
        store.insert("./f", "user.x", b"1");

        let options = DumpOptions {
            absolute_names: true,
            ..DumpOptions::default()
        };
        let mut dumper = dumper(&store, options);
        dumper.dump_path(Path::new("./f"));
        let (out, err) = dumper.into_writers();
        assert_eq!(text(out), "# file: ./f\nuser.x\n\n");
        assert!(err.is_empty());
    }

    #[test]
    fn dot_slash_prefix_is_stripped() {
        let store = MemoryAttributes::new();
        store.insert(".//d/f", "user.x", b"1");
        store.insert("./", "user.x", b"1");

        let mut dumper = dumper(&store, DumpOptions::default());
        dumper.dump_path(Path::new(".//d/f"));
        dumper.dump_path(Path::new("./"));
        let (out, _) = dumper.into_writers();
        assert_eq!(text(out), "# file: d/f\nuser.x\n\n# file: .\nuser.x\n\n");
    }

    #[test]
    fn header_path_is_quoted() {
        let store = MemoryAttributes::new();
        store.insert("new\nline", "user.x", b"1");

        let mut dumper = dumper(&store, DumpOptions::default());
        dumper.dump_path(Path::new("new\nline"));
        let (out, _) = dumper.into_writers();
        assert_eq!(text(out), "# file: new\\012line\nuser.x\n\n");
    }

    #[test]
    fn missing_system_attribute_is_silent() {
        let store = MemoryAttributes::new();
        store.insert("f", "system.posix_acl_access", b"x");
        store.insert("f", "user.a", b"1");
        store.fail("f", Some("system.posix_acl_access"), NO_ATTRIBUTE);

        let options = DumpOptions {
            dump_values: true,
            ..DumpOptions::default()
        };
        let mut dumper = Dumper::new(
            &store,
            PatternFilter::all(),
            options,
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, err) = dumper.into_writers();
        assert_eq!(text(out), "# file: f\nuser.a=\"1\"\n\n");
        assert!(err.is_empty());
    }

    #[test]
    fn other_get_failures_are_reported_and_counted() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.a", b"1");
        store.insert("f", "user.b", b"2");
        store.fail("f", Some("user.a"), libc::EACCES);

        let mut dumper = dumper(&store, with_values());
        assert_eq!(dumper.dump_path(Path::new("f")), 1);
        let (out, err) = dumper.into_writers();
        assert_eq!(text(out), "# file: f\nuser.b=\"2\"\n\n");
        let err = text(err);
        assert!(err.starts_with("getfattr: f: user.a: "), "{err}");
    }

    #[test]
    fn unsupported_filesystem_means_no_attributes() {
        let store = MemoryAttributes::new();
        store.fail("f", None, libc::ENOTSUP);

        let mut dumper = dumper(&store, with_values());
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, err) = dumper.into_writers();
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn single_name_lookup_bypasses_filter() {
        let store = MemoryAttributes::new();
        store.insert("f", "trusted.x", b"v");

        let options = DumpOptions {
            name: Some(OsString::from("trusted.x")),
            ..DumpOptions::default()
        };
        let mut dumper = dumper(&store, options);
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, _) = dumper.into_writers();
        assert_eq!(text(out), "# file: f\ntrusted.x=\"v\"\n\n");
    }

    #[test]
    fn single_name_missing_is_an_error() {
        let store = MemoryAttributes::new();
        let options = DumpOptions {
            name: Some(OsString::from("user.none")),
            ..DumpOptions::default()
        };
        let mut dumper = dumper(&store, options);
        assert_eq!(dumper.dump_path(Path::new("f")), 1);
        let (out, err) = dumper.into_writers();
        assert!(out.is_empty());
        assert_eq!(text(err), "getfattr: f: user.none: No such attribute\n");
    }

    #[test]
    fn only_values_writes_raw_bytes() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.a", b"\x00raw\n");

        let options = DumpOptions {
            only_values: true,
            name: Some(OsString::from("user.a")),
            ..DumpOptions::default()
        };
        let mut dumper = dumper(&store, options);
        assert_eq!(dumper.dump_path(Path::new("f")), 0);
        let (out, _) = dumper.into_writers();
        assert_eq!(out, b"\x00raw\n");
    }

    #[test]
    fn no_dereference_operates_on_links() {
        let store = MemoryAttributes::new();
        let options = DumpOptions {
            no_dereference: true,
            ..DumpOptions::default()
        };
        let mut dumper = dumper(&store, options);
        dumper.dump_path(Path::new("link"));
        assert_eq!(store.follows(), [(Path::new("link").to_path_buf(), false)]);
    }
}
