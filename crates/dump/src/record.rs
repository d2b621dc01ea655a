use codec::{EncodedValue, quote};
use std::ffi::OsString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;

/// The dump of one file: its header path and the attributes to print.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DumpRecord {
    /// Path as printed in the header, already normalised and quoted.
    pub path: Vec<u8>,
    /// Names with their encoded values. `None` prints the bare name.
    pub attributes: Vec<(OsString, Option<EncodedValue>)>,
}

impl DumpRecord {
    /// Starts an empty record for `path`.
    #[must_use]
    pub const fn new(path: Vec<u8>) -> Self {
        Self {
            path,
            attributes: Vec::new(),
        }
    }

    /// Whether nothing would be printed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Writes the header, one line per attribute, and the terminating blank
    /// line. An empty record writes nothing.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        out.write_all(b"# file: ")?;
        out.write_all(&self.path)?;
        out.write_all(b"\n")?;
        for (name, value) in &self.attributes {
            out.write_all(&quote(name.as_bytes(), b"="))?;
            if let Some(value) = value {
                out.write_all(b"=")?;
                out.write_all(value.as_str().as_bytes())?;
            }
            out.write_all(b"\n")?;
        }
        out.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::Encoding;

    #[test]
    fn empty_record_writes_nothing() {
        let mut out = Vec::new();
        DumpRecord::new(b"f".to_vec()).write_to(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn names_with_and_without_values() {
        let mut record = DumpRecord::new(b"dir/f".to_vec());
        record.attributes.push((
            OsString::from("user.a"),
            Some(EncodedValue::encode(b"hi", Encoding::Text)),
        ));
        record.attributes.push((OsString::from("user.empty"), None));
        record.attributes.push((OsString::from("user.k=v"), None));

        let mut out = Vec::new();
        record.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# file: dir/f\nuser.a=\"hi\"\nuser.empty\nuser.k\\075v\n\n"
        );
    }
}
