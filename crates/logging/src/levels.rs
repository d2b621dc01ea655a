//! crates/logging/src/levels.rs
//! Debug flag enum and per-flag level storage.

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DebugFlag {
    /// Tree traversal: directories entered, symlinks skipped or followed.
    Walk,
    /// Attribute system calls issued through the access port.
    Xattr,
    /// Value encoding and decoding.
    Codec,
    /// Restore stream parsing.
    Restore,
}

impl DebugFlag {
    /// Every flag, in the order used for `--debug=all` and help output.
    pub const ALL: [Self; 4] = [Self::Walk, Self::Xattr, Self::Codec, Self::Restore];

    /// Returns the token accepted by `--debug` for this flag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Xattr => "xattr",
            Self::Codec => "codec",
            Self::Restore => "restore",
        }
    }

    /// Looks up a flag by its `--debug` token.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DebugLevels {
    /// Tree traversal level.
    pub walk: u8,
    /// Attribute system call level.
    pub xattr: u8,
    /// Codec level.
    pub codec: u8,
    /// Restore parser level.
    pub restore: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Walk => self.walk,
            DebugFlag::Xattr => self.xattr,
            DebugFlag::Codec => self.codec,
            DebugFlag::Restore => self.restore,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Walk => self.walk = level,
            DebugFlag::Xattr => self.xattr = level,
            DebugFlag::Codec => self.codec = level,
            DebugFlag::Restore => self.restore = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}
