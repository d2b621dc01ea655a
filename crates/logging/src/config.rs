//! crates/logging/src/config.rs
//! Verbosity configuration built from `-v` counts and `--debug` tokens.

use super::levels::{DebugFlag, DebugLevels};

/// Verbosity configuration for the debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct VerbosityConfig {
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a configuration from a verbose level (0-3).
    ///
    /// Level 1 enables walk and restore tracing, level 2 adds attribute
    /// system calls, level 3 and above turn everything up to level 2.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        match level {
            0 => {}
            1 => {
                config.debug.walk = 1;
                config.debug.restore = 1;
            }
            2 => {
                config.debug.walk = 1;
                config.debug.restore = 1;
                config.debug.xattr = 1;
            }
            _ => config.debug.set_all(2),
        }

        config
    }

    /// Apply a single debug flag token (e.g., "walk2", "xattr", "all", "none").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        match name {
            "all" => self.debug.set_all(level),
            "none" => self.debug.set_all(0),
            _ => {
                let flag = DebugFlag::from_name(name)
                    .ok_or_else(|| format!("unknown debug flag: {name}"))?;
                self.debug.set(flag, level);
            }
        }
        Ok(())
    }

    /// Apply a comma-separated list of debug tokens.
    pub fn apply_debug_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }
}

/// Parse a flag token like "walk2" into ("walk", 2) or "codec" into ("codec", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_level_zero_is_silent() {
        assert_eq!(VerbosityConfig::from_verbose_level(0), VerbosityConfig::default());
    }

    #[test]
    fn verbose_levels_are_monotonic() {
        let one = VerbosityConfig::from_verbose_level(1);
        let two = VerbosityConfig::from_verbose_level(2);
        let many = VerbosityConfig::from_verbose_level(9);
        for flag in DebugFlag::ALL {
            assert!(one.debug.get(flag) <= two.debug.get(flag));
            assert!(two.debug.get(flag) <= many.debug.get(flag));
        }
        assert_eq!(many.debug.get(DebugFlag::Codec), 2);
    }

    #[test]
    fn debug_tokens_apply_levels() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_flag("walk2").unwrap();
        config.apply_debug_flag("codec").unwrap();
        assert_eq!(config.debug.walk, 2);
        assert_eq!(config.debug.codec, 1);
        assert_eq!(config.debug.xattr, 0);
    }

    #[test]
    fn all_and_none_cover_every_flag() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_list("all3").unwrap();
        assert!(DebugFlag::ALL.iter().all(|f| config.debug.get(*f) == 3));
        config.apply_debug_list("none, restore").unwrap();
        assert_eq!(config.debug.restore, 1);
        assert_eq!(config.debug.walk, 0);
    }

    #[test]
    fn bad_tokens_are_rejected() {
        let mut config = VerbosityConfig::default();
        assert!(config.apply_debug_flag("").is_err());
        assert!(config.apply_debug_flag("bogus").is_err());
        assert!(config.apply_debug_flag("2").is_err());
        assert!(config.apply_debug_flag("walk999").is_err());
    }
}
