//! Resolver Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{bail, Context, Result};
use std::env;

/// Permission resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Always fold the guild's implicit "everyone" role (id == guild id) into
    /// the base permissions, and apply its channel overwrite as its own layer
    /// ahead of role overwrites (default: false)
    pub include_everyone_role: bool,

    /// Keep mask bits that map to no known permission flag (default: true)
    pub retain_unknown_bits: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            include_everyone_role: false,
            retain_unknown_bits: true,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            include_everyone_role: env_flag(
                "PERMS_INCLUDE_EVERYONE_ROLE",
                defaults.include_everyone_role,
            )?,
            retain_unknown_bits: env_flag(
                "PERMS_RETAIN_UNKNOWN_BITS",
                defaults.retain_unknown_bits,
            )?,
        })
    }

    #[must_use]
    pub const fn with_everyone_role(mut self, enabled: bool) -> Self {
        self.include_everyone_role = enabled;
        self
    }

    #[must_use]
    pub const fn with_retain_unknown_bits(mut self, enabled: bool) -> Self {
        self.retain_unknown_bits = enabled;
        self
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).with_context(|| format!("{name} must be a boolean")),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("{name} is not valid unicode")),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean {other:?}"),
    }
}
