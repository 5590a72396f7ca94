//! Shared fixtures for permission resolution tests.
//!
//! Use [`GuildFixture`] to build a cached guild with roles, then resolve
//! against it with a `PermissionEngine`.
#![allow(dead_code)]

use guildcache_perms::permissions::{Member, Permissions, Role};
use guildcache_perms::{MemoryCache, Snowflake};
use tracing_subscriber::EnvFilter;

pub const GUILD: Snowflake = Snowflake(81384788765712384);
pub const OTHER_GUILD: Snowflake = Snowflake(81384788765712385);
pub const MEMBER: Snowflake = Snowflake(80351110224678912);
pub const CHANNEL: Snowflake = Snowflake(41771983423143937);

/// Install a test-writer subscriber so resolver logs show up with `--nocapture`.
///
/// Filtered by `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const fn raw(bits: u64) -> Permissions {
    Permissions::from_raw(bits)
}

pub fn ids(raw: &[u64]) -> Vec<Snowflake> {
    raw.iter().copied().map(Snowflake).collect()
}

/// Builder for a cached guild's roles.
pub struct GuildFixture {
    guild_id: Snowflake,
    cache: MemoryCache,
}

impl GuildFixture {
    pub fn new() -> Self {
        Self::for_guild(GUILD)
    }

    pub fn for_guild(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            cache: MemoryCache::new(),
        }
    }

    /// Add a role with the given position, permission bits and color.
    pub fn role(mut self, id: u64, position: i32, bits: u64, color: u32) -> Self {
        self.cache.insert_role(
            Role::new(Snowflake(id), self.guild_id, position, raw(bits))
                .with_name(format!("role-{id}"))
                .with_color(color),
        );
        self
    }

    /// Add the implicit everyone role, which shares the guild's id.
    pub fn everyone(mut self, bits: u64) -> Self {
        self.cache
            .insert_role(Role::new(self.guild_id, self.guild_id, 0, raw(bits)).with_name("@everyone"));
        self
    }

    pub fn build(self) -> MemoryCache {
        self.cache
    }
}

/// A member of [`GUILD`] holding the given roles.
pub fn member_with_roles(role_ids: &[u64]) -> Member {
    Member::new(MEMBER, GUILD).with_roles(ids(role_ids))
}
