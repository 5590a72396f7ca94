//! Role lookup and hierarchy views.
//!
//! Resolves a member's role ids against a guild's cached roles. Ids that no
//! longer resolve are stale data and are silently dropped.

use std::cmp::Reverse;

use super::flags::Permissions;
use super::models::{Color, Role};
use crate::cache::{CacheView, RoleCache};
use crate::snowflake::Snowflake;

/// Role resolution over a borrowed cache snapshot.
#[derive(Debug)]
pub struct RoleResolver<'c, C: ?Sized> {
    cache: &'c C,
}

// Manual impls: the resolver is a shared reference regardless of `C`.
impl<C: ?Sized> Clone for RoleResolver<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for RoleResolver<'_, C> {}

impl<'c, C: RoleCache + ?Sized> RoleResolver<'c, C> {
    #[must_use]
    pub const fn new(cache: &'c C) -> Self {
        Self { cache }
    }

    /// Look up every id in the guild's role cache.
    ///
    /// Unknown ids are dropped. Order is unspecified.
    pub fn resolve_roles<I>(&self, guild_id: Snowflake, role_ids: I) -> Vec<&'c Role>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let Some(view) = self.cache.roles(guild_id) else {
            tracing::debug!(%guild_id, "No roles cached for guild");
            return Vec::new();
        };

        role_ids
            .into_iter()
            .filter_map(|role_id| {
                let role = view.get_by_id(role_id);
                if role.is_none() {
                    tracing::debug!(%guild_id, %role_id, "Skipping role missing from cache");
                }
                role
            })
            .collect()
    }

    /// Resolved roles in hierarchy order, highest first.
    pub fn by_position<I>(&self, guild_id: Snowflake, role_ids: I) -> Vec<&'c Role>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let mut roles = self.resolve_roles(guild_id, role_ids);
        roles.sort_unstable_by_key(|r| Reverse(r.hierarchy_key()));
        roles.dedup_by_key(|r| r.id);
        roles
    }

    /// The highest resolved role, if any.
    pub fn highest_role<I>(&self, guild_id: Snowflake, role_ids: I) -> Option<&'c Role>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        self.resolve_roles(guild_id, role_ids)
            .into_iter()
            .max_by_key(|r| r.hierarchy_key())
    }

    /// Resolved roles with a non-zero color, highest first.
    pub fn colored<I>(&self, guild_id: Snowflake, role_ids: I) -> Vec<&'c Role>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let mut roles = self.by_position(guild_id, role_ids);
        roles.retain(|r| r.color != 0);
        roles
    }

    /// Resolved roles that on their own grant every bit of `permissions`, highest first.
    pub fn with_permissions<I>(
        &self,
        guild_id: Snowflake,
        role_ids: I,
        permissions: Permissions,
    ) -> Vec<&'c Role>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let mut roles = self.by_position(guild_id, role_ids);
        roles.retain(|r| r.permissions.has(permissions));
        roles
    }

    /// Display color: the color of the highest role that sets one.
    ///
    /// Roles with color `0` never participate, even when they rank highest.
    /// Equal positions are broken by the larger role id. Returns `None` when
    /// no role sets a color, meaning the platform default applies.
    pub fn display_color<I>(&self, guild_id: Snowflake, role_ids: I) -> Option<Color>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        self.resolve_roles(guild_id, role_ids)
            .into_iter()
            .filter(|r| r.color != 0)
            .max_by_key(|r| r.hierarchy_key())
            .and_then(|r| r.color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    const GUILD: Snowflake = Snowflake(1);

    fn role(id: u64, position: i32, color: u32) -> Role {
        Role::new(Snowflake(id), GUILD, position, Permissions::empty()).with_color(color)
    }

    fn ids(raw: &[u64]) -> Vec<Snowflake> {
        raw.iter().copied().map(Snowflake).collect()
    }

    #[test]
    fn test_resolve_drops_unknown_ids() {
        let cache: MemoryCache = [role(10, 1, 0), role(11, 2, 0)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        let roles = resolver.resolve_roles(GUILD, ids(&[10, 11, 99]));
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().all(|r| r.id != Snowflake(99)));
    }

    #[test]
    fn test_resolve_unknown_guild_is_empty() {
        let cache: MemoryCache = [role(10, 1, 0)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        assert!(resolver.resolve_roles(Snowflake(2), ids(&[10])).is_empty());
    }

    #[test]
    fn test_by_position_highest_first_with_id_tie_break() {
        let cache: MemoryCache = [role(10, 1, 0), role(11, 3, 0), role(12, 3, 0), role(13, 2, 0)]
            .into_iter()
            .collect();
        let resolver = RoleResolver::new(&cache);

        let order: Vec<_> = resolver
            .by_position(GUILD, ids(&[10, 11, 12, 13]))
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(order, vec![12, 11, 13, 10]);
    }

    #[test]
    fn test_highest_role() {
        let cache: MemoryCache = [role(10, 5, 0), role(11, 2, 0)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        assert_eq!(
            resolver.highest_role(GUILD, ids(&[10, 11])).map(|r| r.id),
            Some(Snowflake(10))
        );
        assert!(resolver.highest_role(GUILD, ids(&[])).is_none());
    }

    #[test]
    fn test_colored_skips_uncolored_roles() {
        let cache: MemoryCache = [role(10, 5, 0), role(11, 2, 0x00FF00), role(12, 1, 0x0000FF)]
            .into_iter()
            .collect();
        let resolver = RoleResolver::new(&cache);

        let colored: Vec<_> = resolver
            .colored(GUILD, ids(&[10, 11, 12]))
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(colored, vec![11, 12]);
    }

    #[test]
    fn test_with_permissions_filters_by_bits() {
        let cache: MemoryCache = [
            Role::new(Snowflake(10), GUILD, 1, Permissions::KICK_MEMBERS),
            Role::new(Snowflake(11), GUILD, 2, Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS),
            Role::new(Snowflake(12), GUILD, 3, Permissions::BAN_MEMBERS),
        ]
        .into_iter()
        .collect();
        let resolver = RoleResolver::new(&cache);

        let kickers: Vec<_> = resolver
            .with_permissions(GUILD, ids(&[10, 11, 12]), Permissions::KICK_MEMBERS)
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(kickers, vec![11, 10]);

        let both = resolver.with_permissions(
            GUILD,
            ids(&[10, 11, 12]),
            Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS,
        );
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn test_display_color_highest_colored_role() {
        let cache: MemoryCache = [role(10, 1, 0), role(11, 2, 0xFF0000)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        assert_eq!(
            resolver.display_color(GUILD, ids(&[10, 11])),
            Color::from_wire(0xFF0000)
        );
    }

    #[test]
    fn test_display_color_ignores_higher_uncolored_role() {
        let cache: MemoryCache = [role(10, 9, 0), role(11, 2, 0x00FF00)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        assert_eq!(
            resolver.display_color(GUILD, ids(&[10, 11])),
            Color::from_wire(0x00FF00)
        );
    }

    #[test]
    fn test_display_color_tie_break_larger_id_wins() {
        let cache: MemoryCache = [role(20, 4, 0xAA0000), role(30, 4, 0x00BB00)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        // Input order must not matter
        assert_eq!(
            resolver.display_color(GUILD, ids(&[20, 30])),
            Color::from_wire(0x00BB00)
        );
        assert_eq!(
            resolver.display_color(GUILD, ids(&[30, 20])),
            Color::from_wire(0x00BB00)
        );
    }

    #[test]
    fn test_display_color_absent_without_colored_roles() {
        let cache: MemoryCache = [role(10, 1, 0), role(11, 2, 0)].into_iter().collect();
        let resolver = RoleResolver::new(&cache);

        assert!(resolver.display_color(GUILD, ids(&[10, 11])).is_none());
        assert!(resolver.display_color(GUILD, ids(&[])).is_none());
        assert!(resolver.display_color(GUILD, ids(&[99])).is_none());
    }
}
