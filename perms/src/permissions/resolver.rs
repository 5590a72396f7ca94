//! Permission resolution logic.
//!
//! Computes effective permissions for a member in a guild or channel context.
//!
//! Resolution order:
//! 1. OR together the permissions of every resolved role (guild level)
//! 2. Apply the "everyone" channel overwrite, if the everyone role is enabled
//! 3. Apply the union of the member's role overwrites
//! 4. Apply the member's own overwrite
//!
//! Each overwrite layer is applied as `(acc & !deny) | allow`, so a later,
//! more specific layer always beats an earlier one.

use std::collections::HashSet;

use super::flags::Permissions;
use super::models::{GuildChannel, OverwriteKind, PermissionOverwrite};
use super::roles::RoleResolver;
use crate::cache::RoleCache;
use crate::config::ResolverConfig;
use crate::snowflake::Snowflake;

/// One allow/deny layer of channel overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverwriteLayer {
    pub allow: Permissions,
    pub deny: Permissions,
}

impl OverwriteLayer {
    /// Layer that leaves permissions unchanged.
    pub const EMPTY: Self = Self {
        allow: Permissions::empty(),
        deny: Permissions::empty(),
    };

    /// Union the masks of all given overwrites into one layer.
    pub fn collect<'a, I>(overwrites: I) -> Self
    where
        I: IntoIterator<Item = &'a PermissionOverwrite>,
    {
        overwrites.into_iter().fold(Self::EMPTY, |layer, o| Self {
            allow: layer.allow | o.allow,
            deny: layer.deny | o.deny,
        })
    }

    /// Deny first, then allow.
    #[must_use]
    pub const fn apply(self, permissions: Permissions) -> Permissions {
        permissions.difference(self.deny).union(self.allow)
    }
}

/// Apply layers in slice order.
pub fn apply_layers(base: Permissions, layers: &[OverwriteLayer]) -> Permissions {
    layers.iter().fold(base, |acc, layer| layer.apply(acc))
}

/// Check that `computed` holds every bit of every `required` flag.
///
/// An empty `required` set is always satisfied.
pub fn has_permissions<I>(required: I, computed: Permissions) -> bool
where
    I: IntoIterator<Item = Permissions>,
{
    computed.has(Permissions::from_flags(required))
}

/// Computes guild and channel permissions from cached roles.
#[derive(Debug)]
pub struct PermissionEngine<'c, C: ?Sized> {
    roles: RoleResolver<'c, C>,
    config: ResolverConfig,
}

impl<'c, C: RoleCache + ?Sized> PermissionEngine<'c, C> {
    #[must_use]
    pub fn new(cache: &'c C) -> Self {
        Self::with_config(cache, ResolverConfig::default())
    }

    #[must_use]
    pub const fn with_config(cache: &'c C, config: ResolverConfig) -> Self {
        Self {
            roles: RoleResolver::new(cache),
            config,
        }
    }

    /// The role resolver this engine reads through.
    #[must_use]
    pub const fn roles(&self) -> RoleResolver<'c, C> {
        self.roles
    }

    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Permissions granted anywhere in the guild, ignoring channel overwrites.
    ///
    /// Purely additive: the OR of every resolved role's permissions. No roles
    /// yields an empty set.
    #[tracing::instrument(level = "debug", skip(self, role_ids))]
    pub fn resolve_guild_permissions<I>(&self, guild_id: Snowflake, role_ids: I) -> Permissions
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let permissions = self.finish(self.base_permissions(guild_id, role_ids));
        tracing::trace!(%permissions, "Resolved guild permissions");
        permissions
    }

    /// Permissions of a member in a channel, after overwrites.
    ///
    /// Fails only when `channel` is not part of `guild_id`; missing roles and
    /// overwrites never contribute and never fail.
    #[tracing::instrument(
        level = "debug",
        skip(self, role_ids, channel),
        fields(channel_id = %channel.id)
    )]
    pub fn resolve_channel_permissions<I>(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        role_ids: I,
        channel: &GuildChannel,
    ) -> Result<Permissions, PermissionError>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        if channel.guild_id != guild_id {
            tracing::warn!(
                %guild_id,
                channel_guild_id = %channel.guild_id,
                "Channel belongs to another guild"
            );
            return Err(PermissionError::GuildMismatch {
                expected: guild_id,
                actual: channel.guild_id,
            });
        }

        let role_ids: HashSet<Snowflake> = role_ids.into_iter().collect();
        let base = self.base_permissions(guild_id, role_ids.iter().copied());
        let layers = self.overwrite_layers(guild_id, member_id, &role_ids, channel);

        let permissions = self.finish(apply_layers(base, &layers));
        tracing::trace!(%permissions, "Resolved channel permissions");
        Ok(permissions)
    }

    fn base_permissions<I>(&self, guild_id: Snowflake, role_ids: I) -> Permissions
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let everyone = self.config.include_everyone_role.then_some(guild_id);

        self.roles
            .resolve_roles(guild_id, role_ids.into_iter().chain(everyone))
            .into_iter()
            .fold(Permissions::empty(), |acc, role| acc | role.permissions)
    }

    /// Layers in application order: everyone, roles, member.
    fn overwrite_layers(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        role_ids: &HashSet<Snowflake>,
        channel: &GuildChannel,
    ) -> [OverwriteLayer; 3] {
        let everyone_enabled = self.config.include_everyone_role;

        let everyone = if everyone_enabled {
            OverwriteLayer::collect(
                channel
                    .overwrites(OverwriteKind::Role)
                    .filter(|o| o.id == guild_id),
            )
        } else {
            OverwriteLayer::EMPTY
        };

        let roles = OverwriteLayer::collect(
            channel
                .overwrites(OverwriteKind::Role)
                .filter(|o| role_ids.contains(&o.id))
                .filter(|o| !(everyone_enabled && o.id == guild_id)),
        );

        let member = OverwriteLayer::collect(
            channel
                .overwrites(OverwriteKind::Member)
                .filter(|o| o.id == member_id),
        );

        [everyone, roles, member]
    }

    const fn finish(&self, permissions: Permissions) -> Permissions {
        if self.config.retain_unknown_bits {
            permissions
        } else {
            permissions.known()
        }
    }
}

/// Permission check errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The channel is not part of the guild being resolved.
    #[error("Channel belongs to guild {actual}, not guild {expected}")]
    GuildMismatch {
        expected: Snowflake,
        actual: Snowflake,
    },

    /// Member lacks the listed permissions.
    #[error("Missing permissions: {0}")]
    MissingPermissions(Permissions),
}
