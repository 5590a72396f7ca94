//! Member-level permission helpers.
//!
//! Binds a cached [`Member`] to a [`PermissionEngine`] so callers can ask about
//! "this member" without threading guild and role ids through every call.

use super::flags::Permissions;
use super::models::{Color, GuildChannel, Member, Role};
use super::resolver::{has_permissions, PermissionEngine, PermissionError};
use crate::cache::RoleCache;

/// Permission and role view of one member.
///
/// The member's own `guild_id` is the guild scope for every query.
#[derive(Debug)]
pub struct MemberPermissions<'a, 'c, C: ?Sized> {
    engine: &'a PermissionEngine<'c, C>,
    member: &'a Member,
}

impl<'c, C: RoleCache + ?Sized> PermissionEngine<'c, C> {
    /// Bind a member to this engine.
    pub const fn member<'a>(&'a self, member: &'a Member) -> MemberPermissions<'a, 'c, C> {
        MemberPermissions::new(self, member)
    }
}

impl<'a, 'c, C: RoleCache + ?Sized> MemberPermissions<'a, 'c, C> {
    #[must_use]
    pub const fn new(engine: &'a PermissionEngine<'c, C>, member: &'a Member) -> Self {
        Self { engine, member }
    }

    #[must_use]
    pub const fn member(&self) -> &'a Member {
        self.member
    }

    /// Cached roles of the member, highest first. Stale ids are skipped.
    pub fn roles(&self) -> Vec<&'c Role> {
        self.engine
            .roles()
            .by_position(self.member.guild_id, self.member.role_ids.iter().copied())
    }

    pub fn highest_role(&self) -> Option<&'c Role> {
        self.engine
            .roles()
            .highest_role(self.member.guild_id, self.member.role_ids.iter().copied())
    }

    /// Display color, or `None` if no role sets one.
    pub fn color(&self) -> Option<Color> {
        self.engine
            .roles()
            .display_color(self.member.guild_id, self.member.role_ids.iter().copied())
    }

    /// Guild-wide permissions, ignoring channel overwrites.
    pub fn permissions(&self) -> Permissions {
        self.engine
            .resolve_guild_permissions(self.member.guild_id, self.member.role_ids.iter().copied())
    }

    /// Permissions in a channel of the member's guild.
    pub fn permissions_in(&self, channel: &GuildChannel) -> Result<Permissions, PermissionError> {
        self.engine.resolve_channel_permissions(
            self.member.guild_id,
            self.member.id,
            self.member.role_ids.iter().copied(),
            channel,
        )
    }

    pub fn has_permissions<I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = Permissions>,
    {
        has_permissions(required, self.permissions())
    }

    pub fn has_channel_permissions<I>(
        &self,
        channel: &GuildChannel,
        required: I,
    ) -> Result<bool, PermissionError>
    where
        I: IntoIterator<Item = Permissions>,
    {
        Ok(has_permissions(required, self.permissions_in(channel)?))
    }

    /// Require guild-wide permissions.
    ///
    /// Returns `Err(PermissionError::MissingPermissions)` listing only the bits
    /// the member lacks.
    pub fn require_permissions(&self, required: Permissions) -> Result<(), PermissionError> {
        require(required, self.permissions())
    }

    /// Require permissions in a channel.
    pub fn require_channel_permissions(
        &self,
        channel: &GuildChannel,
        required: Permissions,
    ) -> Result<(), PermissionError> {
        require(required, self.permissions_in(channel)?)
    }
}

const fn require(required: Permissions, actual: Permissions) -> Result<(), PermissionError> {
    let missing = required.difference(actual);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PermissionError::MissingPermissions(missing))
    }
}
