//! Cached entity models consumed by permission resolution.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flags::Permissions;
use crate::cache::Identified;
use crate::snowflake::Snowflake;

/// Guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    /// Packed RGB value; `0` means the role sets no color.
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
    /// Hierarchy rank. Higher positions override lower ones.
    pub position: i32,
    #[serde(default)]
    pub permissions: Permissions,
}

impl Role {
    /// Create an unnamed role with no color.
    #[must_use]
    pub fn new(id: Snowflake, guild_id: Snowflake, position: i32, permissions: Permissions) -> Self {
        Self {
            id,
            guild_id,
            name: String::new(),
            color: 0,
            hoist: false,
            managed: false,
            mentionable: false,
            position,
            permissions,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The role's color, or `None` for the wire sentinel `0`.
    #[must_use]
    pub const fn color(&self) -> Option<Color> {
        Color::from_wire(self.color)
    }

    /// Sort key for the role hierarchy: position first, id as tie-break.
    ///
    /// Positions are not guaranteed unique across a guild's roles, so the id
    /// keeps the order total and reproducible.
    #[must_use]
    pub const fn hierarchy_key(&self) -> (i32, Snowflake) {
        (self.position, self.id)
    }

    /// Whether this is the implicit "everyone" role, which shares its id with the guild.
    #[must_use]
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }
}

impl Identified for Role {
    fn id(&self) -> Snowflake {
        self.id
    }
}

/// RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Translate a wire color, where `0` means unset.
    #[must_use]
    pub const fn from_wire(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A member of a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user id.
    pub id: Snowflake,
    pub guild_id: Snowflake,
    #[serde(default)]
    pub nick: Option<String>,
    /// Assigned roles. May reference roles that are no longer cached.
    #[serde(rename = "roles", default)]
    pub role_ids: HashSet<Snowflake>,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub deaf: bool,
    /// Most recent join time. Absent for some departed members.
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl Member {
    #[must_use]
    pub fn new(id: Snowflake, guild_id: Snowflake) -> Self {
        Self {
            id,
            guild_id,
            nick: None,
            role_ids: HashSet::new(),
            mute: false,
            deaf: false,
            joined_at: None,
        }
    }

    #[must_use]
    pub fn with_roles<I>(mut self, role_ids: I) -> Self
    where
        I: IntoIterator<Item = Snowflake>,
    {
        self.role_ids.extend(role_ids);
        self
    }
}

impl Identified for Member {
    fn id(&self) -> Snowflake {
        self.id
    }
}

/// Whether an overwrite targets a role or a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteKind {
    Role,
    Member,
}

/// Per-channel allow/deny rule for a role or member.
///
/// `allow` and `deny` may overlap; deny is applied first within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Role id or member id, depending on `kind`.
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: OverwriteKind,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

impl PermissionOverwrite {
    #[must_use]
    pub const fn role(role_id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id: role_id,
            kind: OverwriteKind::Role,
            allow,
            deny,
        }
    }

    #[must_use]
    pub const fn member(member_id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id: member_id,
            kind: OverwriteKind::Member,
            allow,
            deny,
        }
    }
}

/// Guild-scoped channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildChannel {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

impl GuildChannel {
    #[must_use]
    pub const fn new(id: Snowflake, guild_id: Snowflake) -> Self {
        Self {
            id,
            guild_id,
            name: String::new(),
            permission_overwrites: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_overwrite(mut self, overwrite: PermissionOverwrite) -> Self {
        self.permission_overwrites.push(overwrite);
        self
    }

    /// Overwrites of the given kind.
    pub fn overwrites(&self, kind: OverwriteKind) -> impl Iterator<Item = &PermissionOverwrite> {
        self.permission_overwrites
            .iter()
            .filter(move |o| o.kind == kind)
    }
}

impl Identified for GuildChannel {
    fn id(&self) -> Snowflake {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_zero_is_unset() {
        let role = Role::new(Snowflake(1), Snowflake(2), 0, Permissions::empty());
        assert_eq!(role.color(), None);
        assert_eq!(role.with_color(0xFF0000).color(), Color::from_wire(0xFF0000));
    }

    #[test]
    fn test_color_components() {
        let color = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(color.rgb(), 0x123456);
        assert_eq!(color.red(), 0x12);
        assert_eq!(color.green(), 0x34);
        assert_eq!(color.blue(), 0x56);
        assert_eq!(color.to_string(), "#123456");
    }

    #[test]
    fn test_hierarchy_key_orders_position_then_id() {
        let low = Role::new(Snowflake(50), Snowflake(1), 1, Permissions::empty());
        let tied_small = Role::new(Snowflake(10), Snowflake(1), 2, Permissions::empty());
        let tied_large = Role::new(Snowflake(20), Snowflake(1), 2, Permissions::empty());

        assert!(low.hierarchy_key() < tied_small.hierarchy_key());
        assert!(tied_small.hierarchy_key() < tied_large.hierarchy_key());
    }

    #[test]
    fn test_everyone_role_shares_guild_id() {
        let everyone = Role::new(Snowflake(7), Snowflake(7), 0, Permissions::empty());
        let other = Role::new(Snowflake(8), Snowflake(7), 1, Permissions::empty());
        assert!(everyone.is_everyone());
        assert!(!other.is_everyone());
    }

    #[test]
    fn test_member_deserializes_wire_shape() {
        let json = r#"{
            "id": "100",
            "guild_id": "1",
            "roles": ["10", "11"],
            "mute": false,
            "deaf": true,
            "joined_at": "2018-09-04T12:00:00Z"
        }"#;

        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id, Snowflake(100));
        assert_eq!(member.role_ids.len(), 2);
        assert!(member.role_ids.contains(&Snowflake(11)));
        assert!(member.deaf);
        assert!(member.nick.is_none());
        assert!(member.joined_at.is_some());
    }

    #[test]
    fn test_member_without_join_time() {
        let member: Member = serde_json::from_str(r#"{"id": "1", "guild_id": "2"}"#).unwrap();
        assert!(member.joined_at.is_none());
        assert!(member.role_ids.is_empty());
    }

    #[test]
    fn test_channel_overwrites_deserialize() {
        let json = r#"{
            "id": "5",
            "guild_id": "1",
            "name": "general",
            "permission_overwrites": [
                {"id": "10", "type": "role", "allow": "1024", "deny": "2048"},
                {"id": "100", "type": "member", "allow": 2048, "deny": "0"}
            ]
        }"#;

        let channel: GuildChannel = serde_json::from_str(json).unwrap();
        assert_eq!(channel.overwrites(OverwriteKind::Role).count(), 1);

        let member = channel.overwrites(OverwriteKind::Member).next().unwrap();
        assert_eq!(member.id, Snowflake(100));
        assert_eq!(member.allow, Permissions::SEND_MESSAGES);
        assert!(member.deny.is_empty());
    }
}
