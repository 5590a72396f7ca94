//! Guild permission flags using bitflags.
//!
//! The bit positions are the platform's published layout and must not be
//! renumbered. Categories, roughly:
//! - General (bits 0-9): Invites, moderation, guild administration
//! - Text (bits 10-18): Channel visibility and messaging
//! - Voice (bits 20-25): Voice channel connection and moderation
//! - Management (bits 26-34): Nicknames, roles, webhooks, expressions, threads
//! - Threads and extras (bits 35-50): Threads, stickers, activities, polls

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Guild permissions represented as a 64-bit bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        // === General (bits 0-9) ===
        /// Permission to create instant invites
        const CREATE_INSTANT_INVITE    = 1 << 0;
        /// Permission to kick members
        const KICK_MEMBERS             = 1 << 1;
        /// Permission to ban members
        const BAN_MEMBERS              = 1 << 2;
        /// Grants every permission when enforced by the platform
        const ADMINISTRATOR            = 1 << 3;
        /// Permission to create, edit, and delete channels
        const MANAGE_CHANNELS          = 1 << 4;
        /// Permission to modify guild settings
        const MANAGE_GUILD             = 1 << 5;
        /// Permission to add reactions to messages
        const ADD_REACTIONS            = 1 << 6;
        /// Permission to view the guild audit log
        const VIEW_AUDIT_LOG           = 1 << 7;
        /// Permission to use priority speaker in voice channels
        const PRIORITY_SPEAKER         = 1 << 8;
        /// Permission to stream video
        const STREAM                   = 1 << 9;

        // === Text (bits 10-19) ===
        /// Permission to view a channel
        const VIEW_CHANNEL             = 1 << 10;
        /// Permission to send messages
        const SEND_MESSAGES            = 1 << 11;
        const SEND_TTS_MESSAGES        = 1 << 12;
        /// Permission to delete messages from other members
        const MANAGE_MESSAGES          = 1 << 13;
        const EMBED_LINKS              = 1 << 14;
        const ATTACH_FILES             = 1 << 15;
        const READ_MESSAGE_HISTORY     = 1 << 16;
        /// Permission to mention @everyone and @here
        const MENTION_EVERYONE         = 1 << 17;
        const USE_EXTERNAL_EMOJIS      = 1 << 18;
        const VIEW_GUILD_INSIGHTS      = 1 << 19;

        // === Voice (bits 20-25) ===
        const CONNECT                  = 1 << 20;
        const SPEAK                    = 1 << 21;
        const MUTE_MEMBERS             = 1 << 22;
        const DEAFEN_MEMBERS           = 1 << 23;
        const MOVE_MEMBERS             = 1 << 24;
        /// Permission to use voice activity detection
        const USE_VAD                  = 1 << 25;

        // === Management (bits 26-34) ===
        const CHANGE_NICKNAME          = 1 << 26;
        const MANAGE_NICKNAMES         = 1 << 27;
        /// Permission to create, edit, and delete roles below the actor's highest role
        const MANAGE_ROLES             = 1 << 28;
        const MANAGE_WEBHOOKS          = 1 << 29;
        /// Permission to manage emoji, stickers and soundboard sounds
        const MANAGE_GUILD_EXPRESSIONS = 1 << 30;
        const USE_APPLICATION_COMMANDS = 1 << 31;
        const REQUEST_TO_SPEAK         = 1 << 32;
        const MANAGE_EVENTS            = 1 << 33;
        const MANAGE_THREADS           = 1 << 34;

        // === Threads and extras (bits 35-50) ===
        const CREATE_PUBLIC_THREADS    = 1 << 35;
        const CREATE_PRIVATE_THREADS   = 1 << 36;
        const USE_EXTERNAL_STICKERS    = 1 << 37;
        const SEND_MESSAGES_IN_THREADS = 1 << 38;
        const USE_EMBEDDED_ACTIVITIES  = 1 << 39;
        /// Permission to time out members
        const MODERATE_MEMBERS         = 1 << 40;
        const VIEW_CREATOR_MONETIZATION_ANALYTICS = 1 << 41;
        const USE_SOUNDBOARD           = 1 << 42;
        const CREATE_GUILD_EXPRESSIONS = 1 << 43;
        const CREATE_EVENTS            = 1 << 44;
        const USE_EXTERNAL_SOUNDS      = 1 << 45;
        const SEND_VOICE_MESSAGES      = 1 << 46;
        // bit 47 is retired
        const SET_VOICE_CHANNEL_STATUS = 1 << 48;
        const SEND_POLLS               = 1 << 49;
        const USE_EXTERNAL_APPS        = 1 << 50;
    }
}

impl Permissions {
    // === Raw Mask Conversion ===

    /// Create permissions from a raw wire mask.
    ///
    /// Unknown bits are kept so masks from newer platform versions survive
    /// resolution unchanged.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Create permissions from a raw mask, dropping bits with no known flag.
    #[must_use]
    pub const fn from_raw_truncate(raw: u64) -> Self {
        Self::from_bits_truncate(raw)
    }

    /// The raw mask, including any retained unknown bits.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.bits()
    }

    /// Only the bits that map to a known flag.
    #[must_use]
    pub const fn known(self) -> Self {
        self.intersection(Self::all())
    }

    /// Bits that map to no known flag.
    #[must_use]
    pub const fn unknown_bits(self) -> u64 {
        self.bits() & !Self::all().bits()
    }

    /// Union of a collection of flags.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        flags.into_iter().fold(Self::empty(), |acc, flag| acc | flag)
    }

    // === Permission Checking ===

    /// Check if this permission set includes every bit of `permission`.
    ///
    /// # Examples
    ///
    /// ```
    /// use guildcache_perms::permissions::Permissions;
    ///
    /// let perms = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
    /// assert!(perms.has(Permissions::SEND_MESSAGES));
    /// assert!(!perms.has(Permissions::SEND_MESSAGES | Permissions::BAN_MEMBERS));
    /// ```
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<u64> for Permissions {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Permissions> for u64 {
    fn from(perms: Permissions) -> Self {
        perms.to_raw()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

// The wire carries masks as decimal strings since they exceed 53 bits.
impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::snowflake::deserialize_u64(deserializer).map(Self::from_raw)
    }
}
