//! Read interfaces over the entity cache.
//!
//! The resolvers never own entities. They only need a guild-scoped
//! `id -> entity` lookup, expressed by [`CacheView`] and [`RoleCache`], so any
//! store (in-memory map, sharded cache, ...) can back them. [`MemoryCache`] is
//! the plain `HashMap` implementation.

use std::collections::HashMap;

use crate::permissions::Role;
use crate::snowflake::Snowflake;

/// Entities addressable by a snowflake.
pub trait Identified {
    fn id(&self) -> Snowflake;
}

/// Read-only id lookup over one cached entity collection.
pub trait CacheView<T> {
    /// Look up an entity, returning `None` if it is not cached.
    fn get_by_id(&self, id: Snowflake) -> Option<&T>;

    /// Number of cached entities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Access to the guild-scoped role views of a cache.
pub trait RoleCache {
    type Roles: CacheView<Role>;

    /// Role view for a guild. `None` means nothing is cached for that guild,
    /// which resolvers treat exactly like an empty view.
    fn roles(&self, guild_id: Snowflake) -> Option<&Self::Roles>;
}

/// `HashMap`-backed [`CacheView`].
#[derive(Debug, Clone)]
pub struct MemoryView<T> {
    entities: HashMap<Snowflake, T>,
}

impl<T> Default for MemoryView<T> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }
}

impl<T: Identified> MemoryView<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity, returning the previous value.
    pub fn insert(&mut self, entity: T) -> Option<T> {
        self.entities.insert(entity.id(), entity)
    }

    pub fn remove(&mut self, id: Snowflake) -> Option<T> {
        self.entities.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.values()
    }
}

impl<T> CacheView<T> for MemoryView<T> {
    fn get_by_id(&self, id: Snowflake) -> Option<&T> {
        self.entities.get(&id)
    }

    fn len(&self) -> usize {
        self.entities.len()
    }
}

impl<T: Identified> FromIterator<T> for MemoryView<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().map(|e| (e.id(), e)).collect(),
        }
    }
}

/// In-memory role cache keyed by guild.
///
/// Mutation requires `&mut self`; share a snapshot across threads behind an
/// `Arc` and swap it out to publish updates.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    roles: HashMap<Snowflake, MemoryView<Role>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a role in its guild's view.
    pub fn insert_role(&mut self, role: Role) -> Option<Role> {
        tracing::trace!(guild_id = %role.guild_id, role_id = %role.id, "Caching role");
        self.roles.entry(role.guild_id).or_default().insert(role)
    }

    pub fn remove_role(&mut self, guild_id: Snowflake, role_id: Snowflake) -> Option<Role> {
        self.roles.get_mut(&guild_id)?.remove(role_id)
    }

    /// Drop every cached role of a guild.
    pub fn remove_guild(&mut self, guild_id: Snowflake) -> Option<MemoryView<Role>> {
        self.roles.remove(&guild_id)
    }
}

impl RoleCache for MemoryCache {
    type Roles = MemoryView<Role>;

    fn roles(&self, guild_id: Snowflake) -> Option<&Self::Roles> {
        self.roles.get(&guild_id)
    }
}

impl FromIterator<Role> for MemoryCache {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut cache = Self::new();
        for role in iter {
            cache.insert_role(role);
        }
        cache
    }
}
