//! Guild Cache Permissions
//!
//! Effective permission and display color resolution for members of a cached
//! guild. All computations are pure reads over a cache snapshot.

pub mod cache;
pub mod config;
pub mod permissions;
pub mod snowflake;

pub use cache::{CacheView, Identified, MemoryCache, MemoryView, RoleCache};
pub use config::ResolverConfig;
pub use snowflake::{Snowflake, SnowflakeParseError};
