//! Permission system types and utilities.
//!
//! - Roles: lookup, hierarchy order and display color
//! - Resolver: guild permissions and channel overwrite layering

pub mod flags;
pub mod helpers;
pub mod models;
pub mod resolver;
pub mod roles;

pub use flags::Permissions;
pub use helpers::MemberPermissions;
pub use models::*;
pub use resolver::{
    apply_layers, has_permissions, OverwriteLayer, PermissionEngine, PermissionError,
};
pub use roles::RoleResolver;
