//! Device identity: the hardware address of the primary network interface.
//!
//! ## Contents
//! - [`MacAddress`] normalized hardware address
//! - [`IdentityResolver`] async trait returning a [`Lookup`]
//! - [`SysfsIdentity`] reads `/sys/class/net/<iface>/address`
//! - [`FixedIdentity`] fabricated identity (debug mode)

mod mac;
mod resolver;

pub use mac::MacAddress;
pub use resolver::{FixedIdentity, IdentityRef, IdentityResolver, Lookup, SysfsIdentity};
