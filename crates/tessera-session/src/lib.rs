//! Server-side session storage with recency-ordered expiry.
//!
//! This crate provides the session lifecycle engine behind Tessera:
//! - [`SessionStore`]: one client's key/value bag, identified by an opaque token
//! - [`Provider`]: the storage contract, with [`MemoryProvider`] as the in-memory backend
//! - [`ProviderRegistry`]: explicit name-to-provider mapping built at startup
//! - [`Manager`]: correlates request tokens to stores and drives periodic GC
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_session::{Manager, ManagerConfig, ProviderRegistry};
//!
//! let registry = ProviderRegistry::with_memory();
//! let manager = Manager::from_config(&registry, &ManagerConfig::default())?;
//!
//! let (session, cookie) = manager.correlate(None)?;
//! session.set("countnum", 1);
//! ```

mod config;
mod cookie;
mod error;
mod gc;
mod manager;
mod memory;
mod provider;
mod store;
mod token;
mod value;

pub use config::{DEFAULT_COOKIE_NAME, DEFAULT_MAX_LIFETIME, DEFAULT_PROVIDER, ManagerConfig};
pub use cookie::SessionCookie;
pub use error::{Error, Result};
pub use gc::spawn_gc_task;
pub use manager::Manager;
pub use memory::MemoryProvider;
pub use provider::{Provider, ProviderRegistry};
pub use store::SessionStore;
pub use token::generate_token;
pub use value::SessionValue;
