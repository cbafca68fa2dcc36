//! Kernel utilities shared across the `c3dp` crates.
//! Keep this crate lightweight; it re-exports the domain models and the layered settings loader.
//!
//! ## Settings loading
//! ```rust,no_run
//! use c3dp_kernel::config::load_config;
//! use c3dp_kernel::domain::config::ToolConfig;
//!
//! let cfg: ToolConfig = load_config(Some("c3dp.toml")).unwrap_or_default();
//! assert!(cfg.codec.max_depth > 0);
//! ```
pub mod config;

pub use c3dp_domain as domain;
