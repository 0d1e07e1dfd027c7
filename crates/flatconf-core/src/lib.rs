//! flatconf-core: Flat key-value configuration with variable interpolation
//!
//! This crate loads line-oriented `key = value` configuration text into a
//! [`Store`] and expands `$name` / `${name}` references between entries when
//! values are read.
//!
//! # Example
//!
//! ```rust
//! use flatconf_core::Store;
//!
//! let text = r#"
//! # database settings
//! db.host = localhost
//! port = 5432
//! dsn = postgres://${port}@$port
//! replicas = a, b ,c
//! "#;
//!
//! let store = Store::from_text(text, Default::default());
//! assert_eq!(store.get_int("port", 0), 5432);
//! assert_eq!(store.get("dsn").as_deref(), Some("postgres://5432@5432"));
//! assert_eq!(store.get_list("replicas").unwrap(), vec!["a", "b", "c"]);
//! ```

pub mod error;
pub mod interpolation;
pub mod line;
pub mod numeric;
pub mod source;

mod store;

pub use error::{Error, ErrorKind, Result};
pub use interpolation::Lookup;
pub use store::{split_list, Store, StoreOptions, DEFAULT_RECURSION_LEVEL, LIST_SEPARATOR};
