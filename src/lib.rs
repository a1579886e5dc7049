//! A name to phone number directory on an unbalanced binary search tree.
//!
//! [`Directory`] keeps its entries ordered by name. Inserting a name that is already
//! present chains the new number in front of the old ones instead of replacing them, so
//! one name can carry several numbers:
//!
//! - [`insert`](Directory::insert) - Add a number, chaining duplicates newest first
//! - [`exists`](Directory::exists) / [`lookup_number`](Directory::lookup_number) - Point queries by name
//! - [`lookup_name`](Directory::lookup_name) - Reverse query descending by number
//! - [`update`](Directory::update) - Replace the newest number of a name
//! - [`remove`](Directory::remove) - Drop a name and all of its numbers
//! - [`iter`](Directory::iter) / [`search`](Directory::search) - Ordered traversal, optionally by substring
//!
//! # Example
//!
//! ```
//! use phone_tree::Directory;
//!
//! let mut directory = Directory::new();
//! directory.insert("abc", "1234567890").unwrap();
//! directory.insert("def", "6942012345").unwrap();
//! directory.insert("abc", "5550000000").unwrap();
//!
//! assert!(directory.exists("def"));
//! assert_eq!(directory.lookup_number("abc"), Some("5550000000"));
//!
//! let all: Vec<_> = directory.iter().collect();
//! assert_eq!(all, [("abc", "5550000000"), ("abc", "1234567890"), ("def", "6942012345")]);
//! ```
//!
//! # Implementation
//!
//! Nodes and chain entries live in two slot arenas and link to each other through
//! non-zero handles. The tree is deliberately left unbalanced: its shape depends only on
//! insertion order, and removing a name touches nothing but the links around its node.
//! Names and numbers are checked against [`Limits`] before anything is stored.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod limits;
mod raw;

pub mod directory;

pub use directory::Directory;
pub use error::{Error, Result};
pub use limits::{DEFAULT_NAME_CAPACITY, DEFAULT_NUMBER_CAPACITY, Field, Limits};
