mod arena;
mod handle;
mod node;
mod raw_directory;

pub(crate) use node::{EntryHandle, NodeHandle};
pub(crate) use raw_directory::RawDirectory;
