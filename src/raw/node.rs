use alloc::string::String;

use super::handle::Handle;

pub(crate) type NodeHandle = Handle<TreeNode>;
pub(crate) type EntryHandle = Handle<ChainEntry>;

/// A tree vertex keyed by one name.
///
/// Every entry reachable from `head` belongs to `name`; the chain is never empty while
/// the node is linked into the tree.
#[derive(Clone, Debug)]
pub(crate) struct TreeNode {
    name: String,
    head: EntryHandle,
    left: Option<NodeHandle>,
    right: Option<NodeHandle>,
}

/// One number in a name's chain, newest first.
#[derive(Clone, Debug)]
pub(crate) struct ChainEntry {
    number: String,
    next: Option<EntryHandle>,
}

impl TreeNode {
    /// Creates a leaf node whose chain starts at `head`.
    pub(crate) fn new(name: String, head: EntryHandle) -> Self {
        Self {
            name,
            head,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn head(&self) -> EntryHandle {
        self.head
    }

    pub(crate) fn set_head(&mut self, head: EntryHandle) {
        self.head = head;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<NodeHandle> {
        self.left
    }

    pub(crate) fn set_left(&mut self, left: Option<NodeHandle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<NodeHandle> {
        self.right
    }

    pub(crate) fn set_right(&mut self, right: Option<NodeHandle>) {
        self.right = right;
    }
}

impl ChainEntry {
    pub(crate) fn new(number: String, next: Option<EntryHandle>) -> Self {
        Self { number, next }
    }

    #[inline]
    pub(crate) fn number(&self) -> &str {
        &self.number
    }

    /// Swaps in a new number and returns the old one.
    pub(crate) fn replace_number(&mut self, number: String) -> String {
        core::mem::replace(&mut self.number, number)
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<EntryHandle> {
        self.next
    }
}
