use alloc::string::String;
use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::arena::Arena;
use super::node::{ChainEntry, EntryHandle, NodeHandle, TreeNode};
use crate::error::Result;

/// The unbalanced binary search tree backing `Directory`.
#[derive(Clone)]
pub(crate) struct RawDirectory {
    /// Arena storing all tree nodes.
    nodes: Arena<TreeNode>,
    /// Arena storing every chain entry of every node.
    entries: Arena<ChainEntry>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<NodeHandle>,
    /// Total number of entries across all chains.
    len: usize,
}

/// The child slot a subtree hangs from.
#[derive(Clone, Copy, Debug)]
enum Link {
    Root,
    Left(NodeHandle),
    Right(NodeHandle),
}

impl RawDirectory {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new("nodes"),
            entries: Arena::new("entries"),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` entries before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity("nodes", capacity),
            entries: Arena::with_capacity("entries", capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no entries.
    pub(crate) const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct names (nodes) in the tree.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the entry capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.entries.reserve(additional);
    }

    pub(crate) fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    pub(crate) fn node(&self, handle: NodeHandle) -> &TreeNode {
        self.nodes.get(handle)
    }

    pub(crate) fn entry(&self, handle: EntryHandle) -> &ChainEntry {
        self.entries.get(handle)
    }

    /// Releases every node and entry.
    pub(crate) fn clear(&mut self) {
        if self.root.is_some() {
            debug!(nodes = self.nodes.len(), entries = self.len, "clearing directory");
        }
        self.nodes.clear();
        self.entries.clear();
        self.root = None;
        self.len = 0;
    }

    /// Finds the node holding `name`.
    pub(crate) fn search(&self, name: &str) -> Option<NodeHandle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match name.cmp(node.name()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Returns the head number of `name`'s chain.
    pub(crate) fn head_number(&self, name: &str) -> Option<&str> {
        let node = self.nodes.get(self.search(name)?);
        Some(self.entries.get(node.head()).number())
    }

    /// Descends the tree ordering by head numbers instead of names.
    ///
    /// The tree is ordered by name, so this only reaches a node when every comparison
    /// on the way agrees with the name order.
    pub(crate) fn search_by_head_number(&self, number: &str) -> Option<NodeHandle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match number.cmp(self.entries.get(node.head()).number()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Inserts `number` under `name`, chaining it in front of any existing entries.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if either arena cannot grow; the tree is unchanged.
    pub(crate) fn insert(&mut self, name: &str, number: &str) -> Result<()> {
        let mut link = Link::Root;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match name.cmp(node.name()) {
                Ordering::Equal => return self.push_front(handle, number),
                Ordering::Less => {
                    link = Link::Left(handle);
                    current = node.left();
                }
                Ordering::Greater => {
                    link = Link::Right(handle);
                    current = node.right();
                }
            }
        }

        let head = self.entries.try_alloc(ChainEntry::new(String::from(number), None))?;
        let node = match self.nodes.try_alloc(TreeNode::new(String::from(name), head)) {
            Ok(node) => node,
            Err(error) => {
                self.entries.take(head);
                return Err(error);
            }
        };
        self.set_link(link, Some(node));
        self.len += 1;

        debug!(name, ?link, "allocated node");
        Ok(())
    }

    /// Makes a new entry the head of `handle`'s chain.
    fn push_front(&mut self, handle: NodeHandle, number: &str) -> Result<()> {
        let old_head = self.nodes.get(handle).head();
        let new_head = self.entries.try_alloc(ChainEntry::new(String::from(number), Some(old_head)))?;
        let node = self.nodes.get_mut(handle);
        node.set_head(new_head);
        self.len += 1;

        trace!(name = node.name(), "chained duplicate name");
        Ok(())
    }

    /// Replaces the head number of `name`'s chain, returning the previous number.
    pub(crate) fn replace_head_number(&mut self, name: &str, number: String) -> Option<String> {
        let head = self.nodes.get(self.search(name)?).head();
        let old = self.entries.get_mut(head).replace_number(number);
        trace!(name, "replaced head number");
        Some(old)
    }

    /// Removes `name` and its whole chain, returning how many entries were freed.
    ///
    /// The node's slot is taken by its only child, or by its in-order successor when it
    /// has two. All other links are left as they were.
    pub(crate) fn remove(&mut self, name: &str) -> usize {
        let mut link = Link::Root;
        let mut current = self.root;

        let target = loop {
            let Some(handle) = current else {
                trace!(name, "remove of absent name");
                return 0;
            };
            let node = self.nodes.get(handle);
            match name.cmp(node.name()) {
                Ordering::Equal => break handle,
                Ordering::Less => {
                    link = Link::Left(handle);
                    current = node.left();
                }
                Ordering::Greater => {
                    link = Link::Right(handle);
                    current = node.right();
                }
            }
        };

        let node = self.nodes.take(target);
        let replacement = self.excise(node.left(), node.right());
        self.set_link(link, replacement);

        let freed = self.free_chain(node.head());
        self.len -= freed;

        debug!(name, freed, ?replacement, "excised node");
        freed
    }

    /// Joins the two subtrees of a removed node into one.
    fn excise(&mut self, left: Option<NodeHandle>, right: Option<NodeHandle>) -> Option<NodeHandle> {
        let (Some(left), Some(right)) = (left, right) else {
            return left.or(right);
        };

        // Walk to the minimum of the right subtree.
        let mut parent = None;
        let mut successor = right;
        while let Some(next) = self.nodes.get(successor).left() {
            parent = Some(successor);
            successor = next;
        }

        if let Some(parent) = parent {
            let orphan = self.nodes.get(successor).right();
            self.nodes.get_mut(parent).set_left(orphan);
            self.nodes.get_mut(successor).set_right(Some(right));
        }
        self.nodes.get_mut(successor).set_left(Some(left));
        Some(successor)
    }

    /// Frees every entry from `head` onwards.
    fn free_chain(&mut self, head: EntryHandle) -> usize {
        let mut freed = 0;
        let mut current = Some(head);
        while let Some(handle) = current {
            current = self.entries.take(handle).next();
            freed += 1;
        }
        freed
    }

    fn set_link(&mut self, link: Link, child: Option<NodeHandle>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.nodes.get_mut(parent).set_left(child),
            Link::Right(parent) => self.nodes.get_mut(parent).set_right(child),
        }
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: SmallVec<[(NodeHandle, usize); 16]> = SmallVec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend(node.left().into_iter().chain(node.right()).map(|child| (child, depth + 1)));
        }
        height
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
impl RawDirectory {
    /// Walks the whole tree and panics if any structural invariant is broken.
    pub(crate) fn check_invariants(&self) {
        let mut entries = 0;
        let mut nodes = 0;
        let mut previous: Option<&str> = None;
        let mut stack: alloc::vec::Vec<NodeHandle> = alloc::vec::Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left();
            }
            let handle = stack.pop().unwrap();
            let node = self.nodes.get(handle);
            if let Some(previous) = previous {
                assert!(previous < node.name(), "names out of order: {previous:?} !< {:?}", node.name());
            }
            previous = Some(node.name());
            nodes += 1;

            let mut chain = Some(node.head());
            while let Some(entry) = chain {
                entries += 1;
                chain = self.entries.get(entry).next();
            }
            current = node.right();
        }

        assert_eq!(nodes, self.nodes.len(), "unreachable nodes in arena");
        assert_eq!(entries, self.len, "entry count out of sync");
        assert_eq!(entries, self.entries.len(), "unreachable entries in arena");
        assert_eq!(self.root.is_none(), self.nodes.is_empty());
        assert_eq!(self.root.is_none(), self.entries.is_empty());
    }

    fn names_in_order(&self) -> alloc::vec::Vec<&str> {
        fn walk<'a>(tree: &'a RawDirectory, subtree: Option<NodeHandle>, out: &mut alloc::vec::Vec<&'a str>) {
            if let Some(handle) = subtree {
                let node = tree.node(handle);
                walk(tree, node.left(), out);
                out.push(node.name());
                walk(tree, node.right(), out);
            }
        }
        let mut out = alloc::vec::Vec::new();
        walk(self, self.root, &mut out);
        out
    }
}
