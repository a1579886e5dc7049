use alloc::string::String;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;
use tracing::debug;

use crate::error::Result;
use crate::limits::Limits;
use crate::raw::{EntryHandle, NodeHandle, RawDirectory};

mod capacity;

/// A directory of names and phone numbers, ordered by name.
///
/// Names are kept in an unbalanced [binary search tree] compared byte by byte. Inserting
/// a name that is already present never fails: the new number is chained in front of
/// the existing ones, so each name owns a newest-first list of numbers. The first
/// number in that list, the *head*, is the one that [`lookup_number`] returns and
/// [`update`] replaces.
///
/// The tree is never rebalanced. Inserting names in sorted order produces a tree whose
/// height equals the number of names, and every operation is O(height).
///
/// # Examples
///
/// ```
/// use phone_tree::Directory;
///
/// let mut directory = Directory::new();
/// directory.insert("abc", "1234567890").unwrap();
/// directory.insert("def", "6942012345").unwrap();
/// directory.insert("ghi", "0987654321").unwrap();
///
/// assert_eq!(directory.update("abc", "9999999999").unwrap().as_deref(), Some("1234567890"));
/// assert_eq!(directory.remove("def"), 1);
///
/// let entries: Vec<_> = directory.iter().collect();
/// assert_eq!(entries, [("abc", "9999999999"), ("ghi", "0987654321")]);
/// ```
///
/// Duplicate names chain their numbers, newest first:
///
/// ```
/// use phone_tree::Directory;
///
/// let mut directory = Directory::new();
/// directory.insert("ann", "111").unwrap();
/// directory.insert("ann", "222").unwrap();
///
/// assert_eq!(directory.lookup_number("ann"), Some("222"));
/// assert_eq!(directory.numbers("ann").collect::<Vec<_>>(), ["222", "111"]);
/// assert_eq!(directory.len(), 2);
/// assert_eq!(directory.node_count(), 1);
/// ```
///
/// [binary search tree]: https://en.wikipedia.org/wiki/Binary_search_tree
/// [`lookup_number`]: Directory::lookup_number
/// [`update`]: Directory::update
#[derive(Clone)]
pub struct Directory {
    raw: RawDirectory,
    limits: Limits,
}

/// An iterator over every entry of a [`Directory`], in name order.
///
/// Entries sharing a name are yielded together, head first. This `struct` is created by
/// [`Directory::iter`].
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a> {
    tree: &'a RawDirectory,
    // Nodes whose left subtree has been visited but which have not been yielded yet.
    stack: SmallVec<[NodeHandle; 16]>,
    // Name of the node being yielded and its next entry.
    chain: Option<(&'a str, EntryHandle)>,
    remaining: usize,
}

/// An iterator over the entries whose name contains a fragment.
///
/// This `struct` is created by [`Directory::search`].
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Search<'a> {
    inner: Iter<'a>,
    fragment: &'a str,
}

/// An iterator over the numbers chained under one name, newest first.
///
/// This `struct` is created by [`Directory::numbers`].
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Numbers<'a> {
    tree: &'a RawDirectory,
    next: Option<EntryHandle>,
}

impl Directory {
    /// Makes a new, empty `Directory` with the default [`Limits`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let directory = Directory::new();
    /// assert!(directory.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Makes a new, empty `Directory` that accepts names and numbers up to `limits`.
    #[must_use]
    pub const fn with_limits(limits: Limits) -> Self {
        Self {
            raw: RawDirectory::new(),
            limits,
        }
    }

    /// Returns the field limits this directory enforces.
    #[must_use]
    pub const fn limits(&self) -> Limits {
        self.limits
    }

    /// Returns the number of entries, counting every number of a chained name.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the directory holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// An empty directory has height 0. Since the tree is not balanced this ranges from
    /// about log2(n) up to [`node_count`](Directory::node_count).
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let mut directory = Directory::new();
    /// for name in ["a", "b", "c", "d"] {
    ///     directory.insert(name, "0").unwrap();
    /// }
    /// assert_eq!(directory.height(), 4);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Adds `number` under `name`.
    ///
    /// If `name` is already present the new number becomes the head of its chain and the
    /// previous numbers follow it.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`](crate::Error::Empty) if `name` or `number` is empty.
    /// - [`Error::CapacityExceeded`](crate::Error::CapacityExceeded) if either is longer
    ///   than this directory's [`Limits`].
    /// - [`Error::AllocationFailure`](crate::Error::AllocationFailure) if storage for
    ///   the entry cannot be allocated.
    ///
    /// The directory is unchanged when an error is returned.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn insert(&mut self, name: &str, number: &str) -> Result<()> {
        self.limits.check_name(name).and_then(|()| self.limits.check_number(number)).inspect_err(|error| {
            debug!(%error, "rejected insert");
        })?;
        self.raw.insert(name, number)
    }

    /// Returns true if `name` is in the directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("bob", "555").unwrap();
    /// assert!(directory.exists("bob"));
    /// assert!(!directory.exists("bo"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.raw.search(name).is_some()
    }

    /// Returns the head number of `name`, the one inserted most recently.
    ///
    /// # Complexity
    ///
    /// O(height)
    #[must_use]
    pub fn lookup_number(&self, name: &str) -> Option<&str> {
        self.raw.head_number(name)
    }

    /// Returns the name whose head number is `number`, searching as if the tree were
    /// ordered by number.
    ///
    /// The tree is ordered by name, so the descent compares `number` against each
    /// visited head number and turns left or right accordingly. It finds the entry only
    /// if name order and number order agree along the way; otherwise it returns `None`
    /// even though the number is stored. Numbers behind the head of a chain are never
    /// found. Use [`find_name_by_number`](Directory::find_name_by_number) for a search
    /// that always finds a stored number.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("m", "5").unwrap();
    /// directory.insert("a", "1").unwrap();
    /// directory.insert("z", "2").unwrap();
    ///
    /// assert_eq!(directory.lookup_name("1"), Some("a"));
    /// // "z" sorts after "m" but "2" sorts before "5": the descent goes the wrong way.
    /// assert_eq!(directory.lookup_name("2"), None);
    /// assert_eq!(directory.find_name_by_number("2"), Some("z"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    #[must_use]
    pub fn lookup_name(&self, number: &str) -> Option<&str> {
        let handle = self.raw.search_by_head_number(number)?;
        Some(self.raw.node(handle).name())
    }

    /// Returns the name of the first entry, in name order, whose number is `number`.
    ///
    /// Unlike [`lookup_name`](Directory::lookup_name) this visits every entry,
    /// including those behind the head of a chain.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn find_name_by_number(&self, number: &str) -> Option<&str> {
        self.iter().find_map(|(name, stored)| (stored == number).then_some(name))
    }

    /// Replaces the head number of `name` with `number` and returns the number it
    /// replaced, or `None` if `name` is not present.
    ///
    /// Numbers behind the head of the chain are not touched.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`](crate::Error::Empty) or
    /// [`Error::CapacityExceeded`](crate::Error::CapacityExceeded) if `name` or
    /// `number` does not fit this directory's [`Limits`]. The directory is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("n", "A").unwrap();
    /// directory.insert("n", "B").unwrap();
    ///
    /// assert_eq!(directory.update("n", "C").unwrap().as_deref(), Some("B"));
    /// assert_eq!(directory.numbers("n").collect::<Vec<_>>(), ["C", "A"]);
    /// assert_eq!(directory.update("x", "C").unwrap(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn update(&mut self, name: &str, number: &str) -> Result<Option<String>> {
        self.limits.check_name(name).and_then(|()| self.limits.check_number(number)).inspect_err(|error| {
            debug!(%error, "rejected update");
        })?;
        Ok(self.raw.replace_head_number(name, String::from(number)))
    }

    /// Removes `name` together with every number chained under it.
    ///
    /// Returns how many entries were removed; 0 if `name` was not present, in which case
    /// nothing changes. The rest of the tree keeps its shape, except that a removed name
    /// with two subtrees is replaced by the next name in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("n", "1").unwrap();
    /// directory.insert("n", "2").unwrap();
    ///
    /// assert_eq!(directory.remove("n"), 2);
    /// assert!(!directory.exists("n"));
    /// assert_eq!(directory.remove("n"), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height + chain length)
    pub fn remove(&mut self, name: &str) -> usize {
        self.raw.remove(name)
    }

    /// Removes every entry.
    ///
    /// Calling this on an empty directory does nothing.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator over every entry as `(name, number)`, sorted by name.
    ///
    /// A name with several numbers yields all of them in a row, head first. Each call
    /// starts a fresh traversal.
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the entries whose name contains `fragment`, in the same
    /// order as [`iter`](Directory::iter).
    ///
    /// Matching is case-sensitive and exact; an empty fragment matches every entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let mut directory = Directory::new();
    /// directory.insert("uABC", "1").unwrap();
    /// directory.insert("uDEF", "2").unwrap();
    /// directory.insert("xBCx", "3").unwrap();
    ///
    /// let hits: Vec<_> = directory.search("BC").collect();
    /// assert_eq!(hits, [("uABC", "1"), ("xBCx", "3")]);
    /// assert_eq!(directory.search("bc").count(), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n * fragment length)
    pub fn search<'a>(&'a self, fragment: &'a str) -> Search<'a> {
        Search {
            inner: self.iter(),
            fragment,
        }
    }

    /// Gets an iterator over every number chained under `name`, newest first.
    ///
    /// The iterator is empty if `name` is not present.
    ///
    /// # Complexity
    ///
    /// O(height) to create the iterator; O(1) per step.
    pub fn numbers(&self, name: &str) -> Numbers<'_> {
        Numbers {
            tree: &self.raw,
            next: self.raw.search(name).map(|handle| self.raw.node(handle).head()),
        }
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Two directories are equal when they yield the same entries in the same order.
///
/// Tree shape and limits are not compared.
impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Directory {}

impl<'a> IntoIterator for &'a Directory {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a> Iter<'a> {
    fn new(tree: &'a RawDirectory) -> Self {
        let mut iter = Iter {
            tree,
            stack: SmallVec::new(),
            chain: None,
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<NodeHandle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).left();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;

        let (name, handle) = match self.chain {
            Some(chain) => chain,
            None => {
                let node = tree.node(self.stack.pop()?);
                self.push_left_spine(node.right());
                (node.name(), node.head())
            }
        };

        let entry = tree.entry(handle);
        self.chain = entry.next().map(|next| (name, next));
        self.remaining -= 1;
        Some((name, entry.number()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<'a> Iterator for Search<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let fragment = self.fragment;
        self.inner.find(|(name, _)| name.contains(fragment))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}

impl FusedIterator for Search<'_> {}

impl fmt::Debug for Search<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search").field("fragment", &self.fragment).finish_non_exhaustive()
    }
}

impl<'a> Iterator for Numbers<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let entry = self.tree.entry(self.next?);
        self.next = entry.next();
        Some(entry.number())
    }
}

impl FusedIterator for Numbers<'_> {}

impl fmt::Debug for Numbers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
