//! Splay tree: a self-adjusting binary search tree
//!
//! Every `find` and `insert` splays the accessed key (or the last node on its
//! search path) to the root. No balance information is stored; costs are
//! amortized O(log n) over any access sequence.
//!
//! Nodes own their children through `Option<Box<_>>` links and keep no parent
//! pointer. `splay` takes a subtree by value and hands back its new root, and
//! the caller reattaches the result.

use std::cmp::Ordering;
use std::fmt;

type Link<K, V> = Option<Box<Node<K, V>>>;

/// Tree node
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Promote the left child of `node` into its place.
///
/// ```text
///       P          L
///      / \        / \
///     L   c  →   a   P
///    / \            / \
///   a   b          b   c
/// ```
fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.left.take() {
        Some(mut left) => {
            node.left = left.right.take();
            left.right = Some(node);
            left
        }
        None => node,
    }
}

/// Promote the right child of `node` into its place. Mirror of [`rotate_right`].
fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.right.take() {
        Some(mut right) => {
            node.right = right.left.take();
            right.left = Some(node);
            right
        }
        None => node,
    }
}

/// Which grandchild slot a pending [`Frame`] descended into
#[derive(Clone, Copy)]
enum Step {
    /// `key < node.key` and `key < node.left.key`
    LeftLeft,
    /// `key < node.key` and `key > node.left.key`
    LeftRight,
    /// `key > node.key` and `key > node.right.key`
    RightRight,
    /// `key > node.key` and `key < node.right.key`
    RightLeft,
}

/// A splay step waiting for the grandchild subtree to be splayed.
///
/// `child` has already been detached from `node`, and the grandchild on the
/// search path has been detached from `child`.
struct Frame<K, V> {
    node: Box<Node<K, V>>,
    child: Box<Node<K, V>>,
    step: Step,
}

impl<K, V> Frame<K, V> {
    /// Reattach the splayed grandchild `sub` and apply this level's rotations
    fn finish(self, sub: Link<K, V>) -> Box<Node<K, V>> {
        let Frame {
            mut node,
            mut child,
            step,
        } = self;

        match step {
            // zig-zig
            Step::LeftLeft => {
                child.left = sub;
                node.left = Some(child);
                node = rotate_right(node);
                // No-op when the zig-zig step consumed the last left child
                rotate_right(node)
            }
            // zig-zag
            Step::LeftRight => {
                child.right = sub;
                if child.right.is_some() {
                    child = rotate_left(child);
                }
                node.left = Some(child);
                rotate_right(node)
            }
            Step::RightRight => {
                child.right = sub;
                node.right = Some(child);
                node = rotate_left(node);
                rotate_left(node)
            }
            Step::RightLeft => {
                child.left = sub;
                if child.left.is_some() {
                    child = rotate_right(child);
                }
                node.right = Some(child);
                rotate_left(node)
            }
        }
    }
}

/// Restructure `link` so that `key`, or the last node on its search path,
/// becomes the subtree root. Returns the new root.
///
/// Each level splays the grandchild subtree two links down, then rotates
/// twice on the way back up. Pending levels are kept on a heap-allocated
/// stack, so depth is bounded by memory rather than the thread stack.
fn splay<K: Ord, V>(link: Link<K, V>, key: &K) -> Link<K, V> {
    let mut pending: Vec<Frame<K, V>> = Vec::new();
    let mut cursor = link;

    let mut splayed = loop {
        let Some(mut node) = cursor else {
            break None;
        };

        match key.cmp(&node.key) {
            Ordering::Equal => break Some(node),
            Ordering::Less => {
                let Some(mut left) = node.left.take() else {
                    break Some(node);
                };
                match key.cmp(&left.key) {
                    Ordering::Less => {
                        cursor = left.left.take();
                        pending.push(Frame { node, child: left, step: Step::LeftLeft });
                    }
                    Ordering::Greater => {
                        cursor = left.right.take();
                        pending.push(Frame { node, child: left, step: Step::LeftRight });
                    }
                    Ordering::Equal => {
                        node.left = Some(left);
                        break Some(rotate_right(node));
                    }
                }
            }
            Ordering::Greater => {
                let Some(mut right) = node.right.take() else {
                    break Some(node);
                };
                match key.cmp(&right.key) {
                    Ordering::Greater => {
                        cursor = right.right.take();
                        pending.push(Frame { node, child: right, step: Step::RightRight });
                    }
                    Ordering::Less => {
                        cursor = right.left.take();
                        pending.push(Frame { node, child: right, step: Step::RightLeft });
                    }
                    Ordering::Equal => {
                        node.right = Some(right);
                        break Some(rotate_left(node));
                    }
                }
            }
        }
    };

    while let Some(frame) = pending.pop() {
        splayed = Some(frame.finish(splayed));
    }
    splayed
}

/// Ordered map backed by a splay tree
///
/// Lookups take `&mut self` because they reshape the tree. Use
/// [`SplayTree::peek`] or [`SplayTree::iter`] for read-only access.
pub struct SplayTree<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> SplayTree<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of entries in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Key currently stored at the root
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_deref().map(|node| &node.key)
    }

    /// Number of nodes on the longest root-to-leaf path (0 for an empty tree)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }

        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        height
    }

    /// In-order iterator over the entries. Does not restructure the tree.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Keys in pre-order (root first). Does not restructure the tree.
    ///
    /// Two trees holding the same keys have the same shape exactly when
    /// their pre-order key sequences are equal.
    pub fn keys_pre_order(&self) -> impl Iterator<Item = &K> + '_ {
        let mut stack: Vec<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
            Some(&node.key)
        })
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        // Iterative tear-down: a path-shaped tree would overflow the stack
        // through recursive `Box` drops.
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }
}

impl<K: Ord, V> SplayTree<K, V> {
    /// Insert `value` under `key`, overwriting any previous value.
    ///
    /// The tree is splayed on `key` first. A new key becomes the root with
    /// the old root as one of its children.
    pub fn insert(&mut self, key: K, value: V) {
        let Some(mut root) = splay(self.root.take(), &key) else {
            self.root = Some(Node::new(key, value));
            self.len = 1;
            return;
        };

        match key.cmp(&root.key) {
            Ordering::Equal => {
                root.value = value;
                self.root = Some(root);
            }
            Ordering::Less => {
                let mut node = Node::new(key, value);
                node.left = root.left.take();
                node.right = Some(root);
                self.root = Some(node);
                self.len += 1;
            }
            Ordering::Greater => {
                let mut node = Node::new(key, value);
                node.right = root.right.take();
                node.left = Some(root);
                self.root = Some(node);
                self.len += 1;
            }
        }
    }

    /// Look up `key`, splaying it (or its nearest neighbour) to the root.
    ///
    /// The tree changes shape even when the key is absent.
    pub fn find(&mut self, key: &K) -> Option<&V> {
        self.root = splay(self.root.take(), key);
        self.root
            .as_deref()
            .filter(|root| root.key == *key)
            .map(|root| &root.value)
    }

    /// Look up `key` without restructuring the tree
    pub fn peek(&self, key: &K) -> Option<&V> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }
}

impl<K, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for SplayTree<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SplayTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for SplayTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SplayTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V> IntoIterator for &'a SplayTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator returned by [`SplayTree::iter`]
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut cursor: Option<&'a Node<K, V>>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
