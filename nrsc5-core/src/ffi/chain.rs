//! Read-only traversal of engine-owned singly-linked lists.

use std::marker::PhantomData;

use super::raw::{RawSigComponent, RawSigService};

/// A node of a native linked list, terminated by a null `next`.
pub trait ChainNode {
    fn next(&self) -> *const Self;
}

impl ChainNode for RawSigService {
    fn next(&self) -> *const Self {
        self.next
    }
}

impl ChainNode for RawSigComponent {
    fn next(&self) -> *const Self {
        self.next
    }
}

/// Iterator over the nodes of a native list, head to tail.
///
/// Only reads the links; the list stays owned by whoever built it.
pub struct Chain<'a, N: ChainNode> {
    cursor: *const N,
    _marker: PhantomData<&'a N>,
}

impl<'a, N: ChainNode> Chain<'a, N> {
    /// # Safety
    ///
    /// `head` must be null or point to a node whose `next` links form a
    /// null-terminated list of valid nodes, all of which outlive `'a`.
    pub unsafe fn from_head(head: *const N) -> Self {
        Self {
            cursor: head,
            _marker: PhantomData,
        }
    }
}

impl<'a, N: ChainNode> Iterator for Chain<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: guaranteed by the `from_head` contract.
        let node = unsafe { self.cursor.as_ref()? };
        self.cursor = node.next();
        Some(node)
    }
}

/// Why [`flatten_chain`] stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError<E> {
    /// The list had more nodes than the traversal limit allows.
    TooLong { limit: usize },
    /// Decoding a node failed.
    Node(E),
}

/// Decode every node of a native list into an owned `Vec`, preserving order.
///
/// An empty list yields an empty `Vec`. Traversal stops once more than
/// `limit` nodes have been seen, or at the first node `decode` rejects.
///
/// # Safety
///
/// Same contract as [`Chain::from_head`].
pub unsafe fn flatten_chain<N, T, E, F>(
    head: *const N,
    limit: usize,
    mut decode: F,
) -> Result<Vec<T>, ChainError<E>>
where
    N: ChainNode,
    F: FnMut(&N) -> Result<T, E>,
{
    let chain = unsafe { Chain::from_head(head) };
    let mut out = Vec::new();
    for (index, node) in chain.enumerate() {
        if index >= limit {
            return Err(ChainError::TooLong { limit });
        }
        out.push(decode(node).map_err(ChainError::Node)?);
    }
    Ok(out)
}
