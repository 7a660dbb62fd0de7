use core::ptr::NonNull;

use super::{ListError, ListResult};
use crate::{allocate, Box, Layout};

/// an owning link to the next node, or None at the end of the chain
pub(super) type Link<T> = Option<NonNull<Node<T>>>;

/// a single heap allocated element cell. a node is exclusively owned by the
/// link that points at it: the list's sentinel link for the first node, the
/// `next` field of its predecessor otherwise
pub(super) struct Node<T> {
    pub(super) value: T,
    pub(super) next: Link<T>,
}

impl<T> Node<T> {
    /// allocate a node holding `value` and linking to `next`. the returned
    /// pointer owns the allocation until it is handed to `into_parts`
    pub(super) fn alloc(value: T, next: Link<T>) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Self { value, next })))
    }

    /// like `alloc`, but reports an exhausted allocator instead of aborting
    pub(super) fn try_alloc(value: T, next: Link<T>) -> ListResult<NonNull<Self>> {
        let layout = Layout::new::<Self>();
        // SAFETY: a node always carries a link, so `layout` is never zero sized
        let raw = unsafe { allocate(layout) }.cast::<Self>();
        let node = NonNull::new(raw).ok_or(ListError::AllocationFailed(layout))?;
        // SAFETY: `node` is a fresh allocation with the layout of `Self`
        unsafe { node.as_ptr().write(Self { value, next }) };
        Ok(node)
    }

    /// free a node, returning its value and the link to its successor
    ///
    /// # Safety
    /// `node` must come from `alloc` or `try_alloc`, must not have been freed
    /// already, and must not be dereferenced through any other link afterwards
    pub(super) unsafe fn into_parts(node: NonNull<Self>) -> (T, Link<T>) {
        // the global allocator backs both `Box::new` and `allocate`, and both
        // used `Layout::new::<Self>()`, so `Box` may take either back
        let Self { value, next } = *Box::from_raw(node.as_ptr());
        (value, next)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alloc_links_to_the_provided_successor() {
        let tail = Node::alloc(2, None);
        let head = Node::alloc(1, Some(tail));

        unsafe {
            let (value, next) = Node::into_parts(head);
            assert_eq!(value, 1);
            assert_eq!(next, Some(tail));

            let (value, next) = Node::into_parts(tail);
            assert_eq!(value, 2);
            assert!(next.is_none());
        }
    }

    #[test]
    fn try_alloc_nodes_can_be_reclaimed() {
        let node = Node::try_alloc(String::from("sentinel-free"), None).expect("failed to alloc");
        let (value, next) = unsafe { Node::into_parts(node) };
        assert_eq!(value, "sentinel-free");
        assert!(next.is_none());
    }
}
