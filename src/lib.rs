#![cfg_attr(all(feature = "no-std", not(test)), no_std)]

//! a generic singly-linked list with a before-first sentinel, forward
//! cursors and value semantics (clone, equality, lexicographic ordering)
//!
//! ```
//! use single_linked_list::SingleLinkedList;
//!
//! let mut list = SingleLinkedList::from([1, 2, 3]);
//! list.push_front(0);
//!
//! let cursor = list.before_begin_mut().insert_after(-1);
//! assert_eq!(cursor.get(), Some(&-1));
//!
//! assert!(list.iter().copied().eq([-1, 0, 1, 2, 3]));
//! ```
//!
//! The list does no internal synchronization. Mutation always needs `&mut`,
//! so sharing a list between threads (when `T: Sync`) only ever allows reads;
//! anything else is the caller's job.

cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        extern crate alloc;

        pub(crate) use alloc::alloc::{alloc as allocate, Layout};
        pub(crate) use alloc::boxed::Box;
    } else {
        pub(crate) use std::alloc::{alloc as allocate, Layout};
        pub(crate) use std::boxed::Box;
    }
}

pub mod collections;

pub use collections::single_linked_list::{
    swap, Cursor, CursorMut, IntoIter, Iter, IterMut, ListError, ListResult, SingleLinkedList,
};
