//! a singly-linked list with a before-first sentinel
//!
//! every element lives in its own heap allocation, owned by the link that
//! points at it. the list itself holds the sentinel link inline together with
//! the element count, so inserting before the first element and inserting
//! after any other element are the same splice.

mod cursor;
mod iter;
mod node;

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ptr::NonNull,
};

pub use cursor::{Cursor, CursorMut};
pub use iter::{IntoIter, Iter, IterMut};

use crate::{Box, Layout};
use cursor::Position;
use node::{Link, Node};

pub type ListResult<T> = Result<T, ListError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// the global allocator could not provide memory for a node
    AllocationFailed(Layout),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed(layout) => write!(
                f,
                "failed to allocate a list node ({} bytes, align {})",
                layout.size(),
                layout.align()
            ),
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(not(feature = "no-std"))] {
        impl std::error::Error for ListError {}
    }
}

/// a singly-linked list of heap allocated nodes
///
/// `len` always equals the number of nodes reachable from `head`, and
/// following `head` exactly `len` times ends at `None`.
pub struct SingleLinkedList<T> {
    /// the sentinel: a link to the first node, or None if the list is empty
    head: Link<T>,
    /// the number of non-sentinel elements in the list
    len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<T> SingleLinkedList<T> {
    /// create an empty list
    pub const fn new() -> Self {
        Self {
            head: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// get the length of the list, not including the sentinel
    pub fn len(&self) -> usize {
        self.len
    }

    /// returns true if the length of the list is 0
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<&T> {
        self.begin().get()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the node is owned by this list, which is exclusively borrowed
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// push a value to the front of the list in O(1)
    pub fn push_front(&mut self, value: T) {
        self.before_begin_mut().insert_after(value);
    }

    /// push a value to the front of the list, reporting an exhausted
    /// allocator instead of aborting. the list is unchanged on error
    pub fn try_push_front(&mut self, value: T) -> ListResult<()> {
        self.before_begin_mut().try_insert_after(value).map(|_| ())
    }

    /// remove the first element and return it, or None if the list is empty
    pub fn pop_front(&mut self) -> Option<T> {
        self.before_begin_mut().remove_after()
    }

    /// drop every element, leaving the list empty
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// exchange the contents of two lists in O(1) without touching any node
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.head, &mut other.head);
        core::mem::swap(&mut self.len, &mut other.len);
    }

    /// reverse the order of the elements in place by relinking the nodes
    pub fn reverse(&mut self) {
        let mut reversed: Link<T> = None;
        let mut remaining = self.head.take();
        while let Some(node) = remaining {
            // SAFETY: the node is owned by this list, which is exclusively borrowed
            let node_ref = unsafe { &mut *node.as_ptr() };
            remaining = core::mem::replace(&mut node_ref.next, reversed);
            reversed = Some(node);
        }
        self.head = reversed;
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|elt| elt == value)
    }

    /// a cursor to the first element, equal to `end()` when the list is empty
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(Position::from_link(self.head))
    }

    /// the terminal cursor, one past the last element
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(Position::End)
    }

    /// a cursor to the sentinel, which precedes the first element
    pub fn before_begin(&self) -> Cursor<'_, T> {
        Cursor::new(Position::BeforeBegin(NonNull::from(&self.head)))
    }

    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        let pos = Position::from_link(self.head);
        CursorMut::new(self, pos)
    }

    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, Position::End)
    }

    /// a read-write cursor to the sentinel. this is the cursor to use for
    /// inserting or erasing at the very front of the list
    pub fn before_begin_mut(&mut self) -> CursorMut<'_, T> {
        let pos = Position::BeforeBegin(NonNull::from(&mut self.head));
        CursorMut::new(self, pos)
    }

    /// return an immutable iterator for this list
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// return a mutable iterator for this list
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }
}

/// exchange the contents of two lists, see `SingleLinkedList::swap`
pub fn swap<T>(lhs: &mut SingleLinkedList<T>, rhs: &mut SingleLinkedList<T>) {
    lhs.swap(rhs);
}

impl<T> Drop for SingleLinkedList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for SingleLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SingleLinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    fn clone_from(&mut self, source: &Self) {
        if core::ptr::eq(self, source) {
            return;
        }
        // build the whole copy first so a panicking `T::clone` leaves `self`
        // as it was; the old nodes go away with `copy`
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> FromIterator<T> for SingleLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for SingleLinkedList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> Extend<T> for SingleLinkedList<T> {
    /// append the values after the current last element, in order
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut cursor = self.before_begin_mut();
        while cursor.peek_next().is_some() {
            cursor.advance();
        }
        for value in iter {
            cursor = cursor.insert_after(value);
        }
    }
}

impl<T> IntoIterator for SingleLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a SingleLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SingleLinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq> PartialEq for SingleLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        // the same first node means the same chain, so skip the values
        if self.begin() == other.begin() {
            return true;
        }
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SingleLinkedList<T> {}

impl<T: PartialOrd> PartialOrd for SingleLinkedList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }

    fn lt(&self, other: &Self) -> bool {
        lexicographically_less(self, other)
    }

    fn gt(&self, other: &Self) -> bool {
        lexicographically_less(other, self)
    }

    fn le(&self, other: &Self) -> bool {
        !lexicographically_less(other, self)
    }

    fn ge(&self, other: &Self) -> bool {
        !lexicographically_less(self, other)
    }
}

/// lexicographic `<` built from element `<` alone. a pair where neither
/// element is less than the other counts as equivalent and the scan goes on,
/// so incomparable elements (NaN) never cut the comparison short
fn lexicographically_less<T: PartialOrd>(
    lhs: &SingleLinkedList<T>,
    rhs: &SingleLinkedList<T>,
) -> bool {
    let mut rhs_iter = rhs.iter();
    for x in lhs {
        let Some(y) = rhs_iter.next() else {
            return false;
        };
        if x < y {
            return true;
        }
        if y < x {
            return false;
        }
    }
    rhs_iter.next().is_some()
}

impl<T: Ord> Ord for SingleLinkedList<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for SingleLinkedList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SingleLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

// SAFETY: the list owns its nodes outright, like `Box<T>` does
unsafe impl<T: Send> Send for SingleLinkedList<T> {}
unsafe impl<T: Sync> Sync for SingleLinkedList<T> {}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};

    use super::*;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            verbose: 1,
            .. Config::default()
        })]

        #[test]
        fn single_linked_list_state_machine_test(
            sequential
            1..200
            =>
            SingleLinkedList<u32>
        );
    }

    /// The possible transitions of the state machine. Positions count cursor
    /// steps from `before_begin`: 0 is the sentinel, `k` is the k-th element.
    #[derive(Clone, Debug)]
    pub enum Transition {
        PushFront(u32),
        PopFront,
        InsertAfter(usize, u32),
        EraseAfter(usize),
        Clear,
        Reverse,
        SwapTwice(Vec<u32>),
        CloneFrom(Vec<u32>),
    }

    pub struct SingleLinkedListStateMachine;

    impl ReferenceStateMachine for SingleLinkedListStateMachine {
        type State = Vec<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(Vec::new()).boxed()
        }

        fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
            let len = state.len();
            let values = proptest::collection::vec(any::<u32>(), 0..8);
            if len == 0 {
                prop_oneof![
                    3 => any::<u32>().prop_map(Transition::PushFront),
                    1 => Just(Transition::PopFront),
                    3 => any::<u32>().prop_map(|v| Transition::InsertAfter(0, v)),
                    1 => Just(Transition::Clear),
                    1 => values.clone().prop_map(Transition::SwapTwice),
                    1 => values.prop_map(Transition::CloneFrom),
                ]
                .boxed()
            } else {
                prop_oneof![
                    3 => any::<u32>().prop_map(Transition::PushFront),
                    2 => Just(Transition::PopFront),
                    4 => (0..=len, any::<u32>()).prop_map(|(at, v)| Transition::InsertAfter(at, v)),
                    3 => (0..len).prop_map(Transition::EraseAfter),
                    1 => Just(Transition::Clear),
                    1 => Just(Transition::Reverse),
                    1 => values.clone().prop_map(Transition::SwapTwice),
                    1 => values.prop_map(Transition::CloneFrom),
                ]
                .boxed()
            }
        }

        fn preconditions(state: &Self::State, transition: &Self::Transition) -> bool {
            match transition {
                Transition::InsertAfter(at, _) => *at <= state.len(),
                Transition::EraseAfter(at) => *at < state.len(),
                _ => true,
            }
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::PushFront(value) => state.insert(0, *value),
                Transition::PopFront => {
                    if !state.is_empty() {
                        state.remove(0);
                    }
                }
                Transition::InsertAfter(at, value) => state.insert(*at, *value),
                Transition::EraseAfter(at) => {
                    state.remove(*at);
                }
                Transition::Clear => state.clear(),
                Transition::Reverse => state.reverse(),
                Transition::SwapTwice(_) => {}
                Transition::CloneFrom(values) => state = values.clone(),
            }
            state
        }
    }

    fn cursor_after_steps(list: &mut SingleLinkedList<u32>, steps: usize) -> CursorMut<'_, u32> {
        let mut cursor = list.before_begin_mut();
        for _ in 0..steps {
            cursor.advance();
        }
        cursor
    }

    impl StateMachineTest for SingleLinkedList<u32> {
        type SystemUnderTest = Self;
        type Reference = SingleLinkedListStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::PushFront(value) => state.push_front(value),
                Transition::PopFront => {
                    state.pop_front();
                }
                Transition::InsertAfter(at, value) => {
                    let cursor = cursor_after_steps(&mut state, at).insert_after(value);
                    assert_eq!(cursor.get(), Some(&value));
                }
                Transition::EraseAfter(at) => {
                    let cursor = cursor_after_steps(&mut state, at);
                    let erases_last = cursor.as_cursor().advance().peek_next().is_none();
                    let cursor = cursor.erase_after();
                    assert_eq!(cursor.is_end(), erases_last);
                }
                Transition::Clear => state.clear(),
                Transition::Reverse => state.reverse(),
                Transition::SwapTwice(values) => {
                    let mut other: SingleLinkedList<u32> = values.iter().copied().collect();
                    swap(&mut state, &mut other);
                    assert!(state.iter().eq(values.iter()));
                    swap(&mut state, &mut other);
                    assert!(other.iter().eq(values.iter()));
                }
                Transition::CloneFrom(values) => {
                    let source: SingleLinkedList<u32> = values.into_iter().collect();
                    state.clone_from(&source);
                    assert_eq!(state, source);
                }
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            assert_eq!(state.len(), ref_state.len());
            assert_eq!(state.iter().count(), state.len());
            assert_eq!(state.is_empty(), state.begin() == state.end());
            assert!(state.iter().eq(ref_state.iter()));

            let mut cursor = state.before_begin();
            for _ in 0..state.len() {
                cursor.advance();
            }
            assert!(cursor.peek_next().is_none());
        }
    }

    proptest! {
        #[test]
        fn clone_is_independent_of_original(
            values in proptest::collection::vec(any::<u8>(), 0..64),
            pushes in proptest::collection::vec(any::<u8>(), 1..16),
        ) {
            let original: SingleLinkedList<u8> = values.iter().copied().collect();
            let mut copy = original.clone();
            prop_assert_eq!(&copy, &original);

            for value in pushes {
                copy.push_front(value);
            }
            for value in copy.iter_mut() {
                *value = value.wrapping_add(1);
            }

            prop_assert!(original.iter().eq(values.iter()));
            prop_assert_ne!(&copy, &original);
        }

        #[test]
        fn ordering_matches_slice_ordering(
            a in proptest::collection::vec(0u8..4, 0..8),
            b in proptest::collection::vec(0u8..4, 0..8),
        ) {
            let la: SingleLinkedList<u8> = a.iter().copied().collect();
            let lb: SingleLinkedList<u8> = b.iter().copied().collect();

            prop_assert_eq!(la.cmp(&lb), a.cmp(&b));
            prop_assert_eq!(la.partial_cmp(&lb), a.partial_cmp(&b));
            prop_assert_eq!(la == lb, a == b);
            prop_assert_eq!(la < lb, a < b);
            prop_assert_eq!(la >= lb, a >= b);
        }

        #[test]
        fn double_swap_restores_original_contents(
            a in proptest::collection::vec(any::<i32>(), 0..16),
            b in proptest::collection::vec(any::<i32>(), 0..16),
        ) {
            let mut la: SingleLinkedList<i32> = a.iter().copied().collect();
            let mut lb: SingleLinkedList<i32> = b.iter().copied().collect();

            swap(&mut la, &mut lb);
            prop_assert!(la.iter().eq(b.iter()));
            prop_assert!(lb.iter().eq(a.iter()));

            swap(&mut la, &mut lb);
            prop_assert!(la.iter().eq(a.iter()));
            prop_assert!(lb.iter().eq(b.iter()));
        }
    }
}

#[cfg(all(not(miri), test))]
mod longform {
    use std::collections::VecDeque;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;
    use rand::Rng;

    use super::*;

    #[derive(Arbitrary, Clone, Copy, Debug)]
    enum Operation {
        PushFront(u16),
        PopFront,
        InsertAfter(u16),
        EraseAfter,
        Reverse,
        Iterate,
    }

    /// a random number of cursor steps from the sentinel, landing on the
    /// sentinel or on an element
    fn random_steps(reference: &VecDeque<u16>, include_last: bool) -> Option<usize> {
        let positions = if include_last {
            reference.len() + 1
        } else {
            reference.len()
        };
        if positions == 0 {
            return None;
        }
        Some(rand::thread_rng().gen_range(0..positions))
    }

    proptest! {
        #[test]
        fn longform(ops in vec(any::<Operation>(), 256)) {
            println!("Executing {} operations against SingleLinkedList", ops.len());

            let mut reference = VecDeque::new();
            let mut ll = SingleLinkedList::new();

            for op in ops.iter() {
                match op {
                    Operation::PushFront(value) => {
                        reference.push_front(*value);
                        ll.push_front(*value);
                    }
                    Operation::PopFront => {
                        assert_eq!(ll.pop_front(), reference.pop_front());
                    }
                    Operation::InsertAfter(value) => {
                        if let Some(steps) = random_steps(&reference, true) {
                            reference.insert(steps, *value);
                            let mut cursor = ll.before_begin_mut();
                            for _ in 0..steps {
                                cursor.advance();
                            }
                            cursor.insert_after(*value);
                        }
                    }
                    Operation::EraseAfter => {
                        if let Some(steps) = random_steps(&reference, false) {
                            let removed = reference.remove(steps);
                            let mut cursor = ll.before_begin_mut();
                            for _ in 0..steps {
                                cursor.advance();
                            }
                            assert_eq!(cursor.remove_after(), removed);
                        }
                    }
                    Operation::Reverse => {
                        reference.make_contiguous().reverse();
                        ll.reverse();
                    }
                    Operation::Iterate => {
                        let mut ref_iter = reference.iter();
                        let mut ll_iter = ll.iter();
                        loop {
                            match (ref_iter.next(), ll_iter.next()) {
                                (Some(ref_next), Some(ll_next)) => assert_eq!(ref_next, ll_next),
                                (Some(ref_next), None) => panic!("Reference iter returned: {:?} but list iter returned None", ref_next),
                                (None, Some(ll_next)) => panic!("List iter returned: {:?} but reference iter returned None", ll_next),
                                (None, None) => break,
                            }
                        }
                    }
                }
                assert_eq!(ll.len(), reference.len());
            }

            println!("Successfully executed {} operations against SingleLinkedList", ops.len());
        }
    }
}

#[cfg(all(not(feature = "no-std"), all(test, feature = "loom")))]
mod loom_tests {
    use loom::sync::Arc;

    use super::*;

    #[test]
    fn list_can_move_to_another_thread() {
        loom::model(|| {
            let ll = SingleLinkedList::from([1u32, 2, 3]);
            let jh = loom::thread::spawn(move || {
                let mut ll = ll;
                ll.push_front(0);
                ll
            });
            let ll = jh.join().expect("failed to join loom thread");
            assert!(ll.iter().copied().eq([0, 1, 2, 3]));
        });
    }

    #[test]
    fn shared_list_can_be_read_concurrently() {
        loom::model(|| {
            let ll = Arc::new(SingleLinkedList::from([4u32, 5, 6, 7]));

            let jhs: Vec<_> = (0..2)
                .map(|_| {
                    let ll = Arc::clone(&ll);
                    loom::thread::spawn(move || ll.iter().sum::<u32>())
                })
                .collect();

            for jh in jhs {
                assert_eq!(jh.join().expect("failed to join loom thread"), 22);
            }
            assert_eq!(ll.len(), 4);
        });
    }
}
