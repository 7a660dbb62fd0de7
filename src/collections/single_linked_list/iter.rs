use core::{fmt, iter::FusedIterator, marker::PhantomData};

use super::{cursor::Cursor, node::Link, SingleLinkedList};

/// an immutable iterator over the elements of a `SingleLinkedList`
pub struct Iter<'a, T> {
    cursor: Cursor<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(list: &'a SingleLinkedList<T>) -> Self {
        Self {
            cursor: list.begin(),
            remaining: list.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.cursor.get()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// a mutable iterator over the elements of a `SingleLinkedList`
pub struct IterMut<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(list: &'a mut SingleLinkedList<T>) -> Self {
        Self {
            next: list.head,
            remaining: list.len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        // SAFETY: the list is exclusively borrowed for 'a and every node is
        // yielded at most once, so no two `&mut T` alias
        let node = unsafe { &mut *node.as_ptr() };
        self.next = node.next;
        self.remaining -= 1;
        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish()
    }
}

// SAFETY: `IterMut` hands out `&'a mut T`, the same as `core::slice::IterMut`
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// an owning iterator that pops elements off the front of a `SingleLinkedList`
pub struct IntoIter<T> {
    list: SingleLinkedList<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(list: SingleLinkedList<T>) -> Self {
        Self { list }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

#[cfg(test)]
mod iter_tests {
    use super::*;

    #[test]
    fn basic_iter_test() {
        let ll = SingleLinkedList::from([0, 1, 2]);
        let mut iter = ll.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_terminates_properly_single_element() {
        let ll = SingleLinkedList::from([42]);
        let mut count = 0;
        for _ in ll.iter() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn iter_on_empty_list_yields_nothing() {
        let ll = SingleLinkedList::<u32>::new();
        assert_eq!(ll.iter().next(), None);
        assert_eq!(ll.iter().size_hint(), (0, Some(0)));
    }

    #[test]
    fn cloned_iter_resumes_from_same_place() {
        let ll = SingleLinkedList::from([1, 2, 3]);
        let mut iter = ll.iter();
        iter.next();
        let copy = iter.clone();
        assert!(iter.eq(copy));
    }

    #[test]
    fn basic_iter_mut_test() {
        let mut ll = SingleLinkedList::from([0, 1, 2]);
        for value in ll.iter_mut() {
            *value *= 10;
        }
        assert!(ll.iter().copied().eq([0, 10, 20]));
    }

    #[test]
    fn iter_mut_terminates_properly_multi_element() {
        let mut ll = SingleLinkedList::from([1, 2, 3, 4]);
        let iter = ll.iter_mut();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.count(), 4);
    }

    #[test]
    fn into_iter_yields_owned_values_in_order() {
        let ll = SingleLinkedList::from([String::from("a"), String::from("b")]);
        let mut iter = ll.into_iter();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(iter.next().as_deref(), Some("b"));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn partially_consumed_into_iter_releases_the_rest() {
        let ll = SingleLinkedList::from([vec![1], vec![2], vec![3]]);
        let mut iter = ll.into_iter();
        assert_eq!(iter.next(), Some(vec![1]));
        drop(iter);
    }

    #[test]
    fn iterators_debug_format() {
        let mut ll = SingleLinkedList::from([1, 2]);
        assert_eq!(format!("{:?}", ll.iter()), "[1, 2]");
        assert_eq!(format!("{:?}", ll.iter_mut()), "IterMut { remaining: 2 }");
        assert_eq!(format!("{:?}", ll.into_iter()), "IntoIter([1, 2])");
    }
}
