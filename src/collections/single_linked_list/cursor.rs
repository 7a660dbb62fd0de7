use core::{fmt, marker::PhantomData, ptr::NonNull};

use super::{
    node::{Link, Node},
    ListResult, SingleLinkedList,
};

/// where a cursor points: the sentinel link of a list, a real node, or the
/// terminal position past the last node
pub(super) enum Position<T> {
    BeforeBegin(NonNull<Link<T>>),
    Node(NonNull<Node<T>>),
    End,
}

impl<T> Position<T> {
    /// the position a link leads to
    pub(super) fn from_link(link: Link<T>) -> Self {
        match link {
            Some(node) => Self::Node(node),
            None => Self::End,
        }
    }
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::BeforeBegin(a), Self::BeforeBegin(b)) => a == b,
            (Self::Node(a), Self::Node(b)) => a == b,
            (Self::End, Self::End) => true,
            _ => false,
        }
    }
}

impl<T> Eq for Position<T> {}

impl<T> fmt::Debug for Position<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeBegin(link) => f.debug_tuple("BeforeBegin").field(link).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::End => f.write_str("End"),
        }
    }
}

/// a read-only, forward-only position in a `SingleLinkedList`
///
/// a `Cursor` is just a position, so it is `Copy`. it points at the sentinel
/// (`before_begin`), at an element, or at the terminal position (`end`); only
/// elements can be read. `Cursor::default()` is terminal.
pub struct Cursor<'a, T> {
    pos: Position<T>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(pos: Position<T>) -> Self {
        Self {
            pos,
            _marker: PhantomData,
        }
    }

    /// the element under the cursor, or None on the sentinel or at the end
    pub fn get(&self) -> Option<&'a T> {
        match self.pos {
            // SAFETY: the list is immutably borrowed for 'a, so the node is alive
            Position::Node(node) => Some(unsafe { &(*node.as_ptr()).value }),
            Position::BeforeBegin(_) | Position::End => None,
        }
    }

    /// the element right after the cursor, if there is one
    pub fn peek_next(&self) -> Option<&'a T> {
        let mut next = *self;
        if next.is_end() {
            return None;
        }
        next.advance().get()
    }

    pub fn is_before_begin(&self) -> bool {
        matches!(self.pos, Position::BeforeBegin(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self.pos, Position::End)
    }

    /// move the cursor forward one element
    ///
    /// the terminal cursor has nowhere to go: advancing it is a caller bug
    /// caught by a debug assertion, and a no-op in release builds
    pub fn advance(&mut self) -> &mut Self {
        debug_assert!(!self.is_end(), "advanced a cursor past the end of the list");
        self.pos = match self.pos {
            // SAFETY: the sentinel belongs to a list borrowed for 'a
            Position::BeforeBegin(link) => Position::from_link(unsafe { *link.as_ptr() }),
            // SAFETY: the node belongs to a list borrowed for 'a
            Position::Node(node) => Position::from_link(unsafe { (*node.as_ptr()).next }),
            Position::End => Position::End,
        };
        self
    }

    /// advance, handing back where the cursor was before
    pub fn advance_and_return_previous(&mut self) -> Self {
        let previous = *self;
        self.advance();
        previous
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> Default for Cursor<'_, T> {
    fn default() -> Self {
        Self::new(Position::End)
    }
}

impl<'b, T> PartialEq<Cursor<'b, T>> for Cursor<'_, T> {
    fn eq(&self, other: &Cursor<'b, T>) -> bool {
        self.pos == other.pos
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<'b, T> PartialEq<CursorMut<'b, T>> for Cursor<'_, T> {
    fn eq(&self, other: &CursorMut<'b, T>) -> bool {
        self.pos == other.pos
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.pos).finish()
    }
}

// SAFETY: a `Cursor` only ever hands out `&T`, exactly like `&'a T`
unsafe impl<T: Sync> Send for Cursor<'_, T> {}
unsafe impl<T: Sync> Sync for Cursor<'_, T> {}

/// a read-write, forward-only position in a `SingleLinkedList`
///
/// a `CursorMut` holds the list exclusively, which is what allows it to
/// splice nodes in and out after its position. it converts to a read-only
/// `Cursor` with `as_cursor`/`into_cursor`, never the other way around.
pub struct CursorMut<'a, T> {
    list: &'a mut SingleLinkedList<T>,
    pos: Position<T>,
}

impl<'a, T> CursorMut<'a, T> {
    pub(super) fn new(list: &'a mut SingleLinkedList<T>, pos: Position<T>) -> Self {
        Self { list, pos }
    }

    /// the element under the cursor, or None on the sentinel or at the end
    pub fn get(&self) -> Option<&T> {
        match self.pos {
            // SAFETY: the node belongs to `self.list`, borrowed by this cursor
            Position::Node(node) => Some(unsafe { &(*node.as_ptr()).value }),
            Position::BeforeBegin(_) | Position::End => None,
        }
    }

    /// mutably borrow the element under the cursor, or None on the sentinel
    /// or at the end
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self.pos {
            // SAFETY: the list is exclusively borrowed by this cursor
            Position::Node(node) => Some(unsafe { &mut (*node.as_ptr()).value }),
            Position::BeforeBegin(_) | Position::End => None,
        }
    }

    /// the element right after the cursor, if there is one
    pub fn peek_next(&self) -> Option<&T> {
        // SAFETY: the node belongs to `self.list`, borrowed by this cursor
        self.next_link()
            .flatten()
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    pub fn is_before_begin(&self) -> bool {
        matches!(self.pos, Position::BeforeBegin(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self.pos, Position::End)
    }

    /// move the cursor forward one element
    ///
    /// advancing the terminal cursor is a caller bug caught by a debug
    /// assertion, and a no-op in release builds
    pub fn advance(&mut self) -> &mut Self {
        debug_assert!(!self.is_end(), "advanced a cursor past the end of the list");
        if let Some(next) = self.next_link() {
            self.pos = Position::from_link(next);
        }
        self
    }

    /// advance, handing back a read-only cursor to where this one was before
    pub fn advance_and_return_previous(&mut self) -> Cursor<'_, T> {
        let previous = self.shared_position();
        self.advance();
        Cursor::new(previous)
    }

    /// a read-only view of the current position
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.shared_position())
    }

    /// give up write access, keeping the position
    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.shared_position())
    }

    /// insert `value` right after the cursor, returning a cursor to the new
    /// element
    ///
    /// # Panics
    /// if the cursor is at the end of the list, which has no link to splice
    /// into
    pub fn insert_after(mut self, value: T) -> Self {
        let Some(next) = self.next_link() else {
            panic!("cannot insert after the end of the list");
        };
        let node = Node::alloc(value, next);
        self.attach(node);
        self
    }

    /// like `insert_after`, but an exhausted allocator is reported as
    /// `ListError::AllocationFailed` and the list is left untouched
    ///
    /// # Panics
    /// if the cursor is at the end of the list
    pub fn try_insert_after(mut self, value: T) -> ListResult<Self> {
        let Some(next) = self.next_link() else {
            panic!("cannot insert after the end of the list");
        };
        let node = Node::try_alloc(value, next)?;
        self.attach(node);
        Ok(self)
    }

    /// remove the element after the cursor, returning a cursor to the element
    /// that followed it (or the end)
    ///
    /// on an empty list this does nothing and returns the end. otherwise the
    /// cursor must have a successor; violating that is caught by a debug
    /// assertion and is a no-op returning the end in release builds
    pub fn erase_after(mut self) -> Self {
        debug_assert!(
            self.list.is_empty() || self.peek_next().is_some(),
            "erase_after called on a position without a successor"
        );
        self.remove_after();
        self.pos = match self.next_link() {
            Some(next) => Position::from_link(next),
            None => Position::End,
        };
        self
    }

    /// unlink the element after the cursor and hand its value back. the
    /// cursor does not move
    pub fn remove_after(&mut self) -> Option<T> {
        let link = self.next_link_mut()?;
        let node = (*link)?;
        // SAFETY: `node` was owned by `link`, which is repointed past it below
        let (value, next) = unsafe { Node::into_parts(node) };
        *link = next;
        self.list.len -= 1;
        Some(value)
    }

    /// the link leaving the current position, None at the end
    fn next_link(&self) -> Option<Link<T>> {
        match self.pos {
            Position::BeforeBegin(_) => Some(self.list.head),
            // SAFETY: the node belongs to `self.list`, borrowed by this cursor
            Position::Node(node) => Some(unsafe { (*node.as_ptr()).next }),
            Position::End => None,
        }
    }

    fn next_link_mut(&mut self) -> Option<&mut Link<T>> {
        match self.pos {
            Position::BeforeBegin(_) => Some(&mut self.list.head),
            // SAFETY: the list is exclusively borrowed by this cursor
            Position::Node(node) => Some(unsafe { &mut (*node.as_ptr()).next }),
            Position::End => None,
        }
    }

    /// make `node` the successor of the current position and step onto it
    fn attach(&mut self, node: NonNull<Node<T>>) {
        if let Some(link) = self.next_link_mut() {
            *link = Some(node);
            self.list.len += 1;
            self.pos = Position::Node(node);
        }
    }

    /// the current position, with the sentinel address re-derived from a
    /// shared borrow so read-only cursors may dereference it
    fn shared_position(&self) -> Position<T> {
        match self.pos {
            Position::BeforeBegin(_) => Position::BeforeBegin(NonNull::from(&self.list.head)),
            pos => pos,
        }
    }
}

impl<'b, T> PartialEq<CursorMut<'b, T>> for CursorMut<'_, T> {
    fn eq(&self, other: &CursorMut<'b, T>) -> bool {
        self.pos == other.pos
    }
}

impl<'b, T> PartialEq<Cursor<'b, T>> for CursorMut<'_, T> {
    fn eq(&self, other: &Cursor<'b, T>) -> bool {
        self.pos == other.pos
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("pos", &self.pos)
            .field("len", &self.list.len)
            .finish()
    }
}

// SAFETY: a `CursorMut` behaves like `&'a mut SingleLinkedList<T>`
unsafe impl<T: Send> Send for CursorMut<'_, T> {}
unsafe impl<T: Sync> Sync for CursorMut<'_, T> {}
