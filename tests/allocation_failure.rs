//! runs with a global allocator that can be told to refuse large requests on
//! the current thread, so the fallible insertion paths see a real null from
//! the allocator

use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
};

use single_linked_list::{ListError, SingleLinkedList};

/// anything bigger than this fails while `REFUSE_LARGE` is set. a node
/// holding a `Block` is the only allocation the tests make above it
const LARGE: usize = 4096;

type Block = [u64; 512];

thread_local! {
    static REFUSE_LARGE: Cell<bool> = const { Cell::new(false) };
}

struct RefusingAllocator;

// SAFETY: every request is either forwarded to `System` or answered with null
unsafe impl GlobalAlloc for RefusingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let refuse = layout.size() > LARGE && REFUSE_LARGE.with(Cell::get);
        if refuse {
            std::ptr::null_mut()
        } else {
            System.alloc(layout)
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: RefusingAllocator = RefusingAllocator;

fn refusing<R>(f: impl FnOnce() -> R) -> R {
    REFUSE_LARGE.with(|refuse| refuse.set(true));
    let out = f();
    REFUSE_LARGE.with(|refuse| refuse.set(false));
    out
}

#[test]
fn failed_allocation_leaves_the_list_unchanged() {
    let mut ll = SingleLinkedList::<Block>::from([[1; 512], [2; 512]]);

    let pushed = refusing(|| ll.try_push_front([0; 512]));
    match pushed {
        Err(ListError::AllocationFailed(layout)) => assert!(layout.size() > LARGE),
        other => panic!("expected an allocation failure, got {:?}", other.map(|_| ())),
    }
    assert_eq!(ll.len(), 2);
    assert!(ll.iter().map(|block| block[0]).eq([1, 2]));

    let inserted = refusing(|| ll.begin_mut().try_insert_after([9; 512]).map(|_| ()));
    assert!(matches!(inserted, Err(ListError::AllocationFailed(_))));
    assert_eq!(ll.len(), 2);
    assert!(ll.iter().map(|block| block[0]).eq([1, 2]));

    // the same calls go through once the allocator cooperates again
    ll.try_push_front([0; 512]).expect("failed to alloc");
    ll.begin_mut()
        .try_insert_after([9; 512])
        .expect("failed to alloc");
    assert!(ll.iter().map(|block| block[0]).eq([0, 9, 1, 2]));
}
