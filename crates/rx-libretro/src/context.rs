//! Per-thread call context
//!
//! libretro callbacks carry no user data. Every call the adapter makes into
//! the core runs inside a [`CallScope`], and the trampolines look up the
//! adapter that owns the current call from this thread's scope stack.

use crate::state::Shared;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

thread_local! {
    static ACTIVE: RefCell<Vec<Arc<Shared>>> = const { RefCell::new(Vec::new()) };
}

/// Marks `shared` as the target of callbacks on this thread until dropped.
/// Scopes nest; the innermost wins.
pub(crate) struct CallScope {
    // Must be dropped on the thread that entered it
    _not_send: PhantomData<*const ()>,
}

impl CallScope {
    pub fn enter(shared: &Arc<Shared>) -> Self {
        ACTIVE.with(|active| active.borrow_mut().push(Arc::clone(shared)));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

/// Adapter state for the call in progress on this thread
pub(crate) fn active() -> Option<Arc<Shared>> {
    ACTIVE.with(|active| active.borrow().last().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> Arc<Shared> {
        Arc::new(Shared::new(Vec::new(), None, false))
    }

    #[test]
    fn test_scopes_nest() {
        assert!(active().is_none());

        let outer = shared();
        let inner = shared();
        {
            let _outer = CallScope::enter(&outer);
            assert!(Arc::ptr_eq(&active().unwrap(), &outer));
            {
                let _inner = CallScope::enter(&inner);
                assert!(Arc::ptr_eq(&active().unwrap(), &inner));
            }
            assert!(Arc::ptr_eq(&active().unwrap(), &outer));
        }
        assert!(active().is_none());
    }

    #[test]
    fn test_scope_is_per_thread() {
        let state = shared();
        let _scope = CallScope::enter(&state);
        let seen_elsewhere = std::thread::spawn(|| active().is_some()).join().unwrap();
        assert!(!seen_elsewhere);
        assert!(active().is_some());
    }
}
