use core::cell::UnsafeCell;

/// Wrapper for keeping non-`Sync` values in statics on a single hart.
pub struct Global<T> {
    inner: UnsafeCell<T>,
}

impl<T> Global<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: UnsafeCell::new(value),
        }
    }

    /// # Safety
    /// No other reference obtained from this `Global` may be alive.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_mut(&self) -> &mut T {
        unsafe { &mut *self.inner.get() }
    }
}

unsafe impl<T> Sync for Global<T> {}

/// A static value that can be borrowed mutably exactly once.
pub struct Handoff<T> {
    value: Global<T>,
    taken: Global<bool>,
}

impl<T> Handoff<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: Global::new(value),
            taken: Global::new(false),
        }
    }

    /// First call gets the value, later calls get `None`. Only sound while
    /// a single thread of control exists.
    pub fn take(&'static self) -> Option<&'static mut T> {
        unsafe {
            let taken = self.taken.get_mut();
            if *taken {
                return None;
            }
            *taken = true;
            Some(self.value.get_mut())
        }
    }
}
