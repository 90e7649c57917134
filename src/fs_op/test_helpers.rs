//! Fault-injection hooks that let tests force failure paths and check that
//! partially written archives are cleaned up.
//!
//! The hooks are live in unit tests and when the `test-helpers` feature is
//! enabled; otherwise they compile to no-ops. Flags are per-thread so tests
//! running in parallel never observe each other's faults.

#[cfg(any(test, feature = "test-helpers"))]
use std::cell::Cell;

#[cfg(any(test, feature = "test-helpers"))]
thread_local! {
    static FORCE_ARCHIVE_WRITE_FAIL: Cell<bool> = const { Cell::new(false) };
}

/// Make the next archive writes on this thread fail after the content entry
/// has been written.
#[cfg(any(test, feature = "test-helpers"))]
pub fn set_force_archive_write_fail(v: bool) {
    FORCE_ARCHIVE_WRITE_FAIL.with(|f| f.set(v));
}

#[cfg(any(test, feature = "test-helpers"))]
pub fn should_force_archive_write_fail() -> bool {
    FORCE_ARCHIVE_WRITE_FAIL.with(|f| f.get())
}

/// Clears the fault flag when dropped, so a failing assertion cannot leak an
/// armed hook into whatever runs next on the thread.
#[cfg(any(test, feature = "test-helpers"))]
pub struct ArchiveFaultGuard(());

#[cfg(any(test, feature = "test-helpers"))]
impl ArchiveFaultGuard {
    pub fn arm() -> Self {
        set_force_archive_write_fail(true);
        ArchiveFaultGuard(())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Drop for ArchiveFaultGuard {
    fn drop(&mut self) {
        set_force_archive_write_fail(false);
    }
}

// No-op fallbacks when the feature is not active.
#[cfg(not(any(test, feature = "test-helpers")))]
pub fn set_force_archive_write_fail(_v: bool) {}
#[cfg(not(any(test, feature = "test-helpers")))]
pub fn should_force_archive_write_fail() -> bool {
    false
}
