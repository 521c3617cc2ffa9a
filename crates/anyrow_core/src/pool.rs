//! Blocking pool of owned resources.
//!
//! # Responsibility
//! - Hand out exclusive access to pooled resources (typically connections)
//!   across threads with RAII return semantics.
//!
//! # Invariants
//! - A resource is held by at most one guard at a time.
//! - Guards return their resource on every exit path, including unwinding.
//! - `acquire_timeout` never waits past its deadline.

use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Raised when no resource became free within the requested deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTimeout {
    pub waited: Duration,
}

impl Display for PoolTimeout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no pooled resource became available within {}ms",
            self.waited.as_millis()
        )
    }
}

impl Error for PoolTimeout {}

/// Mutex/condvar-guarded stack of owned resources.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    available: Condvar,
}

impl<T> Pool<T> {
    pub fn new(resources: Vec<T>) -> Self {
        Self {
            idle: Mutex::new(resources),
            available: Condvar::new(),
        }
    }

    /// Takes a resource, blocking until one is free.
    pub fn acquire(&self) -> PoolGuard<'_, T> {
        let mut idle = self.lock_idle();
        loop {
            if let Some(resource) = idle.pop() {
                return self.guard(resource, idle.len());
            }
            idle = self
                .available
                .wait(idle)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Takes a resource immediately, or `None` when the pool is empty.
    pub fn try_acquire(&self) -> Option<PoolGuard<'_, T>> {
        let mut idle = self.lock_idle();
        let resource = idle.pop()?;
        Some(self.guard(resource, idle.len()))
    }

    /// Takes a resource, waiting at most `deadline`.
    pub fn acquire_timeout(&self, deadline: Duration) -> Result<PoolGuard<'_, T>, PoolTimeout> {
        let started_at = Instant::now();
        let mut idle = self.lock_idle();
        loop {
            if let Some(resource) = idle.pop() {
                return Ok(self.guard(resource, idle.len()));
            }

            let elapsed = started_at.elapsed();
            let Some(remaining) = deadline.checked_sub(elapsed) else {
                return Err(PoolTimeout { waited: elapsed });
            };

            let (guard, wait_result) = self
                .available
                .wait_timeout(idle, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            idle = guard;

            if wait_result.timed_out() && idle.is_empty() {
                return Err(PoolTimeout {
                    waited: started_at.elapsed(),
                });
            }
        }
    }

    /// Returns how many resources are currently idle.
    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    fn lock_idle(&self) -> MutexGuard<'_, Vec<T>> {
        // A poisoned lock means a holder panicked; the stack of idle
        // resources is still structurally valid.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard<'p>(&'p self, resource: T, idle_left: usize) -> PoolGuard<'p, T> {
        debug!("event=pool_acquire module=pool status=ok idle_left={idle_left}");
        PoolGuard {
            pool: self,
            resource: Some(resource),
        }
    }

    fn release(&self, resource: T) {
        let mut idle = self.lock_idle();
        idle.push(resource);
        debug!(
            "event=pool_release module=pool status=ok idle_left={}",
            idle.len()
        );
        drop(idle);
        self.available.notify_one();
    }
}

/// Exclusive handle to one pooled resource.
///
/// Dropping the guard returns the resource to its pool and wakes one waiter.
pub struct PoolGuard<'p, T> {
    pool: &'p Pool<T>,
    resource: Option<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for PoolGuard<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolGuard")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // The option is only emptied inside drop.
        self.resource.as_ref().expect("pool guard holds a resource")
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.resource.as_mut().expect("pool guard holds a resource")
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.release(resource);
        }
    }
}
