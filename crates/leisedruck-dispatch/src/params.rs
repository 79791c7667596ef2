// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared page-size configuration.
//
// One value is active at a time, last writer wins, and the dispatcher reads
// it at dispatch time — so a `set` racing an in-flight print legitimately
// decides that print's geometry. The holder is injected rather than being a
// process-global, which removes torn reads but deliberately keeps the race.

use std::sync::{Arc, Mutex};

use leisedruck_core::types::PageSize;

/// Cheaply clonable handle to the current page-size configuration.
#[derive(Debug, Clone)]
pub struct PageSizeHolder {
    inner: Arc<Mutex<PageSize>>,
}

impl PageSizeHolder {
    pub fn new(initial: PageSize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replace the active configuration.
    pub fn set(&self, size: PageSize) {
        *self.inner.lock().expect("page size lock poisoned") = size;
    }

    /// Snapshot the active configuration.
    pub fn get(&self) -> PageSize {
        *self.inner.lock().expect("page size lock poisoned")
    }
}

impl Default for PageSizeHolder {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let holder = PageSizeHolder::default();
        holder.set(PageSize {
            width: 800,
            height: 600,
        });
        assert_eq!(
            holder.get(),
            PageSize {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn starts_at_the_label_default() {
        assert_eq!(PageSizeHolder::default().get(), PageSize::DEFAULT);
    }

    #[test]
    fn writes_through_one_clone_are_visible_through_another() {
        // Last-writer-wins is the documented contract: a set issued while a
        // print is in flight decides that print's geometry.
        let holder = PageSizeHolder::default();
        let other = holder.clone();
        other.set(PageSize {
            width: 100,
            height: 50,
        });
        assert_eq!(holder.get().width, 100);
    }
}
