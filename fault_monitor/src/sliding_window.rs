use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Trailing window over the last `window_size` instantaneous results with a
/// running count of violations.
#[derive(Debug)]
pub struct SlidingWindow {
    window_size: NonZeroUsize,
    elements: VecDeque<bool>,
    violations: usize,
}

impl SlidingWindow {
    pub fn new(window_size: NonZeroUsize) -> SlidingWindow {
        SlidingWindow {
            window_size,
            elements: VecDeque::with_capacity(window_size.get()),
            violations: 0,
        }
    }

    pub fn add(&mut self, element: bool) {
        if self.elements.len() == self.window_size.get() {
            if let Some(true) = self.elements.pop_front() {
                self.violations -= 1;
            }
        }
        if element {
            self.violations += 1;
        }
        self.elements.push_back(element);
    }

    pub fn is_full(&self) -> bool {
        self.elements.len() == self.window_size.get()
    }

    /// A full window in which every sample was a violation.
    pub fn is_persistent(&self) -> bool {
        self.is_full() && self.violations == self.window_size.get()
    }

}

/// Final flag per sample: 1 once the trailing window ending at that sample is
/// full and entirely faulty, 0 otherwise (including underfilled windows).
pub fn persist(instantaneous: &[bool], window_size: NonZeroUsize) -> Vec<i32> {
    let mut window = SlidingWindow::new(window_size);
    instantaneous
        .iter()
        .map(|&violated| {
            window.add(violated);
            i32::from(window.is_persistent())
        })
        .collect()
}
