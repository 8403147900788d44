//! Auto-advancing ratings carousel.
//!
//! With fewer items than fit in the viewport the list is padded by repetition
//! and stays still. Otherwise the display buffer wraps the list in copies of
//! its boundary items and the index walks forward forever: when the window
//! reaches the end of the buffer it jumps back by exactly one list length,
//! with the slide transition disabled, onto identical content.

use std::time::Duration;

use tracing::debug;

use crate::config::CarouselConfig;

/// Boundary copies kept on each side of the list.
const WRAP: usize = 2;

/// Visible item count for a viewport width.
pub fn items_per_view(width: f32) -> usize {
    if width < 640.0 {
        1
    } else if width < 1024.0 {
        2
    } else {
        3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselMode {
    /// No data yet.
    Idle,
    /// Fewer items than fit in the viewport: padded, no auto-advance.
    Small,
    /// Wrapped buffer with the tick timer armed.
    Looping,
}

/// Timer the host must schedule after a carousel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEffect {
    /// Call [`Carousel::snap_back`] after the slide transition finishes.
    Snap { after: Duration },
    /// Call [`Carousel::restore_transition`].
    RestoreTransition { after: Duration },
}

#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    buffer: Vec<T>,
    index: usize,
    items_per_view: usize,
    mode: CarouselMode,
    animate: bool,
    snap_pending: bool,
    armed: bool,
    tick_interval: Duration,
    snap_delay: Duration,
    restore_delay: Duration,
}

impl<T: Clone> Carousel<T> {
    pub fn new(config: &CarouselConfig, viewport_width: f32) -> Self {
        Self {
            items: Vec::new(),
            buffer: Vec::new(),
            index: 0,
            items_per_view: items_per_view(viewport_width),
            mode: CarouselMode::Idle,
            animate: true,
            snap_pending: false,
            armed: false,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            snap_delay: Duration::from_millis(config.snap_delay_ms),
            restore_delay: Duration::from_millis(config.restore_transition_ms),
        }
    }

    /// Replace the items and rebuild. Looping starts on the first real item.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild();
        if self.mode == CarouselMode::Looping {
            self.index = self.wrap();
        }
        debug!(
            count = self.items.len(),
            items_per_view = self.items_per_view,
            mode = ?self.mode,
            "carousel loaded"
        );
    }

    fn wrap(&self) -> usize {
        WRAP.min(self.items.len())
    }

    fn rebuild(&mut self) {
        let n = self.items.len();
        self.index = 0;
        self.animate = true;
        self.snap_pending = false;

        if n == 0 {
            self.buffer.clear();
            self.mode = CarouselMode::Idle;
            self.armed = false;
        } else if n < self.items_per_view {
            let copies = self.items_per_view.div_ceil(n);
            self.buffer = self.items.iter().cycle().take(copies * n).cloned().collect();
            self.mode = CarouselMode::Small;
            self.armed = false;
        } else {
            let wrap = self.wrap();
            let mut buffer = Vec::with_capacity(n + 2 * wrap);
            buffer.extend_from_slice(&self.items[n - wrap..]);
            buffer.extend_from_slice(&self.items);
            buffer.extend_from_slice(&self.items[..wrap]);
            self.buffer = buffer;
            self.mode = CarouselMode::Looping;
            self.armed = true;
        }
    }

    /// Timer tick. Ignored unless the carousel is looping and armed.
    pub fn tick(&mut self) -> Option<CarouselEffect> {
        if !self.armed {
            return None;
        }
        self.advance()
    }

    /// Manual "next" control, same movement as a tick.
    pub fn next(&mut self) -> Option<CarouselEffect> {
        if self.mode != CarouselMode::Looping {
            return None;
        }
        self.advance()
    }

    fn advance(&mut self) -> Option<CarouselEffect> {
        // A snap the host never delivered still has to happen before moving on.
        if self.snap_pending {
            self.apply_snap();
            self.animate = true;
        }
        self.index += 1;
        self.animate = true;
        if self.index + self.items_per_view >= self.buffer.len() {
            self.snap_pending = true;
            return Some(CarouselEffect::Snap {
                after: self.snap_delay,
            });
        }
        None
    }

    fn apply_snap(&mut self) {
        self.index -= self.items.len();
        self.snap_pending = false;
        debug!(index = self.index, "carousel snapped back");
    }

    /// Jump back one list length onto identical content, without transition.
    pub fn snap_back(&mut self) -> Option<CarouselEffect> {
        if !self.snap_pending {
            return None;
        }
        self.apply_snap();
        self.animate = false;
        Some(CarouselEffect::RestoreTransition {
            after: self.restore_delay,
        })
    }

    pub fn restore_transition(&mut self) {
        self.animate = true;
    }

    /// Recompute items per view; rebuild and re-arm only when it changed.
    pub fn resize(&mut self, viewport_width: f32) -> bool {
        let per_view = items_per_view(viewport_width);
        if per_view == self.items_per_view {
            return false;
        }
        debug!(from = self.items_per_view, to = per_view, "carousel resized");
        self.items_per_view = per_view;
        self.rebuild();
        true
    }

    /// Stop the timer and drop any pending snap.
    pub fn teardown(&mut self) {
        self.armed = false;
        self.snap_pending = false;
        self.animate = true;
    }

    // ==================== View state ====================

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn buffer(&self) -> &[T] {
        &self.buffer
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether the current frame slides into place or jumps.
    pub fn animates(&self) -> bool {
        self.animate
    }

    /// Items currently in the viewport.
    pub fn visible(&self) -> &[T] {
        let start = self.index.min(self.buffer.len());
        let end = (start + self.items_per_view).min(self.buffer.len());
        &self.buffer[start..end]
    }

    /// First item in the viewport.
    pub fn active(&self) -> Option<&T> {
        self.buffer.get(self.index)
    }

    /// Horizontal offset of the track, in percent of the viewport width.
    pub fn translate_percent(&self) -> f32 {
        self.index as f32 * 100.0 / self.items_per_view as f32
    }

    pub fn dot_count(&self) -> usize {
        self.items.len().div_ceil(self.items_per_view)
    }

    pub fn active_dot(&self) -> usize {
        match self.dot_count() {
            0 => 0,
            dots => (self.index / self.items_per_view) % dots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: f32 = 1280.0;
    const TABLET: f32 = 800.0;
    const MOBILE: f32 = 400.0;

    fn carousel(width: f32, items: &[u32]) -> Carousel<u32> {
        let mut c = Carousel::new(&CarouselConfig::default(), width);
        c.set_items(items.to_vec());
        c
    }

    /// Deliver every scheduled timer immediately.
    fn tick_through(c: &mut Carousel<u32>) {
        if let Some(CarouselEffect::Snap { .. }) = c.tick() {
            if let Some(CarouselEffect::RestoreTransition { .. }) = c.snap_back() {
                c.restore_transition();
            }
        }
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(items_per_view(320.0), 1);
        assert_eq!(items_per_view(639.9), 1);
        assert_eq!(items_per_view(640.0), 2);
        assert_eq!(items_per_view(1023.0), 2);
        assert_eq!(items_per_view(1024.0), 3);
    }

    #[test]
    fn test_empty_is_idle() {
        let c = carousel(DESKTOP, &[]);
        assert_eq!(c.mode(), CarouselMode::Idle);
        assert!(c.visible().is_empty());
        assert_eq!(c.active_dot(), 0);
        assert!(!c.is_armed());
    }

    #[test]
    fn test_single_rating_on_desktop_is_padded_and_still() {
        let mut c = carousel(DESKTOP, &[7]);
        assert_eq!(c.mode(), CarouselMode::Small);
        assert_eq!(c.buffer(), &[7, 7, 7]);
        assert_eq!(c.index(), 0);
        assert!(!c.is_armed());
        assert_eq!(c.tick(), None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_two_ratings_pad_with_whole_copies() {
        let c = carousel(DESKTOP, &[1, 2]);
        assert_eq!(c.buffer(), &[1, 2, 1, 2]);
        assert_eq!(c.visible(), &[1, 2, 1]);
    }

    #[test]
    fn test_five_ratings_wrap_with_boundary_copies() {
        let c = carousel(DESKTOP, &[1, 2, 3, 4, 5]);
        assert_eq!(c.mode(), CarouselMode::Looping);
        assert_eq!(c.buffer(), &[4, 5, 1, 2, 3, 4, 5, 1, 2]);
        assert_eq!(c.index(), 2);
        assert_eq!(c.visible(), &[1, 2, 3]);
        assert!(c.is_armed());
    }

    #[test]
    fn test_single_rating_on_mobile_loops() {
        let mut c = carousel(MOBILE, &[9]);
        assert_eq!(c.mode(), CarouselMode::Looping);
        assert_eq!(c.buffer(), &[9, 9, 9]);
        for _ in 0..5 {
            tick_through(&mut c);
            assert_eq!(c.active(), Some(&9));
            assert!(c.index() + c.items_per_view() <= c.buffer().len());
        }
    }

    #[test]
    fn test_snap_back_disables_then_restores_transition() {
        let mut c = carousel(DESKTOP, &[1, 2, 3, 4, 5]);
        // Buffer has 9 entries, the last full window starts at 6.
        for _ in 0..3 {
            assert_eq!(c.tick(), None);
        }
        assert_eq!(c.index(), 5);
        let effect = c.tick();
        assert_eq!(
            effect,
            Some(CarouselEffect::Snap {
                after: Duration::from_millis(500)
            })
        );
        assert_eq!(c.visible(), &[5, 1, 2]);
        assert!(c.animates());

        let restore = c.snap_back();
        assert_eq!(
            restore,
            Some(CarouselEffect::RestoreTransition {
                after: Duration::from_millis(50)
            })
        );
        assert_eq!(c.index(), 1);
        assert_eq!(c.visible(), &[5, 1, 2]);
        assert!(!c.animates());

        c.restore_transition();
        assert!(c.animates());
        assert_eq!(c.snap_back(), None);
    }

    #[test]
    fn test_missed_snap_is_applied_before_next_move() {
        let mut c = carousel(DESKTOP, &[1, 2, 3, 4, 5]);
        for _ in 0..4 {
            c.tick();
        }
        assert_eq!(c.index(), 6);
        // Host never delivered the snap.
        c.tick();
        assert_eq!(c.index(), 2);
        assert_eq!(c.visible(), &[1, 2, 3]);
    }

    #[test]
    fn test_manual_next_matches_tick() {
        let mut ticked = carousel(TABLET, &[1, 2, 3]);
        let mut manual = carousel(TABLET, &[1, 2, 3]);
        for _ in 0..7 {
            let a = ticked.tick();
            let b = manual.next();
            assert_eq!(a, b);
            if a.is_some() {
                ticked.snap_back();
                manual.snap_back();
            }
            assert_eq!(ticked.visible(), manual.visible());
        }
    }

    #[test]
    fn test_next_does_nothing_when_small() {
        let mut c = carousel(DESKTOP, &[1]);
        assert_eq!(c.next(), None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_resize_rebuilds_and_rearms() {
        let mut c = carousel(DESKTOP, &[1, 2]);
        assert_eq!(c.mode(), CarouselMode::Small);

        assert!(!c.resize(1100.0));
        assert!(c.resize(TABLET));
        assert_eq!(c.mode(), CarouselMode::Looping);
        assert_eq!(c.index(), 0);
        assert!(c.is_armed());
        assert_eq!(c.buffer(), &[1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn test_teardown_disarms() {
        let mut c = carousel(DESKTOP, &[1, 2, 3, 4]);
        c.teardown();
        assert!(!c.is_armed());
        assert_eq!(c.tick(), None);
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn test_translate_and_dots() {
        let mut c = carousel(TABLET, &[1, 2, 3, 4, 5]);
        assert_eq!(c.dot_count(), 3);
        assert_eq!(c.index(), 2);
        assert_eq!(c.translate_percent(), 100.0);
        assert_eq!(c.active_dot(), 1);
        c.tick();
        assert_eq!(c.translate_percent(), 150.0);
        assert_eq!(c.active_dot(), 1);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        fn width() -> impl Strategy<Value = f32> {
            prop_oneof![Just(MOBILE), Just(TABLET), Just(DESKTOP)]
        }

        proptest! {
            #[test]
            fn small_lists_fill_the_viewport(n in 1usize..3, w in width()) {
                let items: Vec<u32> = (0..n as u32).collect();
                let c = carousel(w, &items);
                if n < c.items_per_view() {
                    prop_assert_eq!(c.mode(), CarouselMode::Small);
                    prop_assert!(c.buffer().len() >= c.items_per_view());
                    prop_assert_eq!(c.visible().len(), c.items_per_view());
                    prop_assert_eq!(c.index(), 0);
                }
            }

            #[test]
            fn looping_is_seamless(n in 1usize..12, w in width(), ticks in 0usize..80) {
                let items: Vec<u32> = (0..n as u32).collect();
                let mut c = carousel(w, &items);
                prop_assume!(c.mode() == CarouselMode::Looping);

                for step in 1..=ticks {
                    tick_through(&mut c);
                    prop_assert!(c.index() + c.items_per_view() <= c.buffer().len());
                    prop_assert_eq!(c.visible().len(), c.items_per_view());
                    prop_assert_eq!(c.active(), Some(&items[step % n]));
                    prop_assert!(c.active_dot() < c.dot_count());
                }
            }

            #[test]
            fn window_is_consecutive_items(n in 3usize..10, ticks in 0usize..40) {
                let items: Vec<u32> = (0..n as u32).collect();
                let mut c = carousel(DESKTOP, &items);
                for _ in 0..ticks {
                    tick_through(&mut c);
                }
                let first = *c.active().unwrap() as usize;
                let expected: Vec<u32> = (0..3).map(|k| ((first + k) % n) as u32).collect();
                prop_assert_eq!(c.visible(), expected.as_slice());
            }
        }
    }
}
