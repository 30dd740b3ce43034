
use std::sync::Arc;

use crate::WindowHandle;
use crate::desktops::{Desktops, VirtualDesktops};
use crate::settings::Settings;
use crate::utils;


/// Desktop-level operations behind the registered shortcuts .. navigation with optional
/// wraparound, window moves, pinning. Every target index is re-checked against the live
/// desktop count at call time, and a request with nowhere to go just beeps.
# [ derive (Clone) ]
pub struct DesktopService {
    desktops : Desktops,
    settings : Arc <Settings>,
}

impl DesktopService {

    pub fn new (desktops: Desktops, settings: Arc<Settings>) -> DesktopService {
        DesktopService { desktops, settings }
    }

    pub fn desktops (&self) -> &Desktops { &self.desktops }

    fn loops (&self) -> bool { self.settings.general.loop_desktop.get() }

    /// index left of `from`, wrapping only when loop-desktop is on
    pub fn left_of (&self, from: usize) -> Option<usize> {
        let count = self.desktops.count();
        if count == 0 { return None }
        if from > 0 { Some (from - 1) }
        else if self.loops() { Some (count - 1) }
        else { None }
    }

    pub fn right_of (&self, from: usize) -> Option<usize> {
        let count = self.desktops.count();
        if from + 1 < count { Some (from + 1) }
        else if self.loops() && count > 0 { Some (0) }
        else { None }
    }

    fn switch_or_beep (&self, target: Option<usize>) -> Option<usize> {
        match target {
            Some (t) if self.desktops.switch(t) => Some(t),
            _ => { utils::alert_beep(); None }
        }
    }

    pub fn switch_left (&self) -> Option<usize> {
        let t = self.left_of (self.desktops.current());
        self.switch_or_beep (t)
    }
    pub fn switch_right (&self) -> Option<usize> {
        let t = self.right_of (self.desktops.current());
        self.switch_or_beep (t)
    }
    pub fn switch_to_index (&self, index: usize) -> Option<usize> {
        let t = (index < self.desktops.count()) .then_some (index);
        self.switch_or_beep (t)
    }

    fn move_window_to (&self, window: WindowHandle, target: Option<usize>, and_switch: bool) -> Option<usize> {
        match target {
            Some (t) if self.desktops.move_window (window, t) => {
                if and_switch { self.desktops.switch (t); }
                Some (t)
            }
            _ => { utils::alert_beep(); None }
        }
    }

    pub fn move_window_left (&self, window: WindowHandle, and_switch: bool) -> Option<usize> {
        let t = self.left_of (self.desktops.current());
        self.move_window_to (window, t, and_switch)
    }
    pub fn move_window_right (&self, window: WindowHandle, and_switch: bool) -> Option<usize> {
        let t = self.right_of (self.desktops.current());
        self.move_window_to (window, t, and_switch)
    }
    pub fn move_window_to_index (&self, window: WindowHandle, index: usize, and_switch: bool) -> Option<usize> {
        let t = (index < self.desktops.count()) .then_some (index);
        self.move_window_to (window, t, and_switch)
    }

    /// create a fresh desktop and take the window there
    pub fn move_window_new (&self, window: WindowHandle, and_switch: bool) -> Option<usize> {
        let t = self.desktops.create();
        if t.is_none() { utils::alert_beep() }
        self.move_window_to (window, t, and_switch)
    }

    /// close the foreground window, then get out of its desktop
    pub fn close_and_switch_left (&self, window: WindowHandle) -> Option<usize> {
        self.close_and_switch (window, self.left_of (self.desktops.current()))
    }
    pub fn close_and_switch_right (&self, window: WindowHandle) -> Option<usize> {
        self.close_and_switch (window, self.right_of (self.desktops.current()))
    }
    fn close_and_switch (&self, window: WindowHandle, target: Option<usize>) -> Option<usize> {
        match target {
            Some (t) => {
                self.desktops.close_window (window);
                self.switch_or_beep (Some(t))
            }
            None => { utils::alert_beep(); None }
        }
    }

    /// exchange the current desktop's position with `index` (full-tier platforms only)
    pub fn swap_current_with (&self, index: usize) -> bool {
        let from = self.desktops.current();
        let count = self.desktops.count();
        if ! self.desktops.tier().supports_reorder() || index >= count || from == index {
            utils::alert_beep();
            return false
        }
        // a reorder is a remove-and-insert, so completing the swap means putting the
        // displaced neighbor back where we started
        if ! self.desktops.reorder (from, index) { utils::alert_beep(); return false }
        let displaced = if from < index { index - 1 } else { index + 1 };
        self.desktops.reorder (displaced, from)
    }

    pub fn pin_window (&self, window: WindowHandle) -> bool { self.desktops.pin_window (window) }
    pub fn unpin_window (&self, window: WindowHandle) -> bool { self.desktops.unpin_window (window) }
    /// returns the new pinned state
    pub fn toggle_window_pin (&self, window: WindowHandle) -> bool {
        if self.desktops.is_window_pinned (window) { self.desktops.unpin_window (window); false }
        else { self.desktops.pin_window (window); true }
    }

    pub fn pin_app (&self, window: WindowHandle) -> bool { self.desktops.pin_app (window) }
    pub fn unpin_app (&self, window: WindowHandle) -> bool { self.desktops.unpin_app (window) }
    pub fn toggle_app_pin (&self, window: WindowHandle) -> bool {
        if self.desktops.is_app_pinned (window) { self.desktops.unpin_app (window); false }
        else { self.desktops.pin_app (window); true }
    }

    pub fn show_task_view (&self) { self.desktops.show_task_view() }

}




#[cfg(test)]
mod test {
    use super::*;
    use crate::desktops::{CapabilityTier, FakeDesktops};
    use crate::settings::{InMemoryProvider, Settings};

    fn service (count: usize, tier: CapabilityTier) -> (DesktopService, Arc<FakeDesktops>) {
        let fake = Arc::new (FakeDesktops::new (count, tier));
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        (DesktopService::new (fake.clone(), settings), fake)
    }

    #[test]
    fn edges_stop_unless_looping () {
        let (svc, fake) = service (3, CapabilityTier::Named);
        assert_eq! (svc.switch_left(), None);            // at 0 with loop off
        svc.settings.general.loop_desktop.set (true);
        assert_eq! (svc.switch_left(), Some(2));
        assert_eq! (svc.switch_right(), Some(0));
        assert_eq! (fake.current(), 0);
    }

    #[test]
    fn switch_right_walks_and_stops () {
        let (svc, _) = service (3, CapabilityTier::Named);
        assert_eq! (svc.switch_right(), Some(1));
        assert_eq! (svc.switch_right(), Some(2));
        assert_eq! (svc.switch_right(), None);
    }

    #[test]
    fn move_new_creates_moves_and_optionally_switches () {
        let (svc, fake) = service (2, CapabilityTier::Named);
        let w = WindowHandle (42);
        assert_eq! (svc.move_window_new (w, true), Some(2));
        assert_eq! (fake.count(), 3);
        assert_eq! (fake.current(), 2);
        assert_eq! (*fake.moved_windows.read().unwrap(), vec![(42, 2)]);
    }

    #[test]
    fn move_to_out_of_range_index_is_a_beep_not_a_panic () {
        let (svc, fake) = service (2, CapabilityTier::Named);
        assert_eq! (svc.move_window_to_index (WindowHandle(7), 9, true), None);
        assert! (fake.moved_windows.read().unwrap().is_empty());
    }

    #[test]
    fn close_and_switch_needs_somewhere_to_go () {
        let (svc, fake) = service (2, CapabilityTier::Named);
        // at desktop 0, nothing to the left .. window must stay open
        assert_eq! (svc.close_and_switch_left (WindowHandle(7)), None);
        assert! (fake.closed_windows.read().unwrap().is_empty());
        svc.switch_to_index (1);
        assert_eq! (svc.close_and_switch_left (WindowHandle(7)), Some(0));
        assert_eq! (*fake.closed_windows.read().unwrap(), vec![7]);
    }

    #[test]
    fn swap_exchanges_positions_on_full_tier () {
        let fake = Arc::new (FakeDesktops::with_names (&["a","b","c","d"], CapabilityTier::NamedWallpaper));
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        let svc = DesktopService::new (fake.clone(), settings);
        svc.switch_to_index (1);
        assert! (svc.swap_current_with (3));
        assert_eq! (fake.names(), vec!["a","d","c","b"]);
    }

    #[test]
    fn swap_is_refused_below_full_tier () {
        let (svc, _) = service (3, CapabilityTier::Named);
        assert! (! svc.swap_current_with (2));
    }

    #[test]
    fn pin_toggles_report_the_new_state () {
        let (svc, fake) = service (2, CapabilityTier::Named);
        let w = WindowHandle (5);
        assert! (svc.toggle_window_pin (w));
        assert! (fake.is_window_pinned (w));
        assert! (! svc.toggle_window_pin (w));
        assert! (! fake.is_window_pinned (w));
    }

}
