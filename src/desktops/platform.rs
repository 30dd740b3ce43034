
use std::sync::Arc;

use crate::WindowHandle;


/// what the OS build underneath actually supports
# [ derive (Debug, Clone, Copy, PartialEq, Eq) ]
pub enum CapabilityTier {
    /// desktops exist but carry no per-desktop metadata
    Basic,
    /// per-desktop naming, no per-desktop wallpaper api
    Named,
    /// per-desktop naming, wallpaper, and native reordering
    NamedWallpaper,
}

impl CapabilityTier {
    pub fn supports_naming    (self) -> bool { self != CapabilityTier::Basic }
    pub fn supports_wallpaper (self) -> bool { self == CapabilityTier::NamedWallpaper }
    pub fn supports_reorder   (self) -> bool { self == CapabilityTier::NamedWallpaper }
}


/// The OS virtual-desktop surface, consumed as an opaque collaborator. <br>
/// Everything is index-based and fallible-by-bool .. a request against an index
/// that no longer exists just reports false, desktops can vanish underneath us
/// at any time.
pub trait VirtualDesktops : Send + Sync {

    fn tier (&self) -> CapabilityTier;

    fn count   (&self) -> usize;
    fn current (&self) -> usize;

    fn switch (&self, index: usize) -> bool;
    /// returns the new desktop's index
    fn create (&self) -> Option<usize>;
    fn remove (&self, index: usize) -> bool;
    fn reorder (&self, from: usize, to: usize) -> bool;

    fn name (&self, index: usize) -> Option<String>;
    fn set_name (&self, index: usize, name: &str) -> bool;
    fn wallpaper_path (&self, index: usize) -> Option<String>;
    fn set_wallpaper_path (&self, index: usize, path: &str) -> bool;

    fn move_window (&self, window: WindowHandle, index: usize) -> bool;
    fn close_window (&self, window: WindowHandle) -> bool;

    fn pin_window      (&self, window: WindowHandle) -> bool;
    fn unpin_window    (&self, window: WindowHandle) -> bool;
    fn is_window_pinned (&self, window: WindowHandle) -> bool;

    fn pin_app       (&self, window: WindowHandle) -> bool;
    fn unpin_app     (&self, window: WindowHandle) -> bool;
    fn is_app_pinned (&self, window: WindowHandle) -> bool;

    fn show_task_view (&self);

}

pub type Desktops = Arc <dyn VirtualDesktops>;




#[cfg (any (test, feature = "fake-desktops"))]
pub use self::fake::FakeDesktops;

#[cfg (any (test, feature = "fake-desktops"))]
pub mod fake {
    use std::sync::RwLock;
    use rustc_hash::FxHashSet;
    use super::*;

    # [ derive (Clone, Default) ]
    struct DesktopState {
        name      : String,
        wallpaper : String,
    }

    /// in-memory stand-in for the OS desktop surface
    pub struct FakeDesktops {
        tier           : CapabilityTier,
        state          : RwLock <Vec <DesktopState>>,
        current        : RwLock <usize>,
        pinned_windows : RwLock <FxHashSet <isize>>,
        pinned_apps    : RwLock <FxHashSet <isize>>,
        pub moved_windows : RwLock <Vec <(isize, usize)>>,
        pub closed_windows: RwLock <Vec <isize>>,
    }

    impl FakeDesktops {

        pub fn new (count: usize, tier: CapabilityTier) -> FakeDesktops {
            FakeDesktops {
                tier,
                state: RwLock::new (vec![DesktopState::default(); count]),
                current: RwLock::new (0),
                pinned_windows: RwLock::new (FxHashSet::default()),
                pinned_apps: RwLock::new (FxHashSet::default()),
                moved_windows: RwLock::new (Vec::new()),
                closed_windows: RwLock::new (Vec::new()),
            }
        }

        pub fn with_names (names: &[&str], tier: CapabilityTier) -> FakeDesktops {
            let fake = FakeDesktops::new (names.len(), tier);
            { let mut state = fake.state.write().unwrap();
              for (s, n) in state.iter_mut().zip(names) { s.name = n.to_string() } }
            fake
        }

        pub fn names (&self) -> Vec<String> {
            self.state.read().unwrap().iter().map(|s| s.name.clone()).collect()
        }

    }

    impl VirtualDesktops for FakeDesktops {

        fn tier (&self) -> CapabilityTier { self.tier }

        fn count   (&self) -> usize { self.state.read().unwrap().len() }
        fn current (&self) -> usize { *self.current.read().unwrap() }

        fn switch (&self, index: usize) -> bool {
            if index >= self.count() { return false }
            *self.current.write().unwrap() = index;
            true
        }

        fn create (&self) -> Option<usize> {
            let mut state = self.state.write().unwrap();
            state.push (DesktopState::default());
            Some (state.len() - 1)
        }

        fn remove (&self, index: usize) -> bool {
            let mut state = self.state.write().unwrap();
            if index >= state.len() || state.len() == 1 { return false }
            state.remove (index);
            let mut cur = self.current.write().unwrap();
            if *cur >= state.len() { *cur = state.len() - 1 }
            true
        }

        fn reorder (&self, from: usize, to: usize) -> bool {
            if ! self.tier.supports_reorder() { return false }
            let mut state = self.state.write().unwrap();
            if from >= state.len() || to >= state.len() { return false }
            let d = state.remove (from);
            state.insert (to, d);
            true
        }

        fn name (&self, index: usize) -> Option<String> {
            self.state.read().unwrap().get(index).map (|s| s.name.clone())
        }
        fn set_name (&self, index: usize, name: &str) -> bool {
            if ! self.tier.supports_naming() { return false }
            self.state.write().unwrap().get_mut(index) .map (|s| s.name = name.to_string()) .is_some()
        }
        fn wallpaper_path (&self, index: usize) -> Option<String> {
            self.state.read().unwrap().get(index).map (|s| s.wallpaper.clone())
        }
        fn set_wallpaper_path (&self, index: usize, path: &str) -> bool {
            if ! self.tier.supports_wallpaper() { return false }
            self.state.write().unwrap().get_mut(index) .map (|s| s.wallpaper = path.to_string()) .is_some()
        }

        fn move_window (&self, window: WindowHandle, index: usize) -> bool {
            if index >= self.count() { return false }
            self.moved_windows.write().unwrap().push ((window.0, index));
            true
        }
        fn close_window (&self, window: WindowHandle) -> bool {
            self.closed_windows.write().unwrap().push (window.0);
            true
        }

        fn pin_window (&self, window: WindowHandle) -> bool { self.pinned_windows.write().unwrap().insert (window.0); true }
        fn unpin_window (&self, window: WindowHandle) -> bool { self.pinned_windows.write().unwrap().remove (&window.0) }
        fn is_window_pinned (&self, window: WindowHandle) -> bool { self.pinned_windows.read().unwrap().contains (&window.0) }

        fn pin_app (&self, window: WindowHandle) -> bool { self.pinned_apps.write().unwrap().insert (window.0); true }
        fn unpin_app (&self, window: WindowHandle) -> bool { self.pinned_apps.write().unwrap().remove (&window.0) }
        fn is_app_pinned (&self, window: WindowHandle) -> bool { self.pinned_apps.read().unwrap().contains (&window.0) }

        fn show_task_view (&self) { }

    }

}
