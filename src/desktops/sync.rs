
use std::sync::Arc;

use crate::desktops::{CapabilityTier, Desktops, VirtualDesktops};
use crate::settings::Settings;


/// lifecycle signals from the OS desktop surface
# [ derive (Debug, Clone, PartialEq, Eq) ]
pub enum DesktopEvent {
    Created,
    Destroyed        { index: usize },
    Renamed          { index: usize, name: String },
    Moved            { from: usize, to: usize },
    WallpaperChanged { index: usize, path: String },
}


/// Keeps the per-desktop indexed lists sized to the live desktop count, and reconciles
/// names/wallpapers between the OS and the store in whichever direction the user picked.
/// The capability tier is read once at construction .. it cannot change while we run.
# [ derive (Clone) ]
pub struct SettingsSynchronizer {
    desktops : Desktops,
    settings : Arc <Settings>,
    tier     : CapabilityTier,
}

impl SettingsSynchronizer {

    pub fn new (desktops: Desktops, settings: Arc<Settings>) -> SettingsSynchronizer {
        let tier = desktops.tier();
        SettingsSynchronizer { desktops, settings, tier }
    }

    pub fn tier (&self) -> CapabilityTier { self.tier }

    /// single dispatch point for everything the desktop surface reports
    pub fn handle_event (&self, event: DesktopEvent) {
        log::debug! ("desktop event: {:?}", event);
        let g = &self.settings.general;
        match event {
            DesktopEvent::Created => {
                self.resize_lists (self.desktops.count());
            }
            DesktopEvent::Destroyed { index } => {
                // the count shrank by one at a known position, so this is a compaction
                // of each metadata list rather than a tail truncation
                g.desktop_names.remove_value_at (index);
                g.desktop_background_image_paths.remove_value_at (index);
                g.desktop_background_positions.remove_value_at (index);
                self.resize_lists (self.desktops.count());
            }
            DesktopEvent::Renamed { index, name } => {
                g.desktop_names.set_value (index, name);
            }
            DesktopEvent::Moved { from, to } => {
                // names and paths track desktops natively on tiers that can reorder ..
                // only the position list is ours alone to relocate
                g.desktop_background_positions.move_value (from, to);
            }
            DesktopEvent::WallpaperChanged { index, path } => {
                g.desktop_background_image_paths.set_value (index, path);
            }
        }
        self.settings.save();
    }

    /// size every per-desktop list against `count` .. metadata lists keep trailing user
    /// data, shortcut lists only ever grow
    pub fn resize_lists (&self, count: usize) {
        let g = &self.settings.general;
        g.desktop_names.resize_if_empty (count);
        g.desktop_background_image_paths.resize_if_empty (count);
        g.desktop_background_positions.resize_if_empty (count);
        self.resize_shortcut_lists (count);
    }

    fn resize_shortcut_lists (&self, count: usize) {
        for cat in [&self.settings.key_shortcuts, &self.settings.mouse_shortcuts] {
            cat.switch_to_indices.stretch_to (count);
            cat.move_to_indices.stretch_to (count);
            cat.swap_desktop_indices.stretch_to (count);
        }
    }

    /// startup reconciliation, in the direction the user picked
    pub fn synchronize (&self, override_desktops: bool) {
        if ! self.tier.supports_naming() {
            self.resize_lists (self.desktops.count());
        }
        else if override_desktops {
            self.fit_windows_desktops_with_list();
            self.update_windows_desktops_by_list();
            self.resize_lists (self.desktops.count());
        }
        else {
            self.synchronize_with_windows();
        }
        self.settings.save();
    }

    /// pull: copy each live desktop's name (and wallpaper, if the tier has it) into the store
    pub fn synchronize_with_windows (&self) {
        let count = self.desktops.count();
        self.resize_lists (count);
        let g = &self.settings.general;
        for i in 0..count {
            if let Some(name) = self.desktops.name(i) { g.desktop_names.set_value (i, name) }
            if self.tier.supports_wallpaper() {
                if let Some(path) = self.desktops.wallpaper_path(i) { g.desktop_background_image_paths.set_value (i, path) }
            }
        }
    }

    /// push, phase 1: grow or shrink the live desktop set to match the persisted lists
    pub fn fit_windows_desktops_with_list (&self) {
        let g = &self.settings.general;
        let target = g.desktop_names.len() .max (g.desktop_background_image_paths.len());
        if target == 0 { return }
        while self.desktops.count() < target {
            if self.desktops.create().is_none() { break }
        }
        while self.desktops.count() > target {
            let last = self.desktops.count() - 1;
            if ! self.desktops.remove (last) { break }
        }
    }

    /// push, phase 2: write every persisted name/wallpaper onto the live desktops by position
    pub fn update_windows_desktops_by_list (&self) {
        let g = &self.settings.general;
        for i in 0 .. self.desktops.count() {
            if let Some(name) = g.desktop_names.value(i) {
                if ! name.is_empty() { self.desktops.set_name (i, &name); }
            }
            if self.tier.supports_wallpaper() {
                if let Some(path) = g.desktop_background_image_paths.value(i) {
                    if ! path.is_empty() { self.desktops.set_wallpaper_path (i, &path); }
                }
            }
        }
    }

}




#[cfg(test)]
mod test {
    use super::*;
    use crate::desktops::FakeDesktops;
    use crate::settings::InMemoryProvider;

    fn setup (names: &[&str], tier: CapabilityTier) -> (SettingsSynchronizer, Arc<FakeDesktops>, Arc<Settings>) {
        let fake = Arc::new (FakeDesktops::with_names (names, tier));
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        (SettingsSynchronizer::new (fake.clone(), settings.clone()), fake, settings)
    }

    #[test]
    fn destroy_compacts_the_name_list_in_order () {
        let (sync, fake, settings) = setup (&["a","b","c"], CapabilityTier::Named);
        settings.general.desktop_names.resize (3);
        for (i, n) in ["A","B","C"].iter().enumerate() { settings.general.desktop_names.set_value (i, n.to_string()) }

        fake.remove (1);
        sync.handle_event (DesktopEvent::Destroyed { index: 1 });
        assert_eq! (settings.general.desktop_names.values(), vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn create_grows_every_list () {
        let (sync, fake, settings) = setup (&["a","b"], CapabilityTier::Named);
        sync.resize_lists (fake.count());
        fake.create();
        sync.handle_event (DesktopEvent::Created);
        assert_eq! (settings.general.desktop_names.len(), 3);
        assert_eq! (settings.key_shortcuts.switch_to_indices.len(), 3);
        assert_eq! (settings.mouse_shortcuts.move_to_indices.len(), 3);
    }

    #[test]
    fn rename_and_wallpaper_events_write_single_entries () {
        let (sync, fake, settings) = setup (&["a","b"], CapabilityTier::NamedWallpaper);
        sync.resize_lists (fake.count());
        sync.handle_event (DesktopEvent::Renamed { index: 1, name: "work".into() });
        sync.handle_event (DesktopEvent::WallpaperChanged { index: 0, path: "/w.png".into() });
        assert_eq! (settings.general.desktop_names.value(1), Some("work".into()));
        assert_eq! (settings.general.desktop_background_image_paths.value(0), Some("/w.png".into()));
        // out of range is silently skipped
        sync.handle_event (DesktopEvent::Renamed { index: 9, name: "x".into() });
        assert_eq! (settings.general.desktop_names.len(), 2);
    }

    #[test]
    fn move_event_relocates_only_the_position_list () {
        let (sync, fake, settings) = setup (&["a","b","c"], CapabilityTier::NamedWallpaper);
        sync.resize_lists (fake.count());
        for (i, n) in ["A","B","C"].iter().enumerate() { settings.general.desktop_names.set_value (i, n.to_string()) }
        settings.general.desktop_background_positions.set_value (0, 1);
        sync.handle_event (DesktopEvent::Moved { from: 0, to: 2 });
        assert_eq! (settings.general.desktop_background_positions.value(2), Some(1));
        assert_eq! (settings.general.desktop_names.values(), vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn pull_copies_live_names_into_the_store () {
        let (sync, _, settings) = setup (&["main","work","media"], CapabilityTier::Named);
        sync.synchronize (false);
        assert_eq! (settings.general.desktop_names.values(),
                    vec!["main".to_string(), "work".to_string(), "media".to_string()]);
    }

    #[test]
    fn push_fits_the_live_set_to_the_lists_and_writes_back () {
        let (sync, fake, settings) = setup (&["", ""], CapabilityTier::Named);
        settings.general.desktop_names.resize (4);
        for (i, n) in ["one","two","three","four"].iter().enumerate() { settings.general.desktop_names.set_value (i, n.to_string()) }
        sync.synchronize (true);
        assert_eq! (fake.count(), 4);
        assert_eq! (fake.names(), vec!["one","two","three","four"]);
    }

    #[test]
    fn push_also_shrinks_the_live_set () {
        let (sync, fake, settings) = setup (&["a","b","c","d"], CapabilityTier::Named);
        settings.general.desktop_names.resize (2);
        for (i, n) in ["one","two"].iter().enumerate() { settings.general.desktop_names.set_value (i, n.to_string()) }
        sync.synchronize (true);
        assert_eq! (fake.count(), 2);
    }

    #[test]
    fn basic_tier_only_sizes_lists () {
        let (sync, fake, settings) = setup (&["x","y","z"], CapabilityTier::Basic);
        sync.synchronize (false);
        assert_eq! (settings.general.desktop_names.len(), 3);
        // no naming support, so nothing was pulled
        assert_eq! (settings.general.desktop_names.value(0), Some(String::new()));
        assert_eq! (fake.names(), vec!["x","y","z"]);
    }

}
