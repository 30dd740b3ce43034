
use std::sync::{Arc, Mutex};

use derive_deref::Deref;

use crate::ShortcutKey;
use crate::app::{NotificationService, PinTarget, WallpaperService};
use crate::desktops::{DesktopService, SettingsSynchronizer, VirtualDesktops};
use crate::settings::{SerializableProperty, Settings, ShortcutKeySettings};
use crate::shortcuts::{HookActionHandle, HookError, HookService, ShortcutAF, ShortcutGetter};


// the chords windows itself binds natively .. we only ever claim these when the user
// asks us to take them over (or needs loop wraparound on them)
fn windows_default_switch_left  () -> ShortcutKey { ShortcutKey::from_codes (&[37, 162, 91]) }
fn windows_default_switch_right () -> ShortcutKey { ShortcutKey::from_codes (&[39, 162, 91]) }


pub struct _ApplicationPreparation {
    pub settings      : Arc <Settings>,
    pub hook          : HookService,
    pub desktops      : DesktopService,
    pub notifications : NotificationService,
    pub wallpapers    : WallpaperService,
    pub synchronizer  : SettingsSynchronizer,
    handles           : Mutex <Vec <HookActionHandle>>,
}

/// Glues everything together .. sizes the indexed lists, builds the hook registries
/// from settings, and rebuilds them on every reload. Cheaply clonable so the closures
/// handed to the hook service can carry it around.
# [ derive (Clone, Deref) ]
pub struct ApplicationPreparation ( Arc <_ApplicationPreparation> );

impl ApplicationPreparation {

    pub fn new (
        settings: Arc<Settings>, hook: HookService, desktops: DesktopService,
        notifications: NotificationService, wallpapers: WallpaperService, synchronizer: SettingsSynchronizer,
    ) -> ApplicationPreparation {
        let ap = ApplicationPreparation ( Arc::new ( _ApplicationPreparation {
            settings, hook, desktops, notifications, wallpapers, synchronizer,
            handles: Mutex::new (Vec::new()),
        } ) );
        { let apc = ap.clone();  ap.hook.set_reload   (Arc::new (move || apc.register_actions())); }
        { let apc = ap.clone();  ap.hook.on_suspended (Arc::new (move || apc.resize_property_lists())); }
        ap
    }

    /// startup path: reconcile with the OS, bind everything, start capturing
    pub fn prepare (&self) -> Result<(), HookError> {
        self.synchronizer.synchronize (self.settings.general.override_desktops_on_startup.get());
        self.register_actions();
        if ! self.settings.general.suspend_key_detection.get() {
            self.hook.start()?;
        }
        Ok(())
    }

    pub fn resize_property_lists (&self) {
        self.synchronizer.resize_lists (self.desktops.desktops().count());
    }

    pub fn register_actions (&self) {
        self.resize_property_lists();
        let mut handles = self.handles.lock().unwrap();
        // stale handles point at registrations the reload already cleared
        handles.clear();
        self.register_category (&mut handles, false);
        self.register_category (&mut handles, true);
        log::debug! ("registered shortcut actions for {} desktops", self.desktops.desktops().count());
    }

    fn switched (&self, target: Option<usize>) {
        if let Some (index) = target {
            self.notifications.notify_switched (index);
            self.wallpapers.on_desktop_switched (index);
        }
    }

    fn register_category (&self, handles: &mut Vec<HookActionHandle>, mouse: bool) {

        fn keyboard_cat (s: &Settings) -> &ShortcutKeySettings { &s.key_shortcuts }
        fn mouse_cat    (s: &Settings) -> &ShortcutKeySettings { &s.mouse_shortcuts }
        let cat : fn (&Settings) -> &ShortcutKeySettings = if mouse { mouse_cat } else { keyboard_cat };

        // shortcut getters re-read settings at dispatch time, so an edit mid-session
        // takes effect without waiting for the reload
        let getter = |pick: fn (&ShortcutKeySettings) -> &SerializableProperty<ShortcutKey>| -> ShortcutGetter {
            let settings = self.settings.clone();
            Arc::new ( move || pick (cat (&settings)) .get() )
        };
        let reg = |handles: &mut Vec<HookActionHandle>, get: ShortcutGetter, af: ShortcutAF| {
            let handle = if mouse { self.hook.register_mouse_action (get, af) }
                         else    { self.hook.register_key_action (get, af) };
            handles.push (handle);
        };

        macro_rules! action { (|$ap:ident, $w:ident| $body:expr) => { {
            let $ap = self.clone();
            let af : ShortcutAF = Arc::new ( move |$w: crate::WindowHandle| { $body; } );
            af
        } } }

        reg (handles, getter (|c| &c.move_left),             action! { |ap, w| { let _ = ap.desktops.move_window_left (w, false); } });
        reg (handles, getter (|c| &c.move_left_and_switch),  action! { |ap, w| { let t = ap.desktops.move_window_left (w, true); ap.switched (t) } });
        reg (handles, getter (|c| &c.move_right),            action! { |ap, w| { let _ = ap.desktops.move_window_right (w, false); } });
        reg (handles, getter (|c| &c.move_right_and_switch), action! { |ap, w| { let t = ap.desktops.move_window_right (w, true); ap.switched (t) } });
        reg (handles, getter (|c| &c.move_new),              action! { |ap, w| { let _ = ap.desktops.move_window_new (w, false); } });
        reg (handles, getter (|c| &c.move_new_and_switch),   action! { |ap, w| { let t = ap.desktops.move_window_new (w, true); ap.switched (t) } });

        if ! mouse {
            // claim the native switch combos only when taking them over (or when those
            // combos need wraparound the OS won't do)
            let g = &self.settings.general;
            if g.override_windows_default_key_combination.get() || g.loop_desktop.get() {
                reg (handles, Arc::new (windows_default_switch_left),  action! { |ap, _w| { let t = ap.desktops.switch_left();  ap.switched (t) } });
                reg (handles, Arc::new (windows_default_switch_right), action! { |ap, _w| { let t = ap.desktops.switch_right(); ap.switched (t) } });
            }
        }

        reg (handles, getter (|c| &c.switch_to_left),  action! { |ap, _w| { let t = ap.desktops.switch_left();  ap.switched (t) } });
        reg (handles, getter (|c| &c.switch_to_right), action! { |ap, _w| { let t = ap.desktops.switch_right(); ap.switched (t) } });

        reg (handles, getter (|c| &c.close_and_switch_left),  action! { |ap, w| { let t = ap.desktops.close_and_switch_left (w);  ap.switched (t) } });
        reg (handles, getter (|c| &c.close_and_switch_right), action! { |ap, w| { let t = ap.desktops.close_and_switch_right (w); ap.switched (t) } });

        reg (handles, getter (|c| &c.show_task_view), action! { |ap, _w| ap.desktops.show_task_view() });

        reg (handles, getter (|c| &c.pin),        action! { |ap, w| if ap.desktops.pin_window (w)   { ap.notifications.notify_pin (PinTarget::Window, true) } });
        reg (handles, getter (|c| &c.unpin),      action! { |ap, w| if ap.desktops.unpin_window (w) { ap.notifications.notify_pin (PinTarget::Window, false) } });
        reg (handles, getter (|c| &c.toggle_pin), action! { |ap, w| { let pinned = ap.desktops.toggle_window_pin (w); ap.notifications.notify_pin (PinTarget::Window, pinned) } });

        reg (handles, getter (|c| &c.pin_app),        action! { |ap, w| if ap.desktops.pin_app (w)   { ap.notifications.notify_pin (PinTarget::App, true) } });
        reg (handles, getter (|c| &c.unpin_app),      action! { |ap, w| if ap.desktops.unpin_app (w) { ap.notifications.notify_pin (PinTarget::App, false) } });
        reg (handles, getter (|c| &c.toggle_pin_app), action! { |ap, w| { let pinned = ap.desktops.toggle_app_pin (w); ap.notifications.notify_pin (PinTarget::App, pinned) } });

        // one registration per desktop, bounded by whichever of live count and list
        // length is smaller at registration time
        let count = self.desktops.desktops().count();
        let c = cat (&self.settings);

        for i in 0 .. count.min (c.switch_to_indices.len()) {
            let get = { let s = self.settings.clone();
                        Arc::new (move || cat (&s).switch_to_indices.value(i).unwrap_or (ShortcutKey::NONE)) };
            reg (handles, get, action! { |ap, _w| { let t = ap.desktops.switch_to_index (i); ap.switched (t) } });
        }
        for i in 0 .. count.min (c.move_to_indices.len()) {
            let get = { let s = self.settings.clone();
                        Arc::new (move || cat (&s).move_to_indices.value(i).unwrap_or (ShortcutKey::NONE)) };
            reg (handles, get, action! { |ap, w| { let t = ap.desktops.move_window_to_index (w, i, true); ap.switched (t) } });
        }
        for i in 0 .. count.min (c.swap_desktop_indices.len()) {
            let get = { let s = self.settings.clone();
                        Arc::new (move || cat (&s).swap_desktop_indices.value(i).unwrap_or (ShortcutKey::NONE)) };
            reg (handles, get, action! { |ap, _w| {
                let from = ap.desktops.desktops().current();
                if ap.desktops.swap_current_with (i) { ap.notifications.notify_moved (from, i) }
            } });
        }
    }

}




#[cfg(test)]
mod test {
    use std::time::Duration;
    use super::*;
    use crate::desktops::{CapabilityTier, FakeDesktops};
    use crate::app::notification::NullPresenter;
    use crate::app::wallpaper::SystemWallpaper;
    use crate::settings::InMemoryProvider;

    struct NoWallpaper;
    impl SystemWallpaper for NoWallpaper {
        fn set (&self, _p: &str, _pos: crate::app::WallpaperPosition) -> bool { true }
    }

    #[derive (Default)]
    struct RecordingPresenter ( std::sync::Mutex <Vec <crate::app::Notification>> );
    impl crate::app::NotificationPresenter for RecordingPresenter {
        fn show (&self, n: crate::app::Notification, _d: Duration) { self.0.lock().unwrap().push(n) }
    }

    fn stack (desktop_count: usize) -> (ApplicationPreparation, Arc<FakeDesktops>, Arc<Settings>) {
        let fake = Arc::new (FakeDesktops::new (desktop_count, CapabilityTier::Named));
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        let hook = HookService::new();
        let desktops = DesktopService::new (fake.clone(), settings.clone());
        let notifications = NotificationService::new (settings.clone(), Arc::new (NullPresenter));
        let wallpapers = WallpaperService::new (settings.clone(), Arc::new (NoWallpaper));
        let synchronizer = SettingsSynchronizer::new (fake.clone(), settings.clone());
        let ap = ApplicationPreparation::new (settings.clone(), hook, desktops, notifications, wallpapers, synchronizer);
        (ap, fake, settings)
    }

    fn wait_for (pred: impl Fn() -> bool) -> bool {
        for _ in 0..200 {
            if pred() { return true }
            std::thread::sleep (Duration::from_millis (5));
        }
        false
    }

    fn press_chord (ap: &ApplicationPreparation, codes: &[u32]) -> bool {
        use crate::inputs::key_codes::KeyCode;
        let detector = &ap.hook.detector;
        let (&key, modifiers) = codes.split_first().unwrap();
        for &m in modifiers { detector.handle_key_down (KeyCode::from(m)); }
        let handled = detector.handle_key_down (KeyCode::from(key));
        detector.handle_key_up (KeyCode::from(key));
        for &m in modifiers { detector.handle_key_up (KeyCode::from(m)); }
        handled
    }

    #[test]
    fn default_switch_chord_drives_the_fake_desktops () {
        let (ap, fake, _) = stack (3);
        ap.prepare().unwrap();
        assert! (press_chord (&ap, &[39, 162, 91]));     // ctrl-win-right
        assert! (wait_for (|| fake.current() == 1));
        assert! (press_chord (&ap, &[37, 162, 91]));
        assert! (wait_for (|| fake.current() == 0));
    }

    #[test]
    fn unbound_chords_are_not_consumed () {
        let (ap, _, _) = stack (2);
        ap.prepare().unwrap();
        assert! (! press_chord (&ap, &[65, 162]));       // ctrl-a is nobody's binding
    }

    #[test]
    fn per_index_bindings_capture_their_own_index () {
        let (ap, fake, settings) = stack (4);
        ap.prepare().unwrap();
        settings.key_shortcuts.switch_to_indices.set_value (2, ShortcutKey::from_codes (&[51, 164]));    // alt-3
        ap.hook.reload();

        assert! (press_chord (&ap, &[51, 164]));
        assert! (wait_for (|| fake.current() == 2));
    }

    #[test]
    fn per_index_bindings_stop_at_the_live_desktop_count () {
        let (ap, _, settings) = stack (2);
        ap.prepare().unwrap();
        settings.key_shortcuts.switch_to_indices.stretch_to (5);
        settings.key_shortcuts.switch_to_indices.set_value (4, ShortcutKey::from_codes (&[53, 164]));
        ap.hook.reload();
        // desktop 5 does not exist, so its chord stays unclaimed
        assert! (! press_chord (&ap, &[53, 164]));
    }

    #[test]
    fn rebinding_takes_effect_after_reload () {
        let (ap, fake, settings) = stack (3);
        ap.prepare().unwrap();
        settings.key_shortcuts.switch_to_right.set (ShortcutKey::from_codes (&[78, 162]));   // ctrl-n
        ap.hook.reload();

        assert! (press_chord (&ap, &[78, 162]));
        assert! (wait_for (|| fake.current() == 1));
    }

    #[test]
    fn toggle_pin_round_trips_through_the_foreground_window () {
        let (ap, fake, _) = stack (2);
        ap.prepare().unwrap();
        let w = crate::utils::get_foreground_window();
        assert! (press_chord (&ap, &[80, 162, 164, 91]));
        assert! (wait_for (|| fake.is_window_pinned (w)));
        assert! (press_chord (&ap, &[80, 162, 164, 91]));
        assert! (wait_for (|| ! fake.is_window_pinned (w)));
    }

    #[test]
    fn mouse_wheel_chord_switches_desktops () {
        let (ap, fake, settings) = stack (3);
        ap.prepare().unwrap();
        settings.mouse_shortcuts.switch_to_right.set (ShortcutKey::from_codes (&[524289, 2]));   // rbutton + wheel-down
        ap.hook.reload();

        let detector = &ap.hook.detector;
        detector.handle_button_down (crate::inputs::key_codes::KeyCode::RightButton);
        assert! (detector.handle_wheel (-120));
        detector.handle_button_up (crate::inputs::key_codes::KeyCode::RightButton);
        assert! (wait_for (|| fake.current() == 1));
    }

    #[test]
    fn loop_setting_claims_the_native_combos_for_wraparound () {
        let (ap, fake, settings) = stack (3);
        settings.general.loop_desktop.set (true);
        // give the user chords different bindings so the native combo registration is
        // the one that matches
        settings.key_shortcuts.switch_to_left.set (ShortcutKey::from_codes (&[72, 162]));
        settings.key_shortcuts.switch_to_right.set (ShortcutKey::from_codes (&[76, 162]));
        ap.prepare().unwrap();

        assert! (press_chord (&ap, &[37, 162, 91]));
        assert! (wait_for (|| fake.current() == 2));
    }

    #[test]
    fn swap_chord_reorders_and_raises_the_moved_notification () {
        let fake = Arc::new (FakeDesktops::with_names (&["a","b","c"], CapabilityTier::NamedWallpaper));
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        let rec = Arc::new (RecordingPresenter::default());
        let desktops = DesktopService::new (fake.clone(), settings.clone());
        let notifications = NotificationService::new (settings.clone(), rec.clone());
        let wallpapers = WallpaperService::new (settings.clone(), Arc::new (NoWallpaper));
        let synchronizer = SettingsSynchronizer::new (fake.clone(), settings.clone());
        let ap = ApplicationPreparation::new (settings.clone(), HookService::new(), desktops, notifications, wallpapers, synchronizer);
        ap.prepare().unwrap();
        settings.key_shortcuts.swap_desktop_indices.set_value (2, ShortcutKey::from_codes (&[51, 162, 164]));    // ctrl-alt-3
        ap.hook.reload();

        assert! (press_chord (&ap, &[51, 162, 164]));
        assert! (wait_for (|| fake.names() == vec!["c", "b", "a"]));
        assert! (wait_for (|| ! rec.0.lock().unwrap().is_empty()));
        let seen = rec.0.lock().unwrap();
        assert_eq! (seen[0].header, "Desktop 1 Moved to Desktop 3");
    }

    #[test]
    fn suspend_key_detection_defers_the_hook_start () {
        let (ap, _, settings) = stack (2);
        settings.general.suspend_key_detection.set (true);
        ap.prepare().unwrap();
        assert! (! ap.hook.detector.is_started());
    }

}
