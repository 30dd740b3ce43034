
use crate::ShortcutKey;
use crate::inputs::key_codes::KeyCode;
use crate::settings::{Provider, PropertyList, SerializableProperty, SerializationProvider};


pub const GENERAL_CATEGORY        : &str = "General";
pub const KEY_SHORTCUT_CATEGORY   : &str = "ShortcutKey";
pub const MOUSE_SHORTCUT_CATEGORY : &str = "MouseShortcut";


fn key (category: &str, name: &str) -> String { format! ("{}.{}", category, name) }

fn chord (codes: &[u32]) -> ShortcutKey { ShortcutKey::from_codes (codes) }

fn valid_mouse_chord (k: &ShortcutKey) -> bool {
    k.is_none() || k.to_codes().iter().all (|&c| KeyCode::is_valid_mouse_code(c))
}

fn prop <T: crate::settings::PropertyValue> (category: &str, name: &str, provider: &Provider, default: T) -> SerializableProperty<T> {
    SerializableProperty::new (key(category, name), provider, default)
}


/// everything that isn't a shortcut binding .. behavior toggles, notification look,
/// wallpaper config, and the per-desktop indexed lists
pub struct GeneralSettings {
    pub loop_desktop                             : SerializableProperty<bool>,
    pub notification_when_switched_desktop       : SerializableProperty<bool>,
    pub always_show_desktop_notification         : SerializableProperty<bool>,
    pub simple_notification                      : SerializableProperty<bool>,
    pub notification_duration                    : SerializableProperty<i32>,
    pub change_background_each_desktop           : SerializableProperty<bool>,
    pub desktop_background_folder_path           : SerializableProperty<String>,
    pub override_windows_default_key_combination : SerializableProperty<bool>,
    pub suspend_key_detection                    : SerializableProperty<bool>,
    pub first_time                               : SerializableProperty<bool>,
    pub placement                                : SerializableProperty<u32>,
    pub display                                  : SerializableProperty<u32>,
    pub notification_window_style                : SerializableProperty<u32>,
    pub notification_header_alignment            : SerializableProperty<u32>,
    pub notification_body_alignment              : SerializableProperty<u32>,
    pub notification_font_family                 : SerializableProperty<String>,
    pub notification_header_font_size            : SerializableProperty<i32>,
    pub notification_body_font_size              : SerializableProperty<i32>,
    pub notification_line_spacing                : SerializableProperty<i32>,
    pub notification_min_width                   : SerializableProperty<i32>,
    pub simple_notification_min_width            : SerializableProperty<i32>,
    pub pin_window_min_width                     : SerializableProperty<i32>,
    pub notification_min_height                  : SerializableProperty<i32>,
    pub tray_show_desktop                        : SerializableProperty<bool>,
    pub tray_show_only_current_number            : SerializableProperty<bool>,
    pub use_desktop_name                         : SerializableProperty<bool>,
    pub override_desktops_on_startup             : SerializableProperty<bool>,

    pub desktop_names                 : PropertyList<String>,
    pub desktop_background_image_paths: PropertyList<String>,
    pub desktop_background_positions  : PropertyList<u8>,
}

impl GeneralSettings {

    pub fn new (provider: &Provider) -> GeneralSettings {
        let c = GENERAL_CATEGORY;
        GeneralSettings {
            loop_desktop                             : prop (c, "LoopDesktop",                          provider, false),
            notification_when_switched_desktop       : prop (c, "NotificationWhenSwitchedDesktop",      provider, true),
            always_show_desktop_notification         : prop (c, "AlwaysShowDesktopNotification",        provider, false),
            simple_notification                      : prop (c, "SimpleNotification",                   provider, false),
            notification_duration                    : prop (c, "NotificationDuration",                 provider, 2500),
            change_background_each_desktop           : prop (c, "ChangeBackgroundEachDesktop",          provider, false),
            desktop_background_folder_path           : prop (c, "DesktopBackgroundFolderPath",          provider, String::new()),
            override_windows_default_key_combination : prop (c, "OverrideWindowsDefaultKeyCombination", provider, false),
            suspend_key_detection                    : prop (c, "SuspendKeyDetection",                  provider, false),
            first_time                               : prop (c, "FirstTime",                            provider, true),
            placement                                : prop (c, "Placement",                            provider, 5),   // center
            display                                  : prop (c, "Display",                              provider, 0),
            notification_window_style                : prop (c, "NotificationWindowStyle",              provider, 4),
            notification_header_alignment            : prop (c, "NotificationHeaderAlignment",          provider, 0),
            notification_body_alignment              : prop (c, "NotificationBodyAlignment",            provider, 0),
            notification_font_family                 : prop (c, "NotificationFontFamily",               provider, "Segoe UI Light, Yu Gothic UI Light, Meiryo UI".to_string()),
            notification_header_font_size            : prop (c, "NotificationHeaderFontSize",           provider, 18),
            notification_body_font_size              : prop (c, "NotificationBodyFontSize",             provider, 32),
            notification_line_spacing                : prop (c, "NotificationLineSpacing",              provider, -4),
            notification_min_width                   : prop (c, "NotificationMinWidth",                 provider, 500),
            simple_notification_min_width            : prop (c, "SimpleNotificationMinWidth",           provider, 210),
            pin_window_min_width                     : prop (c, "PinWindowMinWidth",                    provider, 400),
            notification_min_height                  : prop (c, "NotificationMinHeight",                provider, 100),
            tray_show_desktop                        : prop (c, "TrayShowDesktop",                      provider, false),
            tray_show_only_current_number            : prop (c, "TrayShowOnlyCurrentNumber",            provider, false),
            use_desktop_name                         : prop (c, "UseDesktopName",                       provider, false),
            override_desktops_on_startup             : prop (c, "OverrideDesktopsOnStartup",            provider, false),

            desktop_names                  : PropertyList::new (key(c, "DesktopNames"),                provider, String::new(), |s| s.is_empty()),
            desktop_background_image_paths : PropertyList::new (key(c, "DesktopBackgroundImagePaths"), provider, String::new(), |s| s.is_empty()),
            desktop_background_positions   : PropertyList::new (key(c, "DesktopBackgroundPositions"),  provider, 4u8, |p| *p == 4),
        }
    }

}




/// one chord binding per operation, plus the per-desktop indexed chord lists ..
/// shared between the keyboard and mouse categories, which differ only in their
/// category name, defaults, and chord-code validity rules
pub struct ShortcutKeySettings {
    pub move_left              : SerializableProperty<ShortcutKey>,
    pub move_left_and_switch   : SerializableProperty<ShortcutKey>,
    pub move_right             : SerializableProperty<ShortcutKey>,
    pub move_right_and_switch  : SerializableProperty<ShortcutKey>,
    pub move_new               : SerializableProperty<ShortcutKey>,
    pub move_new_and_switch    : SerializableProperty<ShortcutKey>,
    pub switch_to_left         : SerializableProperty<ShortcutKey>,
    pub switch_to_right        : SerializableProperty<ShortcutKey>,
    pub close_and_switch_left  : SerializableProperty<ShortcutKey>,
    pub close_and_switch_right : SerializableProperty<ShortcutKey>,
    pub show_task_view         : SerializableProperty<ShortcutKey>,
    pub pin                    : SerializableProperty<ShortcutKey>,
    pub unpin                  : SerializableProperty<ShortcutKey>,
    pub toggle_pin             : SerializableProperty<ShortcutKey>,
    pub pin_app                : SerializableProperty<ShortcutKey>,
    pub unpin_app              : SerializableProperty<ShortcutKey>,
    pub toggle_pin_app         : SerializableProperty<ShortcutKey>,

    pub switch_to_indices      : PropertyList<ShortcutKey>,
    pub move_to_indices        : PropertyList<ShortcutKey>,
    pub swap_desktop_indices   : PropertyList<ShortcutKey>,
}

impl ShortcutKeySettings {

    /// the keyboard category, carrying the stock ctrl-win-arrow style defaults
    pub fn keyboard (provider: &Provider) -> ShortcutKeySettings {
        ShortcutKeySettings::build ( KEY_SHORTCUT_CATEGORY, provider, KeyboardDefaults {
            move_left_and_switch  : chord (&[37, 162, 164, 91]),    // ctrl-alt-win-left
            move_right_and_switch : chord (&[39, 162, 164, 91]),    // ctrl-alt-win-right
            move_new_and_switch   : chord (&[68, 162, 164, 91]),    // ctrl-alt-win-d
            switch_to_left        : chord (&[37, 162, 91]),         // ctrl-win-left
            switch_to_right       : chord (&[39, 162, 91]),         // ctrl-win-right
            toggle_pin            : chord (&[80, 162, 164, 91]),    // ctrl-alt-win-p
        })
    }

    /// the mouse category .. no defaults, and anything persisted that isn't a valid
    /// mouse chord (buttons or wheel pseudo-keys) gets reset to explicitly-none
    pub fn mouse (provider: &Provider) -> ShortcutKeySettings {
        let settings = ShortcutKeySettings::build (MOUSE_SHORTCUT_CATEGORY, provider, KeyboardDefaults::none());
        for p in settings.chord_properties() {
            if ! valid_mouse_chord (&p.get()) {
                log::warn! ("resetting invalid mouse chord at {}", p.key());
                p.overwrite (ShortcutKey::NONE);
            }
        }
        // the indexed chord lists get the same sweep
        for list in [&settings.switch_to_indices, &settings.move_to_indices, &settings.swap_desktop_indices] {
            for i in 0 .. list.len() {
                if let Some (slot) = list.slot(i) {
                    if ! valid_mouse_chord (&slot.get()) {
                        log::warn! ("resetting invalid mouse chord at {}", slot.key());
                        slot.overwrite (ShortcutKey::NONE);
                    }
                }
            }
        }
        settings
    }

    fn build (c: &str, provider: &Provider, defaults: KeyboardDefaults) -> ShortcutKeySettings {
        ShortcutKeySettings {
            move_left              : prop (c, "MoveLeft",           provider, ShortcutKey::NONE),
            move_left_and_switch   : prop (c, "MoveLeftAndSwitch",  provider, defaults.move_left_and_switch),
            move_right             : prop (c, "MoveRight",          provider, ShortcutKey::NONE),
            move_right_and_switch  : prop (c, "MoveRightAndSwitch", provider, defaults.move_right_and_switch),
            move_new               : prop (c, "MoveNew",            provider, ShortcutKey::NONE),
            move_new_and_switch    : prop (c, "MoveNewAndSwitch",   provider, defaults.move_new_and_switch),
            switch_to_left         : prop (c, "SwitchToLeft",       provider, defaults.switch_to_left),
            switch_to_right        : prop (c, "SwitchToRight",      provider, defaults.switch_to_right),
            close_and_switch_left  : prop (c, "CloseAndSwitchLeft", provider, ShortcutKey::NONE),
            close_and_switch_right : prop (c, "CloseAndSwitchRight",provider, ShortcutKey::NONE),
            show_task_view         : prop (c, "ShowTaskView",       provider, ShortcutKey::NONE),
            pin                    : prop (c, "Pin",                provider, ShortcutKey::NONE),
            unpin                  : prop (c, "Unpin",              provider, ShortcutKey::NONE),
            toggle_pin             : prop (c, "TogglePin",          provider, defaults.toggle_pin),
            pin_app                : prop (c, "PinApp",             provider, ShortcutKey::NONE),
            unpin_app              : prop (c, "UnpinApp",           provider, ShortcutKey::NONE),
            toggle_pin_app         : prop (c, "TogglePinApp",       provider, ShortcutKey::NONE),

            switch_to_indices      : PropertyList::new (key(c, "SwitchToIndices"),    provider, ShortcutKey::NONE, |k| k.is_none()),
            move_to_indices        : PropertyList::new (key(c, "MoveToIndices"),      provider, ShortcutKey::NONE, |k| k.is_none()),
            swap_desktop_indices   : PropertyList::new (key(c, "SwapDesktopIndices"), provider, ShortcutKey::NONE, |k| k.is_none()),
        }
    }

    fn chord_properties (&self) -> [&SerializableProperty<ShortcutKey>; 17] { [
        &self.move_left, &self.move_left_and_switch, &self.move_right, &self.move_right_and_switch,
        &self.move_new, &self.move_new_and_switch, &self.switch_to_left, &self.switch_to_right,
        &self.close_and_switch_left, &self.close_and_switch_right, &self.show_task_view,
        &self.pin, &self.unpin, &self.toggle_pin, &self.pin_app, &self.unpin_app, &self.toggle_pin_app,
    ] }

}

struct KeyboardDefaults {
    move_left_and_switch  : ShortcutKey,
    move_right_and_switch : ShortcutKey,
    move_new_and_switch   : ShortcutKey,
    switch_to_left        : ShortcutKey,
    switch_to_right       : ShortcutKey,
    toggle_pin            : ShortcutKey,
}
impl KeyboardDefaults {
    fn none () -> KeyboardDefaults { KeyboardDefaults {
        move_left_and_switch: ShortcutKey::NONE, move_right_and_switch: ShortcutKey::NONE,
        move_new_and_switch: ShortcutKey::NONE, switch_to_left: ShortcutKey::NONE,
        switch_to_right: ShortcutKey::NONE, toggle_pin: ShortcutKey::NONE,
    } }
}




/// the full settings bundle, built once at startup and handed to whoever needs it
pub struct Settings {
    pub provider        : Provider,
    pub general         : GeneralSettings,
    pub key_shortcuts   : ShortcutKeySettings,
    pub mouse_shortcuts : ShortcutKeySettings,
}

impl Settings {

    pub fn new (provider: Provider) -> Settings {
        provider.load();
        Settings {
            general         : GeneralSettings::new (&provider),
            key_shortcuts   : ShortcutKeySettings::keyboard (&provider),
            mouse_shortcuts : ShortcutKeySettings::mouse (&provider),
            provider,
        }
    }

    pub fn save (&self) {
        if let Err(e) = self.provider.save() { log::error! ("settings save failed: {}", e) }
    }

}
