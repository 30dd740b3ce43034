
use std::sync::{Arc, RwLock};

use derive_deref::Deref;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::*;


/// raised when the OS denies one of the low-level hooks .. fatal to detection but must not crash the app,
/// the composition root is expected to catch and log it
# [ derive (Debug, Error) ]
pub enum HookError {
    #[error ("installing the low-level {hook} hook failed (os error {code})")]
    Install { hook: &'static str, code: u32 },
}


/// chord listeners return true to mark the event handled (which suppresses it from the rest of the OS)
pub type ChordHandler = Arc <dyn Fn (&ShortcutKey) -> bool + Send + Sync + 'static>;



pub struct _ShortcutKeyDetector {
    // held modifier keys (keyboard) and held buttons (mouse) .. the two chord spaces are tracked independently
    pressed_modifiers : RwLock <FxHashSet <KeyCode>>,
    pressed_buttons   : RwLock <FxHashSet <KeyCode>>,

    started   : Flag,
    suspended : Flag,

    key_pressed  : RwLock <Option <ChordHandler>>,
    key_released : RwLock <Option <ChordHandler>>,
    btn_pressed  : RwLock <Option <ChordHandler>>,
    btn_released : RwLock <Option <ChordHandler>>,
}

# [ derive (Clone, Deref) ]
pub struct ShortcutKeyDetector ( Arc <_ShortcutKeyDetector> );
// ^^ Arc wrapped so cloning and passing around (incl into the hook procs) is cheap



impl ShortcutKeyDetector {

    pub fn new() -> ShortcutKeyDetector {
        ShortcutKeyDetector ( Arc::new ( _ShortcutKeyDetector {
            pressed_modifiers : RwLock::new (FxHashSet::default()),
            pressed_buttons   : RwLock::new (FxHashSet::default()),
            started           : Flag::default(),
            suspended         : Flag::default(),
            key_pressed       : RwLock::new (None),
            key_released      : RwLock::new (None),
            btn_pressed       : RwLock::new (None),
            btn_released      : RwLock::new (None),
        } ) )
    }

    pub fn on_key_pressed  (&self, cb: ChordHandler) { *self.key_pressed  .write().unwrap() = Some(cb) }
    pub fn on_key_released (&self, cb: ChordHandler) { *self.key_released .write().unwrap() = Some(cb) }
    pub fn on_btn_pressed  (&self, cb: ChordHandler) { *self.btn_pressed  .write().unwrap() = Some(cb) }
    pub fn on_btn_released (&self, cb: ChordHandler) { *self.btn_released .write().unwrap() = Some(cb) }


    /// Starts capturing .. installs the OS hooks on first call, later calls only clear the suspension flag
    pub fn start (&self) -> Result<(), HookError> {
        if self.started.is_clear() {
            #[cfg (windows)]
            crate::inputs::hooks::install (self.clone())?;
            self.started.set();
        }
        self.suspended.clear();
        Ok(())
    }

    /// Stops dispatching (hooks stay installed) and flushes held-modifier state so nothing is left stuck
    pub fn stop (&self) {
        self.suspended.set();
        self.pressed_modifiers .write().unwrap() .clear();
        self.pressed_buttons   .write().unwrap() .clear();
    }

    pub fn is_suspended (&self) -> bool { self.suspended.is_set() }
    pub fn is_started   (&self) -> bool { self.started.is_set() }

    fn invoke (slot: &RwLock<Option<ChordHandler>>, chord: &ShortcutKey) -> bool {
        let cb = slot.read().unwrap().clone();
        cb .map (|cb| cb(chord)) .unwrap_or (false)
    }

    fn keyboard_chord (&self, key: KeyCode) -> ShortcutKey {
        ShortcutKey::new (key, self.pressed_modifiers.read().unwrap().iter().copied())
    }
    fn mouse_chord (&self, key: KeyCode) -> ShortcutKey {
        ShortcutKey::new (key, self.pressed_buttons.read().unwrap().iter().copied())
    }


    // .. the entry points below are called from the hook procs (and driven directly by tests)

    /// key-down .. modifiers update held state silently, anything else resolves a chord and raises 'pressed'
    pub fn handle_key_down (&self, key: KeyCode) -> bool {
        if self.suspended.is_set() { return false }

        if key.is_modifier() {
            self.pressed_modifiers .write().unwrap() .insert (key);
            false
        } else {
            Self::invoke (&self.key_pressed, &self.keyboard_chord(key))
        }
    }

    /// key-up mirrors key-down, with the modifier set as of release time
    pub fn handle_key_up (&self, key: KeyCode) -> bool {
        if self.suspended.is_set() { return false }

        if key.is_modifier() {
            self.pressed_modifiers .write().unwrap() .remove (&key);
            false
        } else {
            Self::invoke (&self.key_released, &self.keyboard_chord(key))
        }
    }

    /// button-down raises 'pressed' with the buttons held BEFORE this one .. so the latest press is the chord
    /// key and earlier-held buttons are its modifiers (documented existing behavior, asymmetric w keyboard)
    pub fn handle_button_down (&self, key: KeyCode) -> bool {
        if self.suspended.is_set() { return false }
        if !key.is_mouse_button() { return false }

        let handled = Self::invoke (&self.btn_pressed, &self.mouse_chord(key));
        self.pressed_buttons .write().unwrap() .insert (key);
        handled
    }

    /// button-up removes from held state first, then raises 'released' with the remaining buttons
    pub fn handle_button_up (&self, key: KeyCode) -> bool {
        if self.suspended.is_set() { return false }
        if !key.is_mouse_button() { return false }

        self.pressed_buttons .write().unwrap() .remove (&key);
        Self::invoke (&self.btn_released, &self.mouse_chord(key))
    }

    /// wheel rotation maps to the WheelUp/WheelDown pseudo-keys, with held buttons as modifiers .. there is
    /// no held state for the wheel itself, and no 'released' counterpart
    pub fn handle_wheel (&self, delta: i32) -> bool {
        if self.suspended.is_set() { return false }

        let key = if delta > 0 { KeyCode::WheelUp } else { KeyCode::WheelDown };
        Self::invoke (&self.btn_pressed, &self.mouse_chord(key))
    }

}
