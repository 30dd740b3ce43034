
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::*;



// we'll define some easier type aliases to pass around triggered actions and so on
/// Arc/Action-Function representation for a shortcut-triggered action .. receives the foreground window
pub type ShortcutAF = Arc <dyn Fn (WindowHandle) + Send + Sync + 'static>;

/// lazily evaluated shortcut getter .. registrations hold these so a rebind takes effect without re-registering
pub type ShortcutGetter = Arc <dyn Fn() -> ShortcutKey + Send + Sync + 'static>;

/// guard predicate checked at dispatch time before a registered action fires
pub type CanExecuteFn = Arc <dyn Fn() -> bool + Send + Sync + 'static>;



/// opaque OS window handle .. we only ever pass it through to the platform layer
#[derive(Debug, Default, Eq, PartialEq, Hash, Copy, Clone)]
pub struct WindowHandle (pub isize);



# [ derive (Debug, Default, Clone) ]
/// simple sugar over an Arc'd AtomicBool that helps reduce clutter in code
pub struct Flag (Arc<AtomicBool>);

impl Flag {
    pub fn new (state:bool) -> Flag { Flag ( Arc::new ( AtomicBool::new(state) ) ) }

    pub fn set   (&self) { self.0 .store (true,  Ordering::SeqCst) }
    pub fn clear (&self) { self.0 .store (false, Ordering::SeqCst) }

    pub fn is_set   (&self) -> bool { true  == self.0 .load (Ordering::SeqCst) }
    pub fn is_clear (&self) -> bool { false == self.0 .load (Ordering::SeqCst) }
}



/// Represents one chord .. a non-modifier key (or mouse button / wheel pseudo-key) plus the set of
/// modifier keys/buttons held at the moment of the event. Equality ignores modifier ordering.
#[derive(Debug, Clone)]
pub struct ShortcutKey {
    pub key       : KeyCode,
    pub modifiers : Vec<KeyCode>,
}

impl ShortcutKey {

    /// sentinel for 'unbound' .. registering an action against it is accepted as a no-op
    pub const NONE : ShortcutKey = ShortcutKey { key: KeyCode::None, modifiers: Vec::new() };

    pub fn new (key: KeyCode, modifiers: impl IntoIterator<Item = KeyCode>) -> ShortcutKey {
        ShortcutKey { key, modifiers: modifiers.into_iter().collect() }
    }

    pub fn is_none (&self) -> bool { self.key == KeyCode::None }

    /// builds a chord from its persisted code sequence .. [main, modifier, modifier, ..]
    pub fn from_codes (codes: &[u32]) -> ShortcutKey {
        match codes.split_first() {
            None => ShortcutKey::NONE,
            Some ((key, mods)) => ShortcutKey {
                key       : KeyCode::from(*key),
                modifiers : mods.iter().map(|c| KeyCode::from(*c)).collect(),
            },
        }
    }

    /// the persisted code sequence for this chord .. empty for the 'none' sentinel
    pub fn to_codes (&self) -> Vec<u32> {
        if self.is_none() { return Vec::new() }
        std::iter::once (u32::from(self.key))
            .chain (self.modifiers.iter().map(|m| u32::from(*m)))
            .collect()
    }

}

// equality is key + modifier-SET .. two chords with the same modifiers in different order are the same chord
impl PartialEq for ShortcutKey {
    fn eq (&self, other: &ShortcutKey) -> bool {
        self.key == other.key
            && self.modifiers.len() == other.modifiers.len()
            && self.modifiers.iter().all (|m| other.modifiers.contains(m))
            && other.modifiers.iter().all (|m| self.modifiers.contains(m))
    }
}
impl Eq for ShortcutKey {}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equality_ignores_modifier_order() {
        let a = ShortcutKey::new (KeyCode::A, [KeyCode::LCtrl, KeyCode::LShift]);
        let b = ShortcutKey::new (KeyCode::A, [KeyCode::LShift, KeyCode::LCtrl]);
        assert_eq! (a, b);

        let c = ShortcutKey::new (KeyCode::A, [KeyCode::LCtrl]);
        assert_ne! (a, c);
        assert_ne! (a, ShortcutKey::new (KeyCode::B, [KeyCode::LCtrl, KeyCode::LShift]));
    }

    #[test]
    fn codes_round_trip() {
        let sk = ShortcutKey::from_codes (&[37, 162, 91]);
        assert_eq! (sk.key, KeyCode::Left);
        assert_eq! (sk.to_codes(), vec![37, 162, 91]);

        assert! (ShortcutKey::from_codes(&[]).is_none());
        assert! (ShortcutKey::NONE.to_codes().is_empty());
    }
}
