
use strum_macros::EnumIter;


// mouse-button codes live in the same virtual-key space as keyboard keys (1..=6, with 3 reserved for Cancel),
// and the wheel pseudo-keys sit far above it .. we keep the exact historical values so persisted chords round-trip
pub const WHEEL_DOWN_CODE : u32 = 524289;
pub const WHEEL_UP_CODE   : u32 = 524290;


/// Enum representation of the virtual-key code space .. covers keyboard keys, mouse buttons, and the
/// wheel pseudo-keys, with an escape hatch for anything we dont have a name for
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, EnumIter)]
pub enum KeyCode {
    None,

    LeftButton,
    RightButton,
    Cancel,
    MiddleButton,
    XButton1,
    XButton2,

    Backspace,
    Tab,
    Enter,
    Shift,
    Ctrl,
    Alt,
    Pause,
    CapsLock,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Insert,
    Delete,

    D0, D1, D2, D3, D4, D5, D6, D7, D8, D9,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    LWin,
    RWin,
    Apps,

    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    LShift,
    RShift,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,

    // pseudo-keys reported for wheel rotation .. matchable as the 'key' of a chord, never as a modifier
    WheelDown,
    WheelUp,

    #[strum(disabled)]
    Other(u32),
}


impl From<u32> for KeyCode {
    fn from (code: u32) -> KeyCode {
        use KeyCode::*;
        match code {
            0   => None,
            1   => LeftButton,
            2   => RightButton,
            3   => Cancel,
            4   => MiddleButton,
            5   => XButton1,
            6   => XButton2,
            8   => Backspace,
            9   => Tab,
            13  => Enter,
            16  => Shift,
            17  => Ctrl,
            18  => Alt,
            19  => Pause,
            20  => CapsLock,
            27  => Escape,
            32  => Space,
            33  => PageUp,
            34  => PageDown,
            35  => End,
            36  => Home,
            37  => Left,
            38  => Up,
            39  => Right,
            40  => Down,
            45  => Insert,
            46  => Delete,
            48  => D0, 49 => D1, 50 => D2, 51 => D3, 52 => D4,
            53  => D5, 54 => D6, 55 => D7, 56 => D8, 57 => D9,
            65  => A, 66 => B, 67 => C, 68 => D, 69 => E, 70 => F, 71 => G,
            72  => H, 73 => I, 74 => J, 75 => K, 76 => L, 77 => M, 78 => N,
            79  => O, 80 => P, 81 => Q, 82 => R, 83 => S, 84 => T, 85 => U,
            86  => V, 87 => W, 88 => X, 89 => Y, 90 => Z,
            91  => LWin,
            92  => RWin,
            93  => Apps,
            96  => Numpad0, 97  => Numpad1, 98  => Numpad2, 99  => Numpad3, 100 => Numpad4,
            101 => Numpad5, 102 => Numpad6, 103 => Numpad7, 104 => Numpad8, 105 => Numpad9,
            112 => F1, 113 => F2,  114 => F3,  115 => F4,
            116 => F5, 117 => F6,  118 => F7,  119 => F8,
            120 => F9, 121 => F10, 122 => F11, 123 => F12,
            160 => LShift,
            161 => RShift,
            162 => LCtrl,
            163 => RCtrl,
            164 => LAlt,
            165 => RAlt,
            WHEEL_DOWN_CODE => WheelDown,
            WHEEL_UP_CODE   => WheelUp,
            c   => Other(c),
    } }
}

impl From<KeyCode> for u32 {
    fn from (key: KeyCode) -> u32 {
        use KeyCode::*;
        match key {
            None         => 0,
            LeftButton   => 1,
            RightButton  => 2,
            Cancel       => 3,
            MiddleButton => 4,
            XButton1     => 5,
            XButton2     => 6,
            Backspace    => 8,
            Tab          => 9,
            Enter        => 13,
            Shift        => 16,
            Ctrl         => 17,
            Alt          => 18,
            Pause        => 19,
            CapsLock     => 20,
            Escape       => 27,
            Space        => 32,
            PageUp       => 33,
            PageDown     => 34,
            End          => 35,
            Home         => 36,
            Left         => 37,
            Up           => 38,
            Right        => 39,
            Down         => 40,
            Insert       => 45,
            Delete       => 46,
            D0 => 48, D1 => 49, D2 => 50, D3 => 51, D4 => 52,
            D5 => 53, D6 => 54, D7 => 55, D8 => 56, D9 => 57,
            A => 65, B => 66, C => 67, D => 68, E => 69, F => 70, G => 71,
            H => 72, I => 73, J => 74, K => 75, L => 76, M => 77, N => 78,
            O => 79, P => 80, Q => 81, R => 82, S => 83, T => 84, U => 85,
            V => 86, W => 87, X => 88, Y => 89, Z => 90,
            LWin => 91,
            RWin => 92,
            Apps => 93,
            Numpad0 => 96,  Numpad1 => 97,  Numpad2 => 98,  Numpad3 => 99,  Numpad4 => 100,
            Numpad5 => 101, Numpad6 => 102, Numpad7 => 103, Numpad8 => 104, Numpad9 => 105,
            F1 => 112, F2  => 113, F3  => 114, F4  => 115,
            F5 => 116, F6  => 117, F7  => 118, F8  => 119,
            F9 => 120, F10 => 121, F11 => 122, F12 => 123,
            LShift => 160,
            RShift => 161,
            LCtrl  => 162,
            RCtrl  => 163,
            LAlt   => 164,
            RAlt   => 165,
            WheelDown => WHEEL_DOWN_CODE,
            WheelUp   => WHEEL_UP_CODE,
            Other(c)  => c,
    } }
}


impl KeyCode {

    /// returns true for the Ctrl/Alt/Shift/Win family .. these only ever qualify a chord, never trigger one
    pub fn is_modifier (self) -> bool {
        use KeyCode::*;
        matches! ( self,
            Shift | Ctrl | Alt | LWin | RWin | LShift | RShift | LCtrl | RCtrl | LAlt | RAlt
        )
    }

    /// returns true for codes a physical mouse button can report as a chord key (LeftButton..=XButton2, minus
    /// the reserved Cancel code)
    pub fn is_mouse_button (self) -> bool {
        let code = u32::from(self);
        (1..=6).contains(&code) && code != 3
    }

    /// returns true for the wheel-rotation pseudo-keys
    pub fn is_wheel (self) -> bool {
        matches! (self, KeyCode::WheelDown | KeyCode::WheelUp)
    }

    /// valid codes for a persisted mouse chord .. buttons plus the wheel pseudo-keys
    pub fn is_valid_mouse_code (code: u32) -> bool {
        let key = KeyCode::from(code);
        key.is_mouse_button() || key.is_wheel()
    }

}



#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;
    use super::*;

    #[test]
    fn code_mapping_round_trips() {
        for code in [0u32, 1, 6, 13, 37, 39, 68, 80, 91, 162, 164, WHEEL_DOWN_CODE, WHEEL_UP_CODE, 255] {
            assert_eq! (u32::from(KeyCode::from(code)), code);
        }
        // and the whole table in the other direction
        for key in KeyCode::iter() {
            assert_eq! (KeyCode::from (u32::from(key)), key);
        }
    }

    #[test]
    fn modifier_classification() {
        assert! (KeyCode::LCtrl.is_modifier());
        assert! (KeyCode::LWin.is_modifier());
        assert! (KeyCode::Shift.is_modifier());
        assert! (!KeyCode::A.is_modifier());
        assert! (!KeyCode::WheelUp.is_modifier());
    }

    #[test]
    fn mouse_code_validity() {
        assert! (KeyCode::is_valid_mouse_code(1));
        assert! (KeyCode::is_valid_mouse_code(6));
        assert! (!KeyCode::is_valid_mouse_code(3));       // Cancel is reserved
        assert! (KeyCode::is_valid_mouse_code(WHEEL_UP_CODE));
        assert! (!KeyCode::is_valid_mouse_code(65));      // keyboard 'A' is not a mouse code
    }
}
