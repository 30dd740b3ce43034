
use crate::WindowHandle;

#[cfg (windows)]
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, MB_ICONASTERISK};
#[cfg (windows)]
use windows::Win32::System::Diagnostics::Debug::MessageBeep;


pub fn get_foreground_window () -> WindowHandle {
    #[cfg (windows)] {
        return WindowHandle ( unsafe { GetForegroundWindow().0 } );
    }
    #[allow (unreachable_code)]
    WindowHandle::default()
}

/// the soft 'nothing to do' chime played when a move/switch has nowhere to go
pub fn alert_beep () {
    #[cfg (windows)] unsafe {
        MessageBeep (MB_ICONASTERISK);
    }
}
