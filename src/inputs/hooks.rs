

use std::sync::RwLock;
use std::sync::atomic::{Ordering, AtomicU32, AtomicIsize};
use std::sync::mpsc::sync_channel;
use std::os::raw::c_int;
use std::thread;

use once_cell::sync::Lazy;

use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM, BOOL, GetLastError};
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::Win32::System::Threading::GetCurrentThreadId;

use crate::*;


pub const MSG_LOOP_KILL_MSG : u32 = WM_USER + 1;


// the hook procs are plain fn pointers the OS calls back into, so the detector they feed has to sit in a
// static .. install() parks the active detector here before setting the hooks
static ACTIVE_DETECTOR : Lazy <RwLock <Option <ShortcutKeyDetector>>> = Lazy::new (|| RwLock::new (None));

// we hold handles returned by OS to the lower level kbd/mouse hooks we set (needed to unhook them later)
static KBD_HOOK    : AtomicIsize = AtomicIsize::new(0);
static MOUSE_HOOK  : AtomicIsize = AtomicIsize::new(0);
static HOOK_THREAD : AtomicU32   = AtomicU32::new(0);



/// Installs both low-level hooks on a dedicated message-pump thread and wires them to the given detector.
/// Blocks until the hooks are set (or setting them failed) so the caller gets a real result.
pub fn install (detector: ShortcutKeyDetector) -> Result<(), HookError> {

    *ACTIVE_DETECTOR .write().unwrap() = Some (detector);

    let (result_tx, result_rx) = sync_channel::<Result<(), HookError>> (1);

    thread::spawn ( move || unsafe {

        HOOK_THREAD .store (GetCurrentThreadId(), Ordering::SeqCst);

        let setup = set_hook (WH_KEYBOARD_LL, &KBD_HOOK, kbd_proc, "keyboard")
            .and_then (|_| set_hook (WH_MOUSE_LL, &MOUSE_HOOK, mouse_proc, "mouse"));
        let failed = setup.is_err();
        let _ = result_tx.send (setup);
        if failed { unset_hook (&KBD_HOOK); return }

        // win32 sends hook events to a thread with a message loop .. we dont create any windows, so a
        // forever-waiting GetMessage does the job (awakened only to call the hook procs, or for our kill msg)
        let mut msg = MSG::default();
        while BOOL(0) != GetMessageW (&mut msg, HWND(0), 0, 0) {
            if msg.message == MSG_LOOP_KILL_MSG {
                log::info! ("received kill-msg in hook thread .. terminating");
                break
            }
        }

    } );

    result_rx .recv() .unwrap_or ( Err ( HookError::Install { hook: "keyboard", code: 0 } ) )
}


/// Unhooks everything and signals the pump thread to terminate .. only used at process shutdown
pub fn shutdown () { unsafe {
    unset_hook (&KBD_HOOK);
    unset_hook (&MOUSE_HOOK);
    PostThreadMessageW (HOOK_THREAD.load(Ordering::SeqCst), MSG_LOOP_KILL_MSG, WPARAM::default(), LPARAM::default());
    *ACTIVE_DETECTOR .write().unwrap() = None;
} }


fn set_hook (
    hook_id: WINDOWS_HOOK_ID,
    hhook: &AtomicIsize,
    hook_proc: unsafe extern "system" fn (c_int, WPARAM, LPARAM) -> LRESULT,
    name: &'static str,
) -> Result<(), HookError> { unsafe {
    match SetWindowsHookExW (hook_id, Some(hook_proc), HINSTANCE(0), 0) {
        Ok (hh) => {
            log::info! ("low-level {} hook installed", name);
            hhook.store (hh.0, Ordering::SeqCst);
            Ok(())
        }
        Err (_) => Err ( HookError::Install { hook: name, code: GetLastError().0 } ),
    }
} }

fn unset_hook (hhook: &AtomicIsize) {
    if HHOOK (hhook.load (Ordering::SeqCst)) != HHOOK::default() {
        if unsafe { UnhookWindowsHookEx ( HHOOK (hhook.load(Ordering::SeqCst)) ) } .as_bool() {
            hhook.store (HHOOK::default().0, Ordering::SeqCst);
        } else {
            log::warn! ("unhooking attempt failed .. error code : {:?}", unsafe { GetLastError() });
        }
    }
}


fn with_detector (f: impl Fn (&ShortcutKeyDetector) -> bool) -> bool {
    ACTIVE_DETECTOR .read().unwrap() .as_ref() .map (|d| f(d)) .unwrap_or (false)
}

fn hi_word (l: u32) -> u16 { ((l >> 16) & 0xffff) as u16 }


/// Keyboard lower-level-hook processor
pub unsafe extern "system"
fn kbd_proc (code: c_int, w_param: WPARAM, l_param: LPARAM) -> LRESULT {

    let return_call = || { CallNextHookEx (HHOOK(0), code, w_param, l_param) };

    if code < 0 { return return_call() }      // ms-docs says we MUST do this

    let kb_struct = *(l_param.0 as *const KBDLLHOOKSTRUCT);

    // injected (synthetic) events never participate in chords .. just pass them along
    if kb_struct.flags.0 & LLKHF_INJECTED.0 != 0 { return return_call() }

    let key = KeyCode::from (kb_struct.vkCode);

    let handled = match w_param.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => with_detector (|d| d.handle_key_down (key)),
        WM_KEYUP   | WM_SYSKEYUP   => with_detector (|d| d.handle_key_up (key)),
        _ => false,
    };

    if handled {
        return LRESULT(1);  // returning with non-zero code signals OS to block further processing on the event
    }
    return_call()
}


/// mouse lower-level-hook processor
pub unsafe extern "system"
fn mouse_proc (code: c_int, w_param: WPARAM, l_param: LPARAM) -> LRESULT {

    let return_call = || { CallNextHookEx (HHOOK(0), code, w_param, l_param) };

    if code < 0 { return return_call() }      // ms-docs says we MUST do this

    let mh_struct = &*(l_param.0 as *const MSLLHOOKSTRUCT);

    if mh_struct.flags & LLMHF_INJECTED != 0 { return return_call() }

    let handled = match w_param.0 as u32 {
        WM_LBUTTONDOWN => with_detector (|d| d.handle_button_down (KeyCode::LeftButton)),
        WM_RBUTTONDOWN => with_detector (|d| d.handle_button_down (KeyCode::RightButton)),
        WM_MBUTTONDOWN => with_detector (|d| d.handle_button_down (KeyCode::MiddleButton)),
        WM_XBUTTONDOWN => {
            match hi_word (mh_struct.mouseData) {
                XBUTTON1 => with_detector (|d| d.handle_button_down (KeyCode::XButton1)),
                XBUTTON2 => with_detector (|d| d.handle_button_down (KeyCode::XButton2)),
                _ => false,
        } }
        WM_LBUTTONUP => with_detector (|d| d.handle_button_up (KeyCode::LeftButton)),
        WM_RBUTTONUP => with_detector (|d| d.handle_button_up (KeyCode::RightButton)),
        WM_MBUTTONUP => with_detector (|d| d.handle_button_up (KeyCode::MiddleButton)),
        WM_XBUTTONUP => {
            match hi_word (mh_struct.mouseData) {
                XBUTTON1 => with_detector (|d| d.handle_button_up (KeyCode::XButton1)),
                XBUTTON2 => with_detector (|d| d.handle_button_up (KeyCode::XButton2)),
                _ => false,
        } }
        // wheel direction comes from the sign of the hi word of the raw mouse data
        WM_MOUSEWHEEL => with_detector (|d| d.handle_wheel (hi_word (mh_struct.mouseData) as i16 as i32)),
        _ => false,
    };

    if handled {
        return LRESULT(1);  // returning with non-zero code signals OS to block further processing on the event
    }
    return_call()
}
