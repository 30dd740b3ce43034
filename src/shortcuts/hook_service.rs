
use std::sync::{Arc, RwLock, Weak};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{sync_channel, SyncSender};
use std::thread;

use derive_deref::Deref;

use crate::*;


/// plain callback used for reload/suspended notifications
pub type NotifyFn = Arc <dyn Fn() + Send + Sync + 'static>;


struct HookActionEntry {
    id           : u64,
    get_shortcut : ShortcutGetter,
    action       : ShortcutAF,
    can_execute  : CanExecuteFn,
}

# [ derive (Copy, Clone) ]
enum Registry { Keyboard, Mouse }


pub struct _HookService {
    pub detector : ShortcutKeyDetector,

    // two independent registries .. keyboard chords and mouse chords never cross-match
    key_actions   : RwLock <Vec <HookActionEntry>>,
    mouse_actions : RwLock <Vec <HookActionEntry>>,
    next_id       : AtomicU64,

    // suspend/resume is depth-counted so nested scopes compose .. only the outermost release resumes
    suspend_depth : AtomicUsize,

    reload_fn     : RwLock <Option <NotifyFn>>,
    suspended_cbs : RwLock <Vec <NotifyFn>>,

    // matched actions are queued out to a dedicated thread .. the hook callback must return promptly, so it
    // only does the registry lookup inline and never runs the action itself
    action_queue  : SyncSender <(ShortcutAF, WindowHandle)>,
}

# [ derive (Clone, Deref) ]
pub struct HookService ( Arc <_HookService> );



/// disposal handle for one registration .. dropping it removes the registration from its registry
pub struct HookActionHandle {
    svc      : Weak <_HookService>,
    registry : Registry,
    id       : Option <u64>,
}

impl HookActionHandle {
    fn noop () -> HookActionHandle {
        HookActionHandle { svc: Weak::new(), registry: Registry::Keyboard, id: None }
    }
    pub fn dispose (self) { }   // drop does the work
}

impl Drop for HookActionHandle {
    fn drop (&mut self) {
        if let (Some(svc), Some(id)) = (self.svc.upgrade(), self.id) {
            let list = match self.registry { Registry::Keyboard => &svc.key_actions, Registry::Mouse => &svc.mouse_actions };
            list .write().unwrap() .retain (|e| e.id != id);
        }
    }
}


/// scope guard returned by suspend() .. the last one dropped reloads the registries and restarts capture
pub struct SuspendScope {
    svc : HookService,
}

impl Drop for SuspendScope {
    fn drop (&mut self) {
        if 1 == self.svc.suspend_depth.fetch_sub (1, Ordering::SeqCst) {
            // ordering matters : clear registries -> rebuild from (possibly changed) settings -> only then
            // restart capture, so nothing ever dispatches against a stale or half-built registry
            self.svc.reload();
            if let Err(e) = self.svc.detector.start() {
                log::error! ("restarting shortcut capture after suspend failed : {}", e);
            }
        }
    }
}



impl HookService {

    pub fn new() -> HookService {
        // bounded queue .. drained asap by the action thread, 20 in flight is already pathological
        let (action_tx, action_rx) = sync_channel::<(ShortcutAF, WindowHandle)> (20);
        thread::spawn (move || while let Ok((af, hwnd)) = action_rx.recv() { af(hwnd) });

        let svc = HookService ( Arc::new ( _HookService {
            detector      : ShortcutKeyDetector::new(),
            key_actions   : RwLock::new (Vec::new()),
            mouse_actions : RwLock::new (Vec::new()),
            next_id       : AtomicU64::new (1),
            suspend_depth : AtomicUsize::new (0),
            reload_fn     : RwLock::new (None),
            suspended_cbs : RwLock::new (Vec::new()),
            action_queue  : action_tx,
        } ) );

        let s = svc.clone();
        svc.detector .on_key_pressed  ( Arc::new (move |sk| s.dispatch_pressed (Registry::Keyboard, sk)) );
        let s = svc.clone();
        svc.detector .on_key_released ( Arc::new (move |sk| s.dispatch_released (Registry::Keyboard, sk)) );
        let s = svc.clone();
        svc.detector .on_btn_pressed  ( Arc::new (move |sk| s.dispatch_pressed (Registry::Mouse, sk)) );
        let s = svc.clone();
        svc.detector .on_btn_released ( Arc::new (move |sk| s.dispatch_released (Registry::Mouse, sk)) );

        svc
    }

    /// Starts chord capture .. hook-install failure surfaces here (composition root logs it, app stays up)
    pub fn start (&self) -> Result<(), HookError> {
        self.detector.start()
    }


    pub fn set_reload (&self, f: NotifyFn) { *self.reload_fn.write().unwrap() = Some(f) }

    pub fn on_suspended (&self, f: NotifyFn) { self.suspended_cbs.write().unwrap().push(f) }


    /// Clears both registries then lets the configured rebuild callback repopulate them from current settings.
    /// Callable repeatedly .. also invoked from the last suspend-scope release, so it must never suspend itself.
    pub fn reload (&self) {
        let reload_fn = self.reload_fn.read().unwrap().clone();
        if let Some(f) = reload_fn {
            self.key_actions   .write().unwrap() .clear();
            self.mouse_actions .write().unwrap() .clear();
            f();
            log::debug! ( "shortcut registries reloaded : {} key actions, {} mouse actions",
                self.key_actions.read().unwrap().len(), self.mouse_actions.read().unwrap().len() );
        }
    }


    /// Suspends dispatch (depth-counted) and notifies listeners .. consumers use the notification window to
    /// do work that must not race a firing shortcut (e.g. resizing the per-desktop lists)
    pub fn suspend (&self) -> SuspendScope {
        self.suspend_depth .fetch_add (1, Ordering::SeqCst);
        self.detector.stop();

        let cbs = self.suspended_cbs.read().unwrap().clone();
        cbs .iter() .for_each (|cb| cb());

        SuspendScope { svc: self.clone() }
    }


    pub fn register_key_action (&self, get_shortcut: ShortcutGetter, action: ShortcutAF) -> HookActionHandle {
        self.register (Registry::Keyboard, get_shortcut, action, Arc::new (|| true))
    }
    pub fn register_key_action_guarded (
        &self, get_shortcut: ShortcutGetter, action: ShortcutAF, can_execute: CanExecuteFn,
    ) -> HookActionHandle {
        self.register (Registry::Keyboard, get_shortcut, action, can_execute)
    }

    pub fn register_mouse_action (&self, get_shortcut: ShortcutGetter, action: ShortcutAF) -> HookActionHandle {
        self.register (Registry::Mouse, get_shortcut, action, Arc::new (|| true))
    }
    pub fn register_mouse_action_guarded (
        &self, get_shortcut: ShortcutGetter, action: ShortcutAF, can_execute: CanExecuteFn,
    ) -> HookActionHandle {
        self.register (Registry::Mouse, get_shortcut, action, can_execute)
    }

    fn register (
        &self, registry: Registry, get_shortcut: ShortcutGetter, action: ShortcutAF, can_execute: CanExecuteFn,
    ) -> HookActionHandle {
        // an unbound shortcut self-disables its action .. accepted silently as a no-op registration
        if get_shortcut().is_none() { return HookActionHandle::noop() }

        let id = self.next_id.fetch_add (1, Ordering::Relaxed);
        let entry = HookActionEntry { id, get_shortcut, action, can_execute };
        match registry {
            Registry::Keyboard => self.key_actions   .write().unwrap() .push (entry),
            Registry::Mouse    => self.mouse_actions .write().unwrap() .push (entry),
        }
        HookActionHandle { svc: Arc::downgrade (&self.0), registry, id: Some(id) }
    }


    fn actions (&self, registry: Registry) -> &RwLock <Vec <HookActionEntry>> {
        match registry { Registry::Keyboard => &self.key_actions, Registry::Mouse => &self.mouse_actions }
    }

    fn dispatch_pressed (&self, registry: Registry, chord: &ShortcutKey) -> bool {
        if chord.is_none() { return false }

        // first-registered wins on duplicate bindings .. shortcut getters are evaluated live, so a rebind in
        // settings takes effect without the entry itself changing
        let matched = self .actions (registry) .read().unwrap() .iter()
            .find (|e| (e.get_shortcut)() == *chord && (e.can_execute)())
            .map (|e| e.action.clone());

        if let Some(af) = matched {
            let hwnd = utils::get_foreground_window();
            if self.action_queue .send ((af, hwnd)) .is_err() {
                log::warn! ("shortcut action queue is gone .. dropping dispatch");
            }
            true
        } else { false }
    }

    fn dispatch_released (&self, registry: Registry, chord: &ShortcutKey) -> bool {
        if chord.is_none() { return false }

        // no secondary action on release .. we only mark it handled so the release of a consumed press does
        // not leak through to the foreground app
        self .actions (registry) .read().unwrap() .iter()
            .any (|e| (e.get_shortcut)() == *chord && (e.can_execute)())
    }

}



#[cfg(test)]
mod test {
    use std::sync::mpsc::channel;
    use std::time::Duration;
    use super::*;

    fn chord (key: KeyCode) -> ShortcutKey { ShortcutKey::new (key, [KeyCode::LCtrl]) }

    fn getter (key: KeyCode) -> ShortcutGetter {
        Arc::new (move || chord(key))
    }

    #[test]
    fn dispatch_picks_first_match() {
        let svc = HookService::new();
        let (tx, rx) = channel();

        let tx1 = tx.clone();
        let _h1 = svc.register_key_action (getter(KeyCode::A), Arc::new (move |_| { tx1.send("first").unwrap(); }));
        let _h2 = svc.register_key_action (getter(KeyCode::A), Arc::new (move |_| { tx.send("second").unwrap(); }));

        svc.detector.handle_key_down (KeyCode::LCtrl);
        assert! (svc.detector.handle_key_down (KeyCode::A));

        assert_eq! (rx.recv_timeout (Duration::from_secs(2)).unwrap(), "first");
    }

    #[test]
    fn can_execute_gates_the_match() {
        let svc = HookService::new();
        let (tx, rx) = channel();

        let _h1 = svc.register_key_action_guarded (
            getter(KeyCode::A), Arc::new (|_| panic! ("guarded-off action fired")), Arc::new (|| false));
        let _h2 = svc.register_key_action (getter(KeyCode::A), Arc::new (move |_| { tx.send(()).unwrap(); }));

        svc.detector.handle_key_down (KeyCode::LCtrl);
        assert! (svc.detector.handle_key_down (KeyCode::A));
        rx.recv_timeout (Duration::from_secs(2)).unwrap();
    }

    #[test]
    fn unbound_shortcut_registers_as_noop() {
        let svc = HookService::new();

        let _h = svc.register_key_action (
            Arc::new (|| ShortcutKey::NONE), Arc::new (|_| panic! ("unbound action fired")));

        svc.detector.handle_key_down (KeyCode::LCtrl);
        assert! (!svc.detector.handle_key_down (KeyCode::A));
        assert! (svc.key_actions.read().unwrap().is_empty());
    }

    #[test]
    fn release_is_consumed_only_when_bound() {
        let svc = HookService::new();
        let _h = svc.register_key_action (getter(KeyCode::A), Arc::new (|_| {}));

        svc.detector.handle_key_down (KeyCode::LCtrl);
        assert! (svc.detector.handle_key_up (KeyCode::A));
        assert! (!svc.detector.handle_key_up (KeyCode::B));
    }

    #[test]
    fn mouse_and_keyboard_registries_are_independent() {
        let svc = HookService::new();
        let _h = svc.register_mouse_action (
            Arc::new (|| ShortcutKey::new (KeyCode::WheelUp, [KeyCode::RightButton])), Arc::new (|_| {}));

        svc.detector.handle_button_down (KeyCode::RightButton);
        assert! (svc.detector.handle_wheel (120));
        // same chord shape never matches out of the keyboard registry
        assert! (!svc.detector.handle_key_down (KeyCode::A));
    }

    #[test]
    fn disposal_handle_removes_registration() {
        let svc = HookService::new();
        let h = svc.register_key_action (getter(KeyCode::A), Arc::new (|_| {}));
        assert_eq! (svc.key_actions.read().unwrap().len(), 1);
        h.dispose();
        assert! (svc.key_actions.read().unwrap().is_empty());
    }

    #[test]
    fn suspend_is_depth_counted() {
        let svc = HookService::new();
        svc.start().unwrap();
        assert! (!svc.detector.is_suspended());

        let outer = svc.suspend();
        let inner = svc.suspend();
        assert! (svc.detector.is_suspended());

        drop (inner);
        assert! (svc.detector.is_suspended());   // one release is not enough

        drop (outer);
        assert! (!svc.detector.is_suspended());
    }

    #[test]
    fn last_release_clears_then_rebuilds_then_restarts() {
        let svc = HookService::new();
        svc.start().unwrap();

        let _stale = svc.register_key_action (getter(KeyCode::A), Arc::new (|_| panic! ("stale action fired")));

        let (tx, rx) = channel();
        let s = svc.clone();
        svc.set_reload ( Arc::new (move || {
            // by the time the rebuild callback runs, the old registrations must be gone
            assert! (s.key_actions.read().unwrap().is_empty());
            let tx = tx.clone();
            let h = s.register_key_action (getter(KeyCode::A), Arc::new (move |_| { tx.send(()).unwrap(); }));
            std::mem::forget (h);   // registry-clear on the next reload owns the cleanup
        } ) );

        let (ntx, nrx) = channel();
        svc.on_suspended ( Arc::new (move || { ntx.send(()).unwrap(); }) );

        drop (svc.suspend());
        nrx.try_recv().unwrap();                 // suspended notification fired

        svc.detector.handle_key_down (KeyCode::LCtrl);
        assert! (svc.detector.handle_key_down (KeyCode::A));
        rx.recv_timeout (Duration::from_secs(2)).unwrap();
    }
}
