
use crate::shortcuts::{Flag, HookService, SuspendScope};


/// One editing session over the settings surface (e.g. while the settings window is
/// open). Holds a hook suspend scope for its lifetime, so no shortcut can fire against
/// half-edited bindings, and dropping the session releases the scope which rebuilds
/// the registries from whatever the session changed. Anything needing an app restart
/// to take effect (startup registration, hook-level toggles) is flagged on the session
/// rather than on some global, so nested or subsequent sessions don't inherit stale
/// state.
pub struct SettingsSession {
    _scope           : SuspendScope,
    restart_required : Flag,
}

impl SettingsSession {

    pub fn begin (hook: &HookService) -> SettingsSession {
        SettingsSession { _scope: hook.suspend(), restart_required: Flag::default() }
    }

    pub fn mark_restart_required (&self) { self.restart_required.set() }

    pub fn restart_required (&self) -> bool { self.restart_required.is_set() }

}
