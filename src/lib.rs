
// slightly unconventional organization here ..
//.. all our modules are declared as mostly empty wrappers that re-export everything from the files
//.. inside their module folders, so that a single 'use deskshift::*' brings in the whole surface
// (any name-space contention has been minimal so far, and where it occurs is avoidable via explicit paths)



/// inputs .. the virtual-key code space, modifier classification, and the low-level OS hook plumbing
pub mod inputs {
    pub mod key_codes;
    #[cfg (windows)]
    pub mod hooks;

    pub use self::key_codes::*;
    #[cfg (windows)]
    pub use self::hooks::*;
}


/// shortcuts .. chord representation, the stateful chord detector, and the action-dispatch hook-service
pub mod shortcuts {
    // shadowed module file that we'll re-export from here
    mod _shortcuts;
    pub use self::_shortcuts::*;

    pub mod detector;
    pub mod hook_service;

    pub use self::detector::*;
    pub use self::hook_service::*;
}


/// settings .. flat key-value persistence provider, typed scalar/indexed properties, and the settings categories
pub mod settings {
    pub mod provider;
    pub mod property;
    pub mod property_list;
    pub mod categories;
    pub mod session;

    pub use self::provider::*;
    pub use self::property::*;
    pub use self::property_list::*;
    pub use self::categories::*;
    pub use self::session::*;
}


/// desktops .. the opaque virtual-desktop platform trait, desktop orchestration, and settings synchronization
pub mod desktops {
    pub mod platform;
    pub mod service;
    pub mod sync;

    pub use self::platform::*;
    pub use self::service::*;
    pub use self::sync::*;
}


/// app .. glue that assembles hook registrations from settings, notifications, wallpaper, startup scheduling, tray
pub mod app {
    pub mod preparation;
    pub mod notification;
    pub mod wallpaper;
    pub mod scheduler;
    #[cfg (windows)]
    pub mod system_tray;

    pub use self::preparation::*;
    pub use self::notification::*;
    pub use self::wallpaper::*;
    pub use self::scheduler::*;
}


/// bunch of small utility helpers for foreground-window queries, beeps etc
pub mod utils {
    pub mod win_utils;

    pub use self::win_utils::*;
}


// and finally our deskshift (lib) level re-exports
pub use crate::inputs::*;
pub use crate::shortcuts::*;
pub use crate::settings::*;
pub use crate::desktops::*;
pub use crate::app::*;
// ^^ lets not do the internals of utils .. we can just use 'utils::' when needed
