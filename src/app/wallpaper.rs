
use std::path::Path;
use std::sync::Arc;

use crate::settings::Settings;


# [ derive (Debug, Clone, Copy, PartialEq, Eq) ]
#[repr (u8)]
pub enum WallpaperPosition {
    Center  = 0,
    Tile    = 1,
    Stretch = 2,
    Fit     = 3,
    Fill    = 4,
    Span    = 5,
}

impl Default for WallpaperPosition {
    fn default () -> WallpaperPosition { WallpaperPosition::Fill }
}

impl From<u8> for WallpaperPosition {
    fn from (v: u8) -> WallpaperPosition {
        use WallpaperPosition::*;
        match v { 0 => Center, 1 => Tile, 2 => Stretch, 3 => Fit, 5 => Span, _ => Fill }
    }
}


/// OS collaborator that actually repaints the desktop background
pub trait SystemWallpaper : Send + Sync {
    fn set (&self, path: &str, position: WallpaperPosition) -> bool;
}


const IMAGE_EXTENSIONS : [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Picks the wallpaper for a desktop .. explicit per-desktop path first, then a file in
/// the configured folder whose name is the desktop's 1-based number, then the first
/// non-empty explicit path as a shared fallback.
# [ derive (Clone) ]
pub struct WallpaperService {
    settings : Arc <Settings>,
    system   : Arc <dyn SystemWallpaper>,
}

impl WallpaperService {

    pub fn new (settings: Arc<Settings>, system: Arc<dyn SystemWallpaper>) -> WallpaperService {
        WallpaperService { settings, system }
    }

    pub fn on_desktop_switched (&self, index: usize) {
        if ! self.settings.general.change_background_each_desktop.get() { return }
        match self.path_for (index) {
            Some (path) => {
                if ! self.system.set (&path, self.position_for (index)) {
                    log::warn! ("could not set wallpaper {:?} for desktop {}", path, index + 1);
                }
            }
            None => log::debug! ("no wallpaper configured for desktop {}", index + 1),
        }
    }

    pub fn path_for (&self, index: usize) -> Option<String> {
        let g = &self.settings.general;
        let explicit = g.desktop_background_image_paths.value (index) .filter (|p| ! p.is_empty());
        explicit
            .or_else (|| self.path_from_folder (index))
            .or_else (|| g.desktop_background_image_paths.values().into_iter().find (|p| ! p.is_empty()))
    }

    /// a file named after the desktop's number (e.g. `2.png`) in the configured folder
    fn path_from_folder (&self, index: usize) -> Option<String> {
        let folder = self.settings.general.desktop_background_folder_path.get();
        if folder.is_empty() { return None }
        let number = (index + 1).to_string();
        for ext in IMAGE_EXTENSIONS {
            let candidate = Path::new (&folder) .join (format! ("{}.{}", number, ext));
            if candidate.is_file() { return candidate.to_str().map(String::from) }
        }
        None
    }

    pub fn position_for (&self, index: usize) -> WallpaperPosition {
        self.settings.general.desktop_background_positions.value (index)
            .map (WallpaperPosition::from) .unwrap_or_default()
    }

}




#[cfg (windows)]
pub use self::native::NativeWallpaper;

#[cfg (windows)]
mod native {
    use windows::Win32::UI::WindowsAndMessaging::{
        SystemParametersInfoW, SPI_SETDESKWALLPAPER, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE,
    };
    use super::*;

    # [ derive (Default) ]
    pub struct NativeWallpaper;

    impl SystemWallpaper for NativeWallpaper {
        fn set (&self, path: &str, _position: WallpaperPosition) -> bool {
            let mut wide : Vec<u16> = path.encode_utf16().chain (std::iter::once(0)).collect();
            unsafe {
                SystemParametersInfoW (
                    SPI_SETDESKWALLPAPER, 0,
                    Some (wide.as_mut_ptr() as *mut _),
                    SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
                ) .as_bool()
            }
        }
    }

}




#[cfg(test)]
mod test {
    use std::sync::Mutex;
    use super::*;
    use crate::settings::{InMemoryProvider, Settings};

    #[derive (Default)]
    struct Recorder ( Mutex <Vec <(String, WallpaperPosition)>> );
    impl SystemWallpaper for Recorder {
        fn set (&self, path: &str, position: WallpaperPosition) -> bool {
            self.0.lock().unwrap().push ((path.to_string(), position));
            true
        }
    }

    fn setup () -> (WallpaperService, Arc<Settings>, Arc<Recorder>) {
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        let rec = Arc::new (Recorder::default());
        (WallpaperService::new (settings.clone(), rec.clone()), settings, rec)
    }

    #[test]
    fn disabled_by_default () {
        let (svc, settings, rec) = setup();
        settings.general.desktop_background_image_paths.resize (2);
        settings.general.desktop_background_image_paths.set_value (0, "/a.png".into());
        svc.on_desktop_switched (0);
        assert! (rec.0.lock().unwrap().is_empty());
    }

    #[test]
    fn explicit_path_wins_and_carries_its_position () {
        let (svc, settings, rec) = setup();
        settings.general.change_background_each_desktop.set (true);
        settings.general.desktop_background_image_paths.resize (2);
        settings.general.desktop_background_positions.resize (2);
        settings.general.desktop_background_image_paths.set_value (1, "/b.png".into());
        settings.general.desktop_background_positions.set_value (1, WallpaperPosition::Stretch as u8);
        svc.on_desktop_switched (1);
        assert_eq! (*rec.0.lock().unwrap(), vec![("/b.png".to_string(), WallpaperPosition::Stretch)]);
    }

    #[test]
    fn falls_back_to_first_nonempty_path () {
        let (svc, settings, _) = setup();
        settings.general.desktop_background_image_paths.resize (3);
        settings.general.desktop_background_image_paths.set_value (1, "/shared.png".into());
        assert_eq! (svc.path_for (2), Some("/shared.png".into()));
        assert_eq! (svc.position_for (2), WallpaperPosition::Fill);
    }

    #[test]
    fn numbered_file_in_folder_beats_the_shared_fallback () {
        let dir = std::env::temp_dir().join (format! ("deskshift-wp-{}", std::process::id()));
        std::fs::create_dir_all (&dir).unwrap();
        std::fs::write (dir.join("2.png"), b"img").unwrap();

        let (svc, settings, _) = setup();
        settings.general.desktop_background_folder_path.set (dir.to_str().unwrap().into());
        settings.general.desktop_background_image_paths.resize (3);
        settings.general.desktop_background_image_paths.set_value (0, "/shared.png".into());

        assert_eq! (svc.path_for (1), dir.join("2.png").to_str().map(String::from));
        assert_eq! (svc.path_for (2), Some("/shared.png".into()));

        let _ = std::fs::remove_dir_all (&dir);
    }

}
