
//! Dev utility .. installs the low-level hooks and logs every chord the detector
//! resolves, without consuming anything. Handy for finding the code sequence to
//! persist for a binding.

use std::sync::Arc;

use deskshift::shortcuts::{ShortcutKey, ShortcutKeyDetector};

fn main () {
    env_logger::Builder::from_default_env()
        .filter_level (log::LevelFilter::Debug)
        .init();

    let detector = ShortcutKeyDetector::new();

    let log_chord = |what: &'static str| {
        Arc::new ( move |chord: &ShortcutKey| {
            log::info! ("{:<12} {:?}  codes {:?}", what, chord, chord.to_codes());
            false    // never consume, this is observation only
        } )
    };
    detector.on_key_pressed  (log_chord ("key-press"));
    detector.on_key_released (log_chord ("key-release"));
    detector.on_btn_pressed  (log_chord ("btn-press"));
    detector.on_btn_released (log_chord ("btn-release"));

    if cfg! (not (windows)) {
        log::error! ("the low-level input hooks only exist on windows .. nothing to probe here");
        return
    }

    match detector.start() {
        Ok(()) => {
            log::info! ("hooks installed, press chords to see them (ctrl-c to quit)");
            loop { std::thread::park() }
        }
        Err (e) => log::error! ("{}", e),
    }
}
