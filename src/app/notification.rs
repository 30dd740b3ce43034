
use std::sync::Arc;
use std::time::Duration;

use crate::settings::Settings;


# [ derive (Debug, Clone, PartialEq, Eq) ]
pub struct Notification {
    pub header : String,
    pub body   : String,
}

# [ derive (Debug, Clone, Copy, PartialEq, Eq) ]
pub enum PinTarget { Window, App }


/// UI collaborator that actually puts a transient window on screen
pub trait NotificationPresenter : Send + Sync {
    fn show (&self, notification: Notification, duration: Duration);
}

pub type Presenter = Arc <dyn NotificationPresenter>;

/// swallows notifications .. useful headless and in tests
# [ derive (Default) ]
pub struct NullPresenter;
impl NotificationPresenter for NullPresenter {
    fn show (&self, _notification: Notification, _duration: Duration) { }
}


/// Composes the transient desktop/pin notifications. All the text rules live here so
/// they can be checked without a window system .. presentation is delegated out.
# [ derive (Clone) ]
pub struct NotificationService {
    settings  : Arc <Settings>,
    presenter : Presenter,
}

impl NotificationService {

    pub fn new (settings: Arc<Settings>, presenter: Presenter) -> NotificationService {
        NotificationService { settings, presenter }
    }

    fn simple (&self) -> bool { self.settings.general.simple_notification.get() }

    fn duration (&self) -> Duration {
        Duration::from_millis (self.settings.general.notification_duration.get().max(0) as u64)
    }

    fn header (&self, full_text: &str) -> String {
        if self.simple() { String::new() } else { full_text.to_string() }
    }

    /// "Desktop N" or the user's name for it, with the verbose prefix when not in simple mode
    fn desktop_body (&self, index: usize, prefix: &str) -> String {
        let g = &self.settings.general;
        let number = index + 1;
        let name = g.desktop_names.value (index) .unwrap_or_default();
        if ! g.use_desktop_name.get() || name.is_empty() {
            let prefix = if self.simple() { "" } else { prefix };
            format! ("{}Desktop {}", prefix, number)
        }
        else if self.simple() {
            format! ("{}. {}", number, name)
        }
        else {
            format! ("Desktop {}: {}", number, name)
        }
    }

    fn show (&self, header: String, body: String) {
        let n = Notification { header, body };
        log::debug! ("notify: {:?}", n);
        self.presenter.show (n, self.duration());
    }

    pub fn notify_switched (&self, new_index: usize) {
        let g = &self.settings.general;
        if ! g.notification_when_switched_desktop.get() {
            if g.always_show_desktop_notification.get() { self.show_current_desktop (new_index) }
            return
        }
        self.show ( self.header ("Virtual Desktop Switched"),
                    self.desktop_body (new_index, "Current Desktop: ") );
    }

    pub fn notify_moved (&self, old_index: usize, new_index: usize) {
        let g = &self.settings.general;
        if ! g.notification_when_switched_desktop.get() {
            if g.always_show_desktop_notification.get() { self.show_current_desktop (new_index) }
            return
        }
        let header = if self.simple() {
            format! ("Desktop {} => Desktop {}", old_index + 1, new_index + 1)
        } else {
            format! ("Desktop {} Moved to Desktop {}", old_index + 1, new_index + 1)
        };
        self.show ( header, self.desktop_body (new_index, "Reordered Current Desktop: ") );
    }

    pub fn notify_pin (&self, target: PinTarget, pinned: bool) {
        let target = match target { PinTarget::Window => "Window", PinTarget::App => "Application" };
        let verb = if pinned { "Pinned" } else { "Unpinned" };
        let body = if self.simple() { format! ("{} {}", target, verb) }
                   else { format! ("{} {}", verb, target) };
        self.show ( self.header ("Virtual Desktop"), body );
    }

    pub fn show_current_desktop (&self, current_index: usize) {
        self.show ( self.header ("Virtual Desktop"),
                    self.desktop_body (current_index, "Current Desktop: ") );
    }

}




#[cfg(test)]
mod test {
    use std::sync::Mutex;
    use super::*;
    use crate::settings::{InMemoryProvider, Settings};

    #[derive (Default)]
    struct Recorder ( Mutex <Vec <Notification>> );
    impl NotificationPresenter for Recorder {
        fn show (&self, n: Notification, _d: Duration) { self.0.lock().unwrap().push(n) }
    }

    fn setup () -> (NotificationService, Arc<Settings>, Arc<Recorder>) {
        let settings = Arc::new (Settings::new (InMemoryProvider::new_provider()));
        let rec = Arc::new (Recorder::default());
        (NotificationService::new (settings.clone(), rec.clone()), settings, rec)
    }

    #[test]
    fn switched_text_uses_number_then_name_when_enabled () {
        let (svc, settings, rec) = setup();
        svc.notify_switched (1);

        settings.general.use_desktop_name.set (true);
        settings.general.desktop_names.resize (3);
        settings.general.desktop_names.set_value (1, "work".into());
        svc.notify_switched (1);
        svc.notify_switched (2);    // named mode but empty name falls back to the number

        let seen = rec.0.lock().unwrap();
        assert_eq! (seen[0], Notification { header: "Virtual Desktop Switched".into(), body: "Current Desktop: Desktop 2".into() });
        assert_eq! (seen[1].body, "Desktop 2: work");
        assert_eq! (seen[2].body, "Current Desktop: Desktop 3");
    }

    #[test]
    fn simple_mode_strips_headers_and_shortens_bodies () {
        let (svc, settings, rec) = setup();
        settings.general.simple_notification.set (true);
        settings.general.use_desktop_name.set (true);
        settings.general.desktop_names.resize (2);
        settings.general.desktop_names.set_value (0, "main".into());
        svc.notify_switched (0);
        svc.notify_switched (1);

        let seen = rec.0.lock().unwrap();
        assert_eq! (seen[0], Notification { header: "".into(), body: "1. main".into() });
        assert_eq! (seen[1].body, "Desktop 2");
    }

    #[test]
    fn switch_notifications_can_be_turned_off () {
        let (svc, settings, rec) = setup();
        settings.general.notification_when_switched_desktop.set (false);
        svc.notify_switched (1);
        assert! (rec.0.lock().unwrap().is_empty());

        // unless the resident mode wants one anyway
        settings.general.always_show_desktop_notification.set (true);
        svc.notify_switched (1);
        assert_eq! (rec.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn pin_texts () {
        let (svc, settings, rec) = setup();
        svc.notify_pin (PinTarget::Window, true);
        svc.notify_pin (PinTarget::App, false);
        settings.general.simple_notification.set (true);
        svc.notify_pin (PinTarget::Window, false);

        let seen = rec.0.lock().unwrap();
        assert_eq! (seen[0].body, "Pinned Window");
        assert_eq! (seen[0].header, "Virtual Desktop");
        assert_eq! (seen[1].body, "Unpinned Application");
        assert_eq! (seen[2].body, "Window Unpinned");
        assert_eq! (seen[2].header, "");
    }

    #[test]
    fn moved_header_names_both_positions () {
        let (svc, _, rec) = setup();
        svc.notify_moved (0, 2);
        let seen = rec.0.lock().unwrap();
        assert_eq! (seen[0].header, "Desktop 1 Moved to Desktop 3");
        assert_eq! (seen[0].body, "Reordered Current Desktop: Desktop 3");
    }

}
