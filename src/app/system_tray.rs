
#![allow(unused)]


use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::{Icon, TrayIconBuilder, TrayIconEvent};
use tray_icon::menu::{Menu, MenuEvent, MenuItem};

use crate::app::ApplicationPreparation;
use crate::shortcuts::SuspendScope;

fn get_icon () -> Icon {
    // a flat two-tone square stands in until a real asset lands
    let (w, h) = (32u32, 32u32);
    let img = image::RgbaImage::from_fn (w, h, |x, _y| {
        if x < w / 2 { image::Rgba ([0x2b, 0x6c, 0xb0, 0xff]) }
        else         { image::Rgba ([0x8a, 0xc4, 0xe8, 0xff]) }
    });
    Icon::from_rgba (img.into_raw(), w, h).unwrap()
}

/// Blocks on the tray event loop .. expected to own the calling (main) thread while the
/// hook machinery runs on its own threads.
pub fn start_system_tray_monitor (ap: ApplicationPreparation) {

    let event_loop = EventLoopBuilder::new().build();

    let tray_menu = Menu::new();
    let suspend = MenuItem::new ("Suspend", true, None);
    let reload  = MenuItem::new ("Reload",  true, None);
    let quit    = MenuItem::new ("Quit",    true, None);
    tray_menu .append_items ( &[ &suspend, &reload, &quit ] );

    let mut tray_icon = None;
    let mut suspend_scope : Option<SuspendScope> = None;

    let menu_channel = MenuEvent::receiver();
    let tray_channel = TrayIconEvent::receiver();

    event_loop .run ( move |event, _, control_flow| {

        *control_flow = ControlFlow::Wait;

        if let tao::event::Event::NewEvents (tao::event::StartCause::Init) = event {
            tray_icon = Some (
                TrayIconBuilder::new()
                    .with_menu (Box::new (tray_menu.clone()))
                    .with_tooltip ("deskshift")
                    .with_icon (get_icon())
                    .build()
                    .unwrap(),
            );
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == quit.id() {
                suspend_scope.take();
                tray_icon.take();
                *control_flow = ControlFlow::Exit;
            }
            else if event.id == reload.id() {
                ap.hook.reload();
            }
            else if event.id == suspend.id() {
                match suspend_scope.take() {
                    // dropping the scope is what rebuilds and restarts
                    Some (scope) => { drop (scope);  suspend.set_text ("Suspend"); }
                    None => { suspend_scope = Some (ap.hook.suspend());  suspend.set_text ("Resume"); }
                }
            }
        }

        if let Ok(_event) = tray_channel.try_recv() { }

    })

}
