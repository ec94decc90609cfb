// ABOUTME: System tray / menubar item for the dock with Open Log and Quit entries
// ABOUTME: The only way to quit cleanly, which also puts the taskbar back

use anyhow::Result;
use image::{Rgba, RgbaImage};
use tray_icon::{
    TrayIcon, TrayIconBuilder,
    menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem},
};

const GLYPH_SIZE: u32 = 32;

pub struct DockTray {
    _tray_icon: TrayIcon,
}

fn open_log_id() -> MenuId {
    MenuId::new("open_log")
}
fn quit_id() -> MenuId {
    MenuId::new("quit_berth")
}

impl DockTray {
    pub fn new() -> Result<Self> {
        let menu = Menu::new();

        let open_log_item = MenuItem::with_id(open_log_id(), "Open Log", true, None);
        let separator = PredefinedMenuItem::separator();
        let quit_item = MenuItem::with_id(quit_id(), "Quit Berth", true, None);

        menu.append(&open_log_item)?;
        menu.append(&separator)?;
        menu.append(&quit_item)?;

        let glyph = dock_glyph();
        let (width, height) = glyph.dimensions();
        let icon = tray_icon::Icon::from_rgba(glyph.into_raw(), width, height)?;

        #[allow(unused_mut)]
        let mut tray_builder = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip("Berth Dock")
            .with_icon(icon);

        // Template mode lets macOS recolor the glyph for dark menubars
        #[cfg(target_os = "macos")]
        {
            tray_builder = tray_builder.with_icon_as_template(true);
        }

        let tray_icon = tray_builder.build()?;
        tracing::debug!("Created tray icon");

        Ok(Self {
            _tray_icon: tray_icon,
        })
    }

    pub fn try_recv_event() -> Option<TrayEvent> {
        let event = MenuEvent::receiver().try_recv().ok()?;
        tracing::debug!("Tray menu event: {:?}", event);

        if event.id == open_log_id() {
            Some(TrayEvent::OpenLog)
        } else if event.id == quit_id() {
            Some(TrayEvent::Quit)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    OpenLog,
    Quit,
}

/// A rounded bar with three squares: a tiny dock.
fn dock_glyph() -> RgbaImage {
    let ink = Rgba([0, 0, 0, 255]);
    let mut glyph = RgbaImage::new(GLYPH_SIZE, GLYPH_SIZE);

    for y in 18..28 {
        for x in 2..30 {
            let corner = (y == 18 || y == 27) && (x == 2 || x == 29);
            if !corner {
                glyph.put_pixel(x, y, ink);
            }
        }
    }

    for slot in 0..3u32 {
        let left = 5 + slot * 8;
        for y in 10..16 {
            for x in left..left + 6 {
                glyph.put_pixel(x, y, ink);
            }
        }
    }

    glyph
}
