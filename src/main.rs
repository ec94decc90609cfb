mod app;
mod config;
mod entries;
mod geometry;
mod launcher;
mod logging;
mod pointer;
mod taskbar;
#[cfg(any(target_os = "macos", target_os = "windows"))]
mod tray;
mod ui;
mod visibility;

use anyhow::{Context, Result};
use config::Config;
use std::path::Path;
use std::process::ExitCode;

/// Settings, resolved and checked. Falls back to defaults when the
/// settings file does not exist.
fn load_settings() -> Result<Config> {
    let path = Config::default_config_path()?;
    let mut config = Config::load_or_default(&path)?;
    config.expand_paths()?;
    config.validate()?;
    Ok(config)
}

#[cfg(not(test))]
fn main() -> ExitCode {
    use app::DockState;
    use geometry::{DockGeometry, PanelMetrics, Point, Rect, Size};
    use gpui::{App, AppContext, Application};
    use launcher::SystemRunner;
    use std::path::PathBuf;
    use taskbar::{TaskbarGuard, system_taskbar};
    use ui::dock_view::{DockView, DockViewOptions, dock_window_options};

    let config = match load_settings() {
        Ok(config) => config,
        Err(e) => {
            // No settings means no log path either; use the default one
            if let Err(log_err) = logging::init(Path::new(&Config::default().files.log_path)) {
                eprintln!("[ERROR] {log_err:#}");
            }
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(Path::new(&config.files.log_path)) {
        eprintln!("[ERROR] {e:#}");
        return ExitCode::FAILURE;
    }

    let taskbar = TaskbarGuard::acquire(system_taskbar(), config.taskbar.hide);

    // Entries are read before the event loop starts; failure is fatal and
    // drops the guard, which restores the taskbar
    let entries = match load_dock_entries(&config) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Starting dock with {} entries", entries.len());

    let pointer = match pointer::system_pointer() {
        Ok(pointer) => Some(pointer),
        Err(e) => {
            tracing::info!("Global pointer unavailable: {:#}", e);
            None
        }
    };

    let log_path = PathBuf::from(&config.files.log_path);
    let animation = config.animation_duration();
    let poll_interval = config.poll_interval();
    let icon_size = config.dock.icon_size;

    Application::new().run(move |cx: &mut App| {
        let Some(display) = cx.primary_display() else {
            tracing::error!("No display found");
            cx.quit();
            return;
        };

        // Work area, so the dock sits above a taskbar or system dock
        let work_area = display.visible_bounds();
        let work_area = Rect::new(
            Point::new(f32::from(work_area.origin.x), f32::from(work_area.origin.y)),
            Size::new(f32::from(work_area.size.width), f32::from(work_area.size.height)),
        );
        let panel = PanelMetrics::for_icons(entries.len(), icon_size);
        let display_id = Some(display.id());

        // Positions do not depend on the scale factor; the real one is
        // known once the window exists. The dock starts hidden.
        let hot_strip = DockGeometry::new(work_area, 1.0, panel).hot_strip_rect();

        let opened = cx.open_window(dock_window_options(hot_strip, display_id), |window, cx| {
            let geometry = DockGeometry::new(work_area, window.scale_factor(), panel);
            let state = DockState::new(entries, geometry, animation, Box::new(SystemRunner));
            let handle = window.window_handle();

            cx.new(|cx| {
                DockView::new(
                    DockViewOptions {
                        state,
                        pointer,
                        taskbar,
                        window: handle,
                        display_id,
                        log_path,
                        poll_interval,
                    },
                    cx,
                )
            })
        });

        if let Err(e) = opened {
            tracing::error!("Failed to open dock window: {:#}", e);
            cx.quit();
        }
    });

    ExitCode::SUCCESS
}

fn load_dock_entries(config: &Config) -> Result<Vec<entries::DockEntry>> {
    let path = Path::new(&config.files.entries_path);
    entries::load_entries(path)
        .with_context(|| format!("Failed to load dock entries from {}", path.display()))
}

#[cfg(test)]
fn main() {
    // Tests only main function
}
