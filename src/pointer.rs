// ABOUTME: Global pointer position sources: X11 root-window queries, Quartz events, and Win32 cursor
// ABOUTME: Falls back to tracking the pointer inside the dock's own window where no global query exists

use crate::geometry::{CoordinateSpace, Point, PointerSample};
use anyhow::Result;
use std::cell::Cell;
use std::rc::Rc;

pub trait PointerSource {
    /// Current pointer position, or `None` when the platform cannot tell.
    fn sample(&mut self) -> Option<PointerSample>;
}

/// Picks the global pointer source for this platform.
pub fn system_pointer() -> Result<Box<dyn PointerSource>> {
    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    {
        Ok(Box::new(x11::X11Pointer::connect()?))
    }

    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(quartz::QuartzPointer))
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(win32::Win32Pointer))
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "macos",
        target_os = "windows"
    )))]
    {
        anyhow::bail!("No global pointer source on this platform")
    }
}

/// Pointer as last seen by the dock window itself. Only knows about the
/// pointer while it is over the window; after it leaves, every sample
/// reports a position outside any dock rectangle.
#[derive(Clone, Default)]
pub struct TrackedPointer {
    last: Rc<Cell<Option<Point>>>,
}

impl TrackedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move, in logical screen coordinates.
    pub fn moved(&self, position: Point) {
        self.last.set(Some(position));
    }

    pub fn left(&self) {
        self.last.set(Some(Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY)));
    }
}

impl PointerSource for TrackedPointer {
    fn sample(&mut self) -> Option<PointerSample> {
        self.last.get().map(|position| PointerSample {
            position,
            space: CoordinateSpace::Logical,
        })
    }
}

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
mod x11 {
    use super::PointerSource;
    use crate::geometry::{CoordinateSpace, Point, PointerSample};
    use anyhow::{Context, Result, anyhow};
    use x11rb::connection::Connection;
    use x11rb::protocol::xproto::{ConnectionExt, Window};
    use x11rb::rust_connection::RustConnection;

    pub struct X11Pointer {
        conn: RustConnection,
        root: Window,
    }

    impl X11Pointer {
        pub fn connect() -> Result<Self> {
            // XWayland only sees the pointer over X11 clients
            if std::env::var("WAYLAND_DISPLAY").is_ok() {
                anyhow::bail!("Wayland session, global pointer queries are unavailable");
            }

            let (conn, screen_num) =
                x11rb::connect(None).context("Failed to connect to X11 display")?;
            let root = conn
                .setup()
                .roots
                .get(screen_num)
                .map(|screen| screen.root)
                .ok_or_else(|| anyhow!("X11 screen {screen_num} not found"))?;

            tracing::debug!("Polling pointer on X11 root window {}", root);
            Ok(Self { conn, root })
        }
    }

    impl PointerSource for X11Pointer {
        fn sample(&mut self) -> Option<PointerSample> {
            let reply = match self.conn.query_pointer(self.root) {
                Ok(cookie) => cookie.reply(),
                Err(e) => {
                    tracing::debug!("X11 pointer query failed: {:?}", e);
                    return None;
                }
            };

            match reply {
                Ok(reply) => Some(PointerSample {
                    position: Point::new(reply.root_x as f32, reply.root_y as f32),
                    space: CoordinateSpace::Physical,
                }),
                Err(e) => {
                    tracing::debug!("X11 pointer reply failed: {:?}", e);
                    None
                }
            }
        }
    }
}

#[cfg(target_os = "macos")]
mod quartz {
    use super::PointerSource;
    use crate::geometry::{CoordinateSpace, Point, PointerSample};
    use core_graphics::event::CGEvent;
    use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

    pub struct QuartzPointer;

    impl PointerSource for QuartzPointer {
        fn sample(&mut self) -> Option<PointerSample> {
            let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState).ok()?;
            let event = CGEvent::new(source).ok()?;
            let location = event.location();

            // Quartz global coordinates: points, top-left origin
            Some(PointerSample {
                position: Point::new(location.x as f32, location.y as f32),
                space: CoordinateSpace::Logical,
            })
        }
    }
}

#[cfg(target_os = "windows")]
mod win32 {
    use super::PointerSource;
    use crate::geometry::{CoordinateSpace, Point, PointerSample};
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    pub struct Win32Pointer;

    impl PointerSource for Win32Pointer {
        fn sample(&mut self) -> Option<PointerSample> {
            let mut point = POINT::default();
            unsafe {
                GetCursorPos(&mut point).ok()?;
            }

            Some(PointerSample {
                position: Point::new(point.x as f32, point.y as f32),
                space: CoordinateSpace::Physical,
            })
        }
    }
}
