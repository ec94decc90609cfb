// ABOUTME: Scoped control of the OS taskbar: hidden at startup when configured, shown again on every exit path
// ABOUTME: Windows toggles Shell_TrayWnd; other platforms have no taskbar to manage

use anyhow::Result;

pub trait TaskbarControl {
    fn set_visible(&self, visible: bool) -> Result<()>;
}

/// Restores the taskbar when dropped, when `restore` is called, or both;
/// restoring twice is harmless.
pub struct TaskbarGuard {
    control: Box<dyn TaskbarControl>,
    hidden: bool,
}

impl TaskbarGuard {
    pub fn acquire(control: Box<dyn TaskbarControl>, hide: bool) -> Self {
        // Not hiding still forces it visible, undoing a previous run that
        // died with the taskbar hidden
        if let Err(e) = control.set_visible(!hide) {
            tracing::warn!("Failed to {} taskbar: {:#}", if hide { "hide" } else { "show" }, e);
            return Self { control, hidden: false };
        }

        if hide {
            tracing::info!("Taskbar hidden while the dock runs");
        }
        Self { control, hidden: hide }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn restore(&mut self) {
        if !self.hidden {
            return;
        }
        self.hidden = false;

        match self.control.set_visible(true) {
            Ok(()) => tracing::info!("Taskbar restored"),
            Err(e) => tracing::error!("Failed to restore taskbar: {:#}", e),
        }
    }
}

impl Drop for TaskbarGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

pub fn system_taskbar() -> Box<dyn TaskbarControl> {
    #[cfg(target_os = "windows")]
    {
        Box::new(win32::ShellTray)
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(NoTaskbar)
    }
}

#[cfg(not(target_os = "windows"))]
struct NoTaskbar;

#[cfg(not(target_os = "windows"))]
impl TaskbarControl for NoTaskbar {
    fn set_visible(&self, visible: bool) -> Result<()> {
        tracing::debug!("No taskbar to toggle on this platform (visible = {})", visible);
        Ok(())
    }
}

#[cfg(target_os = "windows")]
mod win32 {
    use super::TaskbarControl;
    use anyhow::{Context, Result};
    use windows::Win32::UI::WindowsAndMessaging::{FindWindowA, SW_HIDE, SW_RESTORE, ShowWindow};
    use windows::core::{PCSTR, s};

    /// The primary taskbar. Secondary monitors use Shell_SecondaryTrayWnd
    /// and are left alone.
    pub struct ShellTray;

    impl TaskbarControl for ShellTray {
        fn set_visible(&self, visible: bool) -> Result<()> {
            let hwnd = unsafe { FindWindowA(s!("Shell_TrayWnd"), PCSTR::null()) }
                .context("Taskbar window Shell_TrayWnd not found")?;

            let command = if visible { SW_RESTORE } else { SW_HIDE };
            unsafe {
                // Returns the previous visibility, not an error
                let _ = ShowWindow(hwnd, command);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeTaskbar {
        calls: Rc<RefCell<Vec<bool>>>,
        broken: bool,
    }

    impl TaskbarControl for FakeTaskbar {
        fn set_visible(&self, visible: bool) -> Result<()> {
            self.calls.borrow_mut().push(visible);
            if self.broken {
                anyhow::bail!("Taskbar window Shell_TrayWnd not found");
            }
            Ok(())
        }
    }

    #[test]
    fn test_hide_then_restore_on_drop() {
        let fake = FakeTaskbar::default();
        {
            let guard = TaskbarGuard::acquire(Box::new(fake.clone()), true);
            assert!(guard.is_hidden());
        }

        assert_eq!(*fake.calls.borrow(), vec![false, true]);
    }

    #[test]
    fn test_restore_is_idempotent() {
        let fake = FakeTaskbar::default();
        let mut guard = TaskbarGuard::acquire(Box::new(fake.clone()), true);

        guard.restore();
        guard.restore();
        drop(guard);

        assert_eq!(*fake.calls.borrow(), vec![false, true]);
    }

    #[test]
    fn test_not_hiding_ensures_visible_once() {
        let fake = FakeTaskbar::default();
        let guard = TaskbarGuard::acquire(Box::new(fake.clone()), false);
        assert!(!guard.is_hidden());
        drop(guard);

        assert_eq!(*fake.calls.borrow(), vec![true]);
    }

    #[test]
    fn test_failed_hide_does_not_restore() {
        let fake = FakeTaskbar { broken: true, ..FakeTaskbar::default() };
        let guard = TaskbarGuard::acquire(Box::new(fake.clone()), true);
        assert!(!guard.is_hidden());
        drop(guard);

        assert_eq!(*fake.calls.borrow(), vec![false]);
    }

    #[test]
    fn test_restore_runs_during_unwind() {
        let fake = FakeTaskbar::default();
        let inner = fake.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = TaskbarGuard::acquire(Box::new(inner), true);
            panic!("dock crashed");
        }));

        assert!(result.is_err());
        assert_eq!(*fake.calls.borrow(), vec![false, true]);
    }
}
