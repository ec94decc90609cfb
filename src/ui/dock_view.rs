// ABOUTME: Root gpui view of the dock window: polling loop, animation frames, icon clicks, and tooltips
// ABOUTME: Owns the dock state, the pointer source, and the taskbar guard; swaps the window to fit the phase

use crate::app::{DockState, Message, PointerButton};
use crate::geometry::{Footprint, ICON_PADDING, PANEL_PADDING, Point, Rect};
use crate::pointer::{PointerSource, TrackedPointer};
use crate::taskbar::TaskbarGuard;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use crate::tray::{DockTray, TrayEvent};
use crate::ui::tooltip::TOOLTIP_FONT_SIZE;
use crate::ui::{IconTile, TooltipBubble};
use gpui::{
    AnyWindowHandle, Bounds, Context, DisplayId, FontWeight, InteractiveElement, IntoElement,
    MouseButton, MouseDownEvent, MouseMoveEvent, ParentElement, Render, SharedString,
    StatefulInteractiveElement, Styled, Subscription, TextRun, Timer, Window,
    WindowBackgroundAppearance, WindowBounds, WindowKind, WindowOptions, div, point, px, rgb,
    rgba, size,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Roughly 60 fps while a transition runs.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct DockView {
    state: DockState,
    pointer: Box<dyn PointerSource>,
    /// Set when no global pointer source exists; fed from window mouse events.
    tracked: Option<TrackedPointer>,
    taskbar: TaskbarGuard,
    window: AnyWindowHandle,
    /// Area the current window covers; follows `DockState::footprint`.
    footprint: Footprint,
    display_id: Option<DisplayId>,
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    _tray: Option<DockTray>,
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    log_path: PathBuf,
    poll_interval: Duration,
    _quit_subscription: Subscription,
}

pub struct DockViewOptions {
    pub state: DockState,
    pub pointer: Option<Box<dyn PointerSource>>,
    pub taskbar: TaskbarGuard,
    /// The window this view was first opened in, sized for the hidden dock.
    pub window: AnyWindowHandle,
    pub display_id: Option<DisplayId>,
    pub log_path: PathBuf,
    pub poll_interval: Duration,
}

/// A borderless, unfocused, transparent pop-up over `rect`.
pub fn dock_window_options(rect: Rect, display_id: Option<DisplayId>) -> WindowOptions {
    let bounds = Bounds::new(
        point(px(rect.origin.x), px(rect.origin.y)),
        size(px(rect.size.width), px(rect.size.height)),
    );

    WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        titlebar: None,
        focus: false,
        show: true,
        kind: WindowKind::PopUp,
        is_movable: false,
        display_id,
        window_background: WindowBackgroundAppearance::Transparent,
        ..Default::default()
    }
}

impl DockView {
    pub fn new(options: DockViewOptions, cx: &mut Context<Self>) -> Self {
        let (pointer, tracked) = match options.pointer {
            Some(pointer) => (pointer, None),
            None => {
                tracing::info!("Falling back to in-window pointer tracking");
                let tracked = TrackedPointer::new();
                (Box::new(tracked.clone()) as Box<dyn PointerSource>, Some(tracked))
            }
        };

        tracing::debug!("Action failures are logged to {}", options.log_path.display());

        // Put the taskbar back on a normal quit; Drop covers the rest
        let quit_subscription = cx.on_app_quit(|this: &mut Self, _cx| {
            this.taskbar.restore();
            async {}
        });

        let footprint = options.state.footprint();
        let view = Self {
            state: options.state,
            pointer,
            tracked,
            taskbar: options.taskbar,
            window: options.window,
            footprint,
            display_id: options.display_id,
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            _tray: match DockTray::new() {
                Ok(tray) => Some(tray),
                Err(e) => {
                    tracing::warn!("Tray icon unavailable: {:#}", e);
                    None
                }
            },
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            log_path: options.log_path,
            poll_interval: options.poll_interval,
            _quit_subscription: quit_subscription,
        };

        view.start_polling(cx);
        view
    }

    fn start_polling(&self, cx: &mut Context<Self>) {
        let interval = self.poll_interval;
        cx.spawn(async move |this, cx| {
            loop {
                Timer::after(interval).await;
                if this.update(cx, |view, cx| view.poll(cx)).is_err() {
                    break;
                }
            }
        })
        .detach();
    }

    fn poll(&mut self, cx: &mut Context<Self>) {
        #[cfg(any(target_os = "macos", target_os = "windows"))]
        self.handle_tray_events(cx);

        let geometry = self.state.geometry;
        let pointer = self.pointer.sample().map(|sample| geometry.to_logical(sample));

        let was_transitioning = self.state.is_transitioning();
        self.state.update(Message::PointerPolled { pointer, now: Instant::now() });

        if self.state.is_transitioning() && !was_transitioning {
            self.start_animation(cx);
        }
        self.sync_window(cx);
        cx.notify();
    }

    /// Reopens the dock window when the phase needs a different footprint:
    /// the full slide area from the start of a reveal until the dock is
    /// hidden again, and only the hot strip in between.
    fn sync_window(&mut self, cx: &mut Context<Self>) {
        let footprint = self.state.footprint();
        if footprint == self.footprint {
            return;
        }

        let previous_footprint = self.footprint;
        self.footprint = footprint;

        let options = dock_window_options(
            self.state.geometry.footprint_rect(footprint),
            self.display_id,
        );
        let previous = self.window;
        let view = cx.entity();

        // Runs outside this update; the new window renders this same view
        cx.defer(move |cx| {
            let root = view.clone();
            match cx.open_window(options, move |_, _| root) {
                Ok(handle) => view.update(cx, |this, _| this.window = handle.into()),
                Err(e) => {
                    tracing::error!("Failed to open {:?} dock window: {:#}", footprint, e);
                    view.update(cx, |this, _| this.footprint = previous_footprint);
                    return;
                }
            }

            if let Err(e) = previous.update(cx, |_, window, _| window.remove_window()) {
                tracing::warn!("Failed to close previous dock window: {:#}", e);
            }
        });
    }

    fn start_animation(&self, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            loop {
                Timer::after(FRAME_INTERVAL).await;
                let running = this.update(cx, |view, cx| {
                    view.state.update(Message::Tick(Instant::now()));
                    view.sync_window(cx);
                    cx.notify();
                    view.state.is_transitioning()
                });

                if !matches!(running, Ok(true)) {
                    break;
                }
            }
        })
        .detach();
    }

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    fn handle_tray_events(&mut self, cx: &mut Context<Self>) {
        while let Some(event) = DockTray::try_recv_event() {
            match event {
                TrayEvent::OpenLog => {
                    if let Err(e) = open::that_detached(&self.log_path) {
                        tracing::error!("Error opening log file: {}", e);
                    }
                }
                TrayEvent::Quit => {
                    tracing::info!("Quit requested from tray");
                    self.taskbar.restore();
                    cx.quit();
                }
            }
        }
    }

    fn handle_icon_down(&mut self, index: usize, event: &MouseDownEvent, cx: &mut Context<Self>) {
        let button = match event.button {
            MouseButton::Left => PointerButton::Left,
            MouseButton::Right => PointerButton::Right,
            MouseButton::Middle => PointerButton::Middle,
            _ => PointerButton::Other,
        };
        self.state.update(Message::IconPressed { index, button });
        cx.notify();
    }

    fn handle_icon_hover(
        &mut self,
        index: usize,
        hovered: bool,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let text_width = self
            .state
            .entries
            .get(index)
            .map(|entry| measure_text(&entry.label, window))
            .unwrap_or_default();

        self.state.update(Message::IconHovered { index, hovered, text_width });
        cx.notify();
    }

    fn handle_window_mouse_move(&mut self, event: &MouseMoveEvent) {
        if let Some(tracked) = &self.tracked {
            let local = Point::new(f32::from(event.position.x), f32::from(event.position.y));
            tracked.moved(self.state.geometry.to_screen(self.footprint, local));
        }
    }

    fn handle_window_hover(&mut self, hovered: bool) {
        if let (Some(tracked), false) = (&self.tracked, hovered) {
            tracked.left();
        }
    }

    fn render_tiles(&self, cx: &mut Context<Self>) -> Vec<gpui::Stateful<gpui::Div>> {
        let panel = self.state.geometry.panel;

        self.state
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                div()
                    .id(("dock-icon", index))
                    .flex()
                    .items_center()
                    .justify_center()
                    .size(px(panel.tile_size()))
                    .p(px(ICON_PADDING))
                    .rounded(px(8.0))
                    .hover(|style| style.bg(rgba(0xffffff33)))
                    .on_any_mouse_down(cx.listener(move |this, event: &MouseDownEvent, _window, cx| {
                        this.handle_icon_down(index, event, cx);
                    }))
                    .on_hover(cx.listener(move |this, hovered: &bool, window, cx| {
                        this.handle_icon_hover(index, *hovered, window, cx);
                    }))
                    .child(IconTile::new(entry, panel.icon_size))
            })
            .collect()
    }
}

/// Rendered width of `text` in the tooltip font.
fn measure_text(text: &str, window: &mut Window) -> f32 {
    let text: SharedString = text.to_string().into();
    let mut style = window.text_style();
    style.font_weight = FontWeight::NORMAL;

    let run = TextRun {
        len: text.len(),
        font: style.font(),
        color: style.color,
        background_color: None,
        underline: None,
        strikethrough: None,
    };

    let line = window
        .text_system()
        .shape_line(text, px(TOOLTIP_FONT_SIZE), &[run], None);
    f32::from(line.width)
}

impl Render for DockView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let frame = self.state.panel_frame(Instant::now());
        let window_width = self.state.geometry.window_rect().size.width;

        let tooltip = self.state.tooltip().map(|tooltip| TooltipBubble {
            text: tooltip.text.clone(),
            anchor: tooltip.anchor,
            text_width: measure_text(&tooltip.text, window),
            window_width,
        });

        let panel = div()
            .absolute()
            .left(px(frame.position.x))
            .top(px(frame.position.y))
            .opacity(frame.opacity)
            .flex()
            .flex_row()
            .p(px(PANEL_PADDING))
            .border_1()
            .border_color(rgb(0x41434c))
            .rounded(px(16.0))
            .bg(rgba(0x1e2131d9))
            .children(self.render_tiles(cx));

        let root = div()
            .id("dock-root")
            .relative()
            .size_full()
            .on_mouse_move(cx.listener(|this, event: &MouseMoveEvent, _window, _cx| {
                this.handle_window_mouse_move(event);
            }))
            .on_hover(cx.listener(|this, hovered: &bool, _window, _cx| {
                this.handle_window_hover(*hovered);
            }));

        // The hot strip only watches the pointer
        if self.footprint == Footprint::HotStrip {
            return root;
        }

        root.child(panel).children(tooltip)
    }
}
