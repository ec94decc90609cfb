// ABOUTME: Core dock state and Model-View-Update logic, independent of the UI toolkit
// ABOUTME: Routes pointer polls, animation ticks, clicks, and hovers through one update function

use crate::entries::DockEntry;
use crate::geometry::{DockGeometry, Footprint, Point, tooltip_anchor};
use crate::launcher::{ActionRunner, dispatch};
use crate::visibility::{Frame, Phase, VisibilityMachine};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub index: usize,
    pub text: String,
    /// Top-left corner in dock-window coordinates.
    pub anchor: Point,
}

#[derive(Clone, Debug)]
pub enum Message {
    /// Global pointer position in logical screen pixels, if the platform could tell.
    PointerPolled { pointer: Option<Point>, now: Instant },
    Tick(Instant),
    IconPressed { index: usize, button: PointerButton },
    IconHovered { index: usize, hovered: bool, text_width: f32 },
}

pub struct DockState {
    pub entries: Vec<DockEntry>,
    pub geometry: DockGeometry,
    visibility: VisibilityMachine,
    tooltip: Option<Tooltip>,
    runner: Box<dyn ActionRunner>,
}

impl DockState {
    pub fn new(
        entries: Vec<DockEntry>,
        geometry: DockGeometry,
        animation: Duration,
        runner: Box<dyn ActionRunner>,
    ) -> Self {
        Self {
            visibility: VisibilityMachine::new(&geometry, animation),
            entries,
            geometry,
            tooltip: None,
            runner,
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::PointerPolled { pointer, now } => {
                self.visibility.advance(now);

                let Some(pointer) = pointer else {
                    return;
                };

                let rect = self.geometry.settled_rect(self.visibility.settled_visible());
                if let Some(direction) = self.visibility.poll(rect.contains(pointer), now) {
                    tracing::debug!("Starting {:?} transition", direction);
                    self.tooltip = None;
                }
            }

            Message::Tick(now) => {
                self.visibility.advance(now);
            }

            Message::IconPressed { index, button } => {
                if button != PointerButton::Left {
                    return;
                }
                if let Some(entry) = self.entries.get(index) {
                    dispatch(&entry.action, self.runner.as_ref());
                }
            }

            Message::IconHovered { index, hovered, text_width } => {
                if !hovered {
                    if self.tooltip.as_ref().is_some_and(|t| t.index == index) {
                        self.tooltip = None;
                    }
                    return;
                }

                // Tooltips only show on a settled, visible dock
                if self.visibility.phase() != Phase::Visible {
                    self.tooltip = None;
                    return;
                }

                if let Some(entry) = self.entries.get(index) {
                    self.tooltip = Some(Tooltip {
                        index,
                        text: entry.label.clone(),
                        anchor: self.tooltip_anchor(index, text_width),
                    });
                }
            }
        }
    }

    fn tooltip_anchor(&self, index: usize, text_width: f32) -> Point {
        let panel = self.geometry.panel;
        let panel_origin = self.geometry.to_window(self.geometry.visible_pos);
        let tile = panel.tile_origin(index);
        let tile_origin = Point::new(panel_origin.x + tile.x, panel_origin.y + tile.y);

        tooltip_anchor(tile_origin, panel.icon_size, panel.tile_size(), text_width)
    }

    pub fn phase(&self) -> Phase {
        self.visibility.phase()
    }

    pub fn is_transitioning(&self) -> bool {
        self.visibility.is_transitioning()
    }

    /// Window area the dock needs right now. A hidden dock only keeps its
    /// hot strip, so nothing else on screen is covered.
    pub fn footprint(&self) -> Footprint {
        match self.visibility.phase() {
            Phase::Hidden => Footprint::HotStrip,
            _ => Footprint::Full,
        }
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn frame(&self, now: Instant) -> Frame {
        self.visibility.frame(now)
    }

    /// Panel top-left and opacity in dock-window coordinates.
    pub fn panel_frame(&self, now: Instant) -> Frame {
        let frame = self.frame(now);
        Frame {
            position: self.geometry.to_window(frame.position),
            opacity: frame.opacity,
        }
    }
}
