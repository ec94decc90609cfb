// ABOUTME: Label tooltip drawn inside the dock window above the hovered icon
// ABOUTME: Position comes from the dock state; this only keeps it on-window and styles it

#[cfg(not(test))]
use gpui::*;
use crate::geometry::{Point, TOOLTIP_CHROME};

pub const TOOLTIP_FONT_SIZE: f32 = 13.0;

#[derive(Clone)]
pub struct TooltipBubble {
    pub text: String,
    pub anchor: Point,
    pub text_width: f32,
    pub window_width: f32,
}

impl TooltipBubble {
    /// Anchor shifted so the bubble stays within the window horizontally.
    pub fn clamped_anchor(&self) -> Point {
        let bubble_width = self.text_width + TOOLTIP_CHROME;
        let max_x = (self.window_width - bubble_width).max(0.0);
        Point::new(self.anchor.x.clamp(0.0, max_x), self.anchor.y.max(0.0))
    }
}

#[cfg(not(test))]
impl IntoElement for TooltipBubble {
    type Element = Div;

    fn into_element(self) -> Self::Element {
        let anchor = self.clamped_anchor();

        div()
            .absolute()
            .left(px(anchor.x))
            .top(px(anchor.y))
            .px(px(TOOLTIP_CHROME / 2.0 - 1.0))
            .py(px(3.0))
            .rounded(px(3.0))
            .border_1()
            .border_color(rgb(0x41434c))
            .bg(rgb(0x1e2131))
            .text_color(rgb(0xffffff))
            .text_size(px(TOOLTIP_FONT_SIZE))
            .whitespace_nowrap()
            .child(self.text)
    }
}
