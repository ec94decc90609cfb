// ABOUTME: Visual for one dock entry: the icon image, or a lettered placeholder when it could not be read
// ABOUTME: Click and hover wiring is added by the dock view around this element

#[cfg(not(test))]
use gpui::*;
use crate::entries::{DockEntry, IconSource};
#[cfg(not(test))]
use std::path::Path;
#[cfg(not(test))]
use std::sync::Arc;

#[derive(Clone)]
pub struct IconTile {
    pub label: String,
    pub icon: IconSource,
    pub icon_size: f32,
}

impl IconTile {
    pub fn new(entry: &DockEntry, icon_size: f32) -> Self {
        Self {
            label: entry.label.clone(),
            icon: entry.icon.clone(),
            icon_size,
        }
    }

    /// Letter shown on placeholder icons.
    pub fn placeholder_glyph(&self) -> String {
        self.label
            .chars()
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

#[cfg(not(test))]
impl IntoElement for IconTile {
    type Element = Div;

    fn into_element(self) -> Self::Element {
        let size = px(self.icon_size);

        match self.icon {
            IconSource::Image(ref path) => div()
                .size(size)
                .child(img(Arc::<Path>::from(path.as_path())).size(size)),
            IconSource::Placeholder => div()
                .flex()
                .items_center()
                .justify_center()
                .size(size)
                .rounded(px(10.0))
                .bg(rgb(0x41434c))
                .border_1()
                .border_color(rgb(0x5a5d6b))
                .text_color(rgb(0xffffff))
                .text_size(px(self.icon_size * 0.45))
                .font_weight(FontWeight::BOLD)
                .child(self.placeholder_glyph()),
        }
    }
}
