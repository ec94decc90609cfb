// ABOUTME: gpui components for the dock: the dock window view, icon tiles, and the label tooltip
// ABOUTME: Layout math lives in geometry/app; these only turn state into elements

#[cfg(not(test))]
pub mod dock_view;
pub mod icon_tile;
pub mod tooltip;

pub use icon_tile::IconTile;
pub use tooltip::TooltipBubble;
