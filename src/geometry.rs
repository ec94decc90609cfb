// ABOUTME: Screen geometry for the dock: panel size, hidden/visible positions, window footprints, tooltip anchor
// ABOUTME: Everything is in logical pixels; physical pointer samples are scaled down by the DPI factor

pub const ICON_PADDING: f32 = 6.0;
pub const PANEL_PADDING: f32 = 6.0;
pub const PANEL_BORDER: f32 = 1.0;
/// Visible dock top sits this far above the icon height from the screen bottom.
pub const DOCK_HEIGHT_EXTRA: f32 = 46.0;
pub const TOOLTIP_MARGIN: f32 = 8.0;
/// Horizontal tooltip padding plus border, subtracted when centering.
pub const TOOLTIP_CHROME: f32 = 20.0;
/// Extra window width on each side so wide tooltips over edge icons are not clipped.
pub const TOOLTIP_SIDE_ROOM: f32 = 80.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Half-open: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.size.height
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateSpace {
    Logical,
    Physical,
}

/// A pointer position as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    pub space: CoordinateSpace,
}

/// Panel layout derived from the icon count and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelMetrics {
    pub icon_size: f32,
    pub size: Size,
}

impl PanelMetrics {
    pub fn for_icons(count: usize, icon_size: u32) -> Self {
        let icon_size = icon_size as f32;
        let tile = icon_size + 2.0 * ICON_PADDING;
        let chrome = 2.0 * (PANEL_PADDING + PANEL_BORDER);

        Self {
            icon_size,
            size: Size::new(count as f32 * tile + chrome, tile + chrome),
        }
    }

    /// Edge length of one clickable tile (icon plus its padding).
    pub fn tile_size(&self) -> f32 {
        self.icon_size + 2.0 * ICON_PADDING
    }

    /// Top-left of tile `index`, relative to the panel's top-left.
    pub fn tile_origin(&self, index: usize) -> Point {
        let inset = PANEL_PADDING + PANEL_BORDER;
        Point::new(inset + index as f32 * self.tile_size(), inset)
    }
}

/// Which part of the screen the dock window covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footprint {
    /// Only the one-pixel row the hidden dock leaves on screen.
    HotStrip,
    /// The slide path plus tooltip room, see `DockGeometry::window_rect`.
    Full,
}

/// Hidden and visible panel positions. Computed once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockGeometry {
    /// Usable part of the display: taskbars and system docks are excluded.
    pub work_area: Rect,
    pub scale_factor: f32,
    pub panel: PanelMetrics,
    pub hidden_pos: Point,
    pub visible_pos: Point,
}

impl DockGeometry {
    pub fn new(work_area: Rect, scale_factor: f32, panel: PanelMetrics) -> Self {
        let x = work_area.origin.x + (work_area.size.width - panel.size.width) / 2.0;
        let bottom = work_area.bottom();

        Self {
            work_area,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
            panel,
            // One pixel row stays on screen so the bottom edge is a hot zone
            hidden_pos: Point::new(x, bottom - 1.0),
            visible_pos: Point::new(x, bottom - (panel.icon_size + DOCK_HEIGHT_EXTRA)),
        }
    }

    /// Panel rectangle when settled in the given state.
    pub fn settled_rect(&self, visible: bool) -> Rect {
        let origin = if visible { self.visible_pos } else { self.hidden_pos };
        Rect::new(origin, self.panel.size)
    }

    pub fn tooltip_headroom(&self) -> f32 {
        self.panel.tile_size() + TOOLTIP_MARGIN
    }

    /// Screen area of the dock window: the visible panel, room above it for
    /// tooltips, and everything below it down to the work area's edge.
    pub fn window_rect(&self) -> Rect {
        let headroom = self.tooltip_headroom();
        let origin = Point::new(
            self.visible_pos.x - TOOLTIP_SIDE_ROOM,
            self.visible_pos.y - headroom,
        );
        let size = Size::new(
            self.panel.size.width + 2.0 * TOOLTIP_SIDE_ROOM,
            self.work_area.bottom() - origin.y,
        );
        Rect::new(origin, size)
    }

    /// The part of the hidden panel that is still on screen.
    pub fn hot_strip_rect(&self) -> Rect {
        let height = self.work_area.bottom() - self.hidden_pos.y;
        Rect::new(self.hidden_pos, Size::new(self.panel.size.width, height))
    }

    pub fn footprint_rect(&self, footprint: Footprint) -> Rect {
        match footprint {
            Footprint::HotStrip => self.hot_strip_rect(),
            Footprint::Full => self.window_rect(),
        }
    }

    /// Converts a screen position into coordinates of the full dock window.
    pub fn to_window(&self, point: Point) -> Point {
        let window = self.window_rect();
        Point::new(point.x - window.origin.x, point.y - window.origin.y)
    }

    /// Converts a position inside a window with `footprint` back into screen coordinates.
    pub fn to_screen(&self, footprint: Footprint, point: Point) -> Point {
        let window = self.footprint_rect(footprint);
        Point::new(point.x + window.origin.x, point.y + window.origin.y)
    }

    pub fn to_logical(&self, sample: PointerSample) -> Point {
        match sample.space {
            CoordinateSpace::Logical => sample.position,
            CoordinateSpace::Physical => Point::new(
                sample.position.x / self.scale_factor,
                sample.position.y / self.scale_factor,
            ),
        }
    }
}

/// Where a tooltip for the tile at `tile_origin` should be placed: centered
/// on the icon using the measured text width, one tile height plus a margin
/// above the tile's top edge.
pub fn tooltip_anchor(tile_origin: Point, icon_size: f32, tile_height: f32, text_width: f32) -> Point {
    Point::new(
        tile_origin.x + ((icon_size - text_width - TOOLTIP_CHROME) / 2.0).floor(),
        tile_origin.y - TOOLTIP_MARGIN - tile_height,
    )
}
