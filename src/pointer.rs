// Pointer tracking: turns mouse/touch client coordinates into raster
// coordinates and remembers whether the pointer is currently held down.

/// A point in window/client space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

impl ClientPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in surface (raster) space. May lie outside the raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalPoint {
    pub x: f32,
    pub y: f32,
}

/// Raw input as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Mouse(ClientPoint),
    /// Every active touch; only the first one drives the brush.
    Touch(Vec<ClientPoint>),
}

impl PointerEvent {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::Mouse(ClientPoint::new(x, y))
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self::Touch(vec![ClientPoint::new(x, y)])
    }

    /// The point that drives the brush, `None` for a touch event without touches.
    pub fn client_point(&self) -> Option<ClientPoint> {
        match self {
            Self::Mouse(p) => Some(*p),
            Self::Touch(touches) => touches.first().copied(),
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch(_))
    }
}

/// Where the surface is displayed, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn contains(&self, p: ClientPoint) -> bool {
        p.x >= self.left
            && p.y >= self.top
            && p.x < self.left + self.width
            && p.y < self.top + self.height
    }
}

/// Map a client point into surface space, correcting for display scaling.
/// No clamping; returns `None` only when the box has no area.
pub fn to_local(p: ClientPoint, rect: ScreenBox, surface_w: u32, surface_h: u32) -> Option<LocalPoint> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    Some(LocalPoint {
        x: (p.x - rect.left) * (surface_w as f32 / rect.width),
        y: (p.y - rect.top) * (surface_h as f32 / rect.height),
    })
}

/// Engaged flag, flipped by press on the surface and release anywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    engaged: bool,
}

impl PointerTracker {
    pub fn engage(&mut self) {
        self.engaged = true;
    }

    pub fn release(&mut self) {
        self.engaged = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}
