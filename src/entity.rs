/// Axis-aligned rectangle in screen pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Left/top edges are inside, right/bottom edges are not.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && x >= self.left
            && x < self.right
            && y >= self.top
            && y < self.bottom
    }

    pub fn shift_x(&mut self, dx: f32) {
        self.left += dx;
        self.right += dx;
    }
}

#[derive(Debug, Clone)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub size: f32,
}

impl Bird {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.size, self.y + self.size)
    }

    /// Explicit Euler step: velocity first, then position.
    pub fn fall(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    pub fn jump(&mut self, jump_velocity: f32) {
        self.velocity = jump_velocity;
    }
}

/// Upper and lower pipe around one gap. Both share the same horizontal span.
#[derive(Debug, Clone)]
pub struct PipePair {
    pub upper: Rect,
    pub lower: Rect,
    pub scored: bool,
}

impl PipePair {
    pub fn new(left: f32, width: f32, gap_top: f32, gap: f32, screen_height: f32) -> Self {
        let right = left + width;
        Self {
            upper: Rect::new(left, 0.0, right, gap_top),
            lower: Rect::new(left, gap_top + gap, right, screen_height),
            scored: false,
        }
    }

    pub fn left(&self) -> f32 {
        self.upper.left
    }

    pub fn right(&self) -> f32 {
        self.upper.right
    }

    pub fn scroll(&mut self, speed: f32) {
        self.upper.shift_x(-speed);
        self.lower.shift_x(-speed);
    }

    pub fn hits(&self, rect: &Rect) -> bool {
        self.upper.intersects(rect) || self.lower.intersects(rect)
    }
}
