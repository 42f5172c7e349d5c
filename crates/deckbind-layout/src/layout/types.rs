//! Layout data types for the contact-sheet grid
//!
//! These types sit between the geometry calculations and PDF rendering.

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Whether `other` lies inside this rectangle, within `tolerance` points
    pub fn contains(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.top() <= self.top() + tolerance
    }

    /// Whether the two rectangles share interior area
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }
}

/// One placement region on a grid page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Row-major index within the page (0..capacity)
    pub index: usize,
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
    /// Slot bounds, origin at the page's bottom-left corner
    pub rect: Rect,
}

/// Resolved slot layout for one page size and grid configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SlotGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub rows: usize,
    pub columns: usize,
    /// Slots in row-major order, top-to-bottom then left-to-right
    pub slots: Vec<Slot>,
}

impl SlotGeometry {
    /// Number of slots on one page
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }
}
