// Drag controller - Turns pointer gestures on the header into panel positions
use crate::domain::geometry::{Point, Position, Rect};

#[derive(Debug, Clone, Copy)]
struct DragGesture {
    start_pointer: Point,
    start_position: Position,
}

#[derive(Debug, Default)]
pub struct DragController {
    active: Option<DragGesture>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a gesture only when the pointer lands inside the header.
    pub fn begin(&mut self, pointer: Point, header: Rect) -> bool {
        if !header.contains(pointer) {
            return false;
        }
        self.active = Some(DragGesture {
            start_pointer: pointer,
            start_position: header.origin,
        });
        true
    }

    /// Unclamped position for the current pointer sample.
    pub fn update(&self, pointer: Point) -> Option<Position> {
        self.active.map(|gesture| {
            gesture.start_position.offset(
                pointer.x - gesture.start_pointer.x,
                pointer.y - gesture.start_pointer.y,
            )
        })
    }

    /// Ends the gesture; returns whether one was in progress.
    pub fn finish(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}
