//! Pointer input shared between the event handlers and the frame driver.

/// One normalized pointer reading: position in [0, 1]² plus a pressed flag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl PointerSample {
    /// The active flag as the shader expects it.
    pub fn flag(&self) -> f32 {
        if self.active { 1.0 } else { 0.0 }
    }
}

/// Accumulates pointer events between frames.
///
/// Events only overwrite the stored sample; the frame driver reads it once
/// per frame, so the last write before sampling wins.
#[derive(Default)]
pub struct PointerTracker {
    sample: PointerSample,
}

impl PointerTracker {
    pub fn set(&mut self, x: f32, y: f32) {
        self.sample = PointerSample { x, y, active: true };
    }

    /// The pointer left the surface; the position is kept so a release does
    /// not teleport the drag segment.
    pub fn clear(&mut self) {
        self.sample.active = false;
    }

    pub fn sample(&self) -> PointerSample {
        self.sample
    }
}

/// The current and one-frame-old pointer samples forming the drag segment.
#[derive(Default)]
pub struct PointerPair {
    current: PointerSample,
    previous: PointerSample,
}

impl PointerPair {
    /// Rotate in the next sample and return `(previous, current)`.
    ///
    /// While there is no drag history the previous sample is seeded from the
    /// current one, so the first active frame never produces a spurious
    /// segment from the origin.
    pub fn advance(&mut self, next: PointerSample) -> (PointerSample, PointerSample) {
        self.previous = self.current;
        self.current = next;

        if !self.previous.active {
            self.previous = self.current;
        }

        (self.previous, self.current)
    }
}
