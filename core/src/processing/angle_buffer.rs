use crate::math::angle::shortest_rotation;

/// Two-slot history that unwraps a stream of angles across the 0/360 seam.
///
/// The first slot holds the last unwrapped output, the second the newest sample. Each
/// push moves the output by the shortest rotation from the previous one, so a heading
/// going 359 -> 1 yields 359 -> 361 and a filter fed from it never sweeps backwards
/// through the whole compass rose.
#[derive(Debug, Clone, Default)]
pub struct AngleBuffer {
    slots: [Option<f64>; 2],
}

impl AngleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `angle` and returns its unwrapped counterpart.
    pub fn push(&mut self, angle: f64) -> f64 {
        let unwrapped = match self.slots[0] {
            Some(previous) => previous + shortest_rotation(previous, angle),
            None => angle,
        };
        self.slots = [Some(unwrapped), Some(angle)];
        unwrapped
    }

    /// Last unwrapped value, if any sample arrived since the last reset.
    pub fn last(&self) -> Option<f64> {
        self.slots[0]
    }

    /// Newest raw sample.
    pub fn latest_sample(&self) -> Option<f64> {
        self.slots[1]
    }

    pub fn reset(&mut self) {
        self.slots = [None, None];
    }
}
