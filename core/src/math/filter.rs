use crate::prelude::FilterTuning;

/// One-dimensional recursive estimator used to smooth a single noisy channel.
#[derive(Debug, Clone)]
pub struct ScalarFilter {
    x: f64,
    p: f64,
    q: f64,
    r: f64,
    seeded: bool,
}

impl ScalarFilter {
    /// Starts from `initial` with unit uncertainty.
    pub fn new(initial: f64, q: f64, r: f64) -> Self {
        Self {
            x: initial,
            p: 1.0,
            q,
            r,
            seeded: true,
        }
    }

    /// Adopts the first measurement as its state.
    pub fn seeded(tuning: FilterTuning) -> Self {
        Self {
            x: 0.0,
            p: 1.0,
            q: tuning.q,
            r: tuning.r,
            seeded: false,
        }
    }

    pub fn update(&mut self, measurement: f64) -> f64 {
        if !self.seeded {
            self.x = measurement;
            self.seeded = true;
        }
        self.p += self.q;
        let k = self.p / (self.p + self.r);
        self.x += k * (measurement - self.x);
        self.p *= 1.0 - k;
        self.x
    }

    pub fn estimate(&self) -> f64 {
        self.x
    }

    /// Forget the state; the next measurement seeds the filter again.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.p = 1.0;
        self.seeded = false;
    }
}
