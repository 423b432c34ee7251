/// Simulation rate of the controller.
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Fixed-step accumulator.
///
/// `advance` feeds frame time in and returns how many fixed ticks are due.
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        let mut ticks = 0;
        while self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            ticks += 1;
        }
        ticks
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_frames() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(FIXED_DT * 0.5), 0);
        assert_eq!(step.advance(FIXED_DT * 0.6), 1);
        assert_eq!(step.advance(FIXED_DT * 0.5), 0);
    }

    #[test]
    fn long_frame_yields_several_ticks() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(FIXED_DT * 3.5), 3);
    }
}
