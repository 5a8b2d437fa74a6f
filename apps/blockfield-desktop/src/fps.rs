/// Counts presented frames and reports the total once per elapsed second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    window_start: f64,
}

impl FpsCounter {
    pub fn new(now: f64) -> Self {
        Self {
            frames: 0,
            window_start: now,
        }
    }

    /// Count one frame at time `now` (seconds). Returns the frame count when
    /// more than a second has passed since the last report.
    pub fn tick(&mut self, now: f64) -> Option<u32> {
        self.frames += 1;
        if now - self.window_start > 1.0 {
            let frames = self.frames;
            self.window_start = now;
            self.frames = 0;
            Some(frames)
        } else {
            None
        }
    }
}
