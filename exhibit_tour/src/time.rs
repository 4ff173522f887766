/// Frame timing handed to every per-tick update.
///
/// `delta` is scaled by `time_scale` (pause / slow motion), `unscaled_delta` is wall-clock
/// frame time. Safety gestures use the unscaled value so a paused tour can still be exited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Time {
    pub delta: f32,
    pub unscaled_delta: f32,
    pub time_scale: f32,
    pub total: f32,
}

impl Time {
    pub fn new(unscaled_delta: f32, time_scale: f32) -> Time {
        let unscaled_delta = unscaled_delta.max(0.0);
        let time_scale = time_scale.max(0.0);
        Time {
            delta: unscaled_delta * time_scale,
            unscaled_delta,
            time_scale,
            total: 0.0,
        }
    }

    pub fn fixed(delta: f32) -> Time {
        Time::new(delta, 1.0)
    }

    /// Time for the following frame, keeping the scale and accumulating `total`.
    pub fn next(&self, unscaled_delta: f32) -> Time {
        let mut next = Time::new(unscaled_delta, self.time_scale);
        next.total = self.total + next.delta;
        next
    }

    pub fn with_scale(&self, time_scale: f32) -> Time {
        let mut time = Time::new(self.unscaled_delta, time_scale);
        time.total = self.total;
        time
    }
}

impl Default for Time {
    fn default() -> Self {
        Time::fixed(0.0)
    }
}
