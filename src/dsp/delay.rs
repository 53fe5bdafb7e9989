/// Single-tap feedback delay: `y[n] = x[n] + feedback · y[n - delay]`.
///
/// The buffer holds the last `delay` outputs. Until it has filled, the tap
/// reads zeros, so the first `delay` samples pass through dry.
pub struct FeedbackDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
}

impl FeedbackDelay {
    /// `feedback` is clamped below 1 so the loop always decays.
    pub fn new(delay_samples: usize, feedback: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples],
            write_pos: 0,
            feedback: feedback.clamp(0.0, 0.99),
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.buffer.len()
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        if self.buffer.is_empty() {
            return sample;
        }

        let delayed = self.buffer[self.write_pos];
        let output = sample + self.feedback * delayed;
        self.buffer[self.write_pos] = output;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();

        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
