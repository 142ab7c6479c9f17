// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It drives the simulated metric walks and the insight fallback pick.

/// Source of uniform randomness for everything that jitters.
///
/// Production code uses [`Prng`]; tests inject [`ScriptedSource`] so a tick
/// produces a known delta.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f32_01(&mut self) -> f32;

    #[inline]
    fn gen_range_f32(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32_01()
    }

    /// Symmetric jitter in `[-amplitude, amplitude)`.
    #[inline]
    fn jitter(&mut self, amplitude: f32) -> f32 {
        self.gen_range_f32(-amplitude, amplitude)
    }

    #[inline]
    fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as f32;
        let v = (self.next_f32_01() * span) as usize;
        low + v.min(high - low - 1)
    }
}

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Derive an independent generator, e.g. for work done outside a lock.
    pub fn fork(&mut self) -> Prng {
        Prng::new(self.next_u64())
    }
}

impl RandomSource for Prng {
    #[inline]
    fn next_f32_01(&mut self) -> f32 {
        // 24 bits of mantissa keep the result strictly below 1.0.
        let x = self.next_u32() >> 8;
        (x as f32) / ((1u32 << 24) as f32)
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so a script can never push a jitter past
/// its amplitude.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(samples: impl Into<Vec<f32>>) -> Self {
        let mut samples = samples.into();
        if samples.is_empty() {
            samples.push(0.5);
        }
        Self { samples, cursor: 0 }
    }

    /// A source whose every jitter is exactly zero.
    pub fn centered() -> Self {
        Self::new(vec![0.5])
    }
}

impl RandomSource for ScriptedSource {
    fn next_f32_01(&mut self) -> f32 {
        let v = self.samples[self.cursor % self.samples.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v.clamp(0.0, 0.999_999)
    }
}
