/// SplitMix64 generator; deterministic for a given seed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

pub(crate) const DEFAULT_NOISE_SIZE: usize = 256;

/// Periodic 1D value noise in `[0, 1)`.
///
/// A table of `size` random values is linearly interpolated; `sample(x)` wraps every `1.0` of
/// input, so the phase may grow without bound.
#[derive(Clone, Debug)]
pub(crate) struct ValueNoise {
    values: Vec<f64>,
}

impl ValueNoise {
    pub(crate) fn new(seed: u64, size: usize) -> Self {
        let size = size.max(2);
        let mut rng = Rng64::new(seed);
        let values = (0..size).map(|_| rng.next_f64_01()).collect();
        Self { values }
    }

    pub(crate) fn sample(&self, x: f64) -> f64 {
        let n = self.values.len();
        let scaled = x * n as f64;
        if !scaled.is_finite() {
            return self.values[0];
        }
        let floor = scaled.floor();
        let i = (floor.rem_euclid(n as f64)) as usize % n;
        let j = (i + 1) % n;
        let t = scaled - floor;
        let a = self.values[i];
        a + (self.values[j] - a) * t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/noise.rs"]
mod tests;
