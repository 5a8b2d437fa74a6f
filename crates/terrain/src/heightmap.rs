use blockfield_common::TerrainConfig;
use noise::{NoiseFn, Simplex};

/// Maps a grid column to the height of its top block.
pub trait Heightmap {
    fn height(&self, x: u32, z: u32) -> i32;
}

impl<F> Heightmap for F
where
    F: Fn(u32, u32) -> i32,
{
    fn height(&self, x: u32, z: u32) -> i32 {
        self(x, z)
    }
}

/// Every column at the same height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatHeightmap(pub i32);

impl Heightmap for FlatHeightmap {
    fn height(&self, _x: u32, _z: u32) -> i32 {
        self.0
    }
}

/// 2-D simplex noise rescaled from `-1..1` into `0..=amplitude`:
/// `floor(((noise(x / scale, z / scale) + 1) / 2) * amplitude)`.
#[derive(Clone)]
pub struct NoiseHeightmap {
    noise: Simplex,
    scale: f64,
    amplitude: u32,
}

impl NoiseHeightmap {
    pub const DEFAULT_SCALE: f64 = 20.0;

    pub fn new(seed: u32, scale: f64, amplitude: u32) -> Self {
        Self {
            noise: Simplex::new(seed),
            scale,
            amplitude,
        }
    }

    /// Default seed and scale, heights up to `chunk_size`.
    pub fn for_chunk(chunk_size: u32) -> Self {
        Self::new(0, Self::DEFAULT_SCALE, chunk_size)
    }

    pub fn from_config(config: &TerrainConfig) -> Self {
        Self::new(config.seed, config.noise_scale, config.chunk_size)
    }

    /// Raw noise sample in roughly `-1..1`.
    pub fn sample(&self, x: u32, z: u32) -> f64 {
        self.noise
            .get([x as f64 / self.scale, z as f64 / self.scale])
    }
}

impl Default for NoiseHeightmap {
    /// Noise over the default terrain configuration.
    fn default() -> Self {
        Self::from_config(&TerrainConfig::default())
    }
}

impl std::fmt::Debug for NoiseHeightmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseHeightmap")
            .field("scale", &self.scale)
            .field("amplitude", &self.amplitude)
            .finish_non_exhaustive()
    }
}

impl Heightmap for NoiseHeightmap {
    fn height(&self, x: u32, z: u32) -> i32 {
        // Clamped so overshoot from the noise never leaves `0..=amplitude`.
        let unit = ((self.sample(x, z) + 1.0) / 2.0).clamp(0.0, 1.0);
        (unit * self.amplitude as f64).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_heightmaps() {
        let hm = |x: u32, z: u32| (x + z) as i32;
        assert_eq!(hm.height(2, 3), 5);
    }

    #[test]
    fn flat_is_constant() {
        let hm = FlatHeightmap(7);
        assert_eq!(hm.height(0, 0), 7);
        assert_eq!(hm.height(15, 3), 7);
    }

    #[test]
    fn noise_heights_in_range() {
        let hm = NoiseHeightmap::for_chunk(16);
        for x in 0..32 {
            for z in 0..32 {
                let h = hm.height(x, z);
                assert!((0..=16).contains(&h), "height {h} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn height_is_floor_of_rescaled_noise() {
        for (seed, scale, amplitude) in [(0, 20.0, 16), (7, 4.0, 64), (3, 1.5, 5)] {
            let hm = NoiseHeightmap::new(seed, scale, amplitude);
            for x in 0..24 {
                for z in 0..24 {
                    let unit = ((hm.sample(x, z) + 1.0) / 2.0).clamp(0.0, 1.0);
                    let expected = (unit * amplitude as f64).floor() as i32;
                    assert_eq!(hm.height(x, z), expected, "({x}, {z}) seed {seed}");
                }
            }
        }
    }

    #[test]
    fn height_rounds_down() {
        // Find a sample whose scaled value has a fractional part above one half.
        let hm = NoiseHeightmap::new(0, 3.0, 16);
        let (x, z, scaled) = (0..32)
            .flat_map(|x| (0..32).map(move |z| (x, z)))
            .map(|(x, z)| (x, z, ((hm.sample(x, z) + 1.0) / 2.0).clamp(0.0, 1.0) * 16.0))
            .find(|(_, _, s)| s.fract() > 0.6)
            .unwrap();
        assert_eq!(hm.height(x, z), scaled.floor() as i32);
        assert_ne!(hm.height(x, z), scaled.round() as i32);
    }

    #[test]
    fn default_matches_chunk_defaults() {
        let hm = NoiseHeightmap::default();
        let chunk = NoiseHeightmap::for_chunk(TerrainConfig::default().chunk_size);
        for x in 0..8 {
            assert_eq!(hm.height(x, 2 * x), chunk.height(x, 2 * x));
        }
    }

    #[test]
    fn noise_is_deterministic() {
        let a = NoiseHeightmap::new(9, 20.0, 16);
        let b = NoiseHeightmap::new(9, 20.0, 16);
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(a.height(x, z), b.height(x, z));
            }
        }
    }

    #[test]
    fn noise_varies_across_grid() {
        let hm = NoiseHeightmap::new(0, 4.0, 64);
        let first = hm.height(0, 0);
        let varies = (0..32).any(|x| (0..32).any(|z| hm.height(x, z) != first));
        assert!(varies);
    }

    #[test]
    fn from_config_uses_chunk_size_as_amplitude() {
        let config = TerrainConfig {
            chunk_size: 4,
            ..TerrainConfig::default()
        };
        let hm = NoiseHeightmap::from_config(&config);
        assert!((0..16).all(|x| (0..=4).contains(&hm.height(x, x))));
    }
}
