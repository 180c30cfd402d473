use crate::pixel::Pixel;

pub const CACHE_SIZE: usize = 64;

/// Table of recently seen pixels, keyed by [`Pixel::hash`].
///
/// Collisions overwrite the slot. Encoder and decoder apply the same writes
/// in the same order, so an index chunk always refers to the pixel the
/// encoder saw.
#[derive(Clone, Debug)]
pub(crate) struct PixelCache {
    slots: [Pixel; CACHE_SIZE],
}

impl PixelCache {
    pub fn new() -> Self {
        Self {
            slots: [Pixel::default(); CACHE_SIZE],
        }
    }

    pub fn get(&self, index: usize) -> Pixel {
        self.slots[index % CACHE_SIZE]
    }

    pub fn insert(&mut self, pixel: Pixel) {
        self.slots[pixel.hash()] = pixel;
    }

    /// Returns the slot if it already holds `pixel`, otherwise stores it
    /// there and returns `None`.
    pub fn find_or_insert(&mut self, pixel: Pixel) -> Option<usize> {
        let index = pixel.hash();
        if self.slots[index] == pixel {
            return Some(index);
        }
        self.slots[index] = pixel;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::PixelCache;
    use crate::pixel::Pixel;

    #[test]
    fn test_starts_zeroed() {
        let cache = PixelCache::new();
        assert!((0..64).all(|i| cache.get(i) == Pixel::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_find_or_insert() {
        let mut cache = PixelCache::new();
        let pixel = Pixel::new(10, 20, 30, 255);
        assert_eq!(cache.find_or_insert(pixel), None);
        assert_eq!(cache.find_or_insert(pixel), Some(9));
        assert_eq!(cache.get(9), pixel);
    }

    #[test]
    fn test_collision_overwrites() {
        // 64 * 3 is a multiple of 64, so both land in slot 0
        let first = Pixel::new(0, 0, 0, 0);
        let second = Pixel::new(64, 0, 0, 0);
        assert_eq!(first.hash(), second.hash());

        let mut cache = PixelCache::new();
        cache.insert(second);
        assert_eq!(cache.get(0), second);
        assert_eq!(cache.find_or_insert(first), None);
        assert_eq!(cache.get(0), first);
    }
}
