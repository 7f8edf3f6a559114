/// Seeded mulberry32 generator; identical seeds replay identical games.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f64 / 4_294_967_296.0) as f32
    }

    /// Uniform index in `0..len`; 0 for empty or single-element ranges.
    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.pick_index(items.len());
        items.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn pick_index_stays_in_range() {
        let mut rng = Rng::new(7);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let idx = rng.pick_index(3);
            assert!(idx < 3);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
        assert_eq!(rng.pick_index(0), 0);
        assert_eq!(rng.pick_index(1), 0);
    }

    #[test]
    fn pick_from_empty_slice_is_none() {
        let mut rng = Rng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[9]), Some(&9));
    }

    #[test]
    fn floats_are_unit_interval() {
        let mut rng = Rng::new(99);
        for _ in 0..1_000 {
            let value = rng.next_f32();
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
