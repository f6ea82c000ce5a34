/// Ordered breakpoint table mapping a scalar to a discrete value.
///
/// `get(v)` returns the value paired with the first breakpoint `>= v`
/// (lower-bound search). Anything above the last breakpoint maps to the
/// last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMap<K, V> {
    breakpoints: Vec<K>,
    values: Vec<V>,
    above_last: V,
}

impl<K: Ord + std::fmt::Debug, V: Copy> RangeMap<K, V> {
    /// Breakpoints must be strictly ascending and pair up one-to-one with
    /// values; the table must not be empty.
    pub fn new(breakpoints: Vec<K>, values: Vec<V>) -> Result<Self, String> {
        if breakpoints.len() != values.len() {
            return Err(format!(
                "{} breakpoints but {} notes; they must pair up",
                breakpoints.len(),
                values.len()
            ));
        }
        let Some(&above_last) = values.last() else {
            return Err("note table is empty".to_string());
        };
        if let Some(pair) = breakpoints.windows(2).find(|w| matches!(w, [a, b] if a >= b)) {
            return Err(format!("breakpoints must be strictly ascending, found {pair:?}"));
        }
        Ok(Self { breakpoints, values, above_last })
    }

    pub fn get(&self, key: &K) -> V {
        let idx = self.breakpoints.partition_point(|b| b < key);
        self.values.get(idx).copied().unwrap_or(self.above_last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{DEFAULT_BREAKPOINTS, DEFAULT_NOTES};

    fn default_map() -> RangeMap<i32, u8> {
        RangeMap::new(DEFAULT_BREAKPOINTS.to_vec(), DEFAULT_NOTES.to_vec()).unwrap()
    }

    #[test]
    fn exact_breakpoint_maps_to_its_note() {
        let map = default_map();
        assert_eq!(map.get(&0), 60);
        assert_eq!(map.get(&21), 62);
        assert_eq!(map.get(&231), 81);
    }

    #[test]
    fn between_breakpoints_takes_upper() {
        let map = default_map();
        assert_eq!(map.get(&1), 62);
        assert_eq!(map.get(&20), 62);
        assert_eq!(map.get(&22), 64);
        assert_eq!(map.get(&211), 81);
    }

    #[test]
    fn below_first_maps_to_first() {
        let map = default_map();
        assert_eq!(map.get(&-1), 60);
        assert_eq!(map.get(&i32::MIN), 60);
    }

    #[test]
    fn above_last_maps_to_last() {
        let map = default_map();
        assert_eq!(map.get(&232), 81);
        assert_eq!(map.get(&255), 81);
        assert_eq!(map.get(&i32::MAX), 81);
    }

    #[test]
    fn monotonic_over_byte_range() {
        let map = default_map();
        let notes: Vec<u8> = (0..=255).map(|v| map.get(&v)).collect();
        assert!(notes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn single_entry_table() {
        let map = RangeMap::new(vec![10], vec![42u8]).unwrap();
        assert_eq!(map.get(&-100), 42);
        assert_eq!(map.get(&10), 42);
        assert_eq!(map.get(&1000), 42);
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(RangeMap::<i32, u8>::new(vec![], vec![]).is_err());
        assert!(RangeMap::new(vec![1, 2], vec![1u8]).is_err());
        assert!(RangeMap::new(vec![2, 1], vec![1u8, 2]).is_err());
        assert!(RangeMap::new(vec![1, 1], vec![1u8, 2]).is_err());
    }
}
