//! Dice rolls for the d6/d20/d100 commands.

use rand::Rng;

/// Roll an inclusive range. `None` when the bounds are inverted.
pub fn roll_range(start: i64, end: i64) -> Option<i64> {
    if start > end {
        return None;
    }
    Some(rand::rng().random_range(start..=end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_rolls_stay_in_range() {
        for _ in 0..200 {
            let v = roll_range(1, 6).unwrap();
            assert!((1..=6).contains(&v));
        }
    }

    #[test]
    fn range_rolls_are_inclusive() {
        for _ in 0..200 {
            let v = roll_range(-3, 3).unwrap();
            assert!((-3..=3).contains(&v));
        }
        assert_eq!(roll_range(5, 5), Some(5));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(roll_range(10, 1), None);
    }
}
