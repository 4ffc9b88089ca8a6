//! Integer arithmetic examples.

/// `a + b` with host integer semantics.
pub fn add(a: i64, b: i64) -> i64 {
    a + b
}

/// `3 * value`, composed from [`add`].
pub fn triple(value: i64) -> i64 {
    add(value, value) + value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sums_its_inputs() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(add(-4, 4), 0);
    }

    #[test]
    fn triple_is_three_times_the_input() {
        assert_eq!(triple(0), 0);
        assert_eq!(triple(7), 21);
        assert_eq!(triple(-5), -15);
    }
}
