#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) {
        self.0 += 1;
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_starts_at_zero() {
        assert_eq!(Score::new().value(), 0);
    }

    #[test]
    fn test_increment_then_reset() {
        let mut score = Score::new();
        score.increment();
        score.increment();
        score.increment();
        assert_eq!(score.value(), 3);

        score.reset();
        assert_eq!(score.value(), 0);
    }
}
