/// Rate limiter against a monotonic millisecond clock: fires when at least `period_ms` passed
/// since it last fired. Starts as if it fired at time 0.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    last_ms: u64,
}

impl Interval {
    pub const fn new(period_ms: u64) -> Self {
        Interval { period_ms, last_ms: 0 }
    }

    pub fn set_period(&mut self, period_ms: u64) {
        self.period_ms = period_ms;
    }

    pub fn ready(&mut self, now_ms: u64) -> bool {
        if now_ms.wrapping_sub(self.last_ms) < self.period_ms {
            return false;
        }
        self.last_ms = now_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_period() {
        let mut interval = Interval::new(500);

        assert!(!interval.ready(0));
        assert!(!interval.ready(499));
        assert!(interval.ready(500));
        assert!(!interval.ready(999));
        assert!(interval.ready(1000));
    }

    #[test]
    fn test_period_counts_from_last_fire() {
        let mut interval = Interval::new(40);

        assert!(interval.ready(55));
        assert!(!interval.ready(94));
        assert!(interval.ready(95));
    }

    #[test]
    fn test_shorter_period_takes_effect() {
        let mut interval = Interval::new(1000);
        assert!(interval.ready(1000));

        interval.set_period(10);
        assert!(interval.ready(1010));
    }
}
