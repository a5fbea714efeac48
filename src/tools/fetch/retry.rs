use std::time::{Duration, SystemTime, UNIX_EPOCH};

const BACKOFF_FACTOR: f64 = 1.8;
const JITTER_SHARE: f64 = 0.15;

/// Random-ish jitter in milliseconds within [0, range).
pub(crate) fn jitter_ms(range: u64) -> u64 {
    if range == 0 {
        return 0;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_nanos(0));
    let nanos = now.subsec_nanos() as u64;
    let micros = (now.as_micros() & 0xFFFF) as u64;
    (nanos ^ (micros << 5)) % range
}

/// Backoff before retrying `attempt` (1-based): `base × 1.8^(attempt-1)`,
/// jittered downward by up to 15% so concurrent callers spread out while
/// growth stays monotonic across attempts.
pub(crate) fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    let nominal = base_ms as f64 * BACKOFF_FACTOR.powi(attempt.saturating_sub(1) as i32);
    let jitter = jitter_ms(1000) as f64 / 1000.0;
    (nominal * (1.0 - JITTER_SHARE * jitter)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_returns_within_range() {
        for _ in 0..100 {
            let result = jitter_ms(100);
            assert!(result < 100, "jitter_ms returned {}, expected < 100", result);
        }
    }

    #[test]
    fn jitter_zero_range_returns_zero() {
        assert_eq!(jitter_ms(0), 0);
    }

    #[test]
    fn second_wait_is_within_jitter_bounds() {
        for _ in 0..100 {
            let wait = backoff_ms(600, 2);
            assert!(
                (918..=1080).contains(&wait),
                "second wait {} outside [600×1.8×0.85, 600×1.8]",
                wait
            );
        }
    }

    #[test]
    fn growth_is_monotonic_across_attempts() {
        for _ in 0..100 {
            // Worst case for attempt n+1 (max jitter) still beats the best
            // case for attempt n (no jitter), since 1.8 × 0.85 > 1.
            assert!(backoff_ms(600, 2) > backoff_ms(600, 1));
            assert!(backoff_ms(600, 3) > backoff_ms(600, 2));
        }
    }
}
