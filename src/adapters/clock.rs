use crate::ports::clock::Clock;
use chrono::{Duration, Local, NaiveDate};
use std::sync::Mutex;

/// システム時計（ローカルタイムゾーンの日付）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 固定時計
///
/// テストで日付を固定・前進させるために使用する。
/// `reset`で生成時の日付に戻る。
#[derive(Debug)]
pub struct FixedClock {
    initial: NaiveDate,
    current: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            initial: today,
            current: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.lock() = today;
    }

    pub fn advance_days(&self, days: i64) {
        let mut current = self.lock();
        *current += Duration::days(days);
    }

    pub fn reset(&self) {
        *self.lock() = self.initial;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDate> {
        // NaiveDateはCopyなので、poisonしても値は壊れていない
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn test_fixed_clock_advance_and_reset() {
        let clock = FixedClock::new(date(1));
        assert_eq!(clock.today(), date(1));

        clock.advance_days(5);
        assert_eq!(clock.today(), date(6));

        clock.set(date(20));
        assert_eq!(clock.today(), date(20));

        clock.reset();
        assert_eq!(clock.today(), date(1));
    }
}
