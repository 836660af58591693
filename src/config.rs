use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::loan::LOAN_PERIOD_DAYS;

/// 会員1人あたりの最大貸出冊数
pub const MAX_ACTIVE_LOANS: usize = 3;

/// 貸出期間の上限（日数）
pub const MAX_LOAN_PERIOD_DAYS: i64 = 3650;

/// 延滞料金の日額（1.5）
pub const DAILY_LATE_FEE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// 貸出ポリシー
///
/// 貸出期間・貸出上限・延滞料金の日額をまとめたもの。
/// `Default`は図書館の標準ルール（14日、3冊、1日1.5）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanPolicy {
    pub loan_period_days: i64,
    pub max_active_loans: usize,
    pub daily_late_fee: Decimal,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: LOAN_PERIOD_DAYS,
            max_active_loans: MAX_ACTIVE_LOANS,
            daily_late_fee: DAILY_LATE_FEE,
        }
    }
}

impl LoanPolicy {
    /// 環境変数から読み込む
    ///
    /// - `LIBRARY_LOAN_PERIOD_DAYS`
    /// - `LIBRARY_MAX_ACTIVE_LOANS`
    /// - `LIBRARY_DAILY_LATE_FEE`
    ///
    /// 未設定の項目はデフォルト値を使う。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let loan_period_days = parse_var(&lookup, "LIBRARY_LOAN_PERIOD_DAYS")?
            .unwrap_or(defaults.loan_period_days);
        let max_active_loans = parse_var(&lookup, "LIBRARY_MAX_ACTIVE_LOANS")?
            .unwrap_or(defaults.max_active_loans);
        let daily_late_fee = parse_var(&lookup, "LIBRARY_DAILY_LATE_FEE")?
            .unwrap_or(defaults.daily_late_fee);

        if !(1..=MAX_LOAN_PERIOD_DAYS).contains(&loan_period_days) {
            return Err(invalid("LIBRARY_LOAN_PERIOD_DAYS", loan_period_days));
        }
        if max_active_loans == 0 {
            return Err(invalid("LIBRARY_MAX_ACTIVE_LOANS", max_active_loans));
        }
        if daily_late_fee.is_sign_negative() {
            return Err(invalid("LIBRARY_DAILY_LATE_FEE", daily_late_fee));
        }

        Ok(Self {
            loan_period_days,
            max_active_loans,
            daily_late_fee,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

fn invalid(name: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let policy = LoanPolicy::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(policy, LoanPolicy::default());
        assert_eq!(policy.loan_period_days, 14);
        assert_eq!(policy.max_active_loans, 3);
        assert_eq!(policy.daily_late_fee, dec!(1.5));
    }

    #[test]
    fn test_overrides_from_env() {
        let policy = LoanPolicy::from_lookup(lookup_from(&[
            ("LIBRARY_LOAN_PERIOD_DAYS", "21"),
            ("LIBRARY_MAX_ACTIVE_LOANS", "5"),
            ("LIBRARY_DAILY_LATE_FEE", "0.25"),
        ]))
        .unwrap();

        assert_eq!(policy.loan_period_days, 21);
        assert_eq!(policy.max_active_loans, 5);
        assert_eq!(policy.daily_late_fee, dec!(0.25));
    }

    #[test]
    fn test_rejects_unparsable_value() {
        let err = LoanPolicy::from_lookup(lookup_from(&[("LIBRARY_MAX_ACTIVE_LOANS", "three")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "LIBRARY_MAX_ACTIVE_LOANS",
                value: "three".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_non_positive_period() {
        let result = LoanPolicy::from_lookup(lookup_from(&[("LIBRARY_LOAN_PERIOD_DAYS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_period_beyond_limit() {
        let err = LoanPolicy::from_lookup(lookup_from(&[(
            "LIBRARY_LOAN_PERIOD_DAYS",
            "100000000",
        )]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "LIBRARY_LOAN_PERIOD_DAYS",
                value: "100000000".to_string(),
            }
        );

        let policy =
            LoanPolicy::from_lookup(lookup_from(&[("LIBRARY_LOAN_PERIOD_DAYS", "3650")])).unwrap();
        assert_eq!(policy.loan_period_days, MAX_LOAN_PERIOD_DAYS);
    }

    #[test]
    fn test_rejects_zero_loan_cap() {
        let err = LoanPolicy::from_lookup(lookup_from(&[("LIBRARY_MAX_ACTIVE_LOANS", "0")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "LIBRARY_MAX_ACTIVE_LOANS",
                value: "0".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_negative_fee() {
        let result = LoanPolicy::from_lookup(lookup_from(&[("LIBRARY_DAILY_LATE_FEE", "-1")]));
        assert!(result.is_err());
    }
}
