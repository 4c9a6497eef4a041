//! 匯率快取
//!
//! 引擎本身不抓取匯率；呼叫端取得匯率後注入此快取，並自行決定何時刷新。

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shutter_core::line::round_money;
use shutter_core::{Result, ShutterError};

/// 預設有效期（分鐘）
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// 匯率來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// 在有效期內
    Fresh,
    /// 已過期，沿用最後已知匯率
    LastKnown,
}

/// 匯率查詢結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: Decimal,
    pub source: RateSource,
}

/// 匯率快取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRateCache {
    /// 貨幣對，例如 "EUR/TRY"
    pub pair: String,

    pub rate: Decimal,

    pub fetched_at: DateTime<Utc>,

    pub ttl: Duration,
}

impl ExchangeRateCache {
    /// 創建匯率快取（匯率必須為正）
    pub fn new(pair: impl Into<String>, rate: Decimal, fetched_at: DateTime<Utc>) -> Result<Self> {
        let pair = pair.into();
        Self::check_rate(&pair, rate)?;
        Ok(Self {
            pair,
            rate,
            fetched_at,
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        })
    }

    /// 設置有效期
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn check_rate(pair: &str, rate: Decimal) -> Result<()> {
        if rate <= Decimal::ZERO {
            return Err(ShutterError::CalculationError(format!("{pair} 匯率必須為正: {rate}")));
        }
        Ok(())
    }

    /// 快取年齡
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// 是否仍在有效期內
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now) < self.ttl
    }

    /// 以新匯率刷新，回傳新的快取
    pub fn refreshed(&self, rate: Decimal, now: DateTime<Utc>) -> Result<Self> {
        Self::check_rate(&self.pair, rate)?;
        Ok(Self {
            pair: self.pair.clone(),
            rate,
            fetched_at: now,
            ttl: self.ttl,
        })
    }

    /// 查詢匯率；過期時仍回傳最後已知值並標記來源
    pub fn quote(&self, now: DateTime<Utc>) -> RateQuote {
        let source = if self.is_fresh(now) {
            RateSource::Fresh
        } else {
            RateSource::LastKnown
        };
        RateQuote {
            rate: self.rate,
            source,
        }
    }

    /// 換算金額（四捨五入到小數兩位）
    ///
    /// 快取過期時回傳 [`ShutterError::StaleExchangeRate`]。
    pub fn convert(&self, amount: Decimal, now: DateTime<Utc>) -> Result<Decimal> {
        if !self.is_fresh(now) {
            return Err(ShutterError::StaleExchangeRate(format!(
                "{} 匯率已過期 {} 分鐘",
                self.pair,
                (self.age(now) - self.ttl).num_minutes()
            )));
        }
        Ok(round_money(amount * self.rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn cache() -> ExchangeRateCache {
        ExchangeRateCache::new("EUR/TRY", Decimal::new(4887, 2), t0()).unwrap()
    }

    #[test]
    fn test_fresh_conversion() {
        let now = t0() + Duration::minutes(30);
        assert!(cache().is_fresh(now));
        // 100.50 × 48.87 = 4911.435 → 4911.44
        assert_eq!(cache().convert(Decimal::new(10050, 2), now).unwrap(), Decimal::new(491144, 2));
    }

    #[test]
    fn test_stale_rate_is_rejected() {
        let now = t0() + Duration::minutes(90);
        let err = cache().convert(Decimal::ONE, now).unwrap_err();
        assert!(matches!(err, ShutterError::StaleExchangeRate(_)));

        let quote = cache().quote(now);
        assert_eq!(quote.source, RateSource::LastKnown);
        assert_eq!(quote.rate, Decimal::new(4887, 2));
    }

    #[test]
    fn test_refresh_resets_age() {
        let now = t0() + Duration::hours(2);
        let refreshed = cache().refreshed(Decimal::new(4910, 2), now).unwrap();
        assert!(refreshed.is_fresh(now));
        assert_eq!(refreshed.quote(now).source, RateSource::Fresh);
        assert_eq!(refreshed.ttl, Duration::minutes(DEFAULT_TTL_MINUTES));
    }

    #[test]
    fn test_rate_must_be_positive() {
        assert!(ExchangeRateCache::new("EUR/TRY", Decimal::ZERO, t0()).is_err());
        assert!(cache().refreshed(Decimal::new(-1, 0), t0()).is_err());
    }

    #[test]
    fn test_custom_ttl() {
        let short = cache().with_ttl(Duration::minutes(5));
        assert!(!short.is_fresh(t0() + Duration::minutes(5)));
        assert!(short.is_fresh(t0() + Duration::minutes(4)));
    }
}
