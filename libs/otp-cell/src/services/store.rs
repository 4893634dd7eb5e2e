use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::models::{OtpError, VerifiedOtp};

type HmacSha256 = Hmac<Sha256>;

struct OtpRecord {
    digest: Vec<u8>,
    issued_at: DateTime<Utc>,
    customer_id: Option<String>,
}

/// Pending OTPs keyed by phone number.
///
/// Codes are held as keyed HMAC-SHA256 digests of their text, never in the
/// clear. All reads that can remove a record take the write lock, so a verify
/// is atomic with respect to other verifies and sends for the same phone.
pub struct OtpStore {
    ttl_millis: i64,
    mac: HmacSha256,
    records: RwLock<HashMap<String, OtpRecord>>,
}

impl OtpStore {
    pub fn new(ttl: Duration, secret: &[u8]) -> Result<Self, OtpError> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| OtpError::Digest("Failed to create HMAC".to_string()))?;

        Ok(Self {
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            mac,
            records: RwLock::new(HashMap::new()),
        })
    }

    /// Uses `OTP_HASH_SECRET` when configured, otherwise a random per-process key.
    pub fn from_config(config: &AppConfig) -> Result<Self, OtpError> {
        let ttl = Duration::from_secs(config.otp_ttl_secs);

        match &config.otp_hash_secret {
            Some(secret) => Self::new(ttl, secret.as_bytes()),
            None => {
                let key: [u8; 32] = rand::thread_rng().gen();
                Self::new(ttl, &key)
            }
        }
    }

    fn digest(&self, code: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(code.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn matches(&self, code: &str, digest: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(code.as_bytes());
        mac.verify_slice(digest).is_ok()
    }

    fn is_expired(&self, record: &OtpRecord, now: DateTime<Utc>) -> bool {
        (now - record.issued_at).num_milliseconds() > self.ttl_millis
    }

    pub async fn issue(&self, phone: &str, code: &str, customer_id: Option<String>) {
        self.issue_at(phone, code, customer_id, Utc::now()).await
    }

    /// Records a freshly sent code, replacing any pending one for `phone`.
    pub async fn issue_at(
        &self,
        phone: &str,
        code: &str,
        customer_id: Option<String>,
        now: DateTime<Utc>,
    ) {
        let record = OtpRecord {
            digest: self.digest(code),
            issued_at: now,
            customer_id,
        };

        let replaced = self.records.write().await.insert(phone.to_string(), record);
        if replaced.is_some() {
            debug!("Replaced pending OTP for {}", phone);
        }
        info!("OTP issued for {}", phone);
    }

    pub async fn verify(&self, phone: &str, submitted: &str) -> Result<VerifiedOtp, OtpError> {
        self.verify_at(phone, submitted, Utc::now()).await
    }

    pub async fn verify_at(
        &self,
        phone: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedOtp, OtpError> {
        let mut records = self.records.write().await;

        let record = records.get(phone).ok_or(OtpError::NotFound)?;

        if self.is_expired(record, now) {
            records.remove(phone);
            warn!("OTP for {} expired before verification", phone);
            return Err(OtpError::Expired);
        }

        if !self.matches(submitted, &record.digest) {
            warn!("Incorrect OTP submitted for {}", phone);
            return Err(OtpError::Mismatch);
        }

        let customer_id = records
            .remove(phone)
            .and_then(|r| r.customer_id)
            .unwrap_or_else(|| synthesize_customer_id(now));

        info!("OTP verified for {}", phone);
        Ok(VerifiedOtp {
            customer_id,
            verified_at: now,
        })
    }

    /// Drops every expired record; returns how many were removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !self.is_expired(record, now));

        let purged = before - records.len();
        if purged > 0 {
            debug!("Purged {} expired OTP records", purged);
        }
        purged
    }

    pub async fn contains(&self, phone: &str) -> bool {
        self.records.read().await.contains_key(phone)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// `CUST_<unix millis>_<9 random lowercase alphanumerics>`
pub fn synthesize_customer_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();

    format!("CUST_{}_{}", now.timestamp_millis(), suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration as ChronoDuration;

    const PHONE: &str = "0812345678";

    fn store() -> OtpStore {
        OtpStore::new(Duration::from_secs(300), b"unit-test-secret").unwrap()
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[tokio::test]
    async fn verify_without_send_is_not_found() {
        let store = store();
        assert_eq!(store.verify_at(PHONE, "1234", t0()).await, Err(OtpError::NotFound));
    }

    #[tokio::test]
    async fn correct_code_succeeds_once() {
        let store = store();
        store.issue_at(PHONE, "1234", Some("C-77".into()), t0()).await;

        let verified = store
            .verify_at(PHONE, "1234", t0() + ChronoDuration::seconds(10))
            .await
            .unwrap();

        assert_eq!(verified.customer_id, "C-77");
        assert_eq!(verified.verified_at, t0() + ChronoDuration::seconds(10));
        assert!(!store.contains(PHONE).await);
        assert_eq!(
            store.verify_at(PHONE, "1234", t0() + ChronoDuration::seconds(11)).await,
            Err(OtpError::NotFound)
        );
    }

    #[tokio::test]
    async fn mismatch_keeps_record_for_retry() {
        let store = store();
        store.issue_at(PHONE, "1234", None, t0()).await;

        assert_eq!(
            store.verify_at(PHONE, "0000", t0() + ChronoDuration::seconds(5)).await,
            Err(OtpError::Mismatch)
        );
        assert!(store.contains(PHONE).await);

        assert!(store
            .verify_at(PHONE, "1234", t0() + ChronoDuration::seconds(6))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn comparison_is_textual() {
        let store = store();
        store.issue_at(PHONE, "007", None, t0()).await;

        assert_eq!(store.verify_at(PHONE, "7", t0()).await, Err(OtpError::Mismatch));
        assert!(store.verify_at(PHONE, "007", t0()).await.is_ok());
    }

    #[tokio::test]
    async fn expired_code_is_removed_even_if_correct() {
        let store = store();
        store.issue_at(PHONE, "1234", None, t0()).await;

        assert_eq!(
            store.verify_at(PHONE, "1234", t0() + ChronoDuration::seconds(301)).await,
            Err(OtpError::Expired)
        );
        assert!(!store.contains(PHONE).await);
    }

    #[tokio::test]
    async fn expiry_boundary_is_exclusive() {
        let store = store();
        store.issue_at(PHONE, "1234", None, t0()).await;

        assert!(store
            .verify_at(PHONE, "1234", t0() + ChronoDuration::milliseconds(300_000))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn second_send_replaces_first() {
        let store = store();
        store.issue_at(PHONE, "1111", Some("first".into()), t0()).await;
        store
            .issue_at(PHONE, "2222", Some("second".into()), t0() + ChronoDuration::seconds(1))
            .await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.verify_at(PHONE, "1111", t0()).await, Err(OtpError::Mismatch));

        let verified = store.verify_at(PHONE, "2222", t0()).await.unwrap();
        assert_eq!(verified.customer_id, "second");
    }

    #[tokio::test]
    async fn missing_customer_id_is_synthesized() {
        let store = store();
        store.issue_at(PHONE, "1234", None, t0()).await;

        let verified = store.verify_at(PHONE, "1234", t0()).await.unwrap();
        let prefix = format!("CUST_{}_", t0().timestamp_millis());

        assert!(verified.customer_id.starts_with(&prefix));
        let suffix = &verified.customer_id[prefix.len()..];
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn purge_removes_only_expired_records() {
        let store = store();
        store.issue_at("0800000001", "1", None, t0()).await;
        store.issue_at("0800000002", "2", None, t0() + ChronoDuration::seconds(200)).await;

        let purged = store.purge_expired(t0() + ChronoDuration::seconds(301)).await;

        assert_eq!(purged, 1);
        assert!(!store.contains("0800000001").await);
        assert!(store.contains("0800000002").await);
    }

    #[tokio::test]
    async fn stores_with_different_secrets_do_not_share_digests() {
        let a = store();
        let b = OtpStore::new(Duration::from_secs(300), b"other").unwrap();

        assert_ne!(a.digest("1234"), b.digest("1234"));
        assert_matches!(a.digest("1234").len(), 32);
    }
}
