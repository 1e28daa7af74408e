//! REST data API client
//!
//! Speaks the managed store's PostgREST-style HTTP interface: filters are
//! query parameters (`id=eq.<value>`), inserts return the created row via
//! `Prefer: return=representation`, updates are PATCHes against a filter.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::instrument;

use super::{
    AttendanceRecordRow, NewReceipt, ReceiptRow, ReceiptStatusUpdate, ReceiptStore,
    ReceiptTemplateRow, StoreError, StoreResult,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Columns pulled for a receipt-ready attendance record, including the
/// joined student and activity names.
const RECORD_SELECT: &str = "id,student_id,class_id,event_id,status,verification_method,\
check_in_time,check_out_time,notes,student_name,badge_number,activity_name,subject_name";

/// REST implementation of [`ReceiptStore`]
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    client: reqwest::Client,
}

impl RestStore {
    /// Create a client for a data API base URL and key
    pub fn new(base_url: impl Into<String>, api_key: &str) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        if !api_key.is_empty() {
            let value = HeaderValue::from_str(api_key)
                .map_err(|e| StoreError::Decode(format!("API key not header-safe: {}", e)))?;
            headers.insert("apikey", value);
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    async fn check(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Upstream {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetch at most one row from a filtered query
    async fn fetch_one<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> StoreResult<Option<T>> {
        let response = self
            .client
            .get(self.url(table))
            .query(query)
            .query(&[("limit", "1")])
            .send()
            .await?;

        let rows: Vec<T> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl ReceiptStore for RestStore {
    #[instrument(skip(self))]
    async fn get_attendance_record(&self, id: &str) -> StoreResult<Option<AttendanceRecordRow>> {
        self.fetch_one(
            "attendance_records_view",
            &[
                ("id", &format!("eq.{}", id)),
                ("select", RECORD_SELECT),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_template(&self, id: &str) -> StoreResult<Option<ReceiptTemplateRow>> {
        self.fetch_one("receipt_templates", &[("id", &format!("eq.{}", id))])
            .await
    }

    #[instrument(skip(self))]
    async fn get_default_template(&self) -> StoreResult<Option<ReceiptTemplateRow>> {
        self.fetch_one(
            "receipt_templates",
            &[("type", "eq.attendance"), ("is_default", "eq.true")],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_receipt(&self, id: &str) -> StoreResult<Option<ReceiptRow>> {
        self.fetch_one("attendance_receipts", &[("id", &format!("eq.{}", id))])
            .await
    }

    #[instrument(skip(self, receipt), fields(attendance_record_id = %receipt.attendance_record_id))]
    async fn insert_receipt(&self, receipt: &NewReceipt) -> StoreResult<ReceiptRow> {
        let response = self
            .client
            .post(self.url("attendance_receipts"))
            .header("Prefer", "return=representation")
            .json(receipt)
            .send()
            .await?;

        let mut rows: Vec<ReceiptRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        rows.pop().ok_or_else(|| {
            StoreError::Decode("insert returned no representation".to_string())
        })
    }

    #[instrument(skip(self, update), fields(receipt_id = %id, status = %update.status))]
    async fn update_receipt_status(
        &self,
        id: &str,
        update: &ReceiptStatusUpdate,
    ) -> StoreResult<()> {
        let response = self
            .client
            .patch(self.url("attendance_receipts"))
            .query(&[("id", format!("eq.{}", id))])
            .json(update)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let store = RestStore::new("http://localhost:54321/rest/v1/", "key").unwrap();
        assert_eq!(store.url("receipt_templates"), "http://localhost:54321/rest/v1/receipt_templates");
    }

    #[test]
    fn test_new_receipt_serialization_skips_absent_ids() {
        let receipt = NewReceipt {
            attendance_record_id: "ar-1".into(),
            student_id: "st-1".into(),
            class_id: None,
            event_id: Some("ev-1".into()),
            receipt_data: serde_json::json!({"title": "x"}),
            template_id: None,
            print_method: "thermal".into(),
            status: "generated".into(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("class_id").is_none());
        assert_eq!(json["event_id"], "ev-1");
    }
}
