//! Trial sign-up payload and the stand-in for the backend that will one
//! day receive it.

use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};

use crate::config::{CHECKOUT_URL, SUBMISSION_DELAY_MS};
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl TrialRequest {
    /// Builds the payload from raw form values, trimming each and dropping
    /// an empty company.
    pub fn from_form(name: &str, email: &str, company: &str) -> Self {
        let company = company.trim();
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            company: (!company.is_empty()).then(|| company.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    fn accepted() -> Self {
        Self {
            success: true,
            message: "Trial started successfully!".to_string(),
            submitted_at: Utc::now(),
        }
    }
}

/// Waits out a fake network round trip, logs the payload and accepts it.
pub async fn submit_trial_request(request: TrialRequest) -> Result<SubmissionReceipt, AppError> {
    TimeoutFuture::new(SUBMISSION_DELAY_MS).await;

    let payload = serde_wasm_bindgen::to_value(&request)
        .map_err(|e| AppError::Submission(e.to_string()))?;
    gloo_console::log!("Form submitted:", payload);

    let receipt = SubmissionReceipt::accepted();
    log::info!(
        "Trial request accepted: {}",
        serde_json::to_string(&receipt).map_err(|e| AppError::Submission(e.to_string()))?
    );
    Ok(receipt)
}

/// Checkout link, prefilled with the visitor's email when we have one.
pub fn checkout_url(prefilled_email: Option<&str>) -> String {
    match prefilled_email.map(str::trim).filter(|email| !email.is_empty()) {
        Some(email) => format!(
            "{}?prefilled_email={}",
            CHECKOUT_URL,
            urlencoding::encode(email)
        ),
        None => CHECKOUT_URL.to_string(),
    }
}
