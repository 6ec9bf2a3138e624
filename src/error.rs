use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures the page can run into outside of form validation. None of them
/// are fatal: the feature that hit one is skipped and the rest keep working.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    #[error("browser capability unavailable: {0}")]
    EnvironmentUnsupported(&'static str),
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("browser API error: {0}")]
    Js(String),
    #[error("submission failed: {0}")]
    Submission(String),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        AppError::Js(message)
    }
}

/// Runs one feature installer, logging and swallowing its error so a broken
/// feature never takes the others down with it.
pub fn isolate<T>(feature: &str, install: impl FnOnce() -> Result<T, AppError>) -> Option<T> {
    match install() {
        Ok(value) => {
            log::debug!("{} ready", feature);
            Some(value)
        }
        Err(AppError::EnvironmentUnsupported(capability)) => {
            log::warn!("Skipping {}: {} is not supported in this browser", feature, capability);
            None
        }
        Err(e) => {
            log::error!("Failed to set up {}: {}", feature, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolate_passes_successful_values_through() {
        assert_eq!(isolate("counter", || Ok::<_, AppError>(3)), Some(3));
    }

    #[test]
    fn isolate_swallows_failures() {
        let result: Option<()> = isolate("reveal", || {
            Err(AppError::EnvironmentUnsupported("IntersectionObserver"))
        });
        assert!(result.is_none());

        let result: Option<()> = isolate("menu", || Err(AppError::MissingElement(".header".into())));
        assert!(result.is_none());
    }

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            AppError::MissingElement("#demo-modal".into()).to_string(),
            "element not found: #demo-modal"
        );
        assert_eq!(
            AppError::Submission("timeout".into()).to_string(),
            "submission failed: timeout"
        );
    }
}
