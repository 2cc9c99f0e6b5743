//! Field validators for provider, model and inference settings.
//!
//! Every validator is pure: it takes the candidate value plus a
//! human-readable label and returns `Err(message)` describing the first
//! rule the value breaks.

use thiserror::Error;

use crate::config::{InferenceBaseConfig, ModelConfig, ProviderConfig};

pub const MAX_PROVIDER_NAME_LEN: usize = 100;
pub const MAX_ENDPOINT_LEN: usize = 255;
pub const MAX_MODEL_NAME_LEN: usize = 200;
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);
pub const TIMEOUT_RANGE: (u32, u32) = (1, 600);
pub const RETRIES_RANGE: (u32, u32) = (0, 10);

/// Outcome of a single-field check.
pub type Verdict = Result<(), String>;

/// A rule broken by one field of a composite value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

/// Shape requirements for endpoint paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointRules {
    pub allow_empty: bool,
    pub require_leading_slash: bool,
    pub forbid_trailing_slash: bool,
}

impl Default for EndpointRules {
    fn default() -> Self {
        Self {
            allow_empty: false,
            require_leading_slash: true,
            forbid_trailing_slash: false,
        }
    }
}

pub fn validate_provider_name(value: &str, label: &str) -> Verdict {
    if value.is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.chars().count() > MAX_PROVIDER_NAME_LEN {
        return Err(format!(
            "{} must be at most {} characters",
            label, MAX_PROVIDER_NAME_LEN
        ));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '<' | '>'))
    {
        return Err(format!(
            "{} must not contain whitespace, quotes or angle brackets",
            label
        ));
    }
    Ok(())
}

pub fn validate_base_url(value: &str, label: &str) -> Verdict {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    url::Url::parse(trimmed)
        .map(|_| ())
        .map_err(|e| format!("{} is not a valid URL: {}", label, e))
}

pub fn validate_endpoint(value: &str, label: &str, rules: EndpointRules) -> Verdict {
    if value.is_empty() {
        return if rules.allow_empty {
            Ok(())
        } else {
            Err(format!("{} is required", label))
        };
    }
    if value.chars().count() > MAX_ENDPOINT_LEN {
        return Err(format!(
            "{} must be at most {} characters",
            label, MAX_ENDPOINT_LEN
        ));
    }
    if value
        .chars()
        .any(|c| c.is_control() || matches!(c, '"' | '\'' | '`'))
    {
        return Err(format!(
            "{} must not contain control characters or quotes",
            label
        ));
    }
    if rules.require_leading_slash && !value.starts_with('/') {
        return Err(format!("{} must start with '/'", label));
    }
    if rules.forbid_trailing_slash && value.len() > 1 && value.ends_with('/') {
        return Err(format!("{} must not end with '/'", label));
    }
    Ok(())
}

pub fn validate_model_name(value: &str, label: &str) -> Verdict {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.chars().count() > MAX_MODEL_NAME_LEN {
        return Err(format!(
            "{} must be at most {} characters",
            label, MAX_MODEL_NAME_LEN
        ));
    }
    Ok(())
}

pub fn validate_temperature(value: f64, label: &str) -> Verdict {
    let (min, max) = TEMPERATURE_RANGE;
    if !value.is_finite() || value < min || value > max {
        return Err(format!("{} must be between {} and {}", label, min, max));
    }
    Ok(())
}

pub fn validate_in_range(value: u32, (min, max): (u32, u32), label: &str) -> Verdict {
    if value < min || value > max {
        return Err(format!("{} must be between {} and {}", label, min, max));
    }
    Ok(())
}

fn field(field: &'static str, verdict: Verdict) -> Result<(), Violation> {
    verdict.map_err(|message| Violation { field, message })
}

/// Checks every user-editable field of a provider profile.
pub fn validate_provider_config(
    provider: &ProviderConfig,
    rules: EndpointRules,
) -> Result<(), Violation> {
    field("name", validate_provider_name(&provider.name, "Provider name"))?;
    field("baseUrl", validate_base_url(&provider.base_url, "Base URL"))?;
    field(
        "modelsEndpoint",
        validate_endpoint(&provider.models_endpoint, "Models endpoint", rules),
    )?;
    field(
        "completionEndpoint",
        validate_endpoint(&provider.completion_endpoint, "Completion endpoint", rules),
    )?;
    if provider.use_custom_models {
        for model in &provider.custom_models {
            field("customModels", validate_model_name(model, "Custom model"))?;
        }
    }
    Ok(())
}

pub fn validate_model_config(model: &ModelConfig) -> Result<(), Violation> {
    field("name", validate_model_name(&model.name, "Model name"))?;
    field(
        "temperature",
        validate_temperature(model.temperature, "Temperature"),
    )
}

pub fn validate_inference_config(inference: &InferenceBaseConfig) -> Result<(), Violation> {
    field(
        "timeoutSeconds",
        validate_in_range(inference.timeout_seconds, TIMEOUT_RANGE, "Timeout"),
    )?;
    field(
        "maxRetries",
        validate_in_range(inference.max_retries, RETRIES_RANGE, "Max retries"),
    )
}
