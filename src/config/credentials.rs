//! Credential resolution for provider profiles.
//!
//! Tokens come either from the profile itself or from an environment
//! variable named by the profile, resolved on demand.

use super::types::ProviderConfig;

/// Authentication type for provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// `x-api-key` style header.
    ApiKey,
    /// Standard `Authorization: Bearer` header.
    Bearer,
    /// No authentication required.
    None,
}

impl AuthType {
    /// Parse auth type from string.
    /// Defaults to `ApiKey` for unknown values.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bearer" => AuthType::Bearer,
            "none" => AuthType::None,
            _ => AuthType::ApiKey,
        }
    }
}

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Status of credential resolution for a provider.
#[derive(Debug, Clone)]
pub enum CredentialStatus {
    Configured(SecureString),
    Unconfigured { reason: String },
    NoAuth,
}

impl ProviderConfig {
    pub fn auth_type(&self) -> AuthType {
        AuthType::parse(&self.auth_type_str)
    }

    /// Resolve the token for this provider.
    ///
    /// Not cached: environment changes are picked up on the next call.
    pub fn resolve_credential(&self) -> CredentialStatus {
        if self.auth_type() == AuthType::None {
            return CredentialStatus::NoAuth;
        }

        if self.use_auth_token_from_env {
            let var = self.env_var_token_name.trim();
            if var.is_empty() {
                return CredentialStatus::Unconfigured {
                    reason: "env_var_token_name is not set".to_string(),
                };
            }
            return match std::env::var(var) {
                Ok(token) if !token.is_empty() => {
                    CredentialStatus::Configured(SecureString::new(token))
                }
                _ => CredentialStatus::Unconfigured {
                    reason: format!("environment variable {} is not set", var),
                },
            };
        }

        if self.auth_token.is_empty() {
            CredentialStatus::Unconfigured {
                reason: "auth_token is not set".to_string(),
            }
        } else {
            CredentialStatus::Configured(SecureString::new(self.auth_token.clone()))
        }
    }

    /// True when the provider has usable credentials or needs none.
    pub fn is_configured(&self) -> bool {
        matches!(
            self.resolve_credential(),
            CredentialStatus::Configured(_) | CredentialStatus::NoAuth
        )
    }
}
