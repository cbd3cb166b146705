//! Authentication Module
//!
//! Every `/api/v1` route requires one of:
//! 1. API Key authentication (via X-API-Key header)
//! 2. JWT token authentication (via Authorization: Bearer header)

use crate::error::{ApiError, ApiResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

const INSECURE_DEFAULT_SECRET: &str = "INSECURE_DEFAULT_SECRET_CHANGE_IN_PRODUCTION";

/// Shortest JWT secret accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

// ============================================================================
// CLOCK ABSTRACTION
// ============================================================================

/// Clock used for JWT time validation.
///
/// `jsonwebtoken`'s own exp/nbf checks read the system clock; owning the
/// check lets tests inject time.
pub trait JwtClock: Send + Sync {
    /// Current time as Unix epoch seconds. Negative for pre-1970 clocks.
    fn now_epoch_secs(&self) -> i64;
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl JwtClock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl JwtClock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

// ============================================================================
// JWT SECRET (TYPE-SAFE)
// ============================================================================

/// JWT signing secret that never appears in logs or `Debug` output.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    /// Blank input falls back to the insecure development default, which
    /// [`AuthConfig::validate_for_production`] refuses.
    pub fn new(secret: String) -> Self {
        if secret.trim().is_empty() {
            Self(SecretString::new(INSECURE_DEFAULT_SECRET.into()))
        } else {
            Self(SecretString::new(secret.into()))
        }
    }

    /// Expose the secret value (only for cryptographic operations).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub fn is_insecure_default(&self) -> bool {
        self.0.expose_secret() == INSECURE_DEFAULT_SECRET
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtSecret([REDACTED, {} chars])", self.len())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// Accepted API keys
    pub api_keys: HashSet<String>,

    /// JWT secret key for signing and verification
    pub jwt_secret: JwtSecret,

    /// JWT algorithm (default: HS256)
    pub jwt_algorithm: Algorithm,

    /// Required `iss` claim, when set
    pub jwt_issuer: Option<String>,

    /// Required `aud` claim, when set
    pub jwt_audience: Option<String>,

    /// Lifetime of issued tokens in seconds (default: 1 hour)
    pub jwt_expiration_secs: i64,

    /// Clock skew tolerance in seconds (default: 60)
    pub jwt_clock_skew_secs: i64,

    /// Clock for JWT time validation (injected for testing)
    pub clock: Arc<dyn JwtClock>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_keys", &format!("[{} keys]", self.api_keys.len()))
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("jwt_clock_skew_secs", &self.jwt_clock_skew_secs)
            .field("clock", &"<JwtClock>")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_keys: HashSet::new(),
            jwt_secret: JwtSecret::new(String::new()),
            jwt_algorithm: Algorithm::HS256,
            jwt_issuer: None,
            jwt_audience: None,
            jwt_expiration_secs: 3600,
            jwt_clock_skew_secs: 60,
            clock: Arc::new(SystemClock),
        }
    }
}

impl AuthConfig {
    /// Create authentication configuration from environment variables.
    ///
    /// - `HRM_API_KEYS`: Comma-separated list of valid API keys
    /// - `HRM_JWT_SECRET`: JWT signing secret
    /// - `HRM_JWT_ISSUER` / `HRM_JWT_AUDIENCE`: required claims (optional)
    /// - `HRM_JWT_EXPIRATION_SECS`: JWT token expiration (default: 3600)
    /// - `HRM_JWT_CLOCK_SKEW_SECS`: JWT clock skew tolerance (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_keys = std::env::var("HRM_API_KEYS")
            .map(|keys| parse_api_keys(&keys))
            .unwrap_or_default();

        Self {
            api_keys,
            jwt_secret: JwtSecret::new(std::env::var("HRM_JWT_SECRET").unwrap_or_default()),
            jwt_issuer: std::env::var("HRM_JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            jwt_audience: std::env::var("HRM_JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
            jwt_expiration_secs: std::env::var("HRM_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jwt_expiration_secs),
            jwt_clock_skew_secs: std::env::var("HRM_JWT_CLOCK_SKEW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jwt_clock_skew_secs),
            ..defaults
        }
    }

    /// Refuse insecure secrets in production; warn about them elsewhere.
    pub fn validate_for_production(&self, environment: &str) -> ApiResult<()> {
        let environment = environment.to_lowercase();
        let is_production = environment == "production" || environment == "prod";

        if self.jwt_secret.is_insecure_default() {
            if is_production {
                return Err(ApiError::invalid_input(format!(
                    "Cannot start server in production with insecure JWT secret. \
                     Set HRM_JWT_SECRET to a secure value. HRM_ENVIRONMENT={}",
                    environment
                )));
            }
            tracing::warn!(
                "Using the insecure default JWT secret. Set HRM_JWT_SECRET before deploying."
            );
        } else if self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            if is_production {
                return Err(ApiError::invalid_input(format!(
                    "JWT secret is too short for production use ({} chars). \
                     It must be at least {} characters long.",
                    self.jwt_secret.len(),
                    MIN_PRODUCTION_SECRET_LEN
                )));
            }
            tracing::warn!(
                length = self.jwt_secret.len(),
                "JWT secret is shorter than {} characters",
                MIN_PRODUCTION_SECRET_LEN
            );
        }

        if self.api_keys.is_empty() {
            tracing::warn!("HRM_API_KEYS is empty; only JWT bearer tokens will be accepted");
        }

        Ok(())
    }

    /// Add an API key to the valid set.
    pub fn add_api_key(&mut self, key: String) {
        self.api_keys.insert(key);
    }

    /// Check if an API key is valid.
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.api_keys.contains(key)
    }
}

fn parse_api_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// JWT CLAIMS
// ============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// User roles/permissions
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Create new claims for a user using a clock.
    pub fn new(user_id: String, expiration_secs: i64, clock: &dyn JwtClock) -> Self {
        let now = clock.now_epoch_secs();
        Self {
            sub: user_id,
            iat: now,
            exp: now + expiration_secs,
            nbf: None,
            iss: None,
            aud: None,
            roles: Vec::new(),
        }
    }

    /// Add multiple roles to the claims.
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Check if the token has expired according to a clock.
    pub fn is_expired(&self, clock: &dyn JwtClock) -> bool {
        self.exp < clock.now_epoch_secs()
    }
}

// ============================================================================
// AUTHENTICATION CONTEXT
// ============================================================================

/// Authentication context inserted into request extensions after
/// successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// User ID (from JWT sub claim or API key identifier)
    pub user_id: String,

    /// User roles/permissions
    pub roles: Vec<String>,

    /// Authentication method used
    pub auth_method: AuthMethod,
}

impl AuthContext {
    pub fn new(user_id: String, roles: Vec<String>, auth_method: AuthMethod) -> Self {
        Self {
            user_id,
            roles,
            auth_method,
        }
    }

    /// Check if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if the user has any of the specified roles.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

/// Authentication method used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ApiKey,
    Jwt,
}

// ============================================================================
// AUTHENTICATION FUNCTIONS
// ============================================================================

/// Validate an API key.
pub fn validate_api_key(config: &AuthConfig, api_key: &str) -> ApiResult<()> {
    if config.is_valid_api_key(api_key) {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Invalid API key"))
    }
}

/// Check exp/nbf against `now` with `leeway_secs` of tolerance either way.
fn validate_claim_times(now: i64, exp: i64, nbf: Option<i64>, leeway_secs: i64) -> ApiResult<()> {
    if let Some(nbf) = nbf {
        if now + leeway_secs < nbf {
            return Err(ApiError::invalid_token("Token not yet valid (nbf)"));
        }
    }

    if exp < now - leeway_secs {
        return Err(ApiError::token_expired());
    }

    Ok(())
}

/// Validate a JWT token and extract claims.
///
/// `jsonwebtoken` checks the signature, issuer and audience; expiry and
/// not-before are checked here against the configured clock.
pub fn validate_jwt_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.expose().as_bytes());

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string()]);
    match &config.jwt_issuer {
        Some(issuer) => validation.set_issuer(&[issuer]),
        None => validation.iss = None,
    }
    match &config.jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::invalid_token("Token signature is invalid")
            }
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                ApiError::invalid_token("Token issuer is not accepted")
            }
            jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                ApiError::invalid_token("Token audience is not accepted")
            }
            _ => ApiError::invalid_token(format!("Token validation failed: {}", e)),
        })?;

    let claims = token_data.claims;
    let now = config.clock.now_epoch_secs();
    if now < 0 {
        tracing::error!(timestamp = now, "System clock returned pre-epoch time");
        return Err(ApiError::internal_error("Server time configuration error"));
    }

    validate_claim_times(now, claims.exp, claims.nbf, config.jwt_clock_skew_secs)?;

    Ok(claims)
}

/// Generate a signed JWT for a user.
pub fn generate_jwt_token(
    config: &AuthConfig,
    user_id: String,
    roles: Vec<String>,
) -> ApiResult<String> {
    let mut claims = Claims::new(user_id, config.jwt_expiration_secs, &*config.clock).with_roles(roles);
    claims.iss = config.jwt_issuer.clone();
    claims.aud = config.jwt_audience.clone();

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.expose().as_bytes());
    let header = Header::new(config.jwt_algorithm);

    encode(&header, &claims, &encoding_key)
        .map_err(|e| ApiError::internal_error(format!("Failed to generate token: {}", e)))
}

/// Authenticate a request using an API key.
pub fn authenticate_api_key(config: &AuthConfig, api_key: &str) -> ApiResult<AuthContext> {
    validate_api_key(config, api_key)?;

    // Identify the caller by a short key prefix, never the whole key.
    let prefix: String = api_key.chars().take(8).collect();
    Ok(AuthContext::new(
        format!("api_key_{}", prefix),
        vec!["api_user".to_string()],
        AuthMethod::ApiKey,
    ))
}

/// Authenticate a request using a JWT bearer token.
pub fn authenticate_jwt(config: &AuthConfig, token: &str) -> ApiResult<AuthContext> {
    let claims = validate_jwt_token(config, token)?;
    Ok(AuthContext::new(claims.sub, claims.roles, AuthMethod::Jwt))
}

/// Authenticate a request using either API key or JWT token.
///
/// `X-API-Key` wins when both are present.
pub fn authenticate(
    config: &AuthConfig,
    api_key_header: Option<&str>,
    auth_header: Option<&str>,
) -> ApiResult<AuthContext> {
    if let Some(api_key) = api_key_header {
        return authenticate_api_key(config, api_key);
    }

    if let Some(auth_value) = auth_header {
        return match auth_value.strip_prefix("Bearer ") {
            Some(token) => authenticate_jwt(config, token.trim()),
            None => Err(ApiError::invalid_token(
                "Authorization header must use Bearer scheme",
            )),
        };
    }

    Err(ApiError::unauthorized(
        "Authentication required: provide X-API-Key or Authorization header",
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    /// 2024-01-01 00:00:00 UTC
    const NOW: i64 = 1_704_067_200;

    fn test_config() -> AuthConfig {
        let mut config = AuthConfig {
            jwt_secret: JwtSecret::new("test-secret-that-is-long-enough-for-hs256".to_string()),
            clock: Arc::new(FixedClock(NOW)),
            ..Default::default()
        };
        config.add_api_key("test_key_123".to_string());
        config
    }

    fn code<T: std::fmt::Debug>(result: ApiResult<T>) -> Option<ErrorCode> {
        result.err().map(|e| e.code)
    }

    #[test]
    fn test_api_key_validation() {
        let config = test_config();
        assert!(validate_api_key(&config, "test_key_123").is_ok());
        assert_eq!(code(validate_api_key(&config, "nope")), Some(ErrorCode::Unauthorized));
    }

    #[test]
    fn test_jwt_round_trip() -> ApiResult<()> {
        let config = test_config();
        let token = generate_jwt_token(&config, "hr-admin".to_string(), vec!["admin".to_string()])?;
        let ctx = authenticate(&config, None, Some(&format!("Bearer {}", token)))?;
        assert_eq!(ctx.user_id, "hr-admin");
        assert!(ctx.has_role("admin"));
        assert_eq!(ctx.auth_method, AuthMethod::Jwt);
        Ok(())
    }

    #[test]
    fn test_expired_token() -> ApiResult<()> {
        let issuing = AuthConfig {
            clock: Arc::new(FixedClock(NOW - 7200)),
            ..test_config()
        };
        let token = generate_jwt_token(&issuing, "u".to_string(), Vec::new())?;
        assert_eq!(
            code(validate_jwt_token(&test_config(), &token)),
            Some(ErrorCode::TokenExpired)
        );
        Ok(())
    }

    #[test]
    fn test_clock_skew_tolerance() -> ApiResult<()> {
        // expired 30s ago, inside the 60s leeway
        let issuing = AuthConfig {
            clock: Arc::new(FixedClock(NOW - 3630)),
            ..test_config()
        };
        let token = generate_jwt_token(&issuing, "u".to_string(), Vec::new())?;
        assert!(validate_jwt_token(&test_config(), &token).is_ok());
        Ok(())
    }

    #[test]
    fn test_wrong_secret_rejected() -> ApiResult<()> {
        let other = AuthConfig {
            jwt_secret: JwtSecret::new("another-secret-entirely-different-value".to_string()),
            ..test_config()
        };
        let token = generate_jwt_token(&other, "u".to_string(), Vec::new())?;
        assert_eq!(
            code(validate_jwt_token(&test_config(), &token)),
            Some(ErrorCode::InvalidToken)
        );
        Ok(())
    }

    #[test]
    fn test_audience_enforced() -> ApiResult<()> {
        let issuing = AuthConfig {
            jwt_audience: Some("payroll".to_string()),
            ..test_config()
        };
        let verifying = AuthConfig {
            jwt_audience: Some("hrm".to_string()),
            ..test_config()
        };
        let token = generate_jwt_token(&issuing, "u".to_string(), Vec::new())?;
        assert!(validate_jwt_token(&verifying, &token).is_err());
        assert!(validate_jwt_token(&issuing, &token).is_ok());
        Ok(())
    }

    #[test]
    fn test_authenticate_with_api_key() -> ApiResult<()> {
        let ctx = authenticate(&test_config(), Some("test_key_123"), None)?;
        assert_eq!(ctx.auth_method, AuthMethod::ApiKey);
        assert_eq!(ctx.user_id, "api_key_test_key");
        Ok(())
    }

    #[test]
    fn test_authenticate_no_credentials() {
        assert_eq!(code(authenticate(&test_config(), None, None)), Some(ErrorCode::Unauthorized));
        assert_eq!(
            code(authenticate(&test_config(), None, Some("Basic abc"))),
            Some(ErrorCode::InvalidToken)
        );
    }

    #[test]
    fn test_claim_times() {
        assert!(validate_claim_times(100, 200, None, 0).is_ok());
        assert!(validate_claim_times(100, 50, None, 60).is_ok());
        assert!(validate_claim_times(100, 30, None, 60).is_err());
        assert!(validate_claim_times(100, 200, Some(150), 60).is_ok());
        assert!(validate_claim_times(100, 200, Some(170), 60).is_err());
    }

    #[test]
    fn test_production_validation() {
        let insecure = AuthConfig::default();
        assert!(insecure.validate_for_production("production").is_err());
        assert!(insecure.validate_for_production("development").is_ok());

        let short = AuthConfig {
            jwt_secret: JwtSecret::new("short".to_string()),
            ..Default::default()
        };
        assert!(short.validate_for_production("prod").is_err());

        assert!(test_config().validate_for_production("production").is_ok());
    }

    #[test]
    fn test_parse_api_keys() {
        let keys = parse_api_keys(" a , ,b,");
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("a") && keys.contains("b"));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = JwtSecret::new("super-secret-value".to_string());
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("super-secret-value"));
    }
}
