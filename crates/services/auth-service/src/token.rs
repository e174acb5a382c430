//! Access/refresh token issuance and verification.
//!
//! Both tokens are HS256 JWTs carrying `sub`, `role`, `kind`, `iat` and `exp`.
//! Access and refresh tokens are signed with different secrets, and the `kind`
//! claim is checked as well, so one can never stand in for the other.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, TokenConfig};
use domain::{CallerContext, Role, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// The caller identity these claims vouch for.
    pub fn caller(&self) -> CallerContext {
        CallerContext::new(self.sub, self.role)
    }
}

/// Token pair returned after login or refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs and verifies token pairs. Immutable after construction.
pub struct TokenManager {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Build from validated configuration.
    ///
    /// # Errors
    /// `InvalidInput` when the secrets are too short or equal, or a TTL is
    /// outside its accepted range.
    pub fn new(config: &TokenConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::invalid(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let access_ttl = Duration::try_minutes(config.access_ttl_minutes)
            .ok_or_else(|| AppError::invalid("access token lifetime out of range"))?;
        let refresh_ttl = Duration::try_hours(config.refresh_ttl_hours)
            .ok_or_else(|| AppError::invalid("refresh token lifetime out of range"))?;

        Ok(Self {
            access: SigningKeys::from_secret(&config.access_secret),
            refresh: SigningKeys::from_secret(&config.refresh_secret),
            access_ttl,
            refresh_ttl,
            validation,
        })
    }

    /// Issue a fresh access/refresh pair for `user_id` acting as `role`.
    pub fn issue_pair(&self, user_id: Uuid, role: Role) -> AppResult<TokenPair> {
        let access_token = self.sign(user_id, role, TokenKind::Access)?;
        let refresh_token = self.sign(user_id, role, TokenKind::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_ttl.num_minutes() * SECONDS_PER_MINUTE,
        })
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, TokenKind::Access)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, TokenKind::Refresh)
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn sign(&self, user_id: Uuid, role: Role, kind: TokenKind) -> AppResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl(kind))
            .ok_or_else(|| AppError::internal("token expiry out of range"))?;
        let claims = Claims {
            sub: user_id,
            role,
            kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::default(), claims, &self.keys(claims.kind).encoding)
            .map_err(|e| AppError::internal(format!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)?;
        if data.claims.kind != kind {
            tracing::debug!(expected = ?kind, actual = ?data.claims.kind, "token kind mismatch");
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS: &str = "access-secret-access-secret-0123456789";
    const REFRESH: &str = "refresh-secret-refresh-secret-0123456789";

    fn manager() -> TokenManager {
        TokenManager::new(&TokenConfig::new(ACCESS, REFRESH)).unwrap()
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = manager();
        let user_id = Uuid::new_v4();
        let pair = tokens.issue_pair(user_id, Role::Resident).unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 15 * 60);

        let access = tokens.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.role, Role::Resident);
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(access.caller(), CallerContext::new(user_id, Role::Resident));

        let refresh = tokens.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user_id);
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let tokens = manager();
        let pair = tokens.issue_pair(Uuid::new_v4(), Role::Guard).unwrap();

        assert!(tokens.verify_refresh(&pair.access_token).unwrap_err().is_unauthorized());
        assert!(tokens.verify_access(&pair.refresh_token).unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_kind_claim_checked_even_with_valid_signature() {
        let tokens = manager();
        let now = Utc::now();
        // Refresh-kind claims signed with the access key
        let forged = encode(
            &Header::default(),
            &Claims {
                sub: Uuid::new_v4(),
                role: Role::Admin,
                kind: TokenKind::Refresh,
                exp: (now + Duration::minutes(5)).timestamp(),
                iat: now.timestamp(),
            },
            &tokens.access.encoding,
        )
        .unwrap();

        assert!(matches!(tokens.verify_access(&forged), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let other = TokenManager::new(&TokenConfig::new(
            "another-access-secret-0123456789-abcdef",
            "another-refresh-secret-0123456789-abcdef",
        ))
        .unwrap();
        let pair = other.issue_pair(Uuid::new_v4(), Role::Admin).unwrap();

        assert!(matches!(manager().verify_access(&pair.access_token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = manager();
        let now = Utc::now();
        let expired = tokens
            .encode_claims(&Claims {
                sub: Uuid::new_v4(),
                role: Role::Resident,
                kind: TokenKind::Access,
                exp: (now - Duration::seconds(1)).timestamp(),
                iat: (now - Duration::minutes(16)).timestamp(),
            })
            .unwrap();

        assert!(matches!(tokens.verify_access(&expired), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let tokens = manager();
        for token in ["", "not-a-jwt", "a.b.c"] {
            assert!(tokens.verify_access(token).unwrap_err().is_unauthorized());
        }
    }

    #[test]
    fn test_weak_config_rejected() {
        assert!(TokenManager::new(&TokenConfig::new("short", REFRESH)).is_err());
        assert!(TokenManager::new(&TokenConfig::new(ACCESS, ACCESS)).is_err());

        let mut config = TokenConfig::new(ACCESS, REFRESH);
        config.refresh_ttl_hours = 0;
        assert!(TokenManager::new(&config).is_err());
    }

    #[test]
    fn test_oversized_ttl_is_an_error() {
        let mut config = TokenConfig::new(ACCESS, REFRESH);
        config.access_ttl_minutes = i64::MAX / 100;
        assert!(matches!(TokenManager::new(&config), Err(AppError::InvalidInput(_))));

        let mut config = TokenConfig::new(ACCESS, REFRESH);
        config.refresh_ttl_hours = i64::MAX;
        assert!(matches!(TokenManager::new(&config), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_longest_ttls_still_sign() {
        let mut config = TokenConfig::new(ACCESS, REFRESH);
        config.access_ttl_minutes = domain::MAX_ACCESS_TTL_MINUTES;
        config.refresh_ttl_hours = domain::MAX_REFRESH_TTL_HOURS;
        let tokens = TokenManager::new(&config).unwrap();

        let pair = tokens.issue_pair(Uuid::new_v4(), Role::Admin).unwrap();
        assert_eq!(pair.expires_in, domain::MAX_ACCESS_TTL_MINUTES * 60);
        assert!(tokens.verify_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_claims_serialize_role_and_kind_lowercase() {
        let claims = Claims {
            sub: Uuid::nil(),
            role: Role::Guard,
            kind: TokenKind::Refresh,
            exp: 0,
            iat: 0,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "guard");
        assert_eq!(json["kind"], "refresh");
    }
}
