use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::{Extension, State},
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use recipesaver_core::users::{Credentials, Identity, NewUser, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    /// Signed-out token ids, with their expiry so they can be forgotten.
    revoked: Mutex<HashMap<String, usize>>,
}

/// The raw bearer token of the current request.
#[derive(Clone)]
pub struct SessionToken(pub String);

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    InvalidCredentials,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    exp: usize,
    iat: usize,
    jti: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

impl From<CredentialsBody> for Credentials {
    fn from(body: CredentialsBody) -> Self {
        Credentials::new(body.email, body.password)
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub email: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
        }
    }
}

impl AuthManager {
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            validation,
            token_ttl,
            revoked: Mutex::new(HashMap::new()),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Failed to hash password: {e}")))
    }

    pub fn verify_password(&self, candidate: &str, stored_hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {e}")))?;
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .map_err(|err| match err {
                PasswordHashError::Password => AuthError::InvalidCredentials,
                other => AuthError::Internal(format!("Password verification failed: {other}")),
            })
    }

    pub fn issue_token(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: identity.user_id.clone(),
            email: identity.email.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.decode_claims(token)?;
        if self.revoked().contains_key(&claims.jti) {
            return Err(AuthError::Unauthorized);
        }
        Ok(Identity::new(claims.sub, claims.email))
    }

    /// Rejects `token` from now on. Expired revocations are dropped on the way.
    pub fn revoke_token(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.decode_claims(token)?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?
            .as_secs() as usize;
        let mut revoked = self.revoked();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti, claims.exp);
        Ok(())
    }

    fn revoked(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.revoked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::Unauthorized
                }
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }

    fn token_response(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let token = self.issue_token(&Identity::from(user))?;
        Ok(TokenResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.expires_in().as_secs(),
            user: UserResponse::from(user),
        })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized | AuthError::InvalidCredentials => ApiError::Core(
                recipesaver_core::Error::Unauthorized("Invalid email or password".to_string()),
            ),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

/// Fresh 32-byte key; tokens signed with it do not survive a restart.
pub fn random_secret_key() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = CredentialsBody,
    responses((status = 200, body = TokenResponse), (status = 400), (status = 409))
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<Json<TokenResponse>> {
    let credentials = Credentials::from(body);
    credentials.validate_for_sign_up()?;
    let password_hash = state.auth.hash_password(&credentials.password)?;
    let user = state
        .user_repository
        .create(NewUser {
            email: credentials.normalized_email(),
            password_hash,
        })
        .await?;
    tracing::info!("Registered user {}", user.id);
    Ok(Json(state.auth.token_response(&user)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = CredentialsBody,
    responses((status = 200, body = TokenResponse), (status = 401))
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<TokenResponse>, AuthError> {
    let credentials = Credentials::from(body);
    let user = state
        .user_repository
        .find_by_email(&credentials.normalized_email())
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::InvalidCredentials)?;
    state
        .auth
        .verify_password(&credentials.password, &user.password_hash)?;
    Ok(Json(state.auth.token_response(&user)?))
}

/// Revokes the presented token and closes the caller's search sessions.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses((status = 204), (status = 401))
)]
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<StatusCode, AuthError> {
    state.auth.revoke_token(&token)?;
    let closed = state.search_sessions.close_owned_by(&identity).await;
    tracing::info!(
        "User {} signed out ({} search session(s) closed)",
        identity.user_id,
        closed
    );
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/v1/auth/status", responses((status = 200, body = AuthStatusResponse)))]
pub async fn auth_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<AuthStatusResponse> {
    let identity = bearer_token(&headers).and_then(|token| state.auth.validate_token(token).ok());
    Json(AuthStatusResponse {
        authenticated: identity.is_some(),
        email: identity.map(|i| i.email),
    })
}

/// Rejects requests without a valid bearer token and hands the caller's
/// [`Identity`] to the handler as a request extension.
///
/// `EventSource` cannot set headers, so an `access_token` query parameter is
/// accepted as well.
pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())
        .map(str::to_string)
        .or_else(|| query_token(request.uri().query()))
        .ok_or(AuthError::Unauthorized)?;
    let identity = state.auth.validate_token(&token)?;
    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return None;
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn query_token(query: Option<&str>) -> Option<String> {
    let params: HashMap<String, String> = serde_urlencoded::from_str(query?).ok()?;
    params
        .get("access_token")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
