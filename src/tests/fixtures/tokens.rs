use crate::shell::auth::AccessClaims;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

pub const ACCESS_TOKEN_SECRET: &str = "access-token-secret-for-tests";

pub fn access_token(user_id: &str) -> String {
    access_token_expiring_at(user_id, Utc::now().timestamp() + 900)
}

pub fn access_token_expiring_at(user_id: &str, exp: i64) -> String {
    let claims = AccessClaims {
        user_id: user_id.to_string(),
        exp: exp as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ACCESS_TOKEN_SECRET.as_bytes()),
    )
    .unwrap()
}
