use serde::{Deserialize, Serialize};

use crate::models::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,      // Provider account ID
    pub sid: String,      // Session ID, keys the role store
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub provider: String, // "github" | "google"
    pub role: Role,       // Role at sign-in, always employee
    pub iat: i64,
    pub exp: i64,
}
