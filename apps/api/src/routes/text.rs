use axum::Json;
use serde::{Deserialize, Serialize};

use crate::validation::{
    analyze, validate_password, PasswordStrength, PasswordValidation, TextAnalysis,
};

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

/// POST /api/v1/text/analyze
pub async fn handle_analyze(Json(req): Json<AnalyzeRequest>) -> Json<TextAnalysis> {
    Json(analyze(&req.text))
}

#[derive(Deserialize)]
pub struct PasswordCheckRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheckResponse {
    pub rules: PasswordValidation,
    pub valid: bool,
    pub strength: PasswordStrength,
}

/// POST /api/v1/password/check
pub async fn handle_password_check(
    Json(req): Json<PasswordCheckRequest>,
) -> Json<PasswordCheckResponse> {
    let rules = validate_password(&req.password);
    Json(PasswordCheckResponse {
        rules,
        valid: rules.is_valid(),
        strength: rules.strength(),
    })
}
