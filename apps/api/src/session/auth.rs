//! Mock authentication. Any well-formed form succeeds and mints a fresh user.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::toast::NewToast;
use crate::models::user::User;
use crate::notifications::ToastBus;
use crate::session::SessionStore;
use crate::validation::{is_valid_email, validate_password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

/// Collects every field problem at once, keyed by field name.
pub fn validate_form(form: &AuthForm, mode: AuthMode) -> Result<(), AppError> {
    let mut errors = BTreeMap::new();

    let email = form.email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required".to_string());
    } else if !is_valid_email(email) {
        errors.insert("email", "Email is invalid".to_string());
    }

    if form.password.is_empty() {
        errors.insert("password", "Password is required".to_string());
    } else if mode == AuthMode::Signup && !validate_password(&form.password).is_valid() {
        errors.insert("password", "Password does not meet requirements".to_string());
    }

    let has_name = form.name.as_deref().is_some_and(|n| !n.trim().is_empty());
    if mode == AuthMode::Signup && !has_name {
        errors.insert("name", "Name is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::FieldErrors(errors))
    }
}

pub fn login(session: &SessionStore, toasts: &ToastBus, form: &AuthForm) -> Result<User, AppError> {
    authenticate(session, toasts, form, AuthMode::Login)
}

pub fn signup(session: &SessionStore, toasts: &ToastBus, form: &AuthForm) -> Result<User, AppError> {
    authenticate(session, toasts, form, AuthMode::Signup)
}

pub fn logout(session: &SessionStore) -> Result<(), AppError> {
    session.clear_current_user()?;
    info!("User signed out");
    Ok(())
}

fn authenticate(
    session: &SessionStore,
    toasts: &ToastBus,
    form: &AuthForm,
    mode: AuthMode,
) -> Result<User, AppError> {
    validate_form(form, mode)?;

    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let user = User::new(form.email.trim(), name);
    session.set_current_user(&user)?;

    let toast = match mode {
        AuthMode::Login => NewToast::success("Welcome back!")
            .with_message("You have been logged in successfully"),
        AuthMode::Signup => NewToast::success("Account created!")
            .with_message("Your account has been created successfully"),
    };
    toasts.publish(toast);

    info!("User {} signed in ({:?})", user.id, mode);
    Ok(user)
}
