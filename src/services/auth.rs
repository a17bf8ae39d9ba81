//! Login, registration, and logout.
//!
//! The token endpoint is the one non-JSON request in the API: it takes a
//! form-encoded username/password pair and answers with a bearer token whose
//! role claim we decode for UI gating only.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::session::{Role, SessionStore};

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    // The server expects the email under "username" (OAuth2 password flow)
    username: &'a str,
    password: &'a str,
}

/// Self-registration payload, validated client-side before any network call.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 2, message = "name must be at least 2 characters long"))]
    pub name: String,
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
    #[validate(custom(function = validate_phone))]
    pub telephone_no: Option<String>,
}

impl RegistrationForm {
    /// Trims whitespace and drops an empty phone field, mirroring what the
    /// form surface does before submitting.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.telephone_no = self.telephone_no.take().and_then(|phone| {
            let phone = phone.trim().to_string();
            (!phone.is_empty()).then_some(phone)
        });
    }
}

const PASSWORD_SPECIALS: &str = "!@#$%^&*";

fn validate_password(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if password.len() >= 8 && allowed && has_digit && has_special {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "password must be at least 8 characters long and contain \
             at least one number and one special character"
                .into(),
        );
        Err(err)
    }
}

// Accepts +?[1-9] followed by 1 to 14 digits
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let ok = (2..=15).contains(&digits.len())
        && digits.starts_with(|c: char| ('1'..='9').contains(&c))
        && digits.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("enter a valid phone number".into());
        Err(err)
    }
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Pre-submit check; failures never reach the network.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ClientError> {
    form.validate()
        .map_err(|errors| ClientError::Validation(validation_message(&errors)))
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// `POST /token` with form-encoded credentials. On success the bearer
    /// token and its decoded role land in the session store.
    pub async fn login(&self, email: &str, password: &str) -> Result<Role, ClientError> {
        let url = self.api.endpoint(&["token"]);
        let token: TokenResponse = self
            .api
            .post_form(
                url,
                &LoginForm {
                    username: email,
                    password,
                },
            )
            .await?;
        let role = self.session.authenticate(token.access_token);
        info!(?role, "logged in");
        Ok(role)
    }

    /// Validates the form locally, then `POST /users/register`. The server
    /// answers with a token, so a successful registration also logs in.
    pub async fn register(&self, mut form: RegistrationForm) -> Result<Role, ClientError> {
        form.normalize();
        validate_registration(&form)?;
        let url = self.api.endpoint(&["users", "register"]);
        let token: TokenResponse = self.api.post(url, &form).await?;
        let role = self.session.authenticate(token.access_token);
        info!(?role, "registered and logged in");
        Ok(role)
    }

    /// Purely local: the server keeps no session state to tear down.
    pub fn logout(&self) {
        self.session.clear();
        info!("logged out");
    }
}
