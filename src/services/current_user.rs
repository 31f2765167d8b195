//! Authenticated principal and the `/api/auth/me` projection of it.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::AppError;

/// Identity attached to a request once its session has been resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// Signed in through OpenID Connect (an ID token was issued)
    Oidc(OidcIdentity),
    /// Signed in through plain OAuth2; only the userinfo attributes are known
    #[serde(rename = "oauth2")]
    OAuth2(GenericIdentity),
    Anonymous,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OidcIdentity {
    pub subject: String,
    pub full_name: Option<String>,
    pub given_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericIdentity {
    pub subject: String,
    pub attributes: Map<String, Value>,
}

/// Display identity returned by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@example.edu")]
    pub email: String,
}

impl Principal {
    /// Builds a principal from a provider userinfo document.
    ///
    /// `has_id_token` selects the OIDC variant; otherwise the whole document is
    /// kept as opaque attributes.
    pub fn from_user_info(user_info: Map<String, Value>, has_id_token: bool) -> Self {
        let subject = user_info
            .get("sub")
            .or_else(|| user_info.get("id"))
            .and_then(attribute_string)
            .unwrap_or_default();

        if has_id_token {
            let claim = |key: &str| user_info.get(key).and_then(attribute_string);
            Principal::Oidc(OidcIdentity {
                subject,
                full_name: claim("name"),
                given_name: claim("given_name"),
                email: claim("email"),
            })
        } else {
            Principal::OAuth2(GenericIdentity {
                subject,
                attributes: user_info,
            })
        }
    }
}

/// Projects a principal to `{name, email}`; anonymous callers are rejected.
pub fn resolve(principal: &Principal) -> Result<CurrentUser, AppError> {
    match principal {
        Principal::Oidc(identity) => Ok(CurrentUser {
            name: identity
                .full_name
                .clone()
                .or_else(|| identity.given_name.clone())
                .unwrap_or_else(|| identity.subject.clone()),
            email: identity.email.clone().unwrap_or_default(),
        }),
        Principal::OAuth2(identity) => Ok(CurrentUser {
            name: identity
                .attributes
                .get("name")
                .and_then(attribute_string)
                .unwrap_or_else(|| identity.subject.clone()),
            email: identity
                .attributes
                .get("email")
                .and_then(attribute_string)
                .unwrap_or_default(),
        }),
        Principal::Anonymous => Err(AppError::Unauthenticated),
    }
}

/// Stringifies an attribute; JSON null counts as absent.
fn attribute_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads the principal placed in request extensions by the session
/// middleware, falling back to [`Principal::Anonymous`].
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Principal>()
            .cloned()
            .unwrap_or(Principal::Anonymous))
    }
}
