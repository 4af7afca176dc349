//! Caller identity handed over by the upstream gateway.
//!
//! Authentication itself happens before requests reach this service; the gateway forwards the
//! authenticated user in `x-user-id` and their roles in `x-user-roles`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::workflows::packages::CustomerId;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Host,
    Customer,
}

impl Role {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "host" => Some(Role::Host),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }
}

/// Authenticated user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: CustomerId,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        let roles = if roles.is_empty() {
            vec![Role::Customer]
        } else {
            roles
        };
        Self {
            user_id: CustomerId(user_id.into()),
            roles,
        }
    }

    pub fn customer(user_id: impl Into<String>) -> Self {
        Self::new(user_id, vec![Role::Customer])
    }

    pub fn host(user_id: impl Into<String>) -> Self {
        Self::new(user_id, vec![Role::Host])
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Hosts and admins may change package offerings.
    pub fn can_manage_packages(&self) -> bool {
        self.has_role(Role::Host) || self.has_role(Role::Admin)
    }

    pub fn from_parts(parts: &Parts) -> Option<Self> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())?;

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|raw| raw.split(',').filter_map(Role::parse).collect())
            .unwrap_or_default();

        Some(Self::new(user_id, roles))
    }
}

/// Rejection returned when no caller identity is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Caller::from_parts(parts).ok_or(Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::get("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _) = builder.body(()).expect("request builds").into_parts();
        parts
    }

    #[test]
    fn missing_user_header_is_rejected() {
        assert!(Caller::from_parts(&parts(&[])).is_none());
        assert!(Caller::from_parts(&parts(&[(USER_ID_HEADER, "  ")])).is_none());
    }

    #[test]
    fn roles_default_to_customer() {
        let caller = Caller::from_parts(&parts(&[(USER_ID_HEADER, "user-7")])).expect("caller");
        assert_eq!(caller.user_id, CustomerId("user-7".to_string()));
        assert_eq!(caller.roles, vec![Role::Customer]);
        assert!(!caller.can_manage_packages());
    }

    #[test]
    fn roles_are_parsed_from_comma_list() {
        let caller = Caller::from_parts(&parts(&[
            (USER_ID_HEADER, "user-8"),
            (USER_ROLES_HEADER, "customer, Host, unknown"),
        ]))
        .expect("caller");
        assert_eq!(caller.roles, vec![Role::Customer, Role::Host]);
        assert!(caller.can_manage_packages());
    }
}
