//! Stateless request builder and response parser for the itsyouonline API.
//!
//! # Design
//! `ItsYouOnlineClient` holds only a `base_url`. Every endpoint is split into
//! a `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`. Outgoing bodies are re-projected through
//! their schema and incoming bodies are validated by `TypedValueBuilder`
//! before serde sees them, so a malformed upstream payload surfaces as
//! `ApiError::Validation` with field context.

use serde_json::Value;

use crate::builder::{Model, TypedValueBuilder};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::schemas::ITSYOUONLINE;
use crate::types::{Address, Authorization, Member, Organization, OrganizationApiKey, RegistryEntry, UserView};

/// Synchronous, stateless client for the itsyouonline API.
#[derive(Debug, Clone)]
pub struct ItsYouOnlineClient {
    base_url: String,
    builder: TypedValueBuilder<'static>,
}

impl ItsYouOnlineClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            builder: TypedValueBuilder::new(&ITSYOUONLINE),
        }
    }

    pub fn builder(&self) -> &TypedValueBuilder<'static> {
        &self.builder
    }

    // --- organizations ---

    pub fn build_create_organization(&self, organization: &Organization) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, "/organizations".to_string(), organization)
    }

    pub fn parse_create_organization(&self, response: HttpResponse) -> Result<Organization, ApiError> {
        self.parse_model(response, 201)
    }

    pub fn build_get_organization(&self, globalid: &str) -> HttpRequest {
        self.without_body(HttpMethod::Get, format!("/organizations/{globalid}"))
    }

    pub fn parse_get_organization(&self, response: HttpResponse) -> Result<Organization, ApiError> {
        self.parse_model(response, 200)
    }

    pub fn build_update_organization(&self, globalid: &str, organization: &Organization) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Put, format!("/organizations/{globalid}"), organization)
    }

    pub fn parse_update_organization(&self, response: HttpResponse) -> Result<Organization, ApiError> {
        self.parse_model(response, 200)
    }

    pub fn build_delete_organization(&self, globalid: &str) -> HttpRequest {
        self.without_body(HttpMethod::Delete, format!("/organizations/{globalid}"))
    }

    pub fn parse_delete_organization(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn build_add_organization_member(&self, globalid: &str, member: &Member) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, format!("/organizations/{globalid}/members"), member)
    }

    pub fn parse_add_organization_member(&self, response: HttpResponse) -> Result<Member, ApiError> {
        self.parse_model(response, 201)
    }

    pub fn build_create_organization_api_key(
        &self,
        globalid: &str,
        api_key: &OrganizationApiKey,
    ) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, format!("/organizations/{globalid}/apikeys"), api_key)
    }

    pub fn parse_create_organization_api_key(&self, response: HttpResponse) -> Result<OrganizationApiKey, ApiError> {
        self.parse_model(response, 201)
    }

    pub fn build_get_organization_registry_entry(&self, globalid: &str, key: &str) -> HttpRequest {
        self.without_body(HttpMethod::Get, format!("/organizations/{globalid}/registry/{key}"))
    }

    pub fn parse_get_organization_registry_entry(&self, response: HttpResponse) -> Result<RegistryEntry, ApiError> {
        self.parse_model(response, 200)
    }

    // --- users ---

    pub fn build_get_user_information(&self, username: &str) -> HttpRequest {
        self.without_body(HttpMethod::Get, format!("/users/{username}/info"))
    }

    pub fn parse_get_user_information(&self, response: HttpResponse) -> Result<UserView, ApiError> {
        self.parse_model(response, 200)
    }

    pub fn build_get_user_addresses(&self, username: &str) -> HttpRequest {
        self.without_body(HttpMethod::Get, format!("/users/{username}/addresses"))
    }

    pub fn parse_get_user_addresses(&self, response: HttpResponse) -> Result<Vec<Address>, ApiError> {
        check_status(&response, 200)?;
        Ok(self.builder.build_models(&response.json()?)?)
    }

    pub fn build_register_user_address(&self, username: &str, address: &Address) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, format!("/users/{username}/addresses"), address)
    }

    pub fn parse_register_user_address(&self, response: HttpResponse) -> Result<Address, ApiError> {
        self.parse_model(response, 201)
    }

    pub fn build_get_authorization(&self, username: &str, granted_to: &str) -> HttpRequest {
        self.without_body(HttpMethod::Get, format!("/users/{username}/authorizations/{granted_to}"))
    }

    pub fn parse_get_authorization(&self, response: HttpResponse) -> Result<Authorization, ApiError> {
        self.parse_model(response, 200)
    }

    fn without_body(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body<T: Model>(&self, method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
        let raw = self.builder.model_to_raw(input)?;
        let body = serde_json::to_string(&raw).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    fn parse_model<T: Model>(&self, response: HttpResponse, expected: u16) -> Result<T, ApiError> {
        check_status(&response, expected)?;
        let raw: Value = response.json()?;
        Ok(self.builder.build_model(&raw)?)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
