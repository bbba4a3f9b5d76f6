//! Typed JSON validation and a host-does-IO client for the itsyouonline API.
//!
//! # Overview
//! The core is `TypedValueBuilder`: it turns decoded JSON into validated
//! `DomainObject`s according to static per-type schemas, and turns them back
//! into plain JSON. The itsyouonline client is a thin layer on top that
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network.
//!
//! # Design
//! - Schemas are `static` tables, looked up by type name in a
//!   `SchemaRegistry`. Nothing is registered at runtime.
//! - Validation is strict (no scalar coercion) and fail-fast.
//! - Typed models are serde structs that are only decoded after the builder
//!   has accepted the JSON, so errors always carry field context.

pub mod builder;
pub mod client;
pub mod error;
pub mod http;
pub mod object;
pub mod schema;
pub mod schemas;
pub mod types;

pub use builder::{Model, TypedValueBuilder, DEFAULT_MAX_DEPTH};
pub use client::ItsYouOnlineClient;
pub use error::{ApiError, Container, ErrorKind, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use object::{DomainObject, FieldValue, TypedValue};
pub use schema::{Cardinality, Field, FieldType, Schema, SchemaRegistry};
pub use schemas::ITSYOUONLINE;
pub use types::{
    Address, Authorization, AuthorizationMap, Avatar, BankAccount, DigitalAssetAddress, EmailAddress, FacebookAccount,
    GithubAccount, Member, Organization, OrganizationApiKey, Ownerof, Phonenumber, PublicKey, RegistryEntry, UserView,
};
