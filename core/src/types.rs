//! Typed itsyouonline payloads.
//!
//! # Design
//! Each struct mirrors one schema in `schemas` and implements `Model`, so it
//! is only ever decoded from JSON that already passed schema validation.
//! Optional fields are `Option` and skipped when `None`, which keeps the
//! "absent, never null" rule on the way out.

use serde::{Deserialize, Serialize};

use crate::builder::Model;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub label: String,
    pub street: String,
    pub nr: String,
    pub postalcode: String,
    pub city: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub label: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub label: String,
    pub bic: String,
    pub country: String,
    pub iban: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalAssetAddress {
    pub label: String,
    pub currencysymbol: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub label: String,
    pub emailaddress: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookAccount {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubAccount {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownerof {
    pub emailaddresses: Vec<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phonenumber {
    pub label: String,
    pub phonenumber: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub label: String,
    pub publickey: String,
}

/// Everything a user has shared with the requesting organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub addresses: Vec<Address>,
    pub avatar: Vec<Avatar>,
    pub bankaccounts: Vec<BankAccount>,
    pub digitalwallet: DigitalAssetAddress,
    pub emailaddresses: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<FacebookAccount>,
    pub firstname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubAccount>,
    pub lastname: String,
    pub organizations: Vec<String>,
    pub ownerof: Ownerof,
    pub phonenumbers: Vec<Phonenumber>,
    #[serde(rename = "publicKeys", skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<PublicKey>>,
    pub username: String,
    pub validatedemailaddresses: Vec<EmailAddress>,
    pub validatedphonenumbers: Vec<Phonenumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub globalid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<String>>,
    #[serde(rename = "publicKeys", skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<String>>,
}

impl Organization {
    /// An organization with only its global id set.
    pub fn new(globalid: &str) -> Self {
        Self {
            globalid: globalid.to_string(),
            dns: None,
            includes: None,
            members: None,
            owners: None,
            public_keys: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationApiKey {
    pub label: String,
    #[serde(rename = "callbackURL", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_credentials_grant_type: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
}

/// Maps a label requested by an organization to the user's real label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationMap {
    pub reallabel: String,
    pub requestedlabel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub granted_to: String,
    pub username: String,
    pub organizations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<AuthorizationMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bankaccounts: Option<Vec<AuthorizationMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emailaddresses: Option<Vec<AuthorizationMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonenumbers: Option<Vec<AuthorizationMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<AuthorizationMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub key: String,
    pub value: String,
}

macro_rules! impl_model {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(impl Model for $ty {
            const TYPE_NAME: &'static str = $name;
        })*
    };
}

impl_model! {
    Address => "Address",
    Avatar => "Avatar",
    BankAccount => "BankAccount",
    DigitalAssetAddress => "DigitalAssetAddress",
    EmailAddress => "EmailAddress",
    FacebookAccount => "FacebookAccount",
    GithubAccount => "GithubAccount",
    Ownerof => "Ownerof",
    Phonenumber => "Phonenumber",
    PublicKey => "PublicKey",
    UserView => "userview",
    Organization => "Organization",
    OrganizationApiKey => "OrganizationAPIKey",
    Member => "member",
    AuthorizationMap => "AuthorizationMap",
    Authorization => "Authorization",
    RegistryEntry => "RegistryEntry",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypedValueBuilder;
    use crate::error::{ErrorKind, ValidationError};
    use crate::schemas::ITSYOUONLINE;
    use serde_json::{json, Value};

    fn builder() -> TypedValueBuilder<'static> {
        TypedValueBuilder::new(&ITSYOUONLINE)
    }

    fn userview_json() -> Value {
        json!({
            "addresses": [{
                "label": "home", "street": "Main", "nr": "1",
                "postalcode": "9000", "city": "Gent", "country": "BE"
            }],
            "avatar": [],
            "bankaccounts": [],
            "digitalwallet": {"label": "btc", "currencysymbol": "BTC", "address": "1abc"},
            "emailaddresses": [{"label": "main", "emailaddress": "bob@example.com"}],
            "github": {"id": 42, "login": "bob"},
            "firstname": "Bob",
            "lastname": "Builder",
            "organizations": ["acme"],
            "ownerof": {"emailaddresses": []},
            "phonenumbers": [{"label": "cell", "phonenumber": "+32123"}],
            "username": "bob",
            "validatedemailaddresses": [],
            "validatedphonenumbers": []
        })
    }

    #[test]
    fn every_model_has_a_schema() {
        let names = [
            Address::TYPE_NAME,
            Avatar::TYPE_NAME,
            BankAccount::TYPE_NAME,
            DigitalAssetAddress::TYPE_NAME,
            EmailAddress::TYPE_NAME,
            FacebookAccount::TYPE_NAME,
            GithubAccount::TYPE_NAME,
            Ownerof::TYPE_NAME,
            Phonenumber::TYPE_NAME,
            PublicKey::TYPE_NAME,
            UserView::TYPE_NAME,
            Organization::TYPE_NAME,
            OrganizationApiKey::TYPE_NAME,
            Member::TYPE_NAME,
            AuthorizationMap::TYPE_NAME,
            Authorization::TYPE_NAME,
            RegistryEntry::TYPE_NAME,
        ];
        for name in names {
            assert!(ITSYOUONLINE.get(name).is_some(), "{name}");
        }
    }

    #[test]
    fn userview_decodes_after_validation() {
        let view: UserView = builder().build_model(&userview_json()).unwrap();
        assert_eq!(view.username, "bob");
        assert_eq!(view.addresses[0].city, "Gent");
        assert_eq!(view.github.as_ref().map(|g| g.id), Some(42));
        assert!(view.facebook.is_none());
        assert!(view.public_keys.is_none());
    }

    #[test]
    fn userview_round_trips_through_raw() {
        let b = builder();
        let view: UserView = b.build_model(&userview_json()).unwrap();
        let raw = b.model_to_raw(&view).unwrap();
        assert!(raw.get("facebook").is_none());
        let again: UserView = b.build_model(&raw).unwrap();
        assert_eq!(view, again);
    }

    #[test]
    fn userview_rejects_github_id_as_string() {
        let mut raw = userview_json();
        raw["github"]["id"] = json!("42");
        let err = builder().build_model::<UserView>(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field_path(), "github.id");
    }

    #[test]
    fn github_id_beyond_i64_is_a_type_mismatch() {
        let err = builder()
            .build_model::<GithubAccount>(&json!({"id": u64::MAX, "login": "bob"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field_path(), "id");
        assert!(matches!(
            err,
            ValidationError::TypeMismatch { type_name: "GithubAccount", field: "id", ref value, .. }
                if *value == json!(18446744073709551615u64)
        ));
    }

    #[test]
    fn api_key_uses_wire_names() {
        let key = OrganizationApiKey {
            label: "ci".to_string(),
            callback_url: Some("https://ci.example.com/cb".to_string()),
            client_credentials_grant_type: Some(true),
            secret: None,
        };
        let raw = builder().model_to_raw(&key).unwrap();
        assert_eq!(
            raw,
            json!({
                "label": "ci",
                "callbackURL": "https://ci.example.com/cb",
                "clientCredentialsGrantType": true
            })
        );
    }

    #[test]
    fn authorization_uses_wire_names() {
        let raw = json!({
            "grantedTo": "acme",
            "username": "bob",
            "organizations": [],
            "publicKeys": [{"reallabel": "laptop", "requestedlabel": "ssh"}]
        });
        let auth: Authorization = builder().build_model(&raw).unwrap();
        assert_eq!(auth.granted_to, "acme");
        assert_eq!(auth.public_keys.unwrap()[0].reallabel, "laptop");
    }
}
