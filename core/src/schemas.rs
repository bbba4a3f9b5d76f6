//! Field schemas of the itsyouonline API payloads.
//!
//! Type names are the wire names used by the API definition, which is why a
//! few of them (`userview`, `member`) are lower case.

use crate::schema::{Field, FieldType, Schema, SchemaRegistry};

const STRING: &[FieldType] = &[FieldType::String];
const BOOLEAN: &[FieldType] = &[FieldType::Boolean];
const INTEGER: &[FieldType] = &[FieldType::Integer];

pub static ADDRESS: Schema = Schema::new(
    "Address",
    &[
        Field::required("label", STRING),
        Field::required("street", STRING),
        Field::required("nr", STRING),
        Field::required("postalcode", STRING),
        Field::required("city", STRING),
        Field::required("country", STRING),
        Field::optional("other", STRING),
    ],
);

pub static AVATAR: Schema = Schema::new(
    "Avatar",
    &[Field::required("label", STRING), Field::required("source", STRING)],
);

pub static BANK_ACCOUNT: Schema = Schema::new(
    "BankAccount",
    &[
        Field::required("label", STRING),
        Field::required("bic", STRING),
        Field::required("country", STRING),
        Field::required("iban", STRING),
    ],
);

pub static DIGITAL_ASSET_ADDRESS: Schema = Schema::new(
    "DigitalAssetAddress",
    &[
        Field::required("label", STRING),
        Field::required("currencysymbol", STRING),
        Field::required("address", STRING),
        Field::optional("expire", STRING),
    ],
);

pub static EMAIL_ADDRESS: Schema = Schema::new(
    "EmailAddress",
    &[Field::required("label", STRING), Field::required("emailaddress", STRING)],
);

pub static FACEBOOK_ACCOUNT: Schema = Schema::new(
    "FacebookAccount",
    &[
        Field::required("id", STRING),
        Field::optional("link", STRING),
        Field::optional("name", STRING),
        Field::optional("picture", STRING),
    ],
);

pub static GITHUB_ACCOUNT: Schema = Schema::new(
    "GithubAccount",
    &[
        Field::required("id", INTEGER),
        Field::required("login", STRING),
        Field::optional("name", STRING),
        Field::optional("avatar_url", STRING),
        Field::optional("html_url", STRING),
    ],
);

pub static OWNEROF: Schema = Schema::new(
    "Ownerof",
    &[Field::required("emailaddresses", &[FieldType::Object("EmailAddress")]).sequence()],
);

pub static PHONENUMBER: Schema = Schema::new(
    "Phonenumber",
    &[Field::required("label", STRING), Field::required("phonenumber", STRING)],
);

pub static PUBLIC_KEY: Schema = Schema::new(
    "PublicKey",
    &[Field::required("label", STRING), Field::required("publickey", STRING)],
);

pub static USERVIEW: Schema = Schema::new(
    "userview",
    &[
        Field::required("addresses", &[FieldType::Object("Address")]).sequence(),
        Field::required("avatar", &[FieldType::Object("Avatar")]).sequence(),
        Field::required("bankaccounts", &[FieldType::Object("BankAccount")]).sequence(),
        Field::required("digitalwallet", &[FieldType::Object("DigitalAssetAddress")]),
        Field::required("emailaddresses", &[FieldType::Object("EmailAddress")]).sequence(),
        Field::optional("facebook", &[FieldType::Object("FacebookAccount")]),
        Field::required("firstname", STRING),
        Field::optional("github", &[FieldType::Object("GithubAccount")]),
        Field::required("lastname", STRING),
        Field::required("organizations", STRING).sequence(),
        Field::required("ownerof", &[FieldType::Object("Ownerof")]),
        Field::required("phonenumbers", &[FieldType::Object("Phonenumber")]).sequence(),
        Field::optional("publicKeys", &[FieldType::Object("PublicKey")]).sequence(),
        Field::required("username", STRING),
        Field::required("validatedemailaddresses", &[FieldType::Object("EmailAddress")]).sequence(),
        Field::required("validatedphonenumbers", &[FieldType::Object("Phonenumber")]).sequence(),
    ],
);

pub static ORGANIZATION: Schema = Schema::new(
    "Organization",
    &[
        Field::required("globalid", STRING),
        Field::optional("dns", STRING).sequence(),
        Field::optional("includes", STRING).sequence(),
        Field::optional("members", STRING).sequence(),
        Field::optional("owners", STRING).sequence(),
        Field::optional("publicKeys", STRING).sequence(),
    ],
);

pub static ORGANIZATION_API_KEY: Schema = Schema::new(
    "OrganizationAPIKey",
    &[
        Field::required("label", STRING),
        Field::optional("callbackURL", STRING),
        Field::optional("clientCredentialsGrantType", BOOLEAN),
        Field::optional("secret", STRING),
    ],
);

pub static MEMBER: Schema = Schema::new("member", &[Field::required("username", STRING)]);

pub static AUTHORIZATION_MAP: Schema = Schema::new(
    "AuthorizationMap",
    &[Field::required("reallabel", STRING), Field::required("requestedlabel", STRING)],
);

pub static AUTHORIZATION: Schema = Schema::new(
    "Authorization",
    &[
        Field::required("grantedTo", STRING),
        Field::required("username", STRING),
        Field::required("organizations", STRING).sequence(),
        Field::optional("addresses", &[FieldType::Object("AuthorizationMap")]).sequence(),
        Field::optional("bankaccounts", &[FieldType::Object("AuthorizationMap")]).sequence(),
        Field::optional("emailaddresses", &[FieldType::Object("AuthorizationMap")]).sequence(),
        Field::optional("phonenumbers", &[FieldType::Object("AuthorizationMap")]).sequence(),
        Field::optional("publicKeys", &[FieldType::Object("AuthorizationMap")]).sequence(),
        Field::optional("facebook", BOOLEAN),
        Field::optional("github", BOOLEAN),
    ],
);

pub static REGISTRY_ENTRY: Schema = Schema::new(
    "RegistryEntry",
    &[Field::required("key", STRING), Field::required("value", STRING)],
);

static SCHEMAS: [&Schema; 17] = [
    &ADDRESS,
    &AVATAR,
    &BANK_ACCOUNT,
    &DIGITAL_ASSET_ADDRESS,
    &EMAIL_ADDRESS,
    &FACEBOOK_ACCOUNT,
    &GITHUB_ACCOUNT,
    &OWNEROF,
    &PHONENUMBER,
    &PUBLIC_KEY,
    &USERVIEW,
    &ORGANIZATION,
    &ORGANIZATION_API_KEY,
    &MEMBER,
    &AUTHORIZATION_MAP,
    &AUTHORIZATION,
    &REGISTRY_ENTRY,
];

/// Every itsyouonline payload type, keyed by wire type name.
pub static ITSYOUONLINE: SchemaRegistry = SchemaRegistry::new(&SCHEMAS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reference_resolves() {
        assert!(ITSYOUONLINE.unresolved().is_empty(), "{:?}", ITSYOUONLINE.unresolved());
    }

    #[test]
    fn type_names_are_unique() {
        let mut names: Vec<_> = ITSYOUONLINE.schemas().iter().map(|s| s.type_name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn userview_optional_fields_match_generated_class() {
        let optional: Vec<_> = USERVIEW.fields.iter().filter(|f| !f.required).map(|f| f.name).collect();
        assert_eq!(optional, vec!["facebook", "github", "publicKeys"]);
    }
}
