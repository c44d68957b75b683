use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Subset of Keycloak's RealmRepresentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmRepresentation {
    pub realm: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientScopeRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMapperRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub protocol: String,
    pub protocol_mapper: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_required: Option<bool>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Client representation. Fields this tool does not manage are carried in
/// `extra` so an update does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub default_client_scopes: Vec<String>,
    #[serde(default)]
    pub optional_client_scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_origins: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRepresentation {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialRepresentation>,
}

/// Demo account: username, application user id, password.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoUser {
    pub username: String,
    pub user_id: i64,
    pub password: String,
}

impl DemoUser {
    pub fn new(username: &str, user_id: i64, password: &str) -> Self {
        Self {
            username: username.to_string(),
            user_id,
            password: password.to_string(),
        }
    }

    pub fn representation(&self) -> UserRepresentation {
        let mut attributes = Map::new();
        attributes.insert("os-userid".to_string(), json!([self.user_id.to_string()]));
        UserRepresentation {
            id: None,
            username: self.username.clone(),
            enabled: true,
            email_verified: true,
            first_name: self.username.clone(),
            last_name: "User".to_string(),
            attributes,
            credentials: vec![CredentialRepresentation {
                kind: "password".to_string(),
                value: self.password.clone(),
                temporary: false,
            }],
        }
    }
}

fn mapper(name: &str, protocol_mapper: &str, config: Value) -> ProtocolMapperRepresentation {
    ProtocolMapperRepresentation {
        id: None,
        name: name.to_string(),
        protocol: "openid-connect".to_string(),
        protocol_mapper: protocol_mapper.to_string(),
        consent_required: None,
        config: config.as_object().cloned().unwrap_or_default(),
    }
}

fn property_mapper(name: &str, attribute: &str, claim: &str) -> ProtocolMapperRepresentation {
    mapper(
        name,
        "oidc-usermodel-property-mapper",
        json!({
            "user.attribute": attribute,
            "claim.name": claim,
            "id.token.claim": "true",
            "access.token.claim": "true",
            "jsonType.label": "String",
        }),
    )
}

/// Claim mappers of the application client scope. `client_id` and `aud`
/// are required by RFC 9068 access tokens.
pub fn default_mappers(audience: &str) -> Vec<ProtocolMapperRepresentation> {
    let mut client_id = mapper(
        "client-id-mapper",
        "oidc-hardcoded-claim-mapper",
        json!({
            "claim.name": "client_id",
            "claim.value": audience,
            "id.token.claim": "true",
            "access.token.claim": "true",
            "userinfo.token.claim": "true",
        }),
    );
    client_id.consent_required = Some(false);

    vec![
        client_id,
        mapper(
            "audience-mapper",
            "oidc-audience-mapper",
            json!({
                "included.custom.audience": audience,
                "id.token.claim": "true",
                "access.token.claim": "true",
            }),
        ),
        property_mapper("email-mapper", "email", "email"),
        mapper(
            "userid-mapper",
            "oidc-usermodel-attribute-mapper",
            json!({
                "user.attribute": "os-userid",
                "claim.name": "userId",
                "id.token.claim": "true",
                "access.token.claim": "true",
                "jsonType.label": "String",
            }),
        ),
        property_mapper("username-mapper", "username", "username"),
        property_mapper("firstname-mapper", "firstName", "firstName"),
        property_mapper("lastname-mapper", "lastName", "lastName"),
    ]
}
