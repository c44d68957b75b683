use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use super::RealmAdmin;
use super::types::{
    ClientRepresentation, ClientScopeRepresentation, ProtocolMapperRepresentation,
    RealmRepresentation, UserRepresentation,
};

/// Connection settings of the admin API.
#[derive(Debug, Clone, PartialEq)]
pub struct KeycloakSettings {
    pub url: String,
    pub admin: String,
    pub admin_password: String,
    pub verify_tls: bool,
}

impl KeycloakSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("KEYCLOAK_URL").ok_or_else(|| anyhow!("KEYCLOAK_URL is not set"))?;
        let admin = lookup("KEYCLOAK_ADMIN").ok_or_else(|| anyhow!("KEYCLOAK_ADMIN is not set"))?;
        let admin_password = lookup("KEYCLOAK_ADMIN_PASSWORD")
            .ok_or_else(|| anyhow!("KEYCLOAK_ADMIN_PASSWORD is not set"))?;
        // Dev instances run with self-signed certificates.
        let verify_tls = lookup("KEYCLOAK_VERIFY_TLS")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            admin,
            admin_password,
            verify_tls,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Admin REST client authenticated against the `master` realm.
pub struct KeycloakClient {
    http: Client,
    base_url: String,
    token: String,
}

/// Id of a created resource, taken from the last segment of the `Location` header.
fn created_id(response: &Response) -> Result<String> {
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| anyhow!("created resource has no Location header"))?;
    location
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot read id from Location '{location}'"))
}

impl KeycloakClient {
    pub async fn login(settings: &KeycloakSettings) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()?;

        let token: TokenResponse = http
            .post(format!(
                "{}/realms/master/protocol/openid-connect/token",
                settings.url
            ))
            .form(&[
                ("grant_type", "password"),
                ("client_id", "admin-cli"),
                ("username", settings.admin.as_str()),
                ("password", settings.admin_password.as_str()),
            ])
            .send()
            .await
            .context("token request failed")?
            .error_for_status()
            .context("admin login rejected")?
            .json()
            .await?;

        Ok(Self {
            http,
            base_url: settings.url.clone(),
            token: token.access_token,
        })
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/admin/realms{path}", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self
            .http
            .get(self.admin_url(path))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("GET {path}"))?
            .json()
            .await?;
        Ok(value)
    }

    async fn post_json<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let response = self
            .http
            .post(self.admin_url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("POST {path}"))?;
        Ok(response)
    }

    async fn put_json<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.http
            .put(self.admin_url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("PUT {path}"))?;
        Ok(())
    }
}

#[async_trait]
impl RealmAdmin for KeycloakClient {
    async fn realms(&self) -> Result<Vec<RealmRepresentation>> {
        self.get_json("").await
    }

    async fn create_realm(&self, realm: &RealmRepresentation) -> Result<()> {
        self.post_json("", realm).await?;
        Ok(())
    }

    async fn client_scopes(&self, realm: &str) -> Result<Vec<ClientScopeRepresentation>> {
        self.get_json(&format!("/{realm}/client-scopes")).await
    }

    async fn create_client_scope(
        &self,
        realm: &str,
        scope: &ClientScopeRepresentation,
    ) -> Result<String> {
        let response = self.post_json(&format!("/{realm}/client-scopes"), scope).await?;
        created_id(&response)
    }

    async fn scope_mappers(
        &self,
        realm: &str,
        scope_id: &str,
    ) -> Result<Vec<ProtocolMapperRepresentation>> {
        self.get_json(&format!(
            "/{realm}/client-scopes/{scope_id}/protocol-mappers/models"
        ))
        .await
    }

    async fn add_scope_mapper(
        &self,
        realm: &str,
        scope_id: &str,
        mapper: &ProtocolMapperRepresentation,
    ) -> Result<()> {
        self.post_json(
            &format!("/{realm}/client-scopes/{scope_id}/protocol-mappers/models"),
            mapper,
        )
        .await?;
        Ok(())
    }

    async fn clients(&self, realm: &str) -> Result<Vec<ClientRepresentation>> {
        self.get_json(&format!("/{realm}/clients")).await
    }

    async fn create_client(&self, realm: &str, client: &ClientRepresentation) -> Result<String> {
        let response = self.post_json(&format!("/{realm}/clients"), client).await?;
        created_id(&response)
    }

    async fn update_client(&self, realm: &str, id: &str, client: &ClientRepresentation) -> Result<()> {
        self.put_json(&format!("/{realm}/clients/{id}"), client).await
    }

    async fn add_optional_client_scope(
        &self,
        realm: &str,
        client_id: &str,
        scope_id: &str,
    ) -> Result<()> {
        self.put_json(
            &format!("/{realm}/clients/{client_id}/optional-client-scopes/{scope_id}"),
            &serde_json::json!({
                "realm": realm,
                "client": client_id,
                "clientScopeId": scope_id,
            }),
        )
        .await
    }

    async fn find_users(&self, realm: &str, username: &str) -> Result<Vec<UserRepresentation>> {
        let users = self
            .http
            .get(self.admin_url(&format!("/{realm}/users")))
            .bearer_auth(&self.token)
            .query(&[("username", username), ("exact", "true")])
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("GET /{realm}/users?username={username}"))?
            .json()
            .await?;
        Ok(users)
    }

    async fn create_user(&self, realm: &str, user: &UserRepresentation) -> Result<String> {
        let response = self.post_json(&format!("/{realm}/users"), user).await?;
        created_id(&response)
    }

    async fn update_user(&self, realm: &str, id: &str, user: &UserRepresentation) -> Result<()> {
        self.put_json(&format!("/{realm}/users/{id}"), user).await
    }
}
