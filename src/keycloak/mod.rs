//! Keycloak bootstrap for development setups: realm, client scope with claim
//! mappers, the UI client and two demo users.
//!
//! Every step re-reads the current state before acting, so a run that died
//! half-way is repaired by running again.

pub mod client;
pub mod provision;
pub mod types;

pub use client::{KeycloakClient, KeycloakSettings};
pub use provision::{ProvisionPlan, ProvisionReport, StepOutcome, provision};

use anyhow::Result;
use async_trait::async_trait;

use types::{
    ClientRepresentation, ClientScopeRepresentation, ProtocolMapperRepresentation,
    RealmRepresentation, UserRepresentation,
};

/// The admin API calls the bootstrap needs. Creation calls return the new id.
#[async_trait]
pub trait RealmAdmin: Send + Sync {
    async fn realms(&self) -> Result<Vec<RealmRepresentation>>;
    async fn create_realm(&self, realm: &RealmRepresentation) -> Result<()>;

    async fn client_scopes(&self, realm: &str) -> Result<Vec<ClientScopeRepresentation>>;
    async fn create_client_scope(
        &self,
        realm: &str,
        scope: &ClientScopeRepresentation,
    ) -> Result<String>;
    async fn scope_mappers(
        &self,
        realm: &str,
        scope_id: &str,
    ) -> Result<Vec<ProtocolMapperRepresentation>>;
    async fn add_scope_mapper(
        &self,
        realm: &str,
        scope_id: &str,
        mapper: &ProtocolMapperRepresentation,
    ) -> Result<()>;

    async fn clients(&self, realm: &str) -> Result<Vec<ClientRepresentation>>;
    async fn create_client(&self, realm: &str, client: &ClientRepresentation) -> Result<String>;
    async fn update_client(&self, realm: &str, id: &str, client: &ClientRepresentation)
    -> Result<()>;
    async fn add_optional_client_scope(
        &self,
        realm: &str,
        client_id: &str,
        scope_id: &str,
    ) -> Result<()>;

    /// Users whose username matches exactly.
    async fn find_users(&self, realm: &str, username: &str) -> Result<Vec<UserRepresentation>>;
    async fn create_user(&self, realm: &str, user: &UserRepresentation) -> Result<String>;
    async fn update_user(&self, realm: &str, id: &str, user: &UserRepresentation) -> Result<()>;
}
