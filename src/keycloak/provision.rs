use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value, json};

use super::RealmAdmin;
use super::types::{
    ClientRepresentation, ClientScopeRepresentation, DemoUser, ProtocolMapperRepresentation,
    RealmRepresentation, default_mappers,
};

const OIDC: &str = "openid-connect";
const ACCOUNT_CONSOLE: &str = "account-console";

/// What the bootstrap should converge to.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub realm: String,
    pub client_scope: String,
    pub client_id: String,
    pub base_url: String,
    pub backchannel_logout_url: String,
    pub login_theme: String,
    pub mappers: Vec<ProtocolMapperRepresentation>,
    /// Built-in scopes attached to the client as optional scopes.
    pub optional_scopes: Vec<String>,
    pub users: Vec<DemoUser>,
}

impl ProvisionPlan {
    /// The local development setup. User ids must match the application's test data.
    pub fn dev_defaults() -> Self {
        Self {
            realm: "os".to_string(),
            client_scope: "os".to_string(),
            client_id: "os-ui".to_string(),
            base_url: "https://localhost:8000".to_string(),
            backchannel_logout_url: "http://backend:9002/system/action/logout".to_string(),
            login_theme: "os".to_string(),
            mappers: default_mappers("os"),
            optional_scopes: vec![
                "profile".to_string(),
                "email".to_string(),
                "offline_access".to_string(),
            ],
            users: vec![
                DemoUser::new("admin", 1, "admin"),
                DemoUser::new("user", 2, "password"),
            ],
        }
    }

    /// The UI client as it should look after provisioning.
    pub fn client_representation(&self) -> ClientRepresentation {
        let mut extra = Map::new();
        extra.insert("directAccessGrantsEnabled".to_string(), json!(true));
        extra.insert("publicClient".to_string(), json!(true));
        extra.insert("baseUrl".to_string(), json!(self.base_url));
        extra.insert(
            "redirectUris".to_string(),
            json!([format!("{}/*", self.base_url)]),
        );
        extra.insert(
            "attributes".to_string(),
            json!({
                "login_theme": self.login_theme,
                "backchannel.logout.url": self.backchannel_logout_url,
                "post.logout.redirect.uris": format!("{}/*", self.base_url),
                "backchannel.logout.session.required": "true",
            }),
        );
        ClientRepresentation {
            id: None,
            client_id: self.client_id.clone(),
            protocol: Some(OIDC.to_string()),
            default_client_scopes: vec![self.client_scope.clone()],
            optional_client_scopes: Vec::new(),
            web_origins: None,
            extra,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionReport {
    pub realm: StepOutcome,
    pub client_scope: StepOutcome,
    pub mappers_added: Vec<String>,
    pub client: StepOutcome,
    pub account_console: StepOutcome,
    pub optional_scopes_added: Vec<String>,
    pub users: Vec<(String, StepOutcome)>,
}

pub async fn ensure_realm<A: RealmAdmin + ?Sized>(admin: &A, realm: &str) -> Result<StepOutcome> {
    let realms = admin.realms().await.context("listing realms")?;
    if realms.iter().any(|r| r.realm == realm) {
        log::info!("Realm {realm} already exists");
        return Ok(StepOutcome::Unchanged);
    }
    admin
        .create_realm(&RealmRepresentation {
            realm: realm.to_string(),
            enabled: true,
        })
        .await
        .with_context(|| format!("creating realm {realm}"))?;
    log::info!("Created realm {realm}");
    Ok(StepOutcome::Created)
}

/// Create the client scope if needed and attach every missing mapper, matched by name.
/// Returns the scope outcome and the names of the mappers added.
pub async fn ensure_client_scope<A: RealmAdmin + ?Sized>(
    admin: &A,
    realm: &str,
    scope_name: &str,
    mappers: &[ProtocolMapperRepresentation],
) -> Result<(StepOutcome, Vec<String>)> {
    let scopes = admin.client_scopes(realm).await.context("listing client scopes")?;
    let (outcome, scope_id) = match scopes.iter().find(|s| s.name == scope_name) {
        Some(scope) => {
            let id = scope
                .id
                .clone()
                .ok_or_else(|| anyhow!("client scope {scope_name} has no id"))?;
            (StepOutcome::Unchanged, id)
        }
        None => {
            let id = admin
                .create_client_scope(
                    realm,
                    &ClientScopeRepresentation {
                        id: None,
                        name: scope_name.to_string(),
                        protocol: OIDC.to_string(),
                    },
                )
                .await
                .with_context(|| format!("creating client scope {scope_name}"))?;
            log::info!("Created client scope {scope_name}");
            (StepOutcome::Created, id)
        }
    };

    let existing = admin.scope_mappers(realm, &scope_id).await?;
    let mut added = Vec::new();
    for mapper in mappers {
        if existing.iter().any(|m| m.name == mapper.name) {
            log::info!("Protocol mapper {} already exists in {scope_name}", mapper.name);
            continue;
        }
        admin
            .add_scope_mapper(realm, &scope_id, mapper)
            .await
            .with_context(|| format!("adding mapper {}", mapper.name))?;
        log::info!("Added protocol mapper {} to {scope_name}", mapper.name);
        added.push(mapper.name.clone());
    }
    Ok((outcome, added))
}

/// Merge the desired client over the existing one. Unmanaged fields and
/// default scopes already present are kept.
fn merge_client(existing: &ClientRepresentation, desired: &ClientRepresentation) -> ClientRepresentation {
    let mut merged = existing.clone();
    merged.protocol = desired.protocol.clone();
    for scope in &desired.default_client_scopes {
        if !merged.default_client_scopes.contains(scope) {
            merged.default_client_scopes.push(scope.clone());
        }
    }
    merge_maps(&mut merged.extra, &desired.extra);
    merged
}

/// Overlay `desired` onto `target`. Nested objects such as `attributes` are
/// merged key by key so server-side entries survive.
fn merge_maps(target: &mut Map<String, Value>, desired: &Map<String, Value>) {
    for (key, value) in desired {
        if let (Some(Value::Object(existing)), Value::Object(wanted)) = (target.get_mut(key), value) {
            merge_maps(existing, wanted);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Create the client, or update it in place when a client with the same clientId exists.
pub async fn ensure_client<A: RealmAdmin + ?Sized>(
    admin: &A,
    realm: &str,
    desired: &ClientRepresentation,
) -> Result<StepOutcome> {
    let clients = admin.clients(realm).await.context("listing clients")?;
    let Some(existing) = clients.iter().find(|c| c.client_id == desired.client_id) else {
        let id = admin
            .create_client(realm, desired)
            .await
            .with_context(|| format!("creating client {}", desired.client_id))?;
        log::info!("Created client {} ({id})", desired.client_id);
        return Ok(StepOutcome::Created);
    };

    let id = existing
        .id
        .clone()
        .ok_or_else(|| anyhow!("client {} has no id", desired.client_id))?;
    let merged = merge_client(existing, desired);
    if &merged == existing {
        log::info!("Client {} already up to date", desired.client_id);
        return Ok(StepOutcome::Unchanged);
    }
    admin
        .update_client(realm, &id, &merged)
        .await
        .with_context(|| format!("updating client {}", desired.client_id))?;
    log::info!("Updated client {}", desired.client_id);
    Ok(StepOutcome::Updated)
}

/// Allow every web origin on the account console.
pub async fn open_account_console<A: RealmAdmin + ?Sized>(admin: &A, realm: &str) -> Result<StepOutcome> {
    let clients = admin.clients(realm).await?;
    let Some(console) = clients.into_iter().find(|c| c.client_id == ACCOUNT_CONSOLE) else {
        log::warn!("No {ACCOUNT_CONSOLE} client in realm {realm}");
        return Ok(StepOutcome::Unchanged);
    };
    let wildcard = vec!["*".to_string()];
    if console.web_origins.as_ref() == Some(&wildcard) {
        return Ok(StepOutcome::Unchanged);
    }
    let id = console
        .id
        .clone()
        .ok_or_else(|| anyhow!("{ACCOUNT_CONSOLE} has no id"))?;
    let updated = ClientRepresentation {
        web_origins: Some(wildcard),
        ..console
    };
    admin.update_client(realm, &id, &updated).await?;
    log::info!("Opened web origins of {ACCOUNT_CONSOLE}");
    Ok(StepOutcome::Updated)
}

/// Attach built-in scopes to the client as optional scopes, skipping scopes
/// the client already has as default or optional.
pub async fn attach_optional_scopes<A: RealmAdmin + ?Sized>(
    admin: &A,
    realm: &str,
    client_id: &str,
    scope_names: &[String],
) -> Result<Vec<String>> {
    let clients = admin.clients(realm).await?;
    let client = clients
        .iter()
        .find(|c| c.client_id == client_id)
        .ok_or_else(|| anyhow!("client {client_id} not found after provisioning"))?;
    let client_uuid = client
        .id
        .clone()
        .ok_or_else(|| anyhow!("client {client_id} has no id"))?;
    let scopes = admin.client_scopes(realm).await?;

    let mut added = Vec::new();
    for name in scope_names {
        if client.default_client_scopes.contains(name) || client.optional_client_scopes.contains(name) {
            continue;
        }
        let Some(scope_id) = scopes.iter().find(|s| &s.name == name).and_then(|s| s.id.clone()) else {
            log::warn!("Client scope {name} does not exist in realm {realm}");
            continue;
        };
        admin
            .add_optional_client_scope(realm, &client_uuid, &scope_id)
            .await
            .with_context(|| format!("adding optional scope {name} to {client_id}"))?;
        log::info!("Added optional client scope {name} to {client_id}");
        added.push(name.clone());
    }
    Ok(added)
}

/// Create or update each demo user by exact username.
pub async fn ensure_users<A: RealmAdmin + ?Sized>(
    admin: &A,
    realm: &str,
    users: &[DemoUser],
) -> Result<Vec<(String, StepOutcome)>> {
    let mut outcomes = Vec::new();
    for user in users {
        let representation = user.representation();
        let existing = admin
            .find_users(realm, &user.username)
            .await?
            .into_iter()
            .find(|u| u.username == user.username);

        let outcome = match existing.and_then(|u| u.id) {
            Some(id) => {
                admin
                    .update_user(realm, &id, &representation)
                    .await
                    .with_context(|| format!("updating user {}", user.username))?;
                log::info!("User {} already exists, updated", user.username);
                StepOutcome::Updated
            }
            None => {
                admin
                    .create_user(realm, &representation)
                    .await
                    .with_context(|| format!("creating user {}", user.username))?;
                log::info!("Created user {}", user.username);
                StepOutcome::Created
            }
        };
        outcomes.push((user.username.clone(), outcome));
    }
    Ok(outcomes)
}

/// Run every step in order. Stops at the first API error.
pub async fn provision<A: RealmAdmin + ?Sized>(admin: &A, plan: &ProvisionPlan) -> Result<ProvisionReport> {
    let realm = ensure_realm(admin, &plan.realm).await?;
    let (client_scope, mappers_added) =
        ensure_client_scope(admin, &plan.realm, &plan.client_scope, &plan.mappers).await?;
    log::info!("Configuring clients in realm {}", plan.realm);
    let client = ensure_client(admin, &plan.realm, &plan.client_representation()).await?;
    let account_console = open_account_console(admin, &plan.realm).await?;
    let optional_scopes_added =
        attach_optional_scopes(admin, &plan.realm, &plan.client_id, &plan.optional_scopes).await?;
    let users = ensure_users(admin, &plan.realm, &plan.users).await?;

    Ok(ProvisionReport {
        realm,
        client_scope,
        mappers_added,
        client,
        account_console,
        optional_scopes_added,
        users,
    })
}
