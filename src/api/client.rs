use super::constants::{self, params};
use super::error::CatalogError;
use super::models::{Connection, Entity, SessionInfo};
use super::query::{TableFilter, unwrap_count, unwrap_entities, unwrap_entity, unwrap_ids};
use super::resilience::{ResilienceConfig, RetryPolicy};
use futures::future::{AbortRegistration, Abortable};
use log::{debug, info, warn};
use serde_json::{Value, json};
use std::future::Future;
use std::time::Duration;

/// HTTP settings for a catalog client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub resilience: ResilienceConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            resilience: ResilienceConfig::default(),
        }
    }
}

/// Catalog REST client bound to one server and, after login, one session
#[derive(Clone)]
pub struct CatalogClient {
    server: String,
    http_client: reqwest::Client,
    username: String,
    session_id: Option<String>,
    retry_policy: RetryPolicy,
}

/// Run a request future, resolving to `Cancelled` if its abort handle fires
pub async fn cancellable<T, F>(
    future: F,
    abort: Option<AbortRegistration>,
) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    match abort {
        Some(registration) => Abortable::new(future, registration)
            .await
            .unwrap_or_else(|_| Err(CatalogError::Cancelled)),
        None => future.await,
    }
}

impl CatalogClient {
    pub fn new(server: impl Into<String>, config: &ClientConfig) -> Result<Self, CatalogError> {
        let server = server.into().trim().trim_end_matches('/').to_string();
        if server.is_empty() {
            return Err(CatalogError::Validation("Server URL must not be empty".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(constants::USER_AGENT)
            .build()?;

        Ok(Self {
            server,
            http_client,
            username: String::new(),
            session_id: None,
            retry_policy: RetryPolicy::new(config.resilience.retry.clone()),
        })
    }

    /// Client for a session obtained earlier
    pub fn from_connection(connection: &Connection, config: &ClientConfig) -> Result<Self, CatalogError> {
        let mut client = Self::new(connection.server.clone(), config)?;
        client.username = connection.username.clone();
        if !connection.session_id.is_empty() {
            client.session_id = Some(connection.session_id.clone());
        }
        Ok(client)
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session_id.is_some()
    }

    /// The connection triple for the current session, if any
    pub fn connection(&self) -> Option<Connection> {
        self.session_id.as_ref().map(|session_id| Connection {
            server: self.server.clone(),
            session_id: session_id.clone(),
            username: self.username.clone(),
        })
    }

    fn require_session(&self) -> Result<&str, CatalogError> {
        self.session_id.as_deref().ok_or(CatalogError::NotLoggedIn)
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = CatalogError::from_response(status.as_u16(), &body);
        debug!("Catalog request failed: {}", error);
        Err(error)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, CatalogError> {
        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    /// Authenticate and keep the session id
    pub async fn login(&mut self, plugin: &str, username: &str, password: &str) -> Result<String, CatalogError> {
        if plugin.trim().is_empty() {
            return Err(CatalogError::Validation("Authentication plugin must not be empty".to_string()));
        }

        let credentials = json!({
            "plugin": plugin,
            "credentials": [
                { "username": username },
                { "password": password }
            ]
        });

        info!("Logging in to {} as {} via {}", self.server, username, plugin);
        let response = self
            .http_client
            .post(constants::session_endpoint(&self.server))
            .form(&[(params::JSON, credentials.to_string())])
            .send()
            .await?;

        let body = Self::read_json(response).await?;
        let session_id = body
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| CatalogError::Decode(format!("expected a session id, got {}", body)))?
            .to_string();

        self.username = username.to_string();
        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    /// End the session. The local session is cleared even when the server
    /// call fails; the failure is still reported.
    pub async fn logout(&mut self) -> Result<(), CatalogError> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };

        info!("Logging out of {}", self.server);
        let response = self
            .http_client
            .delete(constants::session_record_endpoint(&self.server, &session_id))
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// Extend the session lifetime
    pub async fn refresh(&self) -> Result<(), CatalogError> {
        let session_id = self.require_session()?;
        debug!("Refreshing session on {}", self.server);

        let response = self
            .http_client
            .put(constants::session_record_endpoint(&self.server, session_id))
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// Ask the server who the session belongs to and how long it lives
    pub async fn session_info(&self) -> Result<SessionInfo, CatalogError> {
        let session_id = self.require_session()?;
        let url = constants::session_record_endpoint(&self.server, session_id);

        let body = self
            .retry_policy
            .execute(|| async {
                let response = self.http_client.get(&url).send().await?;
                Self::read_json(response).await
            })
            .await?;

        serde_json::from_value(body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn entity_manager_get(&self, query: &[(&str, String)]) -> Result<Value, CatalogError> {
        let session_id = self.require_session()?;
        let url = constants::entity_manager_endpoint(&self.server);

        self.retry_policy
            .execute(|| async {
                let response = self
                    .http_client
                    .get(&url)
                    .query(&[(params::SESSION_ID, session_id)])
                    .query(query)
                    .send()
                    .await?;
                Self::read_json(response).await
            })
            .await
    }

    /// One page of entities for a table filter
    pub async fn get_entries(
        &self,
        filter: &TableFilter,
        abort: Option<AbortRegistration>,
    ) -> Result<Vec<Entity>, CatalogError> {
        let query = filter.to_query_string();
        debug!("Query: {}", query);

        cancellable(
            async {
                let body = self.entity_manager_get(&[(params::QUERY, query.clone())]).await?;
                unwrap_entities(body)
            },
            abort,
        )
        .await
    }

    /// Total number of rows matching a table filter, ignoring paging
    pub async fn get_count(
        &self,
        filter: &TableFilter,
        abort: Option<AbortRegistration>,
    ) -> Result<u64, CatalogError> {
        let query = filter.to_count_query();
        debug!("Count query: {}", query);

        cancellable(
            async {
                let body = self.entity_manager_get(&[(params::QUERY, query.clone())]).await?;
                unwrap_count(body)
            },
            abort,
        )
        .await
    }

    pub async fn get_by_id(
        &self,
        entity_type: &str,
        id: i64,
        abort: Option<AbortRegistration>,
    ) -> Result<Entity, CatalogError> {
        cancellable(
            async {
                let body = self
                    .entity_manager_get(&[
                        (params::QUERY, entity_type.to_string()),
                        (params::ID, id.to_string()),
                    ])
                    .await?;
                unwrap_entity(body)
            },
            abort,
        )
        .await
    }

    /// Create or update one entity; an entity with an `id` is an update.
    /// Returns the ids the server reports.
    pub async fn write_entity(&self, entity_type: &str, entity: &Entity) -> Result<Vec<i64>, CatalogError> {
        let session_id = self.require_session()?;
        let entities = json!([{ entity_type: entity }]);

        debug!("Writing {} {}", entity_type, entities);
        let response = self
            .http_client
            .post(constants::entity_manager_endpoint(&self.server))
            .form(&[
                (params::SESSION_ID, session_id.to_string()),
                (params::ENTITIES, entities.to_string()),
            ])
            .send()
            .await?;

        let body = Self::read_json(response).await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        unwrap_ids(body)
    }

    /// Delete entities of one type by id. No request is made for an empty list.
    pub async fn delete_entities(&self, entity_type: &str, ids: &[i64]) -> Result<(), CatalogError> {
        if ids.is_empty() {
            return Ok(());
        }
        let session_id = self.require_session()?;

        let entities: Vec<Value> = ids
            .iter()
            .map(|id| json!({ entity_type: { "id": id } }))
            .collect();

        info!("Deleting {} {} entities", ids.len(), entity_type);
        let response = self
            .http_client
            .delete(constants::entity_manager_endpoint(&self.server))
            .query(&[
                (params::SESSION_ID, session_id.to_string()),
                (params::ENTITIES, Value::Array(entities).to_string()),
            ])
            .send()
            .await?;

        match Self::check_response(response).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Delete of {} {:?} failed: {}", entity_type, ids, e);
                Err(e)
            }
        }
    }
}
