//! Catalog REST endpoints and defaults

/// Base path of the catalog REST interface
pub const API_BASE_PATH: &str = "/icat";

pub const SESSION_ENDPOINT: &str = "session";

pub const ENTITY_MANAGER_ENDPOINT: &str = "entityManager";

/// Authentication plugin used when none is given
pub const DEFAULT_AUTH_PLUGIN: &str = "simple";

pub const USER_AGENT: &str = "icat-admin/0.1";

/// Form and query parameter names
pub mod params {
    pub const SESSION_ID: &str = "sessionId";
    pub const QUERY: &str = "query";
    pub const ID: &str = "id";
    pub const ENTITIES: &str = "entities";
    pub const JSON: &str = "json";
}

fn base(server: &str) -> &str {
    server.trim_end_matches('/')
}

/// Login endpoint
pub fn session_endpoint(server: &str) -> String {
    format!("{}{}/{}", base(server), API_BASE_PATH, SESSION_ENDPOINT)
}

/// Endpoint for one session (info, refresh, logout)
pub fn session_record_endpoint(server: &str, session_id: &str) -> String {
    format!(
        "{}/{}",
        session_endpoint(server),
        urlencoding::encode(session_id)
    )
}

pub fn entity_manager_endpoint(server: &str) -> String {
    format!("{}{}/{}", base(server), API_BASE_PATH, ENTITY_MANAGER_ENDPOINT)
}
