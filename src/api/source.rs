use super::client::CatalogClient;
use super::error::CatalogError;
use super::models::Entity;
use super::query::TableFilter;
use async_trait::async_trait;
use futures::future::AbortRegistration;

/// Where tab data comes from. The catalog client is the real source; tests
/// substitute their own.
#[async_trait]
pub trait EntitySource: Send + Sync {
    async fn get_entries(
        &self,
        filter: &TableFilter,
        abort: Option<AbortRegistration>,
    ) -> Result<Vec<Entity>, CatalogError>;

    async fn get_count(
        &self,
        filter: &TableFilter,
        abort: Option<AbortRegistration>,
    ) -> Result<u64, CatalogError>;
}

#[async_trait]
impl EntitySource for CatalogClient {
    async fn get_entries(
        &self,
        filter: &TableFilter,
        abort: Option<AbortRegistration>,
    ) -> Result<Vec<Entity>, CatalogError> {
        CatalogClient::get_entries(self, filter, abort).await
    }

    async fn get_count(
        &self,
        filter: &TableFilter,
        abort: Option<AbortRegistration>,
    ) -> Result<u64, CatalogError> {
        CatalogClient::get_count(self, filter, abort).await
    }
}
