use std::marker::PhantomData;

use catalog_bridge::envelope::ResponseEnvelope;
use catalog_bridge::error::ApiError;
use catalog_bridge::models::QueryParams;
use catalog_bridge::{ResourceAction, ResourceResponse, ResourceResult};
use serde::{Serialize, de::DeserializeOwned};

use crate::client::ApiClient;

/// The five collection operations for one resource, mapped onto a fixed
/// path. `T` is the record type returned by the service and `D` the partial
/// body accepted by create and update.
///
/// Failures from the client are passed through untouched.
pub struct ResourceService<'a, T, D> {
    client: &'a ApiClient,
    path: &'static str,
    _marker: PhantomData<fn(D) -> T>,
}

impl<'a, T, D> ResourceService<'a, T, D>
where
    T: DeserializeOwned,
    D: Serialize,
{
    /// `path` is the collection path, e.g. `/products`.
    pub fn new(client: &'a ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.path)
    }

    pub async fn list(&self, params: &QueryParams) -> Result<ResponseEnvelope<Vec<T>>, ApiError> {
        self.client.get(self.path, params).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<ResponseEnvelope<T>, ApiError> {
        self.client.get(&self.item_path(id), &QueryParams::new()).await
    }

    pub async fn create(&self, data: &D) -> Result<ResponseEnvelope<T>, ApiError> {
        self.client.post(self.path, data).await
    }

    pub async fn update(&self, id: &str, data: &D) -> Result<ResponseEnvelope<T>, ApiError> {
        self.client.put(&self.item_path(id), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<ResponseEnvelope<T>, ApiError> {
        self.client.delete(&self.item_path(id)).await
    }

    /// Runs a bridged action through the matching operation.
    pub async fn run(&self, action: ResourceAction<D>) -> ResourceResult<T> {
        match action {
            ResourceAction::List(params) => self.list(&params).await.map(ResourceResponse::Many),
            ResourceAction::Fetch(id) => self.get_by_id(&id).await.map(ResourceResponse::One),
            ResourceAction::Create(data) => self.create(&data).await.map(ResourceResponse::One),
            ResourceAction::Update(id, data) => {
                self.update(&id, &data).await.map(ResourceResponse::One)
            }
            ResourceAction::Delete(id) => self.delete(&id).await.map(ResourceResponse::One),
        }
    }
}
