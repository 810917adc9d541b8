use std::marker::PhantomData;

use async_trait::async_trait;
use entity::{Record, RecordId, UpdateKind};
use tracing::{debug, instrument};

use crate::{ApiClient, ApiError, ApiResult};

/// Read-only access to a collection.
///
/// This is the seam a panel uses to read another panel's records without
/// reaching into its state.
#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<R>>;
}

/// Full CRUD access to a collection.
///
/// `create` and `update` hand back the record the server echoed, when it sent
/// one that decodes; callers refetch the collection either way.
#[async_trait]
pub trait RecordStore<R: Record>: RecordSource<R> {
    async fn create(&self, payload: &R::Payload) -> ApiResult<Option<R>>;
    async fn update(&self, id: &RecordId, payload: &R::Payload) -> ApiResult<Option<R>>;
    async fn delete(&self, id: &RecordId) -> ApiResult<()>;
}

/// HTTP-backed collection: `GET/POST /{collection}`, `PATCH|PUT/DELETE /{collection}/{id}`.
#[derive(Clone, Debug)]
pub struct Resource<R> {
    pub(crate) client: ApiClient,
    pub(crate) _record: PhantomData<fn() -> R>,
}

impl<R: Record> Resource<R> {
    async fn read_echo(response: reqwest::Response) -> ApiResult<Option<R>> {
        let bytes = response.bytes().await.map_err(ApiError::transport)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice::<R>(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                debug!(error = %err, collection = R::COLLECTION, "ignoring undecodable echo");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<R: Record> RecordSource<R> for Resource<R> {
    #[instrument(name = "api.list", skip_all, fields(collection = R::COLLECTION))]
    async fn list(&self) -> ApiResult<Vec<R>> {
        let url = self.client.collection_url(R::COLLECTION)?;
        let response = self.client.send(self.client.http().get(url)).await?;
        let records = response
            .json::<Vec<R>>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        debug!(count = records.len(), "listed records");
        Ok(records)
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for Resource<R> {
    #[instrument(name = "api.create", skip_all, fields(collection = R::COLLECTION))]
    async fn create(&self, payload: &R::Payload) -> ApiResult<Option<R>> {
        let url = self.client.collection_url(R::COLLECTION)?;
        let response = self
            .client
            .send(self.client.http().post(url).json(payload))
            .await?;
        Self::read_echo(response).await
    }

    #[instrument(name = "api.update", skip_all, fields(collection = R::COLLECTION, %id))]
    async fn update(&self, id: &RecordId, payload: &R::Payload) -> ApiResult<Option<R>> {
        let url = self.client.member_url(R::COLLECTION, id)?;
        let http = self.client.http();
        let request = match R::UPDATE {
            UpdateKind::Partial => http.patch(url),
            UpdateKind::Full => http.put(url),
        };
        let response = self.client.send(request.json(payload)).await?;
        Self::read_echo(response).await
    }

    #[instrument(name = "api.delete", skip_all, fields(collection = R::COLLECTION, %id))]
    async fn delete(&self, id: &RecordId) -> ApiResult<()> {
        let url = self.client.member_url(R::COLLECTION, id)?;
        self.client.send(self.client.http().delete(url)).await?;
        Ok(())
    }
}
