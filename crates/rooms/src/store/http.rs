//! HTTP adapter for the external document store.
//!
//! Talks to a document-oriented API keyed by organization and collection.
//! Every call re-fetches current state; version enforcement on replace is
//! delegated to the store via the `expected_version` query parameter.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entities::{Message, Room};
use crate::error::{RoomError, RoomResult};
use crate::store::{MessageStore, RoomStore};

const ROOM_COLLECTION: &str = "rooms";
const MESSAGE_COLLECTION: &str = "messages";

/// Thin client for the document store's collection endpoints.
#[derive(Clone)]
pub struct DocumentClient {
    http: reqwest::Client,
    base_url: String,
}

impl DocumentClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> RoomResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| RoomError::dependency_failure(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, org_id: &str, collection: &str, id: &str) -> String {
        format!("{}/orgs/{org_id}/{collection}/{id}", self.base_url)
    }

    fn collection_url(&self, org_id: &str, collection: &str) -> String {
        format!("{}/orgs/{org_id}/{collection}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        org_id: &str,
        collection: &str,
        id: &str,
    ) -> RoomResult<Option<T>> {
        let response = self
            .http
            .get(self.document_url(org_id, collection, id))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<T>().await?)),
            status => Err(RoomError::dependency_failure(format!(
                "document store returned {status} reading {collection}/{id}"
            ))),
        }
    }

    async fn write<T: Serialize>(
        &self,
        org_id: &str,
        collection: &str,
        document: &T,
    ) -> RoomResult<()> {
        let response = self
            .http
            .post(self.collection_url(org_id, collection))
            .json(document)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RoomError::dependency_failure(format!(
                "document store returned {} writing to {collection}",
                response.status()
            )))
        }
    }

    async fn replace<T: Serialize, R: DeserializeOwned>(
        &self,
        org_id: &str,
        collection: &str,
        id: &str,
        document: &T,
        expected_version: Option<u64>,
    ) -> RoomResult<R> {
        let mut request = self.http.put(self.document_url(org_id, collection, id));
        if let Some(version) = expected_version {
            request = request.query(&[("expected_version", version)]);
        }
        let response = request.json(document).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RoomError::RoomNotFound),
            StatusCode::CONFLICT => Err(RoomError::version_conflict(id)),
            status if status.is_success() => Ok(response.json::<R>().await?),
            status => Err(RoomError::dependency_failure(format!(
                "document store returned {status} replacing {collection}/{id}"
            ))),
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        org_id: &str,
        collection: &str,
        params: &[(&str, &str)],
    ) -> RoomResult<Vec<T>> {
        let response = self
            .http
            .get(self.collection_url(org_id, collection))
            .query(params)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<Vec<T>>().await?)
        } else {
            Err(RoomError::dependency_failure(format!(
                "document store returned {} querying {collection}",
                response.status()
            )))
        }
    }
}

/// Production room store over the document store API.
#[derive(Clone)]
pub struct HttpRoomStore {
    client: DocumentClient,
}

impl HttpRoomStore {
    pub fn new(client: DocumentClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RoomStore for HttpRoomStore {
    async fn fetch(&self, org_id: &str, room_id: &str) -> RoomResult<Option<Room>> {
        self.client.read(org_id, ROOM_COLLECTION, room_id).await
    }

    async fn insert(&self, org_id: &str, room: &Room) -> RoomResult<()> {
        self.client.write(org_id, ROOM_COLLECTION, room).await
    }

    async fn persist(
        &self,
        org_id: &str,
        room: &Room,
        expected_version: u64,
    ) -> RoomResult<Room> {
        self.client
            .replace(org_id, ROOM_COLLECTION, &room.id, room, Some(expected_version))
            .await
    }
}

/// Production message store over the document store API.
#[derive(Clone)]
pub struct HttpMessageStore {
    client: DocumentClient,
}

impl HttpMessageStore {
    pub fn new(client: DocumentClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MessageStore for HttpMessageStore {
    async fn insert(&self, org_id: &str, message: &Message) -> RoomResult<()> {
        self.client.write(org_id, MESSAGE_COLLECTION, message).await
    }

    async fn list_by_room(&self, org_id: &str, room_id: &str) -> RoomResult<Vec<Message>> {
        self.client
            .query(org_id, MESSAGE_COLLECTION, &[("room_id", room_id)])
            .await
    }

    async fn get(&self, org_id: &str, message_id: &str) -> RoomResult<Option<Message>> {
        self.client.read(org_id, MESSAGE_COLLECTION, message_id).await
    }

    async fn update(&self, org_id: &str, message: &Message) -> RoomResult<Message> {
        // Messages carry no version token; the replace is unconditional.
        match self
            .client
            .replace(org_id, MESSAGE_COLLECTION, &message.id, message, None)
            .await
        {
            Err(RoomError::RoomNotFound) => Err(RoomError::MessageNotFound),
            other => other,
        }
    }
}
