//! Firestore REST document store.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::dto::{
    Aggregation, AggregationItem, CollectionSelector, ErrorEnvelope, Order, QueryCursor,
    RunAggregationQueryRequest, RunQueryItem, RunQueryRequest, StructuredAggregationQuery,
    StructuredQuery, Value, WireDocument, WriteDocument, to_wire_fields,
};
use super::{USER_AGENT, http_client};
use crate::domain::entities::{Document, DocumentId, DocumentSnapshot, Fields, PageCursor};
use crate::domain::errors::StoreError;
use crate::domain::ports::{DocumentStorePort, IdTokenSource, PageQuery};

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
const DOCUMENT_ID_FIELD: &str = "__name__";
const COUNT_ALIAS: &str = "total";

/// Where the documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Firestore database id.
    pub database: String,
    /// Web API key sent with every request, if any.
    pub api_key: Option<String>,
    /// REST endpoint root.
    pub base_url: String,
}

impl FirestoreConfig {
    /// Settings for the default database of `project_id`.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: "(default)".to_string(),
            api_key: None,
            base_url: FIRESTORE_BASE.to_string(),
        }
    }

    /// Uses another database of the project.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sends `api_key` as the `key` query parameter.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Resource name of the documents root.
    #[must_use]
    pub fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }
}

/// Document store backed by the Firestore REST API.
pub struct FirestoreClient {
    client: Client,
    config: FirestoreConfig,
    tokens: Option<Arc<dyn IdTokenSource>>,
}

impl FirestoreClient {
    /// Creates a client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let client = http_client()
            .map_err(|e| StoreError::unexpected(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            tokens: None,
        })
    }

    /// Authorizes requests with the signed-in user's id token.
    #[must_use]
    pub fn with_token_source(mut self, tokens: Arc<dyn IdTokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    fn documents_url(&self) -> String {
        format!("{}/{}", self.config.base_url, self.config.documents_path())
    }

    fn document_url(&self, collection: &str, id: &DocumentId) -> String {
        format!("{}/{collection}/{id}", self.documents_url())
    }

    fn document_name(&self, collection: &str, id: &DocumentId) -> String {
        format!("{}/{collection}/{id}", self.config.documents_path())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::USER_AGENT, USER_AGENT);
        let request = match &self.config.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        };
        match self.tokens.as_ref().and_then(|t| t.id_token()) {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    /// Sends `request`; `target` names the collection and document for
    /// not-found errors.
    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: (&str, &str),
    ) -> Result<R, StoreError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach Firestore");
            if e.is_timeout() {
                StoreError::network("request timed out")
            } else if e.is_connect() {
                StoreError::network("failed to connect to Firestore")
            } else {
                StoreError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response, target).await);
        }

        response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse Firestore response");
            StoreError::invalid_response(e.to_string())
        })
    }

    async fn handle_error_response(
        status: StatusCode,
        response: reqwest::Response,
        (collection, id): (&str, &str),
    ) -> StoreError {
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => {
                debug!(
                    code = envelope.error.code,
                    status = envelope.error.status.as_deref().unwrap_or_default(),
                    message = %envelope.error.message,
                    "Firestore error"
                );
                envelope.error.message
            }
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED => StoreError::Unauthenticated,
            StatusCode::FORBIDDEN => StoreError::PermissionDenied { message },
            StatusCode::NOT_FOUND => StoreError::not_found(collection, id),
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => StoreError::network(message),
            _ => StoreError::unexpected(format!("{status}: {message}")),
        }
    }

    fn structured_query(&self, query: &PageQuery) -> StructuredQuery {
        let start_at = query.start_after.as_ref().map(|cursor| QueryCursor {
            values: vec![
                cursor
                    .sort_value()
                    .map_or(Value::NullValue(()), Value::from),
                Value::ReferenceValue(self.document_name(&query.collection, cursor.document_id())),
            ],
            before: false,
        });

        StructuredQuery {
            from: vec![CollectionSelector {
                collection_id: query.collection.clone(),
            }],
            order_by: vec![
                Order::ascending(query.order_by.clone()),
                Order::ascending(DOCUMENT_ID_FIELD),
            ],
            start_at,
            limit: Some(query.limit),
        }
    }
}

#[async_trait]
impl DocumentStorePort for FirestoreClient {
    #[instrument(skip(self, query), fields(collection = %query.collection, limit = query.limit))]
    async fn list_page(&self, query: &PageQuery) -> Result<Vec<DocumentSnapshot>, StoreError> {
        let body = RunQueryRequest {
            structured_query: self.structured_query(query),
        };
        let url = format!("{}:runQuery", self.documents_url());

        let items: Vec<RunQueryItem> = self
            .send(self.client.post(&url).json(&body), (&query.collection, ""))
            .await?;

        let snapshots: Vec<DocumentSnapshot> = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|wire| {
                let document = wire.into_document();
                let cursor = PageCursor::new(
                    document.field(&query.order_by).cloned(),
                    document.id.clone(),
                );
                DocumentSnapshot { document, cursor }
            })
            .collect();

        debug!(returned = snapshots.len(), "Query page received");
        Ok(snapshots)
    }

    async fn count_all(&self, collection: &str) -> Result<u64, StoreError> {
        let body = RunAggregationQueryRequest {
            structured_aggregation_query: StructuredAggregationQuery {
                structured_query: StructuredQuery {
                    from: vec![CollectionSelector {
                        collection_id: collection.to_string(),
                    }],
                    ..StructuredQuery::default()
                },
                aggregations: vec![Aggregation {
                    alias: COUNT_ALIAS.to_string(),
                    count: serde_json::Map::new(),
                }],
            },
        };
        let url = format!("{}:runAggregationQuery", self.documents_url());

        let items: Vec<AggregationItem> = self
            .send(self.client.post(&url).json(&body), (collection, ""))
            .await?;

        let count = items
            .into_iter()
            .find_map(|item| item.result?.aggregate_fields.remove(COUNT_ALIAS))
            .ok_or_else(|| StoreError::invalid_response("count aggregation missing"))?;

        match count {
            Value::IntegerValue(raw) => raw
                .parse()
                .map_err(|_| StoreError::invalid_response(format!("bad count: {raw}"))),
            other => Err(StoreError::invalid_response(format!(
                "unexpected count value: {other:?}"
            ))),
        }
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Document, StoreError> {
        let url = self.document_url(collection, id);
        let wire: WireDocument = self
            .send(self.client.get(&url), (collection, id.as_str()))
            .await?;
        Ok(wire.into_document())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let url = format!("{}/{collection}", self.documents_url());
        let body = WriteDocument {
            fields: to_wire_fields(&fields),
        };

        let created: WireDocument = self
            .send(self.client.post(&url).json(&body), (collection, ""))
            .await?;
        let id = DocumentId::new(created.id());
        debug!(collection, id = %id, "Document created");
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        let _: serde_json::Value = self
            .send(self.client.delete(&url), (collection, id.as_str()))
            .await?;
        debug!(collection, id = %id, "Document deleted");
        Ok(())
    }
}
