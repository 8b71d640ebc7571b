//! Dataset loading
//!
//! Loading is the only asynchronous step of the engine. A load is split in
//! three parts so the caller never holds the layer across an `.await`:
//!
//! 1. [`DatasetLoader::begin`] issues a [`LoadTicket`] with a fresh id,
//! 2. [`DatasetLoader::fetch`] awaits the [`DocumentSource`] and pairs the
//!    result with its ticket,
//! 3. the layer accepts the [`LoadOutcome`] only if its ticket is still the
//!    latest one issued.

use crate::core::config::HttpConfig;
use crate::data::geojson::MapDocument;
use crate::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use once_cell::sync::Lazy;
use reqwest::Client;

/// Identity of a loaded dataset. Increases with every load request.
pub type DatasetId = u64;

/// Shared HTTP client. Building the client once avoids the cost of TLS and
/// connection pool setup for every dataset request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(HttpConfig::default().user_agent)
        .build()
        .expect("failed to build reqwest client")
});

/// Anything that can produce a map document
pub trait DocumentSource: Send + Sync {
    /// Short description used in logs and tickets (URL or label)
    fn describe(&self) -> String;

    /// Fetch and parse the document
    fn fetch(&self) -> BoxFuture<'_, Result<MapDocument>>;
}

/// Fetches a document with an HTTP GET
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    /// Uses the shared client
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: HTTP_CLIENT.clone(),
        }
    }

    /// Builds a dedicated client from configuration
    pub fn with_config(url: impl Into<String>, config: &HttpConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent.clone()).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<MapDocument>> {
        async move {
            log::debug!("GET {}", self.url);
            let response = self.client.get(&self.url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Http(status.as_u16()));
            }
            let document = response.json::<MapDocument>().await?;
            Ok(document)
        }
        .boxed()
    }
}

/// A document supplied in-process
#[derive(Debug, Clone)]
pub struct InlineSource {
    label: String,
    document: MapDocument,
}

impl InlineSource {
    pub fn new(label: impl Into<String>, document: MapDocument) -> Self {
        Self {
            label: label.into(),
            document,
        }
    }

    pub fn from_json(label: impl Into<String>, json: &str) -> Result<Self> {
        Ok(Self::new(label, MapDocument::from_json(json)?))
    }

    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    pub fn into_document(self) -> MapDocument {
        self.document
    }
}

impl DocumentSource for InlineSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<MapDocument>> {
        futures::future::ready(Ok(self.document.clone())).boxed()
    }
}

/// Receipt for one load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: DatasetId,
    pub source: String,
}

/// A finished fetch, still tied to the request that issued it
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: Result<MapDocument>,
}

/// Issues load tickets and remembers which one is current
#[derive(Debug, Default)]
pub struct DatasetLoader {
    issued: DatasetId,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self, source: &dyn DocumentSource) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket {
            id: self.issued,
            source: source.describe(),
        };
        log::info!("load #{} begun from {}", ticket.id, ticket.source);
        ticket
    }

    /// Id of the most recent request, if any
    pub fn latest(&self) -> Option<DatasetId> {
        (self.issued > 0).then_some(self.issued)
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.id == self.issued
    }

    /// Awaits the source. Suspends only inside the source's fetch.
    pub async fn fetch(ticket: LoadTicket, source: &dyn DocumentSource) -> LoadOutcome {
        let result = source.fetch().await;
        if let Err(e) = &result {
            log::warn!("load #{} from {} failed: {}", ticket.id, ticket.source, e);
        }
        LoadOutcome { ticket, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::FeatureCollection;

    #[test]
    fn test_tickets_increase_and_supersede() {
        let source = InlineSource::new("inline", MapDocument::default());
        let mut loader = DatasetLoader::new();
        assert_eq!(loader.latest(), None);

        let first = loader.begin(&source);
        assert!(loader.is_current(&first));

        let second = loader.begin(&source);
        assert!(second.id > first.id);
        assert!(!loader.is_current(&first));
        assert!(loader.is_current(&second));
        assert_eq!(loader.latest(), Some(second.id));
        assert_eq!(second.source, "inline");
    }

    #[tokio::test]
    async fn test_inline_fetch_returns_document() {
        let document = MapDocument::from_collection(FeatureCollection::default());
        let source = InlineSource::new("inline", document.clone());
        let mut loader = DatasetLoader::new();
        let ticket = loader.begin(&source);

        let outcome = DatasetLoader::fetch(ticket.clone(), &source).await;
        assert_eq!(outcome.ticket, ticket);
        assert_eq!(outcome.result.unwrap(), document);
    }

    #[test]
    fn test_inline_source_from_json() {
        let source = InlineSource::from_json("doc", r#"{"layers": []}"#).unwrap();
        assert!(source.document().layers.is_empty());
        assert!(InlineSource::from_json("doc", "not json").is_err());
    }

    #[test]
    fn test_http_source_keeps_url() {
        let source = HttpSource::new("http://localhost/data.json");
        assert_eq!(source.url(), "http://localhost/data.json");
        assert_eq!(source.describe(), "http://localhost/data.json");
    }
}
