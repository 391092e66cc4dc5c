// Request dispatcher for the property web service
use crate::config::ClientConfig;
use crate::error::{ClientError, ZillowError, SUCCESS_CODE};
use crate::projection::{DeepSearchResult, PropertyRecord, UpdatedPropertyDetails};
use crate::xml_tree::{self, XmlElement};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info, warn};

/// The two endpoints supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    DeepSearch,
    UpdatedPropertyDetails,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DeepSearch => "GetDeepSearchResults.htm",
            Endpoint::UpdatedPropertyDetails => "GetUpdatedPropertyDetails.htm",
        }
    }
}

/// One logical query against an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    DeepSearch {
        address: String,
        citystatezip: String,
        rentzestimate: bool,
    },
    UpdatedPropertyDetails {
        zpid: String,
    },
}

impl Query {
    pub fn deep_search(
        address: impl Into<String>,
        citystatezip: impl Into<String>,
        rentzestimate: bool,
    ) -> Self {
        Query::DeepSearch {
            address: address.into(),
            citystatezip: citystatezip.into(),
            rentzestimate,
        }
    }

    pub fn updated_property_details(zpid: impl Into<String>) -> Self {
        Query::UpdatedPropertyDetails { zpid: zpid.into() }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Query::DeepSearch { .. } => Endpoint::DeepSearch,
            Query::UpdatedPropertyDetails { .. } => Endpoint::UpdatedPropertyDetails,
        }
    }

    /// The value that identifies this query in logs and errors.
    pub fn subject(&self) -> &str {
        match self {
            Query::DeepSearch { address, .. } => address,
            Query::UpdatedPropertyDetails { zpid } => zpid,
        }
    }

    /// Query string parameters, in request order. `zws-id` is left out
    /// when no API key is given.
    pub fn params(&self, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = match self {
            Query::DeepSearch {
                address,
                citystatezip,
                rentzestimate,
            } => vec![
                ("address", address.clone()),
                ("citystatezip", citystatezip.clone()),
                ("rentzestimate", rentzestimate.to_string()),
            ],
            Query::UpdatedPropertyDetails { zpid } => vec![("zpid", zpid.clone())],
        };
        if let Some(key) = api_key {
            params.push(("zws-id", key.to_string()));
        }
        params
    }
}

// Property API trait
#[async_trait]
pub trait PropertyApi: Send + Sync {
    // GetDeepSearchResults: look up a property by address and city/state/zip
    async fn get_deep_search_results(
        &self,
        address: &str,
        citystatezip: &str,
        rentzestimate: bool,
    ) -> Result<XmlElement, ZillowError>;

    // GetUpdatedPropertyDetails: owner-edited facts for a property id
    async fn get_updated_property_details(&self, zpid: &str) -> Result<XmlElement, ZillowError>;
}

/// Async client. Each call issues exactly one GET and is never retried.
#[derive(Debug, Clone)]
pub struct ZillowClient {
    config: ClientConfig,
    base_url: Url,
    http: reqwest::Client,
}

impl ZillowClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| ClientError::ConfigError(format!("invalid base URL {:?}: {}", base, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full request URL for `query`, API key included.
    pub fn request_url(&self, query: &Query) -> Result<Url, ZillowError> {
        let mut url = self
            .base_url
            .join(query.endpoint().path())
            .map_err(|e| ZillowError::request_failed(query.subject(), e))?;

        url.query_pairs_mut()
            .extend_pairs(query.params(self.config.api_key.as_deref()));
        Ok(url)
    }

    /// Send `query` and classify the outcome. On success the parsed document
    /// root is returned.
    pub async fn dispatch(&self, query: &Query) -> Result<XmlElement, ZillowError> {
        let url = self.request_url(query)?;
        let subject = query.subject();
        debug!(endpoint = ?query.endpoint(), subject, "Dispatching request");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ZillowError::request_failed(subject, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| ZillowError::request_failed(subject, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| ZillowError::request_failed(subject, e))?;

        classify_response(subject, url.as_str(), &body)
    }

    pub async fn deep_search(
        &self,
        address: &str,
        citystatezip: &str,
        rentzestimate: bool,
    ) -> Result<DeepSearchResult, ZillowError> {
        let query = Query::deep_search(address, citystatezip, rentzestimate);
        self.fetch(&query).await
    }

    pub async fn updated_property_details(
        &self,
        zpid: &str,
    ) -> Result<UpdatedPropertyDetails, ZillowError> {
        let query = Query::updated_property_details(zpid);
        self.fetch(&query).await
    }

    async fn fetch<R: PropertyRecord>(&self, query: &Query) -> Result<R, ZillowError> {
        let document = self.dispatch(query).await?;
        R::from_response(&document).ok_or_else(|| ZillowError::no_results(query.subject()))
    }
}

#[async_trait]
impl PropertyApi for ZillowClient {
    async fn get_deep_search_results(
        &self,
        address: &str,
        citystatezip: &str,
        rentzestimate: bool,
    ) -> Result<XmlElement, ZillowError> {
        let query = Query::deep_search(address, citystatezip, rentzestimate);
        self.dispatch(&query).await
    }

    async fn get_updated_property_details(&self, zpid: &str) -> Result<XmlElement, ZillowError> {
        let query = Query::updated_property_details(zpid);
        self.dispatch(&query).await
    }
}

/// Reduce a response body to the parsed document or one of the failure
/// signals. `subject` names the query, `url` is kept for diagnostics.
pub fn classify_response(subject: &str, url: &str, body: &str) -> Result<XmlElement, ZillowError> {
    let document = match xml_tree::parse(body) {
        Ok(document) => document,
        Err(e) => {
            warn!(subject, error = %e, "Response is not valid XML");
            return Err(ZillowError::request_failed(
                subject,
                format!("response is not valid XML: {}", e),
            ));
        }
    };

    let code_text = document
        .find_text("message/code")
        .ok_or_else(|| ZillowError::request_failed(subject, "response carries no status code"))?;
    let code: i32 = code_text.parse().map_err(|_| {
        ZillowError::request_failed(subject, format!("status code {:?} is not numeric", code_text))
    })?;

    if code != SUCCESS_CODE {
        debug!(subject, code, "Service reported an error status");
        return Err(ZillowError::api(code, url, body));
    }

    let has_results = document
        .find("response")
        .map_or(false, |response| !response.children().is_empty());
    if !has_results {
        info!(subject, "No results returned");
        return Err(ZillowError::no_results(subject));
    }

    Ok(document)
}

/// Blocking facade over [`ZillowClient`], driven by its own current-thread
/// runtime. Must not be called from within an async context.
#[derive(Debug)]
pub struct BlockingZillowClient {
    inner: ZillowClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingZillowClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        let inner = {
            let _guard = runtime.enter();
            ZillowClient::new(config)?
        };

        Ok(Self { inner, runtime })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn get_deep_search_results(
        &self,
        address: &str,
        citystatezip: &str,
        rentzestimate: bool,
    ) -> Result<XmlElement, ZillowError> {
        self.runtime.block_on(
            self.inner
                .get_deep_search_results(address, citystatezip, rentzestimate),
        )
    }

    pub fn get_updated_property_details(&self, zpid: &str) -> Result<XmlElement, ZillowError> {
        self.runtime
            .block_on(self.inner.get_updated_property_details(zpid))
    }

    pub fn deep_search(
        &self,
        address: &str,
        citystatezip: &str,
        rentzestimate: bool,
    ) -> Result<DeepSearchResult, ZillowError> {
        self.runtime
            .block_on(self.inner.deep_search(address, citystatezip, rentzestimate))
    }

    pub fn updated_property_details(&self, zpid: &str) -> Result<UpdatedPropertyDetails, ZillowError> {
        self.runtime
            .block_on(self.inner.updated_property_details(zpid))
    }
}
