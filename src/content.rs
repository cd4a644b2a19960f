//! Collection records from the external content API.
//!
//! The content store owns collection metadata; this module only queries it.
//! A slug with no matching record is a distinct outcome (`Ok(None)`) from a
//! transport or query failure (`Err`).

use crate::error::Error;
use serde::Deserialize;
use std::future::Future;

/// GROQ projection for a single collection, images resolved to URLs.
const COLLECTION_QUERY: &str = r#"*[_type == "collection" && slug.current == $slug][0]{
  _id, title, address, description, nftCollectionName,
  "mainImage": mainImage.asset->url,
  "previewImage": previewImage.asset->url,
  "slug": slug.current,
  creator->{ _id, name, address, "slug": slug.current }
}"#;

/// A drop collection record. Immutable once fetched; held read-only for the
/// duration of a single page view.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "nftCollectionName")]
    pub nft_collection_name: String,
    /// Address of the deployed drop contract.
    pub address: String,
    pub slug: String,
    #[serde(rename = "mainImage")]
    pub main_image: String,
    #[serde(rename = "previewImage")]
    pub preview_image: String,
    pub creator: Creator,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub slug: String,
}

/// Capability handle for the content API.
pub trait ContentStore: Send + Sync {
    /// Look up the collection matching a slug.
    fn collection(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Collection>, Error>> + Send;
}

#[derive(Deserialize)]
struct QueryEnvelope {
    result: Option<Collection>,
}

/// Content store backed by an HTTP query endpoint.
pub struct HttpContentStore {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpContentStore {
    pub fn new(base_url: &str, dataset: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/v1/data/query/{dataset}", base_url.trim_end_matches('/')),
        }
    }
}

impl ContentStore for HttpContentStore {
    async fn collection(&self, slug: &str) -> Result<Option<Collection>, Error> {
        // GROQ parameters are JSON values, so the string is quoted.
        let slug_param = format!("\"{slug}\"");
        let envelope: QueryEnvelope = self
            .http
            .get(&self.endpoint)
            .query(&[("query", COLLECTION_QUERY), ("$slug", slug_param.as_str())])
            .send()
            .await
            .map_err(|e| Error::Content(format!("query request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Content(format!("query returned an error status: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Content(format!("malformed query response: {e}")))?;

        Ok(envelope.result)
    }
}
