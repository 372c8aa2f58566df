//! Outbound shopping-site search links
//!
//! Each store is a base URL plus the query parameter carrying the search
//! phrase. The phrase is form-encoded by `Url::parse_with_params`.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use snapcart_common::{Error, Result};
use tracing::warn;

/// Store search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTemplate {
    pub name: String,
    pub base_url: String,
    pub query_param: String,
}

impl StoreTemplate {
    pub fn new(name: &str, base_url: &str, query_param: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            query_param: query_param.to_string(),
        }
    }

    /// Reject templates that can never produce a link
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.query_param.trim().is_empty() {
            return Err(Error::Config(format!(
                "store '{}' needs a name and a query_param",
                self.name
            )));
        }
        Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("store '{}' has invalid base_url: {}", self.name, e))
        })?;
        Ok(())
    }

    /// Search URL for `search_term`
    pub fn link_for(&self, search_term: &str) -> Result<Url> {
        Url::parse_with_params(&self.base_url, &[(self.query_param.as_str(), search_term)])
            .map_err(|e| Error::InvalidInput(format!("{}: {}", self.name, e)))
    }
}

/// One generated link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreLink {
    pub store: String,
    pub url: String,
}

/// Built-in stores used when the config has no `[[stores]]`
pub fn default_stores() -> Vec<StoreTemplate> {
    vec![
        StoreTemplate::new("Amazon", "https://www.amazon.com/s", "k"),
        StoreTemplate::new("eBay", "https://www.ebay.com/sch/i.html", "_nkw"),
        StoreTemplate::new("Walmart", "https://www.walmart.com/search", "q"),
        StoreTemplate::new("Target", "https://www.target.com/s", "searchTerm"),
    ]
}

/// Link builder over the configured stores
#[derive(Debug, Clone)]
pub struct StoreLinks {
    stores: Vec<StoreTemplate>,
}

impl StoreLinks {
    pub fn new(stores: Vec<StoreTemplate>) -> Self {
        Self { stores }
    }

    /// Links for every store; a blank term yields no links
    pub fn links_for(&self, search_term: &str) -> Vec<StoreLink> {
        let term = search_term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        self.stores
            .iter()
            .filter_map(|store| match store.link_for(term) {
                Ok(url) => Some(StoreLink {
                    store: store.name.clone(),
                    url: url.to_string(),
                }),
                Err(e) => {
                    warn!(store = %store.name, error = %e, "Skipping store link");
                    None
                }
            })
            .collect()
    }
}

impl Default for StoreLinks {
    fn default() -> Self {
        Self::new(default_stores())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_search_phrase_into_query() {
        let links = StoreLinks::new(vec![StoreTemplate::new(
            "Amazon",
            "https://www.amazon.com/s",
            "k",
        )]);
        let out = links.links_for("Coffee Mug & Saucer");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://www.amazon.com/s?k=Coffee+Mug+%26+Saucer");
    }

    #[test]
    fn keeps_existing_query_pairs() {
        let store = StoreTemplate::new("Shop", "https://shop.example/search?lang=en", "q");
        let url = store.link_for("Red Lamp").unwrap();
        assert_eq!(url.as_str(), "https://shop.example/search?lang=en&q=Red+Lamp");
    }

    #[test]
    fn blank_term_has_no_links() {
        assert!(StoreLinks::default().links_for("   ").is_empty());
    }

    #[test]
    fn invalid_template_fails_validation_and_is_skipped() {
        let bad = StoreTemplate::new("Broken", "not a url", "q");
        assert!(bad.validate().is_err());

        let links = StoreLinks::new(vec![bad, StoreTemplate::new("Ok", "https://ok.example/", "q")]);
        let out = links.links_for("Mug");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].store, "Ok");
    }

    #[test]
    fn default_stores_are_valid() {
        for store in default_stores() {
            store.validate().unwrap();
        }
    }
}
