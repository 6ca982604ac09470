//! Product search on LiveAquaria with a drill-down product menu

use crate::chat::Outbound;
use crate::commands::{Command, Invocation};
use crate::config::BotConfig;
use crate::context::CommandContext;
use crate::error::{BotError, FetchError};
use crate::features::html::{absolutize, collapse_text, first, selector};
use crate::ui::{Binding, DetailSource, DisplayUnit, ResultBinder, SelectionEntry};
use crate::utils::{offload, truncate};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DESCRIPTION_LIMIT: usize = 2000;

/// One product card from the search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub url: String,
    pub image: Option<String>,
    pub price: String,
}

impl Product {
    pub fn into_entry(self) -> SelectionEntry {
        let summary = format!("Price : `{}`", self.price);
        let entry = SelectionEntry::new(self.name, self.url)
            .with_description(self.price)
            .with_summary(summary);
        match self.image {
            Some(image) => entry.with_thumbnail(image),
            None => entry,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ImageField {
    One(String),
    Many(Vec<String>),
}

impl ImageField {
    fn into_first(self) -> Option<String> {
        match self {
            ImageField::One(image) => Some(image),
            ImageField::Many(images) => images.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ProductMetadata {
    name: Option<String>,
    description: Option<String>,
    image: Option<ImageField>,
}

/// Full product page data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl ProductDetail {
    pub fn to_display_unit(&self, url: &str) -> DisplayUnit {
        let description = self
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("-");
        let unit = DisplayUnit::default()
            .titled(self.name.clone().unwrap_or_else(|| "-".to_string()))
            .linked(url)
            .described(truncate(description, DESCRIPTION_LIMIT));
        match &self.image {
            Some(image) => unit.with_image(image.clone()),
            None => unit,
        }
    }
}

/// Parses product cards, keeping at most `limit`
pub fn parse_search_results(html: &str, limit: usize) -> Result<Vec<Product>, FetchError> {
    let doc = Html::parse_document(html);
    let product_selector = selector("div.product")?;

    let mut products = Vec::new();
    for card in doc.select(&product_selector).take(limit) {
        let url = first(card, "a[href]")?.and_then(|a| a.value().attr("href"));
        let name = first(card, "div.product_details h3.title")?.map(collapse_text);
        let (Some(url), Some(name)) = (url, name) else {
            ::log::debug!("Skipping product card without link or title");
            continue;
        };

        let image = first(card, "div.product_image img.image")?
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);
        let price = first(card, "div.product_details div.price")?
            .map(collapse_text)
            .unwrap_or_default();

        products.push(Product {
            name,
            url: url.to_string(),
            image,
            price,
        });
    }

    ::log::debug!("LiveAquaria search yielded {} products", products.len());
    Ok(products)
}

/// Reads the JSON-LD metadata of a product page.
///
/// A missing image, or one that only points at the site root, is replaced by
/// the main product picture.
pub fn parse_product_page(html: &str, site_url: &str) -> Result<ProductDetail, FetchError> {
    let doc = Html::parse_document(html);
    let script = first(doc.root_element(), r#"script[type="application/ld+json"]"#)?
        .ok_or_else(|| FetchError::Parse("product page has no JSON-LD metadata".to_string()))?;

    let raw = script.text().collect::<String>();
    let metadata: ProductMetadata =
        serde_json::from_str(raw.trim()).map_err(|e| FetchError::Parse(e.to_string()))?;

    let site_root = site_url.trim_end_matches('/');
    let image = metadata
        .image
        .and_then(ImageField::into_first)
        .filter(|image| !image.is_empty() && image.trim_end_matches('/') != site_root);
    let image = match image {
        Some(image) => Some(image),
        None => first(doc.root_element(), "div.product-image img")?
            .and_then(|img| img.value().attr("src"))
            .map(|src| absolutize(site_url, src)),
    };

    Ok(ProductDetail {
        name: metadata.name,
        description: metadata.description,
        image,
    })
}

pub struct LiveAquariaClient {
    http: Client,
    search_url: String,
    site_url: String,
    limit: usize,
}

impl LiveAquariaClient {
    pub fn new(http: Client, config: &BotConfig) -> Self {
        Self {
            http,
            search_url: config.liveaquaria_search_url.clone(),
            site_url: config.liveaquaria_site_url.clone(),
            limit: config.result_limit,
        }
    }

    /// Search endpoint with `query` appended as a percent-encoded path segment
    pub fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.search_url).map_err(|e| FetchError::Parse(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Parse(format!("{} cannot take a path", self.search_url)))?
            .pop_if_empty()
            .push(query);
        Ok(url)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Product>, FetchError> {
        let html = self.get(self.search_url(query)?.as_str()).await?;
        let limit = self.limit;
        offload(move || parse_search_results(&html, limit)).await?
    }

    pub async fn product(&self, url: &str) -> Result<ProductDetail, FetchError> {
        let html = self.get(url).await?;
        let site_url = self.site_url.clone();
        offload(move || parse_product_page(&html, &site_url)).await?
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl DetailSource for LiveAquariaClient {
    async fn fetch_detail(&self, entry: &SelectionEntry) -> Result<DisplayUnit, FetchError> {
        let detail = self.product(&entry.reference).await?;
        Ok(detail.to_display_unit(&entry.reference))
    }
}

/// `liveaquaria <query...>`: search LiveAquaria products
pub struct LiveAquaria;

#[async_trait]
impl Command for LiveAquaria {
    fn name(&self) -> &'static str {
        "liveaquaria"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["la"]
    }

    fn summary(&self) -> &'static str {
        "Search LiveAquaria products"
    }

    fn cooldown(&self) -> Option<Duration> {
        Some(Duration::from_secs(5))
    }

    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<(), BotError> {
        let query = invocation.remainder("query")?;
        let client = LiveAquariaClient::new(ctx.app.http.clone(), &ctx.app.config);

        let products = client.search(query).await?;
        let entries: Vec<SelectionEntry> = products.into_iter().map(Product::into_entry).collect();

        let binder = ResultBinder::new(ctx.author)
            .with_summary("Results", entries.len().max(1))
            .with_placeholder("Select a product to view")
            .with_no_results(format!("No results were found for the query : {}", query));

        match binder.bind(entries, Arc::new(client))? {
            Binding::NoResults(unit) => {
                ctx.reply(Outbound::embed(unit)).await?;
            }
            Binding::Paginated(paginator) => {
                ctx.launch(paginator, ctx.app.config.paginator_timeout())
                    .await?;
            }
        }
        Ok(())
    }
}
