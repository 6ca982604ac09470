//! Common-name lookup on FishBase

use crate::commands::{Command, Invocation};
use crate::context::CommandContext;
use crate::error::{BotError, FetchError};
use crate::features::html::{absolutize, collapse_text, first, selector};
use crate::ui::{DisplayUnit, PaginationSession, Paginator};
use crate::utils::offload;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};

pub const NO_MATCHES: &str = "No exact matches were found :(";

const COMMON_NAME_ENDPOINT: &str = "/ComNames/CommonNameSearchList.php";

pub struct FishBaseClient {
    http: Client,
    base_url: String,
}

impl FishBaseClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Rows of the common-name result table, header excluded
    pub async fn search_common_name(&self, query: &str) -> Result<Vec<Vec<String>>, FetchError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, COMMON_NAME_ENDPOINT))
            .form(&[("CommonName", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let html = response.text().await?;
        let base_url = self.base_url.clone();
        offload(move || parse_results(&html, &base_url)).await?
    }
}

/// Extracts the first table of a result page.
///
/// Cells holding a link become `[name](url)` markdown, everything else is
/// reduced to its text. The first row is the table header and is dropped.
pub fn parse_results(html: &str, base_url: &str) -> Result<Vec<Vec<String>>, FetchError> {
    let doc = Html::parse_document(html);
    let Some(table) = first(doc.root_element(), "table")? else {
        ::log::debug!("FishBase page has no result table");
        return Ok(Vec::new());
    };

    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let mut rows = Vec::new();
    for row in table.select(&row_selector).skip(1) {
        let cells = row
            .select(&cell_selector)
            .map(|cell| parse_cell(cell, base_url))
            .collect::<Result<Vec<_>, _>>()?;
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    ::log::debug!("FishBase table yielded {} rows", rows.len());
    Ok(rows)
}

fn parse_cell(cell: ElementRef<'_>, base_url: &str) -> Result<String, FetchError> {
    let link = first(cell, "a[href]")?;

    Ok(match link.and_then(|a| a.value().attr("href").map(|href| (a, href))) {
        Some((anchor, href)) => format!(
            "[{}]({})",
            collapse_text(anchor),
            absolutize(base_url, href.trim())
        ),
        None => collapse_text(cell),
    })
}

/// `fishbase <query>`: browse FishBase species matching a common name
pub struct FishBase;

#[async_trait]
impl Command for FishBase {
    fn name(&self) -> &'static str {
        "fishbase"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["fb"]
    }

    fn summary(&self) -> &'static str {
        "Look up species on FishBase by common name"
    }

    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<(), BotError> {
        let query = invocation.arg(0, "query")?;
        let config = &ctx.app.config;
        let client = FishBaseClient::new(ctx.app.http.clone(), config.fishbase_url.clone());

        let rows = client.search_common_name(query).await?;
        if rows.is_empty() {
            ctx.send_text(NO_MATCHES).await?;
            return Ok(());
        }

        let pages = rows
            .into_iter()
            .map(|cells| DisplayUnit::with_description(cells.join("\n")))
            .collect();
        let session = PaginationSession::new(pages, ctx.author)?;
        ctx.launch(Paginator::new(session), config.paginator_timeout())
            .await?;
        Ok(())
    }
}
