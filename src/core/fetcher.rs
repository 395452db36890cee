use crate::domain::model::Page;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScatterError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::task::JoinSet;

/// Fixed page size of the catalog API.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of the last page for a collection of `count` items.
pub fn last_page(count: u64, page_size: usize) -> u64 {
    count.div_ceil(page_size.max(1) as u64)
}

/// Pages still to request once page 1 is in hand.
pub fn remaining_pages(count: u64, page_size: usize) -> u64 {
    last_page(count, page_size).saturating_sub(1)
}

/// Retrieves every page of a catalog resource.
///
/// Page 1 is requested on its own to learn `count`; pages `2..=last` are then
/// requested concurrently and appended in page order. Any failed page aborts
/// the whole aggregation.
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    client: Client,
    page_size: usize,
    timeout: Option<Duration>,
}

impl PaginatedFetcher {
    pub fn new(page_size: usize) -> Self {
        Self::with_client(Client::new(), page_size)
    }

    pub fn with_client(client: Client, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.page_size()).with_timeout(config.request_timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn fetch_all<T>(&self, base_url: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let first: Page<T> = fetch_page(&self.client, base_url, None, self.timeout).await?;
        let remaining = remaining_pages(first.count, self.page_size);
        tracing::debug!(
            "{} reports {} items, {} more page(s) to fetch",
            base_url,
            first.count,
            remaining
        );

        let mut items = first.results;
        if remaining == 0 {
            return Ok(items);
        }

        let mut tasks = JoinSet::new();
        for page in 2..=remaining + 1 {
            let client = self.client.clone();
            let url = base_url.to_string();
            let timeout = self.timeout;
            tasks.spawn(async move {
                let data: Page<T> = fetch_page(&client, &url, Some(page), timeout).await?;
                Ok::<_, ScatterError>((page, data.results))
            });
        }

        // An early return drops the set, which aborts the pages still in flight.
        let mut pages = Vec::with_capacity(remaining as usize);
        while let Some(joined) = tasks.join_next().await {
            let (page, results) = joined.map_err(|e| ScatterError::Task {
                message: e.to_string(),
            })??;
            pages.push((page, results));
        }

        pages.sort_by_key(|(page, _)| *page);
        for (_, results) in pages {
            items.extend(results);
        }

        tracing::debug!("Aggregated {} items from {}", items.len(), base_url);
        Ok(items)
    }
}

impl Default for PaginatedFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

async fn fetch_page<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    page: Option<u64>,
    timeout: Option<Duration>,
) -> Result<Page<T>> {
    let mut request = client.get(base_url);
    if let Some(page) = page {
        request = request.query(&[("page", page)]);
    }
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    tracing::debug!("Requesting {} page {}", base_url, page.unwrap_or(1));
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        return Err(ScatterError::HttpStatus {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| ScatterError::Parse { url, source })
}
