use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One page of a paginated catalog resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    #[serde(rename = "episode_id")]
    pub id: i64,
    pub title: String,
    pub release_date: String,
    /// Upstream resource URL; starships reference films by this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Film {
    /// Key used in the filter set. Falls back to `{films_endpoint}/{id}/`
    /// for records that carry no resource URL.
    pub fn resource_url(&self, films_endpoint: &str) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("{}/{}/", films_endpoint.trim_end_matches('/'), self.id),
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }
}

/// Starship as served by the catalog. Numeric fields stay raw strings until
/// they pass through the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starship {
    pub name: String,
    #[serde(rename = "crew")]
    pub crew_raw: String,
    #[serde(rename = "passengers")]
    pub passengers_raw: String,
    #[serde(rename = "length")]
    pub length_raw: String,
    #[serde(rename = "url")]
    pub resource_url: String,
    #[serde(rename = "films", default)]
    pub film_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub starship: Starship,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 0.0,
            bottom: 40.0,
            left: 40.0,
            right: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Bounding box of the viewport when it sits at the page origin.
    pub fn bounds(&self) -> ViewportBounds {
        ViewportBounds {
            top: 0.0,
            bottom: self.height,
            left: 0.0,
            right: self.width,
        }
    }
}

/// Client-space bounding rectangle of the host element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}
