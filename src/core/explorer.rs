use crate::core::fetcher::PaginatedFetcher;
use crate::core::filter::{FilterEngine, FilterSet};
use crate::core::projection::{Projection, Scales, ScatterProjector};
use crate::core::scene::Scene;
use crate::core::store::{FetchOutcome, FilmCatalog, Snapshot, StarshipStore};
use crate::core::tooltip::TooltipPlacer;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{Film, ProjectedPoint, Starship};
use crate::utils::error::Result;
use serde::Serialize;
use tokio::sync::watch;

pub const SCENE_FILE: &str = "scene.svg";
pub const POINTS_FILE: &str = "points.json";

/// Maps a user selection (episode id, film resource URL, or title) to the
/// film's resource URL.
pub fn resolve_film(selection: &str, films: &[Film], films_endpoint: &str) -> Option<String> {
    let selection = selection.trim();
    if let Ok(episode) = selection.parse::<i64>() {
        return films
            .iter()
            .find(|film| film.id == episode)
            .map(|film| film.resource_url(films_endpoint));
    }
    if selection.starts_with("http://") || selection.starts_with("https://") {
        return Some(selection.to_string());
    }
    films
        .iter()
        .find(|film| film.title.eq_ignore_ascii_case(selection))
        .map(|film| film.resource_url(films_endpoint))
}

#[derive(Debug, Serialize)]
struct PointsDocument<'a> {
    active_films: Vec<String>,
    scales: &'a Scales,
    points: &'a [ProjectedPoint],
}

/// Wakes whenever the starship snapshot or the active filters change.
pub struct ChangeWatcher {
    starships: watch::Receiver<Snapshot<Starship>>,
    filters: watch::Receiver<FilterSet>,
}

impl ChangeWatcher {
    /// Returns false once the engine that owns the sources is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            res = self.starships.changed() => res.is_ok(),
            res = self.filters.changed() => res.is_ok(),
        }
    }
}

pub struct ExplorerEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    films: FilmCatalog,
    starships: StarshipStore,
    filters: FilterEngine,
    projector: ScatterProjector,
    placer: TooltipPlacer,
}

impl<S: Storage, C: ConfigProvider> ExplorerEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let fetcher = PaginatedFetcher::from_config(&config);
        Self {
            films: FilmCatalog::films(config.films_endpoint(), fetcher.clone()),
            starships: StarshipStore::starships(config.starships_endpoint(), fetcher),
            filters: FilterEngine::new(),
            projector: ScatterProjector::new(config.margins()),
            placer: TooltipPlacer::default(),
            storage,
            config,
        }
    }

    pub fn films(&self) -> &FilmCatalog {
        &self.films
    }

    pub fn starships(&self) -> &StarshipStore {
        &self.starships
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn watch(&self) -> ChangeWatcher {
        ChangeWatcher {
            starships: self.starships.subscribe(),
            filters: self.filters.subscribe(),
        }
    }

    /// Fetches both catalogs concurrently.
    pub async fn refresh(&self) -> (FetchOutcome, FetchOutcome) {
        tokio::join!(self.films.fetch(), self.starships.fetch())
    }

    /// Activates the configured film selections. Returns the selections
    /// that matched no known film.
    pub fn apply_selection(&self) -> Vec<String> {
        let films = self.films.data();
        let mut unresolved = Vec::new();

        for selection in self.config.selected_films() {
            match resolve_film(selection, &films, self.config.films_endpoint()) {
                Some(url) => {
                    tracing::debug!("Activating film filter {}", url);
                    self.filters.add_filter(&url);
                }
                None => {
                    tracing::warn!("No film matches selection '{}'", selection);
                    unresolved.push(selection.clone());
                }
            }
        }

        unresolved
    }

    pub fn filtered_starships(&self) -> Vec<Starship> {
        self.filters.filtered_data(&self.starships.data())
    }

    pub fn projection(&self) -> Projection {
        self.projector
            .project(&self.filtered_starships(), self.config.viewport())
    }

    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.projection(),
            self.config.viewport(),
            self.projector.margins(),
            &self.placer,
        )
    }

    /// Fetches, filters, projects and writes the configured outputs.
    /// Returns the output directory.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Fetching films and starships...");
        let (films, starships) = self.refresh().await;
        for (name, outcome) in [("films", &films), ("starships", &starships)] {
            if let Some(error) = outcome.error() {
                tracing::warn!("Continuing without fresh {}: {}", name, error);
            }
        }

        let unresolved = self.apply_selection();
        if !unresolved.is_empty() {
            tracing::warn!("Ignoring unknown film selections: {}", unresolved.join(", "));
        }

        let projection = self.projection();
        tracing::info!(
            "Projected {} of {} starships ({} active film filters)",
            projection.points.len(),
            self.starships.data().len(),
            self.filters.snapshot().len()
        );

        let formats = self.config.output_formats();
        if formats.iter().any(|f| f == "svg") {
            let scene = Scene::build(
                &projection,
                self.config.viewport(),
                self.projector.margins(),
                &self.placer,
            );
            self.storage
                .write_file(SCENE_FILE, scene.to_svg().as_bytes())
                .await?;
            tracing::debug!("Wrote {}", SCENE_FILE);
        }

        if formats.iter().any(|f| f == "json") {
            let mut active_films: Vec<String> = self.filters.snapshot().into_iter().collect();
            active_films.sort();
            let document = PointsDocument {
                active_films,
                scales: &projection.scales,
                points: &projection.points,
            };
            let json = serde_json::to_vec_pretty(&document)?;
            self.storage.write_file(POINTS_FILE, &json).await?;
            tracing::debug!("Wrote {} ({} bytes)", POINTS_FILE, json.len());
        }

        Ok(self.config.output_path().to_string())
    }
}
