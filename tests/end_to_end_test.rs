use anyhow::Result;
use httpmock::prelude::*;
use starship_scatter::core::scene::{Scene, HOVER_RADIUS};
use starship_scatter::domain::model::ViewportBounds;
use starship_scatter::{ExplorerEngine, LocalStorage, TomlConfig, TooltipPlacer};
use tempfile::TempDir;

fn starship(server: &MockServer, id: u32, name: &str, length: &str, crew: &str, passengers: &str, films: &[u32]) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "model": "test model",
        "crew": crew,
        "passengers": passengers,
        "length": length,
        "url": server.url(format!("/api/starships/{}/", id)),
        "films": films.iter().map(|f| server.url(format!("/api/films/{}/", f))).collect::<Vec<_>>()
    })
}

fn config_for(server: &MockServer, output_path: &str, films: &[&str]) -> Result<TomlConfig> {
    let films = films
        .iter()
        .map(|f| format!("\"{}\"", f))
        .collect::<Vec<_>>()
        .join(", ");
    let normalized_path = output_path.replace('\\', "/");

    let content = format!(
        r#"
[source]
films_endpoint = "{}"
starships_endpoint = "{}"
page_size = 10

[viewport]
width = 840
height = 600

[filters]
films = [{}]

[output]
path = "{}"
formats = ["svg", "json"]
"#,
        server.url("/api/films"),
        server.url("/api/starships/"),
        films,
        normalized_path
    );

    Ok(TomlConfig::from_toml_str(&content)?)
}

/// 12 starships spread over two pages; the film catalog fits on one.
fn mock_catalog(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let films = serde_json::json!({
        "count": 3,
        "results": [
            {"episode_id": 4, "title": "A New Hope", "release_date": "1977-05-25", "url": server.url("/api/films/1/")},
            {"episode_id": 5, "title": "The Empire Strikes Back", "release_date": "1980-05-17", "url": server.url("/api/films/2/")},
            {"episode_id": 6, "title": "Return of the Jedi", "release_date": "1983-05-25", "url": server.url("/api/films/3/")}
        ]
    });

    let mut first_page = vec![
        starship(server, 2, "CR90 corvette", "150", "30-165", "600", &[1, 3]),
        starship(server, 3, "Star Destroyer", "1,600", "47,060", "n/a", &[1, 2, 3]),
        starship(server, 9, "Death Star", "120000", "342,953", "843,342", &[1]),
        starship(server, 10, "Millennium Falcon", "34.37", "4", "6", &[1, 2, 3]),
    ];
    for i in 0..6 {
        first_page.push(starship(server, 100 + i, &format!("Shuttle {}", i), "20", "2", "10", &[3]));
    }
    let second_page = vec![
        starship(server, 15, "Executor", "19000", "279,144", "38000", &[2, 3]),
        starship(server, 17, "Rebel transport", "90", "6", "90", &[2, 3]),
    ];

    let starships_page2 = server.mock(|when, then| {
        when.method(GET).path("/api/starships/").query_param("page", "2");
        then.status(200)
            .json_body(serde_json::json!({"count": 12, "results": second_page}));
    });
    let starships_page1 = server.mock(|when, then| {
        when.method(GET).path("/api/starships/");
        then.status(200)
            .json_body(serde_json::json!({"count": 12, "results": first_page}));
    });
    let films_mock = server.mock(|when, then| {
        when.method(GET).path("/api/films");
        then.status(200).json_body(films);
    });

    (films_mock, starships_page1, starships_page2)
}

#[tokio::test]
async fn test_end_to_end_with_film_filter() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let (films_mock, page1, page2) = mock_catalog(&server);

    let config = config_for(&server, &output_path, &["5"])?;
    let engine = ExplorerEngine::new(LocalStorage::new(output_path.clone()), config);
    let result = engine.run().await?;

    films_mock.assert();
    page1.assert();
    page2.assert();
    assert_eq!(result, output_path);
    assert_eq!(engine.starships().data().len(), 12);

    // episode 5 is /api/films/2/
    let names: Vec<String> = engine
        .filtered_starships()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(
        names,
        vec!["Star Destroyer", "Millennium Falcon", "Executor", "Rebel transport"]
    );

    let svg = std::fs::read_to_string(temp_dir.path().join("scene.svg"))?;
    assert_eq!(svg.matches("<circle").count(), 4);
    assert!(svg.contains(r#"data-starship-name="Executor""#));

    let points: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("points.json"))?)?;
    assert_eq!(points["points"].as_array().unwrap().len(), 4);
    // Executor carries the most people: 279144 + 38000
    assert_eq!(points["scales"]["max_people"], 317_144);
    assert_eq!(points["scales"]["max_length"], 19_000);

    Ok(())
}

#[tokio::test]
async fn test_unfiltered_run_uses_per_ship_maximum() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let _mocks = mock_catalog(&server);

    let config = config_for(&server, &output_path, &[])?;
    let engine = ExplorerEngine::new(LocalStorage::new(output_path), config);
    engine.run().await?;

    let projection = engine.projection();
    assert_eq!(projection.points.len(), 12);
    // Death Star: 342953 + 843342, not the crew max plus the passenger max
    assert_eq!(projection.scales.max_people, 1_186_295);
    assert_eq!(projection.scales.x.domain(), (0.0, 132_000.0));
    assert_eq!(projection.scales.y.range(), (560.0, 20.0));

    Ok(())
}

#[tokio::test]
async fn test_hover_annotation_on_rendered_scene() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let _mocks = mock_catalog(&server);

    let config = config_for(&server, &output_path, &["A New Hope"])?;
    let engine = ExplorerEngine::new(LocalStorage::new(output_path), config);
    engine.run().await?;

    let mut scene: Scene = engine.scene();
    let death_star = scene
        .circles
        .iter()
        .position(|c| c.name == "Death Star")
        .expect("Death Star is in A New Hope");
    let (cx, cy) = (scene.circles[death_star].cx, scene.circles[death_star].cy);

    let index = scene.hit_test(cx, cy).unwrap();
    assert_eq!(index, death_star);

    // host element sits at (100, 20) on the page
    let bounds = ViewportBounds {
        top: 20.0,
        bottom: 620.0,
        left: 100.0,
        right: 940.0,
    };
    let placer = TooltipPlacer::default();
    let annotation = scene.hover(index, cx + 100.0, cy + 20.0, &bounds, &placer).unwrap();

    assert_eq!(annotation.title, "Death Star");
    assert_eq!(scene.circles[index].r, HOVER_RADIUS);
    assert_eq!(annotation.placement, placer.place(cx + 100.0, cy + 20.0, &bounds));
    // the largest ship sits at the right edge, so the popup flips left
    assert!(annotation.placement.left < cx + 100.0);

    Ok(())
}

#[tokio::test]
async fn test_empty_catalog_writes_empty_scene() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let empty = server.mock(|when, then| {
        when.method(GET);
        then.status(200)
            .json_body(serde_json::json!({"count": 0, "results": []}));
    });

    let config = config_for(&server, &output_path, &[])?;
    let engine = ExplorerEngine::new(LocalStorage::new(output_path), config);
    engine.run().await?;

    empty.assert_hits(2);
    let projection = engine.projection();
    assert!(projection.points.is_empty());
    assert_eq!(projection.scales.x.domain(), (0.0, 0.0));
    assert!(projection.scales.y.apply(0.0).is_finite());

    let svg = std::fs::read_to_string(temp_dir.path().join("scene.svg"))?;
    assert_eq!(svg.matches("<circle").count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_snapshot() -> Result<()> {
    let server = MockServer::start();
    let mut healthy = server.mock(|when, then| {
        when.method(GET).path("/api/films");
        then.status(200).json_body(serde_json::json!({
            "count": 1,
            "results": [{"episode_id": 1, "title": "The Phantom Menace", "release_date": "1999-05-19"}]
        }));
    });

    let temp_dir = TempDir::new()?;
    let config = config_for(&server, temp_dir.path().to_str().unwrap(), &[])?;
    let engine = ExplorerEngine::new(LocalStorage::new(String::new()), config);

    assert!(engine.films().fetch().await.is_loaded());
    healthy.delete();

    let _broken = server.mock(|when, then| {
        when.method(GET).path("/api/films");
        then.status(200).body("<html>maintenance</html>");
    });

    let outcome = engine.films().fetch().await;
    assert!(outcome.error().is_some());
    assert!(!engine.films().is_loading());
    assert_eq!(engine.films().data().len(), 1);
    assert_eq!(engine.films().data()[0].title, "The Phantom Menace");

    Ok(())
}
