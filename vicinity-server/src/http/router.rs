//! Router configuration for the HTTP API

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::error::handle_middleware_error;
use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;

/// Creates the application router.
///
/// Analysis endpoints share a concurrency limit and a request timeout;
/// metadata endpoints are never throttled.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let analysis = Router::new()
        .route("/scores", post(handlers::score_neighborhoods))
        .route("/isochrone", post(handlers::point_isochrone))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(server.request_timeout()))
                .layer(GlobalConcurrencyLimitLayer::new(server.concurrency_limit)),
        );

    let api_v1 = Router::new()
        .route("/neighborhoods", get(handlers::list_neighborhoods))
        .route("/pois", get(handlers::list_pois))
        .merge(analysis);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use geo::{MultiPoint, Point, Rect, coord};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use vicinity_core::{
        Category, Dataset, Neighborhood, PoiGeometry, PointOfInterest, StreetGraph,
    };

    use super::*;
    use crate::config::AnalysisDefaults;

    /// 3x3 grid with 100 m blocks, an isolated node far away, and two areas
    fn dataset() -> Dataset {
        let mut builder = StreetGraph::builder();
        for row in 0..3u64 {
            for col in 0..3u64 {
                let id = row * 3 + col;
                builder
                    .add_node(id, Point::new(col as f64 * 100.0, row as f64 * 100.0))
                    .unwrap();
                if col > 0 {
                    builder.add_undirected_edge(id - 1, id, 100.0).unwrap();
                }
                if row > 0 {
                    builder.add_undirected_edge(id - 3, id, 100.0).unwrap();
                }
            }
        }
        builder.add_node(99, Point::new(9000.0, 9000.0)).unwrap();
        let walk = builder.build();

        let square = |id: &str, x0: f64, y0: f64| {
            let rect = Rect::new(coord! { x: x0, y: y0 }, coord! { x: x0 + 200.0, y: y0 + 200.0 });
            Neighborhood::from_polygon(id, rect.to_polygon())
        };

        Dataset {
            drive: walk.clone(),
            walk,
            neighborhoods: vec![
                square("center", 0.0, 0.0).with_name("Centro"),
                square("outskirts", 8900.0, 8900.0),
            ],
            pois: vec![
                PointOfInterest::at(Category::Pharmacy, Point::new(50.0, 50.0)),
                PointOfInterest::at(Category::Supermarket, Point::new(150.0, 150.0)),
                PointOfInterest::at(Category::Gym, Point::new(120.0, 40.0)),
                PointOfInterest::new(
                    Category::School,
                    PoiGeometry::MultiPoint(MultiPoint::from(vec![(5000.0, 5000.0), (5100.0, 5000.0)])),
                )
                .with_name("Liceo"),
            ],
        }
    }

    fn app() -> Router {
        let state = AppState::new(
            dataset(),
            AnalysisDefaults::default(),
            Duration::from_secs(30),
        );
        create_router(state, &ServerConfig::default())
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["neighborhoods"], 2);
        assert_eq!(body["pois"], 4);
        assert_eq!(body["running_analyses"], 0);
    }

    #[tokio::test]
    async fn lists_neighborhoods() {
        let request = Request::builder()
            .uri("/v1/neighborhoods")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["neighborhoods"][0]["name"], "Centro");
        let centroid = &body["neighborhoods"][0]["centroid"];
        assert!((centroid[0].as_f64().unwrap() - 100.0).abs() < 1e-9);
        assert!((centroid[1].as_f64().unwrap() - 100.0).abs() < 1e-9);

        let boundary = &body["neighborhoods"][0]["boundary"];
        assert_eq!(boundary["type"], "MultiPolygon");
        assert_eq!(boundary["coordinates"][0][0].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn lists_pois_as_geojson() {
        let request = Request::builder().uri("/v1/pois").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 4);

        let request = Request::builder()
            .uri("/v1/pois?categories=school,pharmacy")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        let features = body["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["category"], "pharmacy");
        assert_eq!(features[1]["properties"]["name"], "Liceo");
        assert_eq!(features[1]["geometry"]["type"], "MultiPoint");
        assert_eq!(features[1]["geometry"]["coordinates"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_poi_category_is_a_400() {
        let request = Request::builder()
            .uri("/v1/pois?categories=bakery")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn scores_with_defaults() {
        let (status, body) = send(post_json("/v1/scores", &json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["mode"], "walking");
        assert_eq!(body["max_time_seconds"], 900.0);
        assert_eq!(body["max_raw_score"], 2);
        assert_eq!(body["entries"][0]["id"], "center");
        assert_eq!(body["entries"][0]["raw_score"], 2);
        assert_eq!(body["entries"][0]["normalized_score"], 1.0);
        assert_eq!(body["entries"][1]["id"], "outskirts");
        assert_eq!(body["entries"][1]["raw_score"], 0);
        assert!(body["entries"][1]["failure"].is_string());
    }

    #[tokio::test]
    async fn scores_with_overrides_and_top() {
        let request = post_json(
            "/v1/scores",
            &json!({ "categories": ["gym"], "mode": "driving", "max_time_minutes": 5, "top": 1 }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "driving");
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
        assert_eq!(body["entries"][0]["by_category"]["gym"], 1);
    }

    #[tokio::test]
    async fn bad_input_is_a_json_400() {
        let (status, body) = send(post_json("/v1/scores", &json!({ "mode": "bike" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");

        let (status, _) = send(post_json("/v1/scores", &json!({ "max_time_minutes": -3 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn isochrone_around_point() {
        let request = post_json("/v1/isochrone", &json!({ "x": 95.0, "y": 105.0 }));
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["origin"], 4);
        assert_eq!(body["reachable_nodes"], 9);
        assert_eq!(body["region"]["type"], "Polygon");
    }

    #[tokio::test]
    async fn isochrone_requires_coordinates() {
        let (status, body) = send(post_json("/v1/isochrone", &json!({ "x": 1.0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    /// 300x300 grid with 100 m blocks split into 40x40 neighborhoods
    fn large_city() -> Dataset {
        const SIZE: u64 = 300;
        const BLOCKS: u64 = 40;

        let mut builder = StreetGraph::builder();
        for row in 0..SIZE {
            for col in 0..SIZE {
                let id = row * SIZE + col;
                builder
                    .add_node(id, Point::new(col as f64 * 100.0, row as f64 * 100.0))
                    .unwrap();
                if col > 0 {
                    builder.add_undirected_edge(id - 1, id, 100.0).unwrap();
                }
                if row > 0 {
                    builder.add_undirected_edge(id - SIZE, id, 100.0).unwrap();
                }
            }
        }
        let drive = builder.build();

        let side = (SIZE - 1) as f64 * 100.0 / BLOCKS as f64;
        let neighborhoods = (0..BLOCKS * BLOCKS)
            .map(|i| {
                let x0 = (i % BLOCKS) as f64 * side;
                let y0 = (i / BLOCKS) as f64 * side;
                let rect = Rect::new(coord! { x: x0, y: y0 }, coord! { x: x0 + side, y: y0 + side });
                Neighborhood::from_polygon(i.to_string(), rect.to_polygon())
            })
            .collect();

        Dataset {
            walk: drive.clone(),
            drive,
            neighborhoods,
            pois: vec![PointOfInterest::at(Category::Pharmacy, Point::new(50.0, 50.0))],
        }
    }

    #[tokio::test]
    async fn timed_out_analysis_stops_working() {
        let state = AppState::new(
            large_city(),
            AnalysisDefaults::default(),
            Duration::from_secs(600),
        );
        let server = ServerConfig {
            request_timeout_secs: 1,
            ..ServerConfig::default()
        };
        let app = create_router(state.clone(), &server);

        let request = post_json(
            "/v1/scores",
            &json!({ "mode": "driving", "max_time_minutes": 60 }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let timed_out = Instant::now();
        while state.running_analyses() > 0 {
            assert!(
                timed_out.elapsed() < Duration::from_secs(10),
                "analysis still running after its request timed out"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}
