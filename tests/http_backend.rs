use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use wsd_lesk::{
    BackendError, ClientConfig, Controller, Highlight, HttpBackend, RequestPhase, SenseRequest,
    Strategy, ViewModel, WsdBackend,
};

async fn basic_lesk(Json(body): Json<SenseRequest>) -> Response {
    if body.ambiguous_word == "xyzzy" {
        let payload = json!({ "error": "No sense found for the word: xyzzy" });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    }
    Json(json!({
        "sense": format!("{}.n.01", body.ambiguous_word),
        "definition": "basic definition",
        "cleanedSentence": body.context_sentence.to_lowercase(),
        "original_signature": ["should", "be", "ignored"],
    }))
    .into_response()
}

async fn extended_lesk(Json(body): Json<SenseRequest>) -> Response {
    Json(json!({
        "sense": format!("{}.n.01", body.ambiguous_word),
        "definition": "flying mammal",
        "cleanedSentence": body.context_sentence.to_lowercase(),
        "original_signature": ["bat", "fly", "mammal"],
        "related_signature": ["wing", "nocturnal"],
    }))
    .into_response()
}

async fn word_info(Path(word): Path<String>) -> Response {
    match word.as_str() {
        "broken" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "bat" => Json(json!([
            {
                "sense": "bat.n.01",
                "definition": "nocturnal mouselike mammal",
                "hypernyms": [{"sense": "placental.n.01", "definition": "placental mammal"}],
                "hyponyms": [{"sense": "vampire_bat.n.01", "definition": "tropical bat"}],
            },
            {
                "sense": "bat.n.05",
                "definition": "a club used for hitting a ball",
                "hypernyms": [{"sense": "club.n.03", "definition": "stout stick"}],
                "hyponyms": [],
            },
        ]))
        .into_response(),
        other => Json(json!([{
            "sense": format!("{other}.n.01"),
            "definition": "echo",
            "hypernyms": [],
            "hyponyms": [],
        }]))
        .into_response(),
    }
}

async fn spawn_backend() -> ClientConfig {
    let router = Router::new()
        .route("/api/basic_lesk", post(basic_lesk))
        .route("/api/extended_lesk", post(extended_lesk))
        .route("/api/word_info/:word", get(word_info));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ClientConfig::new(&format!("http://{addr}/api/"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn extended_lookup_returns_signatures() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let response = backend
        .disambiguate(
            Strategy::ExtendedLesk,
            &SenseRequest {
                context_sentence: "I saw a bat fly".to_string(),
                ambiguous_word: "bat".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(response.cleaned_sentence, "i saw a bat fly");
    assert_eq!(response.related_signature.unwrap(), vec!["wing", "nocturnal"]);
}

#[tokio::test]
async fn error_status_carries_backend_message() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let err = backend
        .disambiguate(
            Strategy::BasicLesk,
            &SenseRequest {
                context_sentence: "xyzzy".to_string(),
                ambiguous_word: "xyzzy".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 404,
            message: "No sense found for the word: xyzzy".to_string(),
        }
    );
}

#[tokio::test]
async fn word_info_escapes_and_parses() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let info = backend.word_info("ice cream").await.unwrap();
    assert_eq!(info.senses[0].sense, "ice cream.n.01");

    let err = backend.word_info("broken").await.unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = ClientConfig::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let backend = HttpBackend::new(&config).unwrap();
    let err = backend.word_info("bat").await.unwrap_err();
    assert!(matches!(err, BackendError::Network(_)));
}

#[tokio::test]
async fn full_cycle_over_http() {
    let controller = Controller::new(HttpBackend::new(&spawn_backend().await).unwrap());
    controller.set_sentence("I saw a bat fly");
    controller.select("bat").unwrap();
    controller.set_strategy(Strategy::ExtendedLesk);

    let report = controller.find_sense().await.unwrap();
    assert!(report.is_complete());

    let state = controller.snapshot();
    assert_eq!(state.phase(), RequestPhase::Idle);
    let view = ViewModel::from_state(&state);
    let panel = view.sense.unwrap();
    assert_eq!(panel.sense, "bat.n.01");
    assert_eq!(panel.definition, "flying mammal");
    let highlights: Vec<_> = panel
        .signatures
        .iter()
        .map(|group| {
            group
                .words
                .iter()
                .map(|w| (w.word.as_str(), w.highlight))
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(
        highlights,
        vec![
            vec![
                ("bat", Highlight::Selected),
                ("fly", Highlight::Contextual),
                ("mammal", Highlight::Neutral),
            ],
            vec![("wing", Highlight::Neutral), ("nocturnal", Highlight::Neutral)],
        ]
    );

    let tree = view.relation_tree.unwrap();
    assert_eq!(tree.name, "Word Senses");
    let shape: Vec<_> = tree
        .children
        .iter()
        .map(|sense| (sense.name.as_str(), sense.children.len()))
        .collect();
    assert_eq!(shape, vec![("bat.n.01", 2), ("bat.n.05", 1)]);
    assert_eq!(view.word_info.unwrap().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn basic_cycle_over_http_has_no_signatures() {
    let controller = Controller::new(HttpBackend::new(&spawn_backend().await).unwrap());
    controller.set_sentence("I saw a bat fly");
    controller.select("bat").unwrap();

    controller.find_sense().await.unwrap();
    let state = controller.snapshot();
    let group = state.sense().unwrap();
    assert_eq!(group.result.definition, "basic definition");
    assert!(group.signatures.is_empty());
}

#[tokio::test]
async fn missing_sense_still_shows_word_info() {
    let controller = Controller::new(HttpBackend::new(&spawn_backend().await).unwrap());
    controller.set_sentence("xyzzy");
    controller.select("xyzzy").unwrap();

    let report = controller.find_sense().await.unwrap();
    assert!(report.sense_error.is_some());
    assert!(report.word_info_error.is_none());

    let state = controller.snapshot();
    assert!(state.sense().is_none());
    assert_eq!(state.relation_tree().unwrap().children[0].name, "xyzzy.n.01");
}
