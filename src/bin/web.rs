//! Single binary web server: JSON API over in-memory rotation sessions, plus CSV/text exports.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), SESSION_TTL_HOURS (e.g. 12).

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_rotation_web::{
    export_match_history, export_participant_stats, fill_idle_slots, generate_text_summary,
    history_csv, stats_csv, try_finish_match, ExportError, RotationError, Session, SessionConfig,
    SessionId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: rotation state + last activity time (for auto-cleanup).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

/// In-memory state: many sessions by ID. One lock guards every session's whole state,
/// so each request applies as a single step.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

/// How often the cleanup task sweeps inactive sessions.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// UTF-8 byte-order mark so spreadsheet tools pick the right encoding.
const UTF8_BOM: &str = "\u{feff}";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
}

#[derive(Deserialize)]
struct SlotCountBody {
    count: u32,
}

#[derive(Deserialize, Default)]
struct FinishMatchBody {
    #[serde(default)]
    result: String,
}

/// A missing or blank body means no result; anything else must be valid JSON.
fn parse_finish_body(raw: &[u8]) -> Result<FinishMatchBody, serde_json::Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(FinishMatchBody::default());
    }
    serde_json::from_slice(raw)
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segments: session id and participant name (e.g. /api/sessions/{id}/participants/{name})
#[derive(Deserialize)]
struct SessionParticipantPath {
    id: SessionId,
    name: String,
}

/// Path segments: session id and slot id (e.g. /api/sessions/{id}/slots/{slot_id}/finish)
#[derive(Deserialize)]
struct SessionSlotPath {
    id: SessionId,
    slot_id: u32,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

fn bad_request(e: &RotationError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string(), "detail": e }))
}

fn export_failed(e: &ExportError) -> HttpResponse {
    log::error!("Export failed: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
}

fn csv_download(filename: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(format!("{}{}", UTF8_BOM, body))
}

/// Lock the state, look up the session (404 if missing), refresh its activity time and run `f`.
fn with_session(
    state: &AppState,
    id: SessionId,
    f: impl FnOnce(&mut Session) -> HttpResponse,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    f(&mut entry.session)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-rotation-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new session (returns its snapshot with id; client stores id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState, body: Option<Json<SessionConfig>>) -> HttpResponse {
    let config = body.map(Json::into_inner).unwrap_or_default();
    let session = Session::new(config);
    let snapshot = session.snapshot();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!(
        "Created session {} with {} slot(s)",
        snapshot.id,
        snapshot.slot_count
    );
    g.insert(
        snapshot.id,
        SessionEntry {
            session,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(snapshot)
}

/// Get a session by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| HttpResponse::Ok().json(s.snapshot()))
}

/// Register a participant.
#[post("/api/sessions/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| match s.register(&body.name) {
        Ok(()) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => bad_request(&e),
    })
}

/// Remove a participant by name (must not be on a slot).
#[delete("/api/sessions/{id}/participants/{name}")]
async fn api_remove_participant(
    state: AppState,
    path: Path<SessionParticipantPath>,
) -> HttpResponse {
    with_session(&state, path.id, |s| match s.remove(&path.name) {
        Ok(()) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => bad_request(&e),
    })
}

/// Change the number of slots. Slots removed mid-match close once finished.
#[put("/api/sessions/{id}/slots")]
async fn api_set_slot_count(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SlotCountBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.set_slot_count(body.count);
        HttpResponse::Ok().json(s.snapshot())
    })
}

/// Fill idle slots (the "next round" button).
#[post("/api/sessions/{id}/fill")]
async fn api_fill_idle_slots(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        let log = fill_idle_slots(s);
        let messages: Vec<String> = log.iter().map(ToString::to_string).collect();
        HttpResponse::Ok().json(serde_json::json!({
            "log": log,
            "messages": messages,
            "session": s.snapshot(),
        }))
    })
}

/// Finish the match on a slot with an optional free-text result.
#[post("/api/sessions/{id}/slots/{slot_id}/finish")]
async fn api_finish_match(
    state: AppState,
    path: Path<SessionSlotPath>,
    body: Bytes,
) -> HttpResponse {
    let result = match parse_finish_body(&body) {
        Ok(b) => b.result,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": format!("Invalid body: {}", e) }))
        }
    };
    with_session(&state, path.id, |s| {
        match try_finish_match(s, path.slot_id, &result) {
            Ok(record) => HttpResponse::Ok().json(serde_json::json!({
                "record": record,
                "session": s.snapshot(),
            })),
            Err(e) => bad_request(&e),
        }
    })
}

/// Waiting list (available participants with their rest counts).
#[get("/api/sessions/{id}/waiting")]
async fn api_waiting(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        HttpResponse::Ok().json(s.available_participants())
    })
}

/// Download match history as CSV.
#[get("/api/sessions/{id}/export/history.csv")]
async fn api_export_history(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        match history_csv(&export_match_history(s)) {
            Ok(body) => csv_download("match_history.csv", body),
            Err(e) => export_failed(&e),
        }
    })
}

/// Download participant stats as CSV.
#[get("/api/sessions/{id}/export/stats.csv")]
async fn api_export_stats(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        match stats_csv(&export_participant_stats(s)) {
            Ok(body) => csv_download("participant_stats.csv", body),
            Err(e) => export_failed(&e),
        }
    })
}

/// Plain-text summary for copy/paste.
#[get("/api/sessions/{id}/summary")]
async fn api_summary(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(generate_text_summary(s))
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_ttl_hours() -> u64 {
    12
}

fn inactivity_timeout(ttl_hours: u64) -> Duration {
    Duration::from_secs(ttl_hours.saturating_mul(3600))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let ttl_hours: u64 = std::env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_ttl_hours);
    let session_ttl = inactivity_timeout(ttl_hours);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));

    // Background task: periodically remove sessions inactive for longer than the TTL
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < session_ttl);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive session(s) (no activity for {}h)",
                    removed,
                    ttl_hours
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_add_participant)
            .service(api_remove_participant)
            .service(api_set_slot_count)
            .service(api_fill_idle_slots)
            .service(api_finish_match)
            .service(api_waiting)
            .service(api_export_history)
            .service(api_export_stats)
            .service(api_summary)
    })
    .bind(bind)?
    .run()
    .await
}
