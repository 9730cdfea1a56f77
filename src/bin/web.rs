//! Single binary web server: tournament API via REST, state persisted as JSON files.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, STORE_DIR (default `data`), STORE_NAMESPACE (default `tournament`).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use matchup_tournament_web::{
    advance_round, export_tournament, import_tournament, modify_result, parse_roster_csv,
    start_tournament, storage::EXPORT_FILE_NAME, submit_result, JsonFileStore, MatchRef,
    MatchResult, Tournament, TournamentError, TournamentId, TournamentStore, TournamentType,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-tournament entry: tournament data + last activity time (for eviction from memory).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Tournaments cached in memory, backed by a keyed store (key = tournament id).
struct AppData {
    entries: HashMap<TournamentId, TournamentEntry>,
    store: Box<dyn TournamentStore + Send + Sync>,
}

type AppState = Data<RwLock<AppData>>;

/// Tournaments not accessed for this long are dropped from memory (they stay in the store).
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Server settings read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    store_dir: String,
    store_namespace: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            store_dir: std::env::var("STORE_DIR").unwrap_or_else(|_| default_store_dir()),
            store_namespace: std::env::var("STORE_NAMESPACE")
                .unwrap_or_else(|_| default_store_namespace()),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_store_dir() -> String {
    "data".to_string()
}

fn default_store_namespace() -> String {
    "tournament".to_string()
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    tournament_type: TournamentType,
    #[serde(default)]
    best_of_three: bool,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SettingsBody {
    tournament_type: Option<TournamentType>,
    best_of_three: Option<bool>,
}

#[derive(Deserialize)]
struct SubmitResultBody {
    matchup: MatchRef,
    result: MatchResult,
}

#[derive(Deserialize)]
struct RollbackBody {
    matchup: MatchRef,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: Uuid,
}

fn error_json(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(error_json("No tournament"))
}

/// Cached entry for `id`, loading it from the store on a cache miss.
fn entry_mut<'a>(
    entries: &'a mut HashMap<TournamentId, TournamentEntry>,
    store: &dyn TournamentStore,
    id: TournamentId,
) -> Option<&'a mut TournamentEntry> {
    if !entries.contains_key(&id) {
        match store.load(&id.to_string()) {
            Ok(Some(tournament)) => {
                log::debug!("tournament {} loaded from store", id);
                entries.insert(
                    id,
                    TournamentEntry {
                        tournament,
                        last_activity: Instant::now(),
                    },
                );
            }
            Ok(None) => return None,
            Err(e) => {
                log::error!("failed to load tournament {}: {}", id, e);
                return None;
            }
        }
    }
    let entry = entries.get_mut(&id)?;
    entry.last_activity = Instant::now();
    Some(entry)
}

fn persist(store: &mut dyn TournamentStore, tournament: &Tournament) -> Result<(), HttpResponse> {
    store.save(&tournament.id.to_string(), tournament).map_err(|e| {
        log::error!("failed to persist tournament {}: {}", tournament.id, e);
        HttpResponse::InternalServerError().json(error_json(e))
    })
}

/// Apply `f` to a copy of the tournament. The copy replaces the cached one only
/// when `f` succeeds and the store accepts it.
fn mutate<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let AppData { entries, store } = &mut *g;
    let Some(entry) = entry_mut(entries, &**store, id) else {
        return not_found();
    };
    let mut next = entry.tournament.clone();
    if let Err(e) = f(&mut next) {
        return HttpResponse::BadRequest().json(error_json(e));
    }
    if let Err(response) = persist(&mut **store, &next) {
        return response;
    }
    let response = HttpResponse::Ok().json(&next);
    entry.tournament = next;
    response
}

/// Read-only access; still takes the write lock because a cache miss inserts.
fn view<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let AppData { entries, store } = &mut *g;
    match entry_mut(entries, &**store, id) {
        Some(entry) => f(&entry.tournament),
        None => not_found(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "matchup-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let (tournament_type, best_of_three) = body
        .map(|b| (b.tournament_type, b.best_of_three))
        .unwrap_or_default();
    let tournament = Tournament::new(tournament_type, best_of_three);
    log::info!("created tournament {} ({})", tournament.id, tournament_type);
    insert_tournament(&state, tournament)
}

/// Import a tournament from exported JSON text. Replaces any tournament with the same id.
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, body: String) -> HttpResponse {
    match import_tournament(&body) {
        Ok(tournament) => insert_tournament(&state, tournament),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

fn insert_tournament(state: &AppState, tournament: Tournament) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if let Err(response) = persist(&mut *g.store, &tournament) {
        return response;
    }
    let response = HttpResponse::Ok().json(&tournament);
    g.entries.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| HttpResponse::Ok().json(t))
}

/// Delete a tournament from memory and from the store.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.entries.remove(&path.id);
    match g.store.remove(&path.id.to_string()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

/// Add a player (before start).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    mutate(&state, path.id, |t| t.add_player(body.name.trim()).map(|_| ()))
}

/// Add players from CSV text (one name per row). A rejected name leaves the roster unchanged.
#[post("/api/tournaments/{id}/players/csv")]
async fn api_add_players_csv(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let names = match parse_roster_csv(body.as_bytes()) {
        Ok(names) => names,
        Err(e) => return HttpResponse::BadRequest().json(error_json(format!("Invalid CSV: {}", e))),
    };
    mutate(&state, path.id, |t| t.add_players(names).map(|_| ()))
}

/// Remove a player by id (before start).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    mutate(&state, path.id, |t| t.remove_player(path.player_id))
}

/// Change format and/or best-of-three (before start).
#[put("/api/tournaments/{id}/settings")]
async fn api_update_settings(state: AppState, path: Path<TournamentPath>, body: Json<SettingsBody>) -> HttpResponse {
    mutate(&state, path.id, |t| {
        if let Some(tournament_type) = body.tournament_type {
            t.set_tournament_type(tournament_type)?;
        }
        if let Some(best_of_three) = body.best_of_three {
            t.set_best_of_three(best_of_three)?;
        }
        Ok(())
    })
}

/// Start the tournament: generates the opening round.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, start_tournament)
}

/// Record a result for one matchup. Repeat submissions for a decided matchup are ignored.
#[put("/api/tournaments/{id}/results")]
async fn api_submit_result(state: AppState, path: Path<TournamentPath>, body: Json<SubmitResultBody>) -> HttpResponse {
    mutate(&state, path.id, |t| submit_result(t, body.matchup, body.result))
}

/// Clear a matchup's result so it can be entered again.
#[post("/api/tournaments/{id}/results/rollback")]
async fn api_rollback_result(state: AppState, path: Path<TournamentPath>, body: Json<RollbackBody>) -> HttpResponse {
    mutate(&state, path.id, |t| modify_result(t, body.matchup))
}

/// Generate the next single-elimination round from the current winners.
#[post("/api/tournaments/{id}/rounds/next")]
async fn api_next_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, advance_round)
}

/// Players ordered by score, wins, ties, then fewest losses.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| HttpResponse::Ok().json(t.standings()))
}

/// Download the tournament as pretty-printed JSON.
#[get("/api/tournaments/{id}/export")]
async fn api_export(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| match export_tournament(t) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ))
            .body(json),
        Err(e) => HttpResponse::InternalServerError().json(error_json(e)),
    })
}

/// Restart tournament: back to setup with same player names.
#[post("/api/tournaments/{id}/restart")]
async fn api_restart_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, Tournament::restart_tournament)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Storing tournaments in {} (namespace {})",
        config.store_dir,
        config.store_namespace
    );

    let store = JsonFileStore::new(&config.store_dir, config.store_namespace.clone());
    let state = Data::new(RwLock::new(AppData {
        entries: HashMap::new(),
        store: Box::new(store),
    }));

    // Background task: every 30 minutes, drop tournaments idle for 12+ hours from memory
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.entries.len();
            g.entries
                .retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let evicted = before - g.entries.len();
            if evicted > 0 {
                log::info!("Evicted {} idle tournament(s) from memory", evicted);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_player)
            .service(api_add_players_csv)
            .service(api_remove_player)
            .service(api_update_settings)
            .service(api_start_tournament)
            .service(api_submit_result)
            .service(api_rollback_result)
            .service(api_next_round)
            .service(api_standings)
            .service(api_export)
            .service(api_restart_tournament)
    })
    .bind(bind)?
    .run()
    .await
}
