//! Single binary web server: JSON API over an in-memory tournament store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tournament_scheduler::{
    assign_venue, generate_draw, record_result, tournament_standings, unassign_venue, ErrorKind,
    GameId, PlayerId, ScoringRule, Tournament, TournamentError, TournamentFormat, TournamentId,
};

/// In-memory state: tournaments by ID. Every mutation holds the write lock for its whole
/// check-then-write sequence, so venue checks and bracket rebuilds never interleave.
type AppState = Data<RwLock<HashMap<TournamentId, Tournament>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    description: Option<String>,
    start_date: Option<NaiveDate>,
    #[serde(default)]
    format: TournamentFormat,
    #[serde(flatten)]
    scoring: ScoringRule,
}

#[derive(Deserialize)]
struct UpdateTournamentBody {
    venues_count: Option<u32>,
    number_of_groups: Option<u32>,
}

#[derive(Deserialize)]
struct PlayerNameBody {
    name: String,
}

#[derive(Deserialize)]
struct ResultBody {
    score1: u32,
    score2: u32,
}

#[derive(Deserialize)]
struct AssignVenueBody {
    venue: u32,
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
    player_id: PlayerId,
}

/// Path segments: tournament id and game id (e.g. /api/tournaments/{id}/games/{game_id})
#[derive(Deserialize)]
struct TournamentGamePath {
    id: TournamentId,
    game_id: GameId,
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

/// Map a tournament error to a status code by its kind.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::PreconditionNotMet | ErrorKind::InconsistentState => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        ErrorKind::ResourceConflict => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

fn respond<T>(result: Result<T, TournamentError>, t: &Tournament) -> HttpResponse {
    match result {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-scheduler",
    })
}

/// List tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = state.read().await;
    let mut tournaments: Vec<&Tournament> = g.values().collect();
    tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    HttpResponse::Ok().json(tournaments)
}

/// Create a new tournament in Draft.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return HttpResponse::UnprocessableEntity()
            .json(serde_json::json!({ "error": "Tournament name must not be empty" }));
    }
    let mut tournament = Tournament::new(body.name.trim(), body.format, body.scoring);
    tournament.description = body.description;
    tournament.start_date = body.start_date;
    log::info!("Created tournament {} ({:?})", tournament.id, tournament.format);

    let response = HttpResponse::Created().json(&tournament);
    state.write().await.insert(tournament.id, tournament);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = state.read().await;
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => no_tournament(),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.write().await.remove(&path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => no_tournament(),
    }
}

/// Update venue count and/or number of groups.
#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<UpdateTournamentBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    // Validate both before writing either.
    let mut draft = t.clone();
    let result = body
        .venues_count
        .map_or(Ok(()), |n| draft.set_venues_count(n))
        .and_then(|_| {
            body.number_of_groups
                .map_or(Ok(()), |n| draft.set_number_of_groups(n))
        });
    if result.is_ok() {
        *t = draft;
    }
    respond(result, t)
}

/// Add a player (tournament must be in Draft).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = t.add_player(body.name.as_str());
    respond(result, t)
}

/// Rename a player.
#[put("/api/tournaments/{id}/players/{player_id}")]
async fn api_rename_player(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = t.rename_player(path.player_id, &body.name);
    respond(result, t)
}

/// Remove a player (tournament must be in Draft).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = t.remove_player(path.player_id);
    respond(result, t)
}

/// Generate (or regenerate) the draw for the tournament's format.
#[post("/api/tournaments/{id}/generate")]
async fn api_generate(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = generate_draw(t, &mut rand::thread_rng());
    respond(result, t)
}

/// Enter or correct a game result.
#[put("/api/tournaments/{id}/games/{game_id}")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentGamePath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = record_result(t, path.game_id, body.score1, body.score2);
    respond(result, t)
}

/// Start a game on a venue.
#[post("/api/tournaments/{id}/games/{game_id}/assign")]
async fn api_assign_venue(
    state: AppState,
    path: Path<TournamentGamePath>,
    body: Json<AssignVenueBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = assign_venue(t, path.game_id, body.venue);
    respond(result, t)
}

/// Take a game off its venue.
#[post("/api/tournaments/{id}/games/{game_id}/unassign")]
async fn api_unassign_venue(state: AppState, path: Path<TournamentGamePath>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    let result = unassign_venue(t, path.game_id);
    respond(result, t)
}

/// Standings: per group for the groups format, overall otherwise.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = state.read().await;
    let Some(t) = g.get(&path.id) else {
        return no_tournament();
    };
    match tournament_standings(t) {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, Tournament>::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_update_tournament)
            .service(api_add_player)
            .service(api_rename_player)
            .service(api_remove_player)
            .service(api_generate)
            .service(api_record_result)
            .service(api_assign_venue)
            .service(api_unassign_venue)
            .service(api_standings)
    })
    .bind(bind)?
    .run()
    .await
}
