use actix_web::{web, HttpResponse, Responder};
use cornhole_core::{
    random_seed, BoardGeometry, Commitment, CoreError, MatchOutcome, MatchRules, MatchScoreState,
    MatchSession, MatchStatus, Player, ThrowInput, ThrowOutcome, ThrowReveal, WindState,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Default cap on hosted matches, live and finished together
pub const DEFAULT_MAX_MATCHES: usize = 10_000;

/// Every hosted match, each behind its own lock so one match's throw never waits on another's.
///
/// Completed and cancelled matches stay readable until the registry fills up; they are
/// evicted to make room for new ones, or removed explicitly with [`MatchRegistry::remove`].
pub struct MatchRegistry {
    next_id: AtomicU64,
    max_matches: usize,
    matches: RwLock<HashMap<u64, Arc<Mutex<MatchSession>>>>,
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_MATCHES)
    }
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_matches: usize) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            max_matches,
            matches: RwLock::new(HashMap::new()),
        }
    }

    /// Register a session, evicting finished matches first if the registry is full.
    /// Returns `None` when every slot is held by a live match.
    pub fn insert(&self, session: MatchSession) -> Option<u64> {
        let mut matches = self.matches.write().unwrap_or_else(|e| e.into_inner());
        if matches.len() >= self.max_matches {
            let evicted = evict_finished(&mut matches);
            tracing::info!("Registry full, evicted {} finished matches", evicted);
            if matches.len() >= self.max_matches {
                return None;
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        matches.insert(id, Arc::new(Mutex::new(session)));
        Some(id)
    }

    pub fn get(&self, id: u64) -> Option<Arc<Mutex<MatchSession>>> {
        self.matches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Drop a completed or cancelled match.
    pub fn remove(&self, id: u64) -> Result<(), RemoveError> {
        let mut matches = self.matches.write().unwrap_or_else(|e| e.into_inner());
        let status = match matches.get(&id) {
            Some(m) => m.lock().unwrap_or_else(|e| e.into_inner()).status(),
            None => return Err(RemoveError::NotFound),
        };
        if !status.is_terminal() {
            return Err(RemoveError::StillLive(status));
        }
        matches.remove(&id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.matches.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_finished(matches: &mut HashMap<u64, Arc<Mutex<MatchSession>>>) -> usize {
    let before = matches.len();
    matches.retain(|_, m| {
        !m.lock()
            .unwrap_or_else(|e| e.into_inner())
            .status()
            .is_terminal()
    });
    before - matches.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveError {
    NotFound,
    StillLive(MatchStatus),
}

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    /// Wind seed; a random one is drawn when omitted
    #[serde(default)]
    pub seed: Option<u64>,
    /// Zero, one or two players; the match starts once two are bound
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub rules: Option<MatchRules>,
    #[serde(default)]
    pub board: Option<BoardGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub player: Player,
}

#[derive(Debug, Deserialize)]
pub struct ThrowRequest {
    pub player: usize,
    pub angle: f64,
    pub power: f64,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub player: usize,
    /// Hex-encoded SHA-256 commitment
    pub commitment: String,
}

#[derive(Debug, Deserialize)]
pub struct RevealRequest {
    pub player: usize,
    pub angle: f64,
    pub power: f64,
    /// Hex-encoded 32-byte nonce
    pub nonce: String,
}

/// Public view of a hosted match
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchView {
    pub match_id: u64,
    pub seed: u64,
    pub state: MatchScoreState,
    pub wind: WindState,
    pub wind_display: String,
    pub outcome: Option<MatchOutcome>,
    pub players: Vec<Player>,
    pub throws: usize,
    pub log_hash: String,
}

impl MatchView {
    fn of(match_id: u64, session: &MatchSession) -> Self {
        let summary = session.summary();
        Self {
            match_id,
            seed: session.seed(),
            state: *session.machine().state(),
            wind: session.wind(),
            wind_display: session.wind().display(),
            outcome: summary.outcome,
            players: summary.players,
            throws: session.history().len(),
            log_hash: hex::encode(session.log_hash()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_state: Option<MatchView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<ThrowOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchResponse {
    fn ok(view: MatchView, outcomes: Vec<ThrowOutcome>) -> Self {
        Self {
            success: true,
            match_state: Some(view),
            outcomes,
            error: None,
        }
    }

    fn failed(msg: String) -> Self {
        Self {
            success: false,
            match_state: None,
            outcomes: Vec::new(),
            error: Some(msg),
        }
    }
}

fn not_found(id: u64) -> HttpResponse {
    HttpResponse::NotFound().json(MatchResponse::failed(format!("Unknown match: {}", id)))
}

fn rejected(id: u64, e: CoreError) -> HttpResponse {
    tracing::warn!("Match {}: request rejected: {}", id, e);
    HttpResponse::BadRequest().json(MatchResponse::failed(e.to_string()))
}

fn decode_nonce(s: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(s).map_err(|e| format!("Error decoding nonce hex: {}", e))?;
    if bytes.len() != 32 {
        return Err(format!(
            "Invalid nonce length: expected 32 bytes, got {}",
            bytes.len()
        ));
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Lock match `id` and run `f` against it, mapping engine errors to 400s.
fn with_match<F>(registry: &MatchRegistry, id: u64, f: F) -> HttpResponse
where
    F: FnOnce(&mut MatchSession) -> Result<Vec<ThrowOutcome>, CoreError>,
{
    let Some(handle) = registry.get(id) else {
        return not_found(id);
    };
    let mut session = handle.lock().unwrap_or_else(|e| e.into_inner());
    match f(&mut session) {
        Ok(outcomes) => HttpResponse::Ok().json(MatchResponse::ok(MatchView::of(id, &session), outcomes)),
        Err(e) => rejected(id, e),
    }
}

// API Handlers

/// POST /api/matches
/// Create a match, binding any players supplied
async fn create_match(
    registry: web::Data<MatchRegistry>,
    req: web::Json<CreateMatchRequest>,
) -> impl Responder {
    let req = req.into_inner();
    if req.players.len() > 2 {
        return HttpResponse::BadRequest().json(MatchResponse::failed(format!(
            "At most 2 players, got {}",
            req.players.len()
        )));
    }

    let seed = req.seed.unwrap_or_else(random_seed);
    let mut session = MatchSession::new(
        seed,
        req.rules.unwrap_or_default(),
        req.board.unwrap_or_default(),
    );
    for p in req.players {
        if let Err(e) = session.bind_player(p) {
            return HttpResponse::BadRequest().json(MatchResponse::failed(e.to_string()));
        }
    }

    let status = session.status();
    let Some(id) = registry.insert(session) else {
        tracing::warn!("Rejected new match: registry full");
        return HttpResponse::ServiceUnavailable().json(MatchResponse::failed(
            "Too many live matches, try again later".to_string(),
        ));
    };
    tracing::info!("Created match {} (seed {}, {})", id, seed, status);

    with_match(&registry, id, |_| Ok(Vec::new()))
}

/// GET /api/matches/{id}
async fn get_match(registry: web::Data<MatchRegistry>, path: web::Path<u64>) -> impl Responder {
    with_match(&registry, path.into_inner(), |_| Ok(Vec::new()))
}

/// POST /api/matches/{id}/join
async fn join_match(
    registry: web::Data<MatchRegistry>,
    path: web::Path<u64>,
    req: web::Json<JoinRequest>,
) -> impl Responder {
    let player = req.into_inner().player;
    with_match(&registry, path.into_inner(), move |s| {
        s.bind_player(player)?;
        Ok(Vec::new())
    })
}

/// POST /api/matches/{id}/throw
/// Resolve a throw directly, without commit-reveal
async fn throw_bag(
    registry: web::Data<MatchRegistry>,
    path: web::Path<u64>,
    req: web::Json<ThrowRequest>,
) -> impl Responder {
    let id = path.into_inner();
    tracing::info!(
        "Match {}: throw by player {} (angle {}, power {})",
        id,
        req.player,
        req.angle,
        req.power
    );
    with_match(&registry, id, |s| {
        let input = ThrowInput::new(req.angle, req.power)?;
        Ok(vec![s.throw(req.player, input)?])
    })
}

/// POST /api/matches/{id}/commit
async fn commit_throw(
    registry: web::Data<MatchRegistry>,
    path: web::Path<u64>,
    req: web::Json<CommitRequest>,
) -> impl Responder {
    with_match(&registry, path.into_inner(), |s| {
        let commitment = Commitment::from_hex(&req.commitment)?;
        s.commit(req.player, commitment)?;
        Ok(Vec::new())
    })
}

/// POST /api/matches/{id}/reveal
/// Open a commitment; resolves every revealed throw whose turn has come
async fn reveal_throw(
    registry: web::Data<MatchRegistry>,
    path: web::Path<u64>,
    req: web::Json<RevealRequest>,
) -> impl Responder {
    let nonce = match decode_nonce(&req.nonce) {
        Ok(n) => n,
        Err(e) => return HttpResponse::BadRequest().json(MatchResponse::failed(e)),
    };
    let reveal = ThrowReveal {
        angle: req.angle,
        power: req.power,
        nonce,
    };
    with_match(&registry, path.into_inner(), |s| s.reveal(req.player, &reveal))
}

/// POST /api/matches/{id}/cancel
async fn cancel_match(registry: web::Data<MatchRegistry>, path: web::Path<u64>) -> impl Responder {
    with_match(&registry, path.into_inner(), |s| {
        s.cancel()?;
        Ok(Vec::new())
    })
}

/// DELETE /api/matches/{id}
/// Forget a completed or cancelled match
async fn delete_match(registry: web::Data<MatchRegistry>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();
    match registry.remove(id) {
        Ok(()) => {
            tracing::info!("Removed match {}", id);
            HttpResponse::Ok().json(MatchResponse {
                success: true,
                match_state: None,
                outcomes: Vec::new(),
                error: None,
            })
        }
        Err(RemoveError::NotFound) => not_found(id),
        Err(RemoveError::StillLive(status)) => HttpResponse::Conflict().json(MatchResponse::failed(
            format!("Match {} is {}; cancel it before removing", id, status),
        )),
    }
}

/// GET /health
/// Health check endpoint
async fn health(registry: web::Data<MatchRegistry>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "cornhole-api",
        "matches": registry.len()
    }))
}

/// Register all routes. The caller provides `web::Data<MatchRegistry>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/matches", web::post().to(create_match))
        .route("/api/matches/{id}", web::get().to(get_match))
        .route("/api/matches/{id}", web::delete().to(delete_match))
        .route("/api/matches/{id}/join", web::post().to(join_match))
        .route("/api/matches/{id}/throw", web::post().to(throw_bag))
        .route("/api/matches/{id}/commit", web::post().to(commit_throw))
        .route("/api/matches/{id}/reveal", web::post().to(reveal_throw))
        .route("/api/matches/{id}/cancel", web::post().to(cancel_match));
}
