use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::catalog_store::{CatalogStore, Song};
use crate::ingestion::{SongImporter, VideoAnalysis};
use crate::mood::MoodClassifier;
use crate::title_normalizer::normalize;
use crate::user::{
    auth::AuthTokenValue, FullUserStore, HistoryItem, ListeningEvent, PlaylistSummary,
    PlaylistWithSongs, UserManager,
};
use crate::video::VideoProvider;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::api_error::{ApiError, ApiResult};
use super::recommendations::{recommend, DEFAULT_WEATHER};
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::{log_requests, state::*, ServerConfig};

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 200;
const SEARCH_LIMIT: usize = 50;
const HISTORY_LIMIT: usize = 50;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub session_user_id: Option<usize>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct SignupBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginSuccessResponse {
    message: &'static str,
    user_id: usize,
    username: String,
    email: String,
    token: String,
}

#[derive(Deserialize, Debug)]
struct PageQuery {
    /// Zero-based.
    pub page: Option<usize>,
    pub size: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize, Debug)]
struct WeatherQuery {
    pub weather: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YoutubeUrlBody {
    #[serde(default)]
    pub youtube_url: String,
}

#[derive(Deserialize, Debug)]
struct ClassifyBody {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct ClassifyResponse {
    mood: String,
    clean_title: String,
}

#[derive(Deserialize, Debug)]
struct SongIdBody {
    pub song_id: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct CreatePlaylistBody {
    #[serde(default)]
    pub playlist_name: String,
}

#[derive(Deserialize, Debug)]
struct ListeningHistoryBody {
    pub user_id: Option<usize>,
    pub song_id: Option<usize>,
    #[serde(default)]
    pub play_duration: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    songs_in_database: usize,
    users_in_database: usize,
    uptime: String,
}

fn require_song_id(song_id: Option<usize>) -> ApiResult<usize> {
    song_id.ok_or_else(|| ApiError::BadRequest("Song ID is required".to_string()))
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}

async fn home(session: Option<Session>, State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        session_user_id: session.map(|s| s.user_id),
    };
    Json(stats)
}

async fn health(State(state): State<ServerState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok",
        songs_in_database: state.catalog_store.get_songs_count()?,
        users_in_database: state.user_manager.get_users_count()?,
        uptime: format_uptime(state.start_time.elapsed()),
    }))
}

// Auth

async fn signup(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<SignupBody>,
) -> ApiResult<Response> {
    let user = user_manager.signup(&body.username, &body.email, &body.password)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user_id": user.id,
            "username": user.handle,
            "email": user.email,
        })),
    )
        .into_response())
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Response> {
    debug!("login() called for {}", body.username);
    let (user, auth_token) = user_manager.login(&body.username, &body.password)?;

    let cookie = Cookie::build(Cookie::new(
        COOKIE_SESSION_TOKEN_KEY,
        auth_token.value.0.clone(),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build();

    let response_body = LoginSuccessResponse {
        message: "Login success",
        user_id: user.id,
        username: user.handle,
        email: user.email,
        token: auth_token.value.0,
    };
    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(response_body),
    )
        .into_response())
}

async fn logout(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
) -> ApiResult<Response> {
    user_manager.logout(&AuthTokenValue(session.token))?;
    let cookie = Cookie::build(Cookie::new(COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1)) // Expire it in the past
        .same_site(SameSite::Lax)
        .build();

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        message("Logged out"),
    )
        .into_response())
}

// Songs

async fn get_songs(
    State(catalog): State<GuardedCatalogStore>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<Song>>> {
    let size = query
        .size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = query.page.unwrap_or(0);
    Ok(Json(catalog.list_songs(page.saturating_add(1), size)?))
}

async fn get_song(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<usize>,
) -> ApiResult<Json<Song>> {
    catalog
        .get_song(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Song not found".to_string()))
}

async fn search_songs(
    State(catalog): State<GuardedCatalogStore>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Song>>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest(
            "Search query is required".to_string(),
        ));
    }
    Ok(Json(catalog.search_songs(q, SEARCH_LIMIT)?))
}

fn require_youtube_url(body: &YoutubeUrlBody) -> ApiResult<&str> {
    let url = body.youtube_url.trim();
    if url.is_empty() {
        return Err(ApiError::BadRequest("YouTube URL is required".to_string()));
    }
    Ok(url)
}

async fn upload_song(
    session: Session,
    State(importer): State<GuardedSongImporter>,
    Json(body): Json<YoutubeUrlBody>,
) -> ApiResult<Response> {
    let url = require_youtube_url(&body)?;
    info!("User {} uploading {}", session.user_id, url);
    let song = importer.import(url).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Song uploaded successfully",
            "song": song,
        })),
    )
        .into_response())
}

async fn test_mood_detection(
    State(importer): State<GuardedSongImporter>,
    Json(body): Json<YoutubeUrlBody>,
) -> ApiResult<Json<VideoAnalysis>> {
    let url = require_youtube_url(&body)?;
    Ok(Json(importer.analyze(url).await?))
}

async fn classify(
    State(classifier): State<GuardedMoodClassifier>,
    Json(body): Json<ClassifyBody>,
) -> ApiResult<Json<ClassifyResponse>> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    let mood = classifier.classify(&body.title, body.description.as_deref(), &body.tags);
    Ok(Json(ClassifyResponse {
        mood: mood.to_string(),
        clean_title: normalize(&body.title),
    }))
}

// Favorites

async fn get_favorites(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(user_id): Path<usize>,
) -> ApiResult<Json<Vec<Song>>> {
    session.require_user(user_id)?;
    Ok(Json(user_manager.get_favorites(user_id)?))
}

async fn add_favorite(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(user_id): Path<usize>,
    Json(body): Json<SongIdBody>,
) -> ApiResult<Response> {
    session.require_user(user_id)?;
    let song_id = require_song_id(body.song_id)?;
    user_manager.add_favorite(user_id, song_id)?;
    Ok((StatusCode::CREATED, message("Song added to favorites")).into_response())
}

async fn remove_favorite(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path((user_id, song_id)): Path<(usize, usize)>,
) -> ApiResult<Json<serde_json::Value>> {
    session.require_user(user_id)?;
    user_manager.remove_favorite(user_id, song_id)?;
    Ok(message("Song removed from favorites"))
}

// Playlists

async fn get_user_playlists(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(user_id): Path<usize>,
) -> ApiResult<Json<Vec<PlaylistSummary>>> {
    session.require_user(user_id)?;
    Ok(Json(user_manager.get_playlists(user_id)?))
}

async fn create_playlist(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(user_id): Path<usize>,
    Json(body): Json<CreatePlaylistBody>,
) -> ApiResult<Response> {
    session.require_user(user_id)?;
    let playlist = user_manager.create_playlist(user_id, &body.playlist_name)?;
    debug!("Created playlist {} for user {}", playlist.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Playlist created successfully",
            "playlist": playlist,
        })),
    )
        .into_response())
}

async fn get_playlist(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(playlist_id): Path<usize>,
) -> ApiResult<Json<PlaylistWithSongs>> {
    Ok(Json(
        user_manager.get_playlist(session.user_id, playlist_id)?,
    ))
}

async fn delete_playlist(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(playlist_id): Path<usize>,
) -> ApiResult<Json<serde_json::Value>> {
    user_manager.delete_playlist(session.user_id, playlist_id)?;
    Ok(message("Playlist deleted successfully"))
}

async fn add_playlist_song(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(playlist_id): Path<usize>,
    Json(body): Json<SongIdBody>,
) -> ApiResult<Response> {
    let song_id = require_song_id(body.song_id)?;
    user_manager.add_song_to_playlist(session.user_id, playlist_id, song_id)?;
    Ok((StatusCode::CREATED, message("Song added to playlist")).into_response())
}

async fn remove_playlist_song(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path((playlist_id, song_id)): Path<(usize, usize)>,
) -> ApiResult<Json<serde_json::Value>> {
    user_manager.remove_song_from_playlist(session.user_id, playlist_id, song_id)?;
    Ok(message("Song removed from playlist"))
}

// Listening history

async fn get_history(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    Path(user_id): Path<usize>,
) -> ApiResult<Json<Vec<HistoryItem>>> {
    session.require_user(user_id)?;
    Ok(Json(user_manager.get_history(user_id, HISTORY_LIMIT)?))
}

fn record_play(
    user_manager: &UserManager,
    catalog: &dyn CatalogStore,
    user_id: usize,
    event: &ListeningEvent,
) -> ApiResult<serde_json::Value> {
    let id = user_manager.record_play(user_id, event)?;
    let song_title = catalog
        .get_song(event.song_id)?
        .map(|song| song.title)
        .unwrap_or_default();
    Ok(json!({
        "message": "Added to listening history",
        "id": id,
        "song_title": song_title,
        "play_duration": event.play_duration_sec,
        "completed": event.completed,
    }))
}

async fn add_history(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    State(catalog): State<GuardedCatalogStore>,
    Path(user_id): Path<usize>,
    Json(body): Json<SongIdBody>,
) -> ApiResult<Response> {
    session.require_user(user_id)?;
    let event = ListeningEvent {
        song_id: require_song_id(body.song_id)?,
        play_duration_sec: 0,
        completed: false,
    };
    let response = record_play(&user_manager, catalog.as_ref(), user_id, &event)?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

async fn post_listening_history(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    State(catalog): State<GuardedCatalogStore>,
    Json(body): Json<ListeningHistoryBody>,
) -> ApiResult<Response> {
    let (user_id, song_id) = match (body.user_id, body.song_id) {
        (Some(user_id), Some(song_id)) => (user_id, song_id),
        _ => {
            return Err(ApiError::BadRequest(
                "User ID and Song ID are required".to_string(),
            ))
        }
    };
    session.require_user(user_id)?;
    let event = ListeningEvent {
        song_id,
        play_duration_sec: body.play_duration,
        completed: body.completed,
    };
    let response = record_play(&user_manager, catalog.as_ref(), user_id, &event)?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

// Recommendations

async fn recommend_songs(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path(user_id): Path<usize>,
    Query(query): Query<WeatherQuery>,
) -> ApiResult<Json<Vec<Song>>> {
    session.require_user(user_id)?;
    let weather = query.weather.as_deref().unwrap_or(DEFAULT_WEATHER);
    Ok(Json(recommend(catalog.as_ref(), weather)?))
}

impl ServerState {
    fn new(
        config: ServerConfig,
        catalog_store: Arc<dyn CatalogStore>,
        user_store: Arc<dyn FullUserStore>,
        video_provider: Arc<dyn VideoProvider>,
    ) -> ServerState {
        let classifier = Arc::new(MoodClassifier::default());
        let user_manager = Arc::new(UserManager::new(catalog_store.clone(), user_store));
        let song_importer = Arc::new(SongImporter::new(
            video_provider,
            catalog_store.clone(),
            classifier.clone(),
        ));
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            user_manager,
            song_importer,
            classifier,
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: Arc<dyn CatalogStore>,
    user_store: Arc<dyn FullUserStore>,
    video_provider: Arc<dyn VideoProvider>,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), catalog_store, user_store, video_provider);

    let auth_routes: Router = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .with_state(state.clone());

    let song_routes: Router = Router::new()
        .route("/songs", get(get_songs))
        .route("/songs/{id}", get(get_song))
        .route("/search", get(search_songs))
        .route("/upload-song", post(upload_song))
        .route("/test-mood-detection", post(test_mood_detection))
        .route("/classify", post(classify))
        .route("/health", get(health))
        .with_state(state.clone());

    let user_routes: Router = Router::new()
        .route("/users/{user_id}/favorites", get(get_favorites))
        .route("/users/{user_id}/favorites", post(add_favorite))
        .route(
            "/users/{user_id}/favorites/{song_id}",
            delete(remove_favorite),
        )
        .route("/users/{user_id}/playlists", get(get_user_playlists))
        .route("/users/{user_id}/playlists", post(create_playlist))
        .route("/playlists/{playlist_id}", get(get_playlist))
        .route("/playlists/{playlist_id}", delete(delete_playlist))
        .route("/playlists/{playlist_id}/songs", post(add_playlist_song))
        .route(
            "/playlists/{playlist_id}/songs/{song_id}",
            delete(remove_playlist_song),
        )
        .route("/users/{user_id}/history", get(get_history))
        .route("/users/{user_id}/history", post(add_history))
        .route("/listening-history", post(post_listening_history))
        .route("/recommend_songs/{user_id}", get(recommend_songs))
        .with_state(state.clone());

    let api_routes: Router = auth_routes.merge(song_routes).merge(user_routes);

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: Arc<dyn CatalogStore>,
    user_store: Arc<dyn FullUserStore>,
    video_provider: Arc<dyn VideoProvider>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_store, user_store, video_provider)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
