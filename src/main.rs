use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use reqwest::Client;

use qhive_be::config::AppConfig;
use qhive_be::handlers::auth_handlers::{change_password, delete_account, login, signup};
use qhive_be::handlers::comment_handlers::{add_comment, list_comments};
use qhive_be::handlers::health_handlers::healthz;
use qhive_be::handlers::like_handlers::toggle_like;
use qhive_be::handlers::post_handlers::{create_post, delete_post, get_feed, get_filter_options};
use qhive_be::handlers::profile_handlers::{get_profile, update_profile};
use qhive_be::handlers::profile_picture_handlers::{skip_profile_picture, upload_profile_picture};
use qhive_be::repositories::{
    BlobStore, CommentRepository, CommentStore, LikeRepository, LikeStore, PostRepository,
    PostStore, StorageRepository, Supabase, UserRepository, UserStore,
};
use qhive_be::services::{
    AuthService, CommentService, FeedService, LikeService, PostService, ProfileService,
};
use qhive_be::AppState;

fn mask_key(k: &str) -> String {
    if k.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        format!("{}***{}", &k[..4], &k[k.len() - 4..])
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {:#}", err);
            std::process::exit(1);
        }
    };

    info!("Supabase URL: {}", config.supabase_url);
    info!(
        "Supabase Key: {}",
        mask_key(&config.supabase_service_role_key)
    );

    let http_client = Client::builder()
        .user_agent("qhive-be/0.1")
        .build()
        .expect("failed to build http client");

    let supabase = Supabase::new(
        http_client.clone(),
        &config.supabase_url,
        &config.supabase_anon_key,
        &config.supabase_service_role_key,
    );

    let posts: Arc<dyn PostStore> = Arc::new(PostRepository::new(supabase.clone()));
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(supabase.clone()));
    let likes: Arc<dyn LikeStore> = Arc::new(LikeRepository::new(supabase.clone()));
    let comments: Arc<dyn CommentStore> = Arc::new(CommentRepository::new(supabase.clone()));
    let blobs: Arc<dyn BlobStore> = Arc::new(StorageRepository::new(
        supabase.clone(),
        &config.storage_bucket,
    ));

    let state = web::Data::new(AppState {
        feed: Arc::new(FeedService::new(
            posts.clone(),
            users.clone(),
            likes.clone(),
            comments.clone(),
        )),
        likes: Arc::new(LikeService::new(likes.clone())),
        comments: Arc::new(CommentService::new(comments.clone())),
        posts: Arc::new(PostService::new(posts.clone(), blobs.clone())),
        profile: Arc::new(ProfileService::new(
            users.clone(),
            posts.clone(),
            likes.clone(),
            comments.clone(),
            blobs.clone(),
            http_client.clone(),
            config.cloudinary.clone(),
        )),
        http_client: http_client.clone(),
        supabase_url: config.supabase_url.clone(),
        supabase_anon_key: config.supabase_anon_key.clone(),
    });

    let auth_data = web::Data::new(AuthService::new(
        http_client.clone(),
        &config.supabase_url,
        &config.supabase_anon_key,
        &config.supabase_service_role_key,
    ));

    let allowed_origins = config.allowed_origins.clone();
    let bind_address = format!("0.0.0.0:{}", config.port);
    let config_data = web::Data::new(config);

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_data.clone())
            .app_data(config_data.clone())
            .service(
                web::scope("/auth")
                    .service(signup) // POST /auth/signup
                    .service(login) // POST /auth/login
                    .service(change_password) // PUT /auth/password
                    .service(delete_account), // DELETE /auth/account
            )
            .service(
                web::scope("/api/profile-picture")
                    .service(upload_profile_picture) // POST /api/profile-picture/upload
                    .service(skip_profile_picture), // POST /api/profile-picture/skip
            )
            .service(
                web::scope("/api")
                    .service(get_feed) // GET /api/posts
                    .service(create_post) // POST /api/posts
                    .service(toggle_like) // POST /api/posts/{id}/like
                    .service(list_comments) // GET /api/posts/{id}/comments
                    .service(add_comment) // POST /api/posts/{id}/comments
                    .service(delete_post) // DELETE /api/posts/{id}
                    .service(get_filter_options) // GET /api/filters
                    .service(get_profile) // GET /api/profile
                    .service(update_profile), // PUT /api/profile
            )
            .service(healthz) // GET /healthz
    })
    .bind(&bind_address)?
    .run()
    .await
}
