use std::env;

use anyhow::{Context, Result};
use regex::Regex;

/// Unsigned-upload credentials for the image CDN. Optional: without them
/// the picture upload endpoint reports the hosting as unavailable.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    /// Symmetric secret the auth provider signs access tokens with.
    pub supabase_jwt_secret: String,
    pub storage_bucket: String,
    pub cloudinary: Option<CloudinaryConfig>,
    /// Extra signup restriction on top of plain email syntax, e.g.
    /// `^[0-9]{3}g[0-9]a[0-9]{4}@srit\.ac\.in$`. Unset means any address.
    pub campus_email_pattern: Option<Regex>,
    pub allowed_origins: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL not set")?
            .trim()
            .trim_end_matches('/')
            .to_string();
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .context("SUPABASE_ANON_KEY not set")?
            .trim()
            .to_string();
        let supabase_service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .context("SUPABASE_SERVICE_ROLE_KEY not set")?
            .trim()
            .to_string();
        let supabase_jwt_secret = env::var("SUPABASE_JWT_SECRET")
            .context("SUPABASE_JWT_SECRET not set")?
            .trim()
            .to_string();

        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "documents".to_string());

        let cloudinary = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_UPLOAD_PRESET"),
        ) {
            (Ok(cloud_name), Ok(upload_preset)) => Some(CloudinaryConfig {
                cloud_name: cloud_name.trim().to_string(),
                upload_preset: upload_preset.trim().to_string(),
            }),
            _ => None,
        };

        let campus_email_pattern = match env::var("CAMPUS_EMAIL_PATTERN") {
            Ok(raw) => Some(
                Regex::new(raw.trim()).context("CAMPUS_EMAIL_PATTERN is not a valid regex")?,
            ),
            Err(_) => None,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a number")?;

        Ok(AppConfig {
            supabase_url,
            supabase_anon_key,
            supabase_service_role_key,
            supabase_jwt_secret,
            storage_bucket,
            cloudinary,
            campus_email_pattern,
            allowed_origins,
            port,
        })
    }
}
