//! Request payload validation.
//!
//! Every validator takes the raw JSON body and either returns the typed
//! payload or the first constraint it violates. Nothing here touches a store.

mod schema;

pub use schema::{FieldRule, FieldType, PayloadSchema, MIN_YEAR};

use crate::payload_field;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Content types accepted for album covers.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/webp",
];

#[derive(Debug)]
pub enum ValidationError {
    NotAnObject,
    MissingField { field: &'static str },
    UnknownField { field: String },
    EmptyField { field: &'static str },
    NotAString { field: &'static str },
    NotANumber { field: &'static str },
    NotAnInteger { field: &'static str },
    BelowMinimum { field: &'static str, min: i64 },
    AboveMaximum { field: &'static str, max: i64 },
    InvalidEmail { field: &'static str },
    UnsupportedImageType { content_type: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject => write!(f, "\"value\" must be of type object"),
            ValidationError::MissingField { field } => write!(f, "\"{}\" is required", field),
            ValidationError::UnknownField { field } => write!(f, "\"{}\" is not allowed", field),
            ValidationError::EmptyField { field } => {
                write!(f, "\"{}\" is not allowed to be empty", field)
            }
            ValidationError::NotAString { field } => write!(f, "\"{}\" must be a string", field),
            ValidationError::NotANumber { field } => write!(f, "\"{}\" must be a number", field),
            ValidationError::NotAnInteger { field } => {
                write!(f, "\"{}\" must be an integer", field)
            }
            ValidationError::BelowMinimum { field, min } => {
                write!(f, "\"{}\" must be greater than or equal to {}", field, min)
            }
            ValidationError::AboveMaximum { field, max } => {
                write!(f, "\"{}\" must be less than or equal to {}", field, max)
            }
            ValidationError::InvalidEmail { field } => {
                write!(f, "\"{}\" must be a valid email", field)
            }
            ValidationError::UnsupportedImageType { content_type } => write!(
                f,
                "\"content-type\" must be one of [{}], got {}",
                ALLOWED_IMAGE_TYPES.join(", "),
                content_type
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

const ALBUM_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[
        payload_field!("name", FieldType::String),
        payload_field!("year", FieldType::Year),
    ],
};

const SONG_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[
        payload_field!("title", FieldType::String),
        payload_field!("year", FieldType::Year),
        payload_field!("genre", FieldType::String),
        payload_field!("performer", FieldType::String),
        payload_field!("duration", FieldType::Integer, required = false),
        payload_field!("albumId", FieldType::String, required = false),
    ],
};

const USER_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[
        payload_field!("username", FieldType::String),
        payload_field!("password", FieldType::String),
        payload_field!("fullname", FieldType::String),
    ],
};

const LOGIN_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[
        payload_field!("username", FieldType::String),
        payload_field!("password", FieldType::String),
    ],
};

const REFRESH_TOKEN_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[payload_field!("refreshToken", FieldType::String)],
};

const PLAYLIST_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[payload_field!("name", FieldType::String)],
};

const PLAYLIST_SONG_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[payload_field!("songId", FieldType::String)],
};

const COLLABORATION_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[
        payload_field!("playlistId", FieldType::String),
        payload_field!("userId", FieldType::String),
    ],
};

const EXPORT_SCHEMA: PayloadSchema = PayloadSchema {
    fields: &[payload_field!("targetEmail", FieldType::Email)],
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AlbumPayload {
    pub name: String,
    pub year: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SongPayload {
    pub title: String,
    pub year: i64,
    pub genre: String,
    pub performer: String,
    pub duration: Option<i64>,
    pub album_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub username: String,
    pub password: String,
    pub fullname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenPayload {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongPayload {
    pub song_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationPayload {
    pub playlist_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub target_email: String,
}

fn validate_into<T: DeserializeOwned>(schema: &PayloadSchema, payload: Value) -> ValidationResult<T> {
    schema.validate(&payload)?;
    // Field types are already pinned by the schema.
    serde_json::from_value(payload).map_err(|_| ValidationError::NotAnObject)
}

pub fn validate_album_payload(payload: Value) -> ValidationResult<AlbumPayload> {
    validate_into(&ALBUM_SCHEMA, payload)
}

pub fn validate_song_payload(payload: Value) -> ValidationResult<SongPayload> {
    validate_into(&SONG_SCHEMA, payload)
}

pub fn validate_user_payload(payload: Value) -> ValidationResult<UserPayload> {
    validate_into(&USER_SCHEMA, payload)
}

pub fn validate_login_payload(payload: Value) -> ValidationResult<LoginPayload> {
    validate_into(&LOGIN_SCHEMA, payload)
}

pub fn validate_refresh_token_payload(payload: Value) -> ValidationResult<RefreshTokenPayload> {
    validate_into(&REFRESH_TOKEN_SCHEMA, payload)
}

pub fn validate_playlist_payload(payload: Value) -> ValidationResult<PlaylistPayload> {
    validate_into(&PLAYLIST_SCHEMA, payload)
}

pub fn validate_playlist_song_payload(payload: Value) -> ValidationResult<PlaylistSongPayload> {
    validate_into(&PLAYLIST_SONG_SCHEMA, payload)
}

pub fn validate_collaboration_payload(payload: Value) -> ValidationResult<CollaborationPayload> {
    validate_into(&COLLABORATION_SCHEMA, payload)
}

pub fn validate_export_payload(payload: Value) -> ValidationResult<ExportPayload> {
    validate_into(&EXPORT_SCHEMA, payload)
}

/// Checks the declared content type of an uploaded cover.
pub fn validate_image_content_type(content_type: Option<&str>) -> ValidationResult<()> {
    let content_type = content_type.unwrap_or_default();
    if ALLOWED_IMAGE_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedImageType {
            content_type: content_type.to_string(),
        })
    }
}
