//! Multipart form parsing for design and user submissions.
//!
//! Browsers submit designs as `multipart/form-data`: scalar fields as text
//! parts, the `metals` and `gems` collections as JSON-encoded text parts, and
//! attachments as file parts. Empty file parts (an unchosen file input) are
//! treated as absent.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use pdm_core::design::{
    validate_image_bytes, validate_image_content_type, PART_CAD_FILE, PART_DESIGN_IMAGE,
    PART_MODEL_SHEET, PART_OTHER_FILES,
};
use pdm_core::error::CoreError;
use pdm_core::media::FALLBACK_MIME;
use pdm_core::types::DbId;
use pdm_db::models::design::{GemInput, MetalInput, NewFile};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Design form
// ---------------------------------------------------------------------------

/// Every part a design create or update request may carry.
#[derive(Debug, Default)]
pub struct DesignForm {
    pub design_number: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub design_dimensions: Option<String>,
    pub text_notes: Option<String>,
    pub design_image: Option<Vec<u8>>,
    pub metals: Vec<MetalInput>,
    pub gems: Vec<GemInput>,
    /// `Some` as soon as a `category_ids` part is present, even if empty.
    pub category_ids: Option<Vec<DbId>>,
    pub cad_file: Option<NewFile>,
    pub model_sheet: Option<NewFile>,
    pub other_files: Vec<NewFile>,
}

impl DesignForm {
    /// Drain a multipart stream into a form, rejecting more than
    /// `max_other_files` extra files.
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_other_files: usize,
    ) -> AppResult<Self> {
        let mut form = DesignForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "design_number" => form.design_number = blank_to_none(field_text(field).await?),
                "description" => form.description = blank_to_none(field_text(field).await?),
                "design_dimensions" => {
                    form.design_dimensions = blank_to_none(field_text(field).await?)
                }
                "text_notes" => form.text_notes = blank_to_none(field_text(field).await?),
                "price" => form.price = parse_decimal("price", &field_text(field).await?)?,
                "metals" => form.metals = parse_json_list("metals", &field_text(field).await?)?,
                "gems" => form.gems = parse_json_list("gems", &field_text(field).await?)?,
                "category_ids" => {
                    let ids = parse_id_list(&field_text(field).await?)?;
                    form.category_ids.get_or_insert_with(Vec::new).extend(ids);
                }
                PART_DESIGN_IMAGE => form.design_image = field_image(field).await?,
                PART_CAD_FILE => form.cad_file = field_file(field).await?,
                PART_MODEL_SHEET => form.model_sheet = field_file(field).await?,
                PART_OTHER_FILES => {
                    if let Some(file) = field_file(field).await? {
                        if form.other_files.len() >= max_other_files {
                            return Err(AppError::BadRequest(format!(
                                "At most {max_other_files} other_files may be uploaded"
                            )));
                        }
                        form.other_files.push(file);
                    }
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }
}

// ---------------------------------------------------------------------------
// User form
// ---------------------------------------------------------------------------

/// Parts accepted by registration and user updates.
#[derive(Debug, Default)]
pub struct UserForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<DbId>,
    pub profile_pic: Option<Vec<u8>>,
}

impl UserForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = UserForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "username" => form.username = blank_to_none(field_text(field).await?),
                "email" => form.email = blank_to_none(field_text(field).await?),
                "password" => form.password = Some(field_text(field).await?),
                "role_id" | "roleid" => form.role_id = parse_id(&field_text(field).await?)?,
                "profile_pic" => form.profile_pic = field_image(field).await?,
                _ => {}
            }
        }

        Ok(form)
    }
}

// ---------------------------------------------------------------------------
// Part readers
// ---------------------------------------------------------------------------

async fn field_text(field: Field<'_>) -> AppResult<String> {
    Ok(field.text().await?)
}

/// Read a file part. Returns `None` for an empty part.
async fn field_file(field: Field<'_>) -> AppResult<Option<NewFile>> {
    let file_name = field
        .file_name()
        .or(field.name())
        .unwrap_or("upload")
        .to_string();
    let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();
    let data = field.bytes().await?;

    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(NewFile {
        file_name,
        mime_type,
        data: data.to_vec(),
    }))
}

/// Read an image part, checking both the declared type and the bytes.
async fn field_image(field: Field<'_>) -> AppResult<Option<Vec<u8>>> {
    let part = field.name().unwrap_or(PART_DESIGN_IMAGE).to_string();
    validate_image_content_type(&part, field.content_type())
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let Some(file) = field_file(field).await? else {
        return Ok(None);
    };
    validate_image_bytes(&part, &file.data)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    Ok(Some(file.data))
}

// ---------------------------------------------------------------------------
// Text parsers
// ---------------------------------------------------------------------------

/// Trim a text part; blank means "not supplied".
pub fn blank_to_none(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_decimal(part: &str, text: &str) -> AppResult<Option<Decimal>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<Decimal>().map(Some).map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "{part} must be a decimal number, got '{text}'"
        )))
    })
}

/// Parse a JSON array carried in a text part. Blank means an empty list.
pub fn parse_json_list<T: DeserializeOwned>(part: &str, text: &str) -> AppResult<Vec<T>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| {
        AppError::Core(CoreError::Validation(format!("Invalid {part} format: {e}")))
    })
}

fn parse_id(text: &str) -> AppResult<Option<DbId>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<DbId>().map(Some).map_err(|_| {
        AppError::Core(CoreError::Validation(format!("'{text}' is not a valid id")))
    })
}

/// Parse category ids given either as a JSON array (`[1,2]`) or as a
/// comma-separated list (`1,2`).
pub fn parse_id_list(text: &str) -> AppResult<Vec<DbId>> {
    let text = text.trim();
    if text.starts_with('[') {
        return parse_json_list("category_ids", text);
    }
    let mut ids = Vec::new();
    for piece in text.split(',') {
        if let Some(id) = parse_id(piece)? {
            ids.push(id);
        }
    }
    Ok(ids)
}
