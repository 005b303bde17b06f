//! Handlers for design records and their attachments.
//!
//! Create and update accept `multipart/form-data` (see
//! [`crate::multipart::DesignForm`]); reads return JSON with the design image
//! as a `data:` URI and file metadata only. File bytes are served by the
//! dedicated download endpoints.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use pdm_core::design::{merge_by_key, validate_design_number, validate_entry_key, FileSlot};
use pdm_core::error::CoreError;
use pdm_core::media::FALLBACK_MIME;
use pdm_core::types::DbId;
use pdm_db::models::design::{
    CreateDesign, DesignDetail, DesignResponse, GemInput, MetalInput, StoredFile, UpdateDesign,
};
use pdm_db::repositories::DesignRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppMultipart, AppPath};
use crate::middleware::rbac::{Authorized, DesignCreate, DesignDelete, DesignRead, DesignUpdate};
use crate::multipart::DesignForm;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/designs
///
/// Newest first.
pub async fn list_designs(
    State(state): State<AppState>,
    _user: Authorized<DesignRead>,
) -> AppResult<Json<DataResponse<Vec<DesignResponse>>>> {
    let designs = DesignRepo::list(&state.pool).await?;
    let data = designs.into_iter().map(DesignResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/designs
pub async fn create_design(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<DesignCreate>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<(StatusCode, Json<DataResponse<DesignDetail>>)> {
    let form = DesignForm::from_multipart(multipart, state.config.max_other_files).await?;

    let design_number = form.design_number.ok_or_else(|| {
        AppError::Core(CoreError::Validation("design_number is required".into()))
    })?;
    validate_design_number(&design_number)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let (metals, gems) = prepare_entries(form.metals, form.gems)?;

    if DesignRepo::find_by_number(&state.pool, &design_number)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Design '{design_number}' already exists"
        ))));
    }

    let input = CreateDesign {
        design_number,
        design_image: form.design_image,
        price: form.price,
        description: form.description,
        design_dimensions: form.design_dimensions,
        text_notes: form.text_notes,
        author: user.user_id,
        metals,
        gems,
        category_ids: form.category_ids.unwrap_or_default(),
        cad_file: form.cad_file,
        model_sheet: form.model_sheet,
        other_files: form.other_files,
    };
    let design = DesignRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        design_id = design.id,
        design_number = %design.design_number,
        "Design created"
    );

    let detail = load_detail(&state, &design.design_number).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/designs/{design_number}
pub async fn get_design(
    State(state): State<AppState>,
    _user: Authorized<DesignRead>,
    AppPath(design_number): AppPath<String>,
) -> AppResult<Json<DataResponse<DesignDetail>>> {
    let detail = load_detail(&state, &design_number).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/designs/{design_number}
///
/// Omitted scalar parts keep their stored values. Metals and gems are merged
/// by name: supplied entries overwrite or add, absent entries stay.
/// `category_ids` replaces the set when present; `other_files` replaces the
/// set when at least one file is uploaded.
pub async fn update_design(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<DesignUpdate>,
    AppPath(design_number): AppPath<String>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<Json<DataResponse<DesignDetail>>> {
    let form = DesignForm::from_multipart(multipart, state.config.max_other_files).await?;
    let (metals, gems) = prepare_entries(form.metals, form.gems)?;

    let other_files = if form.other_files.is_empty() {
        None
    } else {
        Some(form.other_files)
    };

    let input = UpdateDesign {
        design_image: form.design_image,
        price: form.price,
        description: form.description,
        design_dimensions: form.design_dimensions,
        text_notes: form.text_notes,
        modified_by: user.user_id,
        metals,
        gems,
        category_ids: form.category_ids,
        cad_file: form.cad_file,
        model_sheet: form.model_sheet,
        other_files,
    };
    let design = DesignRepo::update(&state.pool, &design_number, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Design", &design_number)))?;

    tracing::info!(
        user_id = user.user_id,
        design_id = design.id,
        design_number = %design_number,
        "Design updated"
    );

    let detail = load_detail(&state, &design_number).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/designs/{design_number}
pub async fn delete_design(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<DesignDelete>,
    AppPath(design_number): AppPath<String>,
) -> AppResult<StatusCode> {
    if !DesignRepo::delete(&state.pool, &design_number).await? {
        return Err(AppError::Core(CoreError::not_found("Design", &design_number)));
    }

    tracing::info!(user_id = user.user_id, design_number = %design_number, "Design deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

/// GET /api/v1/designs/{design_number}/files/{slot}
///
/// `slot` is `cad_file` or `model_sheet`.
pub async fn download_slot(
    State(state): State<AppState>,
    _user: Authorized<DesignRead>,
    AppPath((design_number, slot)): AppPath<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let slot = FileSlot::from_path_segment(&slot).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown file slot '{slot}', expected cad_file or model_sheet"
        ))
    })?;

    let stored = DesignRepo::load_slot(&state.pool, &design_number, slot)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Design", &design_number)))?;

    attachment(stored, slot.as_str()).ok_or_else(|| {
        AppError::Core(CoreError::not_found(
            "File",
            format!("{design_number}/{}", slot.as_str()),
        ))
    })
}

/// GET /api/v1/designs/{design_number}/files/other/{file_id}
pub async fn download_other_file(
    State(state): State<AppState>,
    _user: Authorized<DesignRead>,
    AppPath((design_number, file_id)): AppPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let not_found = || AppError::Core(CoreError::not_found("File", file_id));

    let stored = DesignRepo::load_other_file(&state.pool, &design_number, file_id)
        .await?
        .ok_or_else(not_found)?;
    attachment(stored, "download").ok_or_else(not_found)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(state: &AppState, design_number: &str) -> AppResult<DesignDetail> {
    DesignRepo::find_detail(&state.pool, design_number)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Design", design_number)))
}

/// Validate entry names and collapse duplicates within one payload.
fn prepare_entries(
    metals: Vec<MetalInput>,
    gems: Vec<GemInput>,
) -> AppResult<(Vec<MetalInput>, Vec<GemInput>)> {
    for metal in &metals {
        validate_entry_key("metal", &metal.metal_name)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    for gem in &gems {
        validate_entry_key("gem", &gem.gem)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let metals = metals
        .into_iter()
        .map(|m| MetalInput {
            metal_name: m.metal_name.trim().to_string(),
            ..m
        })
        .collect();
    let gems = gems
        .into_iter()
        .map(|g| GemInput {
            gem: g.gem.trim().to_string(),
            ..g
        })
        .collect();

    Ok((
        merge_by_key(metals, |m: &MetalInput| m.metal_name.clone()),
        merge_by_key(gems, |g: &GemInput| g.gem.clone()),
    ))
}

/// Build an attachment response. `None` when the stored slot is empty.
fn attachment(
    stored: StoredFile,
    fallback_name: &str,
) -> Option<([(header::HeaderName, String); 2], Vec<u8>)> {
    let data = stored.data?;
    let mime_type = stored
        .mime_type
        .filter(|m| header::HeaderValue::from_str(m).is_ok())
        .unwrap_or_else(|| FALLBACK_MIME.to_string());
    let file_name = sanitize_file_name(stored.file_name.as_deref().unwrap_or(fallback_name));

    Some((
        [
            (header::CONTENT_TYPE, mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        data,
    ))
}

/// Reduce a stored file name to characters safe inside a quoted header value.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}
