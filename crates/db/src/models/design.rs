//! Design model, child entries (metals, gems, files), and DTOs.

use pdm_core::media::image_data_uri;
use pdm_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;

// ---------------------------------------------------------------------------
// Design
// ---------------------------------------------------------------------------

/// A row from the `designs` table joined with the author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Design {
    pub id: DbId,
    pub design_number: String,
    pub design_image: Option<Vec<u8>>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub design_dimensions: Option<String>,
    pub text_notes: Option<String>,
    pub author: Option<DbId>,
    pub author_name: Option<String>,
    pub modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub last_modified_at: Timestamp,
}

/// JSON shape of a design, with the image embedded as a `data:` URI.
#[derive(Debug, Clone, Serialize)]
pub struct DesignResponse {
    pub id: DbId,
    pub design_number: String,
    pub design_image: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub design_dimensions: Option<String>,
    pub text_notes: Option<String>,
    pub author: Option<DbId>,
    pub author_name: Option<String>,
    pub modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub last_modified_at: Timestamp,
}

impl From<Design> for DesignResponse {
    fn from(d: Design) -> Self {
        DesignResponse {
            id: d.id,
            design_image: image_data_uri(d.design_image.as_deref()),
            design_number: d.design_number,
            price: d.price,
            description: d.description,
            design_dimensions: d.design_dimensions,
            text_notes: d.text_notes,
            author: d.author,
            author_name: d.author_name,
            modified_by: d.modified_by,
            created_at: d.created_at,
            last_modified_at: d.last_modified_at,
        }
    }
}

/// A design with all of its dependents, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DesignDetail {
    #[serde(flatten)]
    pub design: DesignResponse,
    pub metals: Vec<MetalEntry>,
    pub gems: Vec<GemEntry>,
    pub categories: Vec<Category>,
    pub files: DesignFiles,
}

// ---------------------------------------------------------------------------
// Metals and gems
// ---------------------------------------------------------------------------

/// A row from `design_metals`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MetalEntry {
    pub id: DbId,
    pub design_id: DbId,
    pub metal_name: String,
    pub weight: Option<Decimal>,
}

/// Metal entry as submitted by clients. Natural key: `metal_name`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetalInput {
    pub metal_name: String,
    #[serde(default, alias = "metal_weight")]
    pub weight: Option<Decimal>,
}

/// A row from `design_gems`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GemEntry {
    pub id: DbId,
    pub design_id: DbId,
    pub gem: String,
    pub shape: Option<String>,
    pub size: Option<String>,
    pub count: Option<i32>,
    pub carat_per_gem: Option<Decimal>,
    pub dimensions: Option<String>,
    pub setting: Option<String>,
}

/// Gem entry as submitted by clients. Natural key: `gem`.
#[derive(Debug, Clone, Deserialize)]
pub struct GemInput {
    pub gem: String,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub count: Option<i32>,
    #[serde(default)]
    pub carat_per_gem: Option<Decimal>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub setting: Option<String>,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// An uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Metadata for a single-slot attachment (`cad_file`, `model_sheet`).
#[derive(Debug, Clone, Serialize)]
pub struct FileMeta {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: i64,
}

/// Metadata row from `design_other_files` (bytes excluded).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OtherFileMeta {
    pub id: DbId,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: Timestamp,
}

/// Slot metadata row from `design_files` (bytes excluded).
#[derive(Debug, Clone, FromRow)]
pub struct DesignFilesRow {
    pub cad_file_name: Option<String>,
    pub cad_file_mime: Option<String>,
    pub cad_file_size: Option<i64>,
    pub model_sheet_name: Option<String>,
    pub model_sheet_mime: Option<String>,
    pub model_sheet_size: Option<i64>,
}

/// All attachment metadata of a design.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DesignFiles {
    pub cad_file: Option<FileMeta>,
    pub model_sheet: Option<FileMeta>,
    pub other_files: Vec<OtherFileMeta>,
}

impl DesignFiles {
    pub fn from_parts(row: Option<DesignFilesRow>, other_files: Vec<OtherFileMeta>) -> Self {
        let (cad_file, model_sheet) = match row {
            Some(r) => (
                r.cad_file_size.map(|size_bytes| FileMeta {
                    file_name: r.cad_file_name,
                    mime_type: r.cad_file_mime,
                    size_bytes,
                }),
                r.model_sheet_size.map(|size_bytes| FileMeta {
                    file_name: r.model_sheet_name,
                    mime_type: r.model_sheet_mime,
                    size_bytes,
                }),
            ),
            None => (None, None),
        };
        DesignFiles {
            cad_file,
            model_sheet,
            other_files,
        }
    }
}

/// A stored file loaded for download.
#[derive(Debug, Clone, FromRow)]
pub struct StoredFile {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub data: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Everything needed to create a design and its dependents in one transaction.
#[derive(Debug, Clone)]
pub struct CreateDesign {
    pub design_number: String,
    pub design_image: Option<Vec<u8>>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub design_dimensions: Option<String>,
    pub text_notes: Option<String>,
    pub author: DbId,
    pub metals: Vec<MetalInput>,
    pub gems: Vec<GemInput>,
    pub category_ids: Vec<DbId>,
    pub cad_file: Option<NewFile>,
    pub model_sheet: Option<NewFile>,
    pub other_files: Vec<NewFile>,
}

/// A partial update. `None` keeps the stored value.
///
/// Metals and gems are merged by natural key; stored entries that are absent
/// from the payload are kept. `category_ids` and `other_files`, when present,
/// replace the stored set.
#[derive(Debug, Clone)]
pub struct UpdateDesign {
    pub design_image: Option<Vec<u8>>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub design_dimensions: Option<String>,
    pub text_notes: Option<String>,
    pub modified_by: DbId,
    pub metals: Vec<MetalInput>,
    pub gems: Vec<GemInput>,
    pub category_ids: Option<Vec<DbId>>,
    pub cad_file: Option<NewFile>,
    pub model_sheet: Option<NewFile>,
    pub other_files: Option<Vec<NewFile>>,
}
