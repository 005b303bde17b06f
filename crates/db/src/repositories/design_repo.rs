//! Repository for the `designs` table and its dependents
//! (`design_metals`, `design_gems`, `design_files`, `design_other_files`,
//! `design_categories`).

use pdm_core::design::FileSlot;
use pdm_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::Category;
use crate::models::design::{
    CreateDesign, Design, DesignDetail, DesignFiles, DesignFilesRow, GemEntry, GemInput,
    MetalEntry, MetalInput, NewFile, OtherFileMeta, StoredFile, UpdateDesign,
};

type PgTransaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Design columns qualified with the `d` alias, plus the author's username
/// from a `LEFT JOIN users u ON u.id = d.author`.
const COLUMNS: &str = "d.id, d.design_number, d.design_image, d.price, d.description, \
    d.design_dimensions, d.text_notes, d.author, u.username AS author_name, d.modified_by, \
    d.created_at, d.last_modified_at";

const METAL_COLUMNS: &str = "id, design_id, metal_name, weight";

const GEM_COLUMNS: &str =
    "id, design_id, gem, shape, size, count, carat_per_gem, dimensions, setting";

const CATEGORY_COLUMNS: &str =
    "c.id, c.name, c.type, c.parent_id, c.position, c.created_at, c.updated_at";

/// Provides CRUD operations for designs and their dependent rows.
pub struct DesignRepo;

impl DesignRepo {
    /// Insert a design with its metals, gems, files row, and category links
    /// in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateDesign) -> Result<Design, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO designs
                (design_number, design_image, price, description, design_dimensions,
                 text_notes, author, modified_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id",
        )
        .bind(&input.design_number)
        .bind(&input.design_image)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.design_dimensions)
        .bind(&input.text_notes)
        .bind(input.author)
        .fetch_one(&mut *tx)
        .await?;

        Self::upsert_metals(&mut tx, id, &input.metals).await?;
        Self::upsert_gems(&mut tx, id, &input.gems).await?;
        Self::upsert_files(&mut tx, id, input.cad_file.as_ref(), input.model_sheet.as_ref())
            .await?;
        Self::insert_other_files(&mut tx, id, &input.other_files).await?;
        Self::link_categories(&mut tx, id, &input.category_ids).await?;

        let design = Self::fetch_by_id(&mut tx, id).await?;
        tx.commit().await?;
        Ok(design)
    }

    /// List all designs, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Design>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM designs d LEFT JOIN users u ON u.id = d.author
             ORDER BY d.created_at DESC, d.id DESC"
        );
        sqlx::query_as::<_, Design>(&query).fetch_all(pool).await
    }

    /// Find a design by its business key.
    pub async fn find_by_number(
        pool: &PgPool,
        design_number: &str,
    ) -> Result<Option<Design>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM designs d LEFT JOIN users u ON u.id = d.author
             WHERE d.design_number = $1"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(design_number)
            .fetch_optional(pool)
            .await
    }

    /// Find a design by business key, enriched with all of its dependents.
    pub async fn find_detail(
        pool: &PgPool,
        design_number: &str,
    ) -> Result<Option<DesignDetail>, sqlx::Error> {
        let Some(design) = Self::find_by_number(pool, design_number).await? else {
            return Ok(None);
        };

        let metals = Self::metals_for(pool, design.id).await?;
        let gems = Self::gems_for(pool, design.id).await?;
        let categories = Self::categories_for(pool, design.id).await?;
        let files = DesignFiles::from_parts(
            Self::files_row(pool, design.id).await?,
            Self::other_files_meta(pool, design.id).await?,
        );

        Ok(Some(DesignDetail {
            design: design.into(),
            metals,
            gems,
            categories,
            files,
        }))
    }

    pub async fn metals_for(
        pool: &PgPool,
        design_id: DbId,
    ) -> Result<Vec<MetalEntry>, sqlx::Error> {
        let query =
            format!("SELECT {METAL_COLUMNS} FROM design_metals WHERE design_id = $1 ORDER BY id");
        sqlx::query_as::<_, MetalEntry>(&query)
            .bind(design_id)
            .fetch_all(pool)
            .await
    }

    pub async fn gems_for(pool: &PgPool, design_id: DbId) -> Result<Vec<GemEntry>, sqlx::Error> {
        let query =
            format!("SELECT {GEM_COLUMNS} FROM design_gems WHERE design_id = $1 ORDER BY id");
        sqlx::query_as::<_, GemEntry>(&query)
            .bind(design_id)
            .fetch_all(pool)
            .await
    }

    /// Categories linked to a design.
    pub async fn categories_for(
        pool: &PgPool,
        design_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS}
             FROM categories c
             JOIN design_categories dc ON dc.category_id = c.id
             WHERE dc.design_id = $1
             ORDER BY c.type, c.position, c.id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(design_id)
            .fetch_all(pool)
            .await
    }

    /// Slot metadata without the file bytes.
    pub async fn files_row(
        pool: &PgPool,
        design_id: DbId,
    ) -> Result<Option<DesignFilesRow>, sqlx::Error> {
        sqlx::query_as::<_, DesignFilesRow>(
            "SELECT cad_file_name, cad_file_mime, octet_length(cad_file)::BIGINT AS cad_file_size,
                    model_sheet_name, model_sheet_mime,
                    octet_length(model_sheet)::BIGINT AS model_sheet_size
             FROM design_files WHERE design_id = $1",
        )
        .bind(design_id)
        .fetch_optional(pool)
        .await
    }

    /// Metadata of every extra file, without the bytes.
    pub async fn other_files_meta(
        pool: &PgPool,
        design_id: DbId,
    ) -> Result<Vec<OtherFileMeta>, sqlx::Error> {
        sqlx::query_as::<_, OtherFileMeta>(
            "SELECT id, file_name, mime_type, octet_length(data)::BIGINT AS size_bytes, created_at
             FROM design_other_files WHERE design_id = $1
             ORDER BY id",
        )
        .bind(design_id)
        .fetch_all(pool)
        .await
    }

    /// Apply a partial update in one transaction.
    ///
    /// Returns `None` if no design has the given number.
    pub async fn update(
        pool: &PgPool,
        design_number: &str,
        input: &UpdateDesign,
    ) -> Result<Option<Design>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, DbId>(
            "UPDATE designs SET
                design_image = COALESCE($2, design_image),
                price = COALESCE($3, price),
                description = COALESCE($4, description),
                design_dimensions = COALESCE($5, design_dimensions),
                text_notes = COALESCE($6, text_notes),
                modified_by = $7,
                last_modified_at = NOW()
             WHERE design_number = $1
             RETURNING id",
        )
        .bind(design_number)
        .bind(&input.design_image)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.design_dimensions)
        .bind(&input.text_notes)
        .bind(input.modified_by)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            tx.rollback().await?;
            return Ok(None);
        };

        Self::upsert_metals(&mut tx, id, &input.metals).await?;
        Self::upsert_gems(&mut tx, id, &input.gems).await?;

        if input.cad_file.is_some() || input.model_sheet.is_some() {
            Self::upsert_files(&mut tx, id, input.cad_file.as_ref(), input.model_sheet.as_ref())
                .await?;
        }

        if let Some(ref other_files) = input.other_files {
            sqlx::query("DELETE FROM design_other_files WHERE design_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_other_files(&mut tx, id, other_files).await?;
        }

        if let Some(ref category_ids) = input.category_ids {
            sqlx::query("DELETE FROM design_categories WHERE design_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_categories(&mut tx, id, category_ids).await?;
        }

        let design = Self::fetch_by_id(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(design))
    }

    /// Delete a design; dependents are removed by the foreign-key cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, design_number: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM designs WHERE design_number = $1")
            .bind(design_number)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the bytes of a single-file slot.
    ///
    /// Returns `None` if the design does not exist; the returned file has
    /// `data = None` if the slot is empty.
    pub async fn load_slot(
        pool: &PgPool,
        design_number: &str,
        slot: FileSlot,
    ) -> Result<Option<StoredFile>, sqlx::Error> {
        let (data, name, mime) = match slot {
            FileSlot::CadFile => ("f.cad_file", "f.cad_file_name", "f.cad_file_mime"),
            FileSlot::ModelSheet => ("f.model_sheet", "f.model_sheet_name", "f.model_sheet_mime"),
        };
        let query = format!(
            "SELECT {name} AS file_name, {mime} AS mime_type, {data} AS data
             FROM designs d
             LEFT JOIN design_files f ON f.design_id = d.id
             WHERE d.design_number = $1"
        );
        sqlx::query_as::<_, StoredFile>(&query)
            .bind(design_number)
            .fetch_optional(pool)
            .await
    }

    /// Load one extra file belonging to a design.
    pub async fn load_other_file(
        pool: &PgPool,
        design_number: &str,
        file_id: DbId,
    ) -> Result<Option<StoredFile>, sqlx::Error> {
        sqlx::query_as::<_, StoredFile>(
            "SELECT f.file_name, f.mime_type, f.data
             FROM design_other_files f
             JOIN designs d ON d.id = f.design_id
             WHERE d.design_number = $1 AND f.id = $2",
        )
        .bind(design_number)
        .bind(file_id)
        .fetch_optional(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn fetch_by_id(tx: &mut PgTransaction<'_>, id: DbId) -> Result<Design, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM designs d LEFT JOIN users u ON u.id = d.author
             WHERE d.id = $1"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert or overwrite metal entries by `(design_id, metal_name)`.
    async fn upsert_metals(
        tx: &mut PgTransaction<'_>,
        design_id: DbId,
        metals: &[MetalInput],
    ) -> Result<(), sqlx::Error> {
        for metal in metals {
            sqlx::query(
                "INSERT INTO design_metals (design_id, metal_name, weight)
                 VALUES ($1, $2, $3)
                 ON CONFLICT ON CONSTRAINT uq_design_metals_design_metal
                 DO UPDATE SET weight = EXCLUDED.weight",
            )
            .bind(design_id)
            .bind(&metal.metal_name)
            .bind(metal.weight)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Insert or overwrite gem entries by `(design_id, gem)`.
    async fn upsert_gems(
        tx: &mut PgTransaction<'_>,
        design_id: DbId,
        gems: &[GemInput],
    ) -> Result<(), sqlx::Error> {
        for gem in gems {
            sqlx::query(
                "INSERT INTO design_gems
                    (design_id, gem, shape, size, count, carat_per_gem, dimensions, setting)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT ON CONSTRAINT uq_design_gems_design_gem
                 DO UPDATE SET
                    shape = EXCLUDED.shape,
                    size = EXCLUDED.size,
                    count = EXCLUDED.count,
                    carat_per_gem = EXCLUDED.carat_per_gem,
                    dimensions = EXCLUDED.dimensions,
                    setting = EXCLUDED.setting",
            )
            .bind(design_id)
            .bind(&gem.gem)
            .bind(&gem.shape)
            .bind(&gem.size)
            .bind(gem.count)
            .bind(gem.carat_per_gem)
            .bind(&gem.dimensions)
            .bind(&gem.setting)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Create the files row or replace only the supplied slots.
    async fn upsert_files(
        tx: &mut PgTransaction<'_>,
        design_id: DbId,
        cad_file: Option<&NewFile>,
        model_sheet: Option<&NewFile>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO design_files
                (design_id, cad_file, cad_file_name, cad_file_mime,
                 model_sheet, model_sheet_name, model_sheet_mime)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_design_files_design_id
             DO UPDATE SET
                cad_file = COALESCE(EXCLUDED.cad_file, design_files.cad_file),
                cad_file_name = COALESCE(EXCLUDED.cad_file_name, design_files.cad_file_name),
                cad_file_mime = COALESCE(EXCLUDED.cad_file_mime, design_files.cad_file_mime),
                model_sheet = COALESCE(EXCLUDED.model_sheet, design_files.model_sheet),
                model_sheet_name = COALESCE(EXCLUDED.model_sheet_name, design_files.model_sheet_name),
                model_sheet_mime = COALESCE(EXCLUDED.model_sheet_mime, design_files.model_sheet_mime)",
        )
        .bind(design_id)
        .bind(cad_file.map(|f| f.data.as_slice()))
        .bind(cad_file.map(|f| f.file_name.as_str()))
        .bind(cad_file.map(|f| f.mime_type.as_str()))
        .bind(model_sheet.map(|f| f.data.as_slice()))
        .bind(model_sheet.map(|f| f.file_name.as_str()))
        .bind(model_sheet.map(|f| f.mime_type.as_str()))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn insert_other_files(
        tx: &mut PgTransaction<'_>,
        design_id: DbId,
        files: &[NewFile],
    ) -> Result<(), sqlx::Error> {
        for file in files {
            sqlx::query(
                "INSERT INTO design_other_files (design_id, file_name, mime_type, data)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(design_id)
            .bind(&file.file_name)
            .bind(&file.mime_type)
            .bind(&file.data)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn link_categories(
        tx: &mut PgTransaction<'_>,
        design_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if category_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO design_categories (design_id, category_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(design_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
