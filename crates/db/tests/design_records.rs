//! Integration tests for the design repository:
//! - create with metals, gems, files, and category links
//! - merge-by-key update keeps entries absent from the payload
//! - slot and extra-file replacement
//! - cascade delete of every dependent row

use pdm_db::models::category::CreateCategory;
use pdm_db::models::design::{CreateDesign, GemInput, MetalInput, NewFile, UpdateDesign};
use pdm_db::models::user::CreateUser;
use pdm_db::repositories::{CategoryRepo, DesignRepo, UserRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: "designer".to_string(),
            email: "designer@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 3,
            profile_pic: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn metal(name: &str, weight: i64) -> MetalInput {
    MetalInput {
        metal_name: name.to_string(),
        weight: Some(Decimal::from(weight)),
    }
}

fn file(name: &str, bytes: &[u8]) -> NewFile {
    NewFile {
        file_name: name.to_string(),
        mime_type: "application/octet-stream".to_string(),
        data: bytes.to_vec(),
    }
}

fn new_design(number: &str, author: i64) -> CreateDesign {
    CreateDesign {
        design_number: number.to_string(),
        design_image: None,
        price: Some(Decimal::new(125_000, 2)),
        description: Some("Solitaire ring".to_string()),
        design_dimensions: None,
        text_notes: None,
        author,
        metals: vec![metal("Gold", 10), metal("Silver", 5)],
        gems: vec![GemInput {
            gem: "Diamond".to_string(),
            shape: Some("Round".to_string()),
            size: None,
            count: Some(1),
            carat_per_gem: Some(Decimal::new(150, 2)),
            dimensions: None,
            setting: Some("Prong".to_string()),
        }],
        category_ids: vec![],
        cad_file: Some(file("ring.stl", b"solid ring")),
        model_sheet: None,
        other_files: vec![file("notes.txt", b"hello")],
    }
}

fn empty_update(modified_by: i64) -> UpdateDesign {
    UpdateDesign {
        design_image: None,
        price: None,
        description: None,
        design_dimensions: None,
        text_notes: None,
        modified_by,
        metals: vec![],
        gems: vec![],
        category_ids: None,
        cad_file: None,
        model_sheet: None,
        other_files: None,
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_fetch_detail(pool: PgPool) {
    let author = seed_user(&pool).await;
    let rings = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Rings".to_string(),
            category_type: "product_type".to_string(),
            parent_id: None,
        },
    )
    .await
    .unwrap()
    .category;

    let mut input = new_design("D-100", author);
    input.category_ids = vec![rings.id];
    let design = DesignRepo::create(&pool, &input).await.unwrap();
    assert_eq!(design.design_number, "D-100");
    assert_eq!(design.author, Some(author));
    assert_eq!(design.author_name.as_deref(), Some("designer"));

    let detail = DesignRepo::find_detail(&pool, "D-100").await.unwrap().unwrap();
    assert_eq!(detail.metals.len(), 2);
    assert_eq!(detail.gems.len(), 1);
    assert_eq!(detail.categories.len(), 1);
    assert_eq!(detail.categories[0].id, rings.id);

    let cad = detail.files.cad_file.expect("cad file metadata");
    assert_eq!(cad.file_name.as_deref(), Some("ring.stl"));
    assert_eq!(cad.size_bytes, 10);
    assert!(detail.files.model_sheet.is_none());
    assert_eq!(detail.files.other_files.len(), 1);

    assert!(DesignRepo::find_detail(&pool, "D-404").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_design_number_is_unique_violation(pool: PgPool) {
    let author = seed_user(&pool).await;
    DesignRepo::create(&pool, &new_design("D-1", author)).await.unwrap();

    let err = DesignRepo::create(&pool, &new_design("D-1", author))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_designs_design_number"));

    // The failed transaction left nothing behind.
    assert_eq!(count(&pool, "design_metals").await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_merges_metals_by_name(pool: PgPool) {
    let author = seed_user(&pool).await;
    DesignRepo::create(&pool, &new_design("D-100", author)).await.unwrap();

    let mut update = empty_update(author);
    update.metals = vec![metal("Gold", 12), metal("Platinum", 3)];
    let updated = DesignRepo::update(&pool, "D-100", &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Solitaire ring"));
    assert_eq!(updated.modified_by, Some(author));

    let metals = DesignRepo::metals_for(&pool, updated.id).await.unwrap();
    let weight = |name: &str| {
        metals
            .iter()
            .find(|m| m.metal_name == name)
            .and_then(|m| m.weight)
    };
    assert_eq!(metals.len(), 3);
    assert_eq!(weight("Gold"), Some(Decimal::from(12)));
    assert_eq!(weight("Silver"), Some(Decimal::from(5)));
    assert_eq!(weight("Platinum"), Some(Decimal::from(3)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_only_supplied_files(pool: PgPool) {
    let author = seed_user(&pool).await;
    DesignRepo::create(&pool, &new_design("D-7", author)).await.unwrap();

    let mut update = empty_update(author);
    update.model_sheet = Some(file("sheet.pdf", b"%PDF"));
    update.other_files = Some(vec![file("a.txt", b"a"), file("b.txt", b"b")]);
    update.price = Some(Decimal::new(99_900, 2));
    DesignRepo::update(&pool, "D-7", &update).await.unwrap().unwrap();

    let detail = DesignRepo::find_detail(&pool, "D-7").await.unwrap().unwrap();
    assert_eq!(detail.design.price, Some(Decimal::new(99_900, 2)));
    assert_eq!(
        detail.files.cad_file.unwrap().file_name.as_deref(),
        Some("ring.stl")
    );
    assert_eq!(
        detail.files.model_sheet.unwrap().file_name.as_deref(),
        Some("sheet.pdf")
    );
    let names: Vec<&str> = detail
        .files
        .other_files
        .iter()
        .map(|f| f.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);

    let sheet = DesignRepo::load_slot(&pool, "D-7", pdm_core::design::FileSlot::ModelSheet)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sheet.data.as_deref(), Some(&b"%PDF"[..]));

    let other_id = detail.files.other_files[0].id;
    let other = DesignRepo::load_other_file(&pool, "D-7", other_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(other.data.as_deref(), Some(&b"a"[..]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_design_returns_none(pool: PgPool) {
    let author = seed_user(&pool).await;
    let result = DesignRepo::update(&pool, "nope", &empty_update(author))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_to_dependents(pool: PgPool) {
    let author = seed_user(&pool).await;
    DesignRepo::create(&pool, &new_design("D-9", author)).await.unwrap();

    assert!(DesignRepo::delete(&pool, "D-9").await.unwrap());
    assert!(!DesignRepo::delete(&pool, "D-9").await.unwrap());

    for table in [
        "design_metals",
        "design_gems",
        "design_files",
        "design_other_files",
        "design_categories",
    ] {
        assert_eq!(count(&pool, table).await, 0, "{table} should be empty");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_author_keeps_design(pool: PgPool) {
    let author = seed_user(&pool).await;
    DesignRepo::create(&pool, &new_design("D-2", author)).await.unwrap();

    assert!(UserRepo::delete(&pool, author).await.unwrap());
    let design = DesignRepo::find_by_number(&pool, "D-2").await.unwrap().unwrap();
    assert!(design.author.is_none());
    assert!(design.author_name.is_none());
}
