use pdm_db::models::user::{CreateUser, UpdateUser};
use pdm_db::repositories::UserRepo;
use sqlx::PgPool;

fn new_user(email: &str, role_id: i64) -> CreateUser {
    CreateUser {
        username: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role_id,
        profile_pic: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_crud(pool: PgPool) {
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 0);

    let user = UserRepo::create(&pool, &new_user("ana@example.com", 4)).await.unwrap();
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);

    let with_role = UserRepo::find_with_role_by_email(&pool, "ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(with_role.role_name, "salesperson");
    assert_eq!(with_role.user.id, user.id);

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            role_id: Some(2),
            profile_pic: Some(vec![0x89, b'P', b'N', b'G']),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.role_id, 2);
    assert_eq!(updated.username, "ana");

    // Omitting the picture keeps the stored one.
    let kept = UserRepo::update(&pool, user.id, &UpdateUser::default())
        .await
        .unwrap()
        .unwrap();
    assert!(kept.profile_pic.is_some());

    let listed = UserRepo::list_with_roles(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].role_name, "manager");

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com", 3)).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("dup@example.com", 3))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_users_email")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_first_only_on_empty_table(pool: PgPool) {
    let first = UserRepo::create_first(&pool, &new_user("root@example.com", 1))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = UserRepo::create_first(&pool, &new_user("late@example.com", 1))
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);
}
