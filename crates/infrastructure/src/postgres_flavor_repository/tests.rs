use flavorgate_application::{FlavorCatalogQuery, FlavorRepository};
use flavorgate_core::{AppError, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId, FlavorSpec};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresFlavorRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres flavor tests: {error}");
    }

    Some(pool)
}

fn flavor_id(value: &str) -> FlavorId {
    FlavorId::new(value).unwrap_or_else(|_| unreachable!())
}

fn tenant(value: &str) -> TenantId {
    TenantId::new(value).unwrap_or_else(|_| unreachable!())
}

fn flavor(value: &str, is_public: bool) -> Flavor {
    Flavor::new(
        0,
        flavor_id(value),
        is_public,
        FlavorSpec {
            name: format!("pg.{value}"),
            memory_mb: 2048,
            vcpus: 2,
            root_gb: 20,
            ephemeral_gb: 0,
            swap_mb: 0,
            rxtx_factor: 1.0,
        },
    )
    .unwrap_or_else(|_| unreachable!())
}

async fn fresh_flavor(
    pool: &PgPool,
    repository: &PostgresFlavorRepository,
    value: &str,
    is_public: bool,
) {
    let cleared = sqlx::query("DELETE FROM flavor_access_grants WHERE flavor_id = $1")
        .bind(value)
        .execute(pool)
        .await;
    assert!(cleared.is_ok());
    assert!(repository.save_flavor(&flavor(value, is_public)).await.is_ok());
}

#[tokio::test]
async fn saved_flavor_round_trips_through_find() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresFlavorRepository::new(pool.clone());
    fresh_flavor(&pool, &repository, "pg-find", false).await;

    let found = repository.find_flavor(&flavor_id("pg-find")).await;
    assert!(found.is_ok());
    let found = found.unwrap_or_default();
    assert!(found.is_some());
    let found = found.unwrap_or_else(|| unreachable!());
    assert!(!found.is_public());
    assert_eq!(found.spec().vcpus, 2);
    assert!(found.id() > 0);
}

#[tokio::test]
async fn grant_lifecycle_reports_conflict_and_missing_grant() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresFlavorRepository::new(pool.clone());
    fresh_flavor(&pool, &repository, "pg-life", false).await;
    let grant = AccessGrant::new(flavor_id("pg-life"), tenant("proj-b"));

    let inserted = repository
        .insert_grant(&AccessGrant::new(flavor_id("pg-life"), tenant("proj-a")))
        .await;
    assert!(inserted.is_ok());
    let inserted = repository.insert_grant(&grant).await.unwrap_or_default();
    let tenants: Vec<&str> = inserted
        .iter()
        .map(|grant| grant.tenant_id().as_str())
        .collect();
    assert_eq!(tenants, vec!["proj-a", "proj-b"]);

    let duplicate = repository.insert_grant(&grant).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let remaining = repository.delete_grant(&grant).await;
    assert!(remaining.is_ok());
    assert_eq!(remaining.unwrap_or_default().len(), 1);

    let missing = repository.delete_grant(&grant).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn grant_on_unknown_flavor_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresFlavorRepository::new(pool);

    let result = repository
        .insert_grant(&AccessGrant::new(flavor_id("pg-absent"), tenant("proj-a")))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn concurrent_grants_commit_exactly_once() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresFlavorRepository::new(pool.clone());
    fresh_flavor(&pool, &repository, "pg-race", false).await;
    let grant = AccessGrant::new(flavor_id("pg-race"), tenant("proj-race"));

    let (left, right) = tokio::join!(
        repository.insert_grant(&grant),
        repository.insert_grant(&grant)
    );

    assert_eq!(
        [left.is_ok(), right.is_ok()]
            .into_iter()
            .filter(|ok| *ok)
            .count(),
        1
    );
    let grants = repository
        .list_grants_for_flavor(&flavor_id("pg-race"))
        .await
        .unwrap_or_default();
    assert_eq!(grants.len(), 1);
}

#[tokio::test]
async fn catalog_marks_only_requesting_tenant_grants() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresFlavorRepository::new(pool.clone());
    fresh_flavor(&pool, &repository, "pg-cat-public", true).await;
    fresh_flavor(&pool, &repository, "pg-cat-private", false).await;
    assert!(
        repository
            .insert_grant(&AccessGrant::new(
                flavor_id("pg-cat-private"),
                tenant("proj-cat")
            ))
            .await
            .is_ok()
    );

    let snapshot = repository
        .load_catalog(FlavorCatalogQuery {
            is_public: Some(false),
            tenant_id: tenant("proj-cat"),
        })
        .await;
    assert!(snapshot.is_ok());
    let snapshot = snapshot.unwrap_or_default();
    assert!(snapshot.flavors.iter().all(|flavor| !flavor.is_public()));
    assert!(
        snapshot
            .grants
            .iter()
            .any(|grant| grant.flavor_id().as_str() == "pg-cat-private")
    );
    assert!(
        snapshot
            .grants
            .iter()
            .all(|grant| grant.tenant_id().as_str() == "proj-cat")
    );
}
