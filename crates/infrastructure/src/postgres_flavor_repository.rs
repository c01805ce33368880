use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;

use flavorgate_application::{FlavorCatalogQuery, FlavorCatalogSnapshot, FlavorRepository};
use flavorgate_core::{AppError, AppResult, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId, FlavorSpec};

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for flavors and their tenant access grants.
#[derive(Clone)]
pub struct PostgresFlavorRepository {
    pool: PgPool,
}

impl PostgresFlavorRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a flavor or refreshes its sizing and visibility by flavor id.
    pub async fn save_flavor(&self, flavor: &Flavor) -> AppResult<()> {
        let spec = flavor.spec();
        sqlx::query(
            r#"
            INSERT INTO flavors (
                flavor_id,
                name,
                memory_mb,
                vcpus,
                root_gb,
                ephemeral_gb,
                swap_mb,
                rxtx_factor,
                is_public
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (flavor_id) DO UPDATE
            SET name = EXCLUDED.name,
                memory_mb = EXCLUDED.memory_mb,
                vcpus = EXCLUDED.vcpus,
                root_gb = EXCLUDED.root_gb,
                ephemeral_gb = EXCLUDED.ephemeral_gb,
                swap_mb = EXCLUDED.swap_mb,
                rxtx_factor = EXCLUDED.rxtx_factor,
                is_public = EXCLUDED.is_public
            "#,
        )
        .bind(flavor.flavor_id().as_str())
        .bind(spec.name.as_str())
        .bind(to_column(spec.memory_mb, "memory_mb")?)
        .bind(to_column(spec.vcpus, "vcpus")?)
        .bind(to_column(spec.root_gb, "root_gb")?)
        .bind(to_column(spec.ephemeral_gb, "ephemeral_gb")?)
        .bind(to_column(spec.swap_mb, "swap_mb")?)
        .bind(spec.rxtx_factor)
        .bind(flavor.is_public())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save flavor '{}': {error}",
                flavor.flavor_id()
            ))
        })?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct FlavorRow {
    id: i64,
    flavor_id: String,
    name: String,
    memory_mb: i32,
    vcpus: i32,
    root_gb: i32,
    ephemeral_gb: i32,
    swap_mb: i32,
    rxtx_factor: f64,
    is_public: bool,
}

#[derive(Debug, FromRow)]
struct CatalogRow {
    #[sqlx(flatten)]
    flavor: FlavorRow,
    granted: bool,
}

#[derive(Debug, FromRow)]
struct GrantRow {
    flavor_id: String,
    tenant_id: String,
}

impl TryFrom<FlavorRow> for Flavor {
    type Error = AppError;

    fn try_from(row: FlavorRow) -> Result<Self, Self::Error> {
        Flavor::new(
            row.id,
            FlavorId::new(row.flavor_id)?,
            row.is_public,
            FlavorSpec {
                name: row.name,
                memory_mb: from_column(row.memory_mb, "memory_mb")?,
                vcpus: from_column(row.vcpus, "vcpus")?,
                root_gb: from_column(row.root_gb, "root_gb")?,
                ephemeral_gb: from_column(row.ephemeral_gb, "ephemeral_gb")?,
                swap_mb: from_column(row.swap_mb, "swap_mb")?,
                rxtx_factor: row.rxtx_factor,
            },
        )
    }
}

impl TryFrom<GrantRow> for AccessGrant {
    type Error = AppError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        Ok(AccessGrant::new(
            FlavorId::new(row.flavor_id)?,
            TenantId::new(row.tenant_id)?,
        ))
    }
}

#[async_trait]
impl FlavorRepository for PostgresFlavorRepository {
    async fn find_flavor(&self, flavor_id: &FlavorId) -> AppResult<Option<Flavor>> {
        let row = sqlx::query_as::<_, FlavorRow>(
            r#"
            SELECT id, flavor_id, name, memory_mb, vcpus, root_gb,
                   ephemeral_gb, swap_mb, rxtx_factor, is_public
            FROM flavors
            WHERE flavor_id = $1
            "#,
        )
        .bind(flavor_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find flavor '{flavor_id}': {error}"))
        })?;

        row.map(Flavor::try_from).transpose()
    }

    async fn load_catalog(&self, query: FlavorCatalogQuery) -> AppResult<FlavorCatalogSnapshot> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT
                f.id,
                f.flavor_id,
                f.name,
                f.memory_mb,
                f.vcpus,
                f.root_gb,
                f.ephemeral_gb,
                f.swap_mb,
                f.rxtx_factor,
                f.is_public,
                (g.tenant_id IS NOT NULL) AS granted
            FROM flavors f
            LEFT JOIN flavor_access_grants g
                ON g.flavor_id = f.flavor_id AND g.tenant_id = $2
            WHERE ($1::BOOLEAN IS NULL OR f.is_public = $1)
            ORDER BY f.id
            "#,
        )
        .bind(query.is_public)
        .bind(query.tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load flavor catalog for tenant '{}': {error}",
                query.tenant_id
            ))
        })?;

        let mut snapshot = FlavorCatalogSnapshot::default();
        for row in rows {
            let flavor = Flavor::try_from(row.flavor)?;
            if row.granted && !flavor.is_public() {
                snapshot.grants.push(AccessGrant::new(
                    flavor.flavor_id().clone(),
                    query.tenant_id.clone(),
                ));
            }
            snapshot.flavors.push(flavor);
        }

        Ok(snapshot)
    }

    async fn list_grants_for_flavor(&self, flavor_id: &FlavorId) -> AppResult<Vec<AccessGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT flavor_id, tenant_id
            FROM flavor_access_grants
            WHERE flavor_id = $1
            ORDER BY tenant_id
            "#,
        )
        .bind(flavor_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list access grants for flavor '{flavor_id}': {error}"
            ))
        })?;

        rows.into_iter().map(AccessGrant::try_from).collect()
    }

    async fn insert_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>> {
        let flavor_id = grant.flavor_id();
        let tenant_id = grant.tenant_id();
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start access grant transaction for flavor '{flavor_id}': {error}"
            ))
        })?;

        let flavor_exists: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM flavors
            WHERE flavor_id = $1
            FOR SHARE
            "#,
        )
        .bind(flavor_id.as_str())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to lock flavor '{flavor_id}': {error}"))
        })?;

        if flavor_exists.is_none() {
            return Err(AppError::NotFound(format!("flavor '{flavor_id}' not found")));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO flavor_access_grants (flavor_id, tenant_id)
            VALUES ($1, $2)
            ON CONFLICT (flavor_id, tenant_id) DO NOTHING
            "#,
        )
        .bind(flavor_id.as_str())
        .bind(tenant_id.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::NotFound(format!("flavor '{flavor_id}' not found"));
            }

            AppError::Internal(format!(
                "failed to grant tenant '{tenant_id}' access to flavor '{flavor_id}': {error}"
            ))
        })?;

        if inserted.rows_affected() == 0 {
            debug!(%flavor_id, %tenant_id, "access grant already present");
            return Err(AppError::Conflict(format!(
                "tenant '{tenant_id}' already has access to flavor '{flavor_id}'"
            )));
        }

        let grants = grants_in_transaction(&mut transaction, flavor_id).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit access grant for flavor '{flavor_id}': {error}"
            ))
        })?;

        Ok(grants)
    }

    async fn delete_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>> {
        let flavor_id = grant.flavor_id();
        let tenant_id = grant.tenant_id();
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start access revoke transaction for flavor '{flavor_id}': {error}"
            ))
        })?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM flavor_access_grants
            WHERE flavor_id = $1 AND tenant_id = $2
            "#,
        )
        .bind(flavor_id.as_str())
        .bind(tenant_id.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to revoke tenant '{tenant_id}' access to flavor '{flavor_id}': {error}"
            ))
        })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "tenant '{tenant_id}' has no access to flavor '{flavor_id}'"
            )));
        }

        let grants = grants_in_transaction(&mut transaction, flavor_id).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit access revoke for flavor '{flavor_id}': {error}"
            ))
        })?;

        Ok(grants)
    }
}

async fn grants_in_transaction(
    transaction: &mut Transaction<'_, Postgres>,
    flavor_id: &FlavorId,
) -> AppResult<Vec<AccessGrant>> {
    let rows = sqlx::query_as::<_, GrantRow>(
        r#"
        SELECT flavor_id, tenant_id
        FROM flavor_access_grants
        WHERE flavor_id = $1
        ORDER BY tenant_id
        "#,
    )
    .bind(flavor_id.as_str())
    .fetch_all(&mut **transaction)
    .await
    .map_err(|error| {
        AppError::Internal(format!(
            "failed to reload access grants for flavor '{flavor_id}': {error}"
        ))
    })?;

    rows.into_iter().map(AccessGrant::try_from).collect()
}

fn from_column(value: i32, column: &str) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::Internal(format!("flavor column '{column}' is negative: {value}")))
}

fn to_column(value: u32, column: &str) -> AppResult<i32> {
    i32::try_from(value).map_err(|_| {
        AppError::Validation(format!("flavor {column} {value} exceeds the storable range"))
    })
}
