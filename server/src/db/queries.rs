//! Database queries for the service catalog.
//!
//! Provides async functions for:
//! - Loading a consistent access snapshot
//! - Category and service administration
//! - Group override administration

use sg_types::{
    Category, CategoryId, GroupId, GroupServicePermission, PermissionLevel, Service, ServiceId,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::error::{StoreError, StoreResult};
use super::models::{
    CategoryRow, GroupRow, GroupServicePermissionRow, NewCategory, NewService,
    ServiceAccessUpdate, ServiceRow,
};
use crate::access::AccessSnapshot;

const SERVICE_COLUMNS: &str = "id, name, category_id, path, display_order, description, \
     is_closed, max_permission_anonymous, max_permission_authenticated";

// ============================================================================
// Snapshot Queries
// ============================================================================

/// List all categories.
pub async fn list_categories<'e>(db: impl PgExecutor<'e>) -> sqlx::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r"
        SELECT id, name, visible_in_navigation, position
        FROM service_categories
        ORDER BY position ASC, name ASC
        ",
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Category::from).collect())
}

/// List all services.
pub async fn list_services<'e>(db: impl PgExecutor<'e>) -> sqlx::Result<Vec<Service>> {
    let rows = sqlx::query_as::<_, ServiceRow>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services ORDER BY display_order ASC, name ASC"
    ))
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Service::from).collect())
}

/// List all group overrides.
pub async fn list_group_service_permissions<'e>(
    db: impl PgExecutor<'e>,
) -> sqlx::Result<Vec<GroupServicePermission>> {
    let rows = sqlx::query_as::<_, GroupServicePermissionRow>(
        r"
        SELECT group_id, service_id, permission
        FROM group_service_permissions
        ORDER BY service_id, permission, group_id
        ",
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(GroupServicePermission::from).collect())
}

/// Load categories, services and overrides as one consistent snapshot.
///
/// All three reads run in a single `REPEATABLE READ` transaction so no
/// concurrent admin write is half-visible.
#[tracing::instrument(skip(pool))]
pub async fn load_snapshot(pool: &PgPool) -> StoreResult<AccessSnapshot> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await?;

    let categories = list_categories(&mut *tx).await?;
    let services = list_services(&mut *tx).await?;
    let overrides = list_group_service_permissions(&mut *tx).await?;
    tx.commit().await?;

    tracing::debug!(
        categories = categories.len(),
        services = services.len(),
        overrides = overrides.len(),
        "Loaded access snapshot"
    );

    Ok(AccessSnapshot::build(categories, services, overrides)?)
}

// ============================================================================
// Category Queries
// ============================================================================

/// Create a category.
#[tracing::instrument(skip(pool))]
pub async fn create_category(pool: &PgPool, req: &NewCategory) -> StoreResult<Category> {
    req.validate()?;

    let row = sqlx::query_as::<_, CategoryRow>(
        r"
        INSERT INTO service_categories (id, name, visible_in_navigation, position)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, visible_in_navigation, position
        ",
    )
    .bind(CategoryId::new().0)
    .bind(&req.name)
    .bind(req.visible_in_navigation)
    .bind(req.position)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Show or hide a category in the navigator.
pub async fn set_category_visibility(
    pool: &PgPool,
    category_id: CategoryId,
    visible: bool,
) -> StoreResult<()> {
    let result =
        sqlx::query("UPDATE service_categories SET visible_in_navigation = $2 WHERE id = $1")
            .bind(category_id.0)
            .bind(visible)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Delete a category.
///
/// Refused with [`StoreError::CategoryInUse`] while any service still belongs
/// to it; services must be moved with [`move_service`] first.
#[tracing::instrument(skip(pool))]
pub async fn delete_category(pool: &PgPool, category_id: CategoryId) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    // Lock the category row so no service can be added to it concurrently
    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM service_categories WHERE id = $1 FOR UPDATE")
            .bind(category_id.0)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_none() {
        return Err(StoreError::NotFound);
    }

    let (services,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM services WHERE category_id = $1")
            .bind(category_id.0)
            .fetch_one(&mut *tx)
            .await?;
    if services > 0 {
        return Err(StoreError::CategoryInUse {
            category_id,
            services,
        });
    }

    sqlx::query("DELETE FROM service_categories WHERE id = $1")
        .bind(category_id.0)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(%category_id, "Category deleted");
    Ok(())
}

// ============================================================================
// Service Queries
// ============================================================================

/// Create a service.
#[tracing::instrument(skip(pool, req), fields(name = %req.name))]
pub async fn create_service(pool: &PgPool, req: &NewService) -> StoreResult<Service> {
    req.validate()?;

    let row = sqlx::query_as::<_, ServiceRow>(&format!(
        r"
        INSERT INTO services (
            id, name, category_id, path, display_order, description,
            is_closed, max_permission_anonymous, max_permission_authenticated
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {SERVICE_COLUMNS}
        "
    ))
    .bind(ServiceId::new().0)
    .bind(&req.name)
    .bind(req.category_id)
    .bind(&req.path)
    .bind(req.display_order)
    .bind(&req.description)
    .bind(req.is_closed)
    .bind(i32::from(req.max_permission_anonymous))
    .bind(i32::from(req.max_permission_authenticated))
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Find a service by ID.
pub async fn find_service_by_id(pool: &PgPool, id: ServiceId) -> sqlx::Result<Option<Service>> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
    ))
    .bind(id.0)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Service::from))
}

/// Update closed state and permission ceilings; omitted fields are kept.
#[tracing::instrument(skip(pool))]
pub async fn update_service_access(
    pool: &PgPool,
    id: ServiceId,
    update: &ServiceAccessUpdate,
) -> StoreResult<Service> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
        r"
        UPDATE services
        SET is_closed = COALESCE($2, is_closed),
            max_permission_anonymous = COALESCE($3, max_permission_anonymous),
            max_permission_authenticated = COALESCE($4, max_permission_authenticated)
        WHERE id = $1
        RETURNING {SERVICE_COLUMNS}
        "
    ))
    .bind(id.0)
    .bind(update.is_closed)
    .bind(update.max_permission_anonymous.map(i32::from))
    .bind(update.max_permission_authenticated.map(i32::from))
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)?;

    Ok(row.into())
}

/// Move a service to another category.
pub async fn move_service(
    pool: &PgPool,
    id: ServiceId,
    category_id: CategoryId,
) -> StoreResult<()> {
    let result = sqlx::query("UPDATE services SET category_id = $2 WHERE id = $1")
        .bind(id.0)
        .bind(category_id.0)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Delete a service together with its group overrides.
///
/// Returns `true` if a service was deleted.
#[tracing::instrument(skip(pool))]
pub async fn delete_service(pool: &PgPool, id: ServiceId) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Group Override Queries
// ============================================================================

/// Register a group mirrored from the identity provider.
pub async fn create_group(pool: &PgPool, name: &str) -> sqlx::Result<GroupRow> {
    sqlx::query_as::<_, GroupRow>(
        r"
        INSERT INTO user_groups (id, name)
        VALUES ($1, $2)
        RETURNING id, name
        ",
    )
    .bind(GroupId::new().0)
    .bind(name)
    .fetch_one(pool)
    .await
}

/// Grant `permission` on a service to a group, replacing any previous grant.
#[tracing::instrument(skip(pool))]
pub async fn set_group_permission(
    pool: &PgPool,
    group_id: GroupId,
    service_id: ServiceId,
    permission: PermissionLevel,
) -> sqlx::Result<GroupServicePermission> {
    let row = sqlx::query_as::<_, GroupServicePermissionRow>(
        r"
        INSERT INTO group_service_permissions (group_id, service_id, permission)
        VALUES ($1, $2, $3)
        ON CONFLICT (group_id, service_id) DO UPDATE
        SET permission = EXCLUDED.permission
        RETURNING group_id, service_id, permission
        ",
    )
    .bind(group_id.0)
    .bind(service_id.0)
    .bind(i32::from(permission))
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Remove a group's override on a service.
///
/// Returns `true` if an override was removed.
pub async fn remove_group_permission(
    pool: &PgPool,
    group_id: GroupId,
    service_id: ServiceId,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "DELETE FROM group_service_permissions WHERE group_id = $1 AND service_id = $2",
    )
    .bind(group_id.0)
    .bind(service_id.0)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
