//! Database Integration Tests
//!
//! Require a PostgreSQL server reachable through `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

#[cfg(test)]
mod postgres_tests {
    use super::super::*;
    use sg_types::{GroupId, PermissionLevel, Principal};
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn category(pool: &PgPool, name: &str, position: i32) -> sg_types::Category {
        create_category(
            pool,
            &NewCategory {
                name: name.into(),
                visible_in_navigation: true,
                position,
            },
        )
        .await
        .expect("Failed to create category")
    }

    fn service_request(name: &str, category_id: Uuid, path: &str) -> NewService {
        NewService {
            name: name.into(),
            category_id,
            path: path.into(),
            display_order: 1,
            description: String::new(),
            is_closed: false,
            max_permission_anonymous: PermissionLevel::Access,
            max_permission_authenticated: PermissionLevel::Read,
        }
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_load_snapshot_resolves(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        let notice = create_service(&pool, &service_request("Notice", board.id.0, "/notice"))
            .await
            .expect("Failed to create service");
        let group = create_group(&pool, "editors").await.expect("Failed to create group");
        let group_id = GroupId(group.id);
        set_group_permission(&pool, group_id, notice.id, PermissionLevel::Write)
            .await
            .expect("Failed to set override");

        let snapshot = load_snapshot(&pool).await.expect("Failed to load snapshot");
        let service = snapshot.catalog().find_by_path("/notice").expect("Service missing");
        let resolver = snapshot.resolver();

        assert_eq!(
            resolver.resolve(&Principal::anonymous(), service),
            PermissionLevel::Access
        );
        assert_eq!(
            resolver.resolve(&Principal::authenticated([group_id]), service),
            PermissionLevel::Write
        );
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_set_group_permission_upserts(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        let notice = create_service(&pool, &service_request("Notice", board.id.0, "/notice"))
            .await
            .unwrap();
        let group_id = GroupId(create_group(&pool, "staff").await.unwrap().id);

        set_group_permission(&pool, group_id, notice.id, PermissionLevel::Read)
            .await
            .unwrap();
        let updated = set_group_permission(&pool, group_id, notice.id, PermissionLevel::Delete)
            .await
            .unwrap();
        assert_eq!(updated.permission, PermissionLevel::Delete);

        let overrides = list_group_service_permissions(&pool).await.unwrap();
        assert_eq!(overrides.len(), 1);

        assert!(remove_group_permission(&pool, group_id, notice.id).await.unwrap());
        assert!(!remove_group_permission(&pool, group_id, notice.id).await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_delete_category_is_restricted(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        let archive = category(&pool, "Archive", 1).await;
        let notice = create_service(&pool, &service_request("Notice", board.id.0, "/notice"))
            .await
            .unwrap();

        let err = delete_category(&pool, board.id).await.unwrap_err();
        assert!(matches!(err, StoreError::CategoryInUse { services: 1, .. }));

        move_service(&pool, notice.id, archive.id).await.unwrap();
        delete_category(&pool, board.id).await.expect("Empty category should delete");

        let categories = list_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Archive");
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_delete_missing_category(pool: PgPool) {
        let err = delete_category(&pool, sg_types::CategoryId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_delete_service_cascades_overrides(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        let notice = create_service(&pool, &service_request("Notice", board.id.0, "/notice"))
            .await
            .unwrap();
        let group_id = GroupId(create_group(&pool, "staff").await.unwrap().id);
        set_group_permission(&pool, group_id, notice.id, PermissionLevel::Edit)
            .await
            .unwrap();

        assert!(delete_service(&pool, notice.id).await.unwrap());
        assert!(list_group_service_permissions(&pool).await.unwrap().is_empty());
        assert!(find_service_by_id(&pool, notice.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_update_service_access_partial(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        let notice = create_service(&pool, &service_request("Notice", board.id.0, "/notice"))
            .await
            .unwrap();

        let updated = update_service_access(
            &pool,
            notice.id,
            &ServiceAccessUpdate {
                is_closed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.is_closed);
        assert_eq!(updated.max_permission_anonymous, PermissionLevel::Access);
        assert_eq!(updated.max_permission_authenticated, PermissionLevel::Read);
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_invalid_stored_level_fails_load(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        create_service(&pool, &service_request("Notice", board.id.0, "/notice"))
            .await
            .unwrap();

        // Bypass the CHECK constraint to simulate a corrupted row
        sqlx::query("ALTER TABLE services DROP CONSTRAINT services_max_permission_anonymous_check")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE services SET max_permission_anonymous = 9")
            .execute(&pool)
            .await
            .unwrap();

        let err = load_snapshot(&pool).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_create_service_validates(pool: PgPool) {
        let board = category(&pool, "Board", 0).await;
        let err = create_service(&pool, &service_request("Notice", board.id.0, "notice"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
