use std::sync::Arc;
use user_crud::{
    models::{NewUser, UserPatch},
    repositories::SqliteUserRepository,
    services::{UpdateUserRequest, UserService, UserServiceError},
    test_utils::test_helpers,
};

async fn service() -> UserService {
    // Create isolated test database
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    UserService::new(repository)
}

fn alice() -> NewUser {
    NewUser {
        username: "alice".to_string(),
        document: "d1".to_string(),
        phone_number: "555".to_string(),
        email: "a@x.com".to_string(),
        password: "p".to_string(),
        state: "CA".to_string(),
    }
}

#[tokio::test]
async fn test_create_then_read_returns_input() {
    let service = service().await;

    let created = service.create_user(alice()).await.unwrap();
    let fetched = service.get_user(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.username, "alice");
    assert_eq!(fetched.document, "d1");
    assert_eq!(fetched.phone_number, "555");
    assert_eq!(fetched.email, "a@x.com");
    assert_eq!(fetched.password, "p");
    assert_eq!(fetched.state, "CA");
}

#[tokio::test]
async fn test_create_allows_duplicate_documents() {
    let service = service().await;

    let first = service.create_user(alice()).await.unwrap();
    let second = service.create_user(alice()).await.unwrap();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_update_changes_only_supplied_field() {
    let service = service().await;
    let created = service.create_user(alice()).await.unwrap();

    let request = UpdateUserRequest {
        document: "d1".to_string(),
        patch: UserPatch {
            state: Some("NY".to_string()),
            ..Default::default()
        },
    };
    service.update_user(request).await.unwrap();

    let fetched = service.get_user(created.id).await.unwrap();
    assert_eq!(fetched.state, "NY");
    assert_eq!(fetched.username, "alice");
    assert_eq!(fetched.phone_number, "555");
    assert_eq!(fetched.email, "a@x.com");
    assert_eq!(fetched.password, "p");
}

#[tokio::test]
async fn test_update_with_empty_string_keeps_stored_value() {
    let service = service().await;
    let created = service.create_user(alice()).await.unwrap();

    let request = UpdateUserRequest {
        document: "d1".to_string(),
        patch: UserPatch {
            email: Some(String::new()),
            username: Some("alicia".to_string()),
            ..Default::default()
        },
    };
    service.update_user(request).await.unwrap();

    let fetched = service.get_user(created.id).await.unwrap();
    assert_eq!(fetched.email, "a@x.com");
    assert_eq!(fetched.username, "alicia");
}

#[tokio::test]
async fn test_update_unknown_document_is_not_found() {
    let service = service().await;
    service.create_user(alice()).await.unwrap();

    let request = UpdateUserRequest {
        document: "nope".to_string(),
        patch: UserPatch {
            state: Some("NY".to_string()),
            ..Default::default()
        },
    };
    let result = service.update_user(request).await;
    assert!(matches!(result, Err(UserServiceError::UserNotFound)));

    let users = service.list_users().await.unwrap();
    assert_eq!(users[0].state, "CA");
}

#[tokio::test]
async fn test_delete_then_read_is_not_found() {
    let service = service().await;
    let created = service.create_user(alice()).await.unwrap();

    service.delete_user(created.id).await.unwrap();

    let result = service.get_user(created.id).await;
    assert!(matches!(result, Err(UserServiceError::UserNotFound)));
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let service = service().await;

    assert!(matches!(
        service.get_user(12345).await,
        Err(UserServiceError::UserNotFound)
    ));
    assert!(matches!(
        service.delete_user(12345).await,
        Err(UserServiceError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_list_users_returns_all_in_id_order() {
    let service = service().await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let user = service
            .create_user(test_helpers::sample_user(&i.to_string()))
            .await
            .unwrap();
        ids.push(user.id);
    }

    let users = service.list_users().await.unwrap();
    assert_eq!(users.len(), 5);
    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let (pool, _file) = test_helpers::create_test_db_file().await.unwrap();
    let writer = UserService::new(Arc::new(SqliteUserRepository::new(pool.clone())));
    let created = writer.create_user(alice()).await.unwrap();

    let reader = UserService::new(Arc::new(SqliteUserRepository::new(pool)));
    let fetched = reader.get_user(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_find_user_by_document() {
    let service = service().await;
    let created = service.create_user(alice()).await.unwrap();

    let found = service.find_user_by_document("d1").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let missing = service.find_user_by_document("d2").await.unwrap();
    assert!(missing.is_none());
}
