/// Integration tests for the credential store
///
/// Run with: cargo test --test store_tests -- --test-threads=1

mod common;

use common::{create_test_user, test_store, unique_email};
use stormtask_shared::error::StoreError;
use stormtask_shared::models::task::TaskFields;
use stormtask_shared::models::user::{NewUser, UserChanges};

#[tokio::test]
async fn test_create_user_stores_hash_not_password() {
    let Some(store) = test_store().await else { return };

    let email = unique_email("alice");
    let user = store
        .create_user(NewUser {
            email: email.clone(),
            name: "Alice".to_string(),
            password: "pw".to_string(),
            is_admin: true,
        })
        .await
        .unwrap();

    assert!(user.id > 0);
    assert_eq!(user.email, email);
    assert!(user.is_admin);
    assert_ne!(user.password_hash, "pw");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = store.get_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "pw").await;
    let result = store
        .create_user(NewUser {
            email: user.email.clone(),
            name: "Someone Else".to_string(),
            password: "other".to_string(),
            is_admin: false,
        })
        .await;

    assert!(matches!(result, Err(StoreError::Conflict(_))));
}

#[tokio::test]
async fn test_lookup_misses_are_none() {
    let Some(store) = test_store().await else { return };

    assert!(store.get_user_by_email(&unique_email("nobody")).await.unwrap().is_none());
    assert!(store.get_user_by_id(i64::MAX).await.unwrap().is_none());
    assert!(store.get_group(i64::MAX).await.unwrap().is_none());
    assert!(store.get_task(i64::MAX).await.unwrap().is_none());
}

#[tokio::test]
async fn test_verify_credentials() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "correct horse").await;

    let ok = store.verify_credentials(&user.email, "correct horse").await.unwrap();
    assert_eq!(ok.map(|u| u.id), Some(user.id));

    assert!(store.verify_credentials(&user.email, "wrong").await.unwrap().is_none());
    assert!(store
        .verify_credentials(&unique_email("ghost"), "correct horse")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_user() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "old").await;
    let new_email = unique_email("renamed");

    let updated = store
        .update_user(
            user.id,
            UserChanges {
                email: Some(new_email.clone()),
                name: None,
                password: Some("new".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.email, new_email);
    assert_eq!(updated.name, user.name);
    assert!(store.verify_credentials(&new_email, "new").await.unwrap().is_some());
    assert!(store.verify_credentials(&new_email, "old").await.unwrap().is_none());

    let missing = store.update_user(i64::MAX, UserChanges::default()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_update_user_to_taken_email_is_conflict() {
    let Some(store) = test_store().await else { return };

    let a = create_test_user(&store, "pw").await;
    let b = create_test_user(&store, "pw").await;

    let result = store
        .update_user(
            b.id,
            UserChanges {
                email: Some(a.email.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    // Keeping your own email is fine
    let same = store
        .update_user(
            a.id,
            UserChanges {
                email: Some(a.email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(same.is_some());
}

#[tokio::test]
async fn test_group_names_are_unique_per_owner() {
    let Some(store) = test_store().await else { return };

    let a = create_test_user(&store, "pw").await;
    let b = create_test_user(&store, "pw").await;

    store.create_group(a.id, "Home").await.unwrap();
    let duplicate = store.create_group(a.id, "Home").await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

    let other_owner = store.create_group(b.id, "Home").await.unwrap();
    assert_eq!(other_owner.owner_id, b.id);

    let found = store
        .get_group_by_owner_and_name(b.id, "Home")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, other_owner.id);
}

#[tokio::test]
async fn test_create_group_for_unknown_owner_is_invalid_reference() {
    let Some(store) = test_store().await else { return };

    let result = store.create_group(i64::MAX, "Orphan").await;
    assert!(matches!(result, Err(StoreError::InvalidReference(_))));
}

#[tokio::test]
async fn test_list_and_rename_groups() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "pw").await;
    assert!(store.list_groups_by_owner(user.id).await.unwrap().is_empty());

    let home = store.create_group(user.id, "Home").await.unwrap();
    let work = store.create_group(user.id, "Work").await.unwrap();

    let groups = store.list_groups_by_owner(user.id).await.unwrap();
    let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![home.id, work.id]);

    let renamed = store.rename_group(home.id, "House").await.unwrap().unwrap();
    assert_eq!(renamed.name, "House");
    assert_eq!(renamed.owner_id, user.id);

    let clash = store.rename_group(home.id, "Work").await;
    assert!(matches!(clash, Err(StoreError::Conflict(_))));

    assert!(store.rename_group(i64::MAX, "Nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_task_lifecycle() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "pw").await;
    let home = store.create_group(user.id, "Home").await.unwrap();
    let work = store.create_group(user.id, "Work").await.unwrap();

    let task = store
        .create_task(TaskFields::new("Dishes", "after dinner", home.id))
        .await
        .unwrap();
    assert!(!task.finished);
    assert!(!task.archived);

    let tasks = store.list_tasks_by_group(home.id).await.unwrap();
    assert_eq!(tasks.len(), 1);

    // Finished and archived are stored independently
    let updated = store
        .update_task(
            task.id,
            TaskFields {
                name: "Dishes".to_string(),
                description: "after dinner".to_string(),
                finished: false,
                archived: true,
                group_id: work.id,
            },
        )
        .await
        .unwrap();
    assert!(!updated.finished);
    assert!(updated.archived);
    assert_eq!(updated.group_id, work.id);

    assert!(store.list_tasks_by_group(home.id).await.unwrap().is_empty());
    assert_eq!(store.list_tasks_by_group(work.id).await.unwrap().len(), 1);

    assert!(store.delete_task(task.id).await.unwrap());
    assert!(!store.delete_task(task.id).await.unwrap());
}

#[tokio::test]
async fn test_task_references_must_exist() {
    let Some(store) = test_store().await else { return };

    let created = store
        .create_task(TaskFields::new("Lost", "", i64::MAX))
        .await;
    assert!(matches!(created, Err(StoreError::InvalidReference(_))));

    let user = create_test_user(&store, "pw").await;
    let group = store.create_group(user.id, "Home").await.unwrap();
    let task = store
        .create_task(TaskFields::new("Dishes", "", group.id))
        .await
        .unwrap();

    let moved = store
        .update_task(task.id, TaskFields::new("Dishes", "", i64::MAX))
        .await;
    assert!(matches!(moved, Err(StoreError::NotFound(_))));

    let missing = store
        .update_task(i64::MAX, TaskFields::new("Ghost", "", group.id))
        .await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_group_removes_its_tasks() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "pw").await;
    let group = store.create_group(user.id, "Home").await.unwrap();
    let t1 = store.create_task(TaskFields::new("A", "", group.id)).await.unwrap();
    let t2 = store.create_task(TaskFields::new("B", "", group.id)).await.unwrap();

    assert!(store.delete_group(group.id).await.unwrap());

    assert!(store.get_group(group.id).await.unwrap().is_none());
    assert!(store.get_task(t1.id).await.unwrap().is_none());
    assert!(store.get_task(t2.id).await.unwrap().is_none());
    assert!(!store.delete_group(group.id).await.unwrap());
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let Some(store) = test_store().await else { return };

    let user = create_test_user(&store, "pw").await;
    let bystander = create_test_user(&store, "pw").await;

    let home = store.create_group(user.id, "Home").await.unwrap();
    let work = store.create_group(user.id, "Work").await.unwrap();
    let kept = store.create_group(bystander.id, "Home").await.unwrap();

    let mut owned = Vec::new();
    for group in [&home, &work] {
        for name in ["A", "B"] {
            let task = store
                .create_task(TaskFields::new(name, "", group.id))
                .await
                .unwrap();
            owned.push(task.id);
        }
    }
    let t3 = store.create_task(TaskFields::new("C", "", kept.id)).await.unwrap();

    assert!(store.delete_user(user.id).await.unwrap());

    assert!(store.get_user_by_id(user.id).await.unwrap().is_none());
    assert!(store.list_groups_by_owner(user.id).await.unwrap().is_empty());
    assert!(store.get_group(home.id).await.unwrap().is_none());
    assert!(store.get_group(work.id).await.unwrap().is_none());
    assert_eq!(owned.len(), 4);
    for task_id in owned {
        assert!(store.get_task(task_id).await.unwrap().is_none());
    }

    assert!(store.get_group(kept.id).await.unwrap().is_some());
    assert!(store.get_task(t3.id).await.unwrap().is_some());

    assert!(!store.delete_user(user.id).await.unwrap());
}
