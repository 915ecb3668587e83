use todo_ffi::api::{
    configure_storage_path, todo_delete, todo_flush, todo_list, todo_load, todo_submit,
    todo_toggle,
};

#[tokio::test]
async fn unopenable_storage_keeps_the_list_usable_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("regular-file");
    std::fs::write(&blocker, "not a directory").unwrap();
    let db_path = blocker.join("todo.sqlite3");
    assert_eq!(
        configure_storage_path(db_path.to_string_lossy().into_owned()),
        ""
    );

    let loaded = todo_load().await;
    assert!(loaded.ok, "{}", loaded.message);
    assert!(loaded.items.is_empty());

    let added = todo_submit("Buy milk".to_string(), None).await;
    assert!(added.ok, "{}", added.message);
    assert!(!added.persisted);
    let item = added.item.expect("added item");
    assert_eq!(item.title, "Buy milk");

    let toggled = todo_toggle(item.id.clone()).await;
    assert!(toggled.ok);
    assert!(toggled.item.expect("toggled item").completed);

    let listed = todo_list().await;
    assert!(listed.ok);
    assert_eq!(listed.items.len(), 1);
    assert!(listed.items[0].completed);

    let flushed = todo_flush().await;
    assert!(!flushed.ok);
    assert!(!flushed.persisted);

    let deleted = todo_delete(item.id).await;
    assert!(deleted.ok && deleted.item.is_some());
    assert!(todo_list().await.items.is_empty());
}
