use super::*;
use tsc_core::{Block, Client, Job, Tab, Window, Workspace};

fn store() -> ObjectStore {
    ObjectStore::open_in_memory().unwrap()
}

#[test]
fn insert_sets_version_to_one_and_records_an_update() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab = Tab::new();
    let oref = ORef::new(Otype::Tab, tab.oid);
    let version = store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap();
    assert_eq!(version, 1);
    let updates = ctx.flatten();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].oid, oref.oid);

    let fetched = store.get(oref).unwrap();
    assert_eq!(fetched.version(), 1);
}

#[test]
fn insert_twice_with_same_oid_fails() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab = Tab::new();
    store.insert(&mut ctx, WaveObj::Tab(tab.clone())).unwrap();
    let err = store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[test]
fn singleton_insert_fails_on_second_row_even_with_a_different_oid() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    store.insert(&mut ctx, WaveObj::Client(Client::new())).unwrap();
    let mut second = Client::new();
    second.oid = Oid::new();
    let err = store.insert(&mut ctx, WaveObj::Client(second)).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[test]
fn update_increments_version_and_fails_if_absent() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let mut tab = Tab::new();
    store.insert(&mut ctx, WaveObj::Tab(tab.clone())).unwrap();
    tab.block_ids.push(Oid::new());
    let new_version = store.update(&mut ctx, WaveObj::Tab(tab.clone())).unwrap();
    assert_eq!(new_version, 2);

    let ghost = Tab::new();
    let err = store.update(&mut ctx, WaveObj::Tab(ghost)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn update_with_version_detects_concurrent_writer() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab = Tab::new();
    store.insert(&mut ctx, WaveObj::Tab(tab.clone())).unwrap();

    // Two callers both read version 1 and race to update.
    store.update_with_version(&mut ctx, WaveObj::Tab(tab.clone()), 1).unwrap();
    let err = store.update_with_version(&mut ctx, WaveObj::Tab(tab), 1).unwrap_err();
    assert!(matches!(err, StoreError::VersionMismatch { .. }));
}

#[test]
fn update_meta_if_not_locked_merges_with_wildcard_clear() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let mut tab = Tab::new();
    tab.meta.insert("frame:border".into(), serde_json::json!("red"));
    tab.meta.insert("frame:title".into(), serde_json::json!("x"));
    tab.meta.insert("cmd".into(), serde_json::json!("ls"));
    let oref = ORef::new(Otype::Tab, tab.oid);
    store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap();

    let mut patch = Meta::new();
    patch.insert("frame:*".into(), serde_json::json!(true));
    patch.insert("frame:title".into(), serde_json::json!("y"));
    store.update_meta_if_not_locked(&mut ctx, oref, &patch, "locked", 0, false).unwrap();

    let WaveObj::Tab(tab) = store.get(oref).unwrap() else { panic!("expected tab") };
    assert_eq!(tab.meta.get("cmd"), Some(&serde_json::json!("ls")));
    assert_eq!(tab.meta.get("frame:title"), Some(&serde_json::json!("y")));
    assert!(!tab.meta.contains_key("frame:border"));
    assert_eq!(tab.version, 2);
}

#[test]
fn update_meta_if_not_locked_rejects_writes_while_locked() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let mut tab = Tab::new();
    tab.meta.insert("locked".into(), serde_json::json!(true));
    let oref = ORef::new(Otype::Tab, tab.oid);
    store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap();

    let mut patch = Meta::new();
    patch.insert("cmd".into(), serde_json::json!("ls"));
    let err = store.update_meta_if_not_locked(&mut ctx, oref, &patch, "locked", 0, false).unwrap_err();
    assert!(matches!(err, StoreError::ObjectLocked(_)));
}

#[test]
fn get_missing_object_is_not_found() {
    let store = store();
    let err = store.get(ORef::new(Otype::Tab, Oid::new())).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn select_orefs_batches_by_otype() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab1 = Tab::new();
    let tab2 = Tab::new();
    let job = Job::new("mybox".into(), "ls".into());
    let orefs = vec![
        ORef::new(Otype::Tab, tab1.oid),
        ORef::new(Otype::Tab, tab2.oid),
        ORef::new(Otype::Job, job.oid),
    ];
    store.insert(&mut ctx, WaveObj::Tab(tab1)).unwrap();
    store.insert(&mut ctx, WaveObj::Tab(tab2)).unwrap();
    store.insert(&mut ctx, WaveObj::Job(job)).unwrap();

    let results = store.select_orefs(&orefs).unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn resolve_easy_oid_exact_and_prefix_modes() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab = Tab::new();
    let oid_str = tab.oid.to_string();
    store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap();

    let exact = store.resolve_easy_oid(&oid_str).unwrap();
    assert_eq!(exact.oid.to_string(), oid_str);

    let prefix = &oid_str[..8];
    let resolved = store.resolve_easy_oid(prefix).unwrap();
    assert_eq!(resolved.oid.to_string(), oid_str);
}

#[test]
fn resolve_easy_oid_not_found() {
    let store = store();
    let err = store.resolve_easy_oid("deadbeef").unwrap_err();
    assert!(matches!(err, StoreError::NotFoundPrefix(_)));
}

#[test]
fn delete_removes_the_row_and_records_a_delete_update() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab = Tab::new();
    let oref = ORef::new(Otype::Tab, tab.oid);
    store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap();

    store.delete(&mut ctx, oref).unwrap();
    assert!(matches!(store.get(oref).unwrap_err(), StoreError::NotFound(_)));

    let updates = ctx.flatten();
    let del = updates.iter().find(|u| u.oid == oref.oid).unwrap();
    assert_eq!(del.update_type, crate::waveobjupdate::UpdateType::Delete);
}

#[test]
fn find_tab_for_block_climbs_the_parent_chain() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let tab = Tab::new();
    let tab_oref = ORef::new(Otype::Tab, tab.oid);
    store.insert(&mut ctx, WaveObj::Tab(tab)).unwrap();

    let block1 = Block::new(tab_oref);
    let block1_oref = ORef::new(Otype::Block, block1.oid);
    store.insert(&mut ctx, WaveObj::Block(block1)).unwrap();

    let block2 = Block::new(block1_oref);
    let block2_id = block2.oid;
    store.insert(&mut ctx, WaveObj::Block(block2)).unwrap();

    let found = store.find_tab_for_block(block2_id).unwrap();
    assert_eq!(found, tab_oref);
}

#[test]
fn find_tab_for_block_too_deep_errors() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    // Build a chain of 6 blocks, each pointing at the previous block, never
    // reaching a tab — exceeds the 5-hop budget.
    let mut parent = ORef::new(Otype::Block, Oid::new());
    let mut last_id = None;
    for _ in 0..6 {
        let block = Block::new(parent);
        parent = ORef::new(Otype::Block, block.oid);
        last_id = Some(block.oid);
        store.insert(&mut ctx, WaveObj::Block(block)).unwrap();
    }
    let err = store.find_tab_for_block(last_id.unwrap()).unwrap_err();
    assert!(matches!(err, StoreError::ParentChainTooDeep(_)));
}

#[test]
fn find_workspace_for_tab_and_window_for_workspace() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    let mut workspace = Workspace::new("ws".into());
    let tab_id = Oid::new();
    workspace.tab_ids.push(tab_id);
    let workspace_oref = ORef::new(Otype::Workspace, workspace.oid);
    let workspace_id = workspace.oid;
    store.insert(&mut ctx, WaveObj::Workspace(workspace)).unwrap();

    let found_ws = store.find_workspace_for_tab(tab_id).unwrap();
    assert_eq!(found_ws, workspace_oref);

    let window = Window::new(workspace_id);
    let window_oref = ORef::new(Otype::Window, window.oid);
    store.insert(&mut ctx, WaveObj::Window(window)).unwrap();

    let found_win = store.find_window_for_workspace(workspace_id).unwrap();
    assert_eq!(found_win, window_oref);
}

#[test]
fn table_counts_reflects_inserted_rows() {
    let store = store();
    let mut ctx = UpdateCtx::new();
    store.insert(&mut ctx, WaveObj::Tab(Tab::new())).unwrap();
    store.insert(&mut ctx, WaveObj::Tab(Tab::new())).unwrap();
    let counts = store.table_counts().unwrap();
    assert_eq!(counts[&Otype::Tab], 2);
    assert_eq!(counts[&Otype::Job], 0);
}
