use super::*;

fn policy(closeable: bool, remember: bool) -> DismissalPolicy {
    DismissalPolicy { closeable, remember, storage_key: "wh-test-dismissed".into() }
}

#[test]
fn closeable_and_remembered_stays_hidden_after_reload() {
    let mut store = MemoryStorage::new();
    let policy = policy(true, true);
    assert!(policy.should_show(&store));
    assert!(policy.dismiss(&mut store));
    assert!(!policy.should_show(&store));
    assert!(!policy.should_show(&store));
}

#[test]
fn not_closeable_reappears_after_reload() {
    let mut store = MemoryStorage::new();
    let policy = policy(false, true);
    assert!(!policy.dismiss(&mut store));
    assert!(policy.should_show(&store));
    assert_eq!(store.get("wh-test-dismissed"), None);
}

#[test]
fn closeable_without_memory_reappears() {
    let mut store = MemoryStorage::new();
    let policy = policy(true, false);
    assert!(policy.dismiss(&mut store));
    assert!(policy.should_show(&store));
}

#[test]
fn unrelated_value_under_key_does_not_hide() {
    let mut store = MemoryStorage::new();
    store.set("wh-test-dismissed", "0");
    assert!(policy(true, true).should_show(&store));
}

#[test]
fn script_config_carries_policy_fields() {
    let config = policy(false, true).script_config();
    assert_eq!(config["closeable"], Value::Bool(false));
    assert_eq!(config["remember"], Value::Bool(true));
    assert_eq!(config["storageKey"], "wh-test-dismissed");
    assert_eq!(config.len(), 3);
}
