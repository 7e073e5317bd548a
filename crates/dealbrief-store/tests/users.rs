use dealbrief_store::repo::UserNew;
use dealbrief_store::Store;

#[test]
fn user_roundtrip_by_routing_address() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let now = 1_700_000_000;
    let user = store
        .users()
        .create(
            now,
            UserNew {
                email: Some("owner@example.com".to_string()),
                bcc_address: "u_abc123@in.example.com".to_string(),
            },
        )
        .expect("create user");

    let found = store
        .users()
        .find_by_bcc_address("U_ABC123@IN.EXAMPLE.COM")
        .expect("find by bcc")
        .expect("user exists");
    assert_eq!(found.id, user.id);

    let fetched = store.users().get(user.id).expect("get").expect("exists");
    assert_eq!(fetched.bcc_address, "u_abc123@in.example.com");
}

#[test]
fn rejects_malformed_routing_address() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let err = store
        .users()
        .create(
            1_700_000_000,
            UserNew {
                email: None,
                bcc_address: "someone@example.com".to_string(),
            },
        )
        .expect_err("must reject");
    assert!(matches!(
        err.kind(),
        dealbrief_store::error::StoreErrorKind::Core
    ));
}

#[test]
fn bcc_address_is_unique() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let input = UserNew {
        email: None,
        bcc_address: "u_dup@in.example.com".to_string(),
    };
    store
        .users()
        .create(1_700_000_000, input.clone())
        .expect("first create");
    let err = store
        .users()
        .create(1_700_000_001, input)
        .expect_err("duplicate must fail");
    assert!(matches!(
        err.kind(),
        dealbrief_store::error::StoreErrorKind::Sql
    ));
}
