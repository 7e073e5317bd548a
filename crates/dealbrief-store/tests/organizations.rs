use dealbrief_core::domain::derive_org_name;
use dealbrief_store::repo::UserNew;
use dealbrief_store::Store;

fn seed_user(store: &Store) -> dealbrief_core::domain::User {
    store
        .users()
        .create(
            1_700_000_000,
            UserNew {
                email: None,
                bcc_address: "u_org@in.example.com".to_string(),
            },
        )
        .expect("create user")
}

#[test]
fn create_and_find_by_domain() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let user = seed_user(&store);

    let name = derive_org_name("acme-corp.com");
    let org = store
        .organizations()
        .create(1_700_000_100, user.id, "acme-corp.com", &name)
        .expect("create org");
    assert_eq!(org.name, "Acme Corp");

    let found = store
        .organizations()
        .find_by_domain(user.id, "ACME-CORP.COM")
        .expect("find")
        .expect("org exists");
    assert_eq!(found.id, org.id);
}

#[test]
fn conflicting_create_returns_existing_row() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let user = seed_user(&store);

    let first = store
        .organizations()
        .create(1_700_000_100, user.id, "acme.com", "Acme")
        .expect("first create");
    let second = store
        .organizations()
        .create(1_700_000_200, user.id, "acme.com", "Renamed Acme")
        .expect("second create");

    // The loser gets the winner's row; the stored name never changes.
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Acme");
    assert_eq!(
        store
            .organizations()
            .list_for_user(user.id)
            .expect("list")
            .len(),
        1
    );
}
