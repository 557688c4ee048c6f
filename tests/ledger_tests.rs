//! Service-level tests for the lending ledger and the entity store

mod common;

use libra_server::{
    error::AppError,
    models::{
        book::UpdateBook,
        borrow::Availability,
        client::UpdateClient,
        user::{CreateUser, Role, UpdateUser},
    },
};

use common::{sample_book, sample_client, test_state};

#[tokio::test]
async fn availability_tracks_copies_and_holders() {
    let state = test_state().await;
    let services = &state.services;

    let book = services
        .catalog
        .create_book(sample_book("9780306406157", 2))
        .await
        .unwrap();
    let ana = services
        .clients
        .create_client(sample_client("ana@example.com", "0721000001"))
        .await
        .unwrap();
    let bogdan = services
        .clients
        .create_client(sample_client("bogdan@example.com", "0721000002"))
        .await
        .unwrap();
    let carmen = services
        .clients
        .create_client(sample_client("carmen@example.com", "0721000003"))
        .await
        .unwrap();

    // Two copies, nobody holds one yet
    assert_eq!(
        services.ledger.availability(&book.isbn, ana.id).await.unwrap(),
        Availability::Available
    );

    let first = services.ledger.create_borrow(ana.id, &book.isbn).await.unwrap();

    // Ana holds a copy: she may not take a second, others still may
    assert_eq!(
        services.ledger.availability(&book.isbn, ana.id).await.unwrap(),
        Availability::AlreadyBorrowed
    );
    assert_eq!(
        services.ledger.availability(&book.isbn, bogdan.id).await.unwrap(),
        Availability::Available
    );

    services.ledger.create_borrow(bogdan.id, &book.isbn).await.unwrap();

    // All copies out
    assert_eq!(
        services.ledger.availability(&book.isbn, carmen.id).await.unwrap(),
        Availability::NoCopies
    );
    let err = services
        .ledger
        .create_borrow(carmen.id, &book.isbn)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));

    // A return frees a copy
    services.ledger.return_borrow(first.id).await.unwrap();
    assert_eq!(
        services.ledger.availability(&book.isbn, carmen.id).await.unwrap(),
        Availability::Available
    );
    // The returned record no longer counts as a hold for Ana either
    assert_eq!(
        services.ledger.availability(&book.isbn, ana.id).await.unwrap(),
        Availability::Available
    );
}

#[tokio::test]
async fn availability_of_unknown_book_is_not_found() {
    let state = test_state().await;
    let services = &state.services;

    let client = services
        .clients
        .create_client(sample_client("x@example.com", "0721999999"))
        .await
        .unwrap();

    let err = services
        .ledger
        .availability("9999999999999", client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn borrow_dates_span_one_loan_period() {
    let state = test_state().await;
    let services = &state.services;
    let period = chrono::Duration::days(state.config.loans.loan_period_days);

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let client = services
        .clients
        .create_client(sample_client("d@example.com", "0721000004"))
        .await
        .unwrap();

    let borrow = services
        .ledger
        .create_borrow(client.id, "9780306406157")
        .await
        .unwrap();
    assert_eq!(borrow.end_date, borrow.start_date + period);
    assert!(!borrow.returned);
}

#[tokio::test]
async fn extension_counts_from_the_prior_due_date() {
    let state = test_state().await;
    let services = &state.services;
    let period = chrono::Duration::days(state.config.loans.loan_period_days);

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let client = services
        .clients
        .create_client(sample_client("e@example.com", "0721000005"))
        .await
        .unwrap();

    let borrow = services
        .ledger
        .create_borrow(client.id, "9780306406157")
        .await
        .unwrap();
    let extended = services.ledger.extend_borrow(borrow.id).await.unwrap();

    assert_eq!(extended.end_date, borrow.end_date + period);
    assert_eq!(extended.start_date, borrow.start_date);
}

#[tokio::test]
async fn returned_borrows_are_terminal() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let client = services
        .clients
        .create_client(sample_client("f@example.com", "0721000006"))
        .await
        .unwrap();

    let borrow = services
        .ledger
        .create_borrow(client.id, "9780306406157")
        .await
        .unwrap();
    let returned = services.ledger.return_borrow(borrow.id).await.unwrap();
    assert!(returned.returned);

    let err = services.ledger.extend_borrow(borrow.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let err = services.ledger.return_borrow(borrow.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn extending_an_unknown_borrow_is_not_found() {
    let state = test_state().await;

    let err = state.services.ledger.extend_borrow(4242).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn revocation_is_idempotent_and_frees_the_copy() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let ana = services
        .clients
        .create_client(sample_client("g@example.com", "0721000007"))
        .await
        .unwrap();
    let bogdan = services
        .clients
        .create_client(sample_client("h@example.com", "0721000008"))
        .await
        .unwrap();

    let borrow = services
        .ledger
        .create_borrow(ana.id, "9780306406157")
        .await
        .unwrap();
    services.ledger.revoke_borrow(borrow.id).await.unwrap();
    // A second revocation of the same id succeeds as a no-op
    services.ledger.revoke_borrow(borrow.id).await.unwrap();
    // So does revoking an id that never existed
    services.ledger.revoke_borrow(999_999).await.unwrap();

    assert_eq!(
        services.ledger.availability("9780306406157", bogdan.id).await.unwrap(),
        Availability::Available
    );
}

#[tokio::test]
async fn copy_count_cannot_drop_below_active_borrows() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 2))
        .await
        .unwrap();
    let ana = services
        .clients
        .create_client(sample_client("j@example.com", "0721000010"))
        .await
        .unwrap();
    let bogdan = services
        .clients
        .create_client(sample_client("k@example.com", "0721000011"))
        .await
        .unwrap();

    services.ledger.create_borrow(ana.id, "9780306406157").await.unwrap();
    let second = services
        .ledger
        .create_borrow(bogdan.id, "9780306406157")
        .await
        .unwrap();

    let shrink = |items| UpdateBook {
        title: "The Name of the Rose".to_string(),
        author: "Umberto Eco".to_string(),
        items,
    };

    // Two copies are out, so neither 0 nor 1 may be accepted
    let err = services
        .catalog
        .update_book("9780306406157", shrink(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = services
        .catalog
        .update_book("9780306406157", shrink(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Matching the active count exactly is fine
    let updated = services
        .catalog
        .update_book("9780306406157", shrink(2))
        .await
        .unwrap();
    assert_eq!(updated.items, 2);

    // A return frees a copy, after which shrinking to one succeeds
    services.ledger.return_borrow(second.id).await.unwrap();
    let updated = services
        .catalog
        .update_book("9780306406157", shrink(1))
        .await
        .unwrap();
    assert_eq!(updated.items, 1);
}

#[tokio::test]
async fn concurrent_creates_never_exceed_the_copy_count() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();

    let mut clients = Vec::new();
    for i in 0..4 {
        clients.push(
            services
                .clients
                .create_client(sample_client(
                    &format!("race{}@example.com", i),
                    &format!("072166600{}", i),
                ))
                .await
                .unwrap(),
        );
    }

    let mut handles = Vec::new();
    for client in &clients {
        let services = state.services.clone();
        let client_id = client.id;
        handles.push(tokio::spawn(async move {
            services.ledger.create_borrow(client_id, "9780306406157").await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert!(matches!(err, AppError::Unavailable(_))),
        }
    }
    assert_eq!(successes, 1);

    let active = services
        .ledger
        .borrowers("9780306406157")
        .await
        .unwrap()
        .iter()
        .filter(|b| !b.borrow.returned)
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn deleting_entities_with_active_borrows_is_rejected() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let client = services
        .clients
        .create_client(sample_client("i@example.com", "0721000009"))
        .await
        .unwrap();

    let borrow = services
        .ledger
        .create_borrow(client.id, "9780306406157")
        .await
        .unwrap();

    let err = services.catalog.delete_book("9780306406157").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = services.clients.delete_client(client.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Once returned, the history rows cascade away with the parent
    services.ledger.return_borrow(borrow.id).await.unwrap();
    services.catalog.delete_book("9780306406157").await.unwrap();
    services.clients.delete_client(client.id).await.unwrap();
}

#[tokio::test]
async fn duplicate_isbn_email_and_phone_conflict() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let err = services
        .catalog
        .create_book(sample_book("9780306406157", 3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    services
        .clients
        .create_client(sample_client("dup@example.com", "0721111111"))
        .await
        .unwrap();
    let err = services
        .clients
        .create_client(sample_client("dup@example.com", "0722222222"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The phone is normalized before the uniqueness check, so a formatted
    // variant of the same digits collides too
    let err = services
        .clients
        .create_client(sample_client("other@example.com", "+0 721 111 111"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn client_short_code_resolves_back_to_the_same_client() {
    let state = test_state().await;
    let services = &state.services;

    let client = services
        .clients
        .create_client(sample_client("code@example.com", "0721333333"))
        .await
        .unwrap();

    let code = services.clients.short_code(client.id);
    assert_eq!(code.len(), 26);

    let resolved = services.clients.resolve_id(&code).unwrap();
    assert_eq!(resolved, client.id);

    // Scanner output is sometimes lowercased
    let resolved = services.clients.resolve_id(&code.to_lowercase()).unwrap();
    assert_eq!(resolved, client.id);

    let err = services.clients.resolve_id("not-an-id").unwrap_err();
    assert!(matches!(err, AppError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn borrow_listing_for_unknown_parents_is_not_found() {
    let state = test_state().await;
    let services = &state.services;

    let err = services
        .ledger
        .borrowed_books(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = services.ledger.borrowers("9999999999999").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn late_flag_is_derived_not_stored() {
    let state = test_state().await;
    let services = &state.services;

    services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let client = services
        .clients
        .create_client(sample_client("late@example.com", "0721444444"))
        .await
        .unwrap();

    services
        .ledger
        .create_borrow(client.id, "9780306406157")
        .await
        .unwrap();

    let borrows = services.ledger.borrowed_books(client.id).await.unwrap();
    assert_eq!(borrows.len(), 1);
    // Due date is in the future, so a fresh borrow is never late
    assert!(!borrows[0].borrow.late);
    assert!(!borrows[0].borrow.returned);
    assert_eq!(borrows[0].book.isbn, "9780306406157");
}

#[tokio::test]
async fn the_last_admin_cannot_be_deleted_or_demoted() {
    let state = test_state().await;
    let services = &state.services;

    // Seeded admin is the only one
    let err = services.users.delete_user("admin", "someone-else").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let demote = UpdateUser {
        first_name: "Administrator".to_string(),
        last_name: String::new(),
        password: None,
        role: Some(Role::User),
    };
    let err = services.users.update_user("admin", demote).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // With a second admin in place the first may go
    services
        .users
        .create_user(CreateUser {
            username: "backup".to_string(),
            password: "s3cret".to_string(),
            first_name: "Backup".to_string(),
            last_name: "Admin".to_string(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    services.users.delete_user("admin", "backup").await.unwrap();
}

#[tokio::test]
async fn users_cannot_delete_themselves() {
    let state = test_state().await;

    let err = state
        .services
        .users
        .delete_user("admin", "admin")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn authentication_checks_the_argon2_hash() {
    let state = test_state().await;
    let services = &state.services;

    let (token, user) = services.users.authenticate("admin", "admin").await.unwrap();
    assert!(!token.is_empty());
    assert_eq!(user.username, "admin");
    assert_eq!(user.role, Role::Admin);

    let err = services.users.authenticate("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
    let err = services.users.authenticate("ghost", "admin").await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
}

#[tokio::test]
async fn client_update_normalizes_the_phone() {
    let state = test_state().await;
    let services = &state.services;

    let client = services
        .clients
        .create_client(sample_client("norm@example.com", "0721 555 555"))
        .await
        .unwrap();
    assert_eq!(client.phone, "0721555555");

    let updated = services
        .clients
        .update_client(
            client.id,
            UpdateClient {
                first_name: client.first_name.clone(),
                last_name: client.last_name.clone(),
                email: client.email.clone(),
                phone: "+40 (721) 666-666".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone, "40721666666");
}
