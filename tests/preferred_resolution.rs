//! Single-winner resolution for preferred contacts and primary
//! identifiers, including the concurrent-election scenario: after any
//! interleaving, exactly one row holds the flag per scope.

mod helpers;

use std::sync::Arc;
use std::thread;

use helpers::*;
use wellnecity_edm::model::{OrgIdentifier, PersonContact};
use wellnecity_edm::ops::{set_preferred_person_contact, set_primary_org_identifier};
use wellnecity_edm::store::MemoryStore;

fn preferred_count(store: &MemoryStore, person_id: uuid::Uuid) -> usize {
    store
        .find::<PersonContact, _>(|c| c.person_id == person_id && c.is_preferred)
        .unwrap()
        .len()
}

#[test]
fn electing_a_new_preferred_contact_demotes_the_old_one() {
    let store = open_store();
    let person = make_person("Quinn", "Abara");
    store.insert(&person).unwrap();

    let first = make_person_contact(person.id, true);
    let second = make_person_contact(person.id, false);
    store.insert(&first).unwrap();
    store.insert(&second).unwrap();

    set_preferred_person_contact(&store, second.id).unwrap();

    assert_eq!(preferred_count(&store, person.id), 1);
    let (winner, _) = store.get::<PersonContact>(second.id).unwrap().unwrap();
    assert!(winner.is_preferred);
    let (loser, _) = store.get::<PersonContact>(first.id).unwrap().unwrap();
    assert!(!loser.is_preferred);
}

#[test]
fn at_most_one_preferred_contact_survives_many_sequential_elections() {
    let store = open_store();
    let person = make_person("Harper", "Lindqvist");
    store.insert(&person).unwrap();

    let contacts: Vec<_> = (0..5)
        .map(|_| {
            let contact = make_person_contact(person.id, false);
            store.insert(&contact).unwrap();
            contact.id
        })
        .collect();

    for id in &contacts {
        set_preferred_person_contact(&store, *id).unwrap();
        assert_eq!(preferred_count(&store, person.id), 1);
    }
    // Last write wins.
    let (winner, _) = store.get::<PersonContact>(contacts[4]).unwrap().unwrap();
    assert!(winner.is_preferred);
}

#[test]
fn concurrent_primary_identifier_elections_leave_exactly_one_winner() {
    init_tracing();
    let store = Arc::new(open_store());
    let org = make_org("Contested Org");
    store.insert(&org).unwrap();

    let first = make_org_identifier(org.id, false);
    let second = make_org_identifier(org.id, false);
    store.insert(&first).unwrap();
    store.insert(&second).unwrap();

    let handles: Vec<_> = [first.id, second.id]
        .into_iter()
        .map(|candidate| {
            let store = Arc::clone(&store);
            thread::spawn(move || set_primary_org_identifier(&store, candidate))
        })
        .collect();
    for handle in handles {
        // Both elections may succeed (one after the other) — the
        // invariant is about the final state, not which one won.
        handle.join().unwrap().unwrap();
    }

    let winners = store
        .find::<OrgIdentifier, _>(|i| i.org_id == org.id && i.is_primary)
        .unwrap();
    assert_eq!(winners.len(), 1, "expected exactly one primary identifier");
}

#[test]
fn elections_are_scoped_by_identifier_type() {
    let store = open_store();
    let org = make_org("Multi-Id Org");
    store.insert(&org).unwrap();

    let tax = make_org_identifier(org.id, false);
    let mut npi = make_org_identifier(org.id, false);
    npi.identifier_type = wellnecity_edm::model::OrgIdentifierType::Npi;
    npi.identifier_value = "1093817465".into();
    store.insert(&tax).unwrap();
    store.insert(&npi).unwrap();

    set_primary_org_identifier(&store, tax.id).unwrap();
    set_primary_org_identifier(&store, npi.id).unwrap();

    // Different types hold independent winners.
    let winners = store
        .find::<OrgIdentifier, _>(|i| i.org_id == org.id && i.is_primary)
        .unwrap();
    assert_eq!(winners.len(), 2);
}
