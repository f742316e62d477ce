// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use rolodex_app::{
    ContextId, FilterExpr, Person, PersonField, RecordCollection, RemoteEvent, RequestId,
    SearchCase, SortState,
};
use rolodex_db::{DbCollection, Store};
use std::sync::mpsc::{self, Receiver};

fn seeded() -> Result<(DbCollection, Receiver<RemoteEvent>)> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo()?;
    let (tx, rx) = mpsc::channel();
    Ok((DbCollection::new(store, tx)?, rx))
}

fn drain(rx: &Receiver<RemoteEvent>) -> Vec<RemoteEvent> {
    rx.try_iter().collect()
}

fn find(collection: &DbCollection, user_name: &str) -> ContextId {
    collection
        .contexts()
        .into_iter()
        .find(|context| {
            collection.field(*context, PersonField::UserName).as_deref() == Some(user_name)
        })
        .expect("seeded user present")
}

#[test]
fn fresh_collection_has_no_pending_changes() -> Result<()> {
    let (collection, rx) = seeded()?;
    assert_eq!(collection.contexts().len(), 12);
    assert!(!collection.has_pending_changes());
    assert!(drain(&rx).is_empty());
    Ok(())
}

#[test]
fn sorter_and_filter_shape_the_projection() -> Result<()> {
    let (mut collection, _rx) = seeded()?;

    collection.set_sorter(SortState::Ascending.sorter());
    let last_names = collection
        .contexts()
        .into_iter()
        .filter_map(|context| collection.field(context, PersonField::LastName))
        .collect::<Vec<_>>();
    let mut sorted = last_names.clone();
    sorted.sort();
    assert_eq!(last_names, sorted);

    collection.set_filter(Some(FilterExpr::contains(
        PersonField::LastName,
        "ash",
        SearchCase::Insensitive,
    )));
    let visible = collection.contexts();
    assert_eq!(visible.len(), 1);
    assert_eq!(
        collection.field(visible[0], PersonField::UserName).as_deref(),
        Some("willieashmore")
    );

    collection.set_filter(Some(FilterExpr::contains(
        PersonField::LastName,
        "ash",
        SearchCase::Sensitive,
    )));
    assert!(collection.contexts().is_empty());
    Ok(())
}

#[test]
fn edit_then_reset_restores_committed_values() -> Result<()> {
    let (mut collection, _rx) = seeded()?;
    let context = find(&collection, "russellwhyte");

    collection.set_field(context, PersonField::FirstName, "Rusty")?;
    assert!(collection.has_pending_changes());

    collection.reset_changes()?;
    assert!(!collection.has_pending_changes());
    assert_eq!(
        collection.field(context, PersonField::FirstName).as_deref(),
        Some("Russell")
    );
    Ok(())
}

#[test]
fn created_record_commits_with_the_batch() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let context = collection.create_record(Person::blank())?;
    assert!(collection.has_pending_changes());
    assert_eq!(collection.person_id(context), None);

    collection.set_field(context, PersonField::UserName, "newperson")?;
    collection.set_field(context, PersonField::LastName, "Newman")?;
    collection.submit_batch(RequestId::new(1), "peopleGroup")?;

    assert_eq!(
        drain(&rx),
        vec![RemoteEvent::BatchSettled {
            request_id: RequestId::new(1),
            result: Ok(()),
        }]
    );
    assert!(!collection.has_pending_changes());
    let person_id = collection.person_id(context).expect("committed row has id");
    let stored = collection.store().get_person(person_id)?.expect("row stored");
    assert_eq!(stored.person.last_name, "Newman");
    Ok(())
}

#[test]
fn rejected_batch_emits_technical_messages_and_keeps_changes() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let before = collection.store().list_people()?;
    let context = find(&collection, "scottketchum");
    collection.set_field(context, PersonField::LastName, "Changed")?;
    collection.create_record(Person::blank())?;

    collection.submit_batch(RequestId::new(4), "peopleGroup")?;

    let events = drain(&rx);
    assert_eq!(events.len(), 2);
    let RemoteEvent::Messages(messages) = &events[0] else {
        panic!("messages first, got {events:?}");
    };
    assert!(messages.iter().all(|message| message.technical));
    assert!(matches!(
        &events[1],
        RemoteEvent::BatchSettled { result: Err(error), .. } if !error.is_canceled()
    ));
    assert!(collection.has_pending_changes());
    assert_eq!(collection.store().list_people()?, before);
    Ok(())
}

#[test]
fn pending_delete_hides_row_until_commit() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let context = find(&collection, "ronaldmundy");

    collection.delete(RequestId::new(2), context)?;
    assert!(!collection.contexts().contains(&context));
    assert!(collection.has_pending_changes());
    assert!(drain(&rx).is_empty());

    collection.submit_batch(RequestId::new(3), "peopleGroup")?;
    let events = drain(&rx);
    assert!(events.contains(&RemoteEvent::DeleteSettled {
        request_id: RequestId::new(2),
        context,
        result: Ok(()),
    }));
    assert_eq!(collection.store().person_count()?, 11);
    Ok(())
}

#[test]
fn reset_cancels_pending_deletes() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let context = find(&collection, "ronaldmundy");
    collection.delete(RequestId::new(5), context)?;

    collection.reset_changes()?;

    let events = drain(&rx);
    let [RemoteEvent::DeleteSettled {
        request_id,
        result: Err(error),
        ..
    }] = events.as_slice()
    else {
        panic!("expected one canceled delete, got {events:?}");
    };
    assert_eq!(*request_id, RequestId::new(5));
    assert!(error.is_canceled());
    assert!(collection.contexts().contains(&context));
    assert!(!collection.has_pending_changes());
    Ok(())
}

#[test]
fn deleting_a_transient_record_settles_at_once() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let context = collection.create_record(Person::blank())?;

    collection.delete(RequestId::new(8), context)?;

    assert_eq!(
        drain(&rx),
        vec![RemoteEvent::DeleteSettled {
            request_id: RequestId::new(8),
            context,
            result: Ok(()),
        }]
    );
    assert!(!collection.has_pending_changes());
    Ok(())
}

#[test]
fn refresh_reports_vanished_kept_alive_rows_only() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let pinned = find(&collection, "clydeguess");
    let unpinned = find(&collection, "keithpinckney");
    collection.set_keep_alive(pinned, true)?;

    for context in [pinned, unpinned] {
        let person_id = collection.person_id(context).expect("persisted");
        collection.store().delete_person(person_id)?;
    }
    collection.refresh()?;

    assert_eq!(
        drain(&rx),
        vec![RemoteEvent::ContextVanished { context: pinned }]
    );
    assert_eq!(collection.record(pinned), None);
    assert!(!collection.contexts().contains(&unpinned));
    collection.set_keep_alive(pinned, false)?;
    Ok(())
}

#[test]
fn refresh_keeps_local_edits_and_picks_up_new_rows() -> Result<()> {
    let (mut collection, _rx) = seeded()?;
    let context = find(&collection, "elainestewart");
    collection.set_field(context, PersonField::Age, "40")?;
    collection.store().insert_person(&Person {
        user_name: "outsider".to_owned(),
        ..Person::blank()
    })?;

    collection.refresh()?;

    assert_eq!(collection.contexts().len(), 13);
    assert_eq!(
        collection.field(context, PersonField::Age).as_deref(),
        Some("40")
    );
    assert!(collection.has_pending_changes());
    Ok(())
}

#[test]
fn reset_data_source_settles_through_the_channel() -> Result<()> {
    let (mut collection, rx) = seeded()?;
    let context = find(&collection, "salliesampson");
    let person_id = collection.person_id(context).expect("persisted");
    collection.store().delete_person(person_id)?;

    collection.reset_data_source(RequestId::new(9))?;

    assert_eq!(
        drain(&rx),
        vec![RemoteEvent::ResetSettled {
            request_id: RequestId::new(9),
            result: Ok(()),
        }]
    );
    collection.refresh()?;
    assert_eq!(collection.contexts().len(), 12);
    Ok(())
}

#[test]
fn kept_alive_record_stays_readable_when_filtered_out() -> Result<()> {
    let (mut collection, _rx) = seeded()?;
    let context = find(&collection, "ursulabright");
    collection.set_keep_alive(context, true)?;
    collection.set_filter(Some(FilterExpr::contains(
        PersonField::LastName,
        "Whyte",
        SearchCase::Sensitive,
    )));

    assert!(!collection.contexts().contains(&context));
    assert!(collection.is_kept_alive(context));
    assert_eq!(
        collection.field(context, PersonField::LastName).as_deref(),
        Some("Bright")
    );
    Ok(())
}
