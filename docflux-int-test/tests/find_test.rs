use std::time::Duration;

use docflux::collection::exclude_id;
use docflux::common::descending;
use docflux::errors::ErrorKind;
use docflux::filter::{and, exists, field};
use docflux::reactive::UNBOUNDED_DEMAND;
use docflux::Value;
use docflux_int_test::test_util::{cleanup, create_test_context, CollectingSubscriber};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_find_first_document() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 100);

    let subscriber = CollectingSubscriber::subscribing(1);
    collection.find_all().first().subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 1);
    assert!(subscriber.is_completed());
    assert_eq!(
        subscriber.items()[0].get("i").unwrap(),
        Value::I32(0),
        "store-native order starts at the first inserted document"
    );

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_first_on_empty_collection_completes_without_item() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.collection("empty");

    let subscriber = CollectingSubscriber::subscribing(1);
    collection.find_all().first().subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 0);
    assert!(subscriber.is_completed());

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_filter_eq() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 100);

    let subscriber = CollectingSubscriber::subscribing(1);
    collection
        .find(field("i").eq(71))
        .first()
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 1);
    assert_eq!(subscriber.items()[0].get("i").unwrap(), Value::I32(71));

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_filter_gt() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 100);

    let subscriber = CollectingSubscriber::subscribing(100);
    collection
        .find(field("i").gt(50))
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert!(subscriber.is_completed());

    let values: Vec<_> = subscriber
        .items()
        .iter()
        .map(|doc| doc.get("i").unwrap())
        .collect();
    let expected: Vec<_> = (51..100).map(Value::I32).collect();
    assert_eq!(values, expected, "matches arrive in store-native order");

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_filter_gt_and_lte() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 100);

    let subscriber = CollectingSubscriber::subscribing(100);
    collection
        .find(and(vec![field("i").gt(50), field("i").lte(53)]))
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    let values: Vec<_> = subscriber
        .items()
        .iter()
        .map(|doc| doc.get("i").unwrap())
        .collect();
    assert_eq!(values, vec![Value::I32(51), Value::I32(52), Value::I32(53)]);

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_sort_descending() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 100);

    let subscriber = CollectingSubscriber::subscribing(100);
    collection
        .find(exists("i"))
        .sort(descending("i"))
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    let values: Vec<_> = subscriber
        .items()
        .iter()
        .map(|doc| doc.get("i").unwrap().as_i64().unwrap())
        .collect();
    assert_eq!(values.len(), 100);
    assert!(
        values.windows(2).all(|pair| pair[0] > pair[1]),
        "items must be in strictly decreasing order"
    );

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_projection_excluding_id() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 10);

    let subscriber = CollectingSubscriber::subscribing(120);
    collection
        .find_all()
        .projection(exclude_id())
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 10);
    for doc in subscriber.items() {
        assert!(doc.id().is_none());
        assert!(doc.has_field("i"));
    }

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_without_projection_keeps_id() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 5);

    let subscriber = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    collection.find_all().subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    for doc in subscriber.items() {
        assert!(doc.id().is_some());
    }

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_regex_filter() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.collection("people");
    {
        let subscriber = CollectingSubscriber::subscribing(1);
        collection
            .insert_many(vec![
                docflux::doc! { name: "alice" },
                docflux::doc! { name: "bob" },
                docflux::doc! { name: "anna" },
            ])
            .subscribe(subscriber.clone());
        assert!(subscriber.await_terminal(WAIT));
    }

    let subscriber = CollectingSubscriber::subscribing(10);
    collection
        .find(field("name").regex("^a"))
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 2);

    cleanup(ctx).unwrap();
}

#[test]
fn test_find_with_malformed_filter_errors() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 10);

    let subscriber = CollectingSubscriber::subscribing(10);
    collection
        .find(field("i").gt(Value::Array(vec![Value::I32(1)])))
        .subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 0);
    assert!(!subscriber.is_completed());
    assert_eq!(subscriber.error().unwrap().kind(), &ErrorKind::FilterError);

    cleanup(ctx).unwrap();
}
