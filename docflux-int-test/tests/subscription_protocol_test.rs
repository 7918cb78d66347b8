use std::time::Duration;

use docflux::filter::field;
use docflux::reactive::UNBOUNDED_DEMAND;
use docflux_int_test::test_util::{cleanup, create_test_context, CollectingSubscriber};

const WAIT: Duration = Duration::from_secs(5);
const GRACE: Duration = Duration::from_millis(200);

#[test]
fn test_on_subscribe_arrives_first_and_once() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 10);

    let subscriber = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    collection.find_all().subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.subscribe_count(), 1);
    assert!(!subscriber.overlap_detected());
    assert_eq!(subscriber.signals_after_terminal(), 0);

    cleanup(ctx).unwrap();
}

#[test]
fn test_no_delivery_beyond_granted_demand() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 100);

    let subscriber = CollectingSubscriber::subscribing(5);
    collection.find_all().subscribe(subscriber.clone());

    assert!(subscriber.await_items(5, WAIT));
    // the producer must now be suspended, not completing or overrunning
    std::thread::sleep(GRACE);
    assert_eq!(subscriber.item_count(), 5);
    assert!(!subscriber.is_completed());
    assert_eq!(subscriber.subscription().outstanding_demand(), 0);

    subscriber.request_more(95);
    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 100);
    assert!(subscriber.is_completed());

    cleanup(ctx).unwrap();
}

#[test]
fn test_one_at_a_time_demand_accounting() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 20);

    // request one item per delivery: outstanding demand must return to zero
    // after every item
    let subscriber = CollectingSubscriber::subscribing(1);
    collection.find_all().subscribe(subscriber.clone());

    for expected in 1..=20 {
        assert!(subscriber.await_items(expected, WAIT));
        assert_eq!(subscriber.subscription().outstanding_demand(), 0);
        subscriber.request_more(1);
    }
    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 20);

    cleanup(ctx).unwrap();
}

#[test]
fn test_demand_in_excess_of_items_is_discarded_at_completion() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 3);

    let subscriber = CollectingSubscriber::subscribing(100);
    collection.find_all().subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 3);
    assert!(subscriber.is_completed());

    cleanup(ctx).unwrap();
}

#[test]
fn test_demand_saturates_instead_of_overflowing() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 5);

    let subscriber = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    collection.find_all().subscribe(subscriber.clone());
    // more demand on top of u64::MAX must not wrap to a small number
    subscriber.request_more(1000);

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 5);

    cleanup(ctx).unwrap();
}

#[test]
fn test_exactly_one_terminal_signal() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 50);

    let subscriber = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    collection.find_all().subscribe(subscriber.clone());

    assert!(subscriber.await_terminal(WAIT));
    std::thread::sleep(GRACE);
    assert_eq!(subscriber.completions(), 1);
    assert!(subscriber.error().is_none());
    assert_eq!(subscriber.signals_after_terminal(), 0);

    cleanup(ctx).unwrap();
}

#[test]
fn test_request_after_terminal_is_ignored() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 5);

    let subscriber = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    collection.find_all().subscribe(subscriber.clone());
    assert!(subscriber.await_terminal(WAIT));

    subscriber.request_more(10);
    assert_eq!(subscriber.subscription().outstanding_demand(), 0);
    std::thread::sleep(GRACE);
    assert_eq!(subscriber.signals_after_terminal(), 0);

    cleanup(ctx).unwrap();
}

#[test]
fn test_signals_never_overlap_under_racing_requests() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 200);

    let subscriber = CollectingSubscriber::subscribing(0);
    collection.find_all().subscribe(subscriber.clone());

    // hammer request() from several threads while items are flowing
    let mut handles = Vec::new();
    for _ in 0..4 {
        let granter = subscriber.subscription();
        handles.push(std::thread::spawn(move || {
            for _ in 0..50 {
                granter.request(1);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(subscriber.await_terminal(WAIT));
    assert_eq!(subscriber.item_count(), 200);
    assert!(!subscriber.overlap_detected());
    assert_eq!(subscriber.signals_after_terminal(), 0);

    cleanup(ctx).unwrap();
}

#[test]
fn test_publisher_is_cold_and_repeatable() {
    let ctx = create_test_context().unwrap();
    let collection = ctx.seeded_collection("test", 10);

    let publisher = collection.find(field("i").lt(5));

    let first = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    publisher.subscribe(first.clone());
    assert!(first.await_terminal(WAIT));

    // a second subscribe executes the operation again, with a fresh
    // subscription
    let second = CollectingSubscriber::subscribing(UNBOUNDED_DEMAND);
    publisher.subscribe(second.clone());
    assert!(second.await_terminal(WAIT));

    assert_eq!(first.item_count(), 5);
    assert_eq!(second.item_count(), 5);

    cleanup(ctx).unwrap();
}
