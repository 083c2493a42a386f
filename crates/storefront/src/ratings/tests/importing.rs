use super::common::*;
use crate::catalog::{ClientId, ProductId};
use crate::ratings::import::{InteractionImportError, InteractionLogImporter};
use crate::ratings::store::RatingStore;
use std::io::Cursor;

#[test]
fn replay_tallies_outcomes_and_persists_the_peak() {
    let (service, _, _, store, _) = build_service();

    let log = "Client ID,Product ID,Interaction,Quantity\n\
               client-1,product-1,view,\n\
               client-1,product-1,purchase,2\n\
               client-1,product-1,click,\n";
    let summary =
        InteractionLogImporter::from_reader(Cursor::new(log), &service).expect("replay runs");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);

    let stored = store
        .find(
            &ClientId("client-1".to_string()),
            &ProductId("product-1".to_string()),
        )
        .expect("find")
        .expect("record present");
    assert_eq!(stored.value, 5.0);
}

#[test]
fn rows_the_service_rejects_are_counted_not_fatal() {
    let (service, _, _, store, _) = build_service();

    let log = "Client ID,Product ID,Interaction,Quantity\n\
               client-9,product-1,view,\n\
               client-1,product-1,rating,9\n\
               client-1,product-1,add to cart,\n";
    let summary =
        InteractionLogImporter::from_reader(Cursor::new(log), &service).expect("replay runs");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.created, 1);

    let stored = store
        .find(
            &ClientId("client-1".to_string()),
            &ProductId("product-1".to_string()),
        )
        .expect("find")
        .expect("record present");
    assert_eq!(stored.value, 3.0);
}

#[test]
fn unrecognized_interaction_labels_replay_as_skips() {
    let (service, _, _, store, _) = build_service();

    let log = "Client ID,Product ID,Interaction,Quantity\n\
               client-1,product-1,wishlist,\n";
    let summary =
        InteractionLogImporter::from_reader(Cursor::new(log), &service).expect("replay runs");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(store.len(), 0);
}

#[test]
fn malformed_rows_abort_with_the_line_number() {
    let (service, _, _, _, _) = build_service();

    let log = "Client ID,Product ID,Interaction,Quantity\n\
               client-1,product-1,view,\n\
               client-1,,view,\n";
    match InteractionLogImporter::from_reader(Cursor::new(log), &service) {
        Err(InteractionImportError::InvalidEvent { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("product id"));
        }
        other => panic!("expected invalid event error, got {other:?}"),
    }
}
