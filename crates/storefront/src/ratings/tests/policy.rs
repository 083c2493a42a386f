use super::common::{event, rating_event};
use crate::ratings::domain::InteractionKind;
use crate::ratings::policy::{InteractionWeights, PolicyError, RatingPolicy};

#[test]
fn stock_weight_table_matches_business_constants() {
    let policy = RatingPolicy::default();
    let cases = [
        (InteractionKind::View, 1.0),
        (InteractionKind::Click, 2.0),
        (InteractionKind::Search, 0.5),
        (InteractionKind::AddToCart, 3.0),
        (InteractionKind::Purchase, 5.0),
    ];

    for (kind, expected) in cases {
        let scored = policy
            .score(&event("client-1", "product-1", kind))
            .expect("weighted kinds score");
        assert_eq!(scored, Some(expected), "kind {kind:?}");
    }
}

#[test]
fn explicit_rating_uses_the_carried_value() {
    let policy = RatingPolicy::default();
    let scored = policy
        .score(&rating_event("client-1", "product-1", 4))
        .expect("in-range rating scores");
    assert_eq!(scored, Some(4.0));
}

#[test]
fn explicit_rating_without_value_is_rejected() {
    let policy = RatingPolicy::default();
    let mut event = rating_event("client-1", "product-1", 4);
    event.quantity = None;

    assert_eq!(
        policy.score(&event),
        Err(PolicyError::MissingRatingValue),
    );
}

#[test]
fn explicit_rating_outside_range_is_rejected() {
    let policy = RatingPolicy::default();

    assert_eq!(
        policy.score(&rating_event("client-1", "product-1", 7)),
        Err(PolicyError::OutOfRangeRating(7)),
    );
    assert_eq!(
        policy.score(&rating_event("client-1", "product-1", -1)),
        Err(PolicyError::OutOfRangeRating(-1)),
    );
}

#[test]
fn range_boundaries_are_inclusive() {
    let policy = RatingPolicy::default();
    assert_eq!(
        policy
            .score(&rating_event("client-1", "product-1", 0))
            .expect("zero is a valid rating"),
        Some(0.0)
    );
    assert_eq!(
        policy
            .score(&rating_event("client-1", "product-1", 5))
            .expect("five is a valid rating"),
        Some(5.0)
    );
}

#[test]
fn unrecognized_kind_produces_no_score() {
    let policy = RatingPolicy::default();
    let scored = policy
        .score(&event("client-1", "product-1", InteractionKind::Other))
        .expect("unknown kinds are not errors");
    assert_eq!(scored, None);
}

#[test]
fn purchase_quantity_does_not_change_the_weight() {
    let policy = RatingPolicy::default();
    let mut purchase = event("client-1", "product-1", InteractionKind::Purchase);
    purchase.quantity = Some(12);

    let scored = policy.score(&purchase).expect("purchase scores");
    assert_eq!(scored, Some(5.0));
}

#[test]
fn configured_weights_override_the_table() {
    let policy = RatingPolicy::new(InteractionWeights {
        click: 2.5,
        ..InteractionWeights::default()
    });

    let scored = policy
        .score(&event("client-1", "product-1", InteractionKind::Click))
        .expect("click scores");
    assert_eq!(scored, Some(2.5));
}
