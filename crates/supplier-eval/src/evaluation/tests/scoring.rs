use super::common::assert_close;
use crate::evaluation::scoring::{composite_score, Rating, SubScores, WeightConfig};

#[test]
fn default_weights_combine_sub_scores() {
    let scores = SubScores {
        delivery: 90.0,
        quality: 95.0,
        price: 80.0,
        response: 85.0,
    };

    let composite = composite_score(&scores, &WeightConfig::default());

    assert_close(composite.overall, 88.5);
    assert_eq!(composite.rating, Rating::A);
}

#[test]
fn caller_weights_are_applied_as_given() {
    let scores = SubScores {
        delivery: 100.0,
        quality: 50.0,
        price: 0.0,
        response: 0.0,
    };

    let delivery_heavy = composite_score(&scores, &WeightConfig::new(70.0, 30.0, 0.0, 0.0));
    assert_close(delivery_heavy.overall, 85.0);

    // weights summing past 100 are not normalized
    let inflated = composite_score(&scores, &WeightConfig::new(100.0, 100.0, 0.0, 0.0));
    assert_close(inflated.overall, 150.0);
    assert_eq!(inflated.rating, Rating::APlus);
}

#[test]
fn rating_thresholds_are_inclusive() {
    assert_eq!(Rating::from_score(90.0), Rating::APlus);
    assert_eq!(Rating::from_score(89.99), Rating::A);
    assert_eq!(Rating::from_score(80.0), Rating::A);
    assert_eq!(Rating::from_score(79.99), Rating::B);
    assert_eq!(Rating::from_score(70.0), Rating::B);
    assert_eq!(Rating::from_score(60.0), Rating::C);
    assert_eq!(Rating::from_score(59.99), Rating::D);
    assert_eq!(Rating::from_score(0.0), Rating::D);
}

#[test]
fn rating_never_drops_as_score_rises() {
    let mut previous = Rating::from_score(0.0);
    for step in 0..=2_000 {
        let rating = Rating::from_score(f64::from(step) * 0.05);
        assert!(rating >= previous, "rating fell at score {}", f64::from(step) * 0.05);
        previous = rating;
    }
    assert_eq!(previous, Rating::APlus);
}

#[test]
fn rating_labels_round_trip_through_json() {
    assert_eq!(Rating::APlus.to_string(), "A+");
    assert_eq!(serde_json::to_string(&Rating::APlus).expect("serializes"), "\"A+\"");
    let parsed: Rating = serde_json::from_str("\"B\"").expect("deserializes");
    assert_eq!(parsed, Rating::B);
}

#[test]
fn weight_config_requires_all_dimensions() {
    let partial = serde_json::from_str::<WeightConfig>(r#"{"delivery": 50, "quality": 50}"#);
    assert!(partial.is_err());

    let full: WeightConfig = serde_json::from_str(
        r#"{"delivery": 40, "quality": 30, "price": 20, "response": 10}"#,
    )
    .expect("deserializes");
    assert_close(full.total(), 100.0);
}

#[test]
fn weight_config_rejects_negative_json_weights() {
    let negative = serde_json::from_str::<WeightConfig>(
        r#"{"delivery": 60, "quality": 60, "price": 0, "response": -20}"#,
    );
    assert!(negative.is_err());
    assert!("60,60,0,-20".parse::<WeightConfig>().is_err());
}

#[test]
fn rating_uses_unrounded_overall() {
    let scores = SubScores {
        delivery: 89.999,
        quality: 89.999,
        price: 89.999,
        response: 89.999,
    };

    let composite = composite_score(&scores, &WeightConfig::default());

    assert_close(composite.overall, 90.0);
    assert_eq!(composite.rating, Rating::A);
    assert_eq!(Rating::from_score(89.996), Rating::A);
}
