use super::*;
use shared::protocol::{ClassEcho, InputEcho};

fn result(survived: bool, survival_probability: f64, confidence: f64) -> PredictionResult {
    PredictionResult {
        survived,
        label: if survived { "Survived" } else { "Did Not Survive" }.to_string(),
        survival_probability,
        confidence,
        death_probability: None,
        echoed_input: InputEcho {
            class: ClassEcho::Number(1),
            gender: "female".to_string(),
            age: 17.0,
            family_size: 2,
            fare: 80.0,
            embarked: None,
        },
    }
}

#[test]
fn probability_renders_with_one_decimal() {
    let view = present(&result(true, 0.73, 0.73));
    assert_eq!(view.survival_probability, "73.0%");
    assert_eq!(view.confidence, "73.0%");
    assert_eq!(format_percent(0.91), "91.0%");
    assert_eq!(format_percent(0.1234), "12.3%");
}

#[test]
fn rose_prediction_shows_echoed_family_size() {
    let view = present(&result(true, 0.91, 0.95));

    assert_eq!(view.outcome, Outcome::Survived);
    assert_eq!(view.outcome.icon(), "✅");
    assert_eq!(view.headline, "Survived");
    assert_eq!(view.family_size, 2);
    assert_eq!(view.detail("Family Size"), Some("2"));
    assert_eq!(view.detail("Class"), Some("1st Class"));
    assert_eq!(view.detail("Gender"), Some("female"));
    assert_eq!(view.detail("Age"), Some("17 yrs"));
    assert_eq!(view.detail("Fare"), Some("£80"));
    assert_eq!(view.detail("Confidence"), Some("95.0%"));
    assert_eq!(view.detail("Embarked"), None);
}

#[test]
fn family_size_is_taken_from_the_echo_not_recomputed() {
    let mut prediction = result(false, 0.2, 0.8);
    prediction.echoed_input.family_size = 3;
    let view = present(&prediction);
    assert_eq!(view.detail("Family Size"), Some("3"));
    assert_eq!(view.outcome.css_class(), "died");
}

#[test]
fn out_of_range_values_are_not_clamped() {
    let view = present(&result(true, 1.5, -0.1));
    assert_eq!(view.survival_probability, "150.0%");
    assert_eq!(view.survival_bar_width, 150.0);
    assert_eq!(view.confidence, "-10.0%");
}

#[test]
fn optional_backend_extras_are_shown_when_present() {
    let mut prediction = result(false, 0.1234, 0.8766);
    prediction.death_probability = Some(0.8766);
    prediction.echoed_input.class = ClassEcho::Label("3rd Class".to_string());
    prediction.echoed_input.embarked = Some("S".to_string());
    prediction.echoed_input.fare = 7.25;

    let view = present(&prediction);
    assert_eq!(view.death_probability.as_deref(), Some("87.7%"));
    assert_eq!(view.detail("Class"), Some("3rd Class"));
    assert_eq!(view.detail("Embarked"), Some("S"));
    assert_eq!(view.detail("Fare"), Some("£7.25"));
}
