//! Maps a prediction into display-ready text. Values outside [0, 1] are shown as-is.

use shared::protocol::PredictionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Survived,
    Died,
}

impl Outcome {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Survived => "✅",
            Self::Died => "❌",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Survived => "survived",
            Self::Died => "died",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub outcome: Outcome,
    pub headline: String,
    pub survival_probability: String,
    /// Progress bar fill in percent, unclamped.
    pub survival_bar_width: f64,
    pub confidence: String,
    pub death_probability: Option<String>,
    pub family_size: u32,
    pub details: Vec<DetailRow>,
}

impl ResultView {
    pub fn detail(&self, label: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// `0.73` becomes `"73.0%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn present(result: &PredictionResult) -> ResultView {
    let outcome = if result.survived {
        Outcome::Survived
    } else {
        Outcome::Died
    };
    let echo = &result.echoed_input;
    let confidence = format_percent(result.confidence);

    let mut details = vec![
        DetailRow {
            label: "Confidence",
            value: confidence.clone(),
        },
        DetailRow {
            label: "Class",
            value: echo.class.display(),
        },
        DetailRow {
            label: "Gender",
            value: echo.gender.clone(),
        },
        DetailRow {
            label: "Age",
            value: format!("{} yrs", echo.age),
        },
        DetailRow {
            label: "Family Size",
            value: echo.family_size.to_string(),
        },
        DetailRow {
            label: "Fare",
            value: format!("£{}", echo.fare),
        },
    ];
    if let Some(port) = &echo.embarked {
        details.push(DetailRow {
            label: "Embarked",
            value: port.clone(),
        });
    }

    ResultView {
        outcome,
        headline: result.label.clone(),
        survival_probability: format_percent(result.survival_probability),
        survival_bar_width: result.survival_probability * 100.0,
        confidence,
        death_probability: result.death_probability.map(format_percent),
        family_size: echo.family_size,
        details,
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
