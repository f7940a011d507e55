use serde::{Deserialize, Serialize};

use crate::domain::{EmbarkPort, PassengerClass, Sex};

/// Body of `POST /predict`. Every field carries its semantic value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassengerInput {
    #[serde(rename = "Pclass")]
    pub class: PassengerClass,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "SibSp")]
    pub siblings_spouses: u32,
    #[serde(rename = "Parch")]
    pub parents_children: u32,
    #[serde(rename = "Fare")]
    pub fare: f64,
    #[serde(rename = "Embarked")]
    pub embark_port: EmbarkPort,
}

impl PassengerInput {
    pub fn family_size(&self) -> u32 {
        self.siblings_spouses + self.parents_children
    }
}

/// Class as echoed back by the service: either the raw number or a
/// preformatted label such as `"1st Class"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassEcho {
    Number(u8),
    Label(String),
}

impl ClassEcho {
    pub fn display(&self) -> String {
        match self {
            Self::Number(number) => PassengerClass::try_from(*number)
                .map(|class| class.label().to_string())
                .unwrap_or_else(|_| number.to_string()),
            Self::Label(label) => label.clone(),
        }
    }
}

/// Denormalized view of the input the service actually scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEcho {
    pub class: ClassEcho,
    pub gender: String,
    pub age: f64,
    pub family_size: u32,
    pub fare: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embarked: Option<String>,
}

/// Body of a successful `POST /predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub survived: bool,
    #[serde(rename = "prediction")]
    pub label: String,
    pub survival_probability: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_probability: Option<f64>,
    #[serde(rename = "input_data")]
    pub echoed_input: InputEcho,
}

/// Body of `GET /health`. Only read for logging; reachability is decided by status code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub model_loaded: Option<bool>,
}
