use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}; expected one of {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// Ticket class, carried on the wire as the integer 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PassengerClass {
    First,
    Second,
    Third,
}

impl PassengerClass {
    pub const ALL: [PassengerClass; 3] = [Self::First, Self::Second, Self::Third];

    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "1st Class",
            Self::Second => "2nd Class",
            Self::Third => "3rd Class",
        }
    }
}

impl TryFrom<u8> for PassengerClass {
    type Error = ParseEnumError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(ParseEnumError::new(
                "passenger class",
                &other.to_string(),
                "1, 2, 3",
            )),
        }
    }
}

impl From<PassengerClass> for u8 {
    fn from(value: PassengerClass) -> Self {
        value.number()
    }
}

impl FromStr for PassengerClass {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseEnumError::new("passenger class", s, "1, 2, 3");
        let number = s.trim().parse::<u8>().map_err(|_| invalid())?;
        Self::try_from(number).map_err(|_| invalid())
    }
}

impl fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Sex {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("male") {
            Ok(Self::Male)
        } else if value.eq_ignore_ascii_case("female") {
            Ok(Self::Female)
        } else {
            Err(ParseEnumError::new("sex", s, "male, female"))
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbarkPort {
    #[serde(rename = "C")]
    Cherbourg,
    #[serde(rename = "Q")]
    Queenstown,
    #[serde(rename = "S")]
    Southampton,
}

impl EmbarkPort {
    pub const ALL: [EmbarkPort; 3] = [Self::Cherbourg, Self::Queenstown, Self::Southampton];

    pub fn code(self) -> &'static str {
        match self {
            Self::Cherbourg => "C",
            Self::Queenstown => "Q",
            Self::Southampton => "S",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cherbourg => "Cherbourg",
            Self::Queenstown => "Queenstown",
            Self::Southampton => "Southampton",
        }
    }
}

impl FromStr for EmbarkPort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Self::Cherbourg),
            "Q" => Ok(Self::Queenstown),
            "S" => Ok(Self::Southampton),
            _ => Err(ParseEnumError::new("embark port", s, "C, Q, S")),
        }
    }
}

impl fmt::Display for EmbarkPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One editable attribute of the passenger form, named by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Class,
    Sex,
    Age,
    SiblingsSpouses,
    ParentsChildren,
    Fare,
    EmbarkPort,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        Self::Class,
        Self::Sex,
        Self::Age,
        Self::SiblingsSpouses,
        Self::ParentsChildren,
        Self::Fare,
        Self::EmbarkPort,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Class => "Pclass",
            Self::Sex => "Sex",
            Self::Age => "Age",
            Self::SiblingsSpouses => "SibSp",
            Self::ParentsChildren => "Parch",
            Self::Fare => "Fare",
            Self::EmbarkPort => "Embarked",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "Passenger Class",
            Self::Sex => "Gender",
            Self::Age => "Age",
            Self::SiblingsSpouses => "Siblings/Spouses",
            Self::ParentsChildren => "Parents/Children",
            Self::Fare => "Fare (£)",
            Self::EmbarkPort => "Port of Embarkation",
        }
    }
}

impl FromStr for FormField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let by_key = Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(value));
        if let Some(field) = by_key {
            return Ok(field);
        }

        match value.to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "gender" => Ok(Self::Sex),
            "siblings_spouses" | "siblings" => Ok(Self::SiblingsSpouses),
            "parents_children" | "parents" => Ok(Self::ParentsChildren),
            "embark_port" | "port" => Ok(Self::EmbarkPort),
            _ => Err(ParseEnumError::new(
                "form field",
                s,
                "Pclass, Sex, Age, SibSp, Parch, Fare, Embarked",
            )),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reachability of the prediction service as last observed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStatus {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl ConnectivityStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Unknown => "Backend: Checking...",
            Self::Connected => "Backend: Connected",
            Self::Disconnected => "Backend: Disconnected",
        }
    }
}
