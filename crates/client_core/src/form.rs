//! Passenger form state and the named presets that seed it.
//!
//! Values are held as the raw strings the user typed. Nothing is validated
//! here; [`PassengerForm::to_input`] converts them for transport at submit time.

use shared::{
    domain::{EmbarkPort, FormField, Sex},
    protocol::PassengerInput,
};

use crate::error::InvalidInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerForm {
    pub class: String,
    pub sex: String,
    pub age: String,
    pub siblings_spouses: String,
    pub parents_children: String,
    pub fare: String,
    pub embark_port: String,
}

impl Default for PassengerForm {
    fn default() -> Self {
        Self::from_values(["3", "male", "22", "0", "0", "7.25", "S"])
    }
}

impl PassengerForm {
    /// Values in `FormField::ALL` order.
    fn from_values(values: [&str; 7]) -> Self {
        let [class, sex, age, siblings_spouses, parents_children, fare, embark_port] =
            values.map(str::to_string);
        Self {
            class,
            sex,
            age,
            siblings_spouses,
            parents_children,
            fare,
            embark_port,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Class => &self.class,
            FormField::Sex => &self.sex,
            FormField::Age => &self.age,
            FormField::SiblingsSpouses => &self.siblings_spouses,
            FormField::ParentsChildren => &self.parents_children,
            FormField::Fare => &self.fare,
            FormField::EmbarkPort => &self.embark_port,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Class => &mut self.class,
            FormField::Sex => &mut self.sex,
            FormField::Age => &mut self.age,
            FormField::SiblingsSpouses => &mut self.siblings_spouses,
            FormField::ParentsChildren => &mut self.parents_children,
            FormField::Fare => &mut self.fare,
            FormField::EmbarkPort => &mut self.embark_port,
        }
    }

    /// Returns a copy with exactly one field replaced.
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = value.into();
        self
    }

    pub fn to_input(&self) -> Result<PassengerInput, InvalidInput> {
        Ok(PassengerInput {
            class: parse_enum(FormField::Class, &self.class)?,
            sex: parse_enum::<Sex>(FormField::Sex, &self.sex)?,
            age: parse_amount(FormField::Age, &self.age)?,
            siblings_spouses: parse_count(FormField::SiblingsSpouses, &self.siblings_spouses)?,
            parents_children: parse_count(FormField::ParentsChildren, &self.parents_children)?,
            fare: parse_amount(FormField::Fare, &self.fare)?,
            embark_port: parse_enum::<EmbarkPort>(FormField::EmbarkPort, &self.embark_port)?,
        })
    }
}

impl From<&PassengerInput> for PassengerForm {
    fn from(input: &PassengerInput) -> Self {
        Self {
            class: input.class.to_string(),
            sex: input.sex.to_string(),
            age: input.age.to_string(),
            siblings_spouses: input.siblings_spouses.to_string(),
            parents_children: input.parents_children.to_string(),
            fare: input.fare.to_string(),
            embark_port: input.embark_port.to_string(),
        }
    }
}

fn parse_enum<T>(field: FormField, raw: &str) -> Result<T, InvalidInput>
where
    T: std::str::FromStr<Err = shared::domain::ParseEnumError>,
{
    raw.parse::<T>()
        .map_err(|err| InvalidInput::new(field, raw, format!("one of {}", err.expected)))
}

fn parse_amount(field: FormField, raw: &str) -> Result<f64, InvalidInput> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(InvalidInput::new(field, raw, "a non-negative number")),
    }
}

fn parse_count(field: FormField, raw: &str) -> Result<u32, InvalidInput> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| InvalidInput::new(field, raw, "a non-negative whole number"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    values: [&'static str; 7],
}

impl Preset {
    pub fn form(&self) -> PassengerForm {
        PassengerForm::from_values(self.values)
    }
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name: "Rose",
        values: ["1", "female", "17", "0", "2", "80", "S"],
    },
    Preset {
        name: "Jack",
        values: ["3", "male", "20", "0", "0", "7.25", "S"],
    },
    Preset {
        name: "Child",
        values: ["2", "male", "8", "1", "2", "20", "S"],
    },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

/// Holder of the current form snapshot. Mutations replace whole snapshots.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    current: PassengerForm,
}

impl FormState {
    pub fn new(initial: PassengerForm) -> Self {
        Self { current: initial }
    }

    pub fn snapshot(&self) -> &PassengerForm {
        &self.current
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> &PassengerForm {
        self.current = self.current.clone().with(field, value);
        &self.current
    }

    pub fn reset(&mut self, preset: &Preset) -> &PassengerForm {
        self.current = preset.form();
        &self.current
    }
}


#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
