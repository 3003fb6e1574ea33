use serde::{Deserialize, Serialize};
use std::fmt;

use super::report::Report;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub relationship: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub medical_history: Vec<MedicalHistory>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub medications: Vec<Medication>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalHistory {
    pub condition: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
}

/// Body of `POST /family-members`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewFamilyMember {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub relationship: String,
}

/// Body of `PUT /family-members/:id`. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<MedicalHistory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<Medication>>,
}

impl FamilyMemberUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl fmt::Display for FamilyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Age: {}", self.age)?;
        writeln!(f, "Gender: {}", self.gender)?;
        writeln!(f, "Relationship: {}", self.relationship)?;

        writeln!(f, "\nMedical history:")?;
        if self.medical_history.is_empty() {
            writeln!(f, "  No medical history recorded")?;
        }
        for entry in &self.medical_history {
            write!(f, "  - {}", entry.condition)?;
            if !entry.date.is_empty() {
                write!(f, " ({})", entry.date)?;
            }
            writeln!(f)?;
            if !entry.notes.is_empty() {
                writeln!(f, "    {}", entry.notes)?;
            }
        }

        writeln!(f, "\nMedications:")?;
        if self.medications.is_empty() {
            writeln!(f, "  No medications recorded")?;
        }
        for med in &self.medications {
            writeln!(f, "  - {} {} {}", med.name, med.dosage, med.frequency)?;
        }

        Ok(())
    }
}
