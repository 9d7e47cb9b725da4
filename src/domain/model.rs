use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One raw input row, keyed by the human-readable column headers of the
/// source sheet. Values keep their original JSON type so Excel-style
/// numeric cells (serial dates, measurements) survive until cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub data: HashMap<String, serde_json::Value>,
}

/// A CRM-ready contact: canonical property key to cleaned string value.
/// Array-valued fields are stored as JSON-encoded strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub properties: BTreeMap<String, String>,
}

impl ContactRecord {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }
}

/// Outcome of mapping and validating one source row.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub contact: Option<ContactRecord>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Accumulated result of one bulk upload run. Chunk failures are recorded
/// here instead of aborting the run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub created: usize,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Summary of a whole import invocation, reported once at the end.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub duplicates: usize,
    pub ready: usize,
    pub created: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Result of the single-submission upsert path. Transport failures are
/// surfaced here as a structured value, never thrown.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub success: bool,
    pub contact_id: Option<String>,
    pub updated: bool,
    pub error: Option<String>,
}

/// One in-app registration form submission, as posted by the form frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSubmission {
    pub gender: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub email: String,

    pub mobile: String,
    pub mobile_country_code: String,
    pub whatsapp: String,
    pub whatsapp_country_code: String,
    pub other_number: String,
    pub other_number_country_code: String,
    pub other_number_relationship: String,
    pub other_number_person_name: String,
    pub instagram: String,
    pub has_whish_account: String,
    pub whish_number: String,
    pub whish_country_code: String,

    pub governorate: String,
    pub district: String,
    pub area: String,

    pub languages: Vec<String>,
    pub language_levels: BTreeMap<String, u8>,

    pub height: String,
    pub weight: String,
    pub pant_size: String,
    pub jacket_size: String,
    pub shoe_size: String,
    pub bust: String,
    pub waist: String,
    pub hips: String,
    pub shoulders: String,

    pub eye_color: String,
    pub custom_eye_color: String,
    pub hair_color: String,
    pub custom_hair_color: String,
    pub hair_type: String,
    pub hair_length: String,
    pub skin_tone: String,
    pub has_tattoos: bool,
    pub has_piercings: bool,

    pub talents: Vec<String>,
    pub talent_levels: BTreeMap<String, u8>,
    pub sports: Vec<String>,
    pub sport_levels: BTreeMap<String, u8>,
    pub modeling: Vec<String>,
    pub experience: String,
    pub interested_in_extra: String,
    pub comfortable_with_swimwear: Option<bool>,

    pub has_car: String,
    pub has_license: String,
    pub can_travel: String,
    pub has_passport: String,
    pub has_multiple_passports: String,
    pub passports: Vec<String>,
    pub has_look_alike_twin: String,

    pub how_did_you_hear: String,
    pub how_did_you_hear_other: String,
}

/// Flattened row for the relational `applications` table. Column names
/// match the hosted schema; absent values are omitted from the insert.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationRow {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governorate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_levels: Option<BTreeMap<String, u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pant_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jacket_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoe_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bust: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hips: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulders: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talent_levels: Option<BTreeMap<String, u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sports: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_levels: Option<BTreeMap<String, u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willing_to_travel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_passport: Option<bool>,
}

impl ApplicationRow {
    pub fn from_form(form: &FormSubmission) -> Self {
        fn opt(value: &str) -> Option<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }

        fn opt_list(values: &[String]) -> Option<Vec<String>> {
            if values.is_empty() {
                None
            } else {
                Some(values.to_vec())
            }
        }

        fn opt_levels(levels: &BTreeMap<String, u8>) -> Option<BTreeMap<String, u8>> {
            if levels.is_empty() {
                None
            } else {
                Some(levels.clone())
            }
        }

        fn opt_yes(value: &str) -> Option<bool> {
            opt(value).map(|v| v.eq_ignore_ascii_case("yes"))
        }

        fn with_code(code: &str, number: &str) -> Option<String> {
            if number.trim().is_empty() {
                None
            } else {
                Some(format!("{} {}", code, number.trim()))
            }
        }

        Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            middle_name: opt(&form.middle_name),
            date_of_birth: opt(&form.date_of_birth),
            nationality: opt(&form.nationality),
            mobile: with_code(&form.mobile_country_code, &form.mobile),
            whatsapp: with_code(&form.whatsapp_country_code, &form.whatsapp),
            other_number: with_code(&form.other_number_country_code, &form.other_number),
            instagram: opt(&form.instagram),
            governorate: opt(&form.governorate),
            district: opt(&form.district),
            area: opt(&form.area),
            languages: opt_list(&form.languages),
            language_levels: opt_levels(&form.language_levels),
            eye_color: opt(&form.custom_eye_color).or_else(|| opt(&form.eye_color)),
            hair_color: opt(&form.custom_hair_color).or_else(|| opt(&form.hair_color)),
            hair_type: opt(&form.hair_type),
            hair_length: opt(&form.hair_length),
            skin_tone: opt(&form.skin_tone),
            height: opt(&form.height),
            weight: opt(&form.weight),
            pant_size: opt(&form.pant_size),
            jacket_size: opt(&form.jacket_size),
            shoe_size: opt(&form.shoe_size),
            bust: opt(&form.bust),
            waist: opt(&form.waist),
            hips: opt(&form.hips),
            shoulders: opt(&form.shoulders),
            talents: opt_list(&form.talents),
            talent_levels: opt_levels(&form.talent_levels),
            sports: opt_list(&form.sports),
            sport_levels: opt_levels(&form.sport_levels),
            experience: opt(&form.experience),
            car_availability: opt(&form.has_car),
            willing_to_travel: opt_yes(&form.can_travel),
            has_passport: opt_yes(&form.has_passport),
        }
    }
}
