//! Schema mapping between the three shapes a candidate record takes:
//! spreadsheet row, in-app form state, and CRM contact properties.

use crate::core::clean;
use crate::domain::model::{ContactRecord, FormSubmission, RowOutcome, SourceRecord};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SOURCE_BULK_IMPORT: &str = "bulk_import";
pub const SOURCE_WEBSITE: &str = "website";

/// Source sheet header to canonical CRM property. Several aliases may feed
/// one property; the entry iterated last wins when a row carries both
/// (e.g. "Phone" overrides "Mobile" for `faces_mobile`).
pub const COLUMN_MAPPING: &[(&str, &str)] = &[
    // Personal info
    ("First Name", "faces_first_name"),
    ("Middle Name", "faces_middle_name"),
    ("Last Name", "faces_last_name"),
    ("Gender", "faces_gender"),
    ("Date of Birth", "faces_date_of_birth"),
    ("DOB", "faces_date_of_birth"),
    ("Nationality", "faces_nationality"),
    // Contact
    ("Mobile", "faces_mobile"),
    ("Phone", "faces_mobile"),
    ("WhatsApp", "faces_whatsapp"),
    ("Instagram", "faces_instagram"),
    // Location
    ("Governorate", "faces_governorate"),
    ("District", "faces_district"),
    ("Area", "faces_area"),
    ("City", "faces_area"),
    // Appearance
    ("Eye Color", "faces_eye_color"),
    ("Hair Color", "faces_hair_color"),
    ("Hair Type", "faces_hair_type"),
    ("Hair Length", "faces_hair_length"),
    ("Skin Tone", "faces_skin_tone"),
    // Measurements
    ("Height", "faces_height_cm"),
    ("Height (cm)", "faces_height_cm"),
    ("Weight", "faces_weight_kg"),
    ("Weight (kg)", "faces_weight_kg"),
    ("Pant Size", "faces_pant_size"),
    ("Jacket Size", "faces_jacket_size"),
    ("Shoe Size", "faces_shoe_size"),
    ("Bust", "faces_bust_cm"),
    ("Waist", "faces_waist_cm"),
    ("Hips", "faces_hips_cm"),
    // Skills
    ("Languages", "faces_languages"),
    ("Talents", "faces_talents"),
    ("Sports", "faces_sports"),
    ("Experience", "faces_has_modeling_experience"),
    // Availability
    ("Has Car", "faces_has_car"),
    ("Has License", "faces_has_driving_license"),
    ("Can Travel", "faces_willing_to_travel"),
    ("Has Passport", "faces_has_valid_passport"),
    // Standard CRM property
    ("Email", "email"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    Phone,
    Date,
    Gender,
    List,
    YesNo,
    Measurement,
    Text,
}

/// Cleaner selected by *target* property, so every alias of a property is
/// cleaned identically no matter which source column supplied the value.
const NORMALIZERS: &[(&str, Normalizer)] = &[
    ("faces_mobile", Normalizer::Phone),
    ("faces_whatsapp", Normalizer::Phone),
    ("faces_date_of_birth", Normalizer::Date),
    ("faces_gender", Normalizer::Gender),
    ("faces_languages", Normalizer::List),
    ("faces_talents", Normalizer::List),
    ("faces_sports", Normalizer::List),
    ("faces_has_car", Normalizer::YesNo),
    ("faces_has_driving_license", Normalizer::YesNo),
    ("faces_willing_to_travel", Normalizer::YesNo),
    ("faces_has_valid_passport", Normalizer::YesNo),
    ("faces_has_modeling_experience", Normalizer::YesNo),
    ("faces_height_cm", Normalizer::Measurement),
    ("faces_weight_kg", Normalizer::Measurement),
    ("faces_bust_cm", Normalizer::Measurement),
    ("faces_waist_cm", Normalizer::Measurement),
    ("faces_hips_cm", Normalizer::Measurement),
];

pub fn normalizer_for(property: &str) -> Normalizer {
    NORMALIZERS
        .iter()
        .find(|(key, _)| *key == property)
        .map(|(_, normalizer)| *normalizer)
        .unwrap_or(Normalizer::Text)
}

pub fn apply_normalizer(normalizer: Normalizer, raw: &Value) -> String {
    match normalizer {
        Normalizer::Phone => clean::clean_phone(raw),
        Normalizer::Date => clean::clean_date(raw),
        Normalizer::Gender => clean::clean_gender(raw),
        Normalizer::List => clean::clean_list(raw),
        Normalizer::YesNo => clean::clean_yes_no(raw),
        Normalizer::Measurement => clean::clean_measurement(raw),
        Normalizer::Text => clean::clean_text(raw),
    }
}

fn is_absent(raw: &Value) -> bool {
    matches!(raw, Value::Null) || matches!(raw, Value::String(s) if s.is_empty())
}

/// Map one spreadsheet row to a CRM contact. Validation runs after
/// normalization, so a raw "0701234" counts as a phone number once
/// cleaned. `row_index` is zero-based over the data rows; messages show
/// the sheet row (index + 2, accounting for the header line).
pub fn map_row(row: &SourceRecord, row_index: usize) -> RowOutcome {
    let display_row = row_index + 2;
    let mut properties = BTreeMap::new();
    let mut warnings = Vec::new();

    for (header, property) in COLUMN_MAPPING {
        let Some(raw) = row.data.get(*header) else {
            continue;
        };
        if is_absent(raw) {
            continue;
        }

        let cleaned = apply_normalizer(normalizer_for(property), raw);
        if cleaned.is_empty() {
            warnings.push(format!(
                "Row {}: dropped unparseable {} value {}",
                display_row, property, raw
            ));
        } else {
            properties.insert(property.to_string(), cleaned);
        }
    }

    if !properties.contains_key("faces_first_name") && !properties.contains_key("faces_last_name") {
        return RowOutcome {
            contact: None,
            errors: vec![format!("Row {}: Missing name", display_row)],
            warnings,
        };
    }

    if !properties.contains_key("faces_mobile") && !properties.contains_key("faces_whatsapp") {
        return RowOutcome {
            contact: None,
            errors: vec![format!("Row {}: Missing phone number", display_row)],
            warnings,
        };
    }

    properties.insert(
        "faces_application_source".to_string(),
        SOURCE_BULK_IMPORT.to_string(),
    );
    properties.insert("faces_application_date".to_string(), now_iso());

    RowOutcome {
        contact: Some(ContactRecord { properties }),
        errors: Vec::new(),
        warnings,
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Map one in-app form submission to CRM contact properties. The form
/// carries country codes separately, arrays as real arrays, and booleans
/// as booleans; everything is flattened to the same property bag the bulk
/// path produces, then swept clean of empty values.
pub fn map_submission(form: &FormSubmission, store_id: Option<&str>) -> ContactRecord {
    let mut properties = BTreeMap::new();
    let mut put = |key: &str, value: String| {
        properties.insert(key.to_string(), value);
    };

    put("email", form.email.clone());
    put("firstname", form.first_name.clone());
    put("lastname", form.last_name.clone());
    put("faces_middle_name", form.middle_name.clone());
    put("faces_gender", form.gender.clone());
    put("faces_date_of_birth", form.date_of_birth.clone());
    put("faces_nationality", form.nationality.clone());

    put(
        "faces_mobile",
        with_country_code(&form.mobile_country_code, &form.mobile),
    );
    put(
        "faces_whatsapp",
        with_country_code(&form.whatsapp_country_code, &form.whatsapp),
    );
    put(
        "faces_other_number",
        with_country_code(&form.other_number_country_code, &form.other_number),
    );
    // Relationship is a CRM enumeration (Mother, Father, ...).
    put(
        "faces_other_number_relationship",
        clean::capitalize_words(&form.other_number_relationship),
    );
    put(
        "faces_other_number_person_name",
        form.other_number_person_name.clone(),
    );
    put("faces_instagram", form.instagram.clone());
    put("faces_has_whish_account", form.has_whish_account.clone());
    put(
        "faces_whish_number",
        with_country_code(&form.whish_country_code, &form.whish_number),
    );

    put("faces_governorate", form.governorate.clone());
    put("faces_district", form.district.clone());
    put("faces_area", form.area.clone());

    put("faces_languages", encode_list(&form.languages));
    put("faces_language_levels", encode_levels(&form.language_levels));

    // Custom free-text appearance values win over the preset choices.
    put(
        "faces_eye_color",
        first_non_empty(&form.custom_eye_color, &form.eye_color),
    );
    put(
        "faces_hair_color",
        first_non_empty(&form.custom_hair_color, &form.hair_color),
    );
    put("faces_hair_type", clean::capitalize_words(&form.hair_type));
    put(
        "faces_hair_length",
        clean::capitalize_words(&form.hair_length),
    );
    put("faces_skin_tone", form.skin_tone.clone());
    put("faces_has_tattoos", form.has_tattoos.to_string());
    put("faces_has_piercings", form.has_piercings.to_string());

    put("faces_height_cm", form.height.clone());
    put("faces_weight_kg", form.weight.clone());
    put("faces_pant_size", form.pant_size.clone());
    put("faces_jacket_size", form.jacket_size.clone());
    put("faces_shoe_size", form.shoe_size.clone());
    put("faces_bust_cm", form.bust.clone());
    put("faces_waist_cm", form.waist.clone());
    put("faces_hips_cm", form.hips.clone());
    put("faces_shoulders_cm", form.shoulders.clone());

    put("faces_talents", encode_list(&form.talents));
    put("faces_talent_levels", encode_levels(&form.talent_levels));
    put("faces_sports", encode_list(&form.sports));
    put("faces_sport_levels", encode_levels(&form.sport_levels));
    put("faces_modeling_types", encode_list(&form.modeling));
    put("faces_has_modeling_experience", form.experience.clone());
    put(
        "faces_comfortable_with_swimwear",
        form.comfortable_with_swimwear
            .map(|v| v.to_string())
            .unwrap_or_default(),
    );
    put(
        "faces_interested_in_extra_work",
        form.interested_in_extra.clone(),
    );

    put("faces_has_car", form.has_car.clone());
    put("faces_has_driving_license", form.has_license.clone());
    put("faces_willing_to_travel", form.can_travel.clone());
    put("faces_has_valid_passport", form.has_passport.clone());
    put(
        "faces_has_multiple_passports",
        form.has_multiple_passports.clone(),
    );
    put("faces_passport_countries", encode_list(&form.passports));
    put("faces_has_look_alike_twin", form.has_look_alike_twin.clone());

    let referral = if form.how_did_you_hear == "Other" && !form.how_did_you_hear_other.is_empty() {
        format!("Other: {}", form.how_did_you_hear_other)
    } else {
        form.how_did_you_hear.clone()
    };
    put("faces_how_did_you_hear", referral);

    put("faces_application_date", now_iso());
    put("faces_application_source", SOURCE_WEBSITE.to_string());
    if let Some(id) = store_id {
        put("faces_supabase_id", id.to_string());
    }

    ContactRecord {
        properties: sweep_properties(properties),
    }
}

fn with_country_code(code: &str, number: &str) -> String {
    if number.trim().is_empty() {
        String::new()
    } else {
        format!("{} {}", code, number.trim())
    }
}

fn first_non_empty(a: &str, b: &str) -> String {
    if a.trim().is_empty() {
        b.to_string()
    } else {
        a.to_string()
    }
}

fn encode_list(values: &[String]) -> String {
    if values.is_empty() {
        String::new()
    } else {
        serde_json::to_string(values).unwrap_or_default()
    }
}

fn encode_levels(levels: &BTreeMap<String, u8>) -> String {
    if levels.is_empty() {
        String::new()
    } else {
        serde_json::to_string(levels).unwrap_or_default()
    }
}

/// Trim every value and drop the ones that are empty after trimming.
/// Serialized empty collections count as empty: the CRM rejects `"[]"`
/// and `"{}"` on several string-typed properties.
pub fn sweep_properties(properties: BTreeMap<String, String>) -> BTreeMap<String, String> {
    properties
        .into_iter()
        .filter_map(|(key, value)| {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() || trimmed == "[]" || trimmed == "{}" {
                None
            } else {
                Some((key, trimmed))
            }
        })
        .collect()
}
