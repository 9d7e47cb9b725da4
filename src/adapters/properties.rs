//! Custom CRM contact property catalog and idempotent provisioning. The
//! catalog must exist in the CRM before any mapped submission is accepted;
//! creation treats HTTP 409 as "already there" so reruns are safe.

use crate::adapters::hubspot::HubSpotClient;
use crate::utils::error::Result;
use serde_json::{json, Value};

pub const PROPERTY_GROUP_NAME: &str = "faces_agency";
pub const PROPERTY_GROUP_LABEL: &str = "Faces Agency";

#[derive(Debug, Clone, Copy)]
pub struct PropertyDefinition {
    pub name: &'static str,
    pub label: &'static str,
    /// CRM value type: string, number, date, datetime, enumeration, bool.
    pub data_type: &'static str,
    /// Input widget hint: text, textarea, number, date, select.
    pub field_type: &'static str,
    pub description: Option<&'static str>,
    /// (label, value) pairs for enumeration properties.
    pub options: &'static [(&'static str, &'static str)],
}

const YES_NO: &[(&str, &str)] = &[("Yes", "yes"), ("No", "no")];
const TRUE_FALSE: &[(&str, &str)] = &[("Yes", "true"), ("No", "false")];

macro_rules! property {
    ($name:expr, $label:expr, $data_type:expr, $field_type:expr) => {
        PropertyDefinition {
            name: $name,
            label: $label,
            data_type: $data_type,
            field_type: $field_type,
            description: None,
            options: &[],
        }
    };
    ($name:expr, $label:expr, $data_type:expr, $field_type:expr, desc: $desc:expr) => {
        PropertyDefinition {
            name: $name,
            label: $label,
            data_type: $data_type,
            field_type: $field_type,
            description: Some($desc),
            options: &[],
        }
    };
    ($name:expr, $label:expr, $data_type:expr, $field_type:expr, options: $options:expr) => {
        PropertyDefinition {
            name: $name,
            label: $label,
            data_type: $data_type,
            field_type: $field_type,
            description: None,
            options: $options,
        }
    };
    ($name:expr, $label:expr, $data_type:expr, $field_type:expr, desc: $desc:expr, options: $options:expr) => {
        PropertyDefinition {
            name: $name,
            label: $label,
            data_type: $data_type,
            field_type: $field_type,
            description: Some($desc),
            options: $options,
        }
    };
}

/// Every custom contact property the mapper can emit. Built-in CRM
/// properties (email, firstname, lastname) are not declared here.
pub const PROPERTIES: &[PropertyDefinition] = &[
    // Personal information
    property!(
        "faces_gender",
        "Candidate Gender",
        "enumeration",
        "select",
        options: &[("Male", "male"), ("Female", "female")]
    ),
    property!("faces_middle_name", "Middle Name", "string", "text"),
    property!("faces_date_of_birth", "Date of Birth", "date", "date"),
    property!("faces_nationality", "Nationality", "string", "text"),
    // Contact information
    property!(
        "faces_mobile",
        "Mobile Number",
        "string",
        "text",
        desc: "Full phone number with country code"
    ),
    property!(
        "faces_whatsapp",
        "WhatsApp Number",
        "string",
        "text",
        desc: "Full WhatsApp number with country code"
    ),
    property!("faces_other_number", "Emergency Contact Number", "string", "text"),
    property!(
        "faces_other_number_relationship",
        "Emergency Contact Relationship",
        "enumeration",
        "select",
        options: &[
            ("Mother", "Mother"),
            ("Father", "Father"),
            ("Brother", "Brother"),
            ("Sister", "Sister"),
            ("Uncle", "Uncle"),
            ("Aunt", "Aunt"),
            ("Cousin", "Cousin"),
            ("Grandfather", "Grandfather"),
            ("Grandmother", "Grandmother"),
            ("Spouse", "Spouse"),
            ("Friend", "Friend"),
            ("Colleague", "Colleague"),
            ("Other", "Other"),
        ]
    ),
    property!(
        "faces_other_number_person_name",
        "Emergency Contact Name",
        "string",
        "text"
    ),
    property!("faces_instagram", "Instagram Username", "string", "text"),
    property!(
        "faces_has_whish_account",
        "Has WHISH Account",
        "enumeration",
        "select",
        options: YES_NO
    ),
    property!("faces_whish_number", "WHISH Number", "string", "text"),
    // Location
    property!(
        "faces_governorate",
        "Governorate",
        "string",
        "text",
        desc: "Lebanese governorate"
    ),
    property!("faces_district", "District", "string", "text"),
    property!("faces_area", "Area", "string", "text"),
    // Languages
    property!(
        "faces_languages",
        "Languages",
        "string",
        "textarea",
        desc: "JSON array of languages spoken"
    ),
    property!(
        "faces_language_levels",
        "Language Proficiency Levels",
        "string",
        "textarea",
        desc: "JSON object mapping language to proficiency (1-5 scale)"
    ),
    // Appearance
    property!("faces_eye_color", "Eye Color", "string", "text"),
    property!("faces_hair_color", "Hair Color", "string", "text"),
    property!(
        "faces_hair_type",
        "Hair Type",
        "enumeration",
        "select",
        options: &[
            ("Straight", "Straight"),
            ("Wavy", "Wavy"),
            ("Curly", "Curly"),
            ("Coily", "Coily"),
        ]
    ),
    property!(
        "faces_hair_length",
        "Hair Length",
        "enumeration",
        "select",
        options: &[
            ("Bald", "Bald"),
            ("Buzz Cut", "Buzz Cut"),
            ("Short", "Short"),
            ("Medium", "Medium"),
            ("Long", "Long"),
            ("Very Long", "Very Long"),
        ]
    ),
    property!("faces_skin_tone", "Skin Tone", "string", "text"),
    property!(
        "faces_has_tattoos",
        "Has Tattoos",
        "enumeration",
        "select",
        options: TRUE_FALSE
    ),
    property!(
        "faces_has_piercings",
        "Has Piercings",
        "enumeration",
        "select",
        options: TRUE_FALSE
    ),
    // Measurements
    property!("faces_height_cm", "Height (cm)", "number", "number"),
    property!("faces_weight_kg", "Weight (kg)", "number", "number"),
    property!("faces_pant_size", "Pant Size", "string", "text"),
    property!("faces_jacket_size", "Jacket Size", "string", "text"),
    property!("faces_shoe_size", "Shoe Size", "string", "text"),
    property!("faces_bust_cm", "Bust (cm)", "number", "number"),
    property!("faces_waist_cm", "Waist (cm)", "number", "number"),
    property!("faces_hips_cm", "Hips (cm)", "number", "number"),
    property!("faces_shoulders_cm", "Shoulders (cm)", "number", "number"),
    // Talents & skills
    property!(
        "faces_talents",
        "Talents",
        "string",
        "textarea",
        desc: "JSON array of talents"
    ),
    property!(
        "faces_talent_levels",
        "Talent Proficiency Levels",
        "string",
        "textarea",
        desc: "JSON object mapping talent to proficiency (1-5 scale)"
    ),
    property!(
        "faces_sports",
        "Sports",
        "string",
        "textarea",
        desc: "JSON array of sports"
    ),
    property!(
        "faces_sport_levels",
        "Sport Proficiency Levels",
        "string",
        "textarea",
        desc: "JSON object mapping sport to proficiency (1-5 scale)"
    ),
    property!(
        "faces_modeling_types",
        "Modeling Types",
        "string",
        "textarea",
        desc: "JSON array of modeling types"
    ),
    property!(
        "faces_has_modeling_experience",
        "Has Modeling Experience",
        "enumeration",
        "select",
        options: YES_NO
    ),
    property!(
        "faces_comfortable_with_swimwear",
        "Comfortable with Swimwear",
        "enumeration",
        "select",
        options: TRUE_FALSE
    ),
    property!(
        "faces_interested_in_extra_work",
        "Interested in Extra Work",
        "enumeration",
        "select",
        options: YES_NO
    ),
    // Availability & travel
    property!("faces_has_car", "Has Car", "enumeration", "select", options: YES_NO),
    property!(
        "faces_has_driving_license",
        "Has Driving License",
        "enumeration",
        "select",
        options: YES_NO
    ),
    property!(
        "faces_willing_to_travel",
        "Willing to Travel",
        "enumeration",
        "select",
        options: YES_NO
    ),
    property!(
        "faces_has_valid_passport",
        "Has Valid Passport",
        "enumeration",
        "select",
        options: YES_NO
    ),
    property!(
        "faces_has_multiple_passports",
        "Has Multiple Passports",
        "enumeration",
        "select",
        options: YES_NO
    ),
    property!(
        "faces_passport_countries",
        "Passport Countries",
        "string",
        "textarea",
        desc: "JSON array of passport countries"
    ),
    property!(
        "faces_has_look_alike_twin",
        "Has Look-Alike Twin",
        "enumeration",
        "select",
        options: YES_NO
    ),
    // Referral
    property!(
        "faces_how_did_you_hear",
        "How Did You Hear About Us",
        "enumeration",
        "select",
        desc: "Marketing attribution: how the candidate found the agency",
        options: &[
            ("Instagram", "Instagram"),
            ("Facebook", "Facebook"),
            ("TikTok", "TikTok"),
            ("Friend or Family", "Friend or Family"),
            ("Google Search", "Google Search"),
            ("Event or Casting Call", "Event or Casting Call"),
            ("Other", "Other"),
        ]
    ),
    // System fields
    property!(
        "faces_application_date",
        "Application Date",
        "datetime",
        "date",
        desc: "When the application was submitted"
    ),
    property!(
        "faces_application_source",
        "Application Source",
        "enumeration",
        "select",
        options: &[
            ("Website", "website"),
            ("Bulk Import", "bulk_import"),
            ("Manual Entry", "manual"),
        ]
    ),
    property!(
        "faces_supabase_id",
        "Store Record ID",
        "string",
        "text",
        desc: "Links to the applications table row"
    ),
];

#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub created: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

impl ProvisionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn property_payload(property: &PropertyDefinition) -> Value {
    let mut payload = json!({
        "name": property.name,
        "label": property.label,
        "type": property.data_type,
        "fieldType": property.field_type,
        "groupName": PROPERTY_GROUP_NAME,
    });

    if let Some(description) = property.description {
        payload["description"] = json!(description);
    }
    if !property.options.is_empty() {
        payload["options"] = Value::Array(
            property
                .options
                .iter()
                .map(|(label, value)| json!({ "label": label, "value": value }))
                .collect(),
        );
    }

    payload
}

impl HubSpotClient {
    /// Create the property group; a 409 means it is already there.
    pub async fn ensure_property_group(&self) -> Result<bool> {
        let body = json!({ "name": PROPERTY_GROUP_NAME, "label": PROPERTY_GROUP_LABEL });
        let response = self
            .post_raw("/crm/v3/properties/contacts/groups", &body)
            .await?;

        if response.status().as_u16() == 409 {
            tracing::info!("Property group {} already exists", PROPERTY_GROUP_NAME);
            return Ok(false);
        }
        crate::adapters::expect_success(response).await?;
        tracing::info!("Created property group {}", PROPERTY_GROUP_NAME);
        Ok(true)
    }

    /// Create every catalog property, skipping the ones that already exist.
    /// Failures are collected per property; one bad definition does not
    /// stop the rest.
    pub async fn ensure_contact_properties(&self) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();

        for property in PROPERTIES {
            let payload = property_payload(property);
            let response = self.post_raw("/crm/v3/properties/contacts", &payload).await?;
            let status = response.status();

            if status.as_u16() == 409 {
                tracing::debug!("{}: already exists", property.name);
                report.skipped += 1;
            } else if status.is_success() {
                tracing::debug!("{}: created", property.name);
                report.created += 1;
            } else {
                let body = response.text().await.unwrap_or_default();
                tracing::error!("{}: failed ({}): {}", property.name, status, body);
                report
                    .failed
                    .push(format!("{}: {} {}", property.name, status.as_u16(), body));
            }
        }

        Ok(report)
    }
}
