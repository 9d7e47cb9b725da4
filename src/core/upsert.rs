//! Single-submission path: mirror one form submission into the relational
//! store, then create-or-update the matching CRM contact by phone lookup.

use crate::core::mapper;
use crate::domain::model::{ApplicationRow, FormSubmission, SyncOutcome};
use crate::domain::ports::{ApplicationStore, CrmApi};

/// Upsert one submission into the CRM, keyed by phone-number search.
///
/// The search-then-act sequence is not transactional: two concurrent
/// submissions with the same new number can both miss the search and both
/// create a contact. The CRM exposes no compare-and-swap, so this is an
/// accepted at-least-once-create risk.
pub async fn sync_submission<C: CrmApi>(
    crm: &C,
    form: &FormSubmission,
    store_id: Option<&str>,
) -> SyncOutcome {
    let contact = mapper::map_submission(form, store_id);
    let phone = format!("{} {}", form.mobile_country_code, form.mobile);

    let existing = match crm.search_contact_by_phone(&phone).await {
        Ok(found) => found,
        Err(e) => {
            // Fail open: an unreachable search degrades to "not found" so
            // the submission is never lost, at the cost of a possible
            // duplicate contact.
            tracing::warn!("Contact search failed, falling back to create: {}", e);
            None
        }
    };

    match existing {
        Some(contact_id) => {
            tracing::debug!("Updating existing contact {}", contact_id);
            match crm.update_contact(&contact_id, &contact).await {
                Ok(()) => SyncOutcome {
                    success: true,
                    contact_id: Some(contact_id),
                    updated: true,
                    error: None,
                },
                Err(e) => SyncOutcome {
                    success: false,
                    contact_id: Some(contact_id),
                    updated: false,
                    error: Some(e.to_string()),
                },
            }
        }
        None => {
            tracing::debug!("No contact matches {}, creating", phone);
            match crm.create_contact(&contact).await {
                Ok(contact_id) => SyncOutcome {
                    success: true,
                    contact_id: Some(contact_id),
                    updated: false,
                    error: None,
                },
                Err(e) => SyncOutcome {
                    success: false,
                    contact_id: None,
                    updated: false,
                    error: Some(e.to_string()),
                },
            }
        }
    }
}

/// Full submission flow: insert the store row, then mirror to the CRM.
/// Neither failure rolls the other back; a store row without a CRM mirror
/// (or the reverse) is logged and reported, leaving reconciliation to the
/// operators.
pub async fn submit_application<C: CrmApi, S: ApplicationStore>(
    crm: &C,
    store: &S,
    form: &FormSubmission,
) -> SyncOutcome {
    let row = ApplicationRow::from_form(form);
    let store_id = match store.insert_application(&row).await {
        Ok(id) => {
            tracing::info!("Application stored with id {}", id);
            Some(id)
        }
        Err(e) => {
            tracing::warn!("Application store insert failed: {}", e);
            None
        }
    };

    let outcome = sync_submission(crm, form, store_id.as_deref()).await;

    if store_id.is_some() && !outcome.success {
        tracing::warn!(
            "Store row saved but CRM sync failed; the two systems are now inconsistent"
        );
    }

    outcome
}
