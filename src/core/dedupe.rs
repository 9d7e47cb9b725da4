use crate::domain::model::ContactRecord;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DedupeResult {
    pub unique: Vec<ContactRecord>,
    pub duplicates: usize,
}

/// Dedup key: the contact's mobile (falling back to WhatsApp) with all
/// whitespace stripped. Empty means "no phone" and never collides.
pub fn dedup_key(contact: &ContactRecord) -> String {
    contact
        .get("faces_mobile")
        .or_else(|| contact.get("faces_whatsapp"))
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Collapse contacts to one per phone number, keeping the first occurrence
/// and the original order. Contacts without any phone are always kept.
pub fn dedupe_contacts(contacts: Vec<ContactRecord>) -> DedupeResult {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(contacts.len());
    let mut duplicates = 0;

    for contact in contacts {
        let key = dedup_key(&contact);
        if key.is_empty() {
            unique.push(contact);
            continue;
        }
        if !seen.insert(key) {
            duplicates += 1;
            continue;
        }
        unique.push(contact);
    }

    DedupeResult { unique, duplicates }
}
