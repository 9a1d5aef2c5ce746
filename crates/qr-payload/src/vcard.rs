//! vCard 3.0 contact payloads.

use serde::{Deserialize, Serialize};

/// Contact details as entered by the user.
///
/// Phone and email are optional; a blank (empty or whitespace-only) value
/// means the field is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactCard {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// A card is complete when it names someone and gives at least one
    /// way to reach them.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && (!self.phone.trim().is_empty() || !self.email.trim().is_empty())
    }
}

/// Build the vCard 3.0 text block for `card`.
///
/// Lines are joined with `\n` and the block carries no trailing newline.
/// Blank phone/email produce no TEL/EMAIL line at all rather than an
/// empty-valued one. Field values are embedded verbatim; the vCard rules
/// for escaping `;`, `,` and `\` are deliberately not applied, matching
/// the lenient dialect phone scanners accept.
pub fn contact_string(card: &ContactCard) -> String {
    let mut vcard = String::from("BEGIN:VCARD\nVERSION:3.0\n");
    vcard.push_str(&format!("FN:{}\n", card.name));
    if !card.phone.trim().is_empty() {
        vcard.push_str(&format!("TEL:{}\n", card.phone));
    }
    if !card.email.trim().is_empty() {
        vcard.push_str(&format!("EMAIL:{}\n", card.email));
    }
    vcard.push_str("END:VCARD");
    vcard
}
