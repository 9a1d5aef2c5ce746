//! Caption text shown beneath each card.
//!
//! Captions mirror what the user typed, not the encoded payload: a Wi-Fi
//! card shows the raw SSID and password so the card works as a printed
//! reference even without scanning it.

use crate::vcard::ContactCard;
use crate::wifi::WifiCredential;

/// Caption for a Wi-Fi card: network name and password on separate lines.
pub fn wifi_caption(credential: &WifiCredential) -> String {
    format!(
        "Network: {}\nPassword: {}",
        credential.ssid, credential.password
    )
}

/// Caption for a contact card: the name, then any phone/email present.
pub fn contact_caption(card: &ContactCard) -> String {
    let mut caption = format!("Name: {}", card.name);
    if !card.phone.trim().is_empty() {
        caption.push_str(&format!("\nPhone: {}", card.phone));
    }
    if !card.email.trim().is_empty() {
        caption.push_str(&format!("\nEmail: {}", card.email));
    }
    caption
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_caption_shows_raw_credentials() {
        let credential = WifiCredential::new("Cafe;Net", "pass:word");
        assert_eq!(
            wifi_caption(&credential),
            "Network: Cafe;Net\nPassword: pass:word"
        );
    }

    #[test]
    fn contact_caption_includes_only_present_fields() {
        let full = ContactCard::new("Ada", "+1 555 0100", "ada@example.org");
        assert_eq!(
            contact_caption(&full),
            "Name: Ada\nPhone: +1 555 0100\nEmail: ada@example.org"
        );

        let phone_only = ContactCard::new("Ada", "+1 555 0100", " ");
        assert_eq!(contact_caption(&phone_only), "Name: Ada\nPhone: +1 555 0100");

        let name_only = ContactCard::new("Ada", "", "");
        assert_eq!(contact_caption(&name_only), "Name: Ada");
    }
}
