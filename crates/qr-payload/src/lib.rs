//! Payload construction for QR code cards.
//!
//! Pure functions that map structured user input to the exact text a
//! scanner parses: `WIFI:` network configuration strings and vCard 3.0
//! contact blocks, plus the caption text rendered under each card.
//! Everything here is total; formatting never fails.

pub mod caption;
pub mod vcard;
pub mod wifi;

pub use vcard::ContactCard;
pub use wifi::WifiCredential;
