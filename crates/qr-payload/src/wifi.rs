//! Wi-Fi network configuration payloads.
//!
//! Builds the `WIFI:T:WPA;S:<ssid>;P:<password>;;` string that camera
//! apps recognize for one-scan network joining.

use serde::{Deserialize, Serialize};

/// Characters that must be backslash-escaped inside a `WIFI:` field.
const RESERVED: [char; 5] = ['\\', ';', ',', ':', '"'];

/// Wi-Fi network credentials as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredential {
    pub ssid: String,
    pub password: String,
}

impl WifiCredential {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

/// Build the scannable Wi-Fi configuration payload.
///
/// The SSID and password are escaped independently before being spliced
/// into the template, so raw user text never reaches the payload. The
/// authentication type is fixed to WPA and the string always terminates
/// with `;;`.
pub fn config_string(credential: &WifiCredential) -> String {
    format!(
        "WIFI:T:WPA;S:{};P:{};;",
        escape_field(&credential.ssid),
        escape_field(&credential.password),
    )
}

/// Backslash-escape the reserved payload characters in one pass.
///
/// Escaping character by character means an inserted backslash is never
/// itself re-escaped, no matter which reserved characters the input mixes.
pub fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse of `escape_field`, here to prove the escaping survives a
    /// standard parser: a backslash always protects exactly the next char.
    fn unescape_field(field: &str) -> String {
        let mut out = String::with_capacity(field.len());
        let mut chars = field.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn escapes_each_reserved_character() {
        assert_eq!(escape_field(r"a\b"), r"a\\b");
        assert_eq!(escape_field("a;b"), r"a\;b");
        assert_eq!(escape_field("a,b"), r"a\,b");
        assert_eq!(escape_field("a:b"), r"a\:b");
        assert_eq!(escape_field("a\"b"), "a\\\"b");
    }

    #[test]
    fn escape_is_single_pass() {
        // The backslash inserted for ';' must not be escaped again.
        assert_eq!(escape_field(r"\;"), r"\\\;");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_field("HomeNetwork42"), "HomeNetwork42");
    }

    #[test]
    fn config_string_escapes_both_fields() {
        let credential = WifiCredential::new("My;Net", r"p:a\b");
        assert_eq!(
            config_string(&credential),
            r"WIFI:T:WPA;S:My\;Net;P:p\:a\\b;;"
        );
    }

    #[test]
    fn config_string_always_ends_with_double_semicolon() {
        for (ssid, password) in [("net", "pass"), ("", ""), (";;;", "\\\\")] {
            let payload = config_string(&WifiCredential::new(ssid, password));
            assert!(payload.ends_with(";;"), "payload was {payload:?}");
        }
    }

    #[test]
    fn escaped_fields_round_trip() {
        for input in ["plain", r"semi;colon", r#"all\;,:" mixed"#, "日本語 ワイファイ"] {
            assert_eq!(unescape_field(&escape_field(input)), input);
        }
    }

    #[test]
    fn payload_parses_back_to_original_credentials() {
        let credential = WifiCredential::new(r"We;ird\Net", r#"pa,ss:wo"rd"#);
        let payload = config_string(&credential);

        // Parse the way a scanner does: split on unescaped ';', then
        // strip the S:/P: prefixes and unescape the values.
        let body = payload
            .strip_prefix("WIFI:")
            .and_then(|rest| rest.strip_suffix(";;"))
            .expect("payload frame missing");
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    current.push(c);
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                ';' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        fields.push(current);

        assert_eq!(fields[0], "T:WPA");
        let ssid = fields[1].strip_prefix("S:").expect("missing SSID field");
        let password = fields[2].strip_prefix("P:").expect("missing password field");
        assert_eq!(unescape_field(ssid), credential.ssid);
        assert_eq!(unescape_field(password), credential.password);
    }
}
