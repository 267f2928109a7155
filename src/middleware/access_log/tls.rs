//! Human-readable names for negotiated TLS parameters.
//!
//! Names follow the OpenSSL spelling nginx prints for `$ssl_protocol` and
//! `$ssl_cipher`, minus the `TLS_` prefixes of the IANA registry.

/// Protocol name for a TLS version code, e.g. `0x0303` → `"TLSv1.2"`.
pub fn protocol_name(version: u16) -> Option<&'static str> {
    let name = match version {
        0x0300 => "SSLv3.0",
        0x0301 => "TLSv1.0",
        0x0302 => "TLSv1.1",
        0x0303 => "TLSv1.2",
        0x0304 => "TLSv1.3",
        0x0305 => "TLSv1.4",
        _      => return None,
    };
    Some(name)
}

/// Cipher name for a cipher-suite code, e.g. `0xc030` →
/// `"ECDHE-RSA-AES256-GCM-SHA384"`.
pub fn cipher_name(suite: u16) -> Option<&'static str> {
    let name = match suite {
        // RSA key exchange ─────────────────────────────────────────────────────
        0x0005 => "RSA-RC4-128-SHA",
        0x000a => "RSA-3DES-EDE-CBC-SHA",
        0x002f => "RSA-AES128-CBC-SHA",
        0x0035 => "RSA-AES256-CBC-SHA",
        0x003c => "RSA-AES128-CBC-SHA256",
        0x009c => "RSA-AES128-GCM-SHA256",
        0x009d => "RSA-AES256-GCM-SHA384",
        // ECDHE ────────────────────────────────────────────────────────────────
        0xc007 => "ECDHE-ECDSA-RC4-128-SHA",
        0xc009 => "ECDHE-ECDSA-AES128-CBC-SHA",
        0xc00a => "ECDHE-ECDSA-AES256-CBC-SHA",
        0xc011 => "ECDHE-RSA-RC4-128-SHA",
        0xc012 => "ECDHE-RSA-3DES-EDE-CBC-SHA",
        0xc013 => "ECDHE-RSA-AES128-CBC-SHA",
        0xc014 => "ECDHE-RSA-AES256-CBC-SHA",
        0xc023 => "ECDHE-ECDSA-AES128-CBC-SHA256",
        0xc027 => "ECDHE-RSA-AES128-CBC-SHA256",
        0xc02b => "ECDHE-ECDSA-AES128-GCM-SHA256",
        0xc02c => "ECDHE-ECDSA-AES256-GCM-SHA384",
        0xc02f => "ECDHE-RSA-AES128-GCM-SHA256",
        0xc030 => "ECDHE-RSA-AES256-GCM-SHA384",
        0xcca8 => "ECDHE-RSA-CHACHA20-POLY1305",
        0xcca9 => "ECDHE-ECDSA-CHACHA20-POLY1305",
        // TLS 1.3 ──────────────────────────────────────────────────────────────
        0x1301 => "AES128-GCM-SHA256",
        0x1302 => "AES256-GCM-SHA384",
        0x1303 => "CHACHA20-POLY1305-SHA256",
        _      => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(protocol_name(0x0303), Some("TLSv1.2"));
        assert_eq!(protocol_name(0x0304), Some("TLSv1.3"));
        assert_eq!(cipher_name(0xc030), Some("ECDHE-RSA-AES256-GCM-SHA384"));
        assert_eq!(cipher_name(0x1303), Some("CHACHA20-POLY1305-SHA256"));
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(protocol_name(0x0200), None);
        assert_eq!(cipher_name(0x0000), None);
        assert_eq!(cipher_name(0xffff), None);
    }
}
