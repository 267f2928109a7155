//! Incoming HTTP request type.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use http::{Method, Version};
use percent_encoding::percent_decode_str;

/// Negotiated TLS parameters of the connection a request arrived on.
///
/// Codes are the IANA wire values: `0x0303` is TLS 1.2, `0xc030` is
/// `TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TlsInfo {
    pub version: u16,
    pub cipher_suite: u16,
}

/// An incoming HTTP request.
///
/// `path` is the decoded request path, not the raw request target, so it
/// may hold any UTF-8. `remote_addr` is kept as the transport reported it
/// (`"203.0.113.5:443"`, `"[::1]:8080"`, or a bare host).
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) version: Version,
    pub(crate) headers: HeaderMap,
    pub(crate) remote_addr: String,
    pub(crate) tls: Option<TlsInfo>,
    pub(crate) body: Bytes,
}

impl Request {
    /// Builder for requests constructed outside the bundled server, such as
    /// in tests or when bridging another transport.
    pub fn builder() -> RequestBuilder {
        RequestBuilder {
            inner: Request {
                method: Method::GET,
                path: String::from("/"),
                version: Version::HTTP_11,
                headers: HeaderMap::new(),
                remote_addr: String::new(),
                tls: None,
                body: Bytes::new(),
            },
        }
    }

    /// Takes over a hyper request. The path is percent-decoded; sequences
    /// that do not decode to UTF-8 become U+FFFD.
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes, remote_addr: String) -> Self {
        Self {
            method: parts.method,
            path: percent_decode_str(parts.uri.path()).decode_utf8_lossy().into_owned(),
            version: parts.version,
            headers: parts.headers,
            remote_addr,
            tls: None,
            body,
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn version(&self) -> Version { self.version }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn remote_addr(&self) -> &str { &self.remote_addr }
    pub fn tls(&self) -> Option<&TlsInfo> { self.tls.as_ref() }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Protocol as it appears on a request line, e.g. `"HTTP/1.1"`.
    pub fn protocol(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            Version::HTTP_2  => "HTTP/2.0",
            Version::HTTP_3  => "HTTP/3.0",
            _                => "HTTP/?",
        }
    }

    /// First value of a header, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decodes HTTP Basic credentials into `scratch` and returns the user
    /// part.
    ///
    /// Returns `None` when the `Authorization` header is missing, is not
    /// `Basic` (case-insensitive), is not padded standard base64, decodes to
    /// more than `scratch` can hold, or lacks the `:` separator.
    pub fn basic_auth_user<'b>(&self, scratch: &'b mut [u8]) -> Option<&'b [u8]> {
        const PREFIX: &[u8] = b"Basic ";

        let value = self.headers.get(AUTHORIZATION)?.as_bytes();
        if value.len() < PREFIX.len() || !value[..PREFIX.len()].eq_ignore_ascii_case(PREFIX) {
            return None;
        }
        let n = STANDARD.decode_slice(&value[PREFIX.len()..], scratch).ok()?;
        let decoded = &scratch[..n];
        let colon = decoded.iter().position(|&b| b == b':')?;
        Some(&decoded[..colon])
    }
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Request`]. Obtain via [`Request::builder()`].
///
/// Defaults to `GET / HTTP/1.1` with no headers, no peer address and no TLS.
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.inner.method = method;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.inner.path = path.into();
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.inner.version = version;
        self
    }

    /// Appends a header value; repeated names keep every value in order.
    pub fn header(mut self, name: &'static str, value: HeaderValue) -> Self {
        self.inner.headers.append(name, value);
        self
    }

    pub fn remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.inner.remote_addr = addr.into();
        self
    }

    pub fn tls(mut self, version: u16, cipher_suite: u16) -> Self {
        self.inner.tls = Some(TlsInfo { version, cipher_suite });
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.inner.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_auth(value: &'static str) -> Request {
        Request::builder()
            .header("authorization", HeaderValue::from_static(value))
            .build()
    }

    #[test]
    fn basic_auth_user_is_decoded() {
        let mut scratch = [0u8; 64];
        let req = with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(req.basic_auth_user(&mut scratch), Some(&b"user"[..]));
    }

    #[test]
    fn basic_auth_prefix_is_case_insensitive() {
        let mut scratch = [0u8; 64];
        let req = with_auth("bAsIc dXNlcjpwYXNz");
        assert_eq!(req.basic_auth_user(&mut scratch), Some(&b"user"[..]));
    }

    #[test]
    fn basic_auth_rejects_malformed_values() {
        let mut scratch = [0u8; 64];
        // wrong scheme
        assert_eq!(with_auth("Bearer dXNlcjpwYXNz").basic_auth_user(&mut scratch), None);
        // not base64
        assert_eq!(with_auth("Basic !!!").basic_auth_user(&mut scratch), None);
        // "userpass" has no separator
        assert_eq!(with_auth("Basic dXNlcnBhc3M=").basic_auth_user(&mut scratch), None);
        // too short to carry the scheme
        assert_eq!(with_auth("Basic").basic_auth_user(&mut scratch), None);
        assert_eq!(Request::builder().build().basic_auth_user(&mut scratch), None);
    }

    #[test]
    fn basic_auth_empty_user_is_valid() {
        let mut scratch = [0u8; 64];
        // ":pass"
        let req = with_auth("Basic OnBhc3M=");
        assert_eq!(req.basic_auth_user(&mut scratch), Some(&b""[..]));
    }

    #[test]
    fn basic_auth_too_large_for_scratch() {
        let mut scratch = [0u8; 4];
        assert_eq!(with_auth("Basic dXNlcjpwYXNz").basic_auth_user(&mut scratch), None);
    }

    #[test]
    fn protocol_names() {
        let req = Request::builder().version(Version::HTTP_10).build();
        assert_eq!(req.protocol(), "HTTP/1.0");
        let req = Request::builder().version(Version::HTTP_2).build();
        assert_eq!(req.protocol(), "HTTP/2.0");
        assert_eq!(Request::builder().build().protocol(), "HTTP/1.1");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = Request::builder()
            .header("x-request-id", HeaderValue::from_static("abc"))
            .build();
        assert_eq!(req.header("X-Request-Id"), Some("abc"));
        assert_eq!(req.header("referer"), None);
    }

    fn from_uri(uri: &str) -> Request {
        let (parts, ()) = http::Request::builder()
            .uri(uri)
            .version(Version::HTTP_2)
            .header("user-agent", "curl/8.5.0")
            .body(())
            .unwrap()
            .into_parts();
        Request::from_parts(parts, Bytes::from_static(b"{}"), "203.0.113.5:443".to_owned())
    }

    #[test]
    fn from_parts_decodes_path() {
        let req = from_uri("/%C3%A4/a%7Cb?q=%7C");
        assert_eq!(req.path(), "/\u{e4}/a|b");
        assert_eq!(req.protocol(), "HTTP/2.0");
        assert_eq!(req.header("user-agent"), Some("curl/8.5.0"));
        assert_eq!(req.remote_addr(), "203.0.113.5:443");
        assert_eq!(req.body(), b"{}");
        assert!(req.tls().is_none());
    }

    #[test]
    fn from_parts_keeps_undecodable_bytes_visible() {
        assert_eq!(from_uri("/a%FFb").path(), "/a\u{fffd}b");
        assert_eq!(from_uri("/100%25").path(), "/100%");
        assert_eq!(from_uri("/plain").path(), "/plain");
    }
}
