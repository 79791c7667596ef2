// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal markup documents for label printing.
//
// Two variants: a file URL pointing at a bundled template page with the raw
// content carried in the query string, or an inline document embedding a
// pre-rendered image payload sized to fill the page.

use std::path::Path;

use serde::{Deserialize, Serialize};

use leisedruck_core::types::ContentKind;

/// What gets loaded into the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintDocument {
    /// `file://` URL of a template page plus query parameters.
    TemplateUrl(String),
    /// Complete HTML handed to the surface directly.
    InlineHtml(String),
}

impl PrintDocument {
    /// URL of the bundled template page for `kind`, with `content`
    /// query-escaped into the `content` parameter.
    pub fn template(template_root: &Path, kind: ContentKind, content: &str) -> Self {
        let root = template_root.to_string_lossy().replace('\\', "/");
        Self::TemplateUrl(format!(
            "file://{root}/{page}?content={query}",
            page = kind.template_page(),
            query = escape_component(content),
        ))
    }

    /// Inline document embedding a pre-rendered image payload (a data URL),
    /// stretched to fill its container so the label uses the whole page.
    pub fn inline_image(payload: &str) -> Self {
        let src = payload.replace('"', "&quot;");
        Self::InlineHtml(format!(
            "<!DOCTYPE html><html><head><style>\
             html,body{{margin:0;padding:0;width:100%;height:100%;}}\
             img{{display:block;width:100%;height:100%;object-fit:fill;}}\
             </style></head><body><img src=\"{src}\"></body></html>"
        ))
    }
}

/// Query-component escaping with the same unreserved set browsers use for
/// `encodeURIComponent`: ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
fn escape_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => {
                out.push('%');
                out.push_str(&format!("{other:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn template_url_carries_escaped_content() {
        let doc = PrintDocument::template(
            &PathBuf::from("C:\\app\\static"),
            ContentKind::QrCode,
            "ORDER 123/456",
        );
        match doc {
            PrintDocument::TemplateUrl(url) => {
                assert_eq!(url, "file://C:/app/static/qrCode.html?content=ORDER%20123%2F456");
            }
            other => panic!("unexpected document: {other:?}"),
        }
    }

    #[test]
    fn barcode_uses_its_own_template_page() {
        let doc = PrintDocument::template(
            &PathBuf::from("/opt/app/static"),
            ContentKind::Barcode,
            "X",
        );
        match doc {
            PrintDocument::TemplateUrl(url) => assert!(url.contains("/barCode.html?content=X")),
            other => panic!("unexpected document: {other:?}"),
        }
    }

    #[test]
    fn escaping_handles_multibyte_content() {
        assert_eq!(escape_component("标签"), "%E6%A0%87%E7%AD%BE");
        assert_eq!(escape_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(escape_component("safe-._!~*'()"), "safe-._!~*'()");
    }

    #[test]
    fn inline_image_fills_the_page() {
        let doc = PrintDocument::inline_image("data:image/png;base64,AAAA");
        match doc {
            PrintDocument::InlineHtml(html) => {
                assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
                assert!(html.contains("object-fit:fill"));
                assert!(html.contains("margin:0"));
            }
            other => panic!("unexpected document: {other:?}"),
        }
    }

    #[test]
    fn inline_image_escapes_quotes() {
        let doc = PrintDocument::inline_image("x\"onerror=\"alert(1)");
        match doc {
            PrintDocument::InlineHtml(html) => assert!(!html.contains("\"onerror=\"")),
            other => panic!("unexpected document: {other:?}"),
        }
    }
}
