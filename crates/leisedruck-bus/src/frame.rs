// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal STOMP frame codec.
//
// Covers the subset the notification bus speaks: CONNECT/CONNECTED,
// SUBSCRIBE, MESSAGE, and ERROR. A frame is the command line, header lines
// (`key:value`), a blank line, the body, and a NUL terminator.

use leisedruck_core::error::{LeisedruckError, Result};

/// One STOMP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// First header with the given key.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Wire representation including the NUL terminator.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(&self.command);
        out.push('\n');
        for (key, value) in &self.headers {
            out.push_str(key);
            out.push(':');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse one frame off the wire.
    ///
    /// Returns `None` for heartbeat frames (bare newlines). Anything else
    /// that lacks a command line is a bus error.
    pub fn parse(raw: &str) -> Result<Option<Frame>> {
        let raw = raw.trim_end_matches('\0');
        if raw.trim().is_empty() {
            return Ok(None);
        }

        // The blank line separating headers from the body may be LF or CRLF.
        let (head, body) = match (raw.find("\n\n"), raw.find("\n\r\n")) {
            (Some(lf), Some(crlf)) if crlf < lf => (&raw[..crlf], &raw[crlf + 3..]),
            (Some(lf), _) => (&raw[..lf], &raw[lf + 2..]),
            (None, Some(crlf)) => (&raw[..crlf], &raw[crlf + 3..]),
            (None, None) => (raw, ""),
        };
        let mut lines = head.lines().map(|l| l.trim_end_matches('\r'));

        let command = lines
            .next()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LeisedruckError::Bus("frame without a command line".into()))?;

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| LeisedruckError::Bus(format!("malformed header line: {line}")))?;
            headers.push((key.to_owned(), value.to_owned()));
        }

        Ok(Some(Frame {
            command: command.to_owned(),
            headers,
            body: body.trim_end_matches('\0').to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_parse_round_trips() {
        let frame = Frame::new("SUBSCRIBE")
            .header("id", "0")
            .header("destination", "/user/bubble");
        let parsed = Frame::parse(&frame.encode()).expect("parse").expect("frame");
        assert_eq!(parsed, frame);
    }

    #[test]
    fn message_frame_body_survives() {
        let raw = "MESSAGE\ndestination:/user/bubble\nmessage-id:7\n\n{\"order\":\"123\"}\0";
        let frame = Frame::parse(raw).expect("parse").expect("frame");
        assert_eq!(frame.command, "MESSAGE");
        assert_eq!(frame.get_header("destination"), Some("/user/bubble"));
        assert_eq!(frame.body, "{\"order\":\"123\"}");
    }

    #[test]
    fn header_value_may_contain_colons() {
        let raw = "CONNECTED\nsession:abc:def\n\n\0";
        let frame = Frame::parse(raw).expect("parse").expect("frame");
        assert_eq!(frame.get_header("session"), Some("abc:def"));
    }

    #[test]
    fn heartbeat_is_not_a_frame() {
        assert!(Frame::parse("\n").expect("parse").is_none());
        assert!(Frame::parse("\0").expect("parse").is_none());
    }

    #[test]
    fn garbage_header_line_is_a_bus_error() {
        let err = Frame::parse("MESSAGE\nnot a header\n\nbody\0").unwrap_err();
        assert!(matches!(err, LeisedruckError::Bus(_)));
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let raw = "CONNECTED\r\nversion:1.2\r\n\n\0";
        let frame = Frame::parse(raw).expect("parse").expect("frame");
        assert_eq!(frame.get_header("version"), Some("1.2"));
    }

    #[test]
    fn crlf_message_frame_keeps_its_body() {
        // The blank line is CRLF here; the JSON body must not be mistaken
        // for a header line.
        let raw = "MESSAGE\r\ndestination:/user/bubble\r\n\r\n{\"order\":\"123\"}\0";
        let frame = Frame::parse(raw).expect("parse").expect("frame");
        assert_eq!(frame.get_header("destination"), Some("/user/bubble"));
        assert_eq!(frame.body, "{\"order\":\"123\"}");
        assert!(frame.get_header("{\"order\"").is_none());
    }
}
