//! Event Scanner with EventHandler Trait
//!
//! Tokenizes a byte buffer into structural events (element open, attribute,
//! open end, text, CDATA, element close) and hands them to an
//! `EventHandler` as spans into the input. Comments, processing
//! instructions, the XML declaration and DOCTYPE are consumed silently.
//!
//! The scanner keeps its own stack of open element names, so handlers only
//! ever see a balanced, document-ordered event stream.

use super::scanner::{is_name_start_char, Scanner};
use crate::error::ParseError;
use crate::index::Span;

/// Trait for handling structural events
///
/// Implement this trait to receive XML parsing events. The scanner calls
/// these methods as it tokenizes the input, passing spans (byte offsets)
/// instead of string copies. Returning an error stops the scan.
pub trait EventHandler {
    /// Called when a start tag opens, before its attributes
    fn element_open(&mut self, name: Span) -> Result<(), ParseError>;

    /// Called once per attribute, in source order
    ///
    /// `value` excludes the surrounding quotes; entities are not decoded.
    fn attribute(&mut self, key: Span, value: Span) -> Result<(), ParseError>;

    /// Called after the last attribute of a start tag
    fn element_open_end(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    /// Called for a raw text run between tags
    fn text(&mut self, span: Span) -> Result<(), ParseError>;

    /// Called for CDATA sections (content excluding `<![CDATA[` and `]]>`)
    fn cdata(&mut self, span: Span) -> Result<(), ParseError> {
        self.text(span)
    }

    /// Called when an element closes, including self-closing tags
    fn element_close(&mut self) -> Result<(), ParseError>;
}

/// Scanner that dispatches structural events to an `EventHandler`
pub struct EventScanner<'a> {
    scanner: Scanner<'a>,
    /// Names of open elements, innermost last
    open: Vec<Span>,
}

impl<'a> EventScanner<'a> {
    /// Create a new event scanner for the input
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            scanner: Scanner::new(input),
            open: Vec::with_capacity(32),
        }
    }

    /// Scan the entire document, calling handler methods for each event
    pub fn scan<H: EventHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        while let Some(c) = self.scanner.peek() {
            if c == b'<' {
                self.scan_markup(handler)?;
            } else {
                self.scan_text(handler)?;
            }
        }

        match self.open.last() {
            Some(name) => Err(ParseError::UnclosedElement {
                name: self.lossy(*name),
            }),
            None => Ok(()),
        }
    }

    /// Scan markup starting with '<'
    fn scan_markup<H: EventHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '<'

        match self.scanner.peek() {
            Some(b'/') => {
                self.scanner.advance(1);
                self.scan_end_tag(start, handler)
            }
            Some(b'!') => {
                self.scanner.advance(1);
                if self.scanner.starts_with(b"--") {
                    self.scanner.advance(2);
                    self.skip_past(b"-->", "unterminated comment", start)
                } else if self.scanner.starts_with(b"[CDATA[") {
                    self.scanner.advance(7);
                    self.scan_cdata(start, handler)
                } else if self.scanner.starts_with(b"DOCTYPE") {
                    self.scanner.advance(7);
                    self.skip_doctype(start)
                } else {
                    Err(ParseError::malformed("invalid declaration", start))
                }
            }
            Some(b'?') => {
                self.scanner.advance(1);
                self.skip_past(b"?>", "unterminated processing instruction", start)
            }
            Some(c) if is_name_start_char(c) => self.scan_start_tag(start, handler),
            _ => Err(ParseError::malformed("invalid element name", start)),
        }
    }

    /// Scan a start tag; the cursor sits on the element name
    fn scan_start_tag<H: EventHandler>(
        &mut self,
        start: usize,
        handler: &mut H,
    ) -> Result<(), ParseError> {
        let name = self.read_name_span(start, "invalid element name")?;
        handler.element_open(name)?;

        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(b'>') => {
                    self.scanner.advance(1);
                    handler.element_open_end()?;
                    self.open.push(name);
                    return Ok(());
                }
                Some(b'/') => {
                    if self.scanner.peek_at(1) != Some(b'>') {
                        return Err(ParseError::malformed(
                            "expected '>' after '/' in start tag",
                            self.scanner.position(),
                        ));
                    }
                    self.scanner.advance(2);
                    handler.element_open_end()?;
                    return handler.element_close();
                }
                Some(c) if is_name_start_char(c) => self.scan_attribute(handler)?,
                Some(_) => {
                    return Err(ParseError::malformed(
                        "invalid attribute name",
                        self.scanner.position(),
                    ))
                }
                None => return Err(ParseError::malformed("unterminated start tag", start)),
            }
        }
    }

    /// Scan one `key="value"` pair
    fn scan_attribute<H: EventHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        let key_start = self.scanner.position();
        let key = self.read_name_span(key_start, "invalid attribute name")?;

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            return Err(ParseError::malformed(
                "attribute without value",
                self.scanner.position(),
            ));
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(ParseError::malformed(
                    "attribute value must be quoted",
                    self.scanner.position(),
                ))
            }
        };
        self.scanner.advance(1);

        let value_start = self.scanner.position();
        let value_end = self
            .scanner
            .find_byte(quote)
            .ok_or(ParseError::malformed("unterminated attribute value", key_start))?;
        self.scanner.set_position(value_end + 1);

        handler.attribute(key, Span::from_range(value_start, value_end))
    }

    /// Scan an end tag; the cursor sits just past `</`
    fn scan_end_tag<H: EventHandler>(
        &mut self,
        start: usize,
        handler: &mut H,
    ) -> Result<(), ParseError> {
        let name = self.read_name_span(start, "invalid element name in end tag")?;
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(ParseError::malformed("expected '>' in end tag", start));
        }
        self.scanner.advance(1);

        let open = self
            .open
            .pop()
            .ok_or(ParseError::UnmatchedClose { position: start })?;
        if self.bytes(open) != self.bytes(name) {
            return Err(ParseError::MismatchedClose {
                expected: self.lossy(open),
                found: self.lossy(name),
                position: start,
            });
        }

        handler.element_close()
    }

    /// Scan a text run up to the next '<'
    ///
    /// Whitespace-only runs outside every element are dropped.
    fn scan_text<H: EventHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(start + self.scanner.remaining().len());
        self.scanner.set_position(end);

        let span = Span::from_range(start, end);
        if span.is_empty()
            || (self.open.is_empty() && self.bytes(span).iter().all(u8::is_ascii_whitespace))
        {
            return Ok(());
        }
        handler.text(span)
    }

    /// Scan a CDATA section; the cursor sits just past `<![CDATA[`
    fn scan_cdata<H: EventHandler>(
        &mut self,
        start: usize,
        handler: &mut H,
    ) -> Result<(), ParseError> {
        let content_start = self.scanner.position();
        let content_end = self
            .scanner
            .find_sequence(b"]]>")
            .ok_or(ParseError::malformed("unterminated CDATA section", start))?;
        self.scanner.set_position(content_end + 3);
        handler.cdata(Span::from_range(content_start, content_end))
    }

    /// Skip DOCTYPE, including a bracketed internal subset
    fn skip_doctype(&mut self, start: usize) -> Result<(), ParseError> {
        let mut depth = 0usize;
        let mut quote = None;

        while let Some(c) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, c) {
                (Some(q), _) if c == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(c),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(ParseError::malformed("unterminated DOCTYPE", start))
    }

    /// Move the cursor past the next `terminator`
    fn skip_past(
        &mut self,
        terminator: &[u8],
        message: &'static str,
        start: usize,
    ) -> Result<(), ParseError> {
        let end = self
            .scanner
            .find_sequence(terminator)
            .ok_or(ParseError::malformed(message, start))?;
        self.scanner.set_position(end + terminator.len());
        Ok(())
    }

    fn read_name_span(&mut self, start: usize, message: &'static str) -> Result<Span, ParseError> {
        let name_start = self.scanner.position();
        self.scanner
            .read_name()
            .ok_or(ParseError::malformed(message, start))?;
        Ok(Span::from_range(name_start, self.scanner.position()))
    }

    #[inline]
    fn bytes(&self, span: Span) -> &'a [u8] {
        self.scanner.slice(span.offset, span.end())
    }

    fn lossy(&self, span: Span) -> String {
        String::from_utf8_lossy(self.bytes(span)).into_owned()
    }
}

/// Handler that accepts every event
struct NoopHandler;

impl EventHandler for NoopHandler {
    fn element_open(&mut self, _name: Span) -> Result<(), ParseError> {
        Ok(())
    }

    fn attribute(&mut self, _key: Span, _value: Span) -> Result<(), ParseError> {
        Ok(())
    }

    fn text(&mut self, _span: Span) -> Result<(), ParseError> {
        Ok(())
    }

    fn element_close(&mut self) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Check that `input` scans cleanly without building a tree
pub fn validate(input: &[u8]) -> Result<(), ParseError> {
    EventScanner::new(input).scan(&mut NoopHandler)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test handler that records events as readable strings
    struct TestHandler<'a> {
        input: &'a [u8],
        events: Vec<String>,
    }

    impl<'a> TestHandler<'a> {
        fn new(input: &'a [u8]) -> Self {
            Self {
                input,
                events: Vec::new(),
            }
        }

        fn str(&self, span: Span) -> &'a str {
            span.as_str(self.input).unwrap_or("?")
        }
    }

    impl<'a> EventHandler for TestHandler<'a> {
        fn element_open(&mut self, name: Span) -> Result<(), ParseError> {
            let event = format!("open {}", self.str(name));
            self.events.push(event);
            Ok(())
        }

        fn attribute(&mut self, key: Span, value: Span) -> Result<(), ParseError> {
            let event = format!("attr {}={}", self.str(key), self.str(value));
            self.events.push(event);
            Ok(())
        }

        fn element_open_end(&mut self) -> Result<(), ParseError> {
            self.events.push("open-end".to_string());
            Ok(())
        }

        fn text(&mut self, span: Span) -> Result<(), ParseError> {
            let event = format!("text {}", self.str(span));
            self.events.push(event);
            Ok(())
        }

        fn cdata(&mut self, span: Span) -> Result<(), ParseError> {
            let event = format!("cdata {}", self.str(span));
            self.events.push(event);
            Ok(())
        }

        fn element_close(&mut self) -> Result<(), ParseError> {
            self.events.push("close".to_string());
            Ok(())
        }
    }

    fn scan(input: &[u8]) -> Result<Vec<String>, ParseError> {
        let mut handler = TestHandler::new(input);
        EventScanner::new(input).scan(&mut handler)?;
        Ok(handler.events)
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(scan(b"<root/>").unwrap(), ["open root", "open-end", "close"]);
    }

    #[test]
    fn test_attributes_in_order() {
        let events = scan(b"<a x=\"1\" y='two' z = \"\">hi</a>").unwrap();
        assert_eq!(
            events,
            [
                "open a",
                "attr x=1",
                "attr y=two",
                "attr z=",
                "open-end",
                "text hi",
                "close"
            ]
        );
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let events = scan(b"<a href=\"x>y\"/>").unwrap();
        assert_eq!(events[1], "attr href=x>y");
    }

    #[test]
    fn test_entities_left_raw() {
        let events = scan(b"<a k=\"&amp;\">a &lt; b</a>").unwrap();
        assert_eq!(events[1], "attr k=&amp;");
        assert_eq!(events[3], "text a &lt; b");
    }

    #[test]
    fn test_skips_prolog_comments_and_pis() {
        let input = b"<?xml version=\"1.0\"?>\n<!DOCTYPE a [<!ENTITY e \"]>\">]>\n<!-- c --><a><?pi data?><!--x--></a>\n";
        assert_eq!(scan(input).unwrap(), ["open a", "open-end", "close"]);
    }

    #[test]
    fn test_cdata() {
        let events = scan(b"<a><![CDATA[<b>]]></a>").unwrap();
        assert_eq!(events[2], "cdata <b>");
    }

    #[test]
    fn test_whitespace_inside_elements_kept() {
        let events = scan(b"<a> <b/> </a>").unwrap();
        assert_eq!(events[2], "text  ");
        assert_eq!(events[6], "text  ");
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(
            scan(b"<a/></b>"),
            Err(ParseError::UnmatchedClose { position: 4 })
        );
    }

    #[test]
    fn test_mismatched_close() {
        assert_eq!(
            scan(b"<a></b>"),
            Err(ParseError::MismatchedClose {
                expected: "a".to_string(),
                found: "b".to_string(),
                position: 3,
            })
        );
    }

    #[test]
    fn test_unclosed_element() {
        assert_eq!(
            scan(b"<a><b></b>"),
            Err(ParseError::UnclosedElement {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_inputs() {
        for input in [
            &b"<a"[..],
            b"<a x></a>",
            b"<a x=1></a>",
            b"<a x=\"1></a>",
            b"<1a/>",
            b"<a><!-- open</a>",
            b"<a><![CDATA[x</a>",
            b"<a/ >",
            b"<!BOGUS>",
        ] {
            assert!(
                matches!(scan(input), Err(ParseError::Malformed { .. })),
                "expected malformed for {:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_handler_error_stops_scan() {
        struct Failing;
        impl EventHandler for Failing {
            fn element_open(&mut self, _name: Span) -> Result<(), ParseError> {
                Err(ParseError::UnbalancedClose)
            }
            fn attribute(&mut self, _key: Span, _value: Span) -> Result<(), ParseError> {
                Ok(())
            }
            fn text(&mut self, _span: Span) -> Result<(), ParseError> {
                panic!("scan continued after handler error");
            }
            fn element_close(&mut self) -> Result<(), ParseError> {
                Ok(())
            }
        }

        let result = EventScanner::new(b"<a>text</a>").scan(&mut Failing);
        assert_eq!(result, Err(ParseError::UnbalancedClose));
    }

    #[test]
    fn test_validate() {
        assert!(validate(b"<a><b/>text</a>").is_ok());
        assert!(validate(b"</a>").is_err());
    }
}
