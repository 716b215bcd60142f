//! Template scanning.
//! The scanner turns source text into a flat, lazy stream of tokens.
//! Tokenization follows the HTML spec loosely.
//! https://html.spec.whatwg.org/multipage/parsing.html#tokenization
//!
//! A start tag is emitted as `TagOpen`, then zero or more
//! `AttrName`/`AttrValue` pairs, then `TagEnd`. End tags are one token.

use super::{
    error::{CompilationError, CompilationErrorKind as ErrorKind, ErrorHandler},
    util::{non_whitespace, VStr},
    Name, Position, SourceLocation,
};
use std::{iter::FusedIterator, str::Chars};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TokenKind<'a> {
    /// `<tag`, attribute tokens follow until `TagEnd`
    TagOpen(Name<'a>),
    AttrName(Name<'a>),
    /// value without quotes, location covers the value only
    AttrValue(VStr<'a>),
    /// `>` or `/>` finishing a start tag
    TagEnd { self_closing: bool },
    /// `</tag>`
    TagClose(Name<'a>),
    Text(VStr<'a>),
    /// expression between the delimiters
    Interpolation(&'a str),
    Comment(&'a str),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub location: SourceLocation,
}

/// TextMode represents different text scanning strategy.
/// e.g. Scanning in script/textarea/div are different.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TextMode {
    //         | Elements | Entities | End sign              | Inside of
    // DATA    | ✔        | ✔        | End tags of ancestors |
    // RCDATA  | ✘        | ✔        | End tag of the parent | <textarea>
    // RAWTEXT | ✘        | ✘        | End tag of the parent | <style>,<script>
    Data,
    RcData,
    RawText,
}

pub fn get_html_text_mode(tag: &str) -> TextMode {
    match tag {
        "style" | "script" | "iframe" | "noscript" | "xmp" | "noembed" | "noframes" => {
            TextMode::RawText
        }
        "textarea" | "title" => TextMode::RcData,
        _ => TextMode::Data,
    }
}

/// ScanOption defined a list of methods used in scanning
#[derive(Clone)]
pub struct ScanOption {
    pub delimiters: (String, String),
    pub get_text_mode: fn(&str) -> TextMode,
}

impl Default for ScanOption {
    fn default() -> Self {
        Self {
            delimiters: ("{{".into(), "}}".into()),
            get_text_mode: get_html_text_mode,
        }
    }
}

pub struct Scanner {
    option: ScanOption,
}

// builder methods
impl Scanner {
    pub fn new(mut option: ScanOption) -> Self {
        // empty delimiters would match everywhere
        if option.delimiters.0.is_empty() || option.delimiters.1.is_empty() {
            option.delimiters = ScanOption::default().delimiters;
        }
        Self { option }
    }
    pub fn scan<'a, E>(&self, source: &'a str, err_handle: E) -> Tokens<'a, E>
    where
        E: ErrorHandler,
    {
        Tokens {
            source,
            err_handle,
            position: Default::default(),
            mode: TextMode::Data,
            option: self.option.clone(),
            last_start_tag_name: None,
            tag_state: TagState::Outside,
            pending: None,
        }
    }
}

enum TagState {
    Outside,
    /// inside a start tag, the mode to switch to when it closes
    Inside(TextMode),
}

pub struct Tokens<'a, E: ErrorHandler> {
    source: &'a str,
    err_handle: E,
    position: Position,
    mode: TextMode,
    option: ScanOption,
    // following fields are implementation details

    //  appropriate end tag token needs last start tag, if any
    // https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token
    last_start_tag_name: Option<&'a str>,
    tag_state: TagState,
    // attribute value scanned together with its name
    pending: Option<Token<'a>>,
}

// scanning methods
// NB: When storing self.source to a name, prefer using a ref.
// because Rust ownership can help us to prevent invalid state.
// e.g. `let src = self.source` causes a stale src after [`move_by`].
// while `let src= &self.source` forbids any src usage after a mut call.
impl<'a, E: ErrorHandler> Tokens<'a, E> {
    // https://html.spec.whatwg.org/multipage/parsing.html#data-state
    // NB: & is not handled here but decoded lazily by VStr
    fn scan_data(&mut self) -> Option<Token<'a>> {
        debug_assert!(self.mode == TextMode::Data);
        let start = self.position;
        let delimiter = &self.option.delimiters.0;
        let tag_start = self.source.find('<');
        let interpolation_start = self.source.find(delimiter.as_str());
        let index = match (tag_start, interpolation_start) {
            (Some(a), Some(b)) => a.min(b),
            (a, b) => a.or(b).unwrap_or(self.source.len()),
        };
        if index != 0 {
            return Some(self.scan_text(index, start));
        }
        if interpolation_start == Some(0) {
            return Some(self.scan_interpolation());
        }
        self.scan_tag_open()
    }

    // produces a Text token marked for entity decoding
    fn scan_text(&mut self, size: usize, start: Position) -> Token<'a> {
        let src = self.move_by(size);
        if src.contains('\0') {
            self.emit_error(ErrorKind::UnexpectedNullCharacter, start);
        }
        let mut text = VStr::raw(src);
        if self.mode != TextMode::RawText {
            text.decode(false);
        }
        self.token(TokenKind::Text(text), start)
    }

    fn scan_interpolation(&mut self) -> Token<'a> {
        let start = self.position;
        let (open_len, close) = {
            let delimiters = &self.option.delimiters;
            debug_assert!(self.source.starts_with(delimiters.0.as_str()));
            (delimiters.0.len(), delimiters.1.clone())
        };
        self.move_by(open_len);
        let content = match self.source.find(close.as_str()) {
            Some(i) => {
                let content = self.move_by(i);
                self.move_by(close.len());
                content
            }
            None => {
                let content = self.move_by(self.source.len());
                self.emit_error(ErrorKind::MissingInterpolationEnd, start);
                content
            }
        };
        self.token(TokenKind::Interpolation(content), start)
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state
    fn scan_tag_open(&mut self) -> Option<Token<'a>> {
        let start = self.position;
        // use a ref to &str to ensure source is always valid
        // that is, source cannot be used after move_by
        let source = &self.source;
        if source.starts_with("</") {
            self.scan_end_tag_open()
        } else if source.starts_with("<!") {
            Some(self.scan_comment_and_like())
        } else if source.starts_with("<?") {
            self.emit_error(ErrorKind::UnexpectedQuestionMarkInsteadOfTagName, start);
            Some(self.scan_bogus_comment())
        } else if source.len() == 1 {
            self.move_by(1);
            self.emit_error(ErrorKind::EofBeforeTagName, start);
            Some(self.token(TokenKind::Text(VStr::raw("<")), start))
        } else if !source[1..].starts_with(ascii_alpha) {
            // a standalone < is kept as text
            self.move_by(1);
            self.emit_error(ErrorKind::InvalidFirstCharacterOfTagName, start);
            Some(self.token(TokenKind::Text(VStr::raw("<")), start))
        } else {
            Some(self.scan_start_tag())
        }
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state
    fn scan_start_tag(&mut self) -> Token<'a> {
        debug_assert!(self.source.starts_with('<'));
        let start = self.position;
        self.move_by(1);
        let name = self.scan_tag_name();
        // https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text
        // Parsing algorithms are always invoked in response to a start tag token.
        let parsing_algorithm = self.option.get_text_mode;
        let mode = parsing_algorithm(name);
        if mode != TextMode::Data {
            self.last_start_tag_name = Some(name);
        }
        self.tag_state = TagState::Inside(mode);
        self.token(TokenKind::TagOpen(name), start)
    }

    fn scan_tag_name(&mut self) -> &'a str {
        debug_assert!(self.source.starts_with(ascii_alpha));
        let l = scan_tag_name_length(self.source.chars());
        debug_assert!(l > 0);
        self.move_by(l)
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state
    fn scan_in_tag(&mut self, mode: TextMode) -> Token<'a> {
        loop {
            self.skip_whitespace();
            let start = self.position;
            if self.source.is_empty() {
                self.tag_state = TagState::Outside;
                self.emit_error(ErrorKind::EofInTag, start);
                return self.token(TokenKind::TagEnd { self_closing: false }, start);
            }
            if self.source.starts_with("/>") {
                self.move_by(2);
                self.tag_state = TagState::Outside;
                // self closing tag has no content to scan in raw mode
                return self.token(TokenKind::TagEnd { self_closing: true }, start);
            }
            if self.source.starts_with('>') {
                self.move_by(1);
                self.tag_state = TagState::Outside;
                self.mode = mode;
                return self.token(TokenKind::TagEnd { self_closing: false }, start);
            }
            if self.did_skip_slash_in_tag() {
                continue;
            }
            return self.scan_attribute();
        }
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state
    fn scan_attribute(&mut self) -> Token<'a> {
        debug_assert!(!self.source.is_empty());
        let start = self.position;
        let name = self.scan_attr_name();
        let name_token = self.token(TokenKind::AttrName(name), start);
        // 13.2.5.34 After attribute name state, ignore white spaces
        self.skip_whitespace();
        if self.source.starts_with('=') {
            self.move_by(1); // equal sign
            self.pending = self.scan_attr_value();
        }
        name_token
    }

    fn is_about_to_close_tag(&self) -> bool {
        let source = &self.source; // must get fresh source
        source.is_empty() || source.starts_with("/>") || source.starts_with('>')
    }

    fn did_skip_slash_in_tag(&mut self) -> bool {
        debug_assert!(!self.source.is_empty());
        if self.source.starts_with('/') {
            let start = self.position;
            self.move_by(1);
            self.emit_error(ErrorKind::UnexpectedSolidusInTag, start);
            true
        } else {
            false
        }
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state
    fn scan_attr_name(&mut self) -> &'a str {
        let start = self.position;
        // case like <tag =="value"/>
        if self.source.starts_with('=') {
            let s = self.move_by(1);
            self.emit_error(ErrorKind::UnexpectedEqualsSignBeforeAttributeName, start);
            return s;
        }
        let count: usize = self
            .source
            .chars()
            .take_while(|&c| semi_valid_attr_name(c))
            .map(char::len_utf8)
            .sum();
        let src = self.move_by(count);
        if src.contains(&['<', '"', '\''][..]) {
            self.emit_error(ErrorKind::UnexpectedCharacterInAttributeName, start);
        }
        src
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state
    fn scan_attr_value(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();
        let start = self.position;
        if self.source.starts_with('>') || self.source.is_empty() {
            self.emit_error(ErrorKind::MissingAttributeValue, start);
            return None;
        }
        if self.source.starts_with('"') {
            return Some(self.scan_quoted_attr_value('"'));
        }
        if self.source.starts_with('\'') {
            return Some(self.scan_quoted_attr_value('\''));
        }
        Some(self.scan_unquoted_attr_value())
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state
    // https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state
    fn scan_quoted_attr_value(&mut self, quote: char) -> Token<'a> {
        debug_assert!(self.source.starts_with(quote));
        self.move_by(1);
        let start = self.position;
        let src = if let Some(i) = self.source.find(quote) {
            let val = self.move_by(i);
            let loc = self.get_location_from(start);
            self.move_by(1); // consume quote char
            return self.after_quoted_value(val, loc);
        } else {
            self.move_by(self.source.len())
        };
        let loc = self.get_location_from(start);
        self.after_quoted_value(src, loc)
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state
    fn after_quoted_value(&mut self, src: &'a str, location: SourceLocation) -> Token<'a> {
        let at = self.position;
        if !self.is_about_to_close_tag()
            && !self.source.starts_with('/')
            && self.skip_whitespace() == 0
        {
            self.emit_error(ErrorKind::MissingWhitespaceBetweenAttributes, at);
        }
        let mut value = VStr::raw(src);
        value.decode(/*is_attr*/ true);
        Token {
            kind: TokenKind::AttrValue(value),
            location,
        }
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state
    fn scan_unquoted_attr_value(&mut self) -> Token<'a> {
        let start = self.position;
        let val_len: usize = self
            .source
            .chars()
            .take_while(semi_valid_unquoted_attr_value)
            .map(char::len_utf8)
            .sum();
        let src = self.move_by(val_len);
        if src.contains(&['"', '\'', '<', '=', '`'][..]) {
            self.emit_error(ErrorKind::UnexpectedCharacterInUnquotedAttributeValue, start);
        }
        let mut value = VStr::raw(src);
        value.decode(/* is_attr */ true);
        self.token(TokenKind::AttrValue(value), start)
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state
    fn scan_end_tag_open(&mut self) -> Option<Token<'a>> {
        debug_assert!(self.source.starts_with("</"));
        let start = self.position;
        let source = &self.source;
        if source.len() == 2 {
            self.emit_error(ErrorKind::EofBeforeTagName, start);
            let text = self.move_by(2);
            Some(self.token(TokenKind::Text(VStr::raw(text)), start))
        } else if source.starts_with("</>") {
            self.emit_error(ErrorKind::MissingEndTagName, start);
            self.move_by(3);
            None
        } else if !self.source[2..].starts_with(ascii_alpha) {
            self.emit_error(ErrorKind::InvalidFirstCharacterOfTagName, start);
            Some(self.scan_bogus_comment())
        } else {
            Some(self.scan_end_tag())
        }
    }

    // errors emit here is defined at the top of the tokenization spec
    fn scan_end_tag(&mut self) -> Token<'a> {
        debug_assert!(self.source.starts_with("</"));
        let start = self.position;
        self.move_by(2);
        let name = self.scan_tag_name();
        // attributes in end tag are scanned and dropped
        let mut has_attr = false;
        loop {
            self.skip_whitespace();
            if self.is_about_to_close_tag() {
                break;
            }
            if self.did_skip_slash_in_tag() {
                continue;
            }
            has_attr = true;
            self.scan_attribute();
            self.pending = None;
        }
        if has_attr {
            self.emit_error(ErrorKind::EndTagWithAttributes, start);
        }
        if self.source.is_empty() {
            self.emit_error(ErrorKind::EofInTag, start);
        } else if self.source.starts_with("/>") {
            self.emit_error(ErrorKind::EndTagWithTrailingSolidus, start);
            self.move_by(2);
        } else {
            self.move_by(1);
        }
        // reset text mode after tag close
        self.mode = TextMode::Data;
        self.token(TokenKind::TagClose(name), start)
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state
    fn scan_comment_and_like(&mut self) -> Token<'a> {
        let start = self.position;
        let s = &self.source;
        if s.starts_with("<!--") {
            self.scan_comment()
        } else if s.starts_with("<!DOCTYPE") || s.starts_with("<!doctype") {
            self.scan_bogus_comment()
        } else if s.starts_with("<![CDATA[") {
            // templates are always in HTML namespace here
            self.emit_error(ErrorKind::CDataInHtmlContent, start);
            self.scan_bogus_comment()
        } else {
            self.emit_error(ErrorKind::IncorrectlyOpenedComment, start);
            self.scan_bogus_comment()
        }
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state
    fn scan_comment(&mut self) -> Token<'a> {
        debug_assert!(self.source.starts_with("<!--"));
        let start = self.position;
        let comment_text = self.scan_comment_text();
        if self.source.is_empty() {
            self.emit_error(ErrorKind::EofInComment, start);
        } else if self.source.starts_with("--!>") {
            self.emit_error(ErrorKind::IncorrectlyClosedComment, start);
            self.move_by(4);
        } else if self.source.starts_with("-->") {
            self.move_by(3);
        } else {
            // abrupt <!--> or <!--->
            let end = self.source.find('>').map_or(self.source.len(), |i| i + 1);
            self.move_by(end);
        }
        self.token(TokenKind::Comment(comment_text), start)
    }

    fn scan_comment_text(&mut self) -> &'a str {
        debug_assert!(self.source.starts_with("<!--"));
        let start = self.position;
        let comment_end = self.source.find("--!>").or_else(|| self.source.find("-->"));
        // NB: we take &str here since we will call move_by later
        let text = if let Some(end) = comment_end {
            debug_assert!(end >= 2, "first two chars must be <!");
            // <!---> or <!-->
            if end <= 3 {
                self.emit_error(ErrorKind::AbruptClosingOfEmptyComment, start);
                self.move_by(2); // skip <!, remaining is handled by caller
                return "";
            }
            self.move_by(4); // skip <!--
            &self.source[..end - 4] // must be exclusive
        } else {
            // no closing comment
            self.move_by(4);
            self.source
        };

        // report nested comment error
        let mut s = text;
        while let Some(i) = s.find("<!--") {
            let at = self.position;
            self.move_by(i + 4);
            // spec does not emit the NestedComment error when EOF is met
            // #13.2.5.49 Comment less-than sign bang dash dash state
            if !self.source.is_empty() {
                self.emit_error(ErrorKind::NestedComment, at);
            }
            s = &s[i + 4..];
        }
        // consume remaining comment
        if !s.is_empty() {
            self.move_by(s.len());
        }
        text
    }

    #[cold]
    #[inline(never)]
    fn scan_bogus_comment(&mut self) -> Token<'a> {
        /* /^<(?:[\!\?]|\/[^a-z>])/i from parseBogusComment
        ^            // starts with
        <            // a < followed by
        (?:          // a non-capturing group of
         [\!\?]      // a char of ! or ?
         |           // or
         \/[^a-z>]   // a slash and non alpha or >
        )
        */
        let start = self.position;
        let s = &self.source;
        let offset = if s.starts_with("<?") { 1 } else { 2 };
        let text = if let Some(end) = s.find('>') {
            let t = &s[offset..end];
            self.move_by(end + 1);
            t
        } else {
            let len = s.len();
            &self.move_by(len)[offset..]
        };
        self.token(TokenKind::Comment(text), start)
    }

    // https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state
    fn scan_rawtext(&mut self) -> Option<Token<'a>> {
        debug_assert!(self.mode == TextMode::RawText);
        let start = self.position;
        let end = self.find_appropriate_end();
        if end == 0 {
            self.mode = TextMode::Data;
            return None;
        }
        // NOTE: rawtext decodes no entity
        let ret = self.scan_text(end, start);
        self.mode = TextMode::Data;
        Some(ret)
    }

    fn scan_rcdata(&mut self) -> Option<Token<'a>> {
        debug_assert!(self.mode == TextMode::RcData);
        let start = self.position;
        if self.source.starts_with(self.option.delimiters.0.as_str()) {
            return Some(self.scan_interpolation());
        }
        let end = self.find_appropriate_end();
        let interpolation_start = self
            .source
            .find(self.option.delimiters.0.as_str())
            .unwrap_or(end);
        if interpolation_start < end {
            return Some(self.scan_text(interpolation_start, start));
        }
        if end == 0 {
            self.mode = TextMode::Data;
            return None;
        }
        let ret = self.scan_text(end, start);
        self.mode = TextMode::Data;
        Some(ret)
    }

    /// find first </{last_start_tag_name}
    fn find_appropriate_end(&self) -> usize {
        let tag_name = match self.last_start_tag_name {
            Some(name) => name,
            None => return self.source.len(),
        };
        let len = tag_name.len();
        let source = self.source; // no mut self, need no &&str
        for (i, _) in source.match_indices("</") {
            //  match point     non letter separator
            //      ￬   </  style ￬
            let e = i + 2 + len;
            // emit text without error per spec
            if e > source.len() {
                break;
            }
            // https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state
            let is_appropriate_end = source
                .get(i + 2..e)
                .map_or(false, |s| s.eq_ignore_ascii_case(tag_name));
            let terminated = !source[e..].starts_with(is_valid_name_char);
            if is_appropriate_end && terminated {
                // found!
                return i;
            }
        }
        source.len()
    }
}

// utility methods
impl<'a, E: ErrorHandler> Tokens<'a, E> {
    fn emit_error(&self, error_kind: ErrorKind, start: Position) {
        let loc = self.get_location_from(start);
        let err = CompilationError::new(error_kind).with_location(loc);
        self.err_handle.on_error(err);
    }

    fn token(&self, kind: TokenKind<'a>, start: Position) -> Token<'a> {
        Token {
            kind,
            location: self.get_location_from(start),
        }
    }

    fn get_location_from(&self, start: Position) -> SourceLocation {
        SourceLocation {
            start,
            end: self.position,
        }
    }

    /// move scanner's internal position forward and return &str
    /// scanner's line/column are also updated in the method
    /// NB: it only moves forward, not backward
    /// `advance_to` is a better name but it collides with iter
    fn move_by(&mut self, size: usize) -> &'a str {
        let (consumed, rest) = self.source.split_at(size);
        let pos = &mut self.position;
        pos.offset += size;
        match consumed.rfind('\n') {
            Some(last_new_line) => {
                pos.line += consumed.matches('\n').count();
                pos.column = consumed[last_new_line + 1..].chars().count() + 1;
            }
            None => pos.column += consumed.chars().count(),
        }
        self.source = rest;
        consumed
    }

    fn skip_whitespace(&mut self) -> usize {
        let idx = self.source.find(non_whitespace);
        let len = idx.unwrap_or(self.source.len());
        if len != 0 {
            self.move_by(len);
        }
        len
    }
}

#[inline]
fn ascii_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

// `< ' "` are not valid but counted as semi valid
// to leniently recover from a parsing error
#[inline]
fn semi_valid_attr_name(c: char) -> bool {
    is_valid_name_char(c) && c != '='
}

// only whitespace and > terminates unquoted attr value
// other special char only emits error
#[inline]
fn semi_valid_unquoted_attr_value(&c: &char) -> bool {
    !c.is_ascii_whitespace() && c != '>'
}

#[inline]
fn is_valid_name_char(c: char) -> bool {
    !c.is_ascii_whitespace() && c != '/' && c != '>'
}

// tag name should begin with [a-zA-Z]
// followed by chars except whitespace, / or >
fn scan_tag_name_length(mut chars: Chars<'_>) -> usize {
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    let l: usize = chars
        .take_while(|&c| is_valid_name_char(c))
        .map(char::len_utf8)
        .sum();
    l + 1
}

impl<'a, E: ErrorHandler> Iterator for Tokens<'a, E> {
    type Item = Token<'a>;
    // https://html.spec.whatwg.org/multipage/parsing.html#concept-frag-parse-context
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if let TagState::Inside(mode) = self.tag_state {
            return Some(self.scan_in_tag(mode));
        }
        // some scans consume input without producing a token
        while !self.source.is_empty() {
            let token = match self.mode {
                TextMode::Data => self.scan_data(),
                TextMode::RcData => self.scan_rcdata(),
                TextMode::RawText => self.scan_rawtext(),
            };
            if token.is_some() {
                return token;
            }
        }
        None
    }
}

// Parser requires Tokens always yield None when exhausted.
impl<'a, E: ErrorHandler> FusedIterator for Tokens<'a, E> {}
