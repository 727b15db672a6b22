//! # Text Carriers
//!
//! Two independent ways of hiding bits in plain text.
//!
//! ## Whitespace method
//! Every run of ASCII spaces with a non-whitespace character on *both* sides (an
//! inter-word gap on one line) is one unit. One space is a 0 bit, two spaces is
//! a 1 bit. Runs at line starts or ends, and runs touching tabs or newlines, are
//! never units and are never touched. Gaps beyond the frame keep their original
//! width.
//!
//! ```text
//! "the quick  brown fox"  ->  gaps [1, 2, 1]  ->  bits 0 1 0
//! ```
//!
//! ## Zero-width method
//! Every visible (non-whitespace) character is an insertion point. Bit `i` is
//! written as a zero-width mark placed right after insertion point `i`
//! (U+200B for 0 and U+200C for 1 by default). Decoding only looks at the marks,
//! in order, and ignores everything else in the text.
//!
//! ## Auto-detection
//! Best effort: if the text contains any zero-width mark the zero-width method is
//! tried first, then the whitespace method. A method only counts as detected when
//! it yields a non-empty payload: ordinary single-spaced prose reads as a header
//! of all zeros, which is a valid but empty frame. If no method yields a payload
//! the result is [`StegoError::UnknownEncoding`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::TextConfig;
use crate::error::{Result, StegoError};

use super::{conceal, reveal, Carrier, Framer};

/// How bits are represented in a text carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMethod {
    Whitespace,
    #[serde(alias = "zero_width")]
    ZeroWidth,
}

impl TextMethod {
    pub const ALL: [TextMethod; 2] = [TextMethod::Whitespace, TextMethod::ZeroWidth];
}

impl fmt::Display for TextMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whitespace => write!(f, "whitespace"),
            Self::ZeroWidth => write!(f, "zero-width"),
        }
    }
}

impl FromStr for TextMethod {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "whitespace" => Ok(Self::Whitespace),
            "zero-width" | "zero_width" | "zerowidth" => Ok(Self::ZeroWidth),
            other => Err(StegoError::InvalidConfig(format!(
                "unknown text method '{other}' (expected whitespace or zero-width)"
            ))),
        }
    }
}

/// Text split around its inter-word space gaps.
///
/// `pieces` always holds one more element than `gaps`; rendering interleaves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitespaceText {
    pieces: Vec<String>,
    gaps: Vec<usize>,
}

impl WhitespaceText {
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut gaps = Vec::new();
        let mut current = String::new();

        let mut i = 0;
        while i < chars.len() {
            if chars[i] != ' ' {
                current.push(chars[i]);
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && chars[i] == ' ' {
                i += 1;
            }

            let bounded = start > 0
                && !chars[start - 1].is_whitespace()
                && i < chars.len()
                && !chars[i].is_whitespace();

            if bounded {
                pieces.push(std::mem::take(&mut current));
                gaps.push(i - start);
            } else {
                current.extend(std::iter::repeat(' ').take(i - start));
            }
        }
        pieces.push(current);

        Self { pieces, gaps }
    }

    /// Width of every gap, in order.
    pub fn gaps(&self) -> &[usize] {
        &self.gaps
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        for (piece, gap) in self.pieces.iter().zip(&self.gaps) {
            output.push_str(piece);
            output.extend(std::iter::repeat(' ').take(*gap));
        }
        if let Some(last) = self.pieces.last() {
            output.push_str(last);
        }
        output
    }
}

impl Carrier for WhitespaceText {
    fn unit_count(&self) -> usize {
        self.gaps.len()
    }

    fn read_unit(&self, index: usize) -> bool {
        self.gaps[index] >= 2
    }

    fn write_unit(&mut self, index: usize, bit: bool) {
        self.gaps[index] = if bit { 2 } else { 1 };
    }
}

/// Text with its zero-width marks lifted out.
///
/// `marks[i]` belongs after insertion point `i`. Marks beyond the last insertion
/// point are kept and rendered at the end of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroWidthText {
    text: String,
    points: usize,
    marks: Vec<bool>,
    zero_mark: char,
    one_mark: char,
}

impl ZeroWidthText {
    /// Read the marks already present in `text`, in order.
    pub fn parse(text: &str, config: &TextConfig) -> Self {
        let mut stripped = String::with_capacity(text.len());
        let mut marks = Vec::new();
        let mut points = 0;

        for c in text.chars() {
            if c == config.zero_mark {
                marks.push(false);
            } else if c == config.one_mark {
                marks.push(true);
            } else {
                if !c.is_whitespace() {
                    points += 1;
                }
                stripped.push(c);
            }
        }

        Self {
            text: stripped,
            points,
            marks,
            zero_mark: config.zero_mark,
            one_mark: config.one_mark,
        }
    }

    /// Prepare `text` as a fresh cover: any marks it already carries are dropped.
    pub fn cover(text: &str, config: &TextConfig) -> Self {
        let mut carrier = Self::parse(text, config);
        carrier.marks.clear();
        carrier
    }

    /// Marks currently attached, in order.
    pub fn marks(&self) -> &[bool] {
        &self.marks
    }

    pub fn render(&self) -> String {
        let mut output = String::with_capacity(self.text.len() + self.marks.len() * 3);
        let mut point = 0;

        for c in self.text.chars() {
            output.push(c);
            if c.is_whitespace() {
                continue;
            }
            if let Some(bit) = self.marks.get(point) {
                output.push(self.mark_for(*bit));
            }
            point += 1;
        }
        for bit in self.marks.iter().skip(self.points) {
            output.push(self.mark_for(*bit));
        }

        output
    }

    fn mark_for(&self, bit: bool) -> char {
        if bit {
            self.one_mark
        } else {
            self.zero_mark
        }
    }
}

impl Carrier for ZeroWidthText {
    fn unit_count(&self) -> usize {
        self.points
    }

    fn readable_units(&self) -> usize {
        self.marks.len()
    }

    fn read_unit(&self, index: usize) -> bool {
        self.marks[index]
    }

    fn write_unit(&mut self, index: usize, bit: bool) {
        if index < self.marks.len() {
            self.marks[index] = bit;
        } else {
            // points skipped over get a 0 mark so positions stay aligned
            self.marks.resize(index, false);
            self.marks.push(bit);
        }
    }
}

/// Either text carrier, chosen by [`TextMethod`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCarrier {
    Whitespace(WhitespaceText),
    ZeroWidth(ZeroWidthText),
}

impl TextCarrier {
    pub fn method(&self) -> TextMethod {
        match self {
            Self::Whitespace(_) => TextMethod::Whitespace,
            Self::ZeroWidth(_) => TextMethod::ZeroWidth,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Whitespace(text) => text.render(),
            Self::ZeroWidth(text) => text.render(),
        }
    }
}

impl Carrier for TextCarrier {
    fn unit_count(&self) -> usize {
        match self {
            Self::Whitespace(text) => text.unit_count(),
            Self::ZeroWidth(text) => text.unit_count(),
        }
    }

    fn readable_units(&self) -> usize {
        match self {
            Self::Whitespace(text) => text.readable_units(),
            Self::ZeroWidth(text) => text.readable_units(),
        }
    }

    fn read_unit(&self, index: usize) -> bool {
        match self {
            Self::Whitespace(text) => text.read_unit(index),
            Self::ZeroWidth(text) => text.read_unit(index),
        }
    }

    fn write_unit(&mut self, index: usize, bit: bool) {
        match self {
            Self::Whitespace(text) => text.write_unit(index, bit),
            Self::ZeroWidth(text) => text.write_unit(index, bit),
        }
    }
}

/// Encodes and decodes payloads in text under either method.
#[derive(Debug, Clone, Copy)]
pub struct TextCodec {
    framer: Framer,
    config: TextConfig,
}

impl TextCodec {
    pub fn new(framer: Framer, config: TextConfig) -> Self {
        Self { framer, config }
    }

    /// Carrier for writing into `text`. Zero-width covers start without marks.
    pub fn cover(&self, text: &str, method: TextMethod) -> TextCarrier {
        match method {
            TextMethod::Whitespace => TextCarrier::Whitespace(WhitespaceText::parse(text)),
            TextMethod::ZeroWidth => TextCarrier::ZeroWidth(ZeroWidthText::cover(text, &self.config)),
        }
    }

    /// Carrier for reading what `text` already holds.
    pub fn scan(&self, text: &str, method: TextMethod) -> TextCarrier {
        match method {
            TextMethod::Whitespace => TextCarrier::Whitespace(WhitespaceText::parse(text)),
            TextMethod::ZeroWidth => TextCarrier::ZeroWidth(ZeroWidthText::parse(text, &self.config)),
        }
    }

    /// Whether `text` contains either zero-width mark.
    pub fn has_marks(&self, text: &str) -> bool {
        text.chars()
            .any(|c| c == self.config.zero_mark || c == self.config.one_mark)
    }

    /// Hide `payload` in `text`, returning the new text.
    pub fn encode(&self, text: &str, payload: &[u8], method: TextMethod) -> Result<String> {
        let carrier = self.cover(text, method);
        Ok(conceal(&carrier, &self.framer, payload)?.render())
    }

    /// Recover a payload from `text`.
    ///
    /// With an explicit method, framing errors are returned unchanged. With `None`
    /// the method is auto-detected (see the module docs) and a failure under every
    /// method is reported as `UnknownEncoding`.
    pub fn decode(&self, text: &str, method: Option<TextMethod>) -> Result<Vec<u8>> {
        if let Some(method) = method {
            return reveal(&self.scan(text, method), &self.framer);
        }

        self.detect(text)
            .map(|(_, payload)| payload)
            .ok_or(StegoError::UnknownEncoding)
    }

    /// Auto-detect the method and decode, returning which method succeeded.
    ///
    /// Empty frames are not a detection; an explicit method is needed to read one.
    pub fn detect(&self, text: &str) -> Option<(TextMethod, Vec<u8>)> {
        let candidates: &[TextMethod] = if self.has_marks(text) {
            &[TextMethod::ZeroWidth, TextMethod::Whitespace]
        } else {
            &[TextMethod::Whitespace]
        };

        candidates.iter().find_map(|method| {
            reveal(&self.scan(text, *method), &self.framer)
                .ok()
                .filter(|payload| !payload.is_empty())
                .map(|payload| (*method, payload))
        })
    }
}
