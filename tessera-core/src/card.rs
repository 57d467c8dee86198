//! Business card records
//!
//! Cards are compiled into the firmware, so every field borrows from
//! static data. Empty strings and empty lists mean "not set".

use core::fmt::{self, Write};

use heapless::String;

use crate::config::ConfigError;

/// Longest line the card helpers will build
pub const MAX_LINE_LEN: usize = 48;

/// Horizontal gap between a card image and the text beside it
pub const IMAGE_GAP: u16 = 4;

/// Packed 1-bit picture shown at the left of the card page
///
/// Row-major, MSB first, rows padded to a whole byte; set bits are ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardImage<'a> {
    pub bitmap: &'a [u8],
    pub width: u16,
    pub height: u16,
}

/// One contact record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Card<'a> {
    pub given_name: &'a str,
    pub family_name: &'a str,
    pub middle_names: &'a [&'a str],
    /// Honorifics before the name, e.g. "Dr"
    pub prefixes: &'a [&'a str],
    /// Suffixes after the name, e.g. "PhD"
    pub suffixes: &'a [&'a str],
    pub nickname: &'a str,
    /// Job title
    pub position: &'a str,
    /// Organisation units, outermost first
    pub org: &'a [&'a str],
    /// Single-line postal address
    pub address: &'a str,
    pub email: &'a str,
    pub url: &'a str,
    pub tel: &'a str,
    /// Messaging URI, e.g. "xmpp:dave@example.org"
    pub impp: &'a str,
    pub gender: &'a str,
    pub notes: &'a str,
    pub image: Option<CardImage<'a>>,
}

impl<'a> Card<'a> {
    /// A card with every field unset
    pub const EMPTY: Card<'static> = Card {
        given_name: "",
        family_name: "",
        middle_names: &[],
        prefixes: &[],
        suffixes: &[],
        nickname: "",
        position: "",
        org: &[],
        address: "",
        email: "",
        url: "",
        tel: "",
        impp: "",
        gender: "",
        notes: "",
        image: None,
    };

    /// "Given Family", skipping whichever part is empty
    ///
    /// Truncated at [`MAX_LINE_LEN`].
    pub fn display_name(&self) -> String<MAX_LINE_LEN> {
        let mut out = String::new();
        let parts = [self.given_name, self.family_name];
        for part in parts.iter().filter(|p| !p.is_empty()) {
            if !out.is_empty() {
                let _ = out.push(' ');
            }
            push_truncated(&mut out, part);
        }
        out
    }

    /// Nickname wrapped in double quotes, or empty if there is none
    pub fn quoted_nickname(&self) -> String<MAX_LINE_LEN> {
        let mut out = String::new();
        if !self.nickname.is_empty() {
            let _ = write!(out, "\"{}\"", self.nickname);
        }
        out
    }

    /// Innermost organisation unit, or empty
    pub fn org_unit(&self) -> &'a str {
        self.org.last().copied().unwrap_or("")
    }

    /// How far the card text sits right of the image column
    pub fn text_indent(&self) -> u16 {
        self.image.map_or(0, |image| image.width.saturating_add(IMAGE_GAP))
    }

    /// Serialize as a vCard 4.0 text blob
    ///
    /// Lines end in `\n`; unset properties are left out.
    pub fn write_vcard<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("BEGIN:VCARD\nVERSION:4.0\n")?;

        if self.has_formatted_name() {
            out.write_str("FN:")?;
            self.write_formatted_name(out)?;
            out.write_char('\n')?;
        }

        // N is always present: family;given;middle;prefixes;suffixes
        out.write_str("N:")?;
        write_escaped(out, self.family_name, true)?;
        out.write_char(';')?;
        write_escaped(out, self.given_name, true)?;
        for list in [self.middle_names, self.prefixes, self.suffixes] {
            out.write_char(';')?;
            write_joined(out, list, ',')?;
        }
        out.write_char('\n')?;

        let props = [
            ("NICKNAME", self.nickname),
            ("GENDER", self.gender),
            ("TEL", self.tel),
            ("EMAIL", self.email),
            ("IMPP", self.impp),
            ("URL", self.url),
            ("TITLE", self.position),
        ];
        for (name, value) in props {
            write_property(out, name, value)?;
        }

        if !self.org.is_empty() {
            out.write_str("ORG:")?;
            write_joined(out, self.org, ';')?;
            out.write_char('\n')?;
        }
        if !self.address.is_empty() {
            // Free-form address goes in the street component
            out.write_str("ADR:;;")?;
            write_escaped(out, self.address, true)?;
            out.write_str(";;;;\n")?;
        }
        write_property(out, "NOTE", self.notes)?;

        out.write_str("END:VCARD\n")
    }

    fn has_formatted_name(&self) -> bool {
        !(self.prefixes.is_empty()
            && self.given_name.is_empty()
            && self.middle_names.is_empty()
            && self.family_name.is_empty()
            && self.suffixes.is_empty())
    }

    /// Prefixes, given, middle and family names, suffixes
    fn write_formatted_name<W: Write>(&self, out: &mut W) -> fmt::Result {
        let given = [self.given_name];
        let family = [self.family_name];
        let groups: [(&[&str], &str); 5] = [
            (self.prefixes, ", "),
            (&given, " "),
            (self.middle_names, " "),
            (&family, " "),
            (self.suffixes, ", "),
        ];

        let mut first = true;
        for (parts, sep) in groups {
            if parts.iter().all(|p| p.is_empty()) {
                continue;
            }
            if !first {
                out.write_char(' ')?;
            }
            first = false;
            for (i, part) in parts.iter().filter(|p| !p.is_empty()).enumerate() {
                if i > 0 {
                    write_escaped(out, sep, false)?;
                }
                write_escaped(out, part, false)?;
            }
        }
        Ok(())
    }
}

fn write_property<W: Write>(out: &mut W, name: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        return Ok(());
    }
    out.write_str(name)?;
    out.write_char(':')?;
    write_escaped(out, value, false)?;
    out.write_char('\n')
}

fn write_joined<W: Write>(out: &mut W, items: &[&str], sep: char) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_char(sep)?;
        }
        write_escaped(out, item, true)?;
    }
    Ok(())
}

/// Backslash-escape vCard specials; semicolons only inside structured values
fn write_escaped<W: Write>(out: &mut W, value: &str, structured: bool) -> fmt::Result {
    for ch in value.chars() {
        match ch {
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            ',' => out.write_str("\\,")?,
            ';' if structured => out.write_str("\\;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

fn push_truncated(out: &mut String<MAX_LINE_LEN>, s: &str) {
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
}

/// Fixed, non-empty set of cards the badge can cycle through
#[derive(Debug, Clone, Copy)]
pub struct CardStore<'a> {
    cards: &'a [Card<'a>],
}

impl<'a> CardStore<'a> {
    /// Wrap a card table
    pub fn new(cards: &'a [Card<'a>]) -> Result<Self, ConfigError> {
        if cards.is_empty() {
            return Err(ConfigError::NoCards);
        }
        Ok(Self { cards })
    }

    /// Card at `index`
    pub fn get(&self, index: usize) -> Option<&'a Card<'a>> {
        self.cards.get(index)
    }

    /// Number of cards (at least one)
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index after `index`, wrapping to the first card
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.cards.len()
    }

    /// Index before `index`, wrapping to the last card
    pub fn prev_index(&self, index: usize) -> usize {
        let len = self.cards.len();
        (index % len + len - 1) % len
    }
}
