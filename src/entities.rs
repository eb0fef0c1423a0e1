//! Character-reference decoding.
//!
//! The tokenizer feeds characters into an [`EntityDecoder`] one at a time;
//! `push` answers whether the character still extends something that can
//! become a reference. When a character is rejected the tokenizer reads the
//! result out of `get_value`/`get_pushed_input` and carries on with the
//! rejected character.

/// Named references, sorted by name so prefix ranges are contiguous.
///
/// A curated subset of the full WHATWG list: every Latin-1 reference in both
/// its semicolon and bare legacy form, Greek letters, general punctuation,
/// arrows and the common math symbols. Names that require a semicolon carry
/// it as part of the table entry.
#[rustfmt::skip]
static NAMED_REFERENCES: &[(&str, &str)] = &[
    ("AElig", "\u{c6}"),
    ("AElig;", "\u{c6}"),
    ("AMP", "&"),
    ("AMP;", "&"),
    ("Aacute", "\u{c1}"),
    ("Aacute;", "\u{c1}"),
    ("Acirc", "\u{c2}"),
    ("Acirc;", "\u{c2}"),
    ("Agrave", "\u{c0}"),
    ("Agrave;", "\u{c0}"),
    ("Alpha;", "\u{391}"),
    ("Aring", "\u{c5}"),
    ("Aring;", "\u{c5}"),
    ("Atilde", "\u{c3}"),
    ("Atilde;", "\u{c3}"),
    ("Auml", "\u{c4}"),
    ("Auml;", "\u{c4}"),
    ("Beta;", "\u{392}"),
    ("COPY", "\u{a9}"),
    ("COPY;", "\u{a9}"),
    ("Ccedil", "\u{c7}"),
    ("Ccedil;", "\u{c7}"),
    ("Chi;", "\u{3a7}"),
    ("Dagger;", "\u{2021}"),
    ("Delta;", "\u{394}"),
    ("ETH", "\u{d0}"),
    ("ETH;", "\u{d0}"),
    ("Eacute", "\u{c9}"),
    ("Eacute;", "\u{c9}"),
    ("Ecirc", "\u{ca}"),
    ("Ecirc;", "\u{ca}"),
    ("Egrave", "\u{c8}"),
    ("Egrave;", "\u{c8}"),
    ("Epsilon;", "\u{395}"),
    ("Eta;", "\u{397}"),
    ("Euml", "\u{cb}"),
    ("Euml;", "\u{cb}"),
    ("GT", ">"),
    ("GT;", ">"),
    ("Gamma;", "\u{393}"),
    ("Iacute", "\u{cd}"),
    ("Iacute;", "\u{cd}"),
    ("Icirc", "\u{ce}"),
    ("Icirc;", "\u{ce}"),
    ("Igrave", "\u{cc}"),
    ("Igrave;", "\u{cc}"),
    ("Iota;", "\u{399}"),
    ("Iuml", "\u{cf}"),
    ("Iuml;", "\u{cf}"),
    ("Kappa;", "\u{39a}"),
    ("LT", "<"),
    ("LT;", "<"),
    ("Lambda;", "\u{39b}"),
    ("Mu;", "\u{39c}"),
    ("Ntilde", "\u{d1}"),
    ("Ntilde;", "\u{d1}"),
    ("Nu;", "\u{39d}"),
    ("OElig;", "\u{152}"),
    ("Oacute", "\u{d3}"),
    ("Oacute;", "\u{d3}"),
    ("Ocirc", "\u{d4}"),
    ("Ocirc;", "\u{d4}"),
    ("Ograve", "\u{d2}"),
    ("Ograve;", "\u{d2}"),
    ("Omega;", "\u{3a9}"),
    ("Omicron;", "\u{39f}"),
    ("Oslash", "\u{d8}"),
    ("Oslash;", "\u{d8}"),
    ("Otilde", "\u{d5}"),
    ("Otilde;", "\u{d5}"),
    ("Ouml", "\u{d6}"),
    ("Ouml;", "\u{d6}"),
    ("Phi;", "\u{3a6}"),
    ("Pi;", "\u{3a0}"),
    ("Prime;", "\u{2033}"),
    ("Psi;", "\u{3a8}"),
    ("QUOT", "\""),
    ("QUOT;", "\""),
    ("REG", "\u{ae}"),
    ("REG;", "\u{ae}"),
    ("Rho;", "\u{3a1}"),
    ("Scaron;", "\u{160}"),
    ("Sigma;", "\u{3a3}"),
    ("THORN", "\u{de}"),
    ("THORN;", "\u{de}"),
    ("Tau;", "\u{3a4}"),
    ("Theta;", "\u{398}"),
    ("Uacute", "\u{da}"),
    ("Uacute;", "\u{da}"),
    ("Ucirc", "\u{db}"),
    ("Ucirc;", "\u{db}"),
    ("Ugrave", "\u{d9}"),
    ("Ugrave;", "\u{d9}"),
    ("Upsilon;", "\u{3a5}"),
    ("Uuml", "\u{dc}"),
    ("Uuml;", "\u{dc}"),
    ("Xi;", "\u{39e}"),
    ("Yacute", "\u{dd}"),
    ("Yacute;", "\u{dd}"),
    ("Yuml;", "\u{178}"),
    ("Zeta;", "\u{396}"),
    ("aacute", "\u{e1}"),
    ("aacute;", "\u{e1}"),
    ("acirc", "\u{e2}"),
    ("acirc;", "\u{e2}"),
    ("acute", "\u{b4}"),
    ("acute;", "\u{b4}"),
    ("aelig", "\u{e6}"),
    ("aelig;", "\u{e6}"),
    ("agrave", "\u{e0}"),
    ("agrave;", "\u{e0}"),
    ("alefsym;", "\u{2135}"),
    ("alpha;", "\u{3b1}"),
    ("amp", "&"),
    ("amp;", "&"),
    ("and;", "\u{2227}"),
    ("ang;", "\u{2220}"),
    ("apos;", "'"),
    ("aring", "\u{e5}"),
    ("aring;", "\u{e5}"),
    ("asymp;", "\u{2248}"),
    ("atilde", "\u{e3}"),
    ("atilde;", "\u{e3}"),
    ("auml", "\u{e4}"),
    ("auml;", "\u{e4}"),
    ("bdquo;", "\u{201e}"),
    ("beta;", "\u{3b2}"),
    ("brvbar", "\u{a6}"),
    ("brvbar;", "\u{a6}"),
    ("bull;", "\u{2022}"),
    ("cap;", "\u{2229}"),
    ("ccedil", "\u{e7}"),
    ("ccedil;", "\u{e7}"),
    ("cedil", "\u{b8}"),
    ("cedil;", "\u{b8}"),
    ("cent", "\u{a2}"),
    ("cent;", "\u{a2}"),
    ("chi;", "\u{3c7}"),
    ("circ;", "\u{2c6}"),
    ("clubs;", "\u{2663}"),
    ("cong;", "\u{2245}"),
    ("copy", "\u{a9}"),
    ("copy;", "\u{a9}"),
    ("crarr;", "\u{21b5}"),
    ("cup;", "\u{222a}"),
    ("curren", "\u{a4}"),
    ("curren;", "\u{a4}"),
    ("dArr;", "\u{21d3}"),
    ("dagger;", "\u{2020}"),
    ("darr;", "\u{2193}"),
    ("deg", "\u{b0}"),
    ("deg;", "\u{b0}"),
    ("delta;", "\u{3b4}"),
    ("diams;", "\u{2666}"),
    ("divide", "\u{f7}"),
    ("divide;", "\u{f7}"),
    ("eacute", "\u{e9}"),
    ("eacute;", "\u{e9}"),
    ("ecirc", "\u{ea}"),
    ("ecirc;", "\u{ea}"),
    ("egrave", "\u{e8}"),
    ("egrave;", "\u{e8}"),
    ("empty;", "\u{2205}"),
    ("emsp;", "\u{2003}"),
    ("ensp;", "\u{2002}"),
    ("epsilon;", "\u{3b5}"),
    ("equiv;", "\u{2261}"),
    ("eta;", "\u{3b7}"),
    ("eth", "\u{f0}"),
    ("eth;", "\u{f0}"),
    ("euml", "\u{eb}"),
    ("euml;", "\u{eb}"),
    ("euro;", "\u{20ac}"),
    ("exist;", "\u{2203}"),
    ("fnof;", "\u{192}"),
    ("forall;", "\u{2200}"),
    ("frac12", "\u{bd}"),
    ("frac12;", "\u{bd}"),
    ("frac14", "\u{bc}"),
    ("frac14;", "\u{bc}"),
    ("frac34", "\u{be}"),
    ("frac34;", "\u{be}"),
    ("frasl;", "\u{2044}"),
    ("gamma;", "\u{3b3}"),
    ("ge;", "\u{2265}"),
    ("gt", ">"),
    ("gt;", ">"),
    ("hArr;", "\u{21d4}"),
    ("harr;", "\u{2194}"),
    ("hearts;", "\u{2665}"),
    ("hellip;", "\u{2026}"),
    ("iacute", "\u{ed}"),
    ("iacute;", "\u{ed}"),
    ("icirc", "\u{ee}"),
    ("icirc;", "\u{ee}"),
    ("iexcl", "\u{a1}"),
    ("iexcl;", "\u{a1}"),
    ("igrave", "\u{ec}"),
    ("igrave;", "\u{ec}"),
    ("image;", "\u{2111}"),
    ("infin;", "\u{221e}"),
    ("int;", "\u{222b}"),
    ("iota;", "\u{3b9}"),
    ("iquest", "\u{bf}"),
    ("iquest;", "\u{bf}"),
    ("isin;", "\u{2208}"),
    ("iuml", "\u{ef}"),
    ("iuml;", "\u{ef}"),
    ("kappa;", "\u{3ba}"),
    ("lArr;", "\u{21d0}"),
    ("lambda;", "\u{3bb}"),
    ("lang;", "\u{27e8}"),
    ("laquo", "\u{ab}"),
    ("laquo;", "\u{ab}"),
    ("larr;", "\u{2190}"),
    ("lceil;", "\u{2308}"),
    ("ldquo;", "\u{201c}"),
    ("le;", "\u{2264}"),
    ("lfloor;", "\u{230a}"),
    ("lowast;", "\u{2217}"),
    ("loz;", "\u{25ca}"),
    ("lrm;", "\u{200e}"),
    ("lsaquo;", "\u{2039}"),
    ("lsquo;", "\u{2018}"),
    ("lt", "<"),
    ("lt;", "<"),
    ("macr", "\u{af}"),
    ("macr;", "\u{af}"),
    ("mdash;", "\u{2014}"),
    ("micro", "\u{b5}"),
    ("micro;", "\u{b5}"),
    ("middot", "\u{b7}"),
    ("middot;", "\u{b7}"),
    ("minus;", "\u{2212}"),
    ("mu;", "\u{3bc}"),
    ("nabla;", "\u{2207}"),
    ("nbsp", "\u{a0}"),
    ("nbsp;", "\u{a0}"),
    ("ndash;", "\u{2013}"),
    ("ne;", "\u{2260}"),
    ("ni;", "\u{220b}"),
    ("not", "\u{ac}"),
    ("not;", "\u{ac}"),
    ("notin;", "\u{2209}"),
    ("nsub;", "\u{2284}"),
    ("ntilde", "\u{f1}"),
    ("ntilde;", "\u{f1}"),
    ("nu;", "\u{3bd}"),
    ("oacute", "\u{f3}"),
    ("oacute;", "\u{f3}"),
    ("ocirc", "\u{f4}"),
    ("ocirc;", "\u{f4}"),
    ("oelig;", "\u{153}"),
    ("ograve", "\u{f2}"),
    ("ograve;", "\u{f2}"),
    ("oline;", "\u{203e}"),
    ("omega;", "\u{3c9}"),
    ("omicron;", "\u{3bf}"),
    ("oplus;", "\u{2295}"),
    ("or;", "\u{2228}"),
    ("ordf", "\u{aa}"),
    ("ordf;", "\u{aa}"),
    ("ordm", "\u{ba}"),
    ("ordm;", "\u{ba}"),
    ("oslash", "\u{f8}"),
    ("oslash;", "\u{f8}"),
    ("otilde", "\u{f5}"),
    ("otilde;", "\u{f5}"),
    ("otimes;", "\u{2297}"),
    ("ouml", "\u{f6}"),
    ("ouml;", "\u{f6}"),
    ("para", "\u{b6}"),
    ("para;", "\u{b6}"),
    ("part;", "\u{2202}"),
    ("permil;", "\u{2030}"),
    ("perp;", "\u{22a5}"),
    ("phi;", "\u{3c6}"),
    ("pi;", "\u{3c0}"),
    ("piv;", "\u{3d6}"),
    ("plusmn", "\u{b1}"),
    ("plusmn;", "\u{b1}"),
    ("pound", "\u{a3}"),
    ("pound;", "\u{a3}"),
    ("prime;", "\u{2032}"),
    ("prod;", "\u{220f}"),
    ("prop;", "\u{221d}"),
    ("psi;", "\u{3c8}"),
    ("quot", "\""),
    ("quot;", "\""),
    ("rArr;", "\u{21d2}"),
    ("radic;", "\u{221a}"),
    ("rang;", "\u{27e9}"),
    ("raquo", "\u{bb}"),
    ("raquo;", "\u{bb}"),
    ("rarr;", "\u{2192}"),
    ("rceil;", "\u{2309}"),
    ("rdquo;", "\u{201d}"),
    ("real;", "\u{211c}"),
    ("reg", "\u{ae}"),
    ("reg;", "\u{ae}"),
    ("rfloor;", "\u{230b}"),
    ("rho;", "\u{3c1}"),
    ("rlm;", "\u{200f}"),
    ("rsaquo;", "\u{203a}"),
    ("rsquo;", "\u{2019}"),
    ("sbquo;", "\u{201a}"),
    ("scaron;", "\u{161}"),
    ("sdot;", "\u{22c5}"),
    ("sect", "\u{a7}"),
    ("sect;", "\u{a7}"),
    ("shy", "\u{ad}"),
    ("shy;", "\u{ad}"),
    ("sigma;", "\u{3c3}"),
    ("sigmaf;", "\u{3c2}"),
    ("sim;", "\u{223c}"),
    ("spades;", "\u{2660}"),
    ("sub;", "\u{2282}"),
    ("sube;", "\u{2286}"),
    ("sum;", "\u{2211}"),
    ("sup1", "\u{b9}"),
    ("sup1;", "\u{b9}"),
    ("sup2", "\u{b2}"),
    ("sup2;", "\u{b2}"),
    ("sup3", "\u{b3}"),
    ("sup3;", "\u{b3}"),
    ("sup;", "\u{2283}"),
    ("supe;", "\u{2287}"),
    ("szlig", "\u{df}"),
    ("szlig;", "\u{df}"),
    ("tau;", "\u{3c4}"),
    ("there4;", "\u{2234}"),
    ("theta;", "\u{3b8}"),
    ("thetasym;", "\u{3d1}"),
    ("thinsp;", "\u{2009}"),
    ("thorn", "\u{fe}"),
    ("thorn;", "\u{fe}"),
    ("tilde;", "\u{2dc}"),
    ("times", "\u{d7}"),
    ("times;", "\u{d7}"),
    ("trade;", "\u{2122}"),
    ("uArr;", "\u{21d1}"),
    ("uacute", "\u{fa}"),
    ("uacute;", "\u{fa}"),
    ("uarr;", "\u{2191}"),
    ("ucirc", "\u{fb}"),
    ("ucirc;", "\u{fb}"),
    ("ugrave", "\u{f9}"),
    ("ugrave;", "\u{f9}"),
    ("uml", "\u{a8}"),
    ("uml;", "\u{a8}"),
    ("upsih;", "\u{3d2}"),
    ("upsilon;", "\u{3c5}"),
    ("uuml", "\u{fc}"),
    ("uuml;", "\u{fc}"),
    ("weierp;", "\u{2118}"),
    ("xi;", "\u{3be}"),
    ("yacute", "\u{fd}"),
    ("yacute;", "\u{fd}"),
    ("yen", "\u{a5}"),
    ("yen;", "\u{a5}"),
    ("yuml", "\u{ff}"),
    ("yuml;", "\u{ff}"),
    ("zeta;", "\u{3b6}"),
    ("zwj;", "\u{200d}"),
    ("zwnj;", "\u{200c}"),
];

#[derive(Debug, Clone, Copy)]
struct NamedMatch {
    /// Length of `pushed` (including the leading `&`) at the match.
    end: usize,
    value: &'static str,
    semicolon: bool,
}

#[derive(Debug, Default)]
enum DecoderState {
    /// Nothing pushed yet; expects the leading `&`.
    #[default]
    Start,
    /// Only the `&` pushed.
    Ampersand,
    /// Walking the named-reference table. `lo..hi` is the range of entries
    /// whose names start with everything pushed so far.
    Named {
        lo: usize,
        hi: usize,
        best: Option<NamedMatch>,
    },
    /// `&#` (and possibly `x`/`X`) pushed, no digits yet.
    NumericStart { hex: bool },
    /// At least one digit of a numeric reference pushed.
    Numeric {
        hex: bool,
        code: u32,
        terminated: bool,
    },
}

/// A stateful longest-prefix matcher over character references.
///
/// `push` accepts characters while they extend a potentially valid reference;
/// the first rejected character is not part of the reference and stays with
/// the caller. `get_value` resolves the longest match recorded along the way,
/// re-appending any pushed characters past it, and falls back to the raw
/// pushed input when nothing matched.
#[derive(Debug, Default)]
pub struct EntityDecoder {
    pushed: String,
    state: DecoderState,
}

impl EntityDecoder {
    /// Feed one character. Returns `true` iff the character was accepted as
    /// part of a possible reference; a rejected character must be handled by
    /// the caller.
    pub fn push(&mut self, c: char) -> bool {
        match self.state {
            DecoderState::Start => {
                debug_assert_eq!(c, '&');
                self.pushed.push(c);
                self.state = DecoderState::Ampersand;
                true
            }
            DecoderState::Ampersand => {
                if c == '#' {
                    self.pushed.push(c);
                    self.state = DecoderState::NumericStart { hex: false };
                    true
                } else {
                    self.descend(c)
                }
            }
            DecoderState::Named { .. } => self.descend(c),
            DecoderState::NumericStart { hex } => {
                if !hex && matches!(c, 'x' | 'X') && self.pushed.len() == 2 {
                    self.pushed.push(c);
                    self.state = DecoderState::NumericStart { hex: true };
                    true
                } else if let Some(digit) = c.to_digit(if hex { 16 } else { 10 }) {
                    self.pushed.push(c);
                    self.state = DecoderState::Numeric {
                        hex,
                        code: digit,
                        terminated: false,
                    };
                    true
                } else {
                    false
                }
            }
            DecoderState::Numeric {
                terminated: true, ..
            } => false,
            DecoderState::Numeric {
                hex,
                code,
                terminated: false,
            } => {
                if c == ';' {
                    self.pushed.push(c);
                    self.state = DecoderState::Numeric {
                        hex,
                        code,
                        terminated: true,
                    };
                    true
                } else if let Some(digit) = c.to_digit(if hex { 16 } else { 10 }) {
                    let base = if hex { 16 } else { 10 };
                    // saturate out-of-range codes at 0x110000 so they decode
                    // to U+FFFD later
                    let code = code
                        .checked_mul(base)
                        .and_then(|code| code.checked_add(digit))
                        .map_or(0x110000, |code| code.min(0x110000));
                    self.pushed.push(c);
                    self.state = DecoderState::Numeric {
                        hex,
                        code,
                        terminated: false,
                    };
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Narrow the named-reference range by one more character.
    fn descend(&mut self, c: char) -> bool {
        if !c.is_ascii() {
            return false;
        }

        let b = c as u8;
        let depth = self.pushed.len() - 1;
        let (lo0, hi0) = match self.state {
            DecoderState::Ampersand => (0, NAMED_REFERENCES.len()),
            DecoderState::Named { lo, hi, .. } => (lo, hi),
            _ => unreachable!(),
        };

        // entries shorter than the new depth sort first within the range and
        // fall out of it here; the longest of them is already recorded below
        let slice = &NAMED_REFERENCES[lo0..hi0];
        let lo = lo0
            + slice.partition_point(|&(name, _)| {
                name.as_bytes().get(depth).map_or(true, |&x| x < b)
            });
        let hi = lo0
            + slice.partition_point(|&(name, _)| {
                name.as_bytes().get(depth).map_or(true, |&x| x <= b)
            });

        if lo == hi {
            return false;
        }

        self.pushed.push(c);

        let mut best = match self.state {
            DecoderState::Named { best, .. } => best,
            _ => None,
        };
        if NAMED_REFERENCES[lo].0.len() == depth + 1 {
            best = Some(NamedMatch {
                end: self.pushed.len(),
                value: NAMED_REFERENCES[lo].1,
                semicolon: b == b';',
            });
        }

        self.state = DecoderState::Named { lo, hi, best };
        true
    }

    /// The expansion of the longest reference matched so far, with any pushed
    /// characters past the match re-appended. Falls back to the raw pushed
    /// input when nothing matched.
    #[must_use]
    pub fn get_value(&self) -> String {
        match self.state {
            DecoderState::Named {
                best: Some(matched),
                ..
            } => {
                let mut value = String::from(matched.value);
                value.push_str(&self.pushed[matched.end..]);
                value
            }
            DecoderState::Numeric { code, .. } => decode_numeric(code).to_string(),
            _ => self.pushed.clone(),
        }
    }

    /// Everything that was accepted by `push`, including the leading `&`.
    #[must_use]
    pub fn get_pushed_input(&self) -> &str {
        &self.pushed
    }

    /// Whether the matched reference was closed by a semicolon. Decides
    /// whether the legacy leave-alone rule applies in attribute values.
    #[must_use]
    pub fn is_semicolon_terminated(&self) -> bool {
        match self.state {
            DecoderState::Named {
                best: Some(matched),
                ..
            } => matched.semicolon,
            DecoderState::Numeric { terminated, .. } => terminated,
            _ => false,
        }
    }

    /// Clear all state for the next reference.
    pub fn reset(&mut self) {
        self.pushed.clear();
        self.state = DecoderState::Start;
    }
}

/// Map a numeric reference code to the character it stands for.
fn decode_numeric(code: u32) -> char {
    let code = match code {
        0x00 => 0xfffd,
        0x110000.. => 0xfffd,
        0xd800..=0xdfff => 0xfffd,
        0x80 => 0x20ac, // EURO SIGN
        0x82 => 0x201a, // SINGLE LOW-9 QUOTATION MARK
        0x83 => 0x0192, // LATIN SMALL LETTER F WITH HOOK
        0x84 => 0x201e, // DOUBLE LOW-9 QUOTATION MARK
        0x85 => 0x2026, // HORIZONTAL ELLIPSIS
        0x86 => 0x2020, // DAGGER
        0x87 => 0x2021, // DOUBLE DAGGER
        0x88 => 0x02c6, // MODIFIER LETTER CIRCUMFLEX ACCENT
        0x89 => 0x2030, // PER MILLE SIGN
        0x8a => 0x0160, // LATIN CAPITAL LETTER S WITH CARON
        0x8b => 0x2039, // SINGLE LEFT-POINTING ANGLE QUOTATION MARK
        0x8c => 0x0152, // LATIN CAPITAL LIGATURE OE
        0x8e => 0x017d, // LATIN CAPITAL LETTER Z WITH CARON
        0x91 => 0x2018, // LEFT SINGLE QUOTATION MARK
        0x92 => 0x2019, // RIGHT SINGLE QUOTATION MARK
        0x93 => 0x201c, // LEFT DOUBLE QUOTATION MARK
        0x94 => 0x201d, // RIGHT DOUBLE QUOTATION MARK
        0x95 => 0x2022, // BULLET
        0x96 => 0x2013, // EN DASH
        0x97 => 0x2014, // EM DASH
        0x98 => 0x02dc, // SMALL TILDE
        0x99 => 0x2122, // TRADE MARK SIGN
        0x9a => 0x0161, // LATIN SMALL LETTER S WITH CARON
        0x9b => 0x203a, // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
        0x9c => 0x0153, // LATIN SMALL LIGATURE OE
        0x9e => 0x017e, // LATIN SMALL LETTER Z WITH CARON
        0x9f => 0x0178, // LATIN CAPITAL LETTER Y WITH DIAERESIS
        other => other,
    };

    char::from_u32(code).unwrap_or('\u{fffd}')
}

#[cfg(test)]
mod tests {
    use super::EntityDecoder;

    /// Push `input` the way the tokenizer does and return the value plus the
    /// first rejected character, if any.
    fn decode(input: &str) -> (String, Option<char>) {
        let mut decoder = EntityDecoder::default();
        for (i, c) in input.chars().enumerate() {
            if !decoder.push(c) {
                debug_assert!(i > 0);
                return (decoder.get_value(), Some(c));
            }
        }
        (decoder.get_value(), None)
    }

    #[test]
    fn named_with_semicolon() {
        assert_eq!(decode("&amp;"), ("&".to_string(), None));
        assert_eq!(decode("&notin;"), ("\u{2209}".to_string(), None));
        assert_eq!(decode("&amp;x"), ("&".to_string(), Some('x')));
    }

    #[test]
    fn named_legacy_without_semicolon() {
        assert_eq!(decode("&amp"), ("&".to_string(), None));
        assert_eq!(decode("&ampx"), ("&".to_string(), Some('x')));
        assert_eq!(decode("&copy "), ("\u{a9}".to_string(), Some(' ')));
    }

    #[test]
    fn longest_match_replays_the_tail() {
        // "notin" without the semicolon is not a reference; the match falls
        // back to "not" and replays "in"
        assert_eq!(decode("&notin "), ("\u{ac}in".to_string(), Some(' ')));
        assert_eq!(decode("&notit"), ("\u{ac}i".to_string(), Some('t')));
    }

    #[test]
    fn unknown_reference_returns_raw_input() {
        assert_eq!(decode("&xyz;"), ("&x".to_string(), Some('y')));
        assert_eq!(decode("&;"), ("&".to_string(), Some(';')));
    }

    #[test]
    fn numeric_references() {
        assert_eq!(decode("&#65;"), ("A".to_string(), None));
        assert_eq!(decode("&#x41;"), ("A".to_string(), None));
        assert_eq!(decode("&#X41;"), ("A".to_string(), None));
        assert_eq!(decode("&#65z"), ("A".to_string(), Some('z')));
        assert_eq!(decode("&#000065;"), ("A".to_string(), None));
    }

    #[test]
    fn numeric_error_ranges() {
        assert_eq!(decode("&#0;"), ("\u{fffd}".to_string(), None));
        assert_eq!(decode("&#xD800;"), ("\u{fffd}".to_string(), None));
        assert_eq!(decode("&#x110000;"), ("\u{fffd}".to_string(), None));
        assert_eq!(decode("&#99999999999;"), ("\u{fffd}".to_string(), None));
        // windows-1252 remapping
        assert_eq!(decode("&#x80;"), ("\u{20ac}".to_string(), None));
        assert_eq!(decode("&#153;"), ("\u{2122}".to_string(), None));
    }

    #[test]
    fn malformed_numeric_returns_raw_input() {
        assert_eq!(decode("&#;"), ("&#".to_string(), Some(';')));
        assert_eq!(decode("&#xg"), ("&#x".to_string(), Some('g')));
    }

    #[test]
    fn semicolon_termination_flag() {
        let mut decoder = EntityDecoder::default();
        for c in "&amp;".chars() {
            assert!(decoder.push(c));
        }
        assert!(decoder.is_semicolon_terminated());

        decoder.reset();
        for c in "&amp".chars() {
            assert!(decoder.push(c));
        }
        assert!(!decoder.is_semicolon_terminated());
    }

    #[test]
    fn pushed_input_keeps_the_ampersand() {
        let mut decoder = EntityDecoder::default();
        for c in "&amp".chars() {
            assert!(decoder.push(c));
        }
        assert!(!decoder.push(' '));
        assert_eq!(decoder.get_pushed_input(), "&amp");
    }
}
