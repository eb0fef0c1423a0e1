use std::io::{self, BufRead, BufReader, Read};

use crate::Never;

/// An object that provides characters to the tokenizer.
///
/// See [`crate::Tokenizer::new`] for more information.
pub trait Reader {
    /// The error returned by this reader.
    type Error: std::error::Error;

    /// Return the next character from the input stream, or `None` at the end
    /// of input.
    ///
    /// The input stream is not preprocessed in any way: carriage returns,
    /// null characters and other oddities are handed to the tokenizer as-is.
    fn read_char(&mut self) -> Result<Option<char>, Self::Error>;
}

/// An object that can be converted into a [`Reader`].
///
/// For example, any utf8-string can be converted into a [`StringReader`],
/// such that `Tokenizer::new("mystring")` and
/// `Tokenizer::new(&String::from("foo"))` work.
pub trait Readable<'a> {
    /// The reader type to which this type should be converted.
    type Reader: Reader + 'a;

    /// Convert self to some sort of reader.
    fn to_reader(self) -> Self::Reader;
}

impl<'a, R: 'a + Reader> Readable<'a> for R {
    type Reader = Self;

    fn to_reader(self) -> Self::Reader {
        self
    }
}

/// A reader over in-memory strings. Used by the tokenizer to read HTML from
/// `&str` and `&String`.
///
/// Example:
///
/// ```rust
/// use html5pull::{Token, Tokenizer};
///
/// let mut text = String::new();
///
/// for token in Tokenizer::new("<title>hello world</title>").infallible() {
///     if let Token::Data { text: data, .. } = token {
///         text.push_str(&data);
///     }
/// }
///
/// assert_eq!(text, "hello world");
/// ```
#[derive(Debug)]
pub struct StringReader<'a> {
    cursor: std::str::Chars<'a>,
}

impl<'a> StringReader<'a> {
    fn new(input: &'a str) -> Self {
        StringReader {
            cursor: input.chars(),
        }
    }
}

impl<'a> Reader for StringReader<'a> {
    type Error = Never;

    fn read_char(&mut self) -> Result<Option<char>, Self::Error> {
        Ok(self.cursor.next())
    }
}

impl<'a> Readable<'a> for &'a str {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self)
    }
}

impl<'a> Readable<'a> for &'a String {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self.as_str())
    }
}

/// A [`BufReadReader`] can be used to construct a tokenizer from any type
/// that implements `BufRead`, without buffering the entire document first.
///
/// Example:
///
/// ```rust
/// use std::io::BufReader;
/// use html5pull::{Token, Tokenizer};
///
/// let tokenizer = Tokenizer::new(BufReader::new("<p>hello</p>".as_bytes()));
///
/// let mut text = String::new();
///
/// for token in tokenizer {
///     if let Token::Data { text: data, .. } = token.unwrap() {
///         text.push_str(&data);
///     }
/// }
///
/// assert_eq!(text, "hello");
/// ```
#[derive(Debug)]
pub struct BufReadReader<R: BufRead> {
    line: String,
    line_pos: usize,
    reader: R,
}

impl<R: BufRead> BufReadReader<R> {
    /// Construct a new `BufReadReader` from any type that implements
    /// `BufRead`.
    pub fn new(reader: R) -> Self {
        BufReadReader {
            line: String::new(),
            line_pos: 0,
            reader,
        }
    }
}

impl<R: BufRead> Reader for BufReadReader<R> {
    type Error = io::Error;

    fn read_char(&mut self) -> Result<Option<char>, Self::Error> {
        if self.line_pos >= self.line.len() {
            self.line.clear();
            self.line_pos = 0;
            self.reader.read_line(&mut self.line)?;
        }

        let rv = self.line[self.line_pos..].chars().next();
        self.line_pos += rv.map(char::len_utf8).unwrap_or(1);
        Ok(rv)
    }
}

impl<'a, R: Read + 'a> Readable<'a> for BufReader<R> {
    type Reader = BufReadReader<BufReader<R>>;

    fn to_reader(self) -> Self::Reader {
        BufReadReader::new(self)
    }
}
