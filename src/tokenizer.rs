use std::mem;

use crate::entities::EntityDecoder;
use crate::machine;
use crate::names::{AttrId, Namespace, TagId};
use crate::read_helper::ReadHelper;
use crate::utils::ControlToken;
use crate::{Attribute, DefaultEmitter, Doctype, Emitter, Readable, Reader, State, Tag};

/// A streaming HTML tokenizer. See crate-level docs for basic usage.
///
/// The tokenizer is single-use over one input: once it has reached
/// [`State::EndOfFile`] it only ever reports that the stream is finished.
pub struct Tokenizer<R: Reader, E: Emitter = DefaultEmitter> {
    pub(crate) reader: ReadHelper<R>,
    pub(crate) emitter: E,
    pub(crate) state: State,
    pub(crate) decode_character_references: bool,

    /// Mirror of everything consumed since the last emit. Doubles as the
    /// pending character-data accumulator: in text states entities decode
    /// into it, in markup states the raw characters pile up so they can be
    /// replayed as character data when the construct dies at end of input.
    pub(crate) data: String,
    /// The current lexeme: a tag name, attribute name or value, doctype
    /// name or identifier, comment body, or an end-tag candidate inside the
    /// raw-text modes.
    pub(crate) name: String,
    pub(crate) tag: Option<Tag>,
    pub(crate) doctype: Option<Doctype>,
    pub(crate) entity: EntityDecoder,
    /// The active quote character, `'\0'` while unquoted.
    pub(crate) quote: char,
    /// The start tag that switched into RCDATA/RAWTEXT/ScriptData; end-tag
    /// candidates are matched against it.
    pub(crate) active_tag_name: String,
    /// Sliding window for spotting `]]>`.
    pub(crate) cdata: [char; 3],
    pub(crate) cdata_index: usize,
    pub(crate) namespace: Namespace,
    /// Second token of a step that finished two at once, e.g. the script
    /// end tag behind the flushed script body.
    pub(crate) deferred: Option<E::Token>,
}

impl<R: Reader> Tokenizer<R> {
    /// Create a new tokenizer from some input.
    ///
    /// `input` can be `&str`, `&String` or a `BufReader`, as those are the
    /// types for which [`Readable`] is implemented, but you can implement
    /// that trait on your own types.
    pub fn new<'a, S: Readable<'a, Reader = R>>(input: S) -> Self {
        Tokenizer::<S::Reader>::new_with_emitter(input, DefaultEmitter)
    }
}

impl<R: Reader, E: Emitter> Tokenizer<R, E> {
    /// Construct a new tokenizer from some input and a custom token
    /// factory.
    ///
    /// Use this method over [`Tokenizer::new`] when you want to control the
    /// type of tokens the tokenizer yields.
    pub fn new_with_emitter<'a, S: Readable<'a, Reader = R>>(input: S, emitter: E) -> Self {
        Tokenizer {
            reader: ReadHelper::new(input.to_reader()),
            emitter,
            state: State::Data,
            decode_character_references: true,
            data: String::new(),
            name: String::new(),
            tag: None,
            doctype: None,
            entity: EntityDecoder::default(),
            quote: '\0',
            active_tag_name: String::new(),
            cdata: ['\0'; 3],
            cdata_index: 0,
            namespace: Namespace::default(),
            deferred: None,
        }
    }

    /// Whether `&`-references in data and RCDATA content are resolved.
    ///
    /// The default is on. References in attribute values are decoded either
    /// way.
    pub fn set_decode_character_references(&mut self, yes: bool) {
        self.decode_character_references = yes;
    }

    /// The state the machine currently sits in.
    pub fn state(&self) -> State {
        self.state
    }

    /// The document namespace, as detected from the `xmlns` attribute of an
    /// emitted `<html>` start tag.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The line just past the last consumed character, starting at 1.
    pub fn line_number(&self) -> u64 {
        self.reader.line()
    }

    /// The column just past the last consumed character, starting at 1 and
    /// resetting to 1 after every newline.
    pub fn line_position(&self) -> u64 {
        self.reader.column()
    }

    /// Pull the next token out of the input.
    ///
    /// Returns `Ok(None)` once the input is exhausted; every call after
    /// that keeps returning `Ok(None)`.
    pub fn read_next_token(&mut self) -> Result<Option<E::Token>, R::Error> {
        if let Some(token) = self.deferred.take() {
            return Ok(Some(token));
        }

        loop {
            match machine::consume(self)? {
                ControlToken::Continue => (),
                ControlToken::Emit(token) => {
                    debug_assert!(self.data.is_empty());
                    return Ok(Some(token));
                }
                ControlToken::Done => return Ok(None),
            }
        }
    }

    pub(crate) fn switch_to(&mut self, state: State) {
        log::trace!("state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Flush the pending character data, if any.
    pub(crate) fn flush_data(&mut self, encode_entities: bool) -> Option<E::Token> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.emitter.data(mem::take(&mut self.data), encode_entities))
        }
    }

    /// Flush the pending script data, if any.
    pub(crate) fn flush_script_data(&mut self) -> Option<E::Token> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.emitter.script_data(mem::take(&mut self.data)))
        }
    }

    /// Replay the raw input consumed since the last emit as character data,
    /// dropping whatever half-built construct it belonged to.
    pub(crate) fn flush_raw(&mut self) -> Option<E::Token> {
        self.tag = None;
        self.doctype = None;
        self.name.clear();
        self.flush_data(false)
    }

    /// Append characters of the character-reference outcome to the buffers
    /// they belong to.
    pub(crate) fn append_reference(&mut self, text: &str, in_attribute: bool) {
        self.data.push_str(text);
        if in_attribute {
            self.name.push_str(text);
        }
    }

    /// Finish the tag name lexeme.
    pub(crate) fn seal_tag_name(&mut self) {
        let name = mem::take(&mut self.name);
        let tag = self.tag.as_mut().unwrap();
        tag.id = TagId::from_name(&name);
        tag.name = name;
    }

    /// Finish the attribute name lexeme and append the attribute to the
    /// pending tag. Duplicates pass through untouched.
    pub(crate) fn seal_attribute(&mut self) {
        let name = mem::take(&mut self.name);
        let attribute = Attribute {
            id: AttrId::from_name(&name),
            name,
            value: None,
        };
        self.tag.as_mut().unwrap().attributes.push(attribute);
    }

    /// Assign the value lexeme to the attribute it belongs to.
    pub(crate) fn seal_attribute_value(&mut self) {
        let value = mem::take(&mut self.name);
        let attribute = self.tag.as_mut().unwrap().attributes.last_mut().unwrap();
        attribute.value = Some(value);
    }

    /// Turn the end-tag candidate in `name` into the pending tag, cutting
    /// the matching `</name` characters out of the replay buffer.
    pub(crate) fn begin_raw_end_tag(&mut self) {
        let cut = self.data.len() - (self.name.len() + 2);
        self.data.truncate(cut);
        let name = mem::take(&mut self.name);
        self.tag = Some(Tag::new(name, true));
    }

    /// Mark the pending doctype as malformed.
    pub(crate) fn set_force_quirks(&mut self) {
        self.doctype.as_mut().unwrap().force_quirks = true;
    }

    /// Emit the pending tag and pick the content model the emitted tag
    /// switches into.
    pub(crate) fn emit_tag(&mut self) -> E::Token {
        self.data.clear();
        let tag = self.tag.take().unwrap();

        let next = if tag.is_end_tag || tag.is_empty_element {
            State::Data
        } else {
            match tag.id {
                TagId::Style
                | TagId::Xmp
                | TagId::Iframe
                | TagId::Noembed
                | TagId::Noframes
                | TagId::Noscript => {
                    self.active_tag_name.clone_from(&tag.name);
                    State::RawText
                }
                TagId::Title | TagId::Textarea => {
                    self.active_tag_name.clone_from(&tag.name);
                    State::RcData
                }
                TagId::Script => {
                    self.active_tag_name.clone_from(&tag.name);
                    State::ScriptData
                }
                TagId::Plaintext => State::PlainText,
                TagId::Html => {
                    for attribute in &tag.attributes {
                        if attribute.id != AttrId::Xmlns {
                            continue;
                        }
                        let uri = match &attribute.value {
                            Some(uri) => uri,
                            None => continue,
                        };
                        if let Some(namespace) = Namespace::from_uri(uri) {
                            self.namespace = namespace;
                        }
                    }
                    State::Data
                }
                _ => State::Data,
            }
        };

        self.switch_to(next);
        self.emitter.tag(tag)
    }

    /// Emit the pending comment, whose body sits in `name`.
    pub(crate) fn emit_comment(&mut self) -> E::Token {
        self.data.clear();
        self.emitter.comment(mem::take(&mut self.name))
    }

    /// Emit the pending doctype.
    pub(crate) fn emit_doctype(&mut self, force_quirks: bool) -> E::Token {
        self.data.clear();
        let mut doctype = self.doctype.take().unwrap();
        doctype.force_quirks |= force_quirks;
        self.emitter.doctype(doctype)
    }

    /// Emit the accumulated CDATA section content.
    pub(crate) fn emit_cdata(&mut self) -> E::Token {
        self.emitter.cdata(mem::take(&mut self.data))
    }
}

impl<R: Reader, E: Emitter> Iterator for Tokenizer<R, E> {
    type Item = Result<E::Token, R::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next_token().transpose()
    }
}

/// A kind of tokenizer that directly yields tokens when used as an iterator,
/// so `Token` instead of `Result<Token, _>`.
///
/// This is the return value of [`Tokenizer::infallible`].
pub struct InfallibleTokenizer<R: Reader<Error = crate::Never>, E: Emitter>(Tokenizer<R, E>);

impl<R: Reader<Error = crate::Never>, E: Emitter> Tokenizer<R, E> {
    /// Statically assert that this iterator is infallible.
    ///
    /// Call this to get rid of error handling when parsing HTML from
    /// strings.
    pub fn infallible(self) -> InfallibleTokenizer<R, E> {
        InfallibleTokenizer(self)
    }
}

impl<R: Reader<Error = crate::Never>, E: Emitter> Iterator for InfallibleTokenizer<R, E> {
    type Item = E::Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.next()? {
            Ok(token) => Some(token),
            Err(e) => match e {},
        }
    }
}
