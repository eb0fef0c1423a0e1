use crate::Reader;

/// A wrapper around the input source that supports unreading a single
/// character and tracks the position just past the last consumed one.
///
/// Positions start at line 1, column 1. Consuming `\n` advances the line and
/// resets the column to 1; unreading a character restores the position it was
/// consumed at.
#[derive(Debug)]
pub(crate) struct ReadHelper<R: Reader> {
    reader: R,
    to_reconsume: Option<Option<char>>,
    line: u64,
    column: u64,
    prev_line: u64,
    prev_column: u64,
}

impl<R: Reader> ReadHelper<R> {
    pub(crate) fn new(reader: R) -> Self {
        ReadHelper {
            reader,
            to_reconsume: None,
            line: 1,
            column: 1,
            prev_line: 1,
            prev_column: 1,
        }
    }

    pub(crate) fn read_char(&mut self) -> Result<Option<char>, R::Error> {
        let c = match self.to_reconsume.take() {
            Some(c) => c,
            None => self.reader.read_char()?,
        };

        self.prev_line = self.line;
        self.prev_column = self.column;

        match c {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => (),
        }

        Ok(c)
    }

    /// Push a character back so the next `read_char` returns it again.
    ///
    /// The machine never unreads more than one character, so a single slot
    /// is enough.
    pub(crate) fn unread_char(&mut self, c: Option<char>) {
        debug_assert!(self.to_reconsume.is_none());
        self.to_reconsume = Some(c);
        self.line = self.prev_line;
        self.column = self.prev_column;
    }

    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    pub(crate) fn column(&self) -> u64 {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::ReadHelper;
    use crate::Readable;

    #[test]
    fn position_tracking() {
        let mut helper = ReadHelper::new("a\nbc".to_reader());
        assert_eq!((helper.line(), helper.column()), (1, 1));

        assert_eq!(helper.read_char(), Ok(Some('a')));
        assert_eq!((helper.line(), helper.column()), (1, 2));

        assert_eq!(helper.read_char(), Ok(Some('\n')));
        assert_eq!((helper.line(), helper.column()), (2, 1));

        assert_eq!(helper.read_char(), Ok(Some('b')));
        assert_eq!((helper.line(), helper.column()), (2, 2));

        assert_eq!(helper.read_char(), Ok(Some('c')));
        assert_eq!(helper.read_char(), Ok(None));
        assert_eq!((helper.line(), helper.column()), (2, 3));
    }

    #[test]
    fn unread_restores_position() {
        let mut helper = ReadHelper::new("x\ny".to_reader());
        helper.read_char().unwrap();

        assert_eq!(helper.read_char(), Ok(Some('\n')));
        helper.unread_char(Some('\n'));
        assert_eq!((helper.line(), helper.column()), (1, 2));

        assert_eq!(helper.read_char(), Ok(Some('\n')));
        assert_eq!((helper.line(), helper.column()), (2, 1));
    }
}
