use std::str::FromStr;

use crate::nmea::checksum::checksum_hex;
use crate::nmea::talkers::{is_known_format, is_known_talker};
use crate::prelude::{NavError, NavResult};

const DELIMITER: char = '$';

/// A validated sentence: talker, format and the data fields that follow the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub talker: String,
    pub format: String,
    pub fields: Vec<String>,
}

impl Sentence {
    /// Runs every protocol gate in order and stops at the first failure.
    pub fn parse(raw: &str) -> NavResult<Self> {
        let line = raw.trim_end_matches(['\r', '\n']);
        let body = line.strip_prefix(DELIMITER).ok_or(NavError::MissingDelimiter)?;

        let (payload, received) = body.split_once('*').ok_or(NavError::MissingChecksum)?;
        let received = received.trim();
        let expected = checksum_hex(payload);
        if received != expected {
            return Err(NavError::ChecksumMismatch {
                expected,
                actual: received.to_string(),
            });
        }

        if let Some(bad) = body.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(NavError::InvalidCharacter(bad));
        }

        if payload.len() < 2 {
            return Err(NavError::Truncated);
        }
        let (talker, rest) = payload.split_at(2);
        let mut parts = rest.split(',');
        let format = parts.next().unwrap_or_default();
        let fields: Vec<String> = parts.map(str::to_string).collect();

        if !is_known_talker(talker) {
            return Err(NavError::UnknownTalker(talker.to_string()));
        }
        if !is_known_format(format) {
            return Err(NavError::UnknownFormat(format.to_string()));
        }

        Ok(Self {
            talker: talker.to_string(),
            format: format.to_string(),
            fields,
        })
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Fails with `TooFewFields` unless at least `count` data fields are present.
    pub fn require(&self, count: usize) -> NavResult<()> {
        if self.fields.len() < count {
            return Err(NavError::TooFewFields {
                format: self.format.clone(),
                expected: count,
                actual: self.fields.len(),
            });
        }
        Ok(())
    }

    /// Parses a numeric field; empty or malformed text is an error.
    pub fn number<T: FromStr>(&self, index: usize) -> NavResult<T> {
        let text = self.field(index).unwrap_or_default();
        text.trim().parse().map_err(|_| NavError::InvalidField {
            format: self.format.clone(),
            index,
            value: text.to_string(),
        })
    }

    /// Like [`Sentence::number`] but a blank field is `None` rather than an error.
    pub fn optional_number<T: FromStr>(&self, index: usize) -> NavResult<Option<T>> {
        match self.field(index).map(str::trim) {
            None | Some("") => Ok(None),
            Some(_) => self.number(index).map(Some),
        }
    }

    /// Fails with `InvalidStatus` unless the field holds the active status `A`.
    pub fn require_active(&self, index: usize) -> NavResult<()> {
        match self.field(index) {
            Some("A") => Ok(()),
            other => Err(NavError::InvalidStatus {
                format: self.format.clone(),
                status: other.unwrap_or_default().to_string(),
            }),
        }
    }
}

impl FromStr for Sentence {
    type Err = NavError;

    fn from_str(raw: &str) -> NavResult<Self> {
        Sentence::parse(raw)
    }
}
