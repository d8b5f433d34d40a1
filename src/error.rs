// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Failed to read an input source.
    Io(std::io::Error),

    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// A `data:` URI could not be decoded.
    MalformedDataUrl,

    /// Failed to parse an SVG data.
    ParsingFailed(svgnode::Error),

    /// SVG doesn't have a valid size.
    ///
    /// Occurs when width and/or height are <= 0.
    InvalidSize,

    /// A brush kind cannot be converted into a luminance mask.
    ///
    /// Contains the name of the brush kind.
    UnsupportedBrush(&'static str),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<svgnode::Error> for Error {
    fn from(e: svgnode::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Io(ref e) => {
                write!(f, "failed to read the input cause {}", e)
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::MalformedDataUrl => {
                write!(f, "provided data URI is malformed")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::InvalidSize => {
                write!(f, "SVG has an invalid size")
            }
            Error::UnsupportedBrush(kind) => {
                write!(f, "{} brushes cannot be used inside a mask", kind)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::ParsingFailed(ref e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::UnsupportedBrush("drawing").to_string(),
            "drawing brushes cannot be used inside a mask"
        );
        assert_eq!(
            Error::from(svgnode::Error::NoRootNode).to_string(),
            "SVG data parsing failed cause the root element is not 'svg'"
        );
    }
}
