// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Read;
use std::path::PathBuf;

use crate::{Error, Options};

/// An SVG input source.
pub enum Source {
    /// A file path.
    ///
    /// Relative paths are resolved against `Options::resources_dir`.
    File(PathBuf),
    /// In-memory data.
    Bytes(Vec<u8>),
    /// A stream that will be read till the end.
    Stream(Box<dyn Read + Send>),
    /// A `data:` URI.
    DataUri(String),
    /// An embedded resource.
    Resource {
        /// Resource name. Used only for diagnostics.
        name: String,
        /// Resource content.
        bytes: Vec<u8>,
    },
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Source::File(ref path) => write!(f, "File({:?})", path),
            Source::Bytes(ref data) => write!(f, "Bytes({} bytes)", data.len()),
            Source::Stream(_) => write!(f, "Stream(..)"),
            Source::DataUri(_) => write!(f, "DataUri(..)"),
            Source::Resource { ref name, .. } => write!(f, "Resource({:?})", name),
        }
    }
}

/// Reads a source into memory.
///
/// SVGZ data is decompressed. The result is not validated otherwise.
pub fn load_data(source: Source, opt: &Options) -> Result<Vec<u8>, Error> {
    let data = match source {
        Source::File(path) => {
            let path = if path.is_relative() {
                opt.get_abs_path(&path)
            } else {
                path
            };

            log::debug!("Loading '{}'.", path.display());
            std::fs::read(path)?
        }
        Source::Bytes(data) => data,
        Source::Stream(mut stream) => {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            buf
        }
        Source::DataUri(uri) => decode_data_uri(&uri)?,
        Source::Resource { name, bytes } => {
            log::debug!("Loading resource '{}'.", name);
            bytes
        }
    };

    if data.starts_with(&[0x1f, 0x8b]) {
        decompress_svgz(&data)
    } else {
        Ok(data)
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, Error> {
    let url = data_url::DataUrl::process(uri).map_err(|_| Error::MalformedDataUrl)?;

    let mime = url.mime_type();
    if !(mime.type_ == "image" && mime.subtype.starts_with("svg")) {
        log::warn!(
            "Unexpected data URI type: '{}/{}'.",
            mime.type_,
            mime.subtype
        );
    }

    let (data, _) = url.decode_to_vec().map_err(|_| Error::MalformedDataUrl)?;
    Ok(data)
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}
