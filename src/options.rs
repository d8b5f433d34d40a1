// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use tiny_skia_path::Size;

/// Processing options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Keep geometry as an opaque, optimized stream.
    ///
    /// When disabled, geometry keeps its source figures.
    /// Has no effect on the visual output.
    ///
    /// Default: true
    pub optimize_path: bool,

    /// Attach element ids and class names to primitives as runtime metadata.
    ///
    /// Default: false
    pub include_runtime: bool,

    /// Directory that will be used during relative paths resolving.
    ///
    /// Expected to be the same as the directory that contains the SVG file,
    /// but can be set to any.
    ///
    /// Default: `None`
    pub resources_dir: Option<PathBuf>,

    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96.0
    pub dpi: f32,

    /// A default font size.
    ///
    /// Used by `em` and `ex` units when no `font-size` is set.
    ///
    /// Default: 12
    pub font_size: f32,

    /// A list of languages.
    ///
    /// Will be used to resolve a `systemLanguage` conditional attribute.
    ///
    /// Format: en, en-US.
    ///
    /// Default: `[en]`
    pub languages: Vec<String>,

    /// Default viewport size to assume if there is no `viewBox` attribute and
    /// the `width` or `height` attributes are relative.
    ///
    /// Default: `(100, 100)`
    pub default_size: Size,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            optimize_path: true,
            include_runtime: false,
            resources_dir: None,
            dpi: 96.0,
            font_size: 12.0,
            languages: vec!["en".to_string()],
            default_size: Size::from_wh(100.0, 100.0).unwrap_or_else(|| unreachable!()),
        }
    }
}

impl Options {
    /// Converts a relative path into absolute relative to the SVG file itself.
    ///
    /// If `Options::resources_dir` is not set, returns itself.
    pub fn get_abs_path(&self, rel_path: &Path) -> PathBuf {
        match self.resources_dir {
            Some(ref dir) => dir.join(rel_path),
            None => rel_path.into(),
        }
    }
}
