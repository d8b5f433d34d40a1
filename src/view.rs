// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Align, AspectRatio};
use tiny_skia_path::{NonZeroRect, Size, Transform};

use crate::{view_box_to_transform, Error, Options, Source, SvgDrawing};

/// A loading status of an [`SvgViewbox`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LoadStatus {
    /// No source is set.
    Empty,
    /// A source is set, but not loaded yet.
    Loading,
    /// A drawing is available.
    Ready,
    /// Loading failed. Contains the error message.
    Failed(String),
}

/// A headless SVG host.
///
/// Loads a [`Source`] into an [`SvgDrawing`] and tells how it should be laid out.
/// A UI layer is expected to draw the overlay message while nothing is ready.
#[derive(Debug)]
pub struct SvgViewbox {
    /// A source to load.
    ///
    /// Consumed by [`SvgViewbox::load`].
    pub source: Option<Source>,

    /// Use the drawing size as the desired size.
    ///
    /// Default: false
    pub auto_size: bool,

    /// Rendering options.
    pub options: Options,

    /// An overlay text while a source is pending.
    ///
    /// Default: `Loading...`
    pub loading_message: String,

    /// An overlay text when there is no source.
    ///
    /// Default: `No content`
    pub empty_message: String,

    drawing: Option<SvgDrawing>,
    error: Option<String>,
}

impl Default for SvgViewbox {
    fn default() -> Self {
        SvgViewbox {
            source: None,
            auto_size: false,
            options: Options::default(),
            loading_message: "Loading...".to_string(),
            empty_message: "No content".to_string(),
            drawing: None,
            error: None,
        }
    }
}

impl SvgViewbox {
    /// Creates a viewbox with a pending source.
    pub fn new(source: Source) -> Self {
        SvgViewbox {
            source: Some(source),
            ..SvgViewbox::default()
        }
    }

    /// Loads and renders the pending source.
    ///
    /// Replaces the previous drawing. Does nothing when no source is pending.
    pub fn load(&mut self) -> Result<(), Error> {
        let source = match self.source.take() {
            Some(v) => v,
            None => return Ok(()),
        };

        self.drawing = None;
        self.error = None;

        match SvgDrawing::from_source(source, &self.options) {
            Ok(drawing) => {
                self.drawing = Some(drawing);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load an SVG: {}.", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Returns the current status.
    pub fn status(&self) -> LoadStatus {
        if self.source.is_some() {
            LoadStatus::Loading
        } else if let Some(ref e) = self.error {
            LoadStatus::Failed(e.clone())
        } else if self.drawing.is_some() {
            LoadStatus::Ready
        } else {
            LoadStatus::Empty
        }
    }

    /// Returns an overlay text for the current status.
    ///
    /// Returns `None` when a drawing is ready.
    pub fn message(&self) -> Option<&str> {
        if self.source.is_some() {
            Some(&self.loading_message)
        } else if let Some(ref e) = self.error {
            Some(e)
        } else if self.drawing.is_some() {
            None
        } else {
            Some(&self.empty_message)
        }
    }

    /// Returns the loaded drawing.
    pub fn drawing(&self) -> Option<&SvgDrawing> {
        self.drawing.as_ref()
    }

    /// Drops the drawing and the pending source.
    pub fn unload(&mut self) {
        self.source = None;
        self.drawing = None;
        self.error = None;
    }

    /// Returns the size the host should occupy.
    ///
    /// With `auto_size` this is the drawing size, otherwise the available size.
    /// Falls back to the drawing size and then to `Options::default_size`.
    pub fn desired_size(&self, available: Option<Size>) -> Size {
        let drawing_size = self.drawing.as_ref().map(|d| d.size);
        let size = if self.auto_size {
            drawing_size.or(available)
        } else {
            available.or(drawing_size)
        };

        size.unwrap_or(self.options.default_size)
    }

    /// Returns a transform that fits the drawing into a viewport.
    ///
    /// The drawing is scaled uniformly and centered.
    /// Returns an identity transform when no drawing is loaded.
    pub fn render_transform(&self, viewport: Size) -> Transform {
        let size = match self.drawing {
            Some(ref d) => d.size,
            None => return Transform::default(),
        };

        let rect = match NonZeroRect::from_xywh(0.0, 0.0, size.width(), size.height()) {
            Some(v) => v,
            None => return Transform::default(),
        };

        let aspect = AspectRatio {
            defer: false,
            align: Align::XMidYMid,
            slice: false,
        };

        view_box_to_transform(rect, aspect, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> Source {
        Source::Bytes(text.as_bytes().to_vec())
    }

    const SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg' width='200' height='100'/>";

    #[test]
    fn status_and_messages() {
        let mut view = SvgViewbox::default();
        assert_eq!(view.status(), LoadStatus::Empty);
        assert_eq!(view.message(), Some("No content"));

        view.source = Some(source(SVG));
        assert_eq!(view.status(), LoadStatus::Loading);
        assert_eq!(view.message(), Some("Loading..."));

        view.load().unwrap();
        assert_eq!(view.status(), LoadStatus::Ready);
        assert_eq!(view.message(), None);
        assert!(view.drawing().is_some());

        view.unload();
        assert_eq!(view.status(), LoadStatus::Empty);
        assert!(view.drawing().is_none());
    }

    #[test]
    fn failed_load() {
        let mut view = SvgViewbox::new(source("<svg/>"));
        assert!(view.load().is_err());
        match view.status() {
            LoadStatus::Failed(ref msg) => assert_eq!(Some(msg.as_str()), view.message()),
            s => panic!("unexpected status {:?}", s),
        }
        assert!(view.drawing().is_none());
    }

    #[test]
    fn desired_size() {
        let available = Size::from_wh(50.0, 50.0);
        let mut view = SvgViewbox::new(source(SVG));
        assert_eq!(view.desired_size(None), Size::from_wh(100.0, 100.0).unwrap());

        view.load().unwrap();
        assert_eq!(view.desired_size(available), available.unwrap());
        assert_eq!(view.desired_size(None), Size::from_wh(200.0, 100.0).unwrap());

        view.auto_size = true;
        assert_eq!(view.desired_size(available), Size::from_wh(200.0, 100.0).unwrap());
    }

    #[test]
    fn render_transform() {
        let mut view = SvgViewbox::new(source(SVG));
        let viewport = Size::from_wh(100.0, 100.0).unwrap();
        assert!(view.render_transform(viewport).is_identity());

        view.load().unwrap();
        assert_eq!(
            view.render_transform(viewport),
            Transform::from_row(0.5, 0.0, 0.0, 0.5, 0.0, 25.0)
        );
    }
}
