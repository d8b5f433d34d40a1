// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashSet;

use crate::{Drawing, DrawingGroup, Options};

/// A set of element ids that were already assigned to drawings.
#[derive(Clone, Default, Debug)]
pub struct IdRegistry {
    ids: HashSet<String>,
}

impl IdRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        IdRegistry::default()
    }

    /// Checks that an id was registered.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Registers an id.
    ///
    /// Returns `false` when it was already registered.
    #[inline]
    pub fn register(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Returns the number of registered ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks that the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A state of a single document render.
///
/// Owns the output tree as a stack of groups.
/// Drawings are always appended to the top group.
#[derive(Debug)]
pub struct RenderContext<'a> {
    options: &'a Options,
    ids: &'a mut IdRegistry,
    groups: Vec<DrawingGroup>,
    rendering_clip_region: bool,
}

impl<'a> RenderContext<'a> {
    /// Creates a new context with an empty root group.
    pub fn new(options: &'a Options, ids: &'a mut IdRegistry) -> Self {
        RenderContext {
            options,
            ids,
            groups: vec![DrawingGroup::default()],
            rendering_clip_region: false,
        }
    }

    /// Returns processing options.
    #[inline]
    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// Checks that geometry should be optimized.
    #[inline]
    pub fn optimize_path(&self) -> bool {
        self.options.optimize_path
    }

    /// Checks that runtime metadata should be attached to drawings.
    #[inline]
    pub fn include_runtime(&self) -> bool {
        self.options.include_runtime
    }

    /// Checks that a clip region content is being rendered.
    #[inline]
    pub fn rendering_clip_region(&self) -> bool {
        self.rendering_clip_region
    }

    /// Sets the clip region rendering mode.
    ///
    /// Returns the previous mode.
    #[inline]
    pub fn set_rendering_clip_region(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.rendering_clip_region, value)
    }

    /// Returns the group drawings are appended to.
    #[inline]
    pub fn current_group(&mut self) -> &mut DrawingGroup {
        // The root group is never popped.
        let idx = self.groups.len() - 1;
        &mut self.groups[idx]
    }

    /// Appends a drawing to the current group.
    #[inline]
    pub fn push_drawing(&mut self, drawing: Drawing) {
        self.current_group().push(drawing);
    }

    /// Makes `group` the current group.
    pub fn push_group(&mut self, group: DrawingGroup) {
        self.groups.push(group);
    }

    /// Removes the current group and returns it.
    ///
    /// Returns `None` for the root group.
    pub fn pop_group(&mut self) -> Option<DrawingGroup> {
        if self.groups.len() > 1 {
            self.groups.pop()
        } else {
            None
        }
    }

    /// Returns the number of open groups, including the root one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    /// Checks that an id was already assigned to a drawing.
    #[inline]
    pub fn is_registered_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Registers an id.
    #[inline]
    pub fn register_id(&mut self, id: &str) {
        self.ids.register(id);
    }

    /// Finishes the render and returns the root group.
    ///
    /// Groups that are still open are closed and appended to their parents.
    pub fn finish(mut self) -> DrawingGroup {
        while let Some(group) = self.pop_group() {
            self.push_drawing(group.into());
        }

        self.groups.pop().unwrap_or_default()
    }
}
