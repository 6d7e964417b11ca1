// Copyright 2018 Osspial
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The contract between resources and the renderers that upload them.

use log::trace;

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

static NEXT_RENDERER_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of a renderer, used to key per-renderer state stored on resources.
///
/// Every call to [`RendererId::new`] returns an identity distinct from every other one handed out
/// in this process.
///
/// [`RendererId::new`]: #method.new
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(u32);

impl RendererId {
    pub fn new() -> RendererId {
        RendererId(NEXT_RENDERER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Opaque per-renderer state attached to a resource.
///
/// Each renderer stores whatever it needs to find the resource's GPU-side counterpart (usually a
/// handle) under its own [`RendererId`]. The cache is owned by the resource, so its entries are
/// dropped with it.
///
/// [`RendererId`]: ./struct.RendererId.html
#[derive(Default)]
pub struct RenderDataCache {
    entries: HashMap<RendererId, Box<dyn Any + Send>>,
}

impl RenderDataCache {
    #[inline]
    pub fn new() -> RenderDataCache {
        RenderDataCache::default()
    }

    /// The data stored for `renderer`, if there is any and it has type `T`.
    pub fn get<T: Any>(&self, renderer: RendererId) -> Option<&T> {
        self.entries.get(&renderer)?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self, renderer: RendererId) -> Option<&mut T> {
        self.entries.get_mut(&renderer)?.downcast_mut()
    }

    /// Store data for `renderer`, returning whatever it stored before.
    pub fn set<T: Any + Send>(&mut self, renderer: RendererId, data: T) -> Option<Box<dyn Any + Send>> {
        trace!("storing render data for renderer {}", renderer.0);
        self.entries.insert(renderer, Box::new(data))
    }

    pub fn remove(&mut self, renderer: RendererId) -> Option<Box<dyn Any + Send>> {
        self.entries.remove(&renderer)
    }

    #[inline]
    pub fn contains(&self, renderer: RendererId) -> bool {
        self.entries.contains_key(&renderer)
    }

    /// The renderers with data stored in this cache.
    pub fn renderers<'a>(&'a self) -> impl 'a + Iterator<Item = RendererId> {
        self.entries.keys().cloned()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for RenderDataCache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// A client-side proxy for a GPU resource.
///
/// Applications mutate the resource; every mutation is recorded in its dirty descriptor. A
/// renderer reads the descriptor, uploads what changed, and then clears it. The two sides must not
/// interleave without external synchronization.
pub trait Resource {
    /// Description of what changed since the descriptor was last cleared.
    type DirtyDescriptor;

    fn dirty_descriptor(&self) -> &Self::DirtyDescriptor;

    /// Reset the dirty descriptor. Only renderers should call this, after a successful upload.
    fn clear_dirty_descriptor(&mut self);

    fn render_data_cache(&self) -> &RenderDataCache;
    fn render_data_cache_mut(&mut self) -> &mut RenderDataCache;

    #[inline]
    fn render_data<T: Any>(&self, renderer: RendererId) -> Option<&T> {
        self.render_data_cache().get(renderer)
    }

    #[inline]
    fn set_render_data<T: Any + Send>(&mut self, renderer: RendererId, data: T) -> Option<Box<dyn Any + Send>> {
        self.render_data_cache_mut().set(renderer, data)
    }
}

/// A renderer's uploader for one kind of resource.
pub trait ResourceDriver<R: Resource> {
    type Error;

    /// The identity this driver stores render data under.
    fn renderer(&self) -> RendererId;

    /// Bring the GPU-side copy of `resource` up to date.
    ///
    /// With `full_update` set, everything gets uploaded regardless of the dirty descriptor. On
    /// success the driver clears the resource's dirty descriptor.
    fn update(&mut self, resource: &mut R, full_update: bool) -> Result<(), Self::Error>;

    /// Release the GPU-side copy of `resource` and remove this driver's render data from it.
    fn clean_up(&mut self, resource: &mut R);
}
