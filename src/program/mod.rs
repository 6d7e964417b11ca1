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

//! GLSL programs: shader source plus the uniforms and vertex attributes the application feeds it.

pub mod error;

use self::error::{ProgramError, ProgramWarning};
use crate::{
    resource::{RenderDataCache, Resource},
    uniform::{GlslUniform, UniformType},
    vertex::{AttributeType, GlslVertexAttribute},
    RESERVED_PREFIX,
};
use log::{debug, trace, warn};

use std::{
    collections::{BTreeMap, HashMap},
    ops::Range,
};

bitflags! {
    /// Parts of a program that changed since the last upload.
    pub struct ProgramDirty: u8 {
        /// A uniform was attached or detached.
        const UNIFORMS = 1 << 0;
        /// An attribute was bound or unbound.
        const ATTRIBUTES = 1 << 1;
        /// The shader source was replaced.
        const GLSL_CODE = 1 << 2;
    }
}

/// Everything about a program that changed since a renderer last cleared the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDirtyDescriptor {
    flags: ProgramDirty,
}

impl ProgramDirtyDescriptor {
    #[inline]
    pub fn flags(&self) -> ProgramDirty {
        self.flags
    }

    #[inline]
    pub fn is_uniforms_dirty(&self) -> bool {
        self.flags.contains(ProgramDirty::UNIFORMS)
    }
    #[inline]
    pub fn is_attributes_dirty(&self) -> bool {
        self.flags.contains(ProgramDirty::ATTRIBUTES)
    }
    #[inline]
    pub fn is_glsl_code_dirty(&self) -> bool {
        self.flags.contains(ProgramDirty::GLSL_CODE)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Occupancy of generic vertex attribute binding slots, as 64-slot words keyed by word index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SlotSet {
    words: BTreeMap<u32, u64>,
}

impl SlotSet {
    fn contains(&self, slot: u32) -> bool {
        let (word, bit) = (slot / 64, slot % 64);
        self.words.get(&word).map(|w| w & (1u64 << bit) != 0).unwrap_or(false)
    }

    fn first_used(&self, mut slots: Range<u32>) -> Option<u32> {
        slots.find(|&s| self.contains(s))
    }

    fn insert(&mut self, slots: Range<u32>) {
        for slot in slots {
            *self.words.entry(slot / 64).or_insert(0) |= 1u64 << (slot % 64);
        }
    }

    fn remove(&mut self, slots: Range<u32>) {
        for slot in slots {
            let word = slot / 64;
            if let Some(w) = self.words.get_mut(&word) {
                *w &= !(1u64 << (slot % 64));
                if *w == 0 {
                    self.words.remove(&word);
                }
            }
        }
    }
}

/// A vertex and fragment shader pair, along with the uniforms and attributes the application
/// provides values for.
///
/// Shader source is stored as a list of fragments per stage, which the renderer concatenates
/// before compiling. Uniform and attribute names are unique within a program, can't start with
/// `gl`, and no two attributes may occupy the same binding slot.
///
/// ```
/// use ferox::program::GlslProgram;
/// use ferox::vertex::AttributeType;
///
/// let mut program = GlslProgram::new(
///     vec![Some("void main() { gl_Position = ftransform(); }")],
///     vec![None, Some("void main() { gl_FragColor = vec4(1.0); }")],
/// ).unwrap();
/// assert_eq!(program.fragment_shader().len(), 1);
///
/// program.bind_attribute("model", AttributeType::Mat4F, 1).unwrap();
/// assert!(program.bind_attribute("normal", AttributeType::Vec3F, 4).is_err());
/// assert!(program.bind_attribute("normal", AttributeType::Vec3F, 5).is_ok());
/// ```
#[derive(Debug)]
pub struct GlslProgram {
    vertex: Vec<String>,
    fragment: Vec<String>,

    uniforms: HashMap<String, GlslUniform>,
    attributes: HashMap<String, GlslVertexAttribute>,
    used_slots: SlotSet,

    dirty: ProgramDirtyDescriptor,
    render_data: RenderDataCache,
}

impl GlslProgram {
    /// Create a program from vertex and fragment source fragments. `None` fragments are dropped.
    ///
    /// The new program has no uniforms or attributes, and only its code is marked dirty.
    pub fn new<V, F, S>(vertex: V, fragment: F) -> Result<GlslProgram, ProgramError>
    where
        V: IntoIterator<Item = Option<S>>,
        F: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut program = GlslProgram {
            vertex: Vec::new(),
            fragment: Vec::new(),
            uniforms: HashMap::new(),
            attributes: HashMap::new(),
            used_slots: SlotSet::default(),
            dirty: ProgramDirtyDescriptor {
                flags: ProgramDirty::empty(),
            },
            render_data: RenderDataCache::new(),
        };
        program.set_shader_code(vertex, fragment)?;
        debug!(
            "created glsl program with {} vertex and {} fragment source fragments",
            program.vertex.len(),
            program.fragment.len()
        );
        Ok(program)
    }

    /// Replace the source of both stages. `None` fragments are dropped, and at least one stage
    /// must have source left afterwards.
    pub fn set_shader_code<V, F, S>(&mut self, vertex: V, fragment: F) -> Result<(), ProgramError>
    where
        V: IntoIterator<Item = Option<S>>,
        F: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let vertex: Vec<String> = vertex.into_iter().flatten().map(Into::into).collect();
        let fragment: Vec<String> = fragment.into_iter().flatten().map(Into::into).collect();
        if vertex.is_empty() && fragment.is_empty() {
            return Err(ProgramError::EmptySource);
        }

        self.vertex = vertex;
        self.fragment = fragment;
        self.dirty.flags.insert(ProgramDirty::GLSL_CODE);
        Ok(())
    }

    #[inline]
    pub fn vertex_shader(&self) -> &[String] {
        &self.vertex
    }

    #[inline]
    pub fn fragment_shader(&self) -> &[String] {
        &self.fragment
    }

    /// Attach a new uniform, returning it so its update policy can be configured.
    pub fn attach_uniform<N: Into<String>>(
        &mut self,
        name: N,
        ty: UniformType,
        length: usize,
    ) -> Result<&mut GlslUniform, ProgramError> {
        let name = name.into();
        if self.uniforms.contains_key(&name) {
            return Err(ProgramError::DuplicateUniform(name));
        }
        let uniform = GlslUniform::new(name.clone(), ty, length)?;

        trace!("attaching uniform `{}` as {:?}[{}]", name, ty, length);
        self.dirty.flags.insert(ProgramDirty::UNIFORMS);
        Ok(self.uniforms.entry(name).or_insert(uniform))
    }

    /// Detach the uniform with the given name, returning it if it was attached.
    pub fn detach_uniform(&mut self, name: &str) -> Option<GlslUniform> {
        let uniform = self.uniforms.remove(name)?;
        trace!("detaching uniform `{}`", name);
        self.dirty.flags.insert(ProgramDirty::UNIFORMS);
        Some(uniform)
    }

    #[inline]
    pub fn uniform(&self, name: &str) -> Option<&GlslUniform> {
        self.uniforms.get(name)
    }

    #[inline]
    pub fn uniform_mut(&mut self, name: &str) -> Option<&mut GlslUniform> {
        self.uniforms.get_mut(name)
    }

    pub fn uniforms<'a>(&'a self) -> impl 'a + Iterator<Item = &'a GlslUniform> {
        self.uniforms.values()
    }

    /// Bind a vertex attribute to `binding_slot`. Matrix types occupy one slot per column, and
    /// none of those slots may already be in use.
    pub fn bind_attribute<N: Into<String>>(
        &mut self,
        name: N,
        ty: AttributeType,
        binding_slot: u32,
    ) -> Result<&GlslVertexAttribute, ProgramError> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(ProgramError::DuplicateAttribute(name));
        }
        let attribute = GlslVertexAttribute::new(name.clone(), ty, binding_slot)?;
        if let Some(slot) = self.used_slots.first_used(attribute.slots()) {
            return Err(ProgramError::SlotOverlap { name, slot });
        }

        trace!("binding attribute `{}` as {:?} to slot {}", name, ty, binding_slot);
        self.used_slots.insert(attribute.slots());
        self.dirty.flags.insert(ProgramDirty::ATTRIBUTES);
        Ok(&*self.attributes.entry(name).or_insert(attribute))
    }

    /// Unbind the attribute with the given name, freeing its slots. Returns the attribute if it
    /// was bound.
    pub fn unbind_attribute(&mut self, name: &str) -> Option<GlslVertexAttribute> {
        let attribute = self.attributes.remove(name)?;
        trace!("unbinding attribute `{}` from slot {}", name, attribute.binding_slot());
        self.used_slots.remove(attribute.slots());
        self.dirty.flags.insert(ProgramDirty::ATTRIBUTES);
        Some(attribute)
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&GlslVertexAttribute> {
        self.attributes.get(name)
    }

    pub fn attributes<'a>(&'a self) -> impl 'a + Iterator<Item = &'a GlslVertexAttribute> {
        self.attributes.values()
    }

    /// Whether a bound attribute occupies `slot`.
    #[inline]
    pub fn is_slot_used(&self, slot: u32) -> bool {
        self.used_slots.contains(slot)
    }

    /// Bring the attached uniforms in line with the `(name, type, length)` uniforms a linked
    /// program actually declares.
    ///
    /// Built-in `gl` uniforms are skipped. Attached uniforms the program doesn't declare, or
    /// declares with another type or length, get detached and reported. Declared uniforms that
    /// aren't attached get attached with the default update policy; those that can't be get
    /// reported as unattached.
    pub fn reconcile_uniforms<'a, I>(&mut self, declared: I) -> Vec<ProgramWarning>
    where
        I: IntoIterator<Item = (&'a str, UniformType, usize)>,
    {
        let declared: HashMap<&str, (UniformType, usize)> = declared
            .into_iter()
            .filter(|&(name, _, _)| !name.starts_with(RESERVED_PREFIX))
            .map(|(name, ty, length)| (name, (ty, length)))
            .collect();
        let mut warnings = Vec::new();

        let mut stale: Vec<String> = self
            .uniforms
            .values()
            .filter(|u| declared.get(u.name()) != Some(&(u.ty(), u.length())))
            .map(|u| u.name().to_owned())
            .collect();
        stale.sort();
        for name in stale {
            if let Some(uniform) = self.detach_uniform(&name) {
                let warning = match declared.get(&name[..]) {
                    Some(&declared) => ProgramWarning::MismatchedUniform {
                        name,
                        attached: (uniform.ty(), uniform.length()),
                        declared,
                    },
                    None => ProgramWarning::UnusedUniform(name),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        let mut missing: Vec<(&str, (UniformType, usize))> = declared
            .iter()
            .filter(|&(name, _)| !self.uniforms.contains_key(*name))
            .map(|(&name, &decl)| (name, decl))
            .collect();
        missing.sort_by_key(|&(name, _)| name);
        let detached = warnings.len();
        let mut attached = 0;
        for (name, (ty, length)) in missing {
            match self.attach_uniform(name, ty, length) {
                Ok(_) => attached += 1,
                Err(e) => {
                    let warning = ProgramWarning::UnattachedUniform(name.to_owned());
                    warn!("{}: {}", warning, e);
                    warnings.push(warning);
                }
            }
        }

        if attached > 0 || detached > 0 {
            debug!("reconciled uniforms: {} attached, {} detached", attached, detached);
        }
        warnings
    }

    /// Bring the bound attributes in line with the `(name, type, slot)` attributes a linked
    /// program actually declares.
    ///
    /// Built-in `gl` attributes are skipped. Bound attributes the program doesn't declare, or
    /// declares with another type or slot, get unbound. Declared attributes that aren't bound get
    /// bound at their declared slot; those that can't be get reported as unbound.
    pub fn reconcile_attributes<'a, I>(&mut self, declared: I) -> Vec<ProgramWarning>
    where
        I: IntoIterator<Item = (&'a str, AttributeType, u32)>,
    {
        let declared: HashMap<&str, (AttributeType, u32)> = declared
            .into_iter()
            .filter(|&(name, _, _)| !name.starts_with(RESERVED_PREFIX))
            .map(|(name, ty, slot)| (name, (ty, slot)))
            .collect();
        let mut warnings = Vec::new();

        let mut stale: Vec<String> = self
            .attributes
            .values()
            .filter(|a| declared.get(a.name()) != Some(&(a.ty(), a.binding_slot())))
            .map(|a| a.name().to_owned())
            .collect();
        stale.sort();
        let unbound = stale.len();
        for name in stale {
            if let Some(attribute) = self.unbind_attribute(&name) {
                let warning = match declared.get(&name[..]) {
                    Some(&(ty, _)) if ty == attribute.ty() => continue,
                    Some(&(ty, _)) => ProgramWarning::MismatchedVertexAttribute {
                        name,
                        bound: attribute.ty(),
                        declared: ty,
                    },
                    None => ProgramWarning::UnusedVertexAttribute(name),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        let mut missing: Vec<(&str, (AttributeType, u32))> = declared
            .iter()
            .filter(|&(name, _)| !self.attributes.contains_key(*name))
            .map(|(&name, &decl)| (name, decl))
            .collect();
        missing.sort_by_key(|&(name, (_, slot))| (slot, name));
        let mut bound = 0;
        for (name, (ty, slot)) in missing {
            match self.bind_attribute(name, ty, slot) {
                Ok(_) => bound += 1,
                Err(e) => {
                    let warning = ProgramWarning::UnboundVertexAttribute(name.to_owned());
                    warn!("{}: {}", warning, e);
                    warnings.push(warning);
                }
            }
        }

        if bound > 0 || unbound > 0 {
            debug!("reconciled attributes: {} bound, {} unbound", bound, unbound);
        }
        warnings
    }
}

impl Resource for GlslProgram {
    type DirtyDescriptor = ProgramDirtyDescriptor;

    #[inline]
    fn dirty_descriptor(&self) -> &ProgramDirtyDescriptor {
        &self.dirty
    }

    #[inline]
    fn clear_dirty_descriptor(&mut self) {
        self.dirty.flags = ProgramDirty::empty();
    }

    #[inline]
    fn render_data_cache(&self) -> &RenderDataCache {
        &self.render_data
    }

    #[inline]
    fn render_data_cache_mut(&mut self) -> &mut RenderDataCache {
        &mut self.render_data
    }
}
