//! Named shader inputs.
//!
//! The set of keys is fixed when the store is built; `set` on anything else is
//! an error (`UniformError::InvalidKey`). Every uniform keeps the value kind it
//! was declared with.

use crate::error::UniformError;
use fnv::FnvHashMap;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
}

impl UniformValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            UniformValue::Float(_) => ValueKind::Float,
            UniformValue::Vec2(_) => ValueKind::Vec2,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            UniformValue::Float(v) => Some(v),
            UniformValue::Vec2(_) => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            UniformValue::Vec2(v) => Some(v),
            UniformValue::Float(_) => None,
        }
    }

    /// Linear blend towards `other`; `None` when the kinds differ.
    pub fn lerp(self, other: UniformValue, t: f32) -> Option<UniformValue> {
        match (self, other) {
            (UniformValue::Float(a), UniformValue::Float(b)) => {
                Some(UniformValue::Float(a + (b - a) * t))
            }
            (UniformValue::Vec2(a), UniformValue::Vec2(b)) => Some(UniformValue::Vec2(a.lerp(b, t))),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

/// What the render loop is allowed to write into a uniform on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformRole {
    Time,
    Resolution,
    Pointer,
    Param,
}

#[derive(Clone, Debug)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
    pub role: UniformRole,
}

#[derive(Clone, Debug, Default)]
pub struct UniformStore {
    slots: Vec<Uniform>,
    index: FnvHashMap<String, usize>,
}

impl UniformStore {
    pub fn builder() -> UniformStoreBuilder {
        UniformStoreBuilder::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<UniformValue> {
        self.index.get(key).map(|&i| self.slots[i].value)
    }

    pub fn float(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.as_float())
    }

    pub fn vec2(&self, key: &str) -> Option<Vec2> {
        self.get(key).and_then(|v| v.as_vec2())
    }

    pub fn role(&self, key: &str) -> Option<UniformRole> {
        self.index.get(key).map(|&i| self.slots[i].role)
    }

    pub fn set(&mut self, key: &str, value: UniformValue) -> Result<(), UniformError> {
        let &i = self
            .index
            .get(key)
            .ok_or_else(|| UniformError::InvalidKey(key.to_owned()))?;
        let slot = &mut self.slots[i];
        if slot.value.kind() != value.kind() {
            return Err(UniformError::TypeMismatch {
                key: key.to_owned(),
                expected: slot.value.kind(),
                found: value.kind(),
            });
        }
        slot.value = value;
        Ok(())
    }

    /// Write `value` into every uniform with `role` and a matching kind.
    /// Returns how many were updated.
    pub fn set_role(&mut self, role: UniformRole, value: UniformValue) -> usize {
        let mut n = 0;
        for slot in self.slots.iter_mut() {
            if slot.role == role && slot.value.kind() == value.kind() {
                slot.value = value;
                n += 1;
            }
        }
        n
    }

    pub fn keys_with_role(&self, role: UniformRole) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .filter(move |s| s.role == role)
            .map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uniform> + '_ {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Default)]
pub struct UniformStoreBuilder {
    slots: Vec<Uniform>,
}

impl UniformStoreBuilder {
    pub fn float(self, name: impl Into<String>, value: f32, role: UniformRole) -> Self {
        self.with(name, UniformValue::Float(value), role)
    }

    pub fn vec2(self, name: impl Into<String>, value: Vec2, role: UniformRole) -> Self {
        self.with(name, UniformValue::Vec2(value), role)
    }

    pub fn with(mut self, name: impl Into<String>, value: UniformValue, role: UniformRole) -> Self {
        self.slots.push(Uniform {
            name: name.into(),
            value,
            role,
        });
        self
    }

    pub fn build(self) -> Result<UniformStore, UniformError> {
        let mut index = FnvHashMap::default();
        for (i, slot) in self.slots.iter().enumerate() {
            if index.insert(slot.name.clone(), i).is_some() {
                return Err(UniformError::DuplicateKey(slot.name.clone()));
            }
        }
        Ok(UniformStore {
            slots: self.slots,
            index,
        })
    }
}
