//! Generic entry point for values whose type is only known at runtime.
//!
//! A [`TypeDescriptor`] gives the rank and names the element type. Rank 0
//! goes straight to the scalar encoder, rank 1 writes a length-prefixed
//! array, and higher ranks write the dimension vector followed by the
//! row-major elements.

use crate::config::EncodingContext;
use crate::encoder::BinaryEncoder;
use crate::error::{EncodingError, LimitKind};
use crate::matrix;
use crate::types::{ElementType, TypeDescriptor, Value, ValueKind, Variant};

/// Element type after name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedElement {
    Kind(ValueKind),
    /// Untyped; every element is wrapped in a variant.
    Any,
}

const ANY_NAMES: [&str; 2] = ["BaseDataType", "Object"];

/// Resolves a descriptor's element type.
///
/// Names are matched against the sealed builtin kinds first, then against
/// the open families in [`ValueKind::FAMILIES`] order. Record and
/// enumeration families also accept any name registered in the context.
pub fn resolve_element(
    ctx: &EncodingContext,
    element: &ElementType,
) -> Result<ResolvedElement, EncodingError> {
    let name = match element {
        ElementType::Kind(kind) => return Ok(ResolvedElement::Kind(*kind)),
        ElementType::Any => return Ok(ResolvedElement::Any),
        ElementType::Named(name) => name.as_str(),
    };
    if let Some(kind) = ValueKind::SEALED.into_iter().find(|kind| kind.name() == name) {
        return Ok(ResolvedElement::Kind(kind));
    }
    let family = ValueKind::FAMILIES.into_iter().find(|kind| family_accepts(ctx, *kind, name));
    if let Some(kind) = family {
        return Ok(ResolvedElement::Kind(kind));
    }
    if ANY_NAMES.contains(&name) {
        return Ok(ResolvedElement::Any);
    }
    Err(EncodingError::unsupported(format!("no encoder for type {name}")))
}

fn family_accepts(ctx: &EncodingContext, family: ValueKind, name: &str) -> bool {
    match family {
        ValueKind::Record => name == family.name() || ctx.types().contains(name),
        ValueKind::Enumeration => name == family.name() || ctx.is_enumeration(name),
        ValueKind::DateTime => name == family.name() || name == "UtcTime",
        _ => name == family.name(),
    }
}

impl BinaryEncoder<'_> {
    /// Writes `value` according to `descriptor`.
    ///
    /// A null value of rank 2 or more writes a dimension vector of `-1`s,
    /// one per axis. The dimension vector and the flattened element count
    /// are both checked against the array limit before anything is written.
    pub fn put(&mut self, value: &Value, descriptor: &TypeDescriptor) -> Result<(), EncodingError> {
        let element = resolve_element(self.context(), &descriptor.element)?;
        let rank = descriptor.rank;
        if rank >= 2 {
            self.check_rank(rank)?;
        }
        match (rank, value) {
            (0, value) => self.put_element(element, value),
            (1, Value::Null) => self.put_int32(-1),
            (1, Value::Array(items)) => self.put_array_with(Some(items.as_slice()), |enc, item| {
                enc.put_element(element, item)
            }),
            (_, Value::Null) => {
                self.put_int32(rank as i32)?;
                for _ in 0..rank {
                    self.put_int32(-1)?;
                }
                Ok(())
            }
            (_, value @ Value::Array(_)) => {
                let flat = matrix::flatten(value, rank)?;
                self.check_limit(LimitKind::Array, flat.elements.len())?;
                self.put_int32_array(Some(flat.dimensions.as_slice()))?;
                for item in flat.elements {
                    self.put_element(element, item)?;
                }
                Ok(())
            }
            (_, _) => Err(EncodingError::unsupported(format!(
                "expected an array of rank {rank} for {descriptor}"
            ))),
        }
    }

    /// Writes `value` with a descriptor inferred from its contents.
    pub fn put_value(&mut self, value: &Value) -> Result<(), EncodingError> {
        let descriptor = TypeDescriptor::infer(value)?;
        self.put(value, &descriptor)
    }

    /// The dimension vector is itself an array; its length must pass the
    /// array limit and fit the 4-byte length prefix. Each axis also counts as
    /// one nesting level.
    fn check_rank(&self, rank: usize) -> Result<(), EncodingError> {
        self.check_limit(LimitKind::Array, rank)?;
        self.check_limit(LimitKind::Nesting, rank)?;
        if i32::try_from(rank).is_err() {
            return Err(EncodingError::LimitsExceeded {
                kind: LimitKind::Array,
                length: rank,
                limit: i32::MAX as usize,
            });
        }
        Ok(())
    }

    fn put_element(
        &mut self,
        element: ResolvedElement,
        value: &Value,
    ) -> Result<(), EncodingError> {
        match (element, value) {
            (ResolvedElement::Kind(kind), value) => self.put_scalar(kind, value),
            (ResolvedElement::Any, Value::Variant(variant)) => self.put_variant(Some(&**variant)),
            (ResolvedElement::Any, value) => {
                let wrapped = Variant::from_value(value.clone())?;
                self.put_variant(Some(&wrapped))
            }
        }
    }
}
