//! Row-major flattening of nested array values.

use crate::error::{EncodingError, LimitKind};
use crate::types::{Value, ValueKind};

/// A nested value reduced to its per-axis lengths and its leaves in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<'v> {
    pub dimensions: Vec<i32>,
    pub elements: Vec<&'v Value>,
}

/// Number of nested `Array` levels along the first-element path.
pub fn rank_of(value: &Value) -> usize {
    let mut rank = 0;
    let mut current = value;
    while let Value::Array(items) = current {
        rank += 1;
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    rank
}

/// Kind shared by every non-null leaf, or `None` when leaves disagree or
/// there are none.
pub fn uniform_kind(value: &Value) -> Option<ValueKind> {
    let mut kind = None;
    let mut mixed = false;
    visit_leaves(value, &mut |leaf| match (kind, leaf.kind()) {
        (_, None) => {}
        (None, Some(leaf_kind)) => kind = Some(leaf_kind),
        (Some(seen), Some(leaf_kind)) => mixed |= seen != leaf_kind,
    });
    if mixed {
        None
    } else {
        kind
    }
}

fn visit_leaves(value: &Value, visit: &mut impl FnMut(&Value)) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| visit_leaves(item, visit)),
        leaf => visit(leaf),
    }
}

/// Flattens `value` as a `rank`-dimensional matrix.
///
/// Axis lengths are taken from the first element at each level; any row
/// that disagrees is reported as a ragged matrix.
pub fn flatten(value: &Value, rank: usize) -> Result<Flattened<'_>, EncodingError> {
    if i32::try_from(rank).is_err() {
        return Err(too_long(rank));
    }
    let lengths = axis_lengths(value, rank)?;
    let mut elements = Vec::new();
    collect(value, 0, &lengths, &mut elements)?;
    let dimensions = lengths
        .iter()
        .map(|length| i32::try_from(*length).map_err(|_| too_long(*length)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Flattened { dimensions, elements })
}

fn too_long(length: usize) -> EncodingError {
    EncodingError::LimitsExceeded { kind: LimitKind::Array, length, limit: i32::MAX as usize }
}

fn axis_lengths(value: &Value, rank: usize) -> Result<Vec<usize>, EncodingError> {
    let mut lengths = Vec::new();
    let mut current = Some(value);
    for axis in 0..rank {
        match current {
            Some(Value::Array(items)) => {
                lengths.push(items.len());
                current = items.first();
            }
            Some(other) => return Err(not_an_array(axis, other)),
            // Beneath an empty axis every remaining length is zero.
            None => lengths.push(0),
        }
    }
    Ok(lengths)
}

fn collect<'v>(
    value: &'v Value,
    axis: usize,
    lengths: &[usize],
    out: &mut Vec<&'v Value>,
) -> Result<(), EncodingError> {
    if axis == lengths.len() {
        out.push(value);
        return Ok(());
    }
    let Value::Array(items) = value else {
        return Err(not_an_array(axis, value));
    };
    if items.len() != lengths[axis] {
        return Err(EncodingError::RaggedMatrix(format!(
            "axis {axis}: expected {} elements, found {}",
            lengths[axis],
            items.len()
        )));
    }
    for item in items {
        collect(item, axis + 1, lengths, out)?;
    }
    Ok(())
}

fn not_an_array(axis: usize, value: &Value) -> EncodingError {
    let found = match value.kind() {
        Some(kind) => kind.name(),
        None => "null",
    };
    EncodingError::RaggedMatrix(format!("axis {axis}: expected a nested array, found {found}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[i16]]) -> Value {
        Value::array(rows.iter().map(|row| Value::array(row.iter().copied())))
    }

    #[test]
    fn flattens_row_major() {
        let value = grid(&[&[1, 2, 3], &[4, 5, 6]]);
        let flat = flatten(&value, 2).expect("rectangular");
        assert_eq!(flat.dimensions, vec![2, 3]);
        let leaves: Vec<_> = flat.elements.into_iter().cloned().collect();
        assert_eq!(leaves, (1..=6i16).map(Value::from).collect::<Vec<_>>());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let value = grid(&[&[1, 2, 3], &[4, 5]]);
        let err = flatten(&value, 2).expect_err("ragged");
        assert_eq!(err.to_string(), "ragged matrix: axis 1: expected 3 elements, found 2");
    }

    #[test]
    fn null_row_is_rejected() {
        let value = Value::array([Value::array([1i16]), Value::Null]);
        assert!(matches!(flatten(&value, 2), Err(EncodingError::RaggedMatrix(_))));
    }

    #[test]
    fn empty_leading_axis_zeroes_the_rest() {
        let empty = Value::Array(Vec::new());
        let flat = flatten(&empty, 3).expect("empty");
        assert_eq!(flat.dimensions, vec![0, 0, 0]);
        assert!(flat.elements.is_empty());
    }

    #[test]
    fn rank_beyond_a_length_prefix_is_rejected() {
        let err = flatten(&Value::Array(Vec::new()), usize::MAX).expect_err("absurd rank");
        assert!(matches!(
            err,
            EncodingError::LimitsExceeded { kind: LimitKind::Array, length: usize::MAX, .. }
        ));
    }

    #[test]
    fn rank_and_kind_inference() {
        let value = grid(&[&[1, 2], &[3, 4]]);
        assert_eq!(rank_of(&value), 2);
        assert_eq!(rank_of(&Value::Int32(1)), 0);
        assert_eq!(uniform_kind(&value), Some(ValueKind::Int16));

        let mixed = Value::array([Value::Int16(1), Value::Null, Value::from("x")]);
        assert_eq!(uniform_kind(&mixed), None);
    }
}
