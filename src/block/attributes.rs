//! Attribute declarations of the size block.
//!
//! Output order is fixed (context attributes, seed, then size lanes in X, Y, Z
//! order) so golden comparisons stay stable.

use super::types::{Attribute, AttributeAccessMode, AttributeDeclaration, Component};
use crate::config::{CompositionMode, RandomMode, SizeMode};

/// Context attributes every size block declares.
///
/// The generated formulas never read them; sibling blocks of the same family
/// rely on the host scheduling them, so they stay declared.
pub const CONTEXT_ATTRIBUTES: [Attribute; 2] = [Attribute::Age, Attribute::Lifetime];

/// Access mode of the size attributes for a composition mode.
pub fn positional_access_mode(composition: CompositionMode) -> AttributeAccessMode {
    match composition {
        CompositionMode::Overwrite => AttributeAccessMode::Write,
        _ => AttributeAccessMode::ReadWrite,
    }
}

/// Size attributes for the active lanes, all with the given access mode.
pub fn size_attributes(size_mode: SizeMode, mode: AttributeAccessMode) -> Vec<AttributeDeclaration> {
    Component::active(size_mode)
        .iter()
        .map(|c| AttributeDeclaration::new(c.attribute(), mode))
        .collect()
}

/// Full ordered attribute list of a size block.
pub fn enumerate_attributes(
    size_mode: SizeMode,
    random: RandomMode,
    positional: AttributeAccessMode,
) -> Vec<AttributeDeclaration> {
    let mut out: Vec<AttributeDeclaration> = CONTEXT_ATTRIBUTES
        .iter()
        .map(|&a| AttributeDeclaration::new(a, AttributeAccessMode::Read))
        .collect();

    if random.is_random() {
        out.push(AttributeDeclaration::new(
            Attribute::Seed,
            AttributeAccessMode::ReadWrite,
        ));
    }

    out.extend(size_attributes(size_mode, positional));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttributeAccessMode::*;

    fn decl(a: Attribute, m: AttributeAccessMode) -> AttributeDeclaration {
        AttributeDeclaration::new(a, m)
    }

    #[test]
    fn test_scalar_overwrite_without_random() {
        let attrs = enumerate_attributes(SizeMode::X, RandomMode::Off, Write);
        assert_eq!(
            attrs,
            vec![
                decl(Attribute::Age, Read),
                decl(Attribute::Lifetime, Read),
                decl(Attribute::SizeX, Write),
            ]
        );
    }

    #[test]
    fn test_triple_with_random_declares_seed_before_sizes() {
        let attrs = enumerate_attributes(SizeMode::XYZ, RandomMode::PerComponent, ReadWrite);
        assert_eq!(
            attrs,
            vec![
                decl(Attribute::Age, Read),
                decl(Attribute::Lifetime, Read),
                decl(Attribute::Seed, ReadWrite),
                decl(Attribute::SizeX, ReadWrite),
                decl(Attribute::SizeY, ReadWrite),
                decl(Attribute::SizeZ, ReadWrite),
            ]
        );
    }

    #[test]
    fn test_positional_access_mode() {
        assert_eq!(positional_access_mode(CompositionMode::Overwrite), Write);
        for c in [
            CompositionMode::Additive,
            CompositionMode::Multiply,
            CompositionMode::Blend,
        ] {
            assert_eq!(positional_access_mode(c), ReadWrite);
        }
    }

    #[test]
    fn test_size_attribute_count_matches_ordinal() {
        for mode in SizeMode::ALL {
            let sizes = size_attributes(mode, Write);
            assert_eq!(sizes.len(), mode.ordinal() + 1);
            assert!(sizes.iter().all(|d| d.attribute.is_size()));
        }
    }
}
