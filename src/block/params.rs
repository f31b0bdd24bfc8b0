//! Input parameter bundles and the skip policy over them.
//!
//! Each size mode maps to one statically typed bundle (Value, Min, Max, Blend at
//! the mode's lane width). Which of the four are surfaced depends only on the
//! composition and random modes.

use anyhow::Result;

use super::types::{InputParameterSpec, ParamName, ParamValue, ValueType};
use crate::config::{BlockConfig, CompositionMode, RandomMode, SizeMode};
use crate::error::FragmentError;

const BLEND_TOOLTIP: &str = "Size Blending factor";

/// Default values of one bundle, one field per canonical parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeBundle<T> {
    pub value: T,
    pub min: T,
    pub max: T,
    pub blend: T,
}

/// The parameter bundle of each size mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamBundle {
    X(SizeBundle<f32>),
    XY(SizeBundle<[f32; 2]>),
    XYZ(SizeBundle<[f32; 3]>),
}

impl ParamBundle {
    pub fn defaults(size_mode: SizeMode) -> Self {
        match size_mode {
            SizeMode::X => ParamBundle::X(SizeBundle {
                value: 0.1,
                min: 0.0,
                max: 0.1,
                blend: 0.5,
            }),
            SizeMode::XY => ParamBundle::XY(SizeBundle {
                value: [0.1; 2],
                min: [0.0; 2],
                max: [0.1; 2],
                blend: [0.5; 2],
            }),
            SizeMode::XYZ => ParamBundle::XYZ(SizeBundle {
                value: [0.1; 3],
                min: [0.0; 3],
                max: [0.1; 3],
                blend: [0.5; 3],
            }),
        }
    }

    fn value_of(&self, name: ParamName) -> ParamValue {
        fn pick<T: Copy>(b: &SizeBundle<T>, name: ParamName) -> T {
            match name {
                ParamName::Value => b.value,
                ParamName::Min => b.min,
                ParamName::Max => b.max,
                ParamName::Blend => b.blend,
            }
        }
        match self {
            ParamBundle::X(b) => ParamValue::Float(pick(b, name)),
            ParamBundle::XY(b) => ParamValue::Float2(pick(b, name)),
            ParamBundle::XYZ(b) => ParamValue::Float3(pick(b, name)),
        }
    }

    fn spec(&self, name: ParamName) -> InputParameterSpec {
        let spec = InputParameterSpec::new(name, self.value_of(name));
        match (name, self) {
            (ParamName::Blend, ParamBundle::X(_)) => spec.with_tooltip(BLEND_TOOLTIP).with_range(0.0, 1.0),
            (ParamName::Blend, _) => spec.with_tooltip(BLEND_TOOLTIP),
            _ => spec,
        }
    }

    /// Instantiate the bundle's parameters in canonical order, leaving out `skip`.
    pub fn specs_except(&self, skip: &[ParamName]) -> Vec<InputParameterSpec> {
        ParamName::ALL
            .iter()
            .filter(|n| !skip.contains(*n))
            .map(|&n| self.spec(n))
            .collect()
    }
}

/// Host-side source of the full, unfiltered parameter list for a size mode.
pub trait ParamBundleResolver {
    fn resolve(&self, size_mode: SizeMode) -> Result<Vec<InputParameterSpec>>;
}

/// Resolver backed by the built-in static bundles.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinParamBundles;

impl ParamBundleResolver for BuiltinParamBundles {
    fn resolve(&self, size_mode: SizeMode) -> Result<Vec<InputParameterSpec>> {
        Ok(ParamBundle::defaults(size_mode).specs_except(&[]))
    }
}

/// Parameters the formula cannot reference for this composition/random pair.
pub fn skipped_parameters(composition: CompositionMode, random: RandomMode) -> Vec<ParamName> {
    let mut skip = Vec::with_capacity(3);
    if random.is_random() {
        skip.push(ParamName::Value);
    } else {
        skip.push(ParamName::Min);
        skip.push(ParamName::Max);
    }
    if composition != CompositionMode::Blend {
        skip.push(ParamName::Blend);
    }
    skip
}

/// Names the formula references, in canonical order.
pub fn required_parameters(composition: CompositionMode, random: RandomMode) -> Vec<ParamName> {
    let skip = skipped_parameters(composition, random);
    ParamName::ALL
        .iter()
        .copied()
        .filter(|n| !skip.contains(n))
        .collect()
}

/// Active parameters from the built-in bundles. Skipped ones are never built.
pub fn active_parameters(config: &BlockConfig) -> Vec<InputParameterSpec> {
    let skip = skipped_parameters(config.composition, config.random);
    ParamBundle::defaults(config.size_mode).specs_except(&skip)
}

/// Active parameters from a host resolver.
///
/// Fails with [`FragmentError::ShapeMismatch`] when a surviving parameter is not
/// typed at the configured width, [`FragmentError::DuplicateParameter`] when a
/// surviving name repeats, and [`FragmentError::MissingParameter`] when the
/// resolver left out a parameter the formula needs.
pub fn active_parameters_with(
    config: &BlockConfig,
    resolver: &dyn ParamBundleResolver,
) -> Result<Vec<InputParameterSpec>> {
    let skip = skipped_parameters(config.composition, config.random);
    let expected = ValueType::for_size_mode(config.size_mode);

    let active: Vec<InputParameterSpec> = resolver
        .resolve(config.size_mode)?
        .into_iter()
        .filter(|p| !skip.contains(&p.name))
        .collect();

    for (i, p) in active.iter().enumerate() {
        if active[..i].iter().any(|q| q.name == p.name) {
            return Err(FragmentError::DuplicateParameter {
                param: p.name.to_string(),
                size_mode: config.size_mode,
            }
            .into());
        }
        if p.ty != expected || p.default.value_type() != expected {
            let found = if p.ty != expected { p.ty } else { p.default.value_type() };
            return Err(FragmentError::ShapeMismatch {
                param: p.name.to_string(),
                size_mode: config.size_mode,
                expected,
                found,
            }
            .into());
        }
    }

    for name in required_parameters(config.composition, config.random) {
        if !active.iter().any(|p| p.name == name) {
            return Err(FragmentError::MissingParameter {
                param: name.to_string(),
                size_mode: config.size_mode,
            }
            .into());
        }
    }

    Ok(active)
}
