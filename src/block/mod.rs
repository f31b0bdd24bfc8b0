//! The variadic size block: attribute declarations, input parameters and source
//! generated from one [`BlockConfig`].
//!
//! Submodules:
//! - `types`: attributes, parameters and the generated fragment
//! - `attributes`: ordered attribute declarations
//! - `params`: parameter bundles and the skip policy
//! - `expr`: typed formula model and per-target rendering
//! - `source`: statement generation
//! - `validation`: consistency checks and WGSL validation using naga
//! - `cache`: memoization of generated fragments
//!
//! All outputs are derived independently from the same config;
//! [`generate_fragment`] builds them together and checks they agree before
//! returning anything.

pub mod attributes;
pub mod cache;
pub mod expr;
pub mod params;
pub mod source;
pub mod types;
pub mod validation;

use anyhow::Result;
use tracing::debug;

use crate::config::{BlockConfig, SizeMode};

pub use cache::FragmentCache;
pub use expr::ShaderTarget;
pub use params::{BuiltinParamBundles, ParamBundleResolver};
pub use types::{
    Attribute, AttributeAccessMode, AttributeDeclaration, GeneratedFragment, InputParameterSpec,
    ParamName, ParamValue, ValueType,
};

/// Contexts a size block can be placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextType {
    Init,
    Update,
    Output,
}

/// Data a size block operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Particle,
}

pub fn compatible_contexts() -> &'static [ContextType] {
    &[ContextType::Init, ContextType::Update, ContextType::Output]
}

pub fn compatible_data() -> DataType {
    DataType::Particle
}

/// Variants offered in the block library: one per size mode, default settings otherwise.
pub fn size_mode_variants() -> Vec<BlockConfig> {
    SizeMode::ALL
        .iter()
        .map(|&size_mode| BlockConfig {
            size_mode,
            ..BlockConfig::default()
        })
        .collect()
}

/// Human-readable block name, e.g. `Blend Size XY Random (Uniform)`.
pub fn display_name(config: &BlockConfig) -> String {
    format!(
        "{} Size {} {}",
        config.composition.label(),
        config.size_mode,
        config.random.label()
    )
    .trim_end()
    .to_string()
}

pub fn list_attribute_declarations(config: &BlockConfig) -> Vec<AttributeDeclaration> {
    attributes::enumerate_attributes(
        config.size_mode,
        config.random,
        attributes::positional_access_mode(config.composition),
    )
}

/// Active parameters from the built-in bundles.
pub fn list_active_parameters(config: &BlockConfig) -> Vec<InputParameterSpec> {
    params::active_parameters(config)
}

/// Active parameters from a host-supplied bundle resolver.
pub fn list_active_parameters_with(
    config: &BlockConfig,
    resolver: &dyn ParamBundleResolver,
) -> Result<Vec<InputParameterSpec>> {
    params::active_parameters_with(config, resolver)
}

/// HLSL source lines of the block body.
pub fn generate_source(config: &BlockConfig) -> Vec<String> {
    source::generate_lines(config, ShaderTarget::Hlsl)
}

pub fn generate_source_for(config: &BlockConfig, target: ShaderTarget) -> Vec<String> {
    source::generate_lines(config, target)
}

/// Build every output for `config` and check them against each other.
///
/// Either the whole fragment is returned or an error; a resolver that breaks
/// the bundle contract fails before any source is generated.
pub fn generate_fragment(
    config: &BlockConfig,
    target: ShaderTarget,
    resolver: &dyn ParamBundleResolver,
) -> Result<GeneratedFragment> {
    let parameters = params::active_parameters_with(config, resolver)?;
    let attributes = list_attribute_declarations(config);
    let stmts = source::build_statements(config);

    validation::check_consistency(config, &attributes, &parameters, &stmts)?;

    let lines = source::render_statements(&stmts, target);
    debug!(
        block = %display_name(config),
        ?target,
        lines = lines.len(),
        params = parameters.len(),
        "generated size block fragment"
    );

    Ok(GeneratedFragment {
        config: *config,
        target,
        attributes,
        parameters,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompositionMode, RandomMode};

    #[test]
    fn test_display_name() {
        let cfg = BlockConfig::new(SizeMode::X, CompositionMode::Overwrite, RandomMode::Off);
        assert_eq!(display_name(&cfg), "Set Size X");
        let cfg = BlockConfig::new(SizeMode::XY, CompositionMode::Blend, RandomMode::Uniform);
        assert_eq!(display_name(&cfg), "Blend Size XY Random (Uniform)");
        let cfg = BlockConfig::new(SizeMode::XYZ, CompositionMode::Additive, RandomMode::PerComponent);
        assert_eq!(display_name(&cfg), "Add Size XYZ Random (Per-component)");
    }

    #[test]
    fn test_size_mode_variants() {
        let variants = size_mode_variants();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[2].size_mode, SizeMode::XYZ);
        assert!(variants.iter().all(|v| v.composition == CompositionMode::Overwrite));
    }

    #[test]
    fn test_block_metadata() {
        assert_eq!(compatible_contexts().len(), 3);
        assert_eq!(compatible_data(), DataType::Particle);
    }

    #[test]
    fn test_generate_fragment_collects_all_outputs() {
        let cfg = BlockConfig::new(SizeMode::X, CompositionMode::Overwrite, RandomMode::Off);
        let frag = generate_fragment(&cfg, ShaderTarget::Hlsl, &BuiltinParamBundles).unwrap();
        assert_eq!(frag.lines, vec!["SizeX = Value;"]);
        assert_eq!(frag.source_text(), "SizeX = Value;\n");
        assert_eq!(frag.parameters.len(), 1);
        assert_eq!(frag.attributes, list_attribute_declarations(&cfg));
    }
}
