//! Source generation for the size block.

use super::expr::{Expr, RandomSource, ShaderTarget, Stmt};
use super::types::{Component, ParamName};
use crate::config::{BlockConfig, CompositionMode, RandomMode, SizeMode};

/// Lane suffix for parameter references: none for scalar blocks.
fn lane_for(size_mode: SizeMode, component: Component) -> Option<Component> {
    match size_mode {
        SizeMode::X => None,
        SizeMode::XY | SizeMode::XYZ => Some(component),
    }
}

/// The new value of one lane before composition.
///
/// `Value` as-is without randomization, otherwise `lerp(Min, Max, r)`.
pub fn value_term(random: RandomMode, lane: Option<Component>) -> Expr {
    let r = match random {
        RandomMode::Off => return Expr::param(ParamName::Value, lane),
        RandomMode::Uniform => RandomSource::Shared,
        RandomMode::PerComponent => RandomSource::Draw,
    };
    Expr::lerp(
        Expr::param(ParamName::Min, lane),
        Expr::param(ParamName::Max, lane),
        Expr::Random(r),
    )
}

/// Combine `term` with the current value of the lane's size attribute.
pub fn compose(composition: CompositionMode, component: Component, lane: Option<Component>, term: Expr) -> Expr {
    let current = Expr::Attr(component.attribute());
    match composition {
        CompositionMode::Overwrite => term,
        CompositionMode::Additive => Expr::add(current, term),
        CompositionMode::Multiply => Expr::mul(current, term),
        CompositionMode::Blend => Expr::lerp(current, term, Expr::param(ParamName::Blend, lane)),
    }
}

/// Statements of the block body in emission order.
pub fn build_statements(config: &BlockConfig) -> Vec<Stmt> {
    let components = Component::active(config.size_mode);
    let mut stmts = Vec::with_capacity(components.len() + 1);

    if config.random == RandomMode::Uniform {
        stmts.push(Stmt::SharedRandom);
    }

    for &c in components {
        let lane = lane_for(config.size_mode, c);
        let term = value_term(config.random, lane);
        stmts.push(Stmt::Assign {
            target: c.attribute(),
            value: compose(config.composition, c, lane, term),
        });
    }

    stmts
}

pub fn render_statements(stmts: &[Stmt], target: ShaderTarget) -> Vec<String> {
    stmts.iter().map(|s| target.render_stmt(s)).collect()
}

/// Source lines of the block body, without trailing newlines.
pub fn generate_lines(config: &BlockConfig, target: ShaderTarget) -> Vec<String> {
    render_statements(&build_statements(config), target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hlsl(size: SizeMode, comp: CompositionMode, random: RandomMode) -> Vec<String> {
        generate_lines(&BlockConfig::new(size, comp, random), ShaderTarget::Hlsl)
    }

    #[test]
    fn test_scalar_overwrite() {
        assert_eq!(
            hlsl(SizeMode::X, CompositionMode::Overwrite, RandomMode::Off),
            vec!["SizeX = Value;"]
        );
    }

    #[test]
    fn test_pair_blend() {
        assert_eq!(
            hlsl(SizeMode::XY, CompositionMode::Blend, RandomMode::Off),
            vec![
                "SizeX = lerp(SizeX,Value.x,Blend.x);",
                "SizeY = lerp(SizeY,Value.y,Blend.y);",
            ]
        );
    }

    #[test]
    fn test_triple_additive_uniform_shares_one_draw() {
        assert_eq!(
            hlsl(SizeMode::XYZ, CompositionMode::Additive, RandomMode::Uniform),
            vec![
                "float random = RAND;",
                "SizeX = SizeX + lerp(Min.x,Max.x,random);",
                "SizeY = SizeY + lerp(Min.y,Max.y,random);",
                "SizeZ = SizeZ + lerp(Min.z,Max.z,random);",
            ]
        );
    }

    #[test]
    fn test_scalar_multiply_per_component() {
        assert_eq!(
            hlsl(SizeMode::X, CompositionMode::Multiply, RandomMode::PerComponent),
            vec!["SizeX = SizeX * lerp(Min,Max,RAND);"]
        );
    }

    #[test]
    fn test_pair_blend_per_component_draws_each_lane() {
        assert_eq!(
            hlsl(SizeMode::XY, CompositionMode::Blend, RandomMode::PerComponent),
            vec![
                "SizeX = lerp(SizeX,lerp(Min.x,Max.x,RAND),Blend.x);",
                "SizeY = lerp(SizeY,lerp(Min.y,Max.y,RAND),Blend.y);",
            ]
        );
    }

    #[test]
    fn test_wgsl_rendering() {
        let lines = generate_lines(
            &BlockConfig::new(SizeMode::XY, CompositionMode::Multiply, RandomMode::Uniform),
            ShaderTarget::Wgsl,
        );
        assert_eq!(
            lines,
            vec![
                "let random = rand(&Seed);",
                "SizeX = SizeX * mix(Min.x,Max.x,random);",
                "SizeY = SizeY * mix(Min.y,Max.y,random);",
            ]
        );
    }

    #[test]
    fn test_statement_count() {
        for cfg in BlockConfig::all() {
            let stmts = build_statements(&cfg);
            let extra = usize::from(cfg.random == RandomMode::Uniform);
            assert_eq!(stmts.len(), cfg.size_mode.component_count() + extra, "{cfg:?}");
        }
    }
}
