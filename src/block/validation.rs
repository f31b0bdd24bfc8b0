//! Consistency checks for generated fragments and WGSL validation using naga.

use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow};

use super::attributes::CONTEXT_ATTRIBUTES;
use super::expr::{ShaderTarget, Stmt};
use super::types::{Attribute, AttributeDeclaration, GeneratedFragment, InputParameterSpec};
use crate::config::{BlockConfig, RandomMode, SizeMode};
use crate::error::FragmentError;

fn inconsistent(msg: String) -> anyhow::Error {
    FragmentError::InconsistentFragment(msg).into()
}

/// Check block statements against the declarations and parameters they were
/// generated alongside.
///
/// - the attributes touched by `stmts` are exactly the declared ones, apart from
///   the context attributes which are declared without use
/// - write-only attributes are never read, assignment targets are writable
/// - uniform randomness reads the shared scalar in every assignment and never
///   draws inline; per-component randomness draws inline in every assignment
///   and never reads the shared scalar
/// - every referenced parameter is active, and swizzled iff the block is not scalar
/// - one assignment per lane, plus the shared random line for uniform randomness
pub fn check_consistency(
    config: &BlockConfig,
    attributes: &[AttributeDeclaration],
    params: &[InputParameterSpec],
    stmts: &[Stmt],
) -> Result<()> {
    let declared: BTreeSet<Attribute> = attributes
        .iter()
        .map(|d| d.attribute)
        .filter(|a| !CONTEXT_ATTRIBUTES.contains(a))
        .collect();
    if declared.len() + CONTEXT_ATTRIBUTES.len() != attributes.len() {
        return Err(inconsistent(format!("duplicate or missing context attribute declarations: {attributes:?}")));
    }

    let touched: BTreeSet<Attribute> = stmts.iter().flat_map(|s| s.attributes()).collect();
    if touched != declared {
        let orphans: Vec<_> = touched.difference(&declared).collect();
        let unused: Vec<_> = declared.difference(&touched).collect();
        return Err(inconsistent(format!(
            "attribute sets differ (undeclared: {orphans:?}, unused: {unused:?})"
        )));
    }

    for stmt in stmts {
        if let Stmt::Assign { target, value } = stmt {
            let writable = attributes
                .iter()
                .any(|d| d.attribute == *target && d.mode.writes());
            if !writable {
                return Err(inconsistent(format!("{target} is assigned but not declared writable")));
            }

            let (shared, inline) = (value.uses_shared_random(), value.draws_inline());
            let expected = match config.random {
                RandomMode::Off => (false, false),
                RandomMode::Uniform => (true, false),
                RandomMode::PerComponent => (false, true),
            };
            if (shared, inline) != expected {
                return Err(inconsistent(format!(
                    "{target} uses shared random: {shared}, draws inline: {inline}; {:?} randomness expects {expected:?}",
                    config.random
                )));
            }

            let mut reads = BTreeSet::new();
            value.collect_attributes(&mut reads);
            for a in reads {
                let readable = attributes
                    .iter()
                    .any(|d| d.attribute == a && d.mode.reads());
                if !readable {
                    return Err(inconsistent(format!("{a} is read but not declared readable")));
                }
            }
        }
    }

    let active: BTreeSet<_> = params.iter().map(|p| p.name).collect();
    for stmt in stmts {
        for p in stmt.params() {
            if !active.contains(&p.name) {
                return Err(inconsistent(format!("parameter {} is referenced but not active", p.name)));
            }
            if p.lane.is_some() == (config.size_mode == SizeMode::X) {
                return Err(inconsistent(format!(
                    "parameter {} has the wrong swizzle for size mode {}",
                    p.name, config.size_mode
                )));
            }
        }
    }

    let assigns = stmts
        .iter()
        .filter(|s| matches!(s, Stmt::Assign { .. }))
        .count();
    let shared = stmts.iter().filter(|s| matches!(s, Stmt::SharedRandom)).count();
    let expected_shared = usize::from(config.random == RandomMode::Uniform);
    if assigns != config.size_mode.component_count() || shared != expected_shared {
        return Err(inconsistent(format!(
            "expected {} assignments and {expected_shared} shared random line(s), got {assigns} and {shared}",
            config.size_mode.component_count()
        )));
    }
    if shared == 1 && stmts.first() != Some(&Stmt::SharedRandom) {
        return Err(inconsistent("shared random line must come first".to_string()));
    }

    Ok(())
}

/// Random helper the WGSL rendition of a fragment calls through `rand(&Seed)`.
const WGSL_RAND_FN: &str = "fn rand(seed: ptr<function, u32>) -> f32 {
    *seed = *seed * 1664525u + 1013904223u;
    return f32(*seed >> 8u) / 16777216.0f;
}
";

/// Wrap a WGSL fragment into a standalone module: parameters become function
/// arguments and attributes become locals.
pub fn wgsl_harness(fragment: &GeneratedFragment) -> Result<String> {
    if fragment.target != ShaderTarget::Wgsl {
        return Err(anyhow!(
            "WGSL harness requires a WGSL fragment, got {:?}",
            fragment.target
        ));
    }

    let args = fragment
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.wgsl()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut body = String::new();
    for d in &fragment.attributes {
        let decl = match d.attribute {
            Attribute::Seed => "    var Seed: u32 = 0u;\n".to_string(),
            a => format!("    var {a}: f32 = 0.0f;\n"),
        };
        body.push_str(&decl);
    }
    for line in &fragment.lines {
        body.push_str("    ");
        body.push_str(line);
        body.push('\n');
    }

    Ok(format!("{WGSL_RAND_FN}\nfn size_block({args}) {{\n{body}}}\n"))
}

/// Parse and validate WGSL source.
pub fn validate_wgsl(source: &str) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!("WGSL validation failed:\n{}", format_naga_error(source, &e)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("WGSL validation failed: {e:?}\n{}", numbered(source)))?;

    Ok(module)
}

/// Validate the WGSL rendition of a fragment.
pub fn validate_fragment_wgsl(fragment: &GeneratedFragment) -> Result<naga::Module> {
    let source = wgsl_harness(fragment)?;
    validate_wgsl(&source).with_context(|| format!("size block {:?} generated invalid WGSL", fragment.config))
}

fn format_naga_error(source: &str, error: &naga::front::wgsl::ParseError) -> String {
    format!("  {error}\n\nGenerated WGSL:\n{}", numbered(source))
}

fn numbered(source: &str) -> String {
    let mut output = String::from("---\n");
    for (line_num, line) in source.lines().enumerate() {
        output.push_str(&format!("{:4} | {}\n", line_num + 1, line));
    }
    output.push_str("---\n");
    output
}
