//! Core type definitions for the size block.

use std::fmt;

use serde::Serialize;

use super::expr::ShaderTarget;
use crate::config::{BlockConfig, SizeMode};

/// Shader value type of a block input parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    Float,
    Float2,
    Float3,
}

impl ValueType {
    /// The parameter type used for a size mode: one lane per component.
    pub fn for_size_mode(mode: SizeMode) -> Self {
        match mode {
            SizeMode::X => ValueType::Float,
            SizeMode::XY => ValueType::Float2,
            SizeMode::XYZ => ValueType::Float3,
        }
    }

    /// Returns the HLSL type name for this value type.
    pub fn hlsl(self) -> &'static str {
        match self {
            ValueType::Float => "float",
            ValueType::Float2 => "float2",
            ValueType::Float3 => "float3",
        }
    }

    /// Returns the WGSL type name for this value type.
    pub fn wgsl(self) -> &'static str {
        match self {
            ValueType::Float => "f32",
            ValueType::Float2 => "vec2f",
            ValueType::Float3 => "vec3f",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hlsl())
    }
}

/// Default value of a block input parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f32),
    Float2([f32; 2]),
    Float3([f32; 3]),
}

impl ParamValue {
    /// Broadcast a scalar over every lane of `ty`.
    pub fn splat(ty: ValueType, v: f32) -> Self {
        match ty {
            ValueType::Float => ParamValue::Float(v),
            ValueType::Float2 => ParamValue::Float2([v; 2]),
            ValueType::Float3 => ParamValue::Float3([v; 3]),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            ParamValue::Float(_) => ValueType::Float,
            ParamValue::Float2(_) => ValueType::Float2,
            ParamValue::Float3(_) => ValueType::Float3,
        }
    }
}

/// One scalar lane of a size block. Lanes map 1:1 onto size attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    X,
    Y,
    Z,
}

impl Component {
    /// Components active for a size mode, in X, Y, Z order.
    pub fn active(mode: SizeMode) -> &'static [Component] {
        static ALL: [Component; 3] = [Component::X, Component::Y, Component::Z];
        &ALL[..mode.component_count()]
    }

    /// Swizzle suffix used on vector parameters.
    pub fn suffix(self) -> &'static str {
        match self {
            Component::X => ".x",
            Component::Y => ".y",
            Component::Z => ".z",
        }
    }

    pub fn attribute(self) -> Attribute {
        match self {
            Component::X => Attribute::SizeX,
            Component::Y => Attribute::SizeY,
            Component::Z => Attribute::SizeZ,
        }
    }
}

/// Particle attributes a size block can depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Attribute {
    Age,
    Lifetime,
    Seed,
    SizeX,
    SizeY,
    SizeZ,
}

impl Attribute {
    /// Identifier used for the attribute in generated source.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Age => "Age",
            Attribute::Lifetime => "Lifetime",
            Attribute::Seed => "Seed",
            Attribute::SizeX => "SizeX",
            Attribute::SizeY => "SizeY",
            Attribute::SizeZ => "SizeZ",
        }
    }

    pub fn is_size(self) -> bool {
        matches!(self, Attribute::SizeX | Attribute::SizeY | Attribute::SizeZ)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeAccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AttributeAccessMode {
    pub fn reads(self) -> bool {
        matches!(self, AttributeAccessMode::Read | AttributeAccessMode::ReadWrite)
    }

    pub fn writes(self) -> bool {
        matches!(self, AttributeAccessMode::Write | AttributeAccessMode::ReadWrite)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeDeclaration {
    pub attribute: Attribute,
    pub mode: AttributeAccessMode,
}

impl AttributeDeclaration {
    pub fn new(attribute: Attribute, mode: AttributeAccessMode) -> Self {
        Self { attribute, mode }
    }
}

/// Canonical input parameter names, in bundle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ParamName {
    Value,
    Min,
    Max,
    Blend,
}

impl ParamName {
    pub const ALL: [ParamName; 4] = [ParamName::Value, ParamName::Min, ParamName::Max, ParamName::Blend];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Value => "Value",
            ParamName::Min => "Min",
            ParamName::Max => "Max",
            ParamName::Blend => "Blend",
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed, default-valued block input.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputParameterSpec {
    pub name: ParamName,
    pub ty: ValueType,
    pub default: ParamValue,
    /// Inspector hint, if any.
    pub tooltip: Option<&'static str>,
    /// Inclusive slider range, if any. Not enforced by generated code.
    pub range: Option<(f32, f32)>,
}

impl InputParameterSpec {
    pub fn new(name: ParamName, default: ParamValue) -> Self {
        Self {
            name,
            ty: default.value_type(),
            default,
            tooltip: None,
            range: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: &'static str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some((min, max));
        self
    }
}

/// Everything generated for one block configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedFragment {
    pub config: BlockConfig,
    pub target: ShaderTarget,
    pub attributes: Vec<AttributeDeclaration>,
    pub parameters: Vec<InputParameterSpec>,
    /// Source lines without trailing newlines.
    pub lines: Vec<String>,
}

impl GeneratedFragment {
    /// The fragment as text, every line newline-terminated.
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
