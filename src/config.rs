//! Block configuration: the three settings a host edits on a size block.

use std::{collections::HashMap, fmt};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// How many size components the block drives (X = square sprites / uniform 3D,
/// XY = rectangle sprites, XYZ = 3D particles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum SizeMode {
    #[default]
    X,
    XY,
    XYZ,
}

impl SizeMode {
    pub const ALL: [SizeMode; 3] = [SizeMode::X, SizeMode::XY, SizeMode::XYZ];

    pub fn ordinal(self) -> usize {
        match self {
            SizeMode::X => 0,
            SizeMode::XY => 1,
            SizeMode::XYZ => 2,
        }
    }

    /// Number of scalar components touched by the block.
    pub fn component_count(self) -> usize {
        self.ordinal() + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeMode::X => "X",
            SizeMode::XY => "XY",
            SizeMode::XYZ => "XYZ",
        }
    }
}

impl fmt::Display for SizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the newly computed value is composed with the attribute's previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum CompositionMode {
    #[default]
    Overwrite,
    Additive,
    Multiply,
    Blend,
}

impl CompositionMode {
    pub const ALL: [CompositionMode; 4] = [
        CompositionMode::Overwrite,
        CompositionMode::Additive,
        CompositionMode::Multiply,
        CompositionMode::Blend,
    ];

    /// Verb used in block display names.
    pub fn label(self) -> &'static str {
        match self {
            CompositionMode::Overwrite => "Set",
            CompositionMode::Additive => "Add",
            CompositionMode::Multiply => "Multiply",
            CompositionMode::Blend => "Blend",
        }
    }
}

/// Whether the value is set directly or computed from a random range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum RandomMode {
    #[default]
    Off,
    Uniform,
    PerComponent,
}

impl RandomMode {
    pub const ALL: [RandomMode; 3] = [RandomMode::Off, RandomMode::Uniform, RandomMode::PerComponent];

    pub fn is_random(self) -> bool {
        self != RandomMode::Off
    }

    /// Suffix used in block display names; empty when randomization is off.
    pub fn label(self) -> &'static str {
        match self {
            RandomMode::Off => "",
            RandomMode::Uniform => "Random (Uniform)",
            RandomMode::PerComponent => "Random (Per-component)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    #[serde(default)]
    pub size_mode: SizeMode,
    #[serde(default)]
    pub composition: CompositionMode,
    #[serde(default)]
    pub random: RandomMode,
}

impl BlockConfig {
    pub fn new(size_mode: SizeMode, composition: CompositionMode, random: RandomMode) -> Self {
        Self {
            size_mode,
            composition,
            random,
        }
    }

    /// Every configuration the block can be put in, in a stable order.
    pub fn all() -> Vec<BlockConfig> {
        let mut out = Vec::with_capacity(36);
        for size_mode in SizeMode::ALL {
            for composition in CompositionMode::ALL {
                for random in RandomMode::ALL {
                    out.push(BlockConfig::new(size_mode, composition, random));
                }
            }
        }
        out
    }

    /// Build a config from a host node's param map.
    ///
    /// Missing keys fall back to the defaults (X / Overwrite / Off). Tokens are
    /// matched case-insensitively and accept a few editor aliases.
    pub fn from_params(params: &HashMap<String, serde_json::Value>) -> Result<Self> {
        let mut cfg = BlockConfig::default();
        if let Some(v) = parse_str(params, "sizeMode") {
            cfg.size_mode = parse_size_mode(v)?;
        }
        if let Some(v) = parse_str(params, "composition") {
            cfg.composition = parse_composition_mode(v)?;
        }
        if let Some(v) = parse_str(params, "random") {
            cfg.random = parse_random_mode(v)?;
        }
        Ok(cfg)
    }
}

fn parse_str<'a>(params: &'a HashMap<String, serde_json::Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn normalize_token(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "")
}

pub fn parse_size_mode(s: &str) -> Result<SizeMode> {
    Ok(match normalize_token(s).as_str() {
        "x" | "scalar" => SizeMode::X,
        "xy" | "pair" => SizeMode::XY,
        "xyz" | "triple" => SizeMode::XYZ,
        _ => bail!("unsupported sizeMode: {s}"),
    })
}

pub fn parse_composition_mode(s: &str) -> Result<CompositionMode> {
    Ok(match normalize_token(s).as_str() {
        "overwrite" | "set" => CompositionMode::Overwrite,
        "additive" | "add" => CompositionMode::Additive,
        "multiply" | "mul" => CompositionMode::Multiply,
        "blend" => CompositionMode::Blend,
        _ => bail!("unsupported composition: {s}"),
    })
}

pub fn parse_random_mode(s: &str) -> Result<RandomMode> {
    Ok(match normalize_token(s).as_str() {
        "off" | "none" => RandomMode::Off,
        "uniform" => RandomMode::Uniform,
        "percomponent" => RandomMode::PerComponent,
        _ => bail!("unsupported random: {s}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_params_empty() {
        let cfg = BlockConfig::from_params(&HashMap::new()).unwrap();
        assert_eq!(cfg, BlockConfig::new(SizeMode::X, CompositionMode::Overwrite, RandomMode::Off));
    }

    #[test]
    fn test_from_params_accepts_aliases() {
        let params = HashMap::from([
            ("sizeMode".to_string(), json!("xyz")),
            ("composition".to_string(), json!("Add")),
            ("random".to_string(), json!("per_component")),
        ]);
        let cfg = BlockConfig::from_params(&params).unwrap();
        assert_eq!(cfg.size_mode, SizeMode::XYZ);
        assert_eq!(cfg.composition, CompositionMode::Additive);
        assert_eq!(cfg.random, RandomMode::PerComponent);
    }

    #[test]
    fn test_from_params_rejects_unknown_token() {
        let params = HashMap::from([("random".to_string(), json!("sometimes"))]);
        let err = BlockConfig::from_params(&params).unwrap_err();
        assert!(format!("{err}").contains("sometimes"));
    }

    #[test]
    fn test_serde_camel_case_keys() {
        let cfg: BlockConfig =
            serde_json::from_value(json!({ "sizeMode": "XY", "composition": "Blend" })).unwrap();
        assert_eq!(cfg.size_mode, SizeMode::XY);
        assert_eq!(cfg.composition, CompositionMode::Blend);
        assert_eq!(cfg.random, RandomMode::Off);

        let back = serde_json::to_value(cfg).unwrap();
        assert_eq!(back["sizeMode"], json!("XY"));
    }

    #[test]
    fn test_all_configs_are_unique() {
        let all = BlockConfig::all();
        assert_eq!(all.len(), 36);
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }
}
