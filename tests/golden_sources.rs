use std::path::PathBuf;

use node_forge_vfx_blocks::{
    BlockConfig, ShaderTarget, block::BuiltinParamBundles, display_name, generate_fragment,
};

fn case_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
        .join("size_block")
}

/// Every configuration's source, each preceded by a `// <display name>` header.
fn render_all(target: ShaderTarget) -> String {
    BlockConfig::all()
        .iter()
        .map(|cfg| {
            let frag = generate_fragment(cfg, target, &BuiltinParamBundles)
                .unwrap_or_else(|e| panic!("{cfg:?}: generate failed: {e:#}"));
            format!("// {}\n{}", display_name(cfg), frag.source_text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_golden(file_name: &str, target: ShaderTarget) {
    let path = case_dir().join(file_name);
    let actual = render_all(target);

    if std::env::var("UPDATE_GOLDENS").is_ok_and(|v| v != "0") {
        std::fs::write(&path, &actual).unwrap_or_else(|e| panic!("write {:?}: {e}", path));
        return;
    }

    let expected =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {:?}: {e}", path));
    assert_eq!(
        actual.replace("\r\n", "\n"),
        expected.replace("\r\n", "\n"),
        "{file_name}: generated source drifted from golden (rerun with UPDATE_GOLDENS=1 to accept)"
    );
}

#[test]
fn hlsl_sources_match_golden() {
    check_golden("all_configs.hlsl", ShaderTarget::Hlsl);
}

#[test]
fn wgsl_sources_match_golden() {
    check_golden("all_configs.wgsl", ShaderTarget::Wgsl);
}
