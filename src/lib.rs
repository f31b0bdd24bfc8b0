//! Code generation for variadic particle size blocks.
//!
//! A [`BlockConfig`] (size mode, composition, random mode) is turned into the
//! attribute declarations, the active input parameters and the shader source of
//! one size block. See [`block`] for the entry points.

pub mod block;
pub mod config;
pub mod error;

pub use block::{
    FragmentCache, GeneratedFragment, ShaderTarget, display_name, generate_fragment, generate_source,
    generate_source_for, list_active_parameters, list_active_parameters_with, list_attribute_declarations,
};
pub use config::{BlockConfig, CompositionMode, RandomMode, SizeMode};
pub use error::FragmentError;
