//! Target adapters for refract.
//!
//! This crate turns a parsed component into Svelte or Vue source. Each
//! adapter produces structured script declarations plus a markup string;
//! [`TargetAdapter::assemble`] joins them into a single component file.

pub mod class_binding;
pub mod declarations;
pub mod expr;
pub mod imports;
pub mod shared;
pub mod svelte;
pub mod traits;
pub mod vue;

pub use declarations::{Declaration, Idiom, PropBinding, TypeMember};
pub use svelte::SvelteAdapter;
pub use traits::{GenerateError, GenerateOptions, GeneratedCode, Target, TargetAdapter};
pub use vue::VueAdapter;

/// The adapter for `target`.
pub fn adapter_for(target: Target) -> Box<dyn TargetAdapter> {
    match target {
        Target::Svelte => Box::new(SvelteAdapter::new()),
        Target::Vue => Box::new(VueAdapter::new()),
    }
}
