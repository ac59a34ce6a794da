//! # Vue Multi-File Component Assembly
//!
//! Builds a single file component out of sibling files that share a base
//! name: `card.vue.html`, `card.vue.ts` and `card.vue.scoped.scss` become
//!
//! ```text
//! <template separated src="./card.vue.html" lang="html"></template>
//! <script separated src="./card.vue.ts" lang="ts"></script>
//! <style separated src="./card.vue.scoped.scss" lang="scss" scoped></style>
//! ```
//!
//! ## Assembly Invariants
//!
//! 1. **Roles**: every file is a template, script, style or custom block.
//!    Roles are picked by the first matching pattern, custom is the fallback.
//! 2. **Uniqueness**: a component has at most one template and one script,
//!    and needs at least one of them.
//! 3. **Order**: template, script, styles, customs. Styles and customs keep
//!    the order they were added in.
//! 4. **Existing components win**: a `<name>.vue` sibling is returned as is.
//!
//! The `napi` feature exposes the loader to a Node build host.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod component;
mod discovery;
mod error;
mod loader;
mod options;
mod plugin;
mod role;

pub use component::ComponentAssembler;
pub use discovery::{
    component_name, discover_components, find_component_files, find_precomposed,
    ComponentLocation,
};
pub use error::{ComponentError, Result, LOADER_NAME, PLUGIN_NAME};
pub use loader::{
    assemble, assemble_directory, load_component, load_named_component, AssembledComponent,
};
pub use options::{parse_test_pattern, LoaderOptions, RegExpSource, DEFAULT_TEST};
pub use plugin::{
    HostPipeline, LoaderUse, ModuleRule, ModuleSection, MultiFileComponentPlugin, PipelineConfig,
    PluginOptions, Transform, ASSEMBLED_QUERY_MARKER, DEFAULT_LOADER, VUE_LOADER,
    VUE_LOADER_PLUGIN,
};
pub use role::{classify, extension_of, Role, RolePatternSet};

#[cfg(feature = "napi")]
fn to_napi_error(err: ComponentError) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}

#[cfg(feature = "napi")]
fn loader_options(options_json: Option<String>) -> napi::Result<LoaderOptions> {
    LoaderOptions::from_json(options_json.as_deref().unwrap_or_default()).map_err(to_napi_error)
}

/// Loader entry point: source of the single file component for a resource.
#[cfg(feature = "napi")]
#[napi]
pub fn load_component_native(
    resource_path: String,
    context: String,
    options_json: Option<String>,
) -> napi::Result<String> {
    let options = loader_options(options_json)?;
    load_component(
        std::path::Path::new(&resource_path),
        std::path::Path::new(&context),
        &options,
    )
    .map_err(to_napi_error)
}

#[cfg(feature = "napi")]
#[napi]
pub fn assemble_directory_native(
    root: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options = loader_options(options_json)?;
    let assembled =
        assemble_directory(std::path::Path::new(&root), &options).map_err(to_napi_error)?;
    serde_json::to_value(assembled).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Register the plugin after the host's own `registered` plugins and return
/// the loaders its rule applies to a request with `resource_query`.
#[cfg(feature = "napi")]
#[napi]
pub fn plugin_rule_uses_native(
    registered: Vec<String>,
    options_json: Option<String>,
    resource_query: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options = PluginOptions::from_json(options_json.as_deref().unwrap_or_default())
        .map_err(to_napi_error)?;

    let mut pipeline = HostPipeline::new(PipelineConfig::with_module());
    for name in registered {
        pipeline.register_external(name);
    }
    pipeline
        .register(&MultiFileComponentPlugin::new(options))
        .map_err(to_napi_error)?;

    let uses = pipeline
        .config()
        .module
        .as_ref()
        .and_then(|module| module.rules.first())
        .map(|rule| rule.uses_for(resource_query.as_deref()))
        .unwrap_or_default();
    serde_json::to_value(uses).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn native_bridge() -> String {
    "Vue Multi-File Component Bridge Connected".to_string()
}
