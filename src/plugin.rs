//! Plugin Module
//!
//! Registration of the loader with a host build pipeline. Transforms declare
//! the transforms they must follow through [`Transform::requires`]; the
//! pipeline checks that declaration when a transform is registered.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ComponentError, Result, PLUGIN_NAME};
use crate::options::{default_test, parse_test_pattern, LoaderOptions, RegExpSource};

/// Companion transform that compiles the assembled single file component.
pub const VUE_LOADER_PLUGIN: &str = "VueLoaderPlugin";
pub const VUE_LOADER: &str = "vue-loader";
/// Loader requested for the assembly step unless the host overrides it.
pub const DEFAULT_LOADER: &str = "vue-multi-file-component/loader";
/// Query parameter the companion adds when it requests the blocks of an
/// assembled component. Those requests must not be assembled again.
pub const ASSEMBLED_QUERY_MARKER: &str = "vue";

pub trait Transform {
    fn name(&self) -> &str;

    /// Names of transforms that must already be registered.
    fn requires(&self) -> &[&'static str] {
        &[]
    }

    fn apply(&self, config: &mut PipelineConfig) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderUse {
    pub loader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ModuleRule {
    pub test: Regex,
    uses: Vec<LoaderUse>,
}

impl ModuleRule {
    pub fn new(test: Regex, uses: Vec<LoaderUse>) -> Self {
        Self { test, uses }
    }

    /// Loaders for a request with the given query string (`?a&b=c` or
    /// `a&b=c`). Requests carrying the assembled marker get none.
    pub fn uses_for(&self, resource_query: Option<&str>) -> Vec<LoaderUse> {
        match resource_query {
            Some(query) if has_marker(query) => Vec::new(),
            _ => self.uses.clone(),
        }
    }
}

fn has_marker(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .map(|param| param.split_once('=').map_or(param, |(key, _)| key))
        .any(|key| key == ASSEMBLED_QUERY_MARKER)
}

#[derive(Debug, Clone, Default)]
pub struct ModuleSection {
    pub rules: Vec<ModuleRule>,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub module: Option<ModuleSection>,
}

impl PipelineConfig {
    pub fn with_module() -> Self {
        Self {
            module: Some(ModuleSection::default()),
        }
    }
}

/// Host pipeline keeping registration order.
#[derive(Debug, Default)]
pub struct HostPipeline {
    config: PipelineConfig,
    registered: Vec<String>,
}

impl HostPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            registered: Vec::new(),
        }
    }

    pub fn register(&mut self, transform: &dyn Transform) -> Result<()> {
        for companion in transform.requires() {
            if !self.registered.iter().any(|name| name == companion) {
                return Err(ComponentError::RegistrationOrderViolation {
                    transform: transform.name().to_string(),
                    companion: companion.to_string(),
                });
            }
        }

        transform.apply(&mut self.config)?;
        debug!(transform = transform.name(), "registered transform");
        self.registered.push(transform.name().to_string());
        Ok(())
    }

    /// Record a transform the host registered on its own, such as the
    /// companion loader plugin.
    pub fn register_external(&mut self, name: impl Into<String>) {
        self.registered.push(name.into());
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registered(&self) -> &[String] {
        &self.registered
    }
}

#[derive(Debug, Clone)]
pub struct PluginOptions {
    pub test: Regex,
    pub loader: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            test: default_test(),
            loader: DEFAULT_LOADER.to_string(),
        }
    }
}

impl PluginOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(json).map_err(|e| ComponentError::InvalidConfiguration {
                origin: PLUGIN_NAME,
                option: "options".to_string(),
                reason: format!("is not valid JSON: {}", e),
            })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let raw: RawPluginOptions = serde_json::from_value(value.clone()).map_err(|e| {
            ComponentError::InvalidConfiguration {
                origin: PLUGIN_NAME,
                option: "options".to_string(),
                reason: format!("could not be decoded: {}", e),
            }
        })?;

        let test = match raw.test {
            Some(test) => parse_test_pattern(&test, PLUGIN_NAME)?,
            None => default_test(),
        };

        Ok(Self {
            test,
            loader: raw.loader.unwrap_or_else(|| DEFAULT_LOADER.to_string()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPluginOptions {
    #[serde(default)]
    test: Option<Value>,
    #[serde(default)]
    loader: Option<String>,
}

/// Routes multi-file component resources through the assembly loader and
/// then the companion loader.
#[derive(Debug, Clone, Default)]
pub struct MultiFileComponentPlugin {
    options: PluginOptions,
}

impl MultiFileComponentPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    /// Options the assembly loader receives from this plugin.
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions::with_test(self.options.test.clone())
    }

    fn rule(&self) -> ModuleRule {
        let test = RegExpSource::from_regex(&self.options.test);
        // Loaders run last to first: assemble, then compile.
        ModuleRule::new(
            self.options.test.clone(),
            vec![
                LoaderUse {
                    loader: VUE_LOADER.to_string(),
                    options: None,
                },
                LoaderUse {
                    loader: self.options.loader.clone(),
                    options: Some(json!({ "test": test })),
                },
            ],
        )
    }
}

impl Transform for MultiFileComponentPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn requires(&self) -> &[&'static str] {
        &[VUE_LOADER_PLUGIN]
    }

    fn apply(&self, config: &mut PipelineConfig) -> Result<()> {
        let module = config
            .module
            .as_mut()
            .ok_or_else(|| ComponentError::MissingHostSection {
                transform: PLUGIN_NAME.to_string(),
                section: "module",
            })?;
        module.rules.insert(0, self.rule());
        Ok(())
    }
}
