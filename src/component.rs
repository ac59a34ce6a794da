//! Component Assembly
//!
//! Accumulates the sibling files of one component and synthesizes the single
//! file component that references them.
//!
//! ## Invariants
//!
//! 1. **One template, one script**: a second file of either role fails at
//!    `add` time and leaves the accumulated state untouched.
//! 2. **Primary block**: `build` needs a template or a script.
//! 3. **Block order**: template, script, styles, customs. Styles and customs
//!    keep insertion order.
//! 4. **Single use**: `build` consumes the assembler.

use tracing::trace;

use crate::error::{ComponentError, Result};
use crate::options::LoaderOptions;
use crate::role::{classify, extension_of, Role};

/// Marks a block whose content lives in a separate file.
const SEPARATED_ATTR: &str = "separated";
const SCOPED_MARKER: &str = "scoped.";

#[derive(Debug)]
pub struct ComponentAssembler<'a> {
    name: String,
    options: &'a LoaderOptions,
    template: Option<String>,
    script: Option<String>,
    styles: Vec<String>,
    customs: Vec<String>,
}

impl<'a> ComponentAssembler<'a> {
    pub fn new(name: impl Into<String>, options: &'a LoaderOptions) -> Self {
        Self {
            name: name.into(),
            options,
            template: None,
            script: None,
            styles: Vec::new(),
            customs: Vec::new(),
        }
    }

    pub fn add(&mut self, file: &str) -> Result<()> {
        let role = classify(file, &self.options.extensions);
        trace!(component = %self.name, file, %role, "classified component file");

        match role {
            Role::Template => set_once(&mut self.template, file, &self.name, role),
            Role::Script => set_once(&mut self.script, file, &self.name, role),
            Role::Style => {
                self.styles.push(file.to_string());
                Ok(())
            }
            Role::Custom => {
                self.customs.push(file.to_string());
                Ok(())
            }
        }
    }

    pub fn build(self) -> Result<String> {
        if self.template.is_none() && self.script.is_none() {
            return Err(ComponentError::MissingPrimaryBlock {
                component: self.name,
            });
        }

        let mut result = String::new();

        if let Some(template) = &self.template {
            result.push_str(&block("template", template, Some(lang_of(template)), false));
        }

        if let Some(script) = &self.script {
            result.push_str(&block("script", script, Some(lang_of(script)), false));
        }

        for style in &self.styles {
            let scoped = self.is_scoped(style);
            result.push_str(&block("style", style, Some(lang_of(style)), scoped));
        }

        for custom in &self.customs {
            result.push_str(&block(extension_of(custom), custom, None, false));
        }

        Ok(result)
    }

    /// `scoped.` between the first and second base-match split points.
    fn is_scoped(&self, file: &str) -> bool {
        self.options
            .test
            .split(file)
            .nth(1)
            .map(|suffix| suffix.contains(SCOPED_MARKER))
            .unwrap_or(false)
    }
}

fn set_once(slot: &mut Option<String>, file: &str, component: &str, role: Role) -> Result<()> {
    if slot.is_some() {
        return Err(ComponentError::DuplicateRole {
            component: component.to_string(),
            role,
        });
    }
    *slot = Some(file.to_string());
    Ok(())
}

fn lang_of(file: &str) -> String {
    extension_of(file).to_lowercase()
}

fn block(tag: &str, file: &str, lang: Option<String>, scoped: bool) -> String {
    let mut attrs = format!("{} src=\"./{}\"", SEPARATED_ATTR, file);
    if let Some(lang) = lang {
        attrs.push_str(&format!(" lang=\"{}\"", lang));
    }
    if scoped {
        attrs.push_str(" scoped");
    }
    format!("<{tag} {attrs}></{tag}>")
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
