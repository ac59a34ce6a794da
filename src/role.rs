//! Role Classification
//!
//! Decides which block of the assembled component a sibling file becomes.
//! Roles are tested in declaration order against the full file name, so a
//! pattern may look at compound suffixes (`.scoped.css`) and not only at the
//! final extension.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// The block a sibling file contributes to the assembled component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Template,
    Script,
    Style,
    /// Fallback for files no declared role matches.
    Custom,
}

impl Role {
    /// Roles that can carry patterns, in classification order.
    pub const DECLARED: [Role; 3] = [Role::Template, Role::Script, Role::Style];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Template => "template",
            Role::Script => "script",
            Role::Style => "style",
            Role::Custom => "custom",
        }
    }

    /// Parse a declared role name. `custom` is implicit and never declared.
    pub fn from_declared_name(name: &str) -> Option<Role> {
        Role::DECLARED.into_iter().find(|role| role.as_str() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from declared role to the patterns that select it.
#[derive(Debug, Clone)]
pub struct RolePatternSet {
    rules: Vec<(Role, Vec<Regex>)>,
}

impl RolePatternSet {
    /// Build a pattern set. Rules are kept in the given order; a `Custom`
    /// entry is ignored since that role is the fallback.
    pub fn new(rules: Vec<(Role, Vec<Regex>)>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|(role, _)| *role != Role::Custom)
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[(Role, Vec<Regex>)] {
        &self.rules
    }
}

lazy_static! {
    static ref DEFAULT_PATTERNS: RolePatternSet = {
        fn compile(sources: &[&str]) -> Vec<Regex> {
            sources.iter().map(|src| Regex::new(src).unwrap()).collect()
        }

        RolePatternSet::new(vec![
            (Role::Template, compile(&[r"\.html$", r"\.pug$", r"\.jade$"])),
            (
                Role::Script,
                compile(&[r"\.js$", r"\.ts$", r"\.jsx$", r"\.tsx$", r"\.coffee$"]),
            ),
            (
                Role::Style,
                compile(&[r"\.css$", r"\.scss$", r"\.sass$", r"\.less$", r"\.styl$"]),
            ),
        ])
    };
}

impl Default for RolePatternSet {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

/// Classify a file name: the first declared role with a matching pattern
/// wins, anything else is `Custom`.
pub fn classify(file_name: &str, patterns: &RolePatternSet) -> Role {
    patterns
        .rules
        .iter()
        .find(|(_, regexes)| regexes.iter().any(|re| re.is_match(file_name)))
        .map(|(role, _)| *role)
        .unwrap_or(Role::Custom)
}

/// Substring after the last `.`, or empty when the name has no dot.
pub fn extension_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults() {
        let patterns = RolePatternSet::default();

        assert_eq!(classify("component.vue.html", &patterns), Role::Template);
        assert_eq!(classify("component.vue.pug", &patterns), Role::Template);
        assert_eq!(classify("component.vue.ts", &patterns), Role::Script);
        assert_eq!(classify("component.vue.coffee", &patterns), Role::Script);
        assert_eq!(classify("component.vue.scoped.scss", &patterns), Role::Style);
        assert_eq!(classify("component.vue.docs", &patterns), Role::Custom);
        assert_eq!(classify("component", &patterns), Role::Custom);
    }

    #[test]
    fn test_classify_first_declared_role_wins() {
        let any = || vec![Regex::new(r"\.md$").unwrap()];
        let patterns = RolePatternSet::new(vec![(Role::Style, any()), (Role::Template, any())]);

        assert_eq!(classify("readme.vue.md", &patterns), Role::Style);
    }

    #[test]
    fn test_custom_rules_are_dropped() {
        let patterns = RolePatternSet::new(vec![(Role::Custom, vec![Regex::new(".").unwrap()])]);

        assert!(patterns.rules().is_empty());
        assert_eq!(classify("a.vue.html", &patterns), Role::Custom);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("component.vue.scss"), "scss");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::from_declared_name("script"), Some(Role::Script));
        assert_eq!(Role::from_declared_name("custom"), None);
        assert_eq!(Role::Template.to_string(), "template");
    }
}
