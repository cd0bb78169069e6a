//! Prefix rules that rewrite a source name into a category-bound target name.

use serde::{Deserialize, Serialize};

/// Strip `prefix`, optionally prepend `rewrite`, and look only in `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRule {
    pub prefix: String,
    pub category: String,
    #[serde(default)]
    pub rewrite: Option<String>,
}

impl TransformRule {
    pub fn new(prefix: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            category: category.into(),
            rewrite: None,
        }
    }

    #[must_use]
    pub fn with_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.rewrite = Some(rewrite.into());
        self
    }

    /// The transformed name, or `None` if the prefix does not match.
    pub fn apply(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix(self.prefix.as_str())?;
        Some(match &self.rewrite {
            Some(rewrite) => format!("{rewrite}{rest}"),
            None => rest.to_string(),
        })
    }
}

/// Result of running a name through the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome<'a> {
    Applied {
        name: String,
        category: &'a str,
        rule: &'a TransformRule,
    },
    NoRule,
}

/// Rules evaluated in declaration order; the first matching prefix wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformRules {
    rules: Vec<TransformRule>,
}

impl TransformRules {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            TransformRule::new("golang-", "dev-go"),
            TransformRule::new("jdk-", "dev-java"),
            TransformRule::new("mvn-", "dev-java"),
            TransformRule::new("perl-", "dev-perl"),
            TransformRule::new("php-", "dev-php"),
            TransformRule::new("pypi-", "dev-python"),
            TransformRule::new("python-", "dev-python"),
            TransformRule::new("rubygem-", "dev-ruby"),
            TransformRule::new("qt6", "dev-qt").with_rewrite("qt"),
            TransformRule::new("zope.", "dev-python").with_rewrite("zope-"),
            // Unreachable while "pypi-" precedes it
            TransformRule::new("pypi-zope.", "dev-python").with_rewrite("zope-"),
        ])
    }

    pub fn apply<'a>(&'a self, name: &str) -> TransformOutcome<'a> {
        for rule in &self.rules {
            if let Some(transformed) = rule.apply(name) {
                return TransformOutcome::Applied {
                    name: transformed,
                    category: rule.category.as_str(),
                    rule,
                };
            }
        }
        TransformOutcome::NoRule
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
