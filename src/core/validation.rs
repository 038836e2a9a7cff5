use crate::core::node::NodeId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Evaluating the network is guaranteed to fail.
    Error,
    /// Some part of the network cannot be evaluated.
    Warning,
}

/// A problem found in a network's wiring, optionally tied to the node it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub node: Option<NodeId>,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "[{}] {}", node, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The result of [`Network::validate`](crate::core::network::Network::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, severity: Severity, node: Option<NodeId>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity,
            node,
            message: message.into(),
        });
    }

    pub fn error(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        self.report(Severity::Error, node, message);
    }

    pub fn warning(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        self.report(Severity::Warning, node, message);
    }

    /// No issue of error severity was found.
    pub fn is_safe(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    /// Issues reported against node `id`.
    pub fn for_node(&self, id: NodeId) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.node == Some(id))
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn log_summary(&self) {
        if self.issues.is_empty() {
            log::info!("Network validation passed: every input is resolvable.");
            return;
        }

        for issue in &self.issues {
            match issue.severity {
                Severity::Error => log::error!("{}", issue),
                Severity::Warning => log::warn!("{}", issue),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issues_grouped_by_severity_and_node() {
        let node = NodeId::new();
        let mut result = ValidationResult::new();
        assert!(result.is_safe());

        result.warning(Some(node), "part of a cycle");
        assert!(result.is_safe());
        assert!(result.has_warnings());

        result.error(None, "no output node");
        assert!(!result.is_safe());
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.for_node(node).count(), 1);
        assert_eq!(result.errors().next().unwrap().to_string(), "no output node");
        assert!(result.warnings().next().unwrap().to_string().starts_with('['));
    }
}
