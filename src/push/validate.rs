//! Consistency checks over deployment parameter sets.

use thiserror::Error;

use crate::domain::AppParams;

/// A mutually exclusive combination of route settings on one application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("application {app} must not be configured with both 'routes' and 'hosts'")]
    RoutesWithHosts { app: String },

    #[error("application {app} must not be configured with both 'routes' and 'domains'")]
    RoutesWithDomains { app: String },

    #[error(
        "application {app} must not be configured with both 'routes' and have 'no-hostname' set to 'true'"
    )]
    RoutesWithNoHostname { app: String },
}

impl ValidationError {
    /// Name of the offending application
    pub fn app(&self) -> &str {
        match self {
            ValidationError::RoutesWithHosts { app }
            | ValidationError::RoutesWithDomains { app }
            | ValidationError::RoutesWithNoHostname { app } => app,
        }
    }
}

fn non_empty(values: &Option<Vec<String>>) -> bool {
    values.as_ref().is_some_and(|v| !v.is_empty())
}

/// Check every parameter set, collecting all violations.
///
/// Returns `None` when nothing is wrong, never `Some(vec![])`.
pub fn validate_app_params(apps: &[AppParams]) -> Option<Vec<ValidationError>> {
    let mut errors = Vec::new();

    for app in apps.iter().filter(|app| !app.routes.is_empty()) {
        if non_empty(&app.hosts) {
            errors.push(ValidationError::RoutesWithHosts {
                app: app.name.clone(),
            });
        }
        if non_empty(&app.domains) {
            errors.push(ValidationError::RoutesWithDomains {
                app: app.name.clone(),
            });
        }
        if app.no_hostname {
            errors.push(ValidationError::RoutesWithNoHostname {
                app: app.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}
