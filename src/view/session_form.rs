//! Session creation form.

use crate::rpc::LauncherApp;

/// Reasons a form submission is rejected before any backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingName,
    MissingLauncher,
    MissingProjects,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::MissingName => write!(f, "Please enter a session name"),
            FormError::MissingLauncher => write!(f, "Please select a launcher application"),
            FormError::MissingProjects => write!(f, "Please add at least one project path"),
        }
    }
}

impl std::error::Error for FormError {}

/// Splits newline-delimited paths, trimming each and dropping blank lines.
pub fn parse_projects(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub name: String,
    pub projects: Vec<String>,
    pub launcher: Option<LauncherApp>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionForm {
    pub name: String,
    /// One project path per line.
    pub project_paths: String,
    pub launcher: Option<LauncherApp>,
    pub visible: bool,
}

impl SessionForm {
    pub fn projects(&self) -> Vec<String> {
        parse_projects(&self.project_paths)
    }

    /// Checks name, then launcher (when required), then projects.
    pub fn validate(&self, require_launcher: bool) -> Result<ValidatedForm, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if require_launcher && self.launcher.is_none() {
            return Err(FormError::MissingLauncher);
        }
        let projects = self.projects();
        if projects.is_empty() {
            return Err(FormError::MissingProjects);
        }
        Ok(ValidatedForm {
            name: name.to_string(),
            projects,
            launcher: self.launcher.clone(),
        })
    }

    /// Clears the inputs, keeping visibility.
    pub fn reset(&mut self) {
        self.name.clear();
        self.project_paths.clear();
        self.launcher = None;
    }
}

#[cfg(test)]
#[path = "tests/session_form_tests.rs"]
mod tests;
