//! Headless view state.
//!
//! The screens keep no rendering concerns: they hold what is displayed and
//! turn user actions into client or monitor calls, reporting the outcome
//! through an [`ActionStatus`] line and a [`NotificationCenter`] toast.

pub mod action_status;
pub mod monitor_panel;
pub mod notification;
pub mod session_form;
pub mod sessions_view;

pub use action_status::{ActionPhase, ActionStatus};
pub use monitor_panel::MonitorPanel;
pub use notification::{Notification, NotificationCenter, NotificationKind};
pub use session_form::{parse_projects, FormError, SessionForm};
pub use sessions_view::{launch_failure_message, ConfirmationState, SessionsView};

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Sessions,
    Monitor,
    Archives,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Sessions, Tab::Monitor, Tab::Archives, Tab::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Sessions => "Sessions",
            Tab::Monitor => "Monitor",
            Tab::Archives => "Archives",
            Tab::Settings => "Settings",
        }
    }
}
