//! Change notifications for views that mirror wizard state.

use mapgen_model::Project;

use crate::WizardStep;

/// What part of the wizard state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    DataSourcesChanged,
    TablesChanged,
    ColumnsChanged,
    MappingsChanged,
    /// The whole project was replaced, e.g. by loading a configuration.
    Reset,
}

/// Subscriber to wizard state.
///
/// `step_entered` runs before a step is considered shown, so a view can
/// refresh its display cache from `project` first.
pub trait WizardObserver {
    fn state_changed(&mut self, change: StateChange, project: &Project);

    fn step_entered(&mut self, step: WizardStep, project: &Project) {
        let _ = (step, project);
    }
}
