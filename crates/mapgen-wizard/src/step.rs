//! Wizard navigation.
//!
//! The wizard is a fixed linear sequence; there is no skipping or branching.

use std::fmt;

/// The eight wizard steps, in order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    #[default]
    DatabaseConfig,
    AddTables,
    AddColumns,
    NoneMapping,
    DictMapping,
    ConstantMapping,
    ExternalConnection,
    GenerateCode,
}

impl WizardStep {
    pub const ALL: [WizardStep; 8] = [
        WizardStep::DatabaseConfig,
        WizardStep::AddTables,
        WizardStep::AddColumns,
        WizardStep::NoneMapping,
        WizardStep::DictMapping,
        WizardStep::ConstantMapping,
        WizardStep::ExternalConnection,
        WizardStep::GenerateCode,
    ];

    /// Position in the sequence, starting at 0.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DatabaseConfig => "databaseConfig",
            Self::AddTables => "addTables",
            Self::AddColumns => "addColumns",
            Self::NoneMapping => "noneMapping",
            Self::DictMapping => "dictMapping",
            Self::ConstantMapping => "constantMapping",
            Self::ExternalConnection => "externalConnection",
            Self::GenerateCode => "generateCode",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::DatabaseConfig => "Database configuration",
            Self::AddTables => "Add tables",
            Self::AddColumns => "Add columns",
            Self::NoneMapping => "Direct mappings",
            Self::DictMapping => "Dictionary mappings",
            Self::ConstantMapping => "Constant mappings",
            Self::ExternalConnection => "External connections",
            Self::GenerateCode => "Generate code",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|idx| Self::ALL[idx])
    }

    pub fn is_first(self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
