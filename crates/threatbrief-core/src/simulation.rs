//! Risk simulation: what-if scoring for security controls.
//!
//! Enabling a control subtracts its fixed weight from the assessed risk
//! score. The result depends only on the final toggle state, never on the
//! order the toggles were flipped, and never touches the assessment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A security control the simulator can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecurityControl {
    Mfa,
    Encryption,
    BackupSystem,
    SecurityTraining,
    Endpoint,
}

impl SecurityControl {
    pub const ALL: [SecurityControl; 5] = [
        SecurityControl::Mfa,
        SecurityControl::Encryption,
        SecurityControl::BackupSystem,
        SecurityControl::SecurityTraining,
        SecurityControl::Endpoint,
    ];

    /// Points subtracted from the risk score when enabled.
    pub fn weight(&self) -> u32 {
        match self {
            SecurityControl::Mfa => 15,
            SecurityControl::Encryption => 12,
            SecurityControl::BackupSystem => 10,
            SecurityControl::SecurityTraining => 8,
            SecurityControl::Endpoint => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SecurityControl::Mfa => "Multi-Factor Authentication",
            SecurityControl::Encryption => "Data Encryption",
            SecurityControl::BackupSystem => "Immutable Backup System",
            SecurityControl::SecurityTraining => "Security Awareness Training",
            SecurityControl::Endpoint => "Endpoint Detection & Response",
        }
    }

    /// Wire/CLI key, matching the toggle set's field names.
    pub fn key(&self) -> &'static str {
        match self {
            SecurityControl::Mfa => "mfa",
            SecurityControl::Encryption => "encryption",
            SecurityControl::BackupSystem => "backupSystem",
            SecurityControl::SecurityTraining => "securityTraining",
            SecurityControl::Endpoint => "endpoint",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn description(&self) -> String {
        format!("Reduces risk by ~{} points", self.weight())
    }
}

impl fmt::Display for SecurityControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which controls are switched on. View-only session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationToggleSet {
    #[serde(default)]
    pub mfa: bool,
    #[serde(default)]
    pub encryption: bool,
    #[serde(default)]
    pub backup_system: bool,
    #[serde(default)]
    pub security_training: bool,
    #[serde(default)]
    pub endpoint: bool,
}

impl SimulationToggleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle set with the given controls enabled.
    pub fn with(controls: &[SecurityControl]) -> Self {
        let mut set = Self::new();
        for control in controls {
            set.set(*control, true);
        }
        set
    }

    fn slot(&mut self, control: SecurityControl) -> &mut bool {
        match control {
            SecurityControl::Mfa => &mut self.mfa,
            SecurityControl::Encryption => &mut self.encryption,
            SecurityControl::BackupSystem => &mut self.backup_system,
            SecurityControl::SecurityTraining => &mut self.security_training,
            SecurityControl::Endpoint => &mut self.endpoint,
        }
    }

    pub fn is_enabled(&self, control: SecurityControl) -> bool {
        match control {
            SecurityControl::Mfa => self.mfa,
            SecurityControl::Encryption => self.encryption,
            SecurityControl::BackupSystem => self.backup_system,
            SecurityControl::SecurityTraining => self.security_training,
            SecurityControl::Endpoint => self.endpoint,
        }
    }

    pub fn set(&mut self, control: SecurityControl, enabled: bool) {
        *self.slot(control) = enabled;
    }

    /// Flip one control; returns its new state.
    pub fn toggle(&mut self, control: SecurityControl) -> bool {
        let slot = self.slot(control);
        *slot = !*slot;
        *slot
    }

    pub fn enabled(&self) -> impl Iterator<Item = SecurityControl> + '_ {
        SecurityControl::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
    }

    /// Sum of the weights of all enabled controls (at most 55).
    pub fn reduction(&self) -> u32 {
        self.enabled().map(|c| c.weight()).sum()
    }
}

/// Coarse label for a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskBand {
    Low,
    Elevated,
    High,
}

impl RiskBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            RiskBand::High
        } else if score >= 40 {
            RiskBand::Elevated
        } else {
            RiskBand::Low
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "Low"),
            RiskBand::Elevated => write!(f, "Elevated"),
            RiskBand::High => write!(f, "High"),
        }
    }
}

/// Result of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub original_score: u32,
    pub reduction: u32,
    pub new_score: u32,
}

impl SimulationOutcome {
    /// Reduction as a rounded percentage of the original score; 0 when the
    /// original score is 0.
    pub fn percentage(&self) -> u32 {
        reduction_percent(self.original_score, self.reduction)
    }

    pub fn original_band(&self) -> RiskBand {
        RiskBand::from_score(self.original_score)
    }

    pub fn new_band(&self) -> RiskBand {
        RiskBand::from_score(self.new_score)
    }
}

/// Apply the enabled controls to a 0-100 risk score.
pub fn simulate(score: u8, toggles: &SimulationToggleSet) -> SimulationOutcome {
    let original_score = u32::from(score);
    let reduction = toggles.reduction();
    SimulationOutcome {
        original_score,
        reduction,
        new_score: original_score.saturating_sub(reduction),
    }
}

/// `reduction / score * 100`, rounded half up. Defined as 0 for a zero score.
pub fn reduction_percent(score: u32, reduction: u32) -> u32 {
    if score == 0 {
        return 0;
    }
    (reduction * 100 + score / 2) / score
}
