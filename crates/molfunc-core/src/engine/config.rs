use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_ANGLE_STEP_DEGREES: f64 = 5.0;
pub const DEFAULT_ANGLE_FORCE_CONSTANT: f64 = 1.0;
/// Finest rotation grid accepted, 36000 samples per fragment.
pub const MIN_ANGLE_STEP_DEGREES: f64 = 0.01;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Where a fragment's root atom is put relative to the core atom it bonds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondLengthMode {
    /// On the position of the core dummy atom it replaces.
    #[default]
    DummyPosition,
    /// Along the site bond, at the sum of the two covalent radii.
    CovalentRadii,
}

impl FromStr for BondLengthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dummy" | "dummy-position" => Ok(Self::DummyPosition),
            "covalent" | "covalent-radii" => Ok(Self::CovalentRadii),
            other => Err(ConfigError::InvalidParameter {
                name: "bond_length",
                reason: format!("unknown mode '{other}' (expected 'dummy' or 'covalent')"),
            }),
        }
    }
}

impl fmt::Display for BondLengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DummyPosition => f.write_str("dummy"),
            Self::CovalentRadii => f.write_str("covalent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Grid spacing of the rotation scan about each attachment bond.
    pub angle_step_degrees: f64,
    pub bond_length: BondLengthMode,
    pub angle_force_constant: f64,
    /// Whether workflows add motif angle potentials after placement.
    pub generate_angle_potentials: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            angle_step_degrees: DEFAULT_ANGLE_STEP_DEGREES,
            bond_length: BondLengthMode::default(),
            angle_force_constant: DEFAULT_ANGLE_FORCE_CONSTANT,
            generate_angle_potentials: false,
        }
    }
}

impl PlacementConfig {
    /// Checks the parameters that the builder checks, for configs built as literals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_angle_step(self.angle_step_degrees)?;
        check_force_constant(self.angle_force_constant)
    }

    /// Number of angles sampled per fragment: `ceil(360 / step)`.
    pub fn n_rotation_samples(&self) -> Result<usize, ConfigError> {
        let step = check_angle_step(self.angle_step_degrees)?;
        Ok((360.0 / step).ceil() as usize)
    }

    /// The sampled angles in degrees, starting at zero.
    pub fn rotation_angles(&self) -> Result<Vec<f64>, ConfigError> {
        let n = self.n_rotation_samples()?;
        Ok((0..n).map(|k| k as f64 * self.angle_step_degrees).collect())
    }
}

fn check_angle_step(step: f64) -> Result<f64, ConfigError> {
    if !(step >= MIN_ANGLE_STEP_DEGREES && step <= 360.0) {
        return Err(ConfigError::InvalidParameter {
            name: "angle_step_degrees",
            reason: format!("must be in [{MIN_ANGLE_STEP_DEGREES}, 360], got {step}"),
        });
    }
    Ok(step)
}

fn check_force_constant(k: f64) -> Result<(), ConfigError> {
    if !(k.is_finite() && k >= 0.0) {
        return Err(ConfigError::InvalidParameter {
            name: "angle_force_constant",
            reason: format!("must be finite and non-negative, got {k}"),
        });
    }
    Ok(())
}

#[derive(Default)]
pub struct PlacementConfigBuilder {
    angle_step_degrees: Option<f64>,
    bond_length: Option<BondLengthMode>,
    angle_force_constant: Option<f64>,
    generate_angle_potentials: Option<bool>,
}

impl PlacementConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle_step_degrees(mut self, step: f64) -> Self {
        self.angle_step_degrees = Some(step);
        self
    }
    pub fn bond_length(mut self, mode: BondLengthMode) -> Self {
        self.bond_length = Some(mode);
        self
    }
    pub fn angle_force_constant(mut self, k: f64) -> Self {
        self.angle_force_constant = Some(k);
        self
    }
    pub fn generate_angle_potentials(mut self, enabled: bool) -> Self {
        self.generate_angle_potentials = Some(enabled);
        self
    }

    /// Fills unset parameters with defaults and validates the result.
    pub fn build(self) -> Result<PlacementConfig, ConfigError> {
        let defaults = PlacementConfig::default();
        let config = PlacementConfig {
            angle_step_degrees: self
                .angle_step_degrees
                .unwrap_or(defaults.angle_step_degrees),
            bond_length: self.bond_length.unwrap_or(defaults.bond_length),
            angle_force_constant: self
                .angle_force_constant
                .unwrap_or(defaults.angle_force_constant),
            generate_angle_potentials: self
                .generate_angle_potentials
                .unwrap_or(defaults.generate_angle_potentials),
        };
        config.validate()?;
        Ok(config)
    }
}
