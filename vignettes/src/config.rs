//! Configuration of all vignettes, loaded from a TOML file.
//!
//! ```toml
//! seed = 7
//!
//! [barn]
//! door_displacement = 30.0
//!
//! [folding_two]
//! values = [2, 4, 6]
//! velocity = 240.0
//! ```
//!
//! Every section is optional, missing values fall back to the defaults of each vignette.

use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use derive_more::{Display, Error};
use log::debug;
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use vignettes_animation::InvalidConfiguration;

use crate::{Barn, BarnConfig, Bike, BikeConfig, Folding, FoldingConfig, FoldingSection, Vignette};

/// Intermediate representation for deserializing configuration files.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    seed: Option<u64>,
    barn: BarnConfig,
    bike: BikeConfig,
    folding_one: FoldingSection,
    folding_two: FoldingSection,
    folding_nested: FoldingSection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Seeds the random choices of all vignettes. Without one, every run differs.
    pub seed: Option<u64>,
    pub barn: BarnConfig,
    pub bike: BikeConfig,
    pub folding_one: FoldingConfig,
    pub folding_two: FoldingConfig,
    pub folding_nested: FoldingConfig,
}

impl Default for Config {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            seed: file.seed,
            barn: file.barn,
            bike: file.bike,
            folding_one: FoldingConfig::one().apply(file.folding_one),
            folding_two: FoldingConfig::two().apply(file.folding_two),
            folding_nested: FoldingConfig::nested().apply(file.folding_nested),
        }
    }
}

impl Config {
    pub fn from_toml(toml: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(toml).context("Failed to parse TOML configuration")?;
        Ok(file.into())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let toml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read toml file: {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&toml)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn rng(&self) -> StdRng {
        self.seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy)
    }

    /// Builds the vignette `kind` from its configuration.
    pub fn build(&self, kind: VignetteKind) -> Result<Box<dyn Vignette>, InvalidConfiguration> {
        let vignette: Box<dyn Vignette> = match kind {
            VignetteKind::Barn => Box::new(Barn::new(self.barn.clone(), self.rng())?),
            VignetteKind::Bike => Box::new(Bike::new(self.bike.clone(), self.rng())?),
            VignetteKind::FoldingOne => Box::new(Folding::one(self.folding_one.clone())?),
            VignetteKind::FoldingTwo => Box::new(Folding::two(self.folding_two.clone())?),
            VignetteKind::FoldingNested => {
                Box::new(Folding::nested(self.folding_nested.clone())?)
            }
        };
        Ok(vignette)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum VignetteKind {
    #[display("barn")]
    Barn,
    #[display("bike")]
    Bike,
    #[display("folding-one")]
    FoldingOne,
    #[display("folding-two")]
    FoldingTwo,
    #[display("folding-nested")]
    FoldingNested,
}

impl VignetteKind {
    pub const ALL: [VignetteKind; 5] = [
        VignetteKind::Barn,
        VignetteKind::Bike,
        VignetteKind::FoldingOne,
        VignetteKind::FoldingTwo,
        VignetteKind::FoldingNested,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown vignette {name:?}")]
pub struct UnknownVignette {
    pub name: String,
}

impl FromStr for VignetteKind {
    type Err = UnknownVignette;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| UnknownVignette { name: s.into() })
    }
}
