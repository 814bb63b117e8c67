//! On-disk project: the selected shirt, its designs and the customer details.

use std::path::Path;

use anyhow::Context as _;

use crate::design::entry::DesignEntry;
use crate::design::store::DesignStore;
use crate::foundation::error::StudioResult;
use crate::order::customer::CustomerInfo;
use crate::order::pricing::{PriceQuote, PricingConfig};
use crate::shirt::ShirtSelection;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    pub shirt: ShirtSelection,
    #[serde(default)]
    pub designs: Vec<DesignEntry>,
    #[serde(default)]
    pub customer: CustomerInfo,
}

impl Project {
    /// Read a project file. Designs are normalized on the way in.
    pub fn load(path: &Path) -> StudioResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read project '{}'", path.display()))?;
        let mut project: Project = serde_json::from_str(&text)?;
        project.designs = DesignStore::from_entries(project.designs).into_entries();
        Ok(project)
    }

    pub fn save(&self, path: &Path) -> StudioResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("write project '{}'", path.display()))?;
        Ok(())
    }

    pub fn quote(&self, pricing: &PricingConfig) -> PriceQuote {
        pricing.quote(self.shirt.model, self.designs.len())
    }
}
