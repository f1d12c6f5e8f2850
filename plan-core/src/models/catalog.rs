use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

const DEFAULT_FABRICS: &[&str] = &[
    "Cotton",
    "Polyester",
    "Silk",
    "Linen",
    "Wool",
    "Rayon",
    "Denim",
    "Nylon",
    "Viscose",
    "Spandex",
];

const DEFAULT_PROCESSES: &[&str] = &[
    "Knitting",
    "Weaving",
    "Dyeing",
    "Printing",
    "Washing",
    "Compacting",
    "Embroidery",
    "Finishing",
];

const DEFAULT_STAGES: &[&str] = &["Cutting", "Stitching", "Checking", "Ironing", "Packing"];

static GLOBAL: OnceLock<Arc<Catalog>> = OnceLock::new();

/// Fixed enumerations that constrain fabric names, processes and skipped
/// stages.
///
/// One instance is shared by the whole process. It is either installed
/// explicitly at startup with [`Catalog::install`] or falls back to the
/// built-in lists the first time [`Catalog::global`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub fabrics: Vec<String>,
    pub processes: Vec<String>,
    pub stages: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            fabrics: owned(DEFAULT_FABRICS),
            processes: owned(DEFAULT_PROCESSES),
            stages: owned(DEFAULT_STAGES),
        }
    }
}

impl Catalog {
    /// The process-wide catalog.
    pub fn global() -> Arc<Catalog> {
        GLOBAL.get_or_init(|| Arc::new(Catalog::default())).clone()
    }

    /// Install `catalog` as the process-wide catalog.
    ///
    /// Only the first call wins; once [`Catalog::global`] has been read the
    /// catalog is frozen and the rejected value is handed back.
    pub fn install(catalog: Catalog) -> Result<(), Catalog> {
        GLOBAL
            .set(Arc::new(catalog))
            .map_err(|rejected| Arc::unwrap_or_clone(rejected))
    }

    pub fn has_fabric(&self, name: &str) -> bool {
        self.fabrics.iter().any(|f| f == name)
    }

    pub fn has_process(&self, process: &str) -> bool {
        self.processes.iter().any(|p| p == process)
    }

    pub fn has_stage(&self, stage: &str) -> bool {
        self.stages.iter().any(|s| s == stage)
    }

    /// Catalog fabrics not present in `used`, in catalog order.
    pub fn available_fabrics<'a, I>(&self, used: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let used: Vec<&str> = used.into_iter().collect();
        self.fabrics
            .iter()
            .filter(|f| !used.contains(&f.as_str()))
            .cloned()
            .collect()
    }
}
