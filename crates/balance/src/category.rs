//! Record categories shown by the dashboard panels.
//!
//! A category is either a plain field of the record or a metric derived from
//! the record's fields. Derived categories are applied when a panel's records
//! are built, and evaluated again by the renderer for KPI cards.

use crate::codes::field;
use crate::metrics;
use crate::record::Kind;
use crate::record::Measure;
use crate::record::Record;

/// Computes a derived value from a record.
pub type Compute = fn(&Record) -> Option<f64>;

#[derive(Debug, Clone, Copy)]
pub enum Category {
    /// A field read from the record by name.
    Field {
        name: &'static str,
        label: &'static str,
        kind: Kind,
    },

    /// A metric computed from the record.
    Derived {
        name: &'static str,
        label: &'static str,
        kind: Kind,
        compute: Compute,
    },
}

impl Category {
    pub fn name(&self) -> &'static str {
        match *self {
            Category::Field { name, .. } | Category::Derived { name, .. } => name,
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Category::Field { label, .. } | Category::Derived { label, .. } => label,
        }
    }

    pub fn kind(&self) -> Kind {
        match *self {
            Category::Field { kind, .. } | Category::Derived { kind, .. } => kind,
        }
    }

    pub fn evaluate(&self, record: &Record) -> Option<f64> {
        match *self {
            Category::Field { name, .. } => record.get(name),
            Category::Derived { compute, .. } => compute(record),
        }
    }

    pub fn measure(&self, record: &Record) -> Measure {
        Measure::new(self.evaluate(record), self.kind())
    }
}

/// Evaluates the derived categories and stores their values in the record.
pub fn derive(record: &mut Record, categories: &[Category]) {
    for category in categories {
        if let Category::Derived { name, kind, .. } = *category {
            let value = category.evaluate(record);
            record.insert(name, value, kind);
        }
    }
}

/// Categories of the energy overview panel.
pub const ENERGY_OVERVIEW: [Category; 7] = [
    Category::Field {
        name: field::PRODUCTION,
        label: "Primary production",
        kind: Kind::Quantity,
    },
    Category::Field {
        name: field::IMPORTS,
        label: "Imports",
        kind: Kind::Quantity,
    },
    Category::Field {
        name: field::EXPORTS,
        label: "Exports",
        kind: Kind::Quantity,
    },
    Category::Field {
        name: field::CONSUMPTION,
        label: "Gross inland consumption",
        kind: Kind::Quantity,
    },
    Category::Derived {
        name: field::NET_IMPORTS,
        label: "Net imports",
        kind: Kind::Quantity,
        compute: net_imports,
    },
    Category::Derived {
        name: field::DEPENDENCE,
        label: "Energy dependency",
        kind: Kind::Percentage,
        compute: dependence,
    },
    Category::Derived {
        name: field::SELF_SUFFICIENCY,
        label: "Self-sufficiency",
        kind: Kind::Percentage,
        compute: self_sufficiency,
    },
];

/// Categories of the transformation panel.
pub const TRANSFORMATION: [Category; 5] = [
    Category::Field {
        name: field::INPUT,
        label: "Transformation input",
        kind: Kind::Quantity,
    },
    Category::Field {
        name: field::ELECTRICITY,
        label: "Electricity output",
        kind: Kind::Quantity,
    },
    Category::Field {
        name: field::HEAT,
        label: "Heat output",
        kind: Kind::Quantity,
    },
    Category::Derived {
        name: field::EFFICIENCY,
        label: "Transformation efficiency",
        kind: Kind::Percentage,
        compute: efficiency,
    },
    Category::Derived {
        name: field::LOSSES,
        label: "System losses",
        kind: Kind::Quantity,
        compute: losses,
    },
];

fn net_imports(record: &Record) -> Option<f64> {
    metrics::net_imports(record.get(field::IMPORTS), record.get(field::EXPORTS))
}

fn dependence(record: &Record) -> Option<f64> {
    metrics::energy_dependency(
        record.get(field::IMPORTS),
        record.get(field::EXPORTS),
        record.get(field::CONSUMPTION),
    )
}

fn self_sufficiency(record: &Record) -> Option<f64> {
    metrics::self_sufficiency(record.get(field::PRODUCTION), record.get(field::CONSUMPTION))
}

fn efficiency(record: &Record) -> Option<f64> {
    transformation(record).efficiency
}

fn losses(record: &Record) -> Option<f64> {
    transformation(record).losses
}

fn transformation(record: &Record) -> metrics::Transformation {
    metrics::transformation(
        record.get(field::INPUT),
        record.get(field::ELECTRICITY),
        record.get(field::HEAT),
    )
}
