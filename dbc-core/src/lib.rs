pub mod analytics;
pub mod csv_io;
pub mod error;
pub mod model;
pub mod parse;
pub mod route;
pub mod table;
pub mod transform;

pub use analytics::{DetailOptions, Lookups, ProductDetail, DEFAULT_PROVISIONAL_YEAR};
pub use csv_io::{read_table, write_table, CsvTable, HeaderIndex};
pub use error::{DbcError, Result};
pub use model::{
    FactDbc, FactDbcProfiel, RefDiagnose, RefSpecialisme, RefZorgactiviteit, RefZorgproduct,
    RefZorgprofielklasse,
};
pub use route::DetailKind;
pub use table::{TableSpec, SEED_ORDER};
pub use transform::{transform_all, TransformPaths, TransformReport};
