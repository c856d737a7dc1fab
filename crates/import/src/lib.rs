pub mod csv;
pub mod directory;
pub mod export;

pub use self::csv::{
    import_contributions, write_template, ContributionColumns, ContributionCsvProfile, CsvError,
    CsvRecordSource, TEMPLATE_HEADERS,
};
pub use directory::{read_funds, read_people, DirectoryError, FileDirectory};
pub use export::{export_partitions, ExportError, ExportPaths};
