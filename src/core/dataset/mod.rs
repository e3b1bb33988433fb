mod csv_codec;
mod record;
mod split;

pub use csv_codec::{
    format_bool, parse_bool, read_group_file, read_source_file, write_records,
    GROUP_FILE_COLUMNS,
};
pub use record::{AnnotationFlag, AnnotationFlags, TranscriptRecord};
pub use split::{Dataset, DatasetSplit};
