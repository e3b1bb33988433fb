mod export;
mod file_ops;
mod ingest;
mod review;

pub use export::{concat_csv_files_for_downloading, reassemble_dataset, ExportReport};
pub use ingest::{
    ingest_dataset, upload_audio_files, upload_csv_files, AudioUploadReport, IngestReport,
};
pub use review::editing_done;
